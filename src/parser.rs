//! Line classification and document building.
//!
//! Every logical line is one of:
//!
//! - blank (skipped)
//! - a full-line comment, `// text`
//! - a section header, `[name]`, optionally followed by `// comment`
//! - a key line, `name value // comment`, where `name` is `-` for an
//!   anonymous key
//!
//! The key name ends at the first whitespace outside double quotes. The value
//! ends at the next such whitespace; whatever follows is a comment if it
//! starts with `//` and is dropped otherwise.

use crate::file::DEFAULT_SECTION;
use crate::reader::LineReader;
use crate::{Error, File, Result};
use std::io::BufRead;
use tracing::trace;

const COMMENT: &str = "//";
const ANONYMOUS: &str = "-";

/// A classified line.
#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    Blank,
    Comment(String),
    Section {
        name: String,
        comment: Option<String>,
    },
    Key(KeyLine),
}

/// The parts of a key line.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyLine {
    /// `None` for an anonymous key.
    pub name: Option<String>,
    pub value: String,
    pub quoted: bool,
    pub comment: Option<String>,
}

enum Fault {
    MalformedSection,
    NoDelimiter,
    EmptyName,
    Unterminated,
}

impl Fault {
    fn at(self, line: usize, text: &str) -> Error {
        let text = text.to_string();
        match self {
            Fault::MalformedSection => Error::MalformedSectionHeader { line, text },
            Fault::NoDelimiter => Error::DelimiterNotFound { line, text },
            Fault::EmptyName => Error::EmptyKeyName { line, text },
            Fault::Unterminated => Error::UnterminatedQuotedValue { line, text },
        }
    }
}

fn strip_terminator(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// Strips one pair of matching `'` or `"` quotes, provided the quote does not
/// also appear inside.
fn unquote(text: &str) -> Option<&str> {
    ['"', '\''].into_iter().find_map(|q| {
        let inner = text.strip_prefix(q)?.strip_suffix(q)?;
        (!inner.contains(q)).then_some(inner)
    })
}

fn comment_of(rest: &str) -> Option<String> {
    rest.trim_start()
        .strip_prefix(COMMENT)
        .map(|c| c.trim().to_string())
}

/// Byte index of the first whitespace outside double quotes, and whether the
/// scan ended inside an open quote.
fn scan_token(text: &str) -> (Option<usize>, bool) {
    let mut in_quote = false;
    for (i, c) in text.char_indices() {
        if c.is_whitespace() && !in_quote {
            return (Some(i), false);
        }
        if c == '"' {
            in_quote = !in_quote;
        }
    }
    (None, in_quote)
}

fn read_section(line: &str) -> std::result::Result<Line, Fault> {
    let close = line.find(']').ok_or(Fault::MalformedSection)?;
    let name = line[1..close].trim();
    if name.is_empty() {
        return Err(Fault::MalformedSection);
    }
    Ok(Line::Section {
        name: name.to_string(),
        comment: comment_of(&line[close + 1..]),
    })
}

/// Splits the key name off a line. Returns the name (`None` for `-`) and the rest of the line.
fn read_key_name(line: &str) -> std::result::Result<(Option<String>, &str), Fault> {
    let end = match scan_token(line) {
        (Some(end), _) => end,
        (None, true) => return Err(Fault::Unterminated),
        (None, false) => return Err(Fault::NoDelimiter),
    };
    let raw = line[..end].trim();
    let rest = &line[end..];
    if raw == ANONYMOUS {
        return Ok((None, rest));
    }
    let name = unquote(raw).unwrap_or(raw).trim();
    if name.is_empty() {
        return Err(Fault::EmptyName);
    }
    Ok((Some(name.to_string()), rest))
}

/// Reads the value and trailing comment following a key name.
fn read_value(rest: &str) -> std::result::Result<(String, bool, Option<String>), Fault> {
    let rest = rest.trim_start();
    if rest.is_empty() || rest.starts_with(COMMENT) {
        return Ok((String::new(), true, comment_of(rest)));
    }

    let end = match scan_token(rest) {
        (Some(end), _) => end,
        (None, true) => return Err(Fault::Unterminated),
        (None, false) => rest.len(),
    };
    let raw = rest[..end].trim();
    let comment = comment_of(&rest[end..]);

    Ok(match unquote(raw) {
        Some(inner) => (inner.to_string(), true, comment),
        None => (raw.to_string(), false, comment),
    })
}

/// Classifies one raw line. `line_no` is only used in errors.
///
/// ```rust
/// use csgo_cfg::parser::{classify, Line};
///
/// let Line::Key(key) = classify("ff_damage_reduction_bullets 0.33 // teammates", 1).unwrap() else {
///     panic!("expected a key line");
/// };
/// assert_eq!(key.name.as_deref(), Some("ff_damage_reduction_bullets"));
/// assert_eq!(key.value, "0.33");
/// assert!(!key.quoted);
/// assert_eq!(key.comment.as_deref(), Some("teammates"));
/// ```
pub fn classify(raw: &str, line_no: usize) -> Result<Line> {
    let line = strip_terminator(raw).trim_start();
    if line.trim_end().is_empty() {
        return Ok(Line::Blank);
    }
    if let Some(text) = line.strip_prefix(COMMENT) {
        return Ok(Line::Comment(text.trim().to_string()));
    }
    let classified = if line.starts_with('[') {
        read_section(line)
    } else {
        read_key_name(line).and_then(|(name, rest)| {
            let (value, quoted, comment) = read_value(rest)?;
            Ok(Line::Key(KeyLine {
                name,
                value,
                quoted,
                comment,
            }))
        })
    };
    classified.map_err(|fault| fault.at(line_no, line))
}

/// Drives [`classify`] over a line reader and applies the result to a [`File`].
pub(crate) struct Builder<'f> {
    file: &'f mut File,
    section: String,
    pending: Vec<String>,
}

impl<'f> Builder<'f> {
    pub(crate) fn new(file: &'f mut File) -> Self {
        Builder {
            file,
            section: DEFAULT_SECTION.to_string(),
            pending: Vec::new(),
        }
    }

    fn take_comment(&mut self, inline: Option<String>) -> String {
        let pending = std::mem::take(&mut self.pending);
        match inline {
            Some(comment) => comment,
            None => pending.join("\n"),
        }
    }

    pub(crate) fn run<R: BufRead>(mut self, reader: &mut LineReader<R>) -> Result<()> {
        while let Some(raw) = reader.next_line()? {
            let line = classify(&raw, reader.line_no())?;
            trace!(line = reader.line_no(), ?line, "classified");
            self.apply(line)?;
        }
        Ok(())
    }

    fn apply(&mut self, line: Line) -> Result<()> {
        match line {
            Line::Blank => {}
            Line::Comment(text) => self.pending.push(text),
            Line::Section { name, comment } => {
                let comment = self.take_comment(comment);
                let section = self.file.new_section(&name)?;
                if !comment.is_empty() {
                    section.comment = comment;
                }
                self.section = name;
            }
            Line::Key(key_line) => {
                let comment = self.take_comment(key_line.comment);
                let section = self.file.section_mut(&self.section);
                let key = match key_line.name {
                    Some(name) => section.key_mut(&name)?,
                    None => section.push_anonymous(""),
                };
                key.set_parsed(key_line.value, key_line.quoted);
                key.comment = comment;
            }
        }
        Ok(())
    }
}
