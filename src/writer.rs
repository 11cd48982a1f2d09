//! Renders a [`File`] back to text.
//!
//! The default section comes first, without a header. Every other section
//! starts with `[name]` and is separated from the previous one by a blank
//! line. Key names are padded to the longest name of their section, so
//! values line up:
//!
//! ```text
//! NAME   Unknwon
//! Height 100 // centimetres
//! ```
//!
//! Names and values are written bare when they read back unchanged, and in
//! double or single quotes otherwise. Every candidate spelling is checked
//! against the line parser before it is used. Text no spelling can carry,
//! such as a line break or a value holding both whitespace and an unpaired
//! `"`, makes [`to_text`] fail with [`Error::Unwritable`].

use crate::parser::{classify, KeyLine, Line};
use crate::{Error, File, Key, Result, Section};
use std::borrow::Cow;
use std::fmt::Write as _;

/// Line terminator used when writing.
pub const LINE_BREAK: &str = "\n";

fn needs_quotes(text: &str) -> bool {
    text.is_empty()
        || text.chars().any(char::is_whitespace)
        || text.starts_with("//")
        || text.starts_with('[')
        || text.starts_with(['"', '\''])
        || text.ends_with(['"', '\''])
}

fn has_line_break(text: &str) -> bool {
    text.contains(['\n', '\r'])
}

/// Spellings of `text` in the order they are tried.
fn spellings(text: &str, prefer_quoted: bool) -> Vec<Cow<'_, str>> {
    let double = Cow::Owned(format!("\"{text}\""));
    let single = Cow::Owned(format!("'{text}'"));
    if prefer_quoted {
        vec![double, single, Cow::Borrowed(text)]
    } else if needs_quotes(text) {
        vec![double, single]
    } else {
        vec![Cow::Borrowed(text), double, single]
    }
}

fn key_name(key: &Key) -> Option<Cow<'_, str>> {
    if key.is_anonymous() {
        return Some(Cow::Borrowed("-"));
    }
    let name = key.name();
    if has_line_break(name) {
        return None;
    }
    spellings(name, false).into_iter().find(|spelled| {
        matches!(
            classify(&format!("{spelled} x"), 0),
            Ok(Line::Key(KeyLine { name: Some(ref read), .. })) if read == name
        )
    })
}

fn key_value(key: &Key) -> Option<Cow<'_, str>> {
    let value = key.value();
    if has_line_break(value) {
        return None;
    }
    spellings(value, key.is_quoted())
        .into_iter()
        .find(|spelled| {
            matches!(
                classify(&format!("k {spelled}"), 0),
                Ok(Line::Key(KeyLine { value: ref read, comment: None, .. })) if read == value
            )
        })
}

fn section_header(section: &Section) -> Option<String> {
    let header = format!("[{}]", section.name());
    let reads_back = !has_line_break(section.name())
        && matches!(
            classify(&header, 0),
            Ok(Line::Section { ref name, .. }) if name == section.name()
        );
    reads_back.then_some(header)
}

/// How text that cannot be written faithfully is handled.
#[derive(Clone, Copy)]
enum Mode {
    Strict,
    Lossy,
}

impl Mode {
    fn settle<'t>(
        self,
        spelled: Option<Cow<'t, str>>,
        what: &str,
        text: &str,
    ) -> Result<Cow<'t, str>> {
        match (spelled, self) {
            (Some(spelled), _) => Ok(spelled),
            (None, Mode::Strict) => Err(Error::unwritable(what, text)),
            (None, Mode::Lossy) => Ok(Cow::Owned(format!("\"{text}\""))),
        }
    }
}

fn write_comment_lines(out: &mut String, comment: &str) {
    for line in comment.lines() {
        let _ = write!(out, "// {line}{LINE_BREAK}");
    }
}

fn write_section(out: &mut String, section: &Section, mode: Mode) -> Result<()> {
    let mut lines = Vec::with_capacity(section.len());
    for key in section.keys() {
        let name = mode.settle(key_name(key), "key name", key.name())?;
        let value = mode.settle(key_value(key), "value", key.value())?;
        lines.push((key, name, value));
    }
    let width = lines
        .iter()
        .map(|(_, name, _)| name.chars().count())
        .max()
        .unwrap_or(0);
    for (key, name, value) in lines {
        let inline = !key.comment.is_empty() && !has_line_break(&key.comment);
        if !inline {
            write_comment_lines(out, &key.comment);
        }
        let _ = write!(out, "{name:<width$} {value}");
        if inline {
            let _ = write!(out, " // {}", key.comment);
        }
        out.push_str(LINE_BREAK);
    }
    Ok(())
}

fn render(file: &File, mode: Mode) -> Result<String> {
    let mut out = String::new();
    for section in file.sections() {
        let is_default = file.is_default(section);
        if is_default && section.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push_str(LINE_BREAK);
        }
        if !is_default {
            let header = mode.settle(
                section_header(section).map(Cow::Owned),
                "section name",
                section.name(),
            )?;
            write_comment_lines(&mut out, &section.comment);
            out.push_str(&header);
            out.push_str(LINE_BREAK);
        }
        write_section(&mut out, section, mode)?;
    }
    Ok(out)
}

/// Renders the whole document.
///
/// ```rust
/// let cfg = csgo_cfg::load("NAME Unknwon\n[features]\n- \"read comments\"\n").unwrap();
/// let text = csgo_cfg::writer::to_text(&cfg).unwrap();
/// assert_eq!(text, "NAME Unknwon\n\n[features]\n- \"read comments\"\n");
/// ```
///
/// # Errors
///
/// Returns [`Error::Unwritable`] for the first section name, key name or
/// value that would not read back unchanged.
pub fn to_text(file: &File) -> Result<String> {
    render(file, Mode::Strict)
}

/// Renders the whole document, wrapping unwritable text in double quotes
/// instead of failing. Used for `Display`.
pub(crate) fn to_text_lossy(file: &File) -> String {
    render(file, Mode::Lossy).unwrap_or_default()
}
