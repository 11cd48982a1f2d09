//! Line reader: splits a byte stream into raw lines.

use crate::options::Continuation;
use crate::{Error, Result};
use std::io::BufRead;

const BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Reads raw lines, `\n` terminator included, from a buffered stream.
///
/// A partial last line is delivered once before [`next_line`](Self::next_line)
/// starts returning `None`.
pub struct LineReader<R> {
    inner: R,
    origin: String,
    eof: bool,
    line_no: usize,
    continuation: Continuation,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R, origin: &str) -> Self {
        LineReader {
            inner,
            origin: origin.to_string(),
            eof: false,
            line_no: 0,
            continuation: Continuation::Verbatim,
        }
    }

    #[must_use]
    pub fn with_continuation(mut self, continuation: Continuation) -> Self {
        self.continuation = continuation;
        self
    }

    /// Consumes a UTF-8 byte order mark if the stream starts with one.
    pub fn skip_bom(&mut self) -> Result<()> {
        let origin = &self.origin;
        let has_bom = self
            .inner
            .fill_buf()
            .map_err(|err| Error::source_read(origin, err))?
            .starts_with(&BOM);
        if has_bom {
            self.inner.consume(BOM.len());
        }
        Ok(())
    }

    /// Number of physical lines read so far. Line numbers in errors are 1-based.
    pub fn line_no(&self) -> usize {
        self.line_no
    }

    pub fn is_eof(&self) -> bool {
        self.eof
    }

    fn read_physical(&mut self) -> Result<Option<String>> {
        if self.eof {
            return Ok(None);
        }
        let mut buf = Vec::new();
        let n = self
            .inner
            .read_until(b'\n', &mut buf)
            .map_err(|err| Error::source_read(&self.origin, err))?;
        if n == 0 || buf.last() != Some(&b'\n') {
            self.eof = true;
        }
        if n == 0 {
            return Ok(None);
        }
        self.line_no += 1;
        let line_no = self.line_no;
        String::from_utf8(buf).map(Some).map_err(|err| {
            Error::source_read(
                &self.origin,
                format_args!("line {line_no} is not valid UTF-8: {}", err.utf8_error()),
            )
        })
    }

    /// Returns the next logical line, or `None` once the stream is exhausted.
    ///
    /// With [`Continuation::Join`], physical lines ending in `\` are merged
    /// with their successor (left-trimmed) and the backslash is dropped.
    pub fn next_line(&mut self) -> Result<Option<String>> {
        let Some(mut line) = self.read_physical()? else {
            return Ok(None);
        };
        if self.continuation == Continuation::Join {
            while line.trim_end().ends_with('\\') {
                let Some(next) = self.read_physical()? else {
                    break;
                };
                let keep = line.trim_end().len() - 1;
                line.truncate(keep);
                line.push_str(next.trim_start());
            }
        }
        Ok(Some(line))
    }
}
