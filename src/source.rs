//! Data sources accepted by the loaders.
//!
//! A [`Source`] is either raw text, a path to a file or an arbitrary reader.
//! Text given as `&str`, `String`, `&[u8]` or `Vec<u8>` converts into
//! [`Source::Bytes`]; paths must be wrapped explicitly with [`Source::path`]
//! (or converted from a `PathBuf` / `&Path`).

use crate::{Error, Result};
use std::fmt;
use std::fs::File as FsFile;
use std::io::{self, BufRead, BufReader, Cursor, Read};
use std::path::{Path, PathBuf};

/// One input to [`load_sources`](crate::load_sources).
pub enum Source {
    Bytes(Vec<u8>),
    Path(PathBuf),
    Reader(Box<dyn Read + Send>),
}

impl Source {
    /// Wraps a file path.
    ///
    /// ```rust
    /// use csgo_cfg::Source;
    ///
    /// assert_eq!(Source::path("server.cfg").to_string(), "server.cfg");
    /// ```
    pub fn path<P: AsRef<Path>>(path: P) -> Self {
        Source::Path(path.as_ref().to_path_buf())
    }

    /// Wraps any reader. It is read to the end when the source is loaded.
    pub fn reader<R: Read + Send + 'static>(reader: R) -> Self {
        Source::Reader(Box::new(reader))
    }

    /// Opens the source for line reading.
    ///
    /// A path that does not exist yields [`Error::MissingSource`]; any other
    /// failure to open it is [`Error::SourceRead`].
    pub(crate) fn open(self) -> Result<Box<dyn BufRead + Send>> {
        match self {
            Source::Bytes(bytes) => Ok(Box::new(Cursor::new(bytes))),
            Source::Path(path) => match FsFile::open(&path) {
                Ok(file) => Ok(Box::new(BufReader::new(file))),
                Err(err) if err.kind() == io::ErrorKind::NotFound => {
                    Err(Error::MissingSource(path.display().to_string()))
                }
                Err(err) => Err(Error::source_read(&path.display().to_string(), err)),
            },
            Source::Reader(reader) => Ok(Box::new(BufReader::new(reader))),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Bytes(bytes) => write!(f, "<{} bytes>", bytes.len()),
            Source::Path(path) => write!(f, "{}", path.display()),
            Source::Reader(_) => f.write_str("<reader>"),
        }
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Source({self})")
    }
}

impl From<&str> for Source {
    fn from(text: &str) -> Self {
        Source::Bytes(text.as_bytes().to_vec())
    }
}

impl From<String> for Source {
    fn from(text: String) -> Self {
        Source::Bytes(text.into_bytes())
    }
}

impl From<&[u8]> for Source {
    fn from(bytes: &[u8]) -> Self {
        Source::Bytes(bytes.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for Source {
    fn from(bytes: &[u8; N]) -> Self {
        Source::Bytes(bytes.to_vec())
    }
}

impl From<Vec<u8>> for Source {
    fn from(bytes: Vec<u8>) -> Self {
        Source::Bytes(bytes)
    }
}

impl From<&Path> for Source {
    fn from(path: &Path) -> Self {
        Source::Path(path.to_path_buf())
    }
}

impl From<PathBuf> for Source {
    fn from(path: PathBuf) -> Self {
        Source::Path(path)
    }
}
