//! Error types for loading, writing and mapping configuration files.
//!
//! Every failure in the crate is reported as a value of [`Error`]:
//!
//! - **Source errors**: a source could not be read ([`Error::SourceRead`]) or
//!   a path source does not exist ([`Error::MissingSource`])
//! - **Syntax errors**: malformed section headers, key lines without a
//!   delimiter, empty key names and unterminated quoted values. These carry
//!   the 1-based line number and the offending line.
//! - **Mapping errors**: a value could not be converted to the field type,
//!   the field type is not supported, or the mapping target is not a record
//! - **Write errors**: text that cannot be written back faithfully
//!   ([`Error::Unwritable`]) and I/O failures
//!
//! ## Examples
//!
//! ```rust
//! use csgo_cfg::{load, Error};
//!
//! let err = load(b"[]".as_slice()).unwrap_err();
//! assert!(matches!(err, Error::MalformedSectionHeader { line: 1, .. }));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors raised while loading, editing or mapping a configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Reading a source failed for a reason other than the source being absent
    #[error("failed to read source {origin}: {message}")]
    SourceRead { origin: String, message: String },

    /// A path source does not exist
    #[error("source not found: {0}")]
    MissingSource(String),

    /// `[]` or a header without the closing bracket
    #[error("malformed section header at line {line}: {text:?}")]
    MalformedSectionHeader { line: usize, text: String },

    /// A key line without whitespace between the name and the value
    #[error("key-value delimiter not found at line {line}: {text:?}")]
    DelimiterNotFound { line: usize, text: String },

    /// A key line whose name is empty once trimmed and unquoted
    #[error("empty key name at line {line}: {text:?}")]
    EmptyKeyName { line: usize, text: String },

    /// A value that opens a double quote and never closes it
    #[error("unterminated quoted value at line {line}: {text:?}")]
    UnterminatedQuotedValue { line: usize, text: String },

    /// A section or key was created with an empty name
    #[error("{0} name cannot be empty")]
    EmptyName(&'static str),

    #[error("section {0:?} does not exist")]
    SectionNotFound(String),

    #[error("key {key:?} does not exist in section {section:?}")]
    KeyNotFound { section: String, key: String },

    /// The text of a key could not be converted to the type of the field it maps to
    #[error("cannot convert {raw:?} for field {field:?}: {reason}")]
    TypeConversion {
        field: String,
        raw: String,
        reason: String,
    },

    /// The field has a type the mapper does not know how to read or write
    #[error("field {field:?} has unsupported kind {kind}")]
    UnsupportedFieldKind { field: String, kind: String },

    /// The decode target is not a record
    #[error("cannot map into {0}: target must be a struct or a map")]
    InvalidMapTarget(String),

    /// The encode source is not a record
    #[error("cannot reflect from {0}: source must be a struct or a map")]
    NotAddressable(String),

    /// A section name, key name or value that would read back differently once written
    #[error("{what} {text:?} cannot be written so that it reads back unchanged")]
    Unwritable { what: String, text: String },

    /// IO error while writing
    #[error("IO error: {0}")]
    Io(String),

    /// Custom error
    #[error("{0}")]
    Custom(String),
}

impl Error {
    /// Creates a type conversion error for `field` holding `raw`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use csgo_cfg::Error;
    ///
    /// let err = Error::conversion("Age", "age", "invalid digit found in string");
    /// assert!(err.to_string().contains("Age"));
    /// ```
    pub fn conversion<R: fmt::Display>(field: &str, raw: &str, reason: R) -> Self {
        Error::TypeConversion {
            field: field.to_string(),
            raw: raw.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Creates an unsupported field kind error.
    pub fn unsupported(field: &str, kind: &str) -> Self {
        Error::UnsupportedFieldKind {
            field: field.to_string(),
            kind: kind.to_string(),
        }
    }

    /// Creates a source read error.
    pub fn source_read<M: fmt::Display>(origin: &str, message: M) -> Self {
        Error::SourceRead {
            origin: origin.to_string(),
            message: message.to_string(),
        }
    }

    /// Creates an error for text the writer cannot represent.
    pub fn unwritable(what: &str, text: &str) -> Self {
        Error::Unwritable {
            what: what.to_string(),
            text: text.to_string(),
        }
    }

    /// Creates an I/O error for writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Returns `true` for errors raised by the line parser.
    #[must_use]
    pub fn is_syntax(&self) -> bool {
        matches!(
            self,
            Error::MalformedSectionHeader { .. }
                | Error::DelimiterNotFound { .. }
                | Error::EmptyKeyName { .. }
                | Error::UnterminatedQuotedValue { .. }
        )
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
