//! # csgo_cfg
//!
//! Reading, editing and writing Counter-Strike style configuration files, and
//! mapping them to and from Serde records.
//!
//! ## The format
//!
//! Configuration files are line oriented. A key line holds a name and a value
//! separated by whitespace, with an optional `//` comment:
//!
//! ```text
//! // Rounds
//! mp_maxrounds 30
//! mp_roundtime 1.92          // minutes
//! hostname "My CS:GO server"
//!
//! [advanced]
//! - "first anonymous key"
//! - second
//! ```
//!
//! Keys before the first `[section]` header belong to the default section.
//! A `-` name creates an anonymous key, numbered `#1`, `#2`, ... per section.
//! A section named `parent.child` sees the keys of `parent` it does not
//! define itself.
//!
//! ## Key Features
//!
//! - **Ordered document model**: sections and keys keep the order they were read in
//! - **Comments preserved**: full-line and inline comments survive a load/save cycle
//! - **Serde mapping**: decode sections into `#[derive(Deserialize)]` records
//!   and reflect `#[derive(Serialize)]` records back into a document
//! - **Multiple sources**: byte buffers, paths and readers, applied in order
//! - **Shared access**: wrap a document in a [`SharedFile`] to use it across threads
//!
//! ## Quick Start
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, Debug, PartialEq)]
//! struct Rounds {
//!     mp_maxrounds: u32,
//!     mp_roundtime: f64,
//!     hostname: String,
//! }
//!
//! let text = "mp_maxrounds 30\nmp_roundtime 1.92 // minutes\nhostname \"My CS:GO server\"\n";
//! let cfg = csgo_cfg::load(text).unwrap();
//!
//! let rounds: Rounds = cfg.decode().unwrap();
//! assert_eq!(rounds.mp_maxrounds, 30);
//! assert_eq!(rounds.hostname, "My CS:GO server");
//!
//! // Edit and write back
//! let mut cfg = cfg;
//! cfg.section_mut("").new_key("mp_maxrounds", "24").unwrap();
//! assert!(cfg.to_string().starts_with("mp_maxrounds 24\n"));
//! ```
//!
//! ## Typed key access
//!
//! ```rust
//! let cfg = csgo_cfg::load("[bots]\nbot_quota 10\nbot_join_after_player true\n").unwrap();
//! let bots = cfg.get_section("bots").unwrap();
//! assert_eq!(bots.get_key("bot_quota").unwrap().int().unwrap(), 10);
//! assert!(bots.get_key("bot_join_after_player").unwrap().bool().unwrap());
//! ```
//!
//! ## Loading options
//!
//! ```rust
//! use csgo_cfg::{load_sources, LoadOptions, Source};
//!
//! let options = LoadOptions::new().with_loose(true);
//! let cfg = load_sources(options, [Source::from("sv_cheats 0"), Source::path("missing.cfg")]).unwrap();
//! assert_eq!(cfg.key("", "sv_cheats").unwrap().value(), "0");
//! ```

pub mod access;
pub mod convert;
pub mod de;
pub mod duration;
pub mod error;
pub mod file;
pub mod key;
pub mod macros;
pub mod map;
pub mod name;
pub mod options;
pub mod parser;
pub mod reader;
pub mod section;
pub mod ser;
pub mod source;
pub mod writer;
pub mod zero;

pub use access::{Access, SharedFile};
pub use error::{Error, Result};
pub use file::{File, DEFAULT_SECTION};
pub use key::Key;
pub use map::NameMap;
pub use name::{all_caps_underscore, title_underscore, NameMapper};
pub use options::{Continuation, LoadOptions};
pub use section::Section;
pub use source::Source;
pub use zero::{is_zero, IsZero};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

#[doc(hidden)]
pub mod __private {
    pub use chrono;
    pub use serde;
}

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Creates a document holding only an empty default section.
#[must_use]
pub fn empty() -> File {
    File::default()
}

/// Loads one source with default options.
///
/// # Examples
///
/// ```rust
/// let cfg = csgo_cfg::load("[author]\nNAME Unknwon // the author\n").unwrap();
/// let name = cfg.get_key("author", "NAME").unwrap();
/// assert_eq!(name.value(), "Unknwon");
/// assert_eq!(name.comment, "the author");
/// ```
///
/// # Errors
///
/// Returns an error if the source cannot be read or contains a malformed line.
pub fn load<S: Into<Source>>(source: S) -> Result<File> {
    load_sources(LoadOptions::default(), [source])
}

/// Loads sources in order into a single document.
///
/// Later sources add keys to the sections of earlier ones and overwrite
/// keys they repeat.
///
/// # Errors
///
/// Returns the first error met. No partial document is returned.
pub fn load_sources<I, S>(options: LoadOptions, sources: I) -> Result<File>
where
    I: IntoIterator<Item = S>,
    S: Into<Source>,
{
    debug!(?options, "loading configuration");
    let mut file = File::new(options);
    for source in sources {
        file.parse_source(source.into())?;
    }
    Ok(file)
}

/// Like [`load_sources`], skipping path sources that do not exist.
///
/// # Errors
///
/// Returns an error if an existing source cannot be read or is malformed.
pub fn loose_load<I, S>(sources: I) -> Result<File>
where
    I: IntoIterator<Item = S>,
    S: Into<Source>,
{
    load_sources(LoadOptions::new().with_loose(true), sources)
}

/// Like [`load_sources`], with section and key names folded to lower case.
///
/// ```rust
/// let cfg = csgo_cfg::insensitive_load(["[Author]\nNAME Unknwon"]).unwrap();
/// assert_eq!(cfg.key("AUTHOR", "name").unwrap().value(), "Unknwon");
/// ```
///
/// # Errors
///
/// Returns an error if a source cannot be read or is malformed.
pub fn insensitive_load<I, S>(sources: I) -> Result<File>
where
    I: IntoIterator<Item = S>,
    S: Into<Source>,
{
    load_sources(LoadOptions::new().with_insensitive(true), sources)
}

/// Loads `source` and maps its default section onto `target`.
///
/// # Errors
///
/// Returns an error if loading fails or a value cannot be converted.
pub fn map_to<T, S>(target: &mut T, source: S) -> Result<()>
where
    T: Serialize + DeserializeOwned,
    S: Into<Source>,
{
    load(source)?.map_to(target)
}

/// Like [`map_to`], looking keys up through `mapper`.
///
/// ```rust
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize, Default)]
/// struct Package {
///     package_name: String,
/// }
///
/// let mut package = Package::default();
/// csgo_cfg::map_to_with_mapper(&mut package, csgo_cfg::all_caps_underscore, "PACKAGE_NAME cfg").unwrap();
/// assert_eq!(package.package_name, "cfg");
/// ```
///
/// # Errors
///
/// Returns an error if loading fails or a value cannot be converted.
pub fn map_to_with_mapper<T, S>(target: &mut T, mapper: NameMapper, source: S) -> Result<()>
where
    T: Serialize + DeserializeOwned,
    S: Into<Source>,
{
    let mut file = load(source)?;
    file.name_mapper = Some(mapper);
    file.map_to(target)
}

/// Writes the fields of `source` into the default section of `file`.
///
/// # Errors
///
/// Returns an error if `source` is not a record or holds an unsupported field.
pub fn reflect_from<T: Serialize + ?Sized>(file: &mut File, source: &T) -> Result<()> {
    file.reflect_from(source)
}

/// Like [`reflect_from`], naming keys through `mapper`. The mapper stays set on `file`.
///
/// # Errors
///
/// Returns an error if `source` is not a record or holds an unsupported field.
pub fn reflect_from_with_mapper<T: Serialize + ?Sized>(
    file: &mut File,
    source: &T,
    mapper: NameMapper,
) -> Result<()> {
    file.name_mapper = Some(mapper);
    file.reflect_from(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Serialize, Deserialize, Debug, PartialEq, Default)]
    struct Package {
        package_name: String,
    }

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_empty_document() {
        let cfg = empty();
        assert_eq!(cfg.section_strings(), vec![DEFAULT_SECTION]);
        assert_eq!(cfg.to_string(), "");
    }

    #[test]
    fn test_map_to_from_bytes() {
        let mut package = Package::default();
        map_to(&mut package, "package_name cfg").unwrap();
        assert_eq!(package.package_name, "cfg");
    }

    #[test]
    fn test_map_to_from_invalid_source() {
        let mut package = Package::default();
        assert!(map_to(&mut package, "hi").is_err());
    }

    #[test]
    fn test_reflect_with_mapper() {
        let mut cfg = empty();
        let package = Package {
            package_name: "cfg".to_string(),
        };
        reflect_from_with_mapper(&mut cfg, &package, all_caps_underscore).unwrap();
        assert_eq!(cfg.to_string(), "PACKAGE_NAME cfg\n");
    }

    #[test]
    fn test_later_sources_overwrite() {
        let cfg = load_sources(LoadOptions::default(), ["a 1\nb 2", "a 3"]).unwrap();
        assert_eq!(cfg.key("", "a").unwrap().value(), "3");
        assert_eq!(cfg.key("", "b").unwrap().value(), "2");
    }
}
