//! The in-memory document.

use crate::access::SharedFile;
use crate::map::NameMap;
use crate::name::NameMapper;
use crate::parser::Builder;
use crate::reader::LineReader;
use crate::{de, ser, writer, Error, Key, LoadOptions, Result, Section, Source};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::io;
use std::path::Path;
use tracing::debug;

/// Name of the implicit section holding keys that appear before any header.
/// The empty name `""` refers to it as well.
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// A parsed configuration: an ordered set of [`Section`]s.
///
/// Reads take `&self` and writes take `&mut self`, so a `File` never needs a
/// lock. Call [`into_shared`](Self::into_shared) to share one between threads.
#[derive(Debug, Clone)]
pub struct File {
    sections: NameMap<Section>,
    options: LoadOptions,
    /// Maps record field names to key names in [`map_to`](Self::map_to) and
    /// [`reflect_from`](Self::reflect_from).
    pub name_mapper: Option<NameMapper>,
}

impl File {
    /// Creates a document holding only the default section.
    #[must_use]
    pub fn new(options: LoadOptions) -> Self {
        let mut sections = NameMap::new(options.insensitive);
        let default = Section::new(sections.normalize(DEFAULT_SECTION), options.insensitive);
        sections.insert(DEFAULT_SECTION, default);
        File {
            sections,
            options,
            name_mapper: None,
        }
    }

    #[must_use]
    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    fn resolve(name: &str) -> &str {
        if name.is_empty() {
            DEFAULT_SECTION
        } else {
            name
        }
    }

    /// Creates a section, or returns the existing one with that name.
    ///
    /// ```rust
    /// let mut cfg = csgo_cfg::empty();
    /// assert!(cfg.new_section("").is_err());
    /// cfg.new_section("author").unwrap().new_key("NAME", "Unknwon").unwrap();
    /// assert_eq!(cfg.key("author", "NAME").unwrap().value(), "Unknwon");
    /// ```
    pub fn new_section(&mut self, name: &str) -> Result<&mut Section> {
        if name.is_empty() {
            return Err(Error::EmptyName("section"));
        }
        Ok(self.section_mut(name))
    }

    pub fn new_sections(&mut self, names: &[&str]) -> Result<()> {
        for name in names {
            self.new_section(name)?;
        }
        Ok(())
    }

    /// Returns the section called `name`, creating it if needed.
    pub fn section_mut(&mut self, name: &str) -> &mut Section {
        let insensitive = self.options.insensitive;
        self.sections
            .get_or_insert_with(Self::resolve(name), |name| Section::new(name, insensitive))
    }

    /// Returns `true` if `section` is this document's default section.
    #[must_use]
    pub fn is_default(&self, section: &Section) -> bool {
        section.name() == self.sections.normalize(DEFAULT_SECTION)
    }

    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(Self::resolve(name))
    }

    pub fn get_section(&self, name: &str) -> Result<&Section> {
        self.section(name)
            .ok_or_else(|| Error::SectionNotFound(name.to_string()))
    }

    #[must_use]
    pub fn has_section(&self, name: &str) -> bool {
        self.section(name).is_some()
    }

    /// Removes a section. The default section is emptied instead of removed.
    pub fn delete_section(&mut self, name: &str) -> Option<Section> {
        let name = Self::resolve(name);
        if self.sections.normalize(name) == self.sections.normalize(DEFAULT_SECTION) {
            let fresh = Section::new(self.sections.normalize(name), self.options.insensitive);
            return self.sections.insert(name, fresh);
        }
        self.sections.remove(name)
    }

    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.values()
    }

    #[must_use]
    pub fn section_strings(&self) -> Vec<String> {
        self.sections.keys().map(str::to_string).collect()
    }

    /// Looks a key up in `section`, then in its dotted ancestors.
    ///
    /// ```rust
    /// let cfg = csgo_cfg::load("[package]\nCLONE_URL https://x\n[package.sub]\n").unwrap();
    /// assert_eq!(cfg.key("package.sub", "CLONE_URL").unwrap().value(), "https://x");
    /// assert!(cfg.section("package.sub").unwrap().key("CLONE_URL").is_none());
    /// ```
    #[must_use]
    pub fn key(&self, section: &str, name: &str) -> Option<&Key> {
        let mut current = Self::resolve(section);
        loop {
            if let Some(key) = self.section(current).and_then(|s| s.key(name)) {
                return Some(key);
            }
            current = current.rsplit_once('.')?.0;
        }
    }

    pub fn get_key(&self, section: &str, name: &str) -> Result<&Key> {
        self.key(section, name).ok_or_else(|| Error::KeyNotFound {
            section: section.to_string(),
            key: name.to_string(),
        })
    }

    /// Keys visible to `section` through its ancestors, nearest ancestor first.
    /// Names defined locally or by a nearer ancestor are not repeated.
    #[must_use]
    pub fn parent_keys(&self, section: &str) -> Vec<&Key> {
        let own = self.section(section);
        let mut seen: Vec<&Key> = Vec::new();
        let mut current = Self::resolve(section);
        while let Some((parent, _)) = current.rsplit_once('.') {
            if let Some(parent_section) = self.section(parent) {
                for key in parent_section.keys() {
                    let shadowed = own.map_or(false, |s| s.has_key(key.name()))
                        || seen.iter().any(|k| k.name() == key.name());
                    if !shadowed {
                        seen.push(key);
                    }
                }
            }
            current = parent;
        }
        seen
    }

    /// Parses one source into this document.
    pub(crate) fn parse_source(&mut self, source: Source) -> Result<()> {
        let origin = source.to_string();
        let reader = match source.open() {
            Ok(reader) => reader,
            Err(Error::MissingSource(path)) if self.options.loose => {
                debug!(%path, "skipping missing source");
                return Ok(());
            }
            Err(err) => return Err(err),
        };
        debug!(%origin, "loading source");
        let mut reader =
            LineReader::new(reader, &origin).with_continuation(self.options.continuation);
        reader.skip_bom()?;
        Builder::new(self).run(&mut reader)
    }

    /// Parses more sources into this document, in order.
    ///
    /// Either every source is applied or, on error, the document is left untouched.
    pub fn append<I, S>(&mut self, sources: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<Source>,
    {
        let mut scratch = self.clone();
        for source in sources {
            scratch.parse_source(source.into())?;
        }
        *self = scratch;
        Ok(())
    }

    /// Writes the document as text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unwritable`] before writing anything if a name or
    /// value would not read back unchanged, or an I/O error.
    pub fn write_to<W: io::Write>(&self, mut writer: W) -> Result<()> {
        let text = writer::to_text(self)?;
        writer
            .write_all(text.as_bytes())
            .and_then(|()| writer.flush())
            .map_err(|e| Error::io(&e.to_string()))
    }

    /// Writes the document to a file, replacing it.
    ///
    /// The text is rendered first, so an unwritable document leaves the file untouched.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let text = writer::to_text(self)?;
        std::fs::write(path, text).map_err(|e| Error::io(&e.to_string()))
    }

    /// Populates `target` from the default section.
    ///
    /// Fields without a matching key (or whose key is empty) keep their current
    /// value. Fields marked `#[serde(skip)]` are not touched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeConversion`] or [`Error::UnsupportedFieldKind`] for
    /// the first field that cannot be filled, and [`Error::InvalidMapTarget`]
    /// when `T` is not a record. `target` may be partly updated on error.
    pub fn map_to<T>(&self, target: &mut T) -> Result<()>
    where
        T: Serialize + DeserializeOwned,
    {
        self.map_section_to(DEFAULT_SECTION, target)
    }

    /// Populates `target` from the named section.
    pub fn map_section_to<T>(&self, section: &str, target: &mut T) -> Result<()>
    where
        T: Serialize + DeserializeOwned,
    {
        de::map_to(self, Self::resolve(section), target)
    }

    /// Builds a new `T` from the default section alone, without defaults.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        de::from_section(self, DEFAULT_SECTION)
    }

    /// Writes every field of `source` as a key of the default section.
    pub fn reflect_from<T: Serialize + ?Sized>(&mut self, source: &T) -> Result<()> {
        self.reflect_section_from(DEFAULT_SECTION, source)
    }

    pub fn reflect_section_from<T: Serialize + ?Sized>(
        &mut self,
        section: &str,
        source: &T,
    ) -> Result<()> {
        ser::reflect_into(self, Self::resolve(section), source)
    }

    /// Wraps the document in a reader/writer lock for shared use.
    #[must_use]
    pub fn into_shared(self) -> SharedFile {
        SharedFile::new(self)
    }
}

impl Default for File {
    fn default() -> Self {
        File::new(LoadOptions::default())
    }
}

/// Renders the document as [`write_to`](File::write_to) does. Text that
/// cannot be written faithfully is wrapped in double quotes instead of
/// failing, so use `write_to` or [`writer::to_text`] when the output is
/// read back.
impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&writer::to_text_lossy(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_file_has_only_default_section() {
        let cfg = File::default();
        assert_eq!(cfg.section_strings(), vec![DEFAULT_SECTION]);
        assert!(cfg.section("").is_some());
        assert!(matches!(
            cfg.get_section("404"),
            Err(Error::SectionNotFound(_))
        ));
    }

    #[test]
    fn test_empty_section_name_fails() {
        let mut cfg = File::default();
        assert_eq!(cfg.new_section("").unwrap_err(), Error::EmptyName("section"));
        assert!(cfg.new_sections(&["a", ""]).is_err());
        assert!(cfg.has_section("a"));
    }

    #[test]
    fn test_delete_section_keeps_default() {
        let mut cfg = File::default();
        cfg.section_mut("").new_key("k", "v").unwrap();
        cfg.section_mut("gone");
        assert!(cfg.delete_section("gone").is_some());
        assert!(!cfg.has_section("gone"));
        cfg.delete_section("");
        assert!(cfg.section("").unwrap().is_empty());
    }

    #[test]
    fn test_parent_keys_skip_shadowed() {
        let mut cfg = File::default();
        cfg.section_mut("a").new_key("x", "1").unwrap();
        cfg.section_mut("a").new_key("y", "1").unwrap();
        cfg.section_mut("a.b").new_key("y", "2").unwrap();
        cfg.section_mut("a.b.c").new_key("z", "3").unwrap();
        let names: Vec<_> = cfg.parent_keys("a.b.c").iter().map(|k| k.name()).collect();
        assert_eq!(names, vec!["y", "x"]);
        assert_eq!(cfg.key("a.b.c", "y").unwrap().value(), "2");
        assert_eq!(cfg.key("a.b.c", "x").unwrap().value(), "1");
        assert!(cfg.key("a.b.c", "w").is_none());
    }

    #[test]
    fn test_insensitive_names() {
        let mut cfg = File::new(LoadOptions::new().with_insensitive(true));
        cfg.section_mut("Author").new_key("NAME", "x").unwrap();
        assert_eq!(cfg.key("AUTHOR", "name").unwrap().name(), "name");
        assert_eq!(cfg.section("author").unwrap().name(), "author");
    }
}
