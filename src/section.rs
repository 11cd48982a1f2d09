//! Named groups of keys.

use crate::map::NameMap;
use crate::{Error, Key, Result};
use std::collections::HashMap;

/// A named, ordered group of [`Key`]s.
///
/// Lookups on a section only see its own keys; inheritance from a dotted
/// parent (`package` for `package.sub`) is resolved by
/// [`File::key`](crate::File::key), which can see every section.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    name: String,
    /// Comment text without the `//` marker.
    pub comment: String,
    keys: NameMap<Key>,
    anonymous: usize,
}

impl Section {
    pub(crate) fn new(name: String, insensitive: bool) -> Self {
        Section {
            name,
            comment: String::new(),
            keys: NameMap::new(insensitive),
            anonymous: 0,
        }
    }

    /// The name as stored; lower-cased when the document is case-insensitive.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the section this one inherits from, if it has a dotted name.
    ///
    /// ```rust
    /// let mut cfg = csgo_cfg::empty();
    /// let sub = cfg.section_mut("package.sub");
    /// assert_eq!(sub.parent_name(), Some("package"));
    /// ```
    #[must_use]
    pub fn parent_name(&self) -> Option<&str> {
        self.name.rsplit_once('.').map(|(parent, _)| parent)
    }

    /// Creates a key, or overwrites the value of an existing one.
    pub fn new_key(&mut self, name: &str, value: &str) -> Result<&mut Key> {
        let key = self.key_mut(name)?;
        key.set_value(value);
        Ok(key)
    }

    /// Returns the key called `name`, creating it with an empty value first if needed.
    pub fn key_mut(&mut self, name: &str) -> Result<&mut Key> {
        if name.is_empty() {
            return Err(Error::EmptyName("key"));
        }
        Ok(self
            .keys
            .get_or_insert_with(name, |name| Key::new(name, String::new())))
    }

    /// Appends an anonymous key named `#<n>`, `n` counting anonymous keys of this section.
    pub fn push_anonymous(&mut self, value: &str) -> &mut Key {
        self.anonymous += 1;
        let name = format!("#{}", self.anonymous);
        let key = self
            .keys
            .get_or_insert_with(&name, |name| Key::new(name, String::new()));
        key.set_value(value);
        key.mark_anonymous();
        key
    }

    /// Looks up one of this section's own keys.
    ///
    /// ```rust
    /// let cfg = csgo_cfg::load("[bots]\nbot_quota 10\n- Albert").unwrap();
    /// let bots = cfg.section("bots").unwrap();
    /// assert_eq!(bots.key("bot_quota").unwrap().value(), "10");
    /// assert_eq!(bots.key("#1").unwrap().value(), "Albert");
    /// assert!(bots.key("bot_difficulty").is_none());
    /// ```
    #[must_use]
    pub fn key(&self, name: &str) -> Option<&Key> {
        self.keys.get(name)
    }

    /// Like [`Section::key`], but a missing key is an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] naming this section and the key.
    pub fn get_key(&self, name: &str) -> Result<&Key> {
        self.key(name).ok_or_else(|| Error::KeyNotFound {
            section: self.name.clone(),
            key: name.to_string(),
        })
    }

    #[must_use]
    pub fn has_key(&self, name: &str) -> bool {
        self.keys.contains(name)
    }

    /// Returns `true` if any key of this section holds exactly `value`.
    #[must_use]
    pub fn has_value(&self, value: &str) -> bool {
        self.keys.values().any(|key| key.value() == value)
    }

    /// Removes a key and returns it. The remaining keys keep their order.
    ///
    /// Deleting an anonymous key does not renumber the others, and the next
    /// [`Section::push_anonymous`] keeps counting from the last number it gave out.
    pub fn delete_key(&mut self, name: &str) -> Option<Key> {
        self.keys.remove(name)
    }

    /// Keys in insertion order, anonymous ones included.
    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.keys.values()
    }

    /// Key names in insertion order.
    #[must_use]
    pub fn key_strings(&self) -> Vec<String> {
        self.keys.keys().map(str::to_string).collect()
    }

    /// Snapshot of every key name and value.
    #[must_use]
    pub fn keys_hash(&self) -> HashMap<String, String> {
        self.keys
            .iter()
            .map(|(name, key)| (name.clone(), key.value().to_string()))
            .collect()
    }

    /// Number of keys, anonymous ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
