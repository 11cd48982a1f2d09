//! Ordered, name-normalizing map used for sections and keys.
//!
//! [`NameMap`] is a thin wrapper around [`IndexMap`] that keeps insertion
//! order (sections and keys are written back in the order they were first
//! seen) and applies one normalization function to every stored name and
//! every lookup. In case-insensitive mode names are lower-cased on the way
//! in, so lookups never have to compare case per call.
//!
//! ## Examples
//!
//! ```rust
//! use csgo_cfg::NameMap;
//!
//! let mut map = NameMap::new(true);
//! map.insert("NAME", 1);
//! assert_eq!(map.get("name"), Some(&1));
//! assert_eq!(map.keys().collect::<Vec<_>>(), vec!["name"]);
//! ```

use indexmap::map::Entry;
use indexmap::IndexMap;

/// An insertion-ordered map from normalized names to values.
#[derive(Debug, Clone, PartialEq)]
pub struct NameMap<V> {
    entries: IndexMap<String, V>,
    insensitive: bool,
}

impl<V> NameMap<V> {
    /// Creates an empty map. With `insensitive` set every name is lower-cased.
    #[must_use]
    pub fn new(insensitive: bool) -> Self {
        NameMap {
            entries: IndexMap::new(),
            insensitive,
        }
    }

    #[must_use]
    pub fn is_insensitive(&self) -> bool {
        self.insensitive
    }

    /// Applies the map's normalization to `name`.
    #[must_use]
    pub fn normalize(&self, name: &str) -> String {
        if self.insensitive {
            name.to_lowercase()
        } else {
            name.to_string()
        }
    }

    /// Inserts a value, returning the previous value stored under the same name.
    /// The position of an existing entry is kept.
    pub fn insert(&mut self, name: &str, value: V) -> Option<V> {
        let name = self.normalize(name);
        self.entries.insert(name, value)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&V> {
        if self.insensitive {
            self.entries.get(&name.to_lowercase())
        } else {
            self.entries.get(name)
        }
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut V> {
        let name = self.normalize(name);
        self.entries.get_mut(&name)
    }

    /// Returns the value for `name`, inserting the result of `make` first when absent.
    pub fn get_or_insert_with<F>(&mut self, name: &str, make: F) -> &mut V
    where
        F: FnOnce(String) -> V,
    {
        let name = self.normalize(name);
        match self.entries.entry(name) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let value = make(entry.key().clone());
                entry.insert(value)
            }
        }
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Removes an entry, keeping the order of the remaining ones.
    pub fn remove(&mut self, name: &str) -> Option<V> {
        let name = self.normalize(name);
        self.entries.shift_remove(&name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns an iterator over the stored (normalized) names, in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Returns an iterator over the values of the map, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, V> {
        self.entries.values()
    }

    pub fn values_mut(&mut self) -> indexmap::map::ValuesMut<'_, String, V> {
        self.entries.values_mut()
    }

    /// Returns an iterator over the name-value pairs of the map, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, V> {
        self.entries.iter()
    }
}

impl<V> Default for NameMap<V> {
    fn default() -> Self {
        Self::new(false)
    }
}

impl<V> IntoIterator for NameMap<V> {
    type Item = (String, V);
    type IntoIter = indexmap::map::IntoIter<String, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a, V> IntoIterator for &'a NameMap<V> {
    type Item = (&'a String, &'a V);
    type IntoIter = indexmap::map::Iter<'a, String, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
