//! Decoding sections into records.
//!
//! A section is presented to serde as a map whose keys are the record's
//! field names. Every field is looked up under its mapped name first (see
//! [`NameMapper`](crate::NameMapper)), then under the field name itself.
//! Keys whose value is empty count as absent.
//!
//! [`File::map_to`](crate::File::map_to) decodes in place. The target is
//! first encoded into a scratch document, zero values included, and any
//! field the real document does not provide is read back from there. Fields
//! marked `#[serde(skip)]` are left untouched. [`File::decode`](crate::File::decode)
//! has no such fallback, so absent fields need `#[serde(default)]` or an
//! `Option`.
//!
//! Records with `#[serde(flatten)]` fields are read key by key, and serde
//! has to guess each value's type from its spelling. Under `map_to` the
//! scratch document settles the guess: a field that encodes as text is
//! always read as text, and mapped key names are matched back to their
//! fields. Serde rebuilds such records whole, so their skipped fields fall
//! back to `Default`.
//!
//! ## Usage
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, Debug, PartialEq)]
//! struct Economy {
//!     cash_team_win_by_time_running_out_bomb: u32,
//!     mp_startmoney: u32,
//! }
//!
//! let cfg = csgo_cfg::load("cash_team_win_by_time_running_out_bomb 3250").unwrap();
//! let mut economy = Economy { cash_team_win_by_time_running_out_bomb: 0, mp_startmoney: 800 };
//! cfg.map_to(&mut economy).unwrap();
//! assert_eq!(economy, Economy { cash_team_win_by_time_running_out_bomb: 3250, mp_startmoney: 800 });
//! ```
//!
//! ## Field kinds
//!
//! - text, booleans, integers of every width, floats
//! - anything that deserializes from a string, such as chrono timestamps
//! - `Vec<T>`, read from a `,` separated value with each element trimmed
//! - `Option<T>`, `None` when the key is absent
//! - nested records, read from the section named after the field
//!
//! Other kinds fail with [`Error::UnsupportedFieldKind`]. A value that does
//! not convert fails with [`Error::TypeConversion`].

use crate::convert::{parse_bool, split_list, LIST_DELIMITER};
use crate::zero::KeepZeroValues;
use crate::{name, ser, Error, File, Key, Result};
use serde::de::{self, DeserializeOwned, IntoDeserializer, Visitor};
use serde::Serialize;
use tracing::trace;

/// Overwrites `target` with the contents of `section`, keeping the current
/// value of every field the document leaves out.
pub(crate) fn map_to<T>(file: &File, section: &str, target: &mut T) -> Result<()>
where
    T: Serialize + DeserializeOwned,
{
    file.get_section(section)?;
    let mut current = File::new(file.options().clone());
    {
        let _keep = KeepZeroValues::enter();
        ser::reflect_scratch(&mut current, section, &*target).map_err(|err| match err {
            Error::NotAddressable(kind) => Error::InvalidMapTarget(kind),
            other => other,
        })?;
    }

    let lookup = Lookup {
        file,
        fallback: Some(&current),
    };
    T::deserialize_in_place(SectionDeserializer::new(lookup, Scope::of(section)), target)
}

/// Builds a `T` from `section` alone.
pub(crate) fn from_section<T: DeserializeOwned>(file: &File, section: &str) -> Result<T> {
    file.get_section(section)?;
    let lookup = Lookup {
        file,
        fallback: None,
    };
    T::deserialize(SectionDeserializer::new(lookup, Scope::of(section)))
}

/// A section as named in the document and in the scratch copy of the target.
/// The scratch copy uses field names as written, never mapped ones.
#[derive(Debug, Clone)]
struct Scope {
    doc: String,
    raw: String,
}

impl Scope {
    fn of(section: &str) -> Self {
        Scope {
            doc: section.to_string(),
            raw: section.to_string(),
        }
    }
}

/// Where field values come from: the document, then the encoded target.
#[derive(Clone, Copy)]
struct Lookup<'a> {
    file: &'a File,
    fallback: Option<&'a File>,
}

impl<'a> Lookup<'a> {
    /// Candidate document names for a field: mapped first, then as written.
    fn names(&self, field: &str) -> Vec<String> {
        let mapped = name::apply(self.file.name_mapper, field);
        if mapped == field {
            vec![mapped]
        } else {
            vec![mapped, field.to_string()]
        }
    }

    fn document_key(&self, section: &str, names: &[String]) -> Option<&'a Key> {
        names.iter().find_map(|n| {
            self.file
                .key(section, n)
                .filter(|key| !key.value().is_empty())
        })
    }

    /// The value for `field` and whether it is text no matter its spelling.
    fn value(&self, scope: &Scope, field: &str) -> Option<(String, bool)> {
        let current = self.fallback.and_then(|f| f.key(&scope.raw, field));
        let verbatim = current.map_or(false, Key::is_quoted);
        match self.document_key(&scope.doc, &self.names(field)) {
            Some(key) => Some((key.value().to_string(), key.is_quoted() || verbatim)),
            None => current.map(|key| (key.value().to_string(), key.is_quoted())),
        }
    }

    fn child(&self, field: &str) -> Option<Scope> {
        let names = self.names(field);
        let in_doc = names.iter().find(|n| self.file.has_section(n));
        let in_current = self.fallback.map_or(false, |f| f.has_section(field));
        match in_doc {
            Some(doc) => Some(Scope {
                doc: doc.clone(),
                raw: field.to_string(),
            }),
            None if in_current => Some(Scope {
                doc: names[0].clone(),
                raw: field.to_string(),
            }),
            None => None,
        }
    }

    /// Every key a map-shaped record can see: the target's own fields
    /// first, then document keys no field claims.
    fn entries(&self, scope: &Scope) -> Vec<(String, (String, bool))> {
        let mut entries = Vec::new();
        let mut claimed: Vec<String> = Vec::new();
        let fields: Vec<String> = self
            .fallback
            .and_then(|f| f.section(&scope.raw))
            .map(|section| section.keys().map(|key| key.name().to_string()).collect())
            .unwrap_or_default();
        for field in fields {
            claimed.extend(self.names(&field));
            if let Some(value) = self.value(scope, &field) {
                entries.push((field, value));
            }
        }
        if let Some(section) = self.file.section(&scope.doc) {
            for key in section.keys() {
                if claimed.iter().any(|n| n == key.name()) || key.value().is_empty() {
                    continue;
                }
                claimed.push(key.name().to_string());
                entries.push((
                    key.name().to_string(),
                    (key.value().to_string(), key.is_quoted()),
                ));
            }
        }
        entries
    }
}

/// Presents a section as a map of its keys.
struct SectionDeserializer<'a> {
    lookup: Lookup<'a>,
    scope: Scope,
}

impl<'a> SectionDeserializer<'a> {
    fn new(lookup: Lookup<'a>, scope: Scope) -> Self {
        SectionDeserializer { lookup, scope }
    }
}

macro_rules! reject_target {
    ($($method:ident => $kind:literal),* $(,)?) => {
        $(
            fn $method<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value> {
                Err(Error::InvalidMapTarget($kind.to_string()))
            }
        )*
    };
}

impl<'de, 'a> de::Deserializer<'de> for SectionDeserializer<'a> {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        de::Deserializer::deserialize_map(self, visitor)
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let entries = self.lookup.entries(&self.scope);
        trace!(section = %self.scope.doc, keys = entries.len(), "mapping section as map");
        visitor.visit_map(KeysAccess {
            lookup: self.lookup,
            entries: entries.into_iter(),
            pending: None,
        })
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_map(FieldsAccess {
            lookup: self.lookup,
            scope: self.scope,
            fields: fields.iter(),
            pending: None,
        })
    }
    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _visitor: V,
    ) -> Result<V::Value> {
        Err(Error::InvalidMapTarget("unit struct".to_string()))
    }

    fn deserialize_tuple<V: Visitor<'de>>(self, _len: usize, _visitor: V) -> Result<V::Value> {
        Err(Error::InvalidMapTarget("tuple".to_string()))
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _len: usize,
        _visitor: V,
    ) -> Result<V::Value> {
        Err(Error::InvalidMapTarget("tuple struct".to_string()))
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value> {
        Err(Error::InvalidMapTarget("enum".to_string()))
    }

    reject_target! {
        deserialize_bool => "bool",
        deserialize_i8 => "i8",
        deserialize_i16 => "i16",
        deserialize_i32 => "i32",
        deserialize_i64 => "i64",
        deserialize_u8 => "u8",
        deserialize_u16 => "u16",
        deserialize_u32 => "u32",
        deserialize_u64 => "u64",
        deserialize_f32 => "f32",
        deserialize_f64 => "f64",
        deserialize_char => "char",
        deserialize_str => "str",
        deserialize_string => "string",
        deserialize_bytes => "bytes",
        deserialize_byte_buf => "bytes",
        deserialize_option => "option",
        deserialize_unit => "unit",
        deserialize_seq => "sequence",
        deserialize_identifier => "identifier",
        deserialize_ignored_any => "ignored value",
    }
}

/// Yields the declared fields of a record that the section can provide.
struct FieldsAccess<'a> {
    lookup: Lookup<'a>,
    scope: Scope,
    fields: std::slice::Iter<'static, &'static str>,
    pending: Option<FieldDeserializer<'a>>,
}

impl<'de, 'a> de::MapAccess<'de> for FieldsAccess<'a> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        for &field in self.fields.by_ref() {
            let value = self.lookup.value(&self.scope, field);
            let child = self.lookup.child(field);
            if value.is_none() && child.is_none() {
                trace!(section = %self.scope.doc, field, "no key for field");
                continue;
            }
            trace!(section = %self.scope.doc, field, ?value, "mapping field");
            self.pending = Some(FieldDeserializer {
                lookup: self.lookup,
                field: field.to_string(),
                value,
                child,
            });
            return seed.deserialize(field.into_deserializer()).map(Some);
        }
        Ok(None)
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.pending.take() {
            Some(field) => seed.deserialize(field),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }
}

/// Yields the keys of a section one by one, for maps and flattened records.
struct KeysAccess<'a> {
    lookup: Lookup<'a>,
    entries: std::vec::IntoIter<(String, (String, bool))>,
    pending: Option<FieldDeserializer<'a>>,
}

impl<'de, 'a> de::MapAccess<'de> for KeysAccess<'a> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.entries.next() {
            Some((key, value)) => {
                self.pending = Some(FieldDeserializer {
                    lookup: self.lookup,
                    field: key.clone(),
                    value: Some(value),
                    child: None,
                });
                seed.deserialize(key.into_deserializer()).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.pending.take() {
            Some(field) => seed.deserialize(field),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.entries.len())
    }
}

/// One field of a record: a key value, a child section, or both.
struct FieldDeserializer<'a> {
    lookup: Lookup<'a>,
    field: String,
    value: Option<(String, bool)>,
    child: Option<Scope>,
}

impl FieldDeserializer<'_> {
    fn into_text(self) -> Result<Text> {
        match self.value {
            Some((raw, quoted)) => Ok(Text {
                field: self.field,
                raw,
                quoted,
            }),
            None => Err(Error::conversion(&self.field, "", "no value for field")),
        }
    }
}

macro_rules! forward_to_text {
    ($($method:ident)*) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
                de::Deserializer::$method(self.into_text()?, visitor)
            }
        )*
    };
}

impl<'de, 'a> de::Deserializer<'de> for FieldDeserializer<'a> {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        if let (None, Some(child)) = (&self.value, self.child.clone()) {
            let section = SectionDeserializer::new(self.lookup, child);
            return de::Deserializer::deserialize_map(section, visitor);
        }
        de::Deserializer::deserialize_any(self.into_text()?, visitor)
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let text = self.into_text()?;
        let items: Vec<String> = split_list(&text.raw, LIST_DELIMITER)
            .into_iter()
            .map(str::to_string)
            .collect();
        visitor.visit_seq(ListAccess {
            field: text.field,
            items: items.into_iter(),
        })
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        match self.child {
            Some(child) => de::Deserializer::deserialize_struct(
                SectionDeserializer::new(self.lookup, child),
                name,
                fields,
                visitor,
            ),
            None => Err(Error::unsupported(&self.field, name)),
        }
    }

    fn deserialize_map<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value> {
        Err(Error::unsupported(&self.field, "map"))
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        de::Deserializer::deserialize_unit_struct(self.into_text()?, name, visitor)
    }

    fn deserialize_tuple<V: Visitor<'de>>(self, len: usize, visitor: V) -> Result<V::Value> {
        de::Deserializer::deserialize_tuple(self.into_text()?, len, visitor)
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        len: usize,
        visitor: V,
    ) -> Result<V::Value> {
        de::Deserializer::deserialize_tuple_struct(self.into_text()?, name, len, visitor)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        de::Deserializer::deserialize_enum(self.into_text()?, name, variants, visitor)
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_unit()
    }

    forward_to_text! {
        deserialize_bool
        deserialize_i8 deserialize_i16 deserialize_i32 deserialize_i64 deserialize_i128
        deserialize_u8 deserialize_u16 deserialize_u32 deserialize_u64 deserialize_u128
        deserialize_f32 deserialize_f64
        deserialize_char deserialize_str deserialize_string
        deserialize_bytes deserialize_byte_buf
        deserialize_unit deserialize_identifier
    }
}

/// Elements of a list value.
struct ListAccess {
    field: String,
    items: std::vec::IntoIter<String>,
}

impl<'de> de::SeqAccess<'de> for ListAccess {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.items.next() {
            Some(raw) => seed
                .deserialize(Text {
                    field: self.field.clone(),
                    raw,
                    quoted: false,
                })
                .map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.items.len())
    }
}

/// A single text value converted on demand.
struct Text {
    field: String,
    raw: String,
    quoted: bool,
}

impl Text {
    fn conversion<R: std::fmt::Display>(&self, reason: R) -> Error {
        Error::conversion(&self.field, &self.raw, reason)
    }

    fn unsupported(&self, kind: &str) -> Error {
        Error::unsupported(&self.field, kind)
    }

    /// Turns a visitor's own failure (a chrono parse error, say) into a
    /// conversion error naming the field.
    fn visited<T>(field: &str, raw: &str, result: Result<T>) -> Result<T> {
        result.map_err(|err| match err {
            Error::Custom(reason) => Error::conversion(field, raw, reason),
            other => other,
        })
    }
}

macro_rules! parse_number {
    ($($method:ident => $ty:ty, $visit:ident;)*) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
                let number: $ty = self.raw.trim().parse().map_err(|e| self.conversion(e))?;
                visitor.$visit(number)
            }
        )*
    };
}

macro_rules! unsupported_kind {
    ($($method:ident => $kind:literal),* $(,)?) => {
        $(
            fn $method<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value> {
                Err(self.unsupported($kind))
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for Text {
    type Error = Error;

    /// Unquoted values are typed by their spelling: integers, then floats,
    /// then `true`/`false`. Everything else, and every quoted value, is text.
    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let raw = self.raw.trim();
        if !self.quoted {
            if let Ok(n) = raw.parse::<i64>() {
                return visitor.visit_i64(n);
            }
            if let Ok(n) = raw.parse::<u64>() {
                return visitor.visit_u64(n);
            }
            if let Ok(n) = raw.parse::<f64>() {
                return visitor.visit_f64(n);
            }
            if raw.eq_ignore_ascii_case("true") || raw.eq_ignore_ascii_case("false") {
                return visitor.visit_bool(raw.eq_ignore_ascii_case("true"));
            }
        }
        de::Deserializer::deserialize_string(self, visitor)
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match parse_bool(&self.raw) {
            Some(b) => visitor.visit_bool(b),
            None => Err(self.conversion("not a boolean")),
        }
    }

    parse_number! {
        deserialize_i8 => i8, visit_i8;
        deserialize_i16 => i16, visit_i16;
        deserialize_i32 => i32, visit_i32;
        deserialize_i64 => i64, visit_i64;
        deserialize_i128 => i128, visit_i128;
        deserialize_u8 => u8, visit_u8;
        deserialize_u16 => u16, visit_u16;
        deserialize_u32 => u32, visit_u32;
        deserialize_u64 => u64, visit_u64;
        deserialize_u128 => u128, visit_u128;
        deserialize_f32 => f32, visit_f32;
        deserialize_f64 => f64, visit_f64;
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        Self::visited(&self.field, &self.raw, visitor.visit_str(&self.raw))
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let Text { field, raw, .. } = self;
        let result = visitor.visit_str(&raw);
        Self::visited(&field, &raw, result)
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        de::Deserializer::deserialize_str(self, visitor)
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _visitor: V,
    ) -> Result<V::Value> {
        Err(self.unsupported("unit struct"))
    }

    fn deserialize_tuple<V: Visitor<'de>>(self, _len: usize, _visitor: V) -> Result<V::Value> {
        Err(self.unsupported("tuple"))
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _len: usize,
        _visitor: V,
    ) -> Result<V::Value> {
        Err(self.unsupported("tuple struct"))
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        _fields: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value> {
        Err(self.unsupported(name))
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value> {
        Err(self.unsupported("enum"))
    }

    unsupported_kind! {
        deserialize_char => "char",
        deserialize_bytes => "bytes",
        deserialize_byte_buf => "bytes",
        deserialize_unit => "unit",
        deserialize_seq => "nested list",
        deserialize_map => "map",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::HashMap;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Server {
        host: String,
        port: u16,
        #[serde(default)]
        tags: Vec<String>,
    }

    fn load(text: &str) -> File {
        crate::load(text).unwrap()
    }

    #[test]
    fn test_decode_leaf_kinds() {
        let cfg = load("host localhost\nport 27015\ntags a, b,c\n");
        let server: Server = cfg.decode().unwrap();
        assert_eq!(
            server,
            Server {
                host: "localhost".to_string(),
                port: 27015,
                tags: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            }
        );
    }

    #[test]
    fn test_decode_missing_field_without_default() {
        let cfg = load("host localhost\n");
        assert!(cfg.decode::<Server>().is_err());
    }

    #[test]
    fn test_map_to_keeps_current_values() {
        let cfg = load("host \"\"\nport 27016\n");
        let mut server = Server {
            host: "example.com".to_string(),
            port: 1,
            tags: vec!["x".to_string()],
        };
        cfg.map_to(&mut server).unwrap();
        assert_eq!(server.host, "example.com");
        assert_eq!(server.port, 27016);
        assert_eq!(server.tags, vec!["x"]);
    }

    #[test]
    fn test_map_to_leaves_skipped_fields_alone() {
        #[derive(Debug, Serialize, Deserialize)]
        struct Session {
            port: u16,
            #[serde(skip)]
            connections: u32,
        }
        let cfg = load("port 27016\n");
        let mut session = Session {
            port: 1,
            connections: 12,
        };
        cfg.map_to(&mut session).unwrap();
        assert_eq!(session.port, 27016);
        assert_eq!(session.connections, 12);
    }

    #[test]
    fn test_map_to_fills_zero_fields_left_out_on_write() {
        #[derive(Debug, Serialize, Deserialize)]
        struct Limits {
            #[serde(skip_serializing_if = "crate::is_zero")]
            maxplayers: u32,
            #[serde(skip_serializing_if = "crate::is_zero")]
            password: String,
            tickrate: u32,
        }
        let cfg = load("tickrate 128\n");
        let mut limits = Limits {
            maxplayers: 0,
            password: String::new(),
            tickrate: 64,
        };
        cfg.map_to(&mut limits).unwrap();
        assert_eq!(limits.maxplayers, 0);
        assert_eq!(limits.password, "");
        assert_eq!(limits.tickrate, 128);
    }

    #[test]
    fn test_flattened_text_keeps_its_spelling() {
        #[derive(Debug, Default, Serialize, Deserialize)]
        struct Release {
            name: String,
            #[serde(flatten)]
            build: Build,
        }
        #[derive(Debug, Default, Serialize, Deserialize)]
        struct Build {
            version: String,
            channel: String,
            downloads: u32,
        }
        let cfg = load("name cfg\nversion 1\nchannel true\ndownloads 40\n");
        let mut release = Release::default();
        cfg.map_to(&mut release).unwrap();
        assert_eq!(release.name, "cfg");
        assert_eq!(release.build.version, "1");
        assert_eq!(release.build.channel, "true");
        assert_eq!(release.build.downloads, 40);
    }

    #[test]
    fn test_flattened_fields_use_the_name_mapper() {
        #[derive(Debug, Default, Serialize, Deserialize)]
        struct Package {
            package_name: String,
            #[serde(flatten)]
            stats: Stats,
        }
        #[derive(Debug, Default, Serialize, Deserialize)]
        struct Stats {
            kills: u32,
        }
        let mut cfg = load("PACKAGE_NAME cfg\nKILLS 3\n");
        cfg.name_mapper = Some(crate::all_caps_underscore);
        let mut package = Package::default();
        cfg.map_to(&mut package).unwrap();
        assert_eq!(package.package_name, "cfg");
        assert_eq!(package.stats.kills, 3);
    }

    #[test]
    fn test_overflow_is_a_conversion_error() {
        let cfg = load("host h\nport 70000\n");
        let err = cfg.decode::<Server>().unwrap_err();
        assert!(matches!(err, Error::TypeConversion { ref field, .. } if field == "port"));
    }

    #[test]
    fn test_decode_into_map() {
        let cfg = load("sv_cheats 0\nhostname \"my server\"\n");
        let map: HashMap<String, String> = cfg.decode().unwrap();
        assert_eq!(map["hostname"], "my server");
        assert_eq!(map["sv_cheats"], "0");
    }

    #[test]
    fn test_non_record_target() {
        let cfg = load("a 1\n");
        let mut n = 5u32;
        assert!(matches!(
            cfg.map_to(&mut n),
            Err(Error::InvalidMapTarget(_))
        ));
        assert!(matches!(
            cfg.decode::<Vec<String>>(),
            Err(Error::InvalidMapTarget(_))
        ));
    }

    #[test]
    fn test_unknown_section() {
        let cfg = load("a 1\n");
        let mut server = Server::default();
        assert!(matches!(
            cfg.map_section_to("404", &mut server),
            Err(Error::SectionNotFound(_))
        ));
    }
}
