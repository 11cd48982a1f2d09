//! Encoding records into sections.
//!
//! A record is first serialized into an intermediate tree of field values,
//! then written key by key. Scalars become text, lists are joined with `,`,
//! `None` is left out and nested records go to the section named after
//! their field.
//!
//! ```rust
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Bots {
//!     bot_quota: u8,
//!     bot_difficulty: u8,
//!     bot_names: Vec<&'static str>,
//! }
//!
//! let mut cfg = csgo_cfg::empty();
//! let bots = Bots { bot_quota: 10, bot_difficulty: 2, bot_names: vec!["Albert", "Bert"] };
//! cfg.reflect_section_from("bots", &bots).unwrap();
//! assert_eq!(cfg.key("bots", "bot_names").unwrap().value(), "Albert,Bert");
//! ```

use crate::convert::LIST_DELIMITER;
use crate::{name, Error, File, Result};
use serde::ser::{self, Impossible, Serialize};
use tracing::trace;

/// Writes every field of `source` into `section`, overwriting existing keys.
pub(crate) fn reflect_into<T>(file: &mut File, section: &str, source: &T) -> Result<()>
where
    T: Serialize + ?Sized,
{
    let fields = record(source)?;
    write_record(file, section, fields, false)
}

/// Like [`reflect_into`], but keys holding serialized strings are marked
/// quoted, so they read back as text whatever their spelling.
pub(crate) fn reflect_scratch<T>(file: &mut File, section: &str, source: &T) -> Result<()>
where
    T: Serialize + ?Sized,
{
    let fields = record(source)?;
    write_record(file, section, fields, true)
}

fn record<T: Serialize + ?Sized>(source: &T) -> Result<Vec<(String, FieldValue)>> {
    match source.serialize(FieldSerializer::root())? {
        FieldValue::Record(fields) => Ok(fields),
        FieldValue::Text(_) | FieldValue::Verbatim(_) | FieldValue::Absent => {
            Err(Error::NotAddressable("a scalar".to_string()))
        }
    }
}

fn write_record(
    file: &mut File,
    section: &str,
    fields: Vec<(String, FieldValue)>,
    mark_text: bool,
) -> Result<()> {
    file.section_mut(section);
    for (field, value) in fields {
        let key = name::apply(file.name_mapper, &field);
        match value {
            FieldValue::Absent => trace!(section, %field, "omitting empty field"),
            FieldValue::Text(text) => {
                trace!(section, %key, %text, "writing key");
                file.section_mut(section).new_key(&key, &text)?;
            }
            FieldValue::Verbatim(text) => {
                trace!(section, %key, %text, "writing key");
                let entry = file.section_mut(section).new_key(&key, &text)?;
                if mark_text {
                    entry.set_parsed(text, true);
                }
            }
            FieldValue::Record(inner) => write_record(file, &key, inner, mark_text)?,
        }
    }
    Ok(())
}

/// A serialized field, before it is written to the document.
#[derive(Debug, Clone, PartialEq)]
enum FieldValue {
    Text(String),
    /// A serialized string: text even when it looks like a number.
    Verbatim(String),
    /// `None`, left out of the document.
    Absent,
    Record(Vec<(String, FieldValue)>),
}

struct FieldSerializer<'a> {
    field: &'a str,
    root: bool,
}

impl<'a> FieldSerializer<'a> {
    fn root() -> Self {
        FieldSerializer {
            field: "",
            root: true,
        }
    }

    fn field(field: &'a str) -> Self {
        FieldSerializer { field, root: false }
    }

    fn text<D: ToString>(self, kind: &str, value: D) -> Result<FieldValue> {
        if self.root {
            return Err(Error::NotAddressable(kind.to_string()));
        }
        Ok(FieldValue::Text(value.to_string()))
    }

    fn unsupported(self, kind: &str) -> Error {
        if self.root {
            Error::NotAddressable(kind.to_string())
        } else {
            Error::unsupported(self.field, kind)
        }
    }
}

impl<'a> ser::Serializer for FieldSerializer<'a> {
    type Ok = FieldValue;
    type Error = Error;

    type SerializeSeq = ListSerializer<'a>;
    type SerializeTuple = Impossible<FieldValue, Error>;
    type SerializeTupleStruct = Impossible<FieldValue, Error>;
    type SerializeTupleVariant = Impossible<FieldValue, Error>;
    type SerializeMap = RecordSerializer;
    type SerializeStruct = RecordSerializer;
    type SerializeStructVariant = Impossible<FieldValue, Error>;

    fn serialize_bool(self, v: bool) -> Result<FieldValue> {
        self.text("bool", v)
    }

    fn serialize_i8(self, v: i8) -> Result<FieldValue> {
        self.text("integer", v)
    }

    fn serialize_i16(self, v: i16) -> Result<FieldValue> {
        self.text("integer", v)
    }

    fn serialize_i32(self, v: i32) -> Result<FieldValue> {
        self.text("integer", v)
    }

    fn serialize_i64(self, v: i64) -> Result<FieldValue> {
        self.text("integer", v)
    }

    fn serialize_i128(self, v: i128) -> Result<FieldValue> {
        self.text("integer", v)
    }

    fn serialize_u8(self, v: u8) -> Result<FieldValue> {
        self.text("integer", v)
    }

    fn serialize_u16(self, v: u16) -> Result<FieldValue> {
        self.text("integer", v)
    }

    fn serialize_u32(self, v: u32) -> Result<FieldValue> {
        self.text("integer", v)
    }

    fn serialize_u64(self, v: u64) -> Result<FieldValue> {
        self.text("integer", v)
    }

    fn serialize_u128(self, v: u128) -> Result<FieldValue> {
        self.text("integer", v)
    }

    fn serialize_f32(self, v: f32) -> Result<FieldValue> {
        self.text("float", v)
    }

    fn serialize_f64(self, v: f64) -> Result<FieldValue> {
        self.text("float", v)
    }

    fn serialize_char(self, _v: char) -> Result<FieldValue> {
        Err(self.unsupported("char"))
    }

    fn serialize_str(self, v: &str) -> Result<FieldValue> {
        if self.root {
            return Err(Error::NotAddressable("string".to_string()));
        }
        Ok(FieldValue::Verbatim(v.to_string()))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<FieldValue> {
        Err(self.unsupported("bytes"))
    }

    fn serialize_none(self) -> Result<FieldValue> {
        if self.root {
            return Err(Error::NotAddressable("None".to_string()));
        }
        Ok(FieldValue::Absent)
    }

    fn serialize_some<T>(self, value: &T) -> Result<FieldValue>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<FieldValue> {
        Err(self.unsupported("unit"))
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<FieldValue> {
        Err(self.unsupported(name))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<FieldValue> {
        Err(self.unsupported("enum"))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<FieldValue>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<FieldValue>
    where
        T: ?Sized + Serialize,
    {
        Err(self.unsupported("enum"))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<ListSerializer<'a>> {
        if self.root {
            return Err(Error::NotAddressable("sequence".to_string()));
        }
        Ok(ListSerializer {
            field: self.field,
            items: Vec::new(),
        })
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(self.unsupported("tuple"))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(self.unsupported("tuple struct"))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(self.unsupported("enum"))
    }

    /// Maps are accepted as the whole source only, which is also how serde
    /// presents records with `#[serde(flatten)]` fields.
    fn serialize_map(self, _len: Option<usize>) -> Result<RecordSerializer> {
        if !self.root {
            return Err(self.unsupported("map"));
        }
        Ok(RecordSerializer::default())
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<RecordSerializer> {
        Ok(RecordSerializer::default())
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(self.unsupported("enum"))
    }
}

struct ListSerializer<'a> {
    field: &'a str,
    items: Vec<String>,
}

impl ser::SerializeSeq for ListSerializer<'_> {
    type Ok = FieldValue;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        match value.serialize(FieldSerializer::field(self.field))? {
            FieldValue::Text(text) | FieldValue::Verbatim(text) => self.items.push(text),
            FieldValue::Absent => {}
            FieldValue::Record(_) => return Err(Error::unsupported(self.field, "list of records")),
        }
        Ok(())
    }

    fn end(self) -> Result<FieldValue> {
        Ok(FieldValue::Text(
            self.items.join(&LIST_DELIMITER.to_string()),
        ))
    }
}

#[derive(Default)]
struct RecordSerializer {
    fields: Vec<(String, FieldValue)>,
    pending_key: Option<String>,
}

impl ser::SerializeStruct for RecordSerializer {
    type Ok = FieldValue;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let value = value.serialize(FieldSerializer::field(key))?;
        self.fields.push((key.to_string(), value));
        Ok(())
    }

    fn end(self) -> Result<FieldValue> {
        Ok(FieldValue::Record(self.fields))
    }
}

impl ser::SerializeMap for RecordSerializer {
    type Ok = FieldValue;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        match key.serialize(FieldSerializer::field(""))? {
            FieldValue::Text(text) | FieldValue::Verbatim(text) => {
                self.pending_key = Some(text);
                Ok(())
            }
            _ => Err(Error::custom("map keys must be text")),
        }
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .pending_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        let value = value.serialize(FieldSerializer::field(&key))?;
        self.fields.push((key, value));
        Ok(())
    }

    fn end(self) -> Result<FieldValue> {
        Ok(FieldValue::Record(self.fields))
    }
}
