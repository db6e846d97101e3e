//! Serde bridge: build a [`Value`] from any `Serialize` type.
//!
//! Shapes follow serde_json's data model (structs become mappings, enums are
//! externally tagged, `None` and unit become `Null`). Shapes the value model
//! cannot hold, such as byte strings and non-string map keys, fail with
//! `UnsupportedType`.

use crate::error::{CanonicalizationError, Error, Result};
use crate::path::{push_index, push_key, ROOT};
use crate::value::{Mapping, Value};
use serde::ser::{self, Serialize};

/// Convert `value` into the value model.
pub fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    value.serialize(ValueSerializer::new(ROOT.to_owned()))
}

fn unsupported(type_name: &str, path: &str) -> Error {
    Error::Canonicalization(CanonicalizationError::UnsupportedType {
        type_name: type_name.to_owned(),
        path: path.to_owned(),
    })
}

fn child_key(path: &str, key: &str) -> String {
    let mut child = path.to_owned();
    push_key(&mut child, key);
    child
}

fn child_index(path: &str, index: usize) -> String {
    let mut child = path.to_owned();
    push_index(&mut child, index);
    child
}

struct ValueSerializer {
    path: String,
}

impl ValueSerializer {
    fn new(path: String) -> Self {
        Self { path }
    }
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = SequenceBuilder;
    type SerializeTuple = SequenceBuilder;
    type SerializeTupleStruct = SequenceBuilder;
    type SerializeTupleVariant = TaggedSequenceBuilder;
    type SerializeMap = MappingBuilder;
    type SerializeStruct = MappingBuilder;
    type SerializeStructVariant = TaggedMappingBuilder;

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i128(self, v: i128) -> Result<Value> {
        Ok(Value::Integer(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u128(self, v: u128) -> Result<Value> {
        i128::try_from(v)
            .map(Value::Integer)
            .map_err(|_| unsupported("u128 above i128::MAX", &self.path))
    }

    fn serialize_f32(self, v: f32) -> Result<Value> {
        Ok(Value::Float(f64::from(v)))
    }

    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(Value::Float(v))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::Text(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::Text(v.to_owned()))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<Value> {
        Err(unsupported("bytes", &self.path))
    }

    fn serialize_none(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<Value> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::Text(variant.to_owned()))
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Value> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value> {
        let inner = value.serialize(ValueSerializer::new(child_key(&self.path, variant)))?;
        Ok(Value::mapping([(variant, inner)]))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SequenceBuilder> {
        Ok(SequenceBuilder {
            items: Vec::with_capacity(len.unwrap_or(0)),
            path: self.path,
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SequenceBuilder> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SequenceBuilder> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<TaggedSequenceBuilder> {
        Ok(TaggedSequenceBuilder {
            variant,
            inner: SequenceBuilder {
                items: Vec::with_capacity(len),
                path: child_key(&self.path, variant),
            },
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<MappingBuilder> {
        Ok(MappingBuilder {
            entries: Mapping::new(),
            next_key: None,
            path: self.path,
        })
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<MappingBuilder> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<TaggedMappingBuilder> {
        Ok(TaggedMappingBuilder {
            variant,
            inner: MappingBuilder {
                entries: Mapping::new(),
                next_key: None,
                path: child_key(&self.path, variant),
            },
        })
    }
}

struct SequenceBuilder {
    items: Vec<Value>,
    path: String,
}

impl SequenceBuilder {
    fn push<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        let path = child_index(&self.path, self.items.len());
        self.items.push(value.serialize(ValueSerializer::new(path))?);
        Ok(())
    }
}

impl ser::SerializeSeq for SequenceBuilder {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Sequence(self.items))
    }
}

impl ser::SerializeTuple for SequenceBuilder {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Sequence(self.items))
    }
}

impl ser::SerializeTupleStruct for SequenceBuilder {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Sequence(self.items))
    }
}

struct TaggedSequenceBuilder {
    variant: &'static str,
    inner: SequenceBuilder,
}

impl ser::SerializeTupleVariant for TaggedSequenceBuilder {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.inner.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(Value::mapping([(
            self.variant,
            Value::Sequence(self.inner.items),
        )]))
    }
}

struct MappingBuilder {
    entries: Mapping,
    next_key: Option<String>,
    path: String,
}

impl MappingBuilder {
    fn insert<T: Serialize + ?Sized>(&mut self, key: String, value: &T) -> Result<()> {
        let inner = value.serialize(ValueSerializer::new(child_key(&self.path, &key)))?;
        self.entries.insert(key, inner);
        Ok(())
    }
}

impl ser::SerializeMap for MappingBuilder {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<()> {
        match key.serialize(ValueSerializer::new(self.path.clone()))? {
            Value::Text(key) => {
                self.next_key = Some(key);
                Ok(())
            }
            other => Err(unsupported(
                &format!("{} mapping key", other.kind()),
                &self.path,
            )),
        }
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        let key = self
            .next_key
            .take()
            .ok_or_else(|| Error::Serialization("map value without a key".into()))?;
        self.insert(key, value)
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Mapping(self.entries))
    }
}

impl ser::SerializeStruct for MappingBuilder {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<()> {
        self.insert(key.to_owned(), value)
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Mapping(self.entries))
    }
}

struct TaggedMappingBuilder {
    variant: &'static str,
    inner: MappingBuilder,
}

impl ser::SerializeStructVariant for TaggedMappingBuilder {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<()> {
        self.inner.insert(key.to_owned(), value)
    }

    fn end(self) -> Result<Value> {
        Ok(Value::mapping([(
            self.variant,
            Value::Mapping(self.inner.entries),
        )]))
    }
}
