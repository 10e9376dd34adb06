use enum_kinds::EnumKind;
use from_variants::FromVariants;
use std::collections::HashMap;
use zbus::zvariant::{self, Array, Dict, ObjectPath, Signature, StructureBuilder};

/// A dynamically-typed value as carried on the bus.
///
/// The variant is the wire type tag; use [`Value::kind`] when you only need the tag. Property
/// reads return one of these, and every typed accessor on `Player` decodes it explicitly.
#[derive(Debug, PartialEq, Clone, EnumKind, FromVariants)]
#[enum_kind(ValueKind)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    /// Value is a string.
    String(String),

    /// Value is a D-Bus object path.
    #[from_variants(skip)]
    ObjectPath(String),

    /// Value is a boolean.
    Bool(bool),

    /// Value is a 64-bit float.
    F64(f64),

    /// Value is a 16-bit integer.
    I16(i16),

    /// Value is a 32-bit integer.
    I32(i32),

    /// Value is a 64-bit integer.
    I64(i64),

    /// Value is an unsigned 8-bit integer.
    U8(u8),

    /// Value is an unsigned 16-bit integer.
    U16(u16),

    /// Value is an unsigned 32-bit integer.
    U32(u32),

    /// Value is an unsigned 64-bit integer.
    U64(u64),

    /// Value is an array of other values.
    Array(Vec<Value>),

    /// Value is a map of strings to other values.
    Map(HashMap<String, Value>),

    /// Value is explicitly wrapped in a variant when sent.
    ///
    /// Nested variants are flattened when reading from the bus, so this only shows up in values
    /// you build yourself.
    #[from_variants(skip)]
    Variant(Box<Value>),

    /// Unsupported value type.
    #[from_variants(skip)]
    Unsupported,
}

impl Value {
    /// Returns a simple enum representing the type of value that this value holds.
    pub fn kind(&self) -> ValueKind {
        ValueKind::from(self)
    }

    /// Wraps the value so it is sent as a D-Bus variant (`v`).
    pub fn into_variant(self) -> Value {
        Value::Variant(Box::new(self))
    }

    /// Returns the value as a `Some(&str)` if it is a string or an object path.
    pub fn as_str(&self) -> Option<&str> {
        match *self {
            Value::String(ref val) | Value::ObjectPath(ref val) => Some(val),
            _ => None,
        }
    }

    /// Returns the value as a `Some(Vec<&str>)` if it is an array. Any elements that are not
    /// strings will be ignored.
    pub fn as_str_array(&self) -> Option<Vec<&str>> {
        match *self {
            Value::Array(ref vec) => Some(vec.iter().flat_map(Value::as_str).collect()),
            _ => None,
        }
    }

    /// Returns the value as a `Some(bool)` if it is a `Value::Bool`, or `None` otherwise.
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Value::Bool(val) => Some(val),
            _ => None,
        }
    }

    /// Returns the value as a `Some(f64)` if it is a `Value::F64`, or `None` otherwise.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::F64(val) => Some(val),
            _ => None,
        }
    }

    /// Returns the value as a `Some(i64)` if it is a signed integer, or `None` otherwise.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::I64(val) => Some(val),
            Value::I32(val) => Some(i64::from(val)),
            Value::I16(val) => Some(i64::from(val)),
            _ => None,
        }
    }

    /// Returns the value as a `Some(u64)` if it is an unsigned integer, or `None` otherwise.
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Value::U64(val) => Some(val),
            Value::U32(val) => Some(u64::from(val)),
            Value::U16(val) => Some(u64::from(val)),
            Value::U8(val) => Some(u64::from(val)),
            _ => None,
        }
    }

    /// Returns the value as a `Some(&HashMap<String, Value>)` if it is a `Value::Map`.
    pub fn as_map(&self) -> Option<&HashMap<String, Value>> {
        match *self {
            Value::Map(ref val) => Some(val),
            _ => None,
        }
    }

    /// Returns the value as a `Some(&Vec<Value>)` if it is a `Value::Array`.
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match *self {
            Value::Array(ref val) => Some(val),
            _ => None,
        }
    }

    /// Consumes `self` and returns the inner map if it is a `Value::Map`.
    pub fn into_map(self) -> Option<HashMap<String, Value>> {
        match self {
            Value::Map(val) => Some(val),
            _ => None,
        }
    }

    /// Consumes `self` and returns the inner string if it is a string or an object path.
    pub fn into_string(self) -> Option<String> {
        match self {
            Value::String(val) | Value::ObjectPath(val) => Some(val),
            _ => None,
        }
    }

    /// Builds the wire representation of this value.
    ///
    /// Fails for `Value::Unsupported`, for object paths that are not valid D-Bus paths and for
    /// arrays whose elements do not share one type.
    pub(crate) fn to_wire(&self) -> zvariant::Result<zvariant::Value<'_>> {
        Ok(match self {
            Value::String(s) => zvariant::Value::from(s.as_str()),
            Value::ObjectPath(p) => zvariant::Value::from(ObjectPath::try_from(p.as_str())?),
            Value::Bool(v) => zvariant::Value::from(*v),
            Value::F64(v) => zvariant::Value::from(*v),
            Value::I16(v) => zvariant::Value::from(*v),
            Value::I32(v) => zvariant::Value::from(*v),
            Value::I64(v) => zvariant::Value::from(*v),
            Value::U8(v) => zvariant::Value::from(*v),
            Value::U16(v) => zvariant::Value::from(*v),
            Value::U32(v) => zvariant::Value::from(*v),
            Value::U64(v) => zvariant::Value::from(*v),
            Value::Variant(inner) => zvariant::Value::Value(Box::new(inner.to_wire()?)),
            Value::Array(items) => {
                let elements = items
                    .iter()
                    .map(Value::to_wire)
                    .collect::<zvariant::Result<Vec<_>>>()?;
                let signature = elements
                    .first()
                    .map(|first| first.value_signature().to_owned())
                    .unwrap_or_else(|| Signature::from_static_str_unchecked("v"));
                let mut array = Array::new(signature);
                for element in elements {
                    array.append(element)?;
                }
                zvariant::Value::Array(array)
            }
            Value::Map(map) => {
                let mut dict = Dict::new(
                    Signature::from_static_str_unchecked("s"),
                    Signature::from_static_str_unchecked("v"),
                );
                for (key, value) in map {
                    dict.append(
                        zvariant::Value::from(key.as_str()),
                        zvariant::Value::Value(Box::new(value.to_wire()?)),
                    )?;
                }
                zvariant::Value::Dict(dict)
            }
            Value::Unsupported => {
                return Err(zvariant::Error::Message(String::from(
                    "an unsupported value cannot be sent",
                )))
            }
        })
    }
}

/// Packs positional method arguments into a single message body.
pub(crate) fn build_body(args: &[Value]) -> zvariant::Result<zvariant::Structure<'_>> {
    let mut builder = StructureBuilder::new();
    for arg in args {
        builder = builder.append_field(arg.to_wire()?);
    }
    Ok(builder.build())
}

/// Fails with the first argument that has no wire representation.
pub(crate) fn check_encodable(args: &[Value]) -> zvariant::Result<()> {
    args.iter().try_for_each(|arg| arg.to_wire().map(drop))
}

impl<'a> From<&'a str> for Value {
    fn from(string: &'a str) -> Value {
        Value::String(String::from(string))
    }
}

impl<'a> From<zvariant::Value<'a>> for Value {
    fn from(value: zvariant::Value<'a>) -> Self {
        match value {
            zvariant::Value::Bool(v) => Value::Bool(v),
            zvariant::Value::U8(v) => Value::U8(v),
            zvariant::Value::I16(v) => Value::I16(v),
            zvariant::Value::U16(v) => Value::U16(v),
            zvariant::Value::I32(v) => Value::I32(v),
            zvariant::Value::U32(v) => Value::U32(v),
            zvariant::Value::I64(v) => Value::I64(v),
            zvariant::Value::U64(v) => Value::U64(v),
            zvariant::Value::F64(v) => Value::F64(v),

            zvariant::Value::Str(v) => Value::String(v.to_string()),
            zvariant::Value::Signature(v) => Value::String(v.to_string()),
            zvariant::Value::ObjectPath(v) => Value::ObjectPath(v.to_string()),

            zvariant::Value::Value(v) => Value::from(*v),

            zvariant::Value::Array(a) => {
                Value::Array(a.get().iter().cloned().map(Value::from).collect())
            }
            zvariant::Value::Dict(d) => {
                match HashMap::<String, zvariant::Value<'_>>::try_from(d) {
                    Ok(map) => Value::Map(
                        map.into_iter()
                            .map(|(key, value)| (key, Value::from(value)))
                            .collect(),
                    ),
                    Err(_) => Value::Unsupported,
                }
            }

            _ => Value::Unsupported,
        }
    }
}
