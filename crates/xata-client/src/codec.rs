//! Untagged union codec.
//!
//! Several API types are unions whose wire form is the bare payload of one
//! variant, with no discriminator. Encoding serializes the payload as is.
//! Decoding tries each candidate shape in a fixed order and the first shape
//! that deserializes wins.
//!
//! The order is part of each union's contract and is spelled out explicitly
//! with [`impl_polymorphic!`](crate::impl_polymorphic) rather than following
//! the enum declaration. Concrete shapes must come before permissive ones: a
//! generic JSON object accepts almost anything and would otherwise shadow more
//! specific object shapes.
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use xata_client::codec::Polymorphic;
//!
//! #[derive(Debug, PartialEq, Serialize)]
//! #[serde(untagged)]
//! enum Weight {
//!     Named(String),
//!     Value(f64),
//! }
//!
//! xata_client::impl_polymorphic!(Weight, "Weight", [Value(f64), Named(String)]);
//!
//! let w: Weight = serde_json::from_str("2.5").unwrap();
//! assert_eq!(w, Weight::Value(2.5));
//! assert_eq!(Weight::TRIAL_ORDER, &["Value", "Named"]);
//! ```

use serde::de::value::{BorrowedStrDeserializer, Error as DeError};
use serde::de::{
    DeserializeOwned, DeserializeSeed, Deserializer, EnumAccess, Error as _, MapAccess, SeqAccess,
    Unexpected, VariantAccess, Visitor,
};
use serde::{forward_to_deserialize_any, Deserialize};
use serde_json::Value;

/// An untagged union decoded by ordered trial deserialization.
pub trait Polymorphic: Sized {
    /// Name of the union, used in decode errors.
    const TYPE_NAME: &'static str;

    /// Variant names in the order decoding tries them.
    const TRIAL_ORDER: &'static [&'static str];

    /// Try each variant in [`TRIAL_ORDER`](Self::TRIAL_ORDER) and return the first match.
    fn try_decode(value: &Value) -> Option<Self>;

    /// Name of the populated variant.
    fn variant(&self) -> &'static str;
}

/// No candidate shape matched the input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("data did not match any variant of {type_name}: {raw}")]
pub struct UnionDecodeError {
    /// The union being decoded.
    pub type_name: &'static str,
    /// The offending input, re-encoded as JSON.
    pub raw: String,
}

impl UnionDecodeError {
    fn new(type_name: &'static str, value: &Value) -> Self {
        Self {
            type_name,
            raw: value.to_string(),
        }
    }
}

/// Decode a union from an already parsed JSON value.
pub fn from_value<T: Polymorphic>(value: &Value) -> Result<T, UnionDecodeError> {
    T::try_decode(value).ok_or_else(|| UnionDecodeError::new(T::TYPE_NAME, value))
}

/// `Deserialize` entry point used by [`impl_polymorphic!`](crate::impl_polymorphic).
pub fn decode_union<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: Polymorphic,
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    from_value(&value).map_err(D::Error::custom)
}

/// Attempt one candidate shape.
///
/// Structs only match JSON objects, at any depth. Derived struct impls also
/// accept an array filled in field order, so `["title", 2.0]` would otherwise
/// pass for `{column, weight}`.
pub fn attempt<V: DeserializeOwned>(value: &Value) -> Option<V> {
    V::deserialize(Strict(value)).ok()
}

/// `&Value` deserializer that refuses sequences for struct shapes.
struct Strict<'a>(&'a Value);

fn unexpected(value: &Value) -> Unexpected<'_> {
    match value {
        Value::Null => Unexpected::Unit,
        Value::Bool(b) => Unexpected::Bool(*b),
        Value::Number(_) => Unexpected::Other("number"),
        Value::String(s) => Unexpected::Str(s),
        Value::Array(_) => Unexpected::Seq,
        Value::Object(_) => Unexpected::Map,
    }
}

impl<'de> Deserializer<'de> for Strict<'de> {
    type Error = DeError;

    fn deserialize_any<W: Visitor<'de>>(self, visitor: W) -> Result<W::Value, DeError> {
        match self.0 {
            Value::Null => visitor.visit_unit(),
            Value::Bool(b) => visitor.visit_bool(*b),
            Value::Number(n) => {
                if let Some(u) = n.as_u64() {
                    visitor.visit_u64(u)
                } else if let Some(i) = n.as_i64() {
                    visitor.visit_i64(i)
                } else {
                    match n.as_f64() {
                        Some(f) => visitor.visit_f64(f),
                        None => Err(DeError::custom("number out of range")),
                    }
                }
            }
            Value::String(s) => visitor.visit_borrowed_str(s),
            Value::Array(items) => {
                let mut seq = StrictSeq(items.iter());
                let out = visitor.visit_seq(&mut seq)?;
                match seq.0.len() {
                    0 => Ok(out),
                    _ => Err(DeError::invalid_length(items.len(), &"fewer elements in array")),
                }
            }
            Value::Object(map) => {
                let mut access = StrictMap {
                    iter: map.iter(),
                    value: None,
                };
                let out = visitor.visit_map(&mut access)?;
                match access.iter.len() {
                    0 => Ok(out),
                    _ => Err(DeError::invalid_length(map.len(), &"fewer elements in map")),
                }
            }
        }
    }

    fn deserialize_option<W: Visitor<'de>>(self, visitor: W) -> Result<W::Value, DeError> {
        match self.0 {
            Value::Null => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_newtype_struct<W: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: W,
    ) -> Result<W::Value, DeError> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_struct<W: Visitor<'de>>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: W,
    ) -> Result<W::Value, DeError> {
        match self.0 {
            Value::Object(_) => self.deserialize_any(visitor),
            other => Err(DeError::invalid_type(unexpected(other), &visitor)),
        }
    }

    fn deserialize_enum<W: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: W,
    ) -> Result<W::Value, DeError> {
        match self.0 {
            Value::String(variant) => visitor.visit_enum(StrictEnum {
                variant,
                value: None,
            }),
            Value::Object(map) => {
                let mut entries = map.iter();
                match (entries.next(), entries.next()) {
                    (Some((variant, value)), None) => visitor.visit_enum(StrictEnum {
                        variant,
                        value: Some(value),
                    }),
                    _ => Err(DeError::invalid_length(map.len(), &"map with a single key")),
                }
            }
            other => Err(DeError::invalid_type(unexpected(other), &"string or map")),
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple tuple_struct map identifier ignored_any
    }
}

struct StrictSeq<'a>(std::slice::Iter<'a, Value>);

impl<'de> SeqAccess<'de> for StrictSeq<'de> {
    type Error = DeError;

    fn next_element_seed<T: DeserializeSeed<'de>>(
        &mut self,
        seed: T,
    ) -> Result<Option<T::Value>, DeError> {
        self.0.next().map(|v| seed.deserialize(Strict(v))).transpose()
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.0.len())
    }
}

struct StrictMap<'a> {
    iter: serde_json::map::Iter<'a>,
    value: Option<&'a Value>,
}

impl<'de> MapAccess<'de> for StrictMap<'de> {
    type Error = DeError;

    fn next_key_seed<K: DeserializeSeed<'de>>(
        &mut self,
        seed: K,
    ) -> Result<Option<K::Value>, DeError> {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(BorrowedStrDeserializer::new(key)).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value, DeError> {
        match self.value.take() {
            Some(value) => seed.deserialize(Strict(value)),
            None => Err(DeError::custom("map value requested before its key")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct StrictEnum<'a> {
    variant: &'a str,
    value: Option<&'a Value>,
}

impl<'de> EnumAccess<'de> for StrictEnum<'de> {
    type Error = DeError;
    type Variant = StrictVariant<'de>;

    fn variant_seed<S: DeserializeSeed<'de>>(
        self,
        seed: S,
    ) -> Result<(S::Value, Self::Variant), DeError> {
        let variant = seed.deserialize(BorrowedStrDeserializer::<DeError>::new(self.variant))?;
        Ok((variant, StrictVariant(self.value)))
    }
}

struct StrictVariant<'a>(Option<&'a Value>);

impl<'de> VariantAccess<'de> for StrictVariant<'de> {
    type Error = DeError;

    fn unit_variant(self) -> Result<(), DeError> {
        match self.0 {
            None | Some(Value::Null) => Ok(()),
            Some(other) => Err(DeError::invalid_type(unexpected(other), &"unit variant")),
        }
    }

    fn newtype_variant_seed<T: DeserializeSeed<'de>>(self, seed: T) -> Result<T::Value, DeError> {
        match self.0 {
            Some(value) => seed.deserialize(Strict(value)),
            None => Err(DeError::invalid_type(Unexpected::UnitVariant, &"newtype variant")),
        }
    }

    fn tuple_variant<W: Visitor<'de>>(self, _len: usize, visitor: W) -> Result<W::Value, DeError> {
        match self.0 {
            Some(value @ Value::Array(_)) => Strict(value).deserialize_any(visitor),
            Some(other) => Err(DeError::invalid_type(unexpected(other), &"tuple variant")),
            None => Err(DeError::invalid_type(Unexpected::UnitVariant, &"tuple variant")),
        }
    }

    fn struct_variant<W: Visitor<'de>>(
        self,
        _fields: &'static [&'static str],
        visitor: W,
    ) -> Result<W::Value, DeError> {
        match self.0 {
            Some(value @ Value::Object(_)) => Strict(value).deserialize_any(visitor),
            Some(other) => Err(DeError::invalid_type(unexpected(other), &"struct variant")),
            None => Err(DeError::invalid_type(Unexpected::UnitVariant, &"struct variant")),
        }
    }
}

/// Implement [`Polymorphic`] and `Deserialize` for an enum of single-payload variants.
///
/// The bracketed list is the trial order. It must name every variant exactly
/// once; the generated `variant()` match is exhaustive, so a forgotten
/// variant fails to compile. Pair it with `#[derive(Serialize)]` and
/// `#[serde(untagged)]` on the enum for bare-payload encoding.
#[macro_export]
macro_rules! impl_polymorphic {
    ($ty:ident, $name:literal, [$($variant:ident($payload:ty)),+ $(,)?]) => {
        impl $crate::codec::Polymorphic for $ty {
            const TYPE_NAME: &'static str = $name;
            const TRIAL_ORDER: &'static [&'static str] = &[$(stringify!($variant)),+];

            fn try_decode(value: &$crate::__private::serde_json::Value) -> Option<Self> {
                $(
                    if let Some(payload) = $crate::codec::attempt::<$payload>(value) {
                        return Some($ty::$variant(payload));
                    }
                )+
                None
            }

            fn variant(&self) -> &'static str {
                match self {
                    $($ty::$variant(_) => stringify!($variant),)+
                }
            }
        }

        impl<'de> $crate::__private::serde::Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: $crate::__private::serde::Deserializer<'de>,
            {
                $crate::codec::decode_union(deserializer)
            }
        }
    };
}
