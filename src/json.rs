//! Conversions between [`Packed`] and [`serde_json::Value`].
//!
//! JSON has one number type, so the mapping is lossy in both directions: integers come
//! back as `VarUInt` or `VarInt` by sign, other numbers as the narrowest fixed-point kind
//! whose range holds them, and Packed-only kinds are spelled as plain JSON.
//!
//! Non-integer numbers up to [`FIXED64_MAX`] become `Fixed64`, larger ones up to
//! [`FIXED32_MAX`] become `Fixed32`. Anything beyond that still becomes `Fixed32` and
//! saturates when encoded; a warning is logged.
//!
//! [`FIXED32_MAX`]: crate::fixed::FIXED32_MAX
//! [`FIXED64_MAX`]: crate::fixed::FIXED64_MAX
//!
//! # Example
//!
//! ```
//! use packed_json::Packed;
//! use serde_json::json;
//! use std::convert::TryFrom;
//!
//! let value = json!({"a": 1, "b": [true, null, "x"]});
//! let packed = Packed::from(value.clone());
//!
//! assert_eq!(serde_json::Value::try_from(packed).unwrap(), value);
//! ```

use crate::{
    errors::ConversionError,
    fixed::{FIXED32_MAX, FIXED64_MAX},
    vecmap::VecMap,
    Packed,
};
use serde_json::{Map, Number, Value};
use std::convert::TryFrom;

impl From<Value> for Packed {
    fn from(value: Value) -> Packed {
        match value {
            Value::Null => Packed::Null,
            Value::Bool(b) => Packed::Bool(b),
            Value::Number(n) => {
                if let Some(u) = n.as_u64() {
                    Packed::VarUInt(u)
                } else if let Some(i) = n.as_i64() {
                    Packed::VarInt(i)
                } else {
                    real(n.as_f64().unwrap_or(std::f64::NAN))
                }
            }
            Value::String(s) => Packed::Str(s),
            Value::Array(a) => Packed::Array(a.into_iter().map(Packed::from).collect()),
            Value::Object(m) => Packed::Object(
                m.into_iter()
                    .map(|(k, v)| (k, Packed::from(v)))
                    .collect::<VecMap<_, _>>(),
            ),
        }
    }
}

fn real(f: f64) -> Packed {
    if f.abs() <= FIXED64_MAX {
        Packed::Fixed64(f)
    } else {
        if f.abs() > FIXED32_MAX {
            tracing::warn!(value = f, "number exceeds the fixed-point range and will saturate");
        }
        Packed::Fixed32(f as f32)
    }
}

fn finite(f: f64) -> Result<Value, ConversionError> {
    Number::from_f64(f)
        .map(Value::Number)
        .ok_or_else(|| ConversionError(format!("{} has no JSON representation", f)))
}

impl TryFrom<Packed> for Value {
    type Error = ConversionError;

    fn try_from(p: Packed) -> Result<Value, ConversionError> {
        Ok(match p {
            Packed::Null => Value::Null,
            Packed::Bool(b) => Value::Bool(b),
            Packed::Byte(b) => Value::from(b),
            Packed::Char(c) => match std::char::from_u32(c) {
                Some(c) => Value::String(c.to_string()),
                None => {
                    return Err(ConversionError(format!(
                        "{:#x} is not a Unicode scalar value",
                        c
                    )))
                }
            },
            Packed::Timestamp(ts) => Value::from(ts.to_raw()),
            Packed::Fixed32(f) => finite(f as f64)?,
            Packed::Fixed64(f) => finite(f)?,
            Packed::VarUInt(u) => Value::from(u),
            Packed::VarInt(i) => Value::from(i),
            Packed::Object(m) => {
                let mut out = Map::new();
                for (k, v) in m {
                    out.insert(k, Value::try_from(v)?);
                }
                Value::Object(out)
            }
            Packed::Array(a) => Value::Array(
                a.into_iter()
                    .map(Value::try_from)
                    .collect::<Result<_, _>>()?,
            ),
            Packed::Str(s) => Value::String(s),
            Packed::Binary(bs) => Value::Array(bs.iter().map(|b| Value::from(*b)).collect()),
        })
    }
}
