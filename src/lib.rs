//! # Packed JSON
//!
//! Packed JSON is a compact, self-describing binary encoding for JSON-like data. Every
//! value starts with a one-byte tag, so a buffer can be decoded without a schema.
//!
//! # Usage
//!
//! The trait [`PackedRep`] is used to specify how data is converted into [`Packed`].
//!
//! This trait can usually be auto-derived, and then it's ready for serialization.
//!
//! For example:
//!
//! ```
//! use packed_json::prelude::*;
//!
//! #[derive(Clone, Debug, PackedRep, PartialEq)]
//! /// A silly enum, we shall make an example of it.
//! enum SillyEnum {
//!     Foo,
//!     Bar(u8, String),
//!     Baz { x: i32, y: f64 },
//! }
//!
//! let silly_example = SillyEnum::Bar(1, "hello".to_string());
//!
//! // encode
//! let encoded = encode_full(&silly_example.to_packed());
//!
//! // and then immediately decode, because this is a silly example
//! let decoded: Packed = decode_full(encoded).unwrap();
//!
//! assert_eq!(SillyEnum::from_packed(decoded).unwrap(), silly_example);
//! ```
//!
//! If the auto-derive does not fit, implement [`PackedRep`] by hand with the helpers in
//! [`rep`], or register a conversion function with a [`Converters`] registry.
//!
//! # An overview of the value model
//!
//! ## Scalars
//!
//! Null, booleans, single bytes, characters (as code points), and timestamps.
//!
//! ```
//! use packed_json::prelude::*;
//!
//! let nothing = Packed::Null;
//! let yes = true.into_packed();
//! let byte = 7u8.into_packed();
//! let letter = 'x'.into_packed();
//! let now = Packed::from(Timestamp::from_system_time(std::time::SystemTime::now()).unwrap());
//! ```
//!
//! ## Integers
//!
//! Unsigned integers become [`Packed::VarUInt`], signed ones [`Packed::VarInt`]. Both
//! take one byte per seven significant bits on the wire.
//!
//! ```
//! use packed_json::prelude::*;
//!
//! assert_eq!(Packed::from(300u32), Packed::VarUInt(300));
//! assert_eq!(Packed::from(-3i16), Packed::VarInt(-3));
//! ```
//!
//! ## Reals
//!
//! Reals are stored as fixed-point integers: `f32` scaled by `1e8`, `f64` scaled by
//! `1e16`. This rounds away digits below the scale; see [`fixed`].
//!
//! ## Strings and binary
//!
//! ```
//! use packed_json::prelude::*;
//!
//! let text = Packed::from("hello world");
//! let blob = Packed::from(Bytes::from_static(b"\x00\x01\x02"));
//! ```
//!
//! ## Arrays and objects
//!
//! Objects map string keys to values, stored as a [`VecMap`]. Key order on the wire is
//! not significant.
//!
//! ```
//! use packed_json::prelude::*;
//!
//! let some_numbers = vec![1, 2, 3].into_packed();
//!
//! let mut fields = VecMap::new();
//! fields.insert("numbers".to_string(), some_numbers);
//! let object = Packed::Object(fields);
//! ```
//!
//! # Wire format
//!
//! This section describes the binary format.
//!
//! ## Tags
//!
//! The first byte of every value is its *tag*:
//!
//! | Tag           | Meaning      | Payload                                 |
//! | ---           | ---          | ---                                     |
//! | `0x00`        | null         | none                                    |
//! | `0x01`        | true         | none                                    |
//! | `0x02`        | false        | none                                    |
//! | `0x03`        | byte         | one raw byte                            |
//! | `0x04`        | char         | unsigned varint code point              |
//! | `0x05`        | timestamp    | signed varint composite                 |
//! | `0x06`-`0x0f` | reserved     | never written, rejected on decode       |
//! | `0x10`        | fixed 32     | signed varint, scale `1e8`              |
//! | `0x11`        | fixed 64     | signed varint, scale `1e16`             |
//! | `0x12`        | unsigned int | unsigned varint                         |
//! | `0x13`        | signed int   | signed varint                           |
//! | `0x20`        | object       | varint count, then `(string, value)`s   |
//! | `0x21`        | array        | varint count, then values               |
//! | `0x22`        | string       | varint length, then UTF-8 bytes         |
//! | `0x23`        | binary       | varint length, then raw bytes           |
//!
//! Any other tag is rejected.
//!
//! ## Varints
//!
//! Integers are split into 7-bit groups, least significant group first, one group per
//! byte. Within a byte the payload bits are reversed: bit `i` of the group is stored in
//! bit `6 - i`. Bit 7 is set on every byte but the last. A signed varint is the same
//! thing applied to the bit sequence `sign, magnitude...`. See [`encoding::varint`].
//!
//! ## Keys
//!
//! Object keys are written as bare strings (length and bytes) with no tag byte.

#![warn(
    deprecated_in_future,
    unsafe_code,
    unused_labels,
    keyword_idents,
    missing_debug_implementations,
    macro_use_extern_crate,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces
)]
#![allow(clippy::cast_lossless)]

extern crate self as packed_json;

/// Procedural macro for autoderiving [`PackedRep`].
pub use packed_json_macro;

#[macro_use]
mod util;

pub mod encoding;
pub mod errors;
pub mod fixed;
pub mod prelude;
pub mod registry;
pub mod rep;
pub mod timestamp;
pub mod vecmap;

#[cfg(feature = "json")] pub mod json;

use bytes::Bytes;
use failure::{bail, Error};
use num_traits::ToPrimitive;
use std::{collections::HashMap, convert::TryInto};

pub use encoding::{decode, decode_full, decode_rep, decode_with, encode, encode_full};
pub use errors::{ConversionError, DecodeError, EncodeError};
pub use registry::Converters;
pub use rep::PackedRep;
pub use timestamp::Timestamp;
pub use vecmap::VecMap;

#[derive(PartialEq, Clone, Debug)]
/// [`Packed`] and its variants.
///
/// # Example
///
/// ```
/// use packed_json::prelude::*;
///
/// let b = Packed::Bool(true);
///
/// let val = match b {
///     Packed::Bool(b) => b,
///     _ => panic!(),
/// };
///
/// assert!(val);
/// ```
pub enum Packed {
    /// Null. Corresponds to [`None`].
    Null,
    /// Boolean.
    Bool(bool),
    /// A single byte, stored raw.
    Byte(u8),
    /// A code point. Any `u32` is carried, including values that are not valid
    /// [`char`]s.
    Char(u32),
    /// A point in time.
    Timestamp(Timestamp),
    /// Single-precision real, packed as fixed point with scale `1e8`.
    Fixed32(f32),
    /// Double-precision real, packed as fixed point with scale `1e16`.
    Fixed64(f64),
    /// Unsigned integer.
    VarUInt(u64),
    /// Signed integer.
    VarInt(i64),
    /// String-keyed map.
    ///
    /// ```
    /// use packed_json::prelude::{Packed::Object, *};
    ///
    /// let vmap = VecMap::from(vec![("hello world".to_string(), 1.into_packed())]);
    ///
    /// let object = Object(vmap);
    /// ```
    Object(VecMap<String, Packed>),
    /// Array.
    ///
    /// ```
    /// use packed_json::prelude::{Packed::Array, *};
    ///
    /// let array = Array(vec![1, 2, 3, 4].into_iter().map(Packed::from).collect());
    /// ```
    Array(Vec<Packed>),
    /// UTF-8 text.
    Str(String),
    /// Raw bytes.
    Binary(Bytes),
}

use Packed::*;

impl Packed {
    /// Builds a [`Packed::Fixed64`] from any numeric type.
    ///
    /// This is the path for decimal types wider than `f64`: the value is converted to
    /// the nearest `f64` first and then packed with scale `1e16`, so digits beyond what
    /// either of those can hold are lost. Values with no `f64` equivalent become `NaN`,
    /// which packs as `0`.
    ///
    /// # Example
    ///
    /// ```
    /// use packed_json::Packed;
    ///
    /// assert_eq!(Packed::fixed64(3u8), Packed::Fixed64(3.0));
    /// ```
    pub fn fixed64<N: ToPrimitive>(n: N) -> Packed { Fixed64(n.to_f64().unwrap_or(std::f64::NAN)) }

    /// Name of the variant, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Null => "null",
            Bool(_) => "bool",
            Byte(_) => "byte",
            Char(_) => "char",
            Packed::Timestamp(_) => "timestamp",
            Fixed32(_) => "fixed32",
            Fixed64(_) => "fixed64",
            VarUInt(_) => "unsigned integer",
            VarInt(_) => "signed integer",
            Object(_) => "object",
            Array(_) => "array",
            Str(_) => "string",
            Binary(_) => "binary",
        }
    }

    /// Indicates whether a value is [`Null`].
    ///
    /// # Example
    ///
    /// ```
    /// use packed_json::Packed::Null;
    ///
    /// assert!(Null.is_null());
    /// ```
    pub fn is_null(&self) -> bool {
        match self {
            Null => true,
            _ => false,
        }
    }

    /// Tries to convert a value to a [`bool`].
    /// This will return an [`Error`] if the value is not a [`Packed::Bool`].
    pub fn to_bool(&self) -> Result<bool, Error> {
        match self {
            Bool(b) => Ok(*b),
            other => bail!("Value is `{}`, not `bool`", other.kind_name()),
        }
    }

    /// Tries to read a value as a [`char`]. Returns `None` for other variants and for
    /// code points that are not Unicode scalar values.
    pub fn to_char(&self) -> Option<char> {
        match self {
            Char(c) => std::char::from_u32(*c),
            _ => None,
        }
    }

    /// Reads any integer variant as a `u64`.
    ///
    /// # Example
    ///
    /// ```
    /// use packed_json::prelude::*;
    ///
    /// assert_eq!(Packed::VarInt(4).to_u64().unwrap(), 4);
    /// assert!(Packed::VarInt(-4).to_u64().is_err());
    /// ```
    pub fn to_u64(&self) -> Result<u64, Error> {
        match self {
            Byte(b) => Ok(*b as u64),
            VarUInt(u) => Ok(*u),
            VarInt(i) => match (*i).try_into() {
                Ok(u) => Ok(u),
                Err(_) => bail!("{} is negative", i),
            },
            other => bail!("Value is `{}`, not an integer", other.kind_name()),
        }
    }

    /// Reads any integer variant as an `i64`.
    pub fn to_i64(&self) -> Result<i64, Error> {
        match self {
            Byte(b) => Ok(*b as i64),
            VarInt(i) => Ok(*i),
            VarUInt(u) => match (*u).try_into() {
                Ok(i) => Ok(i),
                Err(_) => bail!("{} does not fit in an `i64`", u),
            },
            other => bail!("Value is `{}`, not an integer", other.kind_name()),
        }
    }

    /// Reads any numeric variant as an `f64`.
    pub fn to_f64(&self) -> Result<f64, Error> {
        match self {
            Fixed32(f) => Ok(*f as f64),
            Fixed64(f) => Ok(*f),
            Byte(b) => Ok(*b as f64),
            VarUInt(u) => Ok(*u as f64),
            VarInt(i) => Ok(*i as f64),
            other => bail!("Value is `{}`, not a number", other.kind_name()),
        }
    }

    /// Borrows the text of a [`Packed::Str`].
    ///
    /// # Example
    ///
    /// ```
    /// use packed_json::Packed;
    ///
    /// let foo = Packed::from("This is an example");
    ///
    /// assert_eq!(foo.to_str().unwrap(), "This is an example");
    /// ```
    pub fn to_str(&self) -> Result<&str, Error> {
        match self {
            Str(s) => Ok(s),
            other => bail!("Value is `{}`, not `string`", other.kind_name()),
        }
    }

    /// Borrows the bytes of a [`Packed::Binary`].
    pub fn to_bytes(&self) -> Result<&Bytes, Error> {
        match self {
            Binary(b) => Ok(b),
            other => bail!("Value is `{}`, not `binary`", other.kind_name()),
        }
    }

    /// Borrows the elements of a [`Packed::Array`].
    ///
    /// # Example
    ///
    /// ```
    /// use packed_json::prelude::*;
    ///
    /// let ks = vec![1, 2, 3].into_packed();
    ///
    /// assert_eq!(ks.to_vec().unwrap().len(), 3);
    /// ```
    pub fn to_vec(&self) -> Result<&Vec<Packed>, Error> {
        match self {
            Array(a) => Ok(a),
            other => bail!("Value is `{}`, not `array`", other.kind_name()),
        }
    }

    /// Consumes a [`Packed`] value, converting it into a vector of [`Packed`] values.
    /// This will return an [`Error`] if the value is not a [`Packed::Array`].
    pub fn into_vec(self) -> Result<Vec<Packed>, Error> {
        match self {
            Array(a) => Ok(a),
            other => bail!("Value is `{}`, not `array`", other.kind_name()),
        }
    }

    /// Borrows the entries of a [`Packed::Object`].
    pub fn to_vecmap(&self) -> Result<&VecMap<String, Packed>, Error> {
        match self {
            Object(vmap) => Ok(vmap),
            other => bail!("Value is `{}`, not `object`", other.kind_name()),
        }
    }

    /// Consumes a [`Packed::Object`], returning its entries.
    pub fn into_vecmap(self) -> Result<VecMap<String, Packed>, Error> {
        match self {
            Object(vmap) => Ok(vmap),
            other => bail!("Value is `{}`, not `object`", other.kind_name()),
        }
    }

    /// Consumes a [`Packed::Object`], converting it into a [`HashMap`].
    ///
    /// # Example
    ///
    /// ```
    /// use packed_json::prelude::*;
    /// use std::collections::HashMap;
    ///
    /// let mut simple_map = HashMap::new();
    /// simple_map.insert("foo".to_string(), 1);
    ///
    /// let map = simple_map.into_packed().into_map().unwrap();
    ///
    /// assert_eq!(map["foo"], Packed::VarInt(1));
    /// ```
    pub fn into_map(self) -> Result<HashMap<String, Packed>, Error> {
        Ok(self.into_vecmap()?.into_hashmap())
    }

    /// Consumes a [`Packed`] value, converting it to a value of type `T`.
    ///
    /// # Example
    ///
    /// ```
    /// use packed_json::prelude::*;
    ///
    /// let num: u8 = 1.to_packed().into_rep().unwrap();
    ///
    /// assert_eq!(num, 1);
    /// ```
    pub fn into_rep<T: PackedRep>(self) -> Result<T, Error> { T::from_packed(self) }
}

fn fmt_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

impl std::fmt::Display for Packed {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        fn fmt_map(m: &VecMap<String, Packed>, indent: usize) -> String {
            let mut map_string: String = "{".to_owned();
            for (i, (k, v)) in m.iter().enumerate() {
                if i == 0 {
                    map_string.push_str(&format!("\n{:indent$}", "", indent = indent + 2));
                } else {
                    map_string.push_str(&format!(",\n{:indent$}", "", indent = indent + 2));
                }

                map_string.push_str(&format!(
                    "{key}: {value}",
                    key = fmt_str(k),
                    value = fmt_helper(v, indent + 2),
                ));

                // check if we're at last element
                if i == m.len() - 1 {
                    map_string.push_str(&format!("\n{:indent$}", "", indent = indent));
                }
            }
            map_string.push('}');

            map_string
        }

        fn fmt_helper(ks: &Packed, indent: usize) -> String {
            match ks {
                Null => "null".to_owned(),
                Bool(b) => b.to_string(),
                Byte(b) => format!("{:#04x}", b),
                Char(c) => match std::char::from_u32(*c) {
                    Some(c) => format!("{:?}", c),
                    None => format!("'\\u{{{:x}}}'", c),
                },
                Packed::Timestamp(ts) => ts.to_string(),
                Fixed32(x) => x.to_string(),
                Fixed64(x) => x.to_string(),
                VarUInt(u) => u.to_string(),
                VarInt(i) => i.to_string(),
                Str(s) => fmt_str(s),
                Binary(bytes) => {
                    let mut bytes_string: String = "b\"".to_owned();
                    bytes
                        .iter()
                        .for_each(|c| bytes_string.push_str(&format!("{:02x}", c)));
                    bytes_string.push('"');
                    bytes_string
                }
                Array(a) => {
                    let mut arr_string: String = "[".to_owned();
                    for (i, ks) in a.iter().enumerate() {
                        if i != 0 {
                            arr_string.push_str(", ");
                        }
                        arr_string.push_str(&fmt_helper(ks, indent));
                    }
                    arr_string.push(']');

                    arr_string
                }
                Object(m) => fmt_map(m, indent),
            }
        }

        write!(f, "{}", fmt_helper(self, 0))
    }
}

impl From<&str> for Packed {
    fn from(s: &str) -> Packed { Str(s.to_string()) }
}

impl<T: Into<Packed>> From<Vec<T>> for Packed {
    fn from(v: Vec<T>) -> Packed { Array(v.into_iter().map(T::into).collect()) }
}

impl<T: Into<Packed>> From<VecMap<String, T>> for Packed {
    fn from(v: VecMap<String, T>) -> Packed {
        Object(v.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

from_fn!(Packed, bool, Bool);
from_fn!(Packed, u8, Byte);
from_fn!(Packed, char, |c: char| Char(c as u32));
from_fn!(Packed, Timestamp, Packed::Timestamp);
from_fn!(Packed, f32, Fixed32);
from_fn!(Packed, f64, Fixed64);
from_fn!(Packed, u64, VarUInt);
from_fn!(Packed, i64, VarInt);
from_fn!(Packed, String, Str);
from_fn!(Packed, Bytes, Binary);
from_fn!(Packed, usize, |u: usize| VarUInt(u as u64));
from_fn!(Packed, isize, |i: isize| VarInt(i as i64));

compose_from!(Packed, u64, u16);
compose_from!(Packed, u64, u32);
compose_from!(Packed, i64, i8);
compose_from!(Packed, i64, i16);
compose_from!(Packed, i64, i32);

try_from_ctor!(Packed, bool, Bool);
try_from_ctor!(Packed, u8, Byte);
try_from_ctor!(Packed, Timestamp, Packed::Timestamp);
try_from_ctor!(Packed, u64, VarUInt);
try_from_ctor!(Packed, i64, VarInt);
try_from_ctor!(Packed, String, Str);
try_from_ctor!(Packed, Bytes, Binary);
try_from_ctor!(Packed, Vec<Packed>, Array);
try_from_ctor!(Packed, VecMap<String, Packed>, Object);

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::TryFrom;

    #[test]
    fn trivial_tests() {
        assert!(Null.is_null());

        assert!(5.to_packed().to_i64().is_ok());

        assert!(true.to_packed().to_bool().unwrap());

        assert_eq!(
            Bytes::from("word").to_packed().to_bytes().unwrap(),
            &Bytes::from("word")
        );
    }

    #[test]
    fn from_vec() {
        let v: Vec<u8> = vec![0, 1, 2, 3, 4];
        let val: Vec<u8> = Packed::from(v.clone()).into_rep().unwrap();
        assert_eq!(val, v);
    }

    #[test]
    fn char_code_points() {
        assert_eq!(Packed::from('é'), Char(0xe9));
        assert_eq!(Char(0xe9).to_char(), Some('é'));
        // lone surrogate is carried but is not a `char`
        assert_eq!(Char(0xd800).to_char(), None);
    }

    #[test]
    fn try_from_hands_back() {
        assert_eq!(u64::try_from(VarUInt(3)), Ok(3));
        assert_eq!(u64::try_from(VarInt(3)), Err(VarInt(3)));
    }

    #[test]
    fn display() {
        let object = Object(VecMap::from(vec![
            ("b".to_string(), Array(vec![Bool(true), Null, Str("x".into())])),
            ("a".to_string(), VarInt(1)),
        ]));
        assert_eq!(
            object.to_string(),
            "{\n  \"a\": 1,\n  \"b\": [true, null, \"x\"]\n}"
        );
        assert_eq!(Binary(Bytes::from_static(&[0, 255])).to_string(), "b\"00ff\"");
    }
}
