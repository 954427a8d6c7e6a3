//! # Packed JSON binary encoder and decoder
//!
//! Encode and decode functions for Packed JSON.
//!
//! # Example
//!
//! ```
//! use packed_json::prelude::*;
//!
//! // a struct that will store some data
//! #[derive(PackedRep, PartialEq, Debug, Clone)]
//! struct SomeData {
//!     x: usize,
//!     y: i32,
//! }
//!
//! // here it is storing some data
//! let some_data = SomeData { x: 1, y: 2 };
//!
//! // and we've encoded it
//! let enc_full = encode_full(&some_data.to_packed());
//!
//! // let's encode it a different way too
//!
//! // create a buffer
//! let out = &mut Vec::new();
//!
//! // and we've encoded it a different way
//! encode(&some_data.to_packed(), out);
//!
//! // but they are equivalent
//! assert_eq!(*out, enc_full);
//!
//! // Note: decoding returns a `Result`
//! let dec_ks: Packed = decode_full(enc_full).unwrap(); // did the decoding succeed?
//! let dec_full: SomeData = dec_ks.into_rep().unwrap(); // did the conversion succeed?
//!
//! // success!
//! assert_eq!(dec_full, some_data);
//! ```

use crate::{errors::DecodeError, rep::PackedRep};
use bytes::Bytes;
use failure::Error;

pub mod ser;
pub use ser::*;
pub mod de;
pub use de::*;
pub mod cursor;
pub use cursor::Cursor;
pub mod varint;
pub(crate) mod constants;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// What to do when an object repeats a key.
pub enum DuplicateKeys {
    /// Keep the value that came last.
    LastWins,
    /// Fail with [`DecodeError::DuplicateKey`].
    Reject,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Limits and policies applied while decoding.
///
/// # Example
///
/// ```
/// use packed_json::encoding::DecodeOptions;
///
/// let strict = DecodeOptions::default()
///     .max_depth(16)
///     .reject_duplicate_keys();
/// ```
pub struct DecodeOptions {
    pub(crate) max_depth: usize,
    pub(crate) duplicate_keys: DuplicateKeys,
    pub(crate) allow_trailing_bytes: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            max_depth: DecodeOptions::DEFAULT_MAX_DEPTH,
            duplicate_keys: DuplicateKeys::LastWins,
            allow_trailing_bytes: false,
        }
    }
}

impl DecodeOptions {
    /// Default nesting limit for arrays and objects.
    pub const DEFAULT_MAX_DEPTH: usize = 128;

    /// Sets how deeply arrays and objects may nest.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Sets the duplicate key policy.
    pub fn duplicate_keys(mut self, policy: DuplicateKeys) -> Self {
        self.duplicate_keys = policy;
        self
    }

    /// Shorthand for `duplicate_keys(DuplicateKeys::Reject)`.
    pub fn reject_duplicate_keys(self) -> Self { self.duplicate_keys(DuplicateKeys::Reject) }

    /// Whether [`decode_with`] accepts bytes after the value.
    pub fn allow_trailing_bytes(mut self, allow: bool) -> Self {
        self.allow_trailing_bytes = allow;
        self
    }
}

/// Encode a value into its binary representation, storing output in `out`.
///
/// # Arguments
///
/// * `t: T` - The value to be encoded, usually a `&Packed`.
/// * `out: &mut S` - The serializer where the encoder output will be stored.
///
/// # Example
///
/// ```
/// use packed_json::prelude::*;
///
/// // output buffer
/// let out = &mut Vec::new();
///
/// // encode value
/// encode(&Packed::Null, out);
///
/// assert_eq!(*out, vec![0x00]);
/// ```
pub fn encode<T: Ser, S: Serializer>(t: T, out: &mut S) { t.ser(out) }

/// Encodes a value into a vector of bytes.
///
/// # Example
///
/// ```
/// use packed_json::prelude::*;
///
/// let enc: Vec<u8> = encode_full(&Packed::Null);
/// ```
pub fn encode_full<T: Ser>(t: T) -> Vec<u8> {
    let mut out = Vec::new();
    t.ser(&mut out);
    out
}

/// Decodes one value from a cursor. Bytes after the value are left in the cursor.
///
/// # Example
///
/// ```
/// use packed_json::prelude::*;
/// use packed_json::encoding::Cursor;
///
/// // two values back to back
/// let mut bytes = encode_full(&Packed::from(1u64));
/// bytes.extend(encode_full(&Packed::from("two")));
///
/// let cursor = &mut Cursor::new(bytes);
///
/// let one: u64 = decode(cursor).unwrap();
/// let two: String = decode(cursor).unwrap();
///
/// assert_eq!((one, two.as_str()), (1, "two"));
/// assert!(cursor.is_empty());
/// ```
pub fn decode<D: Deserializer, T: De>(data: &mut D) -> Result<T, DecodeError> { T::de(data) }

/// Decodes a buffer that holds exactly one value, with default [`DecodeOptions`].
///
/// # Example
///
/// ```
/// use packed_json::{prelude::*, DecodeError};
///
/// let bs = encode_full(&Packed::Null);
///
/// let dec: Result<Packed, DecodeError> = decode_full(bs);
/// assert_eq!(dec, Ok(Packed::Null));
///
/// // reserved tags are never read as null
/// let dec: Result<Packed, DecodeError> = decode_full(vec![0x07]);
/// assert!(dec.is_err());
/// ```
pub fn decode_full<B: Into<Bytes>, T: De>(bs: B) -> Result<T, DecodeError> {
    decode_with(bs, &DecodeOptions::default())
}

/// Decodes a buffer with the given options.
///
/// Unless [`DecodeOptions::allow_trailing_bytes`] is set, the buffer must hold exactly
/// one value.
pub fn decode_with<B: Into<Bytes>, T: De>(bs: B, options: &DecodeOptions) -> Result<T, DecodeError> {
    let cursor = &mut Cursor::with_options(bs, options.clone());
    let result = T::de(cursor).and_then(|t| {
        if cursor.is_empty() || options.allow_trailing_bytes {
            Ok(t)
        } else {
            Err(DecodeError::TrailingBytes {
                remaining: cursor.remaining(),
            })
        }
    });

    if let Err(e) = &result {
        tracing::debug!(error = %e, offset = cursor.position(), "packed decode failed");
    }
    result
}

/// Decodes a buffer and converts the value through [`PackedRep`].
///
/// # Example
///
/// ```
/// use packed_json::prelude::*;
///
/// let bs = encode_full(&vec![(1u64, "one".to_string())].to_packed());
///
/// let pairs: Vec<(u64, String)> = decode_rep(bs).unwrap();
/// assert_eq!(pairs, vec![(1, "one".to_string())]);
/// ```
pub fn decode_rep<B: Into<Bytes>, T: PackedRep>(bs: B) -> Result<T, Error> {
    let packed: crate::Packed = decode_full(bs)?;
    T::from_packed(packed)
}

#[cfg(test)]
mod tests {
    use super::{constants::*, *};
    use crate::{timestamp::*, vecmap::VecMap, Packed};

    fn dec(bytes: &[u8]) -> Result<Packed, DecodeError> { decode_full(bytes.to_vec()) }

    #[test]
    fn constants() {
        assert_eq!(encode_full(&Packed::Null), vec![TAG_NULL]);
        assert_eq!(encode_full(&Packed::Bool(true)), vec![TAG_TRUE]);
        assert_eq!(encode_full(&Packed::Bool(false)), vec![TAG_FALSE]);

        assert_eq!(dec(&[0x00]), Ok(Packed::Null));
        assert_eq!(dec(&[0x01]), Ok(Packed::Bool(true)));
        assert_eq!(dec(&[0x02]), Ok(Packed::Bool(false)));
    }

    #[test]
    fn byte_is_raw() {
        let out = encode_full(&Packed::Byte(0xff));
        assert_eq!(out, vec![TAG_BYTE, 0xff]);
        assert_eq!(dec(&out), Ok(Packed::Byte(0xff)));
    }

    #[test]
    fn char_code_point() {
        let out = encode_full(&Packed::from('A'));
        // 65 = 0b1000001: bit 0 in chunk 0, bit 6 -> bit 0 of the byte
        assert_eq!(out, vec![TAG_CHAR, 0b0100_0001]);

        let out = encode_full(&Packed::Char(0x1f600));
        assert_eq!(dec(&out), Ok(Packed::Char(0x1f600)));
    }

    #[test]
    fn char_wider_than_u32() {
        let mut out = vec![TAG_CHAR];
        out.extend_from_slice(&varint::pack_unsigned(1 << 32));
        assert_eq!(dec(&out), Err(DecodeError::IntegerOverflow { offset: 1 }));
    }

    #[test]
    fn timestamp() {
        let ts = Timestamp::new(Timestamp::UNIX_EPOCH_TICKS, TimestampKind::Local).unwrap();
        let out = encode_full(&Packed::Timestamp(ts));

        assert_eq!(out[0], TAG_TIMESTAMP);
        assert_eq!(&out[1..], varint::pack_i64(ts.to_raw()).as_slice());
        assert_eq!(dec(&out), Ok(Packed::Timestamp(ts)));
    }

    #[test]
    fn unsigned() {
        assert_eq!(encode_full(&Packed::VarUInt(0)), vec![TAG_VARUINT, 0x00]);
        assert_eq!(encode_full(&Packed::VarUInt(127)), vec![TAG_VARUINT, 0x7f]);
        assert_eq!(encode_full(&Packed::VarUInt(128)), vec![TAG_VARUINT, 0x80, 0x40]);

        let max = encode_full(&Packed::VarUInt(u64::max_value()));
        assert_eq!(dec(&max), Ok(Packed::VarUInt(u64::max_value())));
    }

    #[test]
    fn signed() {
        assert_eq!(encode_full(&Packed::VarInt(-1)), vec![TAG_VARINT, 0b0110_0000]);

        for &i in &[-1, 0, 1, i64::max_value(), i64::min_value()] {
            let out = encode_full(&Packed::VarInt(i));
            assert_eq!(dec(&out), Ok(Packed::VarInt(i)));
        }
    }

    #[test]
    fn fixed_point() {
        let out = encode_full(&Packed::Fixed64(0.1));
        assert_eq!(out[0], TAG_FIXED64);
        match dec(&out) {
            Ok(Packed::Fixed64(f)) => assert!((f - 0.1).abs() < 1e-15),
            other => panic!("unexpected {:?}", other),
        }

        // 1.5 * 1e8 = 150000000
        let out = encode_full(&Packed::Fixed32(1.5));
        assert_eq!(out[0], TAG_FIXED32);
        assert_eq!(&out[1..], varint::pack_signed(150_000_000).as_slice());
        assert_eq!(dec(&out), Ok(Packed::Fixed32(1.5)));

        let out = encode_full(&Packed::Fixed64(-2.0));
        assert_eq!(dec(&out), Ok(Packed::Fixed64(-2.0)));
    }

    #[test]
    fn small_string() {
        let out = encode_full(&Packed::from("w"));

        // tag, length, characters
        assert_eq!(out, vec![TAG_STRING, 0b0100_0000, b'w']);
    }

    #[test]
    fn large_string() {
        let long = "w".repeat(140);
        let out = encode_full(&Packed::from(long.as_str()));

        assert_eq!(out[0], TAG_STRING);
        // 140 takes two chunks
        assert_eq!(&out[1..3], varint::pack_unsigned(140).as_slice());
        assert_eq!(out[3..].to_vec(), vec![b'w'; 140]);
        assert_eq!(dec(&out), Ok(Packed::Str(long)));
    }

    #[test]
    fn invalid_utf8() {
        assert_eq!(
            dec(&[TAG_STRING, 0b0010_0000, 0xc3, 0x28]),
            Err(DecodeError::InvalidUtf8 { offset: 2 })
        );
    }

    #[test]
    fn binary() {
        let out = encode_full(&Packed::Binary(Bytes::from_static(&[0, 1, 2])));
        assert_eq!(out, vec![TAG_BINARY, 0b0110_0000, 0, 1, 2]);
        assert_eq!(
            dec(&out),
            Ok(Packed::Binary(Bytes::from_static(&[0, 1, 2])))
        );
    }

    #[test]
    fn small_array() {
        let out = encode_full(&Packed::from(vec![0u64]));

        // tag, count
        assert_eq!(out[..2], [TAG_ARRAY, 0b0100_0000]);
        // element tag and value
        assert_eq!(out[2..], [TAG_VARUINT, 0x00]);
    }

    #[test]
    fn large_array() {
        let out = encode_full(&Packed::from(vec![0u64; 140]));

        assert_eq!(out[0], TAG_ARRAY);
        assert_eq!(&out[1..3], varint::pack_unsigned(140).as_slice());

        // element tags
        let out_tags: Vec<&u8> = out[3..].iter().step_by(2).collect();
        assert_eq!(out_tags, vec![&TAG_VARUINT; 140]);

        let out_vals: Vec<&u8> = out[4..].iter().step_by(2).collect();
        assert_eq!(out_vals, vec![&0; 140]);
    }

    #[test]
    fn small_object() {
        let object = Packed::Object(VecMap::from(vec![("a".to_string(), Packed::from("b"))]));

        let out = encode_full(&object);

        assert_eq!(
            out,
            vec![
                TAG_OBJECT,
                0b0100_0000,
                // key: no tag
                0b0100_0000,
                b'a',
                // value
                TAG_STRING,
                0b0100_0000,
                b'b',
            ]
        );
        assert_eq!(dec(&out), Ok(object));
    }

    #[test]
    fn composite_round_trip() {
        // {"a": 1, "b": [true, null, "x"]}, written in both key orders
        let a = |out: &mut Vec<u8>| {
            out.put_key("a");
            out.put_varint(1);
        };
        let b = |out: &mut Vec<u8>| {
            out.put_key("b");
            out.put_arr(&[Packed::Bool(true), Packed::Null, Packed::from("x")]);
        };

        let mut ab = Vec::new();
        ab.put_object_header(2);
        a(&mut ab);
        b(&mut ab);

        let mut ba = Vec::new();
        ba.put_object_header(2);
        b(&mut ba);
        a(&mut ba);

        assert_ne!(ab, ba);
        assert_eq!(dec(&ab).unwrap(), dec(&ba).unwrap());

        let object = dec(&ab).unwrap().into_vecmap().unwrap();
        assert_eq!(object.get("a"), Some(&Packed::VarInt(1)));
        assert_eq!(
            object.get("b"),
            Some(&Packed::Array(vec![
                Packed::Bool(true),
                Packed::Null,
                Packed::Str("x".to_string())
            ]))
        );
    }

    #[test]
    fn duplicate_keys() {
        let mut out = Vec::new();
        out.put_object_header(2);
        out.put_key("k");
        out.put_varuint(1);
        out.put_key("k");
        out.put_varuint(2);

        let last = dec(&out).unwrap().into_vecmap().unwrap();
        assert_eq!(last.len(), 1);
        assert_eq!(last.get("k"), Some(&Packed::VarUInt(2)));

        let strict = DecodeOptions::default().reject_duplicate_keys();
        assert_eq!(
            decode_with::<_, Packed>(out, &strict),
            Err(DecodeError::DuplicateKey {
                key: "k".to_string()
            })
        );
    }

    #[test]
    fn reserved_tags() {
        for tag in TAG_RESERVED_MIN..=TAG_RESERVED_MAX {
            assert_eq!(
                dec(&[tag]),
                Err(DecodeError::UnsupportedTag { tag, offset: 0 })
            );
        }
        for &tag in &[0x14, 0x1f, 0x24, 0xff] {
            assert_eq!(
                dec(&[tag]),
                Err(DecodeError::UnsupportedTag { tag, offset: 0 })
            );
        }
    }

    #[test]
    fn truncated() {
        assert_eq!(dec(&[]), Err(DecodeError::TruncatedInput { offset: 0 }));
        assert_eq!(
            dec(&[TAG_STRING]),
            Err(DecodeError::TruncatedInput { offset: 1 })
        );
        assert_eq!(
            dec(&[TAG_BYTE]),
            Err(DecodeError::TruncatedInput { offset: 1 })
        );
        // array of two, one element present
        assert_eq!(
            dec(&[TAG_ARRAY, 0b0010_0000, TAG_NULL]),
            Err(DecodeError::TruncatedInput { offset: 3 })
        );
    }

    #[test]
    fn varint_too_long() {
        let mut out = vec![TAG_VARUINT];
        out.extend_from_slice(&[0x80; 11]);
        assert_eq!(dec(&out), Err(DecodeError::IntegerTooLong { offset: 1 }));
    }

    #[test]
    fn trailing_bytes() {
        assert_eq!(
            dec(&[TAG_NULL, TAG_NULL]),
            Err(DecodeError::TrailingBytes { remaining: 1 })
        );

        let lenient = DecodeOptions::default().allow_trailing_bytes(true);
        assert_eq!(
            decode_with::<_, Packed>(vec![TAG_NULL, TAG_NULL], &lenient),
            Ok(Packed::Null)
        );
    }

    #[test]
    fn depth_limit() {
        // [[[null]]]
        let nested = Packed::Array(vec![Packed::Array(vec![Packed::Array(vec![Packed::Null])])]);
        let out = encode_full(&nested);

        let shallow = DecodeOptions::default().max_depth(2);
        assert_eq!(
            decode_with::<_, Packed>(out.clone(), &shallow),
            Err(DecodeError::DepthLimitExceeded { limit: 2 })
        );

        let enough = DecodeOptions::default().max_depth(3);
        assert_eq!(decode_with::<_, Packed>(out, &enough), Ok(nested));
    }

    #[test]
    fn hostile_count() {
        // claims u64::MAX elements with nothing behind it
        let mut out = vec![TAG_ARRAY];
        out.extend_from_slice(&varint::pack_unsigned(u64::max_value()));
        assert!(dec(&out).is_err());
    }

    #[test]
    fn bytes_mut_serializer() {
        let mut out = bytes::BytesMut::new();
        encode(&Packed::from("hi"), &mut out);
        assert_eq!(out.freeze(), Bytes::from(encode_full(&Packed::from("hi"))));
    }
}
