use super::{constants::*, cursor::Cursor, varint, DecodeOptions, DuplicateKeys};
use crate::{errors::DecodeError, fixed, timestamp::Timestamp, vecmap::VecMap, Packed};
use bytes::Bytes;
use std::convert::TryFrom;

/// Names a tag for [`DecodeError::UnexpectedTag`].
fn tag_name(tag: u8) -> &'static str {
    match tag {
        TAG_NULL => "null",
        TAG_TRUE | TAG_FALSE => "bool",
        TAG_BYTE => "byte",
        TAG_CHAR => "char",
        TAG_TIMESTAMP => "timestamp",
        TAG_RESERVED_MIN..=TAG_RESERVED_MAX => "reserved",
        TAG_FIXED32 => "fixed32",
        TAG_FIXED64 => "fixed64",
        TAG_VARUINT => "unsigned integer",
        TAG_VARINT => "signed integer",
        TAG_OBJECT => "object",
        TAG_ARRAY => "array",
        TAG_STRING => "string",
        TAG_BINARY => "binary",
        _ => "unknown",
    }
}

/// Reads a sequence of [`Packed`] arrays.
pub trait DeSeq {
    /// Reads an array tag and returns the number of elements that follow.
    ///
    /// Each successful call must be paired with [`end_seq`](DeSeq::end_seq), also when
    /// reading an element fails.
    fn start_seq(&mut self) -> Result<usize, DecodeError>;

    /// Reads the next element of the array.
    fn take_next<T: De>(&mut self) -> Result<T, DecodeError>;

    /// Leaves the array.
    fn end_seq(&mut self);
}

/// Reads [`Packed`] objects.
pub trait DeMap {
    /// Reads an object tag and returns the number of entries that follow.
    ///
    /// Each successful call must be paired with [`end_map`](DeMap::end_map), also when
    /// reading an entry fails.
    fn start_map(&mut self) -> Result<usize, DecodeError>;

    /// Reads an untagged key.
    fn take_key(&mut self) -> Result<String, DecodeError>;

    /// Reads the value following a key.
    fn take_val<T: De>(&mut self) -> Result<T, DecodeError>;

    /// Leaves the object.
    fn end_map(&mut self);
}

/// A source of encoded values.
pub trait Deserializer: DeSeq + DeMap {
    /// Returns the next tag byte without consuming it.
    fn peek_tag(&self) -> Result<u8, DecodeError>;

    /// Offset of the next byte, used for error reporting.
    fn position(&self) -> usize;

    /// The options this source decodes with.
    fn options(&self) -> &DecodeOptions;

    /// Reads null.
    fn read_null(&mut self) -> Result<(), DecodeError>;

    /// Reads a boolean.
    fn read_bool(&mut self) -> Result<bool, DecodeError>;

    /// Reads a single raw byte.
    fn read_byte(&mut self) -> Result<u8, DecodeError>;

    /// Reads a code point. The result is not checked to be a valid [`char`].
    fn read_char(&mut self) -> Result<u32, DecodeError>;

    /// Reads a timestamp.
    fn read_timestamp(&mut self) -> Result<Timestamp, DecodeError>;

    /// Reads a 32-bit fixed-point value.
    fn read_fixed32(&mut self) -> Result<f32, DecodeError>;

    /// Reads a 64-bit fixed-point value.
    fn read_fixed64(&mut self) -> Result<f64, DecodeError>;

    /// Reads an unsigned integer. Signed integers are accepted when non-negative.
    fn read_u64(&mut self) -> Result<u64, DecodeError>;

    /// Reads a signed integer. Unsigned integers are accepted when they fit.
    fn read_i64(&mut self) -> Result<i64, DecodeError>;

    /// Reads a string.
    fn read_str(&mut self) -> Result<String, DecodeError>;

    /// Reads binary data.
    fn read_binary(&mut self) -> Result<Bytes, DecodeError>;
}

impl Cursor {
    /// Consumes a tag, failing if it isn't `expected`.
    fn expect_tag(&mut self, expected: u8) -> Result<(), DecodeError> {
        let found = self.peek_byte()?;
        if found != expected {
            return Err(DecodeError::UnexpectedTag {
                expected: tag_name(expected),
                found,
            });
        }
        self.take_byte().map(drop)
    }

    fn read_utf8(&mut self) -> Result<String, DecodeError> {
        let len = self.read_len()?;
        let start = self.position();
        let bs = self.read_many(len)?;
        match std::str::from_utf8(&bs) {
            Ok(s) => Ok(s.to_owned()),
            Err(e) => Err(DecodeError::InvalidUtf8 {
                offset: start + e.valid_up_to(),
            }),
        }
    }

    fn read_signed(&mut self) -> Result<i128, DecodeError> { varint::unpack_signed(self) }
}

impl DeSeq for Cursor {
    fn start_seq(&mut self) -> Result<usize, DecodeError> {
        self.expect_tag(TAG_ARRAY)?;
        let len = self.read_len()?;
        self.descend()?;
        Ok(len)
    }

    fn take_next<T: De>(&mut self) -> Result<T, DecodeError> { T::de(self) }

    fn end_seq(&mut self) { self.ascend() }
}

impl DeMap for Cursor {
    fn start_map(&mut self) -> Result<usize, DecodeError> {
        self.expect_tag(TAG_OBJECT)?;
        let len = self.read_len()?;
        self.descend()?;
        Ok(len)
    }

    fn take_key(&mut self) -> Result<String, DecodeError> { self.read_utf8() }

    fn take_val<T: De>(&mut self) -> Result<T, DecodeError> { T::de(self) }

    fn end_map(&mut self) { self.ascend() }
}

impl Deserializer for Cursor {
    fn peek_tag(&self) -> Result<u8, DecodeError> { self.peek_byte() }

    fn position(&self) -> usize { Cursor::position(self) }

    fn options(&self) -> &DecodeOptions { Cursor::options(self) }

    fn read_null(&mut self) -> Result<(), DecodeError> { self.expect_tag(TAG_NULL) }

    fn read_bool(&mut self) -> Result<bool, DecodeError> {
        match self.peek_byte()? {
            TAG_TRUE => self.take_byte().map(|_| true),
            TAG_FALSE => self.take_byte().map(|_| false),
            found => Err(DecodeError::UnexpectedTag {
                expected: "bool",
                found,
            }),
        }
    }

    fn read_byte(&mut self) -> Result<u8, DecodeError> {
        self.expect_tag(TAG_BYTE)?;
        self.take_byte()
    }

    fn read_char(&mut self) -> Result<u32, DecodeError> {
        self.expect_tag(TAG_CHAR)?;
        let offset = self.position();
        let c = varint::unpack_unsigned(self)?;
        u32::try_from(c).map_err(|_| DecodeError::IntegerOverflow { offset })
    }

    fn read_timestamp(&mut self) -> Result<Timestamp, DecodeError> {
        self.expect_tag(TAG_TIMESTAMP)?;
        Ok(Timestamp::from_raw(varint::unpack_i64(self)?))
    }

    fn read_fixed32(&mut self) -> Result<f32, DecodeError> {
        self.expect_tag(TAG_FIXED32)?;
        Ok(fixed::fixed32_from_wire(self.read_signed()?))
    }

    fn read_fixed64(&mut self) -> Result<f64, DecodeError> {
        self.expect_tag(TAG_FIXED64)?;
        Ok(fixed::fixed64_from_wire(self.read_signed()?))
    }

    fn read_u64(&mut self) -> Result<u64, DecodeError> {
        match self.peek_byte()? {
            TAG_VARUINT => {
                self.take_byte()?;
                varint::unpack_unsigned(self)
            }
            TAG_VARINT => {
                self.take_byte()?;
                let offset = self.position();
                let i = self.read_signed()?;
                u64::try_from(i).map_err(|_| DecodeError::IntegerOverflow { offset })
            }
            found => Err(DecodeError::UnexpectedTag {
                expected: "unsigned integer",
                found,
            }),
        }
    }

    fn read_i64(&mut self) -> Result<i64, DecodeError> {
        match self.peek_byte()? {
            TAG_VARINT => {
                self.take_byte()?;
                varint::unpack_i64(self)
            }
            TAG_VARUINT => {
                self.take_byte()?;
                let offset = self.position();
                let u = varint::unpack_unsigned(self)?;
                i64::try_from(u).map_err(|_| DecodeError::IntegerOverflow { offset })
            }
            found => Err(DecodeError::UnexpectedTag {
                expected: "signed integer",
                found,
            }),
        }
    }

    fn read_str(&mut self) -> Result<String, DecodeError> {
        self.expect_tag(TAG_STRING)?;
        self.read_utf8()
    }

    fn read_binary(&mut self) -> Result<Bytes, DecodeError> {
        self.expect_tag(TAG_BINARY)?;
        let len = self.read_len()?;
        self.read_many(len)
    }
}

/// A value that can be read from a [`Deserializer`].
pub trait De: Sized {
    /// Reads one value, tag first.
    fn de<D: Deserializer>(d: &mut D) -> Result<Self, DecodeError>;
}

fn read_entries<D: Deserializer, T: De>(d: &mut D) -> Result<VecMap<String, T>, DecodeError> {
    let len = d.start_map()?;
    let entries: Result<Vec<(String, T)>, DecodeError> = (0..len)
        .map(|_| -> Result<(String, T), DecodeError> {
            Ok((d.take_key()?, d.take_val()?))
        })
        .collect();
    // leave the level even when an entry failed
    d.end_map();
    let entries = entries?;

    if d.options().duplicate_keys == DuplicateKeys::Reject {
        let mut keys: Vec<&String> = entries.iter().map(|(k, _)| k).collect();
        keys.sort_unstable();
        if let Some(dup) = keys.windows(2).find(|w| w[0] == w[1]) {
            return Err(DecodeError::DuplicateKey {
                key: dup[0].clone(),
            });
        }
    }

    // stable sort, last write wins
    Ok(VecMap::from(entries))
}

impl De for Packed {
    fn de<D: Deserializer>(d: &mut D) -> Result<Self, DecodeError> {
        let offset = d.position();
        Ok(match d.peek_tag()? {
            TAG_NULL => {
                d.read_null()?;
                Packed::Null
            }
            TAG_TRUE | TAG_FALSE => Packed::Bool(d.read_bool()?),
            TAG_BYTE => Packed::Byte(d.read_byte()?),
            TAG_CHAR => Packed::Char(d.read_char()?),
            TAG_TIMESTAMP => Packed::Timestamp(d.read_timestamp()?),
            TAG_FIXED32 => Packed::Fixed32(d.read_fixed32()?),
            TAG_FIXED64 => Packed::Fixed64(d.read_fixed64()?),
            TAG_VARUINT => Packed::VarUInt(d.read_u64()?),
            TAG_VARINT => Packed::VarInt(d.read_i64()?),
            TAG_OBJECT => Packed::Object(read_entries(d)?),
            TAG_ARRAY => Packed::Array(Vec::de(d)?),
            TAG_STRING => Packed::Str(d.read_str()?),
            TAG_BINARY => Packed::Binary(d.read_binary()?),
            tag => return Err(DecodeError::UnsupportedTag { tag, offset }),
        })
    }
}

impl De for () {
    fn de<D: Deserializer>(d: &mut D) -> Result<Self, DecodeError> { d.read_null() }
}

impl De for bool {
    fn de<D: Deserializer>(d: &mut D) -> Result<Self, DecodeError> { d.read_bool() }
}

impl De for u8 {
    fn de<D: Deserializer>(d: &mut D) -> Result<Self, DecodeError> { d.read_byte() }
}

impl De for char {
    fn de<D: Deserializer>(d: &mut D) -> Result<Self, DecodeError> {
        let found = d.peek_tag()?;
        let c = d.read_char()?;
        std::char::from_u32(c).ok_or(DecodeError::UnexpectedTag {
            expected: "char",
            found,
        })
    }
}

impl De for Timestamp {
    fn de<D: Deserializer>(d: &mut D) -> Result<Self, DecodeError> { d.read_timestamp() }
}

impl De for f32 {
    fn de<D: Deserializer>(d: &mut D) -> Result<Self, DecodeError> { d.read_fixed32() }
}

impl De for f64 {
    fn de<D: Deserializer>(d: &mut D) -> Result<Self, DecodeError> { d.read_fixed64() }
}

impl De for u64 {
    fn de<D: Deserializer>(d: &mut D) -> Result<Self, DecodeError> { d.read_u64() }
}

impl De for i64 {
    fn de<D: Deserializer>(d: &mut D) -> Result<Self, DecodeError> { d.read_i64() }
}

macro_rules! de_narrow {
    ($method:ident, $($t:ty),*) => {
        $(
            impl De for $t {
                fn de<D: Deserializer>(d: &mut D) -> Result<Self, DecodeError> {
                    // the payload starts after the tag
                    let offset = d.position() + 1;
                    let wide = d.$method()?;
                    <$t>::try_from(wide).map_err(|_| DecodeError::IntegerOverflow { offset })
                }
            }
        )*
    };
}

de_narrow!(read_u64, u16, u32, usize);
de_narrow!(read_i64, i8, i16, i32, isize);

impl De for String {
    fn de<D: Deserializer>(d: &mut D) -> Result<Self, DecodeError> { d.read_str() }
}

impl De for Bytes {
    fn de<D: Deserializer>(d: &mut D) -> Result<Self, DecodeError> { d.read_binary() }
}

impl<T: De> De for Vec<T> {
    fn de<D: Deserializer>(d: &mut D) -> Result<Self, DecodeError> {
        let len = d.start_seq()?;
        let out = (0..len).map(|_| d.take_next()).collect();
        d.end_seq();
        out
    }
}

impl<T: De> De for VecMap<String, T> {
    fn de<D: Deserializer>(d: &mut D) -> Result<Self, DecodeError> { read_entries(d) }
}

impl<T: De> De for Option<T> {
    fn de<D: Deserializer>(d: &mut D) -> Result<Self, DecodeError> {
        if d.peek_tag()? == TAG_NULL {
            d.read_null()?;
            Ok(None)
        } else {
            T::de(d).map(Some)
        }
    }
}
