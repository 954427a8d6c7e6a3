use super::{constants::*, varint};
use crate::{fixed, timestamp::Timestamp, vecmap::VecMap, Packed};
use bytes::{BufMut, Bytes, BytesMut};

/// A sink for encoded bytes.
pub trait Serializer {
    /// The type of the output value.
    type Out;
    /// Add a byte to the output value.
    fn put_u8(&mut self, u: u8);
    /// Add a slice to the output value.
    fn put_slice(&mut self, slice: &[u8]);
    /// Return the output value.
    fn finalize(self) -> Self::Out;
}

impl Serializer for Vec<u8> {
    type Out = Self;

    fn put_u8(&mut self, u: u8) { self.push(u) }

    fn put_slice(&mut self, slice: &[u8]) { self.extend_from_slice(slice) }

    fn finalize(self) -> Self::Out { self }
}

impl Serializer for BytesMut {
    type Out = Bytes;

    fn put_u8(&mut self, u: u8) { BufMut::put_u8(self, u) }

    fn put_slice(&mut self, slice: &[u8]) { self.extend_from_slice(slice) }

    fn finalize(self) -> Self::Out { self.freeze() }
}

/// Convenience methods for [`Serializer`]. Every method writes a tag byte followed by
/// its payload, except [`put_key`](SerializerExt::put_key).
pub trait SerializerExt: Serializer {
    /// Add [`Packed::Null`] to the output value.
    fn put_null(&mut self);
    /// Add a [`bool`] to the output value.
    ///
    /// # Arguments
    ///
    /// * `b: bool` - The value to be added.
    fn put_bool(&mut self, b: bool);
    /// Add a single raw byte.
    ///
    /// # Arguments
    ///
    /// * `b: u8` - The value to be added.
    fn put_byte(&mut self, b: u8);
    /// Add a code point. The value is not checked to be a valid [`char`].
    ///
    /// # Arguments
    ///
    /// * `c: u32` - The code point to be added.
    fn put_char(&mut self, c: u32);
    /// Add a [`Timestamp`] as its raw composite.
    fn put_timestamp(&mut self, ts: Timestamp);
    /// Add an [`f32`] as a fixed-point value scaled by `1e8`.
    ///
    /// # Arguments
    ///
    /// * `f: f32` - The value to be added.
    fn put_fixed32(&mut self, f: f32);
    /// Add an [`f64`] as a fixed-point value scaled by `1e16`.
    ///
    /// # Arguments
    ///
    /// * `f: f64` - The value to be added.
    fn put_fixed64(&mut self, f: f64);
    /// Add an unsigned integer.
    fn put_varuint(&mut self, u: u64);
    /// Add a signed integer.
    fn put_varint(&mut self, i: i64);
    /// Add a string.
    fn put_str(&mut self, s: &str);
    /// Add raw binary data.
    fn put_binary(&mut self, b: &[u8]);
    /// Add an object key: length and bytes, with no tag.
    fn put_key(&mut self, k: &str);

    /// Add the tag and count of an array. The caller writes `len` values after it.
    fn put_array_header(&mut self, len: usize);
    /// Add the tag and count of an object. The caller writes `len` key/value pairs
    /// after it.
    fn put_object_header(&mut self, len: usize);

    /// Add a slice as an array.
    ///
    /// # Arguments
    ///
    /// * `v` - The value to be added.
    fn put_arr<T: Ser>(&mut self, v: &[T]);
    /// Add a map as an object, in iteration order.
    ///
    /// # Arguments
    ///
    /// * `m` - The value to be added.
    fn put_object<T: Ser>(&mut self, m: &VecMap<String, T>);
}

#[inline]
fn put_len<S: Serializer + ?Sized>(out: &mut S, len: usize) {
    out.put_slice(&varint::pack_unsigned(len as u64))
}

impl<S: Serializer> SerializerExt for S {
    fn put_null(&mut self) { self.put_u8(TAG_NULL) }

    fn put_bool(&mut self, b: bool) {
        if b {
            self.put_u8(TAG_TRUE)
        } else {
            self.put_u8(TAG_FALSE)
        }
    }

    fn put_byte(&mut self, b: u8) {
        self.put_u8(TAG_BYTE);
        self.put_u8(b);
    }

    fn put_char(&mut self, c: u32) {
        self.put_u8(TAG_CHAR);
        self.put_slice(&varint::pack_unsigned(c as u64));
    }

    fn put_timestamp(&mut self, ts: Timestamp) {
        self.put_u8(TAG_TIMESTAMP);
        self.put_slice(&varint::pack_i64(ts.to_raw()));
    }

    fn put_fixed32(&mut self, f: f32) {
        self.put_u8(TAG_FIXED32);
        self.put_slice(&varint::pack_signed(fixed::fixed32_to_wire(f)));
    }

    fn put_fixed64(&mut self, f: f64) {
        self.put_u8(TAG_FIXED64);
        self.put_slice(&varint::pack_signed(fixed::fixed64_to_wire(f)));
    }

    #[inline]
    fn put_varuint(&mut self, u: u64) {
        self.put_u8(TAG_VARUINT);
        self.put_slice(&varint::pack_unsigned(u));
    }

    #[inline]
    fn put_varint(&mut self, i: i64) {
        self.put_u8(TAG_VARINT);
        self.put_slice(&varint::pack_i64(i));
    }

    fn put_str(&mut self, s: &str) {
        self.put_u8(TAG_STRING);
        self.put_key(s);
    }

    fn put_binary(&mut self, b: &[u8]) {
        self.put_u8(TAG_BINARY);
        put_len(self, b.len());
        self.put_slice(b);
    }

    fn put_key(&mut self, k: &str) {
        put_len(self, k.len());
        self.put_slice(k.as_bytes());
    }

    fn put_array_header(&mut self, len: usize) {
        self.put_u8(TAG_ARRAY);
        put_len(self, len);
    }

    fn put_object_header(&mut self, len: usize) {
        self.put_u8(TAG_OBJECT);
        put_len(self, len);
    }

    fn put_arr<T: Ser>(&mut self, v: &[T]) {
        self.put_array_header(v.len());
        for t in v {
            t.ser(self);
        }
    }

    fn put_object<T: Ser>(&mut self, m: &VecMap<String, T>) {
        self.put_object_header(m.len());
        for (k, v) in m.iter() {
            self.put_key(k);
            v.ser(self);
        }
    }
}

/// A value that can be written to a [`Serializer`].
pub trait Ser {
    /// Writes `self`, tag first.
    fn ser<S: Serializer>(&self, s: &mut S);
}

impl<T: Ser + ?Sized> Ser for &T {
    fn ser<S: Serializer>(&self, s: &mut S) { (*self).ser(s) }
}

impl Ser for Packed {
    fn ser<S: Serializer>(&self, s: &mut S) {
        match self {
            Packed::Null => s.put_null(),
            Packed::Bool(b) => s.put_bool(*b),
            Packed::Byte(b) => s.put_byte(*b),
            Packed::Char(c) => s.put_char(*c),
            Packed::Timestamp(ts) => s.put_timestamp(*ts),
            Packed::Fixed32(f) => s.put_fixed32(*f),
            Packed::Fixed64(f) => s.put_fixed64(*f),
            Packed::VarUInt(u) => s.put_varuint(*u),
            Packed::VarInt(i) => s.put_varint(*i),
            Packed::Object(m) => s.put_object(m),
            Packed::Array(a) => s.put_arr(a),
            Packed::Str(st) => s.put_str(st),
            Packed::Binary(bs) => s.put_binary(bs),
        }
    }
}

impl Ser for () {
    fn ser<S: Serializer>(&self, s: &mut S) { s.put_null() }
}

impl Ser for bool {
    fn ser<S: Serializer>(&self, s: &mut S) { s.put_bool(*self) }
}

impl Ser for u8 {
    fn ser<S: Serializer>(&self, s: &mut S) { s.put_byte(*self) }
}

impl Ser for char {
    fn ser<S: Serializer>(&self, s: &mut S) { s.put_char(*self as u32) }
}

impl Ser for Timestamp {
    fn ser<S: Serializer>(&self, s: &mut S) { s.put_timestamp(*self) }
}

impl Ser for f32 {
    fn ser<S: Serializer>(&self, s: &mut S) { s.put_fixed32(*self) }
}

impl Ser for f64 {
    fn ser<S: Serializer>(&self, s: &mut S) { s.put_fixed64(*self) }
}

macro_rules! ser_as {
    ($method:ident, $wide:ty, $($t:ty),*) => {
        $(
            impl Ser for $t {
                fn ser<S: Serializer>(&self, s: &mut S) { s.$method(*self as $wide) }
            }
        )*
    };
}

ser_as!(put_varuint, u64, u16, u32, u64, usize);
ser_as!(put_varint, i64, i8, i16, i32, i64, isize);

impl Ser for str {
    fn ser<S: Serializer>(&self, s: &mut S) { s.put_str(self) }
}

impl Ser for String {
    fn ser<S: Serializer>(&self, s: &mut S) { s.put_str(self) }
}

impl Ser for Bytes {
    fn ser<S: Serializer>(&self, s: &mut S) { s.put_binary(self) }
}

impl<T: Ser> Ser for [T] {
    fn ser<S: Serializer>(&self, s: &mut S) { s.put_arr(self) }
}

impl<T: Ser> Ser for Vec<T> {
    fn ser<S: Serializer>(&self, s: &mut S) { s.put_arr(self) }
}

impl<T: Ser> Ser for VecMap<String, T> {
    fn ser<S: Serializer>(&self, s: &mut S) { s.put_object(self) }
}

impl<T: Ser> Ser for Option<T> {
    fn ser<S: Serializer>(&self, s: &mut S) {
        match self {
            Some(t) => t.ser(s),
            None => s.put_null(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::encode_full;

    #[test]
    fn natives_match_packed() {
        assert_eq!(encode_full(&true), encode_full(&Packed::Bool(true)));
        assert_eq!(encode_full(&7u8), encode_full(&Packed::Byte(7)));
        assert_eq!(encode_full(&'x'), encode_full(&Packed::from('x')));
        assert_eq!(encode_full(&7u32), encode_full(&Packed::VarUInt(7)));
        assert_eq!(encode_full(&-7i16), encode_full(&Packed::VarInt(-7)));
        assert_eq!(encode_full(&0.25f64), encode_full(&Packed::Fixed64(0.25)));
        assert_eq!(encode_full("hi"), encode_full(&Packed::from("hi")));
        assert_eq!(
            encode_full(&vec![1u64, 2]),
            encode_full(&Packed::from(vec![1u64, 2]))
        );
    }

    #[test]
    fn option_is_null_or_value() {
        assert_eq!(encode_full(&None::<u64>), vec![TAG_NULL]);
        assert_eq!(encode_full(&Some(3u64)), encode_full(&3u64));
    }

    #[test]
    fn bytes_mut_finalizes_to_bytes() {
        let mut out = BytesMut::new();
        out.put_binary(&[9, 8]);
        assert_eq!(out.finalize(), Bytes::from(vec![TAG_BINARY, 0b0010_0000, 9, 8]));
    }

    #[test]
    fn empty_collections() {
        assert_eq!(encode_full(&Vec::<u64>::new()), vec![TAG_ARRAY, 0x00]);
        assert_eq!(
            encode_full(&VecMap::<String, Packed>::new()),
            vec![TAG_OBJECT, 0x00]
        );
        assert_eq!(encode_full(""), vec![TAG_STRING, 0x00]);
    }
}
