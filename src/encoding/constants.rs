/// `Null`, 0x00
pub(crate) const TAG_NULL: u8 = 0x00;
/// `true`, 0x01
pub(crate) const TAG_TRUE: u8 = 0x01;
/// `false`, 0x02
pub(crate) const TAG_FALSE: u8 = 0x02;
/// Single raw byte, 0x03
pub(crate) const TAG_BYTE: u8 = 0x03;
/// Code point as an unsigned varint, 0x04
pub(crate) const TAG_CHAR: u8 = 0x04;
/// Opaque timestamp composite as a signed varint, 0x05
pub(crate) const TAG_TIMESTAMP: u8 = 0x05;

/// First reserved scalar tag, 0x06
pub(crate) const TAG_RESERVED_MIN: u8 = 0x06;
/// Last reserved scalar tag, 0x0f
pub(crate) const TAG_RESERVED_MAX: u8 = 0x0f;

/// Fixed-point real, scale 1e8, 0x10
pub(crate) const TAG_FIXED32: u8 = 0x10;
/// Fixed-point real, scale 1e16, 0x11
pub(crate) const TAG_FIXED64: u8 = 0x11;
/// Unsigned varint, 0x12
pub(crate) const TAG_VARUINT: u8 = 0x12;
/// Signed varint, 0x13
pub(crate) const TAG_VARINT: u8 = 0x13;

/// Object, 0x20
pub(crate) const TAG_OBJECT: u8 = 0x20;
/// Array, 0x21
pub(crate) const TAG_ARRAY: u8 = 0x21;
/// UTF-8 string, 0x22
pub(crate) const TAG_STRING: u8 = 0x22;
/// Raw bytes, 0x23
pub(crate) const TAG_BINARY: u8 = 0x23;

/// Continuation bit of a varint chunk.
pub(crate) const CONTINUATION: u8 = 0b1000_0000;
/// Payload bits of a varint chunk.
pub(crate) const MASK_PAYLOAD: u8 = 0b0111_1111;
/// Payload bits per chunk.
pub(crate) const CHUNK_BITS: u32 = 7;

/// Fixed32 scale.
pub(crate) const SCALE_FIXED32: f64 = 1e8;
/// Fixed64 scale.
pub(crate) const SCALE_FIXED64: f64 = 1e16;
