//! The variable-length integer scheme every numeric payload funnels through.
//!
//! A value is split into 7-bit groups, least significant group first. Each group is
//! stored in one byte with its payload bits *reversed*: bit `i` of the group lands in
//! bit `6 - i` of the byte. Bit 7 of every byte except the last is set.
//!
//! | value | bytes          |
//! | ---   | ---            |
//! | `0`   | `00`           |
//! | `1`   | `40`           |
//! | `127` | `7f`           |
//! | `128` | `80 40`        |
//!
//! Signed values prepend a sign bit to the magnitude, so the sign sits in bit 6 of the
//! first byte and the magnitude is shifted up by one: `1` is `20`, `-1` is `60`.

use super::{constants::*, cursor::Cursor};
use crate::errors::DecodeError;
use smallvec::SmallVec;

/// Most bytes a single varint may occupy. Sign plus a 64-bit magnitude needs 65 bits,
/// which is ten 7-bit chunks.
pub const MAX_VARINT_LEN: usize = 10;

/// Largest magnitude the signed scheme carries.
pub const MAX_MAGNITUDE: i128 = u64::max_value() as i128;

/// The chunks of one encoded varint.
pub type Chunks = SmallVec<[u8; MAX_VARINT_LEN]>;

/// Reverses the seven payload bits of a chunk. The mapping is its own inverse.
#[inline]
fn flip_payload(byte: u8) -> u8 { (byte & MASK_PAYLOAD).reverse_bits() >> 1 }

#[inline]
fn pack(bits: u128) -> Chunks {
    let last = if bits == 0 {
        0
    } else {
        127 - bits.leading_zeros()
    };
    let n_chunks = last / CHUNK_BITS + 1;

    let mut out = Chunks::new();
    for chunk in 0..n_chunks {
        let group = (bits >> (chunk * CHUNK_BITS)) as u8;
        out.push(CONTINUATION | flip_payload(group));
    }

    // n_chunks >= 1
    let terminal = out.len() - 1;
    out[terminal] &= MASK_PAYLOAD;
    out
}

/// Packs an unsigned integer.
///
/// # Example
///
/// ```
/// use packed_json::encoding::varint::pack_unsigned;
///
/// assert_eq!(pack_unsigned(0).as_slice(), &[0x00]);
/// assert_eq!(pack_unsigned(127).as_slice(), &[0x7f]);
/// assert_eq!(pack_unsigned(128).as_slice(), &[0x80, 0x40]);
/// ```
pub fn pack_unsigned(n: u64) -> Chunks { pack(n as u128) }

/// Packs a signed integer as a sign bit followed by its magnitude.
///
/// Magnitudes above [`MAX_MAGNITUDE`] are clamped to it.
///
/// # Example
///
/// ```
/// use packed_json::encoding::varint::pack_signed;
///
/// assert_eq!(pack_signed(1).as_slice(), &[0x20]);
/// assert_eq!(pack_signed(-1).as_slice(), &[0x60]);
/// ```
pub fn pack_signed(n: i128) -> Chunks {
    let negative = n < 0;
    let magnitude = n.unsigned_abs().min(MAX_MAGNITUDE as u128);
    pack((magnitude << 1) | negative as u128)
}

/// Packs an `i64`. `i64::MIN` is exact: its magnitude `2^63` fits the unsigned
/// magnitude field.
pub fn pack_i64(n: i64) -> Chunks { pack_signed(n as i128) }

/// Reads chunks up to and including the terminal one, returning the reassembled bits
/// and the offset the varint started at.
fn unpack(cursor: &mut Cursor) -> Result<(u128, usize), DecodeError> {
    let start = cursor.position();
    let mut bits = 0u128;

    for chunk in 0..MAX_VARINT_LEN as u32 {
        let byte = cursor.take_byte()?;
        bits |= (flip_payload(byte) as u128) << (chunk * CHUNK_BITS);
        if byte & CONTINUATION == 0 {
            return Ok((bits, start));
        }
    }

    Err(DecodeError::IntegerTooLong { offset: start })
}

/// Reads an unsigned varint.
///
/// # Errors
///
/// * [`DecodeError::TruncatedInput`] if the input ends before the terminal chunk.
/// * [`DecodeError::IntegerTooLong`] if more than [`MAX_VARINT_LEN`] chunks are
///   continued.
/// * [`DecodeError::IntegerOverflow`] if the value does not fit in a `u64`.
pub fn unpack_unsigned(cursor: &mut Cursor) -> Result<u64, DecodeError> {
    let (bits, offset) = unpack(cursor)?;
    if bits > u64::max_value() as u128 {
        return Err(DecodeError::IntegerOverflow { offset });
    }
    Ok(bits as u64)
}

/// Reads a signed varint. The result is within `±MAX_MAGNITUDE`; a set sign bit with a
/// zero magnitude reads as `0`.
pub fn unpack_signed(cursor: &mut Cursor) -> Result<i128, DecodeError> {
    let (bits, offset) = unpack(cursor)?;
    let negative = bits & 1 == 1;
    let magnitude = bits >> 1;
    if magnitude > MAX_MAGNITUDE as u128 {
        return Err(DecodeError::IntegerOverflow { offset });
    }
    let magnitude = magnitude as i128;
    Ok(if negative { -magnitude } else { magnitude })
}

/// Reads a signed varint that must fit in an `i64`.
pub fn unpack_i64(cursor: &mut Cursor) -> Result<i64, DecodeError> {
    let offset = cursor.position();
    let n = unpack_signed(cursor)?;
    if n < i64::min_value() as i128 || n > i64::max_value() as i128 {
        return Err(DecodeError::IntegerOverflow { offset });
    }
    Ok(n as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unsigned(bytes: &[u8]) -> Result<u64, DecodeError> {
        unpack_unsigned(&mut Cursor::new(bytes.to_vec()))
    }

    fn signed(bytes: &[u8]) -> Result<i64, DecodeError> {
        unpack_i64(&mut Cursor::new(bytes.to_vec()))
    }

    #[test]
    fn canonical_lengths() {
        assert_eq!(pack_unsigned(0).as_slice(), &[0x00]);
        assert_eq!(pack_unsigned(1).as_slice(), &[0b0100_0000]);
        assert_eq!(pack_unsigned(2).as_slice(), &[0b0010_0000]);
        assert_eq!(pack_unsigned(127).as_slice(), &[0b0111_1111]);
        assert_eq!(pack_unsigned(128).as_slice(), &[0b1000_0000, 0b0100_0000]);
        assert_eq!(pack_unsigned(u64::max_value()).len(), MAX_VARINT_LEN);
    }

    #[test]
    fn bit_placement() {
        // 0b1_0000001: bit 0 -> chunk 0, bit 7 -> chunk 1
        assert_eq!(pack_unsigned(129).as_slice(), &[0b1100_0000, 0b0100_0000]);
        // 2^14 needs a third chunk
        assert_eq!(
            pack_unsigned(1 << 14).as_slice(),
            &[0b1000_0000, 0b1000_0000, 0b0100_0000]
        );
    }

    #[test]
    fn sign_bit_comes_first() {
        assert_eq!(pack_i64(0).as_slice(), &[0x00]);
        assert_eq!(pack_i64(1).as_slice(), &[0b0010_0000]);
        assert_eq!(pack_i64(-1).as_slice(), &[0b0110_0000]);
        // magnitude 63 fills the first chunk with the sign
        assert_eq!(pack_i64(-63).as_slice(), &[0b0111_1111]);
        assert_eq!(pack_i64(64).as_slice(), &[0b1000_0000, 0b0100_0000]);
    }

    #[test]
    fn unsigned_round_trips() {
        for &n in &[0, 1, 127, 128, 16_383, 16_384, u32::max_value() as u64, u64::max_value()] {
            assert_eq!(unsigned(&pack_unsigned(n)), Ok(n));
        }
    }

    #[test]
    fn signed_round_trips() {
        for &n in &[0, 1, -1, 63, -64, 1 << 40, i64::max_value(), i64::min_value()] {
            assert_eq!(signed(&pack_i64(n)), Ok(n));
        }
    }

    #[test]
    fn wide_magnitudes() {
        let max = pack_signed(MAX_MAGNITUDE);
        assert_eq!(max.len(), MAX_VARINT_LEN);
        assert_eq!(unpack_signed(&mut Cursor::new(max.to_vec())), Ok(MAX_MAGNITUDE));

        // clamped
        assert_eq!(pack_signed(-MAX_MAGNITUDE * 4), pack_signed(-MAX_MAGNITUDE));

        // fits the scheme, not an i64
        assert_eq!(
            signed(&pack_signed(i64::max_value() as i128 + 1)),
            Err(DecodeError::IntegerOverflow { offset: 0 })
        );
    }

    #[test]
    fn negative_zero() {
        // sign bit only
        assert_eq!(signed(&[0b0100_0000]), Ok(0));
    }

    #[test]
    fn non_minimal_is_accepted() {
        assert_eq!(unsigned(&[0b1100_0000, 0x00]), Ok(1));
    }

    #[test]
    fn truncated() {
        assert_eq!(unsigned(&[]), Err(DecodeError::TruncatedInput { offset: 0 }));
        assert_eq!(
            unsigned(&[0x80, 0x80]),
            Err(DecodeError::TruncatedInput { offset: 2 })
        );
    }

    #[test]
    fn too_long() {
        assert_eq!(
            unsigned(&[0x80; 11]),
            Err(DecodeError::IntegerTooLong { offset: 0 })
        );
        // ten continued chunks fail before an eleventh is read
        assert_eq!(
            unsigned(&[0x80; 10]),
            Err(DecodeError::IntegerTooLong { offset: 0 })
        );
    }

    #[test]
    fn overflow() {
        // 2^64: nine empty chunks, then bit 1 of the tenth
        let mut bytes = vec![0x80; 9];
        bytes.push(0b0010_0000);
        assert_eq!(unsigned(&bytes), Err(DecodeError::IntegerOverflow { offset: 0 }));

        // u64::MAX is the last value that fits
        let mut bytes = vec![0xff; 9];
        bytes.push(0b0100_0000);
        assert_eq!(unsigned(&bytes), Ok(u64::max_value()));
    }
}
