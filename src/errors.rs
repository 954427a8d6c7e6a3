//! Errors produced by the codec and by the object-mapping adapter.

use failure::Fail;

#[derive(Debug, Clone, PartialEq, Eq, Fail)]
/// An error encountered when decoding fails.
///
/// Every variant is terminal for the decode call that produced it: no partial value is
/// returned.
pub enum DecodeError {
    /// The input ended in the middle of a value.
    #[fail(display = "input ended in the middle of a value at byte {}", offset)]
    TruncatedInput {
        /// Offset at which more bytes were needed.
        offset: usize,
    },
    /// A varint kept its continuation bit set past the width limit.
    #[fail(display = "varint starting at byte {} is longer than the width limit", offset)]
    IntegerTooLong {
        /// Offset of the first byte of the varint.
        offset: usize,
    },
    /// A varint carried more payload bits than its target type can hold.
    #[fail(display = "varint starting at byte {} does not fit its target type", offset)]
    IntegerOverflow {
        /// Offset of the first byte of the varint.
        offset: usize,
    },
    /// A reserved or unknown tag byte.
    #[fail(display = "unsupported tag {:#04x} at byte {}", tag, offset)]
    UnsupportedTag {
        /// The tag byte.
        tag: u8,
        /// Offset of the tag byte.
        offset: usize,
    },
    /// String bytes were not valid UTF-8.
    #[fail(display = "string at byte {} is not valid UTF-8", offset)]
    InvalidUtf8 {
        /// Offset of the first byte of the string payload.
        offset: usize,
    },
    /// A key appeared twice in one object while duplicate keys were rejected.
    #[fail(display = "duplicate object key `{}`", key)]
    DuplicateKey {
        /// The repeated key.
        key: String,
    },
    /// Arrays and objects were nested deeper than allowed.
    #[fail(display = "nesting exceeds the limit of {} levels", limit)]
    DepthLimitExceeded {
        /// The configured limit.
        limit: usize,
    },
    /// A complete value was decoded but bytes were left over.
    #[fail(display = "{} bytes left over after the value", remaining)]
    TrailingBytes {
        /// Number of unread bytes.
        remaining: usize,
    },
    /// A typed decode found a different kind of value than it asked for.
    #[fail(display = "expected {}, found tag {:#04x}", expected, found)]
    UnexpectedTag {
        /// What the caller asked for.
        expected: &'static str,
        /// The tag byte that was found.
        found: u8,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Fail)]
/// An error encountered when encoding a host value fails.
pub enum EncodeError {
    /// No converter was registered for the value's type.
    #[fail(display = "no converter registered for `{}`", type_name)]
    UnmappedType {
        /// Name of the unmapped type.
        type_name: String,
    },
}

#[derive(Debug, Clone, Default, Fail)]
#[fail(display = "Conversion failed with error: {}", _0)]
/// An error encountered when a type-conversion from [`Packed`](crate::Packed) fails.
pub struct ConversionError(pub String);

impl ConversionError {
    /// Creates a new `ConversionError`
    ///
    /// # Arguments
    ///
    /// * `s: &str` - The message associated with the error.
    pub fn new(s: &str) -> Self { ConversionError(s.to_string()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let e = DecodeError::UnsupportedTag { tag: 0x07, offset: 0 };
        assert_eq!(e.to_string(), "unsupported tag 0x07 at byte 0");

        let e = DecodeError::DuplicateKey { key: "a".to_string() };
        assert_eq!(e.to_string(), "duplicate object key `a`");

        let e = ConversionError::new("not a string");
        assert_eq!(e.to_string(), "Conversion failed with error: not a string");
    }
}
