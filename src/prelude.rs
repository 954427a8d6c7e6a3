pub use crate::{
    encoding::{decode, decode_full, decode_rep, decode_with, encode, encode_full, DecodeOptions},
    packed_json_macro::*,
    registry::Converters,
    rep::*,
    timestamp::{Timestamp, TimestampKind},
    vecmap::VecMap,
    Packed,
};
pub use bytes::Bytes;
pub use half::f16;
pub use std::convert::TryFrom;
