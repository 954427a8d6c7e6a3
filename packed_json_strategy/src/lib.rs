use bytes::Bytes;
use packed_json::{timestamp::Timestamp, vecmap::VecMap, Packed};
use proptest::prelude::*;

/// arbitrary Bytes for use with proptest
pub fn arb_bs() -> impl Strategy<Value = Bytes> {
    prop::collection::vec(any::<u8>(), 0..64).prop_map(Bytes::from)
}

/// arbitrary Timestamp composite, including kind bits no encoder produces
pub fn arb_timestamp() -> impl Strategy<Value = Timestamp> { any::<i64>().prop_map(Timestamp::from_raw) }

/// 32-bit reals inside the range fixed point can carry
pub fn arb_fixed32() -> impl Strategy<Value = f32> { -1.0e9f32..1.0e9f32 }

/// 64-bit reals inside the range fixed point can carry
pub fn arb_fixed64() -> impl Strategy<Value = f64> { -1.0e3f64..1.0e3f64 }

/// arbitrary Packed for use with proptest
pub fn arb_packed() -> impl Strategy<Value = Packed> {
    let leaf = prop_oneof![
        Just(Packed::Null),
        // misc
        any::<bool>().prop_map(Packed::Bool),
        any::<String>().prop_map(Packed::Str),
        any::<char>().prop_map(Packed::from),
        // code points that aren't chars too
        any::<u32>().prop_map(Packed::Char),
        arb_timestamp().prop_map(Packed::Timestamp),
        // integers
        any::<u8>().prop_map(Packed::Byte),
        any::<u64>().prop_map(Packed::VarUInt),
        any::<i64>().prop_map(Packed::VarInt),
        // reals
        arb_fixed32().prop_map(Packed::Fixed32),
        arb_fixed64().prop_map(Packed::Fixed64),
        // binary
        arb_bs().prop_map(Packed::Binary),
    ];
    leaf.prop_recursive(
        8,  // max depth
        64, // max nodes
        10, // max items per collection
        |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..10).prop_map(Packed::Array),
                prop::collection::btree_map(any::<String>(), inner, 0..10)
                    .prop_map(|m| Packed::Object(VecMap::from(m)))
            ]
        },
    )
}

/// Equality that allows fixed-point values to differ by their rounding error.
pub fn packed_approx_eq(a: &Packed, b: &Packed) -> bool {
    match (a, b) {
        (Packed::Fixed32(x), Packed::Fixed32(y)) => {
            let (x, y) = (*x as f64, *y as f64);
            (x - y).abs() <= (x.abs() * 1e-6).max(1e-7)
        }
        (Packed::Fixed64(x), Packed::Fixed64(y)) => {
            (x - y).abs() <= (x.abs() * 1e-15).max(1e-15)
        }
        (Packed::Array(xs), Packed::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| packed_approx_eq(x, y))
        }
        (Packed::Object(xs), Packed::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .zip(ys.iter())
                    .all(|((kx, x), (ky, y))| kx == ky && packed_approx_eq(x, y))
        }
        _ => a == b,
    }
}
