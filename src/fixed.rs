//! Fixed-point reals.
//!
//! Reals travel as integers scaled by a power of ten: `1e8` for [`Packed::Fixed32`]
//! and `1e16` for [`Packed::Fixed64`]. Scaling rounds to nearest with ties to even.
//!
//! The conversion is lossy in three documented ways:
//!
//! * digits below the scale are rounded away,
//! * `NaN` encodes as `0`,
//! * values whose scaled magnitude exceeds `u64::MAX` saturate.
//!
//! Higher-precision decimal inputs are expected to go through [`Packed::fixed64`] and
//! lose whatever precision an `f64` cannot hold.
//!
//! [`Packed::Fixed32`]: crate::Packed::Fixed32
//! [`Packed::Fixed64`]: crate::Packed::Fixed64
//! [`Packed::fixed64`]: crate::Packed::fixed64

use crate::encoding::varint::MAX_MAGNITUDE;
use num_traits::{clamp, ToPrimitive};

pub(crate) use crate::encoding::constants::{SCALE_FIXED32, SCALE_FIXED64};

/// Largest magnitude a [`Packed::Fixed32`] carries without saturating, about `1.8e11`.
pub const FIXED32_MAX: f64 = MAX_MAGNITUDE as f64 / SCALE_FIXED32;

/// Largest magnitude a [`Packed::Fixed64`] carries without saturating, about `1844.67`.
pub const FIXED64_MAX: f64 = MAX_MAGNITUDE as f64 / SCALE_FIXED64;

/// Scales `value` and rounds it to the integer carried on the wire.
///
/// # Example
///
/// ```
/// use packed_json::fixed::to_scaled;
///
/// assert_eq!(to_scaled(0.25, 100.0), 25);
/// // ties go to the even neighbour
/// assert_eq!(to_scaled(2.5, 1.0), 2);
/// assert_eq!(to_scaled(3.5, 1.0), 4);
/// ```
pub fn to_scaled(value: f64, scale: f64) -> i128 {
    let scaled = (value * scale).round_ties_even();
    if scaled.is_nan() {
        return 0;
    }
    let n = scaled.to_i128().unwrap_or(if scaled.is_sign_negative() {
        -MAX_MAGNITUDE
    } else {
        MAX_MAGNITUDE
    });
    clamp(n, -MAX_MAGNITUDE, MAX_MAGNITUDE)
}

/// Turns a wire integer back into a real.
pub fn from_scaled(n: i128, scale: f64) -> f64 { n.to_f64().unwrap_or(0.0) / scale }

/// Scales an `f32` by `1e8`.
pub fn fixed32_to_wire(f: f32) -> i128 { to_scaled(f as f64, SCALE_FIXED32) }

/// Inverse of [`fixed32_to_wire`].
pub fn fixed32_from_wire(n: i128) -> f32 { from_scaled(n, SCALE_FIXED32) as f32 }

/// Scales an `f64` by `1e16`.
pub fn fixed64_to_wire(f: f64) -> i128 { to_scaled(f, SCALE_FIXED64) }

/// Inverse of [`fixed64_to_wire`].
pub fn fixed64_from_wire(n: i128) -> f64 { from_scaled(n, SCALE_FIXED64) }
