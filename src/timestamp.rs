//! Timestamps as an opaque 64-bit composite.
//!
//! The low 62 bits count 100 ns ticks since `0001-01-01T00:00:00`; the top two bits
//! hold a [`TimestampKind`]. The wire carries the composite as a signed varint, so only
//! implementations that agree on this layout can exchange timestamps.

use std::{
    convert::TryFrom,
    fmt,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

const KIND_SHIFT: u32 = 62;
const TICKS_MASK: u64 = (1 << KIND_SHIFT) - 1;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// What the tick count of a [`Timestamp`] is relative to.
pub enum TimestampKind {
    /// No time zone information.
    Unspecified,
    /// Coordinated universal time.
    Utc,
    /// The local time zone of whoever produced the value.
    Local,
}

impl TimestampKind {
    fn bits(self) -> u64 {
        match self {
            TimestampKind::Unspecified => 0,
            TimestampKind::Utc => 1,
            TimestampKind::Local => 2,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// A point in time, stored exactly as it is packed.
///
/// # Example
///
/// ```
/// use packed_json::timestamp::*;
///
/// let ts = Timestamp::new(Timestamp::UNIX_EPOCH_TICKS, TimestampKind::Utc).unwrap();
///
/// assert_eq!(ts.ticks(), Timestamp::UNIX_EPOCH_TICKS);
/// assert_eq!(ts.kind(), TimestampKind::Utc);
/// assert_eq!(Timestamp::from_raw(ts.to_raw()), ts);
/// ```
pub struct Timestamp(i64);

impl Timestamp {
    /// Ticks in one second.
    pub const TICKS_PER_SECOND: i64 = 10_000_000;
    /// Tick count of `1970-01-01T00:00:00`.
    pub const UNIX_EPOCH_TICKS: i64 = 621_355_968_000_000_000;
    /// Tick count of `9999-12-31T23:59:59.9999999`.
    pub const MAX_TICKS: i64 = 3_155_378_975_999_999_999;

    /// Builds a timestamp from a tick count and a kind. Returns `None` if `ticks` is
    /// negative or past [`Timestamp::MAX_TICKS`].
    pub fn new(ticks: i64, kind: TimestampKind) -> Option<Timestamp> {
        if ticks < 0 || ticks > Self::MAX_TICKS {
            return None;
        }
        Some(Timestamp(
            ((kind.bits() << KIND_SHIFT) | ticks as u64) as i64,
        ))
    }

    /// Wraps a raw composite as read off the wire.
    pub fn from_raw(raw: i64) -> Timestamp { Timestamp(raw) }

    /// The raw composite.
    pub fn to_raw(self) -> i64 { self.0 }

    /// The tick count.
    pub fn ticks(self) -> i64 { (self.0 as u64 & TICKS_MASK) as i64 }

    /// The kind flag. The unused fourth bit pattern reads as `Local`.
    pub fn kind(self) -> TimestampKind {
        match self.0 as u64 >> KIND_SHIFT {
            0 => TimestampKind::Unspecified,
            1 => TimestampKind::Utc,
            _ => TimestampKind::Local,
        }
    }

    /// A UTC timestamp for `time`, truncated to whole ticks. Returns `None` outside the
    /// representable range.
    pub fn from_system_time(time: SystemTime) -> Option<Timestamp> {
        let ticks = match time.duration_since(UNIX_EPOCH) {
            Ok(after) => Self::UNIX_EPOCH_TICKS.checked_add(duration_ticks(after)?)?,
            Err(before) => Self::UNIX_EPOCH_TICKS.checked_sub(duration_ticks(before.duration())?)?,
        };
        Timestamp::new(ticks, TimestampKind::Utc)
    }

    /// Like [`from_system_time`](Timestamp::from_system_time), but times outside the
    /// representable range clamp to its ends.
    pub fn saturating_from_system_time(time: SystemTime) -> Timestamp {
        let ticks = match time.duration_since(UNIX_EPOCH) {
            Ok(after) => Self::UNIX_EPOCH_TICKS as i128 + (after.as_nanos() / 100) as i128,
            Err(before) => {
                Self::UNIX_EPOCH_TICKS as i128 - (before.duration().as_nanos() / 100) as i128
            }
        };
        let ticks = ticks.max(0).min(Self::MAX_TICKS as i128) as i64;
        Timestamp(((TimestampKind::Utc.bits() << KIND_SHIFT) | ticks as u64) as i64)
    }

    /// The tick count as a `SystemTime`, treating it as UTC whatever the kind.
    pub fn to_system_time(self) -> SystemTime {
        let from_epoch = self.ticks() - Self::UNIX_EPOCH_TICKS;
        let magnitude = from_epoch.unsigned_abs();
        let span = Duration::new(
            magnitude / Self::TICKS_PER_SECOND as u64,
            (magnitude % Self::TICKS_PER_SECOND as u64) as u32 * 100,
        );
        if from_epoch >= 0 {
            UNIX_EPOCH + span
        } else {
            UNIX_EPOCH - span
        }
    }
}

fn duration_ticks(d: Duration) -> Option<i64> {
    let ticks = d.as_nanos() / 100;
    i64::try_from(ticks).ok()
}

impl From<i64> for Timestamp {
    fn from(raw: i64) -> Timestamp { Timestamp::from_raw(raw) }
}

impl From<Timestamp> for i64 {
    fn from(ts: Timestamp) -> i64 { ts.to_raw() }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}@{}", self.kind(), self.ticks())
    }
}
