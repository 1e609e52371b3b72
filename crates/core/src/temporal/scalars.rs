//! Temporal scalar types
//!
//! Each of the three CDF time encodings is a small `Copy` newtype with its
//! reserved sentinel values as associated constants. Conversions go through
//! the [`TimeScalar`] trait so bulk code can be written once.
//!
//! ## Usage
//!
//! ```
//! use cdfkit_core::temporal::{TimeScalar, Tt2000};
//!
//! let tt = Tt2000::from_calendar(2000, 1, 1, 12, 0, 0, 0).unwrap();
//! assert_eq!(tt.value(), 64_184_000_000);
//! assert_eq!(tt.to_string(), "2000-01-01T12:00:00.000000000");
//! ```

use super::leap_seconds::{
    is_leap_second, is_leap_second_at, offset_from_tt2000, offset_from_tt2000_with_hint,
    offset_from_utc,
};
use super::{
    instant_to_ns, instant_to_ns_normalized, max_instant, min_instant, ns_to_instant, MIN_NS,
    TT2000_OFFSET_NS,
};
use crate::contract::ScalarType;
use crate::error::{Error, Result};
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

const NS_PER_SECOND: i64 = 1_000_000_000;
const NS_PER_MS: i128 = 1_000_000;

/// Conversion between one time encoding and calendar instants
pub trait TimeScalar: Copy + PartialEq + std::fmt::Debug {
    /// Encoding this scalar implements
    const ENCODING: TimeEncoding;

    /// Encode an instant, clamping to a sentinel when out of range
    fn from_instant(instant: &NaiveDateTime) -> Self;

    /// Decode to an instant, mapping sentinels and malformed values to the
    /// minimum or maximum instant
    fn to_instant(&self) -> NaiveDateTime;

    /// Check whether an instant is representable without clamping
    fn in_range(instant: &NaiveDateTime) -> bool;

    /// Encode many instants
    fn encode_slice(instants: &[NaiveDateTime]) -> Vec<Self> {
        instants.iter().map(Self::from_instant).collect()
    }

    /// Decode many values
    fn decode_slice(values: &[Self]) -> Vec<NaiveDateTime> {
        values.iter().map(Self::to_instant).collect()
    }
}

// ============================================================================
// TimeEncoding
// ============================================================================

/// The three time encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeEncoding {
    /// CDF_TIME_TT2000
    #[default]
    Tt2000,
    /// CDF_EPOCH
    Epoch,
    /// CDF_EPOCH16
    Epoch16,
}

impl TimeEncoding {
    /// Scalar type of this encoding
    pub const fn scalar_type(&self) -> ScalarType {
        match self {
            TimeEncoding::Tt2000 => ScalarType::TimeTt2000,
            TimeEncoding::Epoch => ScalarType::Epoch,
            TimeEncoding::Epoch16 => ScalarType::Epoch16,
        }
    }

    /// Encoding of a temporal scalar type
    pub const fn from_scalar_type(scalar_type: ScalarType) -> Option<Self> {
        match scalar_type {
            ScalarType::TimeTt2000 => Some(TimeEncoding::Tt2000),
            ScalarType::Epoch => Some(TimeEncoding::Epoch),
            ScalarType::Epoch16 => Some(TimeEncoding::Epoch16),
            _ => None,
        }
    }
}

impl std::fmt::Display for TimeEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.scalar_type())
    }
}

// ============================================================================
// Tt2000
// ============================================================================

/// Nanoseconds since J2000 (2000-01-01T12:00:00 TT), leap-second aware
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Tt2000(i64);

/// Broken-down UTC calendar time
///
/// `second` is 60 inside a leap second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarFields {
    /// Year (proleptic Gregorian, 0 allowed)
    pub year: i32,
    /// Month, 1-12
    pub month: u32,
    /// Day of month, 1-31
    pub day: u32,
    /// Hour, 0-23
    pub hour: u32,
    /// Minute, 0-59
    pub minute: u32,
    /// Second, 0-60
    pub second: u32,
    /// Nanosecond, 0-999_999_999
    pub nanosecond: u32,
}

impl Tt2000 {
    /// Fill value, decodes to 9999-12-31T23:59:59.999999999
    pub const FILL: Tt2000 = Tt2000(i64::MIN);

    /// Pad value, decodes to 0000-01-01T00:00:00
    pub const PAD: Tt2000 = Tt2000(i64::MIN + 1);

    /// Illegal value marker, decodes like FILL
    pub const ILLEGAL: Tt2000 = Tt2000(i64::MIN + 3);

    /// Largest reserved tick
    const RESERVED_MAX: i64 = i64::MIN + 3;

    /// Create from raw ticks
    #[inline]
    pub const fn new(ticks: i64) -> Self {
        Tt2000(ticks)
    }

    /// Raw ticks
    #[inline]
    pub const fn value(&self) -> i64 {
        self.0
    }

    /// Check if this is one of the reserved sentinel ticks
    #[inline]
    pub const fn is_sentinel(&self) -> bool {
        self.0 <= Self::RESERVED_MAX
    }

    /// Encode calendar fields
    ///
    /// `second` may be 60 only where a leap second was inserted.
    pub fn from_calendar(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
        nanosecond: u32,
    ) -> Result<Self> {
        let invalid = || {
            Error::invalid_argument(format!(
                "invalid calendar time {year:04}-{month:02}-{day:02}T{hour:02}:{minute:02}:{second:02}.{nanosecond:09}"
            ))
        };
        if nanosecond >= NS_PER_SECOND as u32 || second > 60 {
            return Err(invalid());
        }
        let (second, nanosecond) = if second == 60 {
            (59, nanosecond + NS_PER_SECOND as u32)
        } else {
            (second, nanosecond)
        };
        let instant = NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_nano_opt(hour, minute, second, nanosecond))
            .ok_or_else(invalid)?;
        let tt = Self::from_instant(&instant);
        if nanosecond >= NS_PER_SECOND as u32 && !is_leap_second(tt.0) {
            return Err(invalid());
        }
        Ok(tt)
    }

    /// Decode to calendar fields
    pub fn to_calendar(&self) -> CalendarFields {
        let instant = self.to_instant();
        let nanos = instant.nanosecond();
        let leap = nanos >= NS_PER_SECOND as u32;
        CalendarFields {
            year: instant.year(),
            month: instant.month(),
            day: instant.day(),
            hour: instant.hour(),
            minute: instant.minute(),
            second: instant.second() + u32::from(leap),
            nanosecond: nanos % NS_PER_SECOND as u32,
        }
    }

    fn ticks(instant: &NaiveDateTime) -> i128 {
        let (ns, leap) = instant_to_ns_normalized(instant);
        let offset = match i64::try_from(ns) {
            Ok(ns) => offset_from_utc(ns),
            Err(_) if ns < 0 => 0,
            Err(_) => offset_from_utc(i64::MAX),
        };
        ns - i128::from(TT2000_OFFSET_NS)
            + i128::from(offset)
            + if leap { i128::from(NS_PER_SECOND) } else { 0 }
    }

    fn instant_from_ticks(ticks: i64, offset: i64, leap: bool) -> NaiveDateTime {
        if leap {
            let base = Self::instant_from_ticks(ticks - NS_PER_SECOND, offset, false);
            return base
                .with_nanosecond(base.nanosecond() + NS_PER_SECOND as u32)
                .unwrap_or(base);
        }
        ns_to_instant(i128::from(ticks) - i128::from(offset) + i128::from(TT2000_OFFSET_NS))
    }

    fn decode_sentinel(&self) -> Option<NaiveDateTime> {
        if *self == Self::FILL || *self == Self::ILLEGAL {
            Some(max_instant())
        } else if self.is_sentinel() {
            Some(min_instant())
        } else {
            None
        }
    }
}

impl TimeScalar for Tt2000 {
    const ENCODING: TimeEncoding = TimeEncoding::Tt2000;

    fn from_instant(instant: &NaiveDateTime) -> Self {
        let ticks = Self::ticks(instant);
        if ticks <= i128::from(Self::RESERVED_MAX) {
            Self::PAD
        } else {
            i64::try_from(ticks).map(Tt2000).unwrap_or(Self::FILL)
        }
    }

    fn to_instant(&self) -> NaiveDateTime {
        if let Some(instant) = self.decode_sentinel() {
            return instant;
        }
        if is_leap_second(self.0) {
            let base = self.0 - NS_PER_SECOND;
            return Self::instant_from_ticks(self.0, offset_from_tt2000(base), true);
        }
        Self::instant_from_ticks(self.0, offset_from_tt2000(self.0), false)
    }

    fn in_range(instant: &NaiveDateTime) -> bool {
        let ticks = Self::ticks(instant);
        ticks > i128::from(Self::RESERVED_MAX) && ticks <= i128::from(i64::MAX)
    }

    fn decode_slice(values: &[Self]) -> Vec<NaiveDateTime> {
        let mut hint = 0;
        values
            .iter()
            .map(|tt| {
                if let Some(instant) = tt.decode_sentinel() {
                    return instant;
                }
                let (offset, pos) = offset_from_tt2000_with_hint(tt.0, hint);
                hint = pos;
                if is_leap_second_at(tt.0, pos) {
                    tt.to_instant()
                } else {
                    Self::instant_from_ticks(tt.0, offset, false)
                }
            })
            .collect()
    }
}

impl From<i64> for Tt2000 {
    fn from(ticks: i64) -> Self {
        Tt2000(ticks)
    }
}

impl From<Tt2000> for i64 {
    fn from(tt: Tt2000) -> Self {
        tt.0
    }
}

impl std::fmt::Display for Tt2000 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_instant().format("%Y-%m-%dT%H:%M:%S%.9f"))
    }
}

// ============================================================================
// Epoch
// ============================================================================

/// Milliseconds since 0000-01-01T00:00:00
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Epoch(f64);

impl Epoch {
    /// Fill value, decodes to 9999-12-31T23:59:59.999
    pub const FILL: Epoch = Epoch(-1e31);

    /// Pad value, decodes to 0000-01-01T00:00:00
    pub const PAD: Epoch = Epoch(0.0);

    /// Milliseconds of 9999-12-31T23:59:59.999
    pub const MAX_MS: f64 = 315_569_519_999_999.0;

    /// Create from raw milliseconds
    #[inline]
    pub const fn new(milliseconds: f64) -> Self {
        Epoch(milliseconds)
    }

    /// Raw milliseconds
    #[inline]
    pub const fn value(&self) -> f64 {
        self.0
    }

    fn max_decoded() -> NaiveDateTime {
        ns_to_instant(Self::MAX_MS as i128 * NS_PER_MS + MIN_NS)
    }

    fn milliseconds(instant: &NaiveDateTime) -> i128 {
        (instant_to_ns(instant) - MIN_NS).div_euclid(NS_PER_MS)
    }
}

impl TimeScalar for Epoch {
    const ENCODING: TimeEncoding = TimeEncoding::Epoch;

    fn from_instant(instant: &NaiveDateTime) -> Self {
        let ms = Self::milliseconds(instant);
        if ms < 0 {
            Self::PAD
        } else if ms > Self::MAX_MS as i128 {
            Self::FILL
        } else {
            Epoch(ms as f64)
        }
    }

    fn to_instant(&self) -> NaiveDateTime {
        let ms = self.0;
        if ms == Self::FILL.0 {
            return Self::max_decoded();
        }
        if ms.is_nan() || ms < 0.0 {
            return min_instant();
        }
        if ms > Self::MAX_MS {
            return Self::max_decoded();
        }
        let whole = ms.floor();
        let sub_ms = ((ms - whole) * 1e6).round() as i128;
        ns_to_instant(whole as i128 * NS_PER_MS + sub_ms + MIN_NS)
    }

    fn in_range(instant: &NaiveDateTime) -> bool {
        let ms = Self::milliseconds(instant);
        ms >= 0 && ms <= Self::MAX_MS as i128
    }
}

impl From<f64> for Epoch {
    fn from(milliseconds: f64) -> Self {
        Epoch(milliseconds)
    }
}

impl From<Epoch> for f64 {
    fn from(epoch: Epoch) -> Self {
        epoch.0
    }
}

impl std::fmt::Display for Epoch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_instant().format("%Y-%m-%dT%H:%M:%S%.3f"))
    }
}

// ============================================================================
// Epoch16
// ============================================================================

/// Seconds since 0000-01-01T00:00:00 plus picoseconds within the second
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Epoch16 {
    /// Whole seconds
    pub seconds: f64,
    /// Picoseconds, 0 to 999_999_999_999
    pub picoseconds: f64,
}

impl Epoch16 {
    /// Fill value, decodes to 9999-12-31T23:59:59.999999999
    pub const FILL: Epoch16 = Epoch16 {
        seconds: -1e31,
        picoseconds: -1e31,
    };

    /// Pad value, decodes to 0000-01-01T00:00:00
    pub const PAD: Epoch16 = Epoch16 {
        seconds: 0.0,
        picoseconds: 0.0,
    };

    /// Seconds of 9999-12-31T23:59:59
    pub const MAX_SECONDS: f64 = 315_569_519_999.0;

    /// Create from raw fields
    #[inline]
    pub const fn new(seconds: f64, picoseconds: f64) -> Self {
        Epoch16 {
            seconds,
            picoseconds,
        }
    }

    fn split(instant: &NaiveDateTime) -> (i128, i128) {
        let since = instant_to_ns(instant) - MIN_NS;
        let ns = i128::from(NS_PER_SECOND);
        (since.div_euclid(ns), since.rem_euclid(ns))
    }
}

impl TimeScalar for Epoch16 {
    const ENCODING: TimeEncoding = TimeEncoding::Epoch16;

    fn from_instant(instant: &NaiveDateTime) -> Self {
        let (seconds, nanos) = Self::split(instant);
        if seconds < 0 {
            Self::PAD
        } else if seconds > Self::MAX_SECONDS as i128 {
            Self::FILL
        } else {
            Epoch16 {
                seconds: seconds as f64,
                picoseconds: (nanos * 1_000) as f64,
            }
        }
    }

    fn to_instant(&self) -> NaiveDateTime {
        if self.seconds == Self::FILL.seconds {
            return max_instant();
        }
        if self.seconds.is_nan()
            || self.picoseconds.is_nan()
            || self.seconds < 0.0
            || self.picoseconds < 0.0
        {
            return min_instant();
        }
        if self.seconds > Self::MAX_SECONDS {
            return max_instant();
        }
        let nanos = (self.picoseconds / 1_000.0).floor() as i128;
        ns_to_instant(self.seconds.floor() as i128 * i128::from(NS_PER_SECOND) + nanos + MIN_NS)
    }

    fn in_range(instant: &NaiveDateTime) -> bool {
        let (seconds, _) = Self::split(instant);
        seconds >= 0 && seconds <= Self::MAX_SECONDS as i128
    }
}

impl std::fmt::Display for Epoch16 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_instant().format("%Y-%m-%dT%H:%M:%S%.9f"))
    }
}

// ============================================================================
// Tests
// ============================================================================
