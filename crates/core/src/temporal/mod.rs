//! Temporal codec
//!
//! Converts between calendar instants and the three CDF time encodings:
//!
//! | Encoding | Scalar | Epoch | Unit |
//! |----------|--------|-------|------|
//! | CDF_TIME_TT2000 | `Tt2000(i64)` | J2000 (TT), leap-second aware | ns |
//! | CDF_EPOCH | `Epoch(f64)` | 0000-01-01T00:00:00 | ms |
//! | CDF_EPOCH16 | `Epoch16 { seconds, picoseconds }` | 0000-01-01T00:00:00 | s + ps |
//!
//! The canonical instant is a `chrono::NaiveDateTime` interpreted as UTC, so
//! conversions never depend on the process time zone. The supported range is
//! 0000-01-01T00:00:00 through 9999-12-31T23:59:59.999999999.
//!
//! ## Out-of-range instants
//!
//! Encoding never fails. An instant outside an encoding's range becomes that
//! encoding's sentinel (PAD below, FILL above) and decoding a sentinel or a
//! malformed value yields the minimum or maximum instant. Callers that need
//! to know use [`TimeScalar::in_range`].

pub mod codec;
pub mod leap_seconds;
pub mod scalars;

pub use codec::{count_out_of_range, decode_buffer, encode_instants, transcode};
pub use scalars::{CalendarFields, Epoch, Epoch16, TimeEncoding, TimeScalar, Tt2000};

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// ns from 1970-01-01T00:00:00 UTC to the TT2000 epoch
pub const TT2000_OFFSET_NS: i64 = 946_727_967_816_000_000;

/// ms from 0000-01-01 to 1970-01-01
pub const EPOCH_OFFSET_MS: f64 = 62_167_219_200_000.0;

/// s from 0000-01-01 to 1970-01-01
pub const EPOCH_OFFSET_SECONDS: f64 = 62_167_219_200.0;

const NS_PER_SECOND: i128 = 1_000_000_000;

/// ns since 1970 of 0000-01-01T00:00:00
pub(crate) const MIN_NS: i128 = -62_167_219_200 * NS_PER_SECOND;

/// ns since 1970 of 9999-12-31T23:59:59.999999999
pub(crate) const MAX_NS: i128 = 253_402_300_800 * NS_PER_SECOND - 1;

/// Earliest supported instant, 0000-01-01T00:00:00
pub fn min_instant() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(0, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or(NaiveDateTime::MIN)
}

/// Latest supported instant, 9999-12-31T23:59:59.999999999
pub fn max_instant() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(9999, 12, 31)
        .and_then(|d| d.and_hms_nano_opt(23, 59, 59, 999_999_999))
        .unwrap_or(NaiveDateTime::MAX)
}

/// ns since 1970 of an instant, with any leap-second nanos folded in
pub(crate) fn instant_to_ns(instant: &NaiveDateTime) -> i128 {
    let utc = instant.and_utc();
    i128::from(utc.timestamp()) * NS_PER_SECOND + i128::from(utc.timestamp_subsec_nanos())
}

/// ns since 1970 of an instant, dropping a leap second's extra second
///
/// The returned flag is set when the instant was inside a leap second.
pub(crate) fn instant_to_ns_normalized(instant: &NaiveDateTime) -> (i128, bool) {
    let utc = instant.and_utc();
    let nanos = utc.timestamp_subsec_nanos();
    let leap = nanos >= 1_000_000_000;
    let nanos = if leap { nanos - 1_000_000_000 } else { nanos };
    (
        i128::from(utc.timestamp()) * NS_PER_SECOND + i128::from(nanos),
        leap,
    )
}

/// Instant at ns since 1970, clamped to the supported range
pub(crate) fn ns_to_instant(ns: i128) -> NaiveDateTime {
    if ns <= MIN_NS {
        return min_instant();
    }
    if ns >= MAX_NS {
        return max_instant();
    }
    let secs = ns.div_euclid(NS_PER_SECOND) as i64;
    let nanos = ns.rem_euclid(NS_PER_SECOND) as u32;
    DateTime::from_timestamp(secs, nanos)
        .map(|dt| dt.naive_utc())
        .unwrap_or_else(min_instant)
}
