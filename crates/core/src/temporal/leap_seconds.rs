//! Leap-second table
//!
//! Cumulative TAI-UTC offsets in nanoseconds, keyed by the UTC instant (in
//! nanoseconds since 1970) from which each offset applies. The reverse table
//! holds the same boundaries expressed as TT2000 ticks, for decoding.
//!
//! Instants before 1972-01-01 carry no offset. Instants after the last entry
//! carry the last offset.

use super::TT2000_OFFSET_NS;

/// Date of the most recent entry
pub const LAST_UPDATED: &str = "2017-01-01";

const NS: i64 = 1_000_000_000;

/// (ns since 1970, cumulative offset in ns)
pub const LEAP_SECONDS: [(i64, i64); 28] = [
    (63_072_000_000_000_000, 10 * NS),
    (78_796_800_000_000_000, 11 * NS),
    (94_694_400_000_000_000, 12 * NS),
    (126_230_400_000_000_000, 13 * NS),
    (157_766_400_000_000_000, 14 * NS),
    (189_302_400_000_000_000, 15 * NS),
    (220_924_800_000_000_000, 16 * NS),
    (252_460_800_000_000_000, 17 * NS),
    (283_996_800_000_000_000, 18 * NS),
    (315_532_800_000_000_000, 19 * NS),
    (362_793_600_000_000_000, 20 * NS),
    (394_329_600_000_000_000, 21 * NS),
    (425_865_600_000_000_000, 22 * NS),
    (489_024_000_000_000_000, 23 * NS),
    (567_993_600_000_000_000, 24 * NS),
    (631_152_000_000_000_000, 25 * NS),
    (662_688_000_000_000_000, 26 * NS),
    (709_948_800_000_000_000, 27 * NS),
    (741_484_800_000_000_000, 28 * NS),
    (773_020_800_000_000_000, 29 * NS),
    (820_454_400_000_000_000, 30 * NS),
    (867_715_200_000_000_000, 31 * NS),
    (915_148_800_000_000_000, 32 * NS),
    (1_136_073_600_000_000_000, 33 * NS),
    (1_230_768_000_000_000_000, 34 * NS),
    (1_341_100_800_000_000_000, 35 * NS),
    (1_435_708_800_000_000_000, 36 * NS),
    (1_483_228_800_000_000_000, 37 * NS),
];

/// (TT2000 tick, cumulative offset in ns)
pub const LEAP_SECONDS_TT2000: [(i64, i64); 28] = reverse_table();

const fn reverse_table() -> [(i64, i64); 28] {
    let mut out = [(0i64, 0i64); 28];
    let mut i = 0;
    while i < LEAP_SECONDS.len() {
        let (utc, offset) = LEAP_SECONDS[i];
        out[i] = (utc - TT2000_OFFSET_NS + offset, offset);
        i += 1;
    }
    out
}

/// Number of table entries whose key is `<= at`
fn position(table: &[(i64, i64)], at: i64) -> usize {
    table.partition_point(|(key, _)| *key <= at)
}

fn offset_at(table: &[(i64, i64)], pos: usize) -> i64 {
    match pos {
        0 => 0,
        p => table[p - 1].1,
    }
}

/// Offset in effect at a UTC instant given in ns since 1970
pub fn offset_from_utc(ns_from_1970: i64) -> i64 {
    offset_at(&LEAP_SECONDS, position(&LEAP_SECONDS, ns_from_1970))
}

/// Offset in effect at a TT2000 tick
pub fn offset_from_tt2000(tt2000: i64) -> i64 {
    offset_at(
        &LEAP_SECONDS_TT2000,
        position(&LEAP_SECONDS_TT2000, tt2000),
    )
}

/// Offset at a TT2000 tick, starting the table walk at `hint`
///
/// Returns the offset and the position to use as the next hint. Walking from
/// the previous position makes decoding monotone input linear.
pub fn offset_from_tt2000_with_hint(tt2000: i64, hint: usize) -> (i64, usize) {
    let table = &LEAP_SECONDS_TT2000;
    let mut pos = hint.min(table.len());
    while pos < table.len() && tt2000 >= table[pos].0 {
        pos += 1;
    }
    while pos > 0 && tt2000 < table[pos - 1].0 {
        pos -= 1;
    }
    (offset_at(table, pos), pos)
}

/// Check whether a TT2000 tick falls inside an inserted leap second
///
/// The initial 1972 offset is not an insertion and never matches.
pub fn is_leap_second(tt2000: i64) -> bool {
    is_leap_second_at(tt2000, position(&LEAP_SECONDS_TT2000, tt2000))
}

/// Same as [`is_leap_second`] for a position returned by
/// [`offset_from_tt2000_with_hint`]
pub fn is_leap_second_at(tt2000: i64, pos: usize) -> bool {
    pos >= 1 && pos < LEAP_SECONDS_TT2000.len() && tt2000 >= LEAP_SECONDS_TT2000[pos].0 - NS
}
