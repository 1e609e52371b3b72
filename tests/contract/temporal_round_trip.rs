//! Instants survive a commit into a time variable and back.

use crate::common::*;
use chrono::{Duration, NaiveDateTime};
use proptest::prelude::*;

const SECONDS_1900_TO_2100: i64 = 6_311_433_600;

fn base() -> NaiveDateTime {
    instant(1900, 1, 1, 0, 0, 0, 0)
}

fn round_trip(times: Vec<NaiveDateTime>, encoding: ScalarType) -> Vec<NaiveDateTime> {
    let mut var = Variable::new("t");
    var.set_from_values(times, Some(encoding)).unwrap();
    assert_eq!(var.scalar_type(), encoding);
    var.to_instants().unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn tt2000_nanoseconds(secs in 0i64..SECONDS_1900_TO_2100, nanos in 0i64..1_000_000_000) {
        let t = base() + Duration::seconds(secs) + Duration::nanoseconds(nanos);
        prop_assert_eq!(round_trip(vec![t], ScalarType::TimeTt2000), vec![t]);
    }

    #[test]
    fn epoch_milliseconds(secs in 0i64..SECONDS_1900_TO_2100, millis in 0i64..1000) {
        let t = base() + Duration::seconds(secs) + Duration::milliseconds(millis);
        prop_assert_eq!(round_trip(vec![t], ScalarType::Epoch), vec![t]);
    }

    #[test]
    fn epoch16_nanoseconds(secs in 0i64..SECONDS_1900_TO_2100, nanos in 0i64..1_000_000_000) {
        let t = base() + Duration::seconds(secs) + Duration::nanoseconds(nanos);
        prop_assert_eq!(round_trip(vec![t], ScalarType::Epoch16), vec![t]);
    }
}

#[test]
fn leap_second_day_round_trips() {
    let times = vec![
        instant(2016, 12, 31, 23, 59, 58, 0),
        instant(2016, 12, 31, 23, 59, 59, 999),
        instant(2017, 1, 1, 0, 0, 0, 0),
    ];
    for encoding in [ScalarType::TimeTt2000, ScalarType::Epoch, ScalarType::Epoch16] {
        assert_eq!(round_trip(times.clone(), encoding), times);
    }
}

#[test]
fn transcoding_between_time_variables() {
    let t = instant(2004, 2, 29, 12, 30, 15, 250);
    let mut epoch = Variable::new("epoch");
    epoch.set_from_values(vec![t], Some(ScalarType::Epoch)).unwrap();

    let mut tt = Variable::new("tt");
    tt.set_from_values(epoch.to_instants().unwrap(), Some(ScalarType::TimeTt2000))
        .unwrap();
    assert_eq!(tt.to_instants().unwrap(), vec![t]);
}
