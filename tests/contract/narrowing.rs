//! Integer narrowing law.

use crate::common::*;

#[test]
fn narrowing_fixtures() {
    let cases: [(&[i64], ScalarType); 4] = [
        (&[1, 2, 3, 255], ScalarType::Uint1),
        (&[1, 2, 3, 256], ScalarType::Uint2),
        (&[1, 2, 3, -128], ScalarType::Int1),
        (&[1, 2, 3, -129], ScalarType::Int2),
    ];
    for (values, expected) in cases {
        assert_eq!(infer(values.to_vec()).scalar_type(), expected, "{:?}", values);
    }
}

#[test]
fn wide_ranges() {
    assert_eq!(infer(vec![0i64, 65_536]).scalar_type(), ScalarType::Uint4);
    assert_eq!(infer(vec![-40_000i64]).scalar_type(), ScalarType::Int4);
    assert_eq!(infer(vec![0i64, 4_294_967_296]).scalar_type(), ScalarType::Int8);
    assert_eq!(infer(vec![i64::MIN, i64::MAX]).scalar_type(), ScalarType::Int8);
}

#[test]
fn tagged_values_keep_their_width() {
    assert_eq!(infer(vec![1i32, 2, 3]).scalar_type(), ScalarType::Int4);
    assert_eq!(infer(vec![1u16]).scalar_type(), ScalarType::Uint2);
}
