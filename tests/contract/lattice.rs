//! Lattice reflexivity and the unsigned/signed asymmetry.

use crate::common::*;
use cdfkit::is_compatible;

#[test]
fn every_concrete_type_accepts_itself() {
    for t in ScalarType::concrete() {
        assert!(is_compatible(*t, *t), "{} rejects itself", t);
    }
}

#[test]
fn uint1_accepts_uint1_but_not_int1() {
    assert!(is_compatible(ScalarType::Uint1, ScalarType::Uint1));
    assert!(!is_compatible(ScalarType::Uint1, ScalarType::Int1));
}

#[test]
fn legacy_aliases_accept_each_other() {
    let pairs = [
        (ScalarType::Int1, ScalarType::Byte),
        (ScalarType::Float, ScalarType::Real4),
        (ScalarType::Double, ScalarType::Real8),
        (ScalarType::Char, ScalarType::Uchar),
    ];
    for (a, b) in pairs {
        assert!(is_compatible(a, b));
        assert!(is_compatible(b, a));
    }
}
