//! Non-record-varying shape reconciliation.

use crate::common::*;

#[test]
fn single_record_gets_a_record_axis() {
    let mut cdf = variable_with_shape("lut", &[2, 2], true);
    let var = cdf.get_mut("lut").unwrap();
    assert_eq!(var.shape(), &[1, 2, 2]);

    var.set_from_values(zeros(&[2, 2]), None).unwrap();
    assert_eq!(var.shape(), &[1, 2, 2]);
    assert_eq!(var.len(), 1);
}

#[test]
fn explicit_single_record_is_accepted() {
    let mut cdf = variable_with_shape("lut", &[2, 2], true);
    let var = cdf.get_mut("lut").unwrap();
    var.set_from_values(zeros(&[1, 2, 2]), None).unwrap();
    assert_eq!(var.shape(), &[1, 2, 2]);
}

#[test]
fn several_records_are_rejected() {
    let mut cdf = variable_with_shape("lut", &[2, 2], true);
    let var = cdf.get_mut("lut").unwrap();

    let err = var.set_from_values(zeros(&[5, 2, 2]), None).unwrap_err();
    assert_eq!(
        err,
        Error::ShapeMismatch {
            expected: vec![1, 2, 2],
            actual: vec![5, 2, 2],
        }
    );
    assert_eq!(var.shape(), &[1, 2, 2]);
}
