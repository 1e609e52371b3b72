//! Record-varying shape reconciliation.

use crate::common::*;

#[test]
fn any_record_count_with_matching_trailing_shape() {
    let mut cdf = variable_with_shape("flux", &[2, 3, 4], false);
    let var = cdf.get_mut("flux").unwrap();

    var.set_from_values(zeros(&[10, 3, 4]), None).unwrap();
    assert_eq!(var.shape(), &[10, 3, 4]);
    assert_eq!(var.len(), 10);
}

#[test]
fn single_record_without_record_axis_is_rejected() {
    let mut cdf = variable_with_shape("flux", &[2, 3, 4], false);
    let var = cdf.get_mut("flux").unwrap();

    let err = var.set_from_values(zeros(&[3, 4]), None).unwrap_err();
    assert_eq!(
        err,
        Error::ShapeMismatch {
            expected: vec![2, 3, 4],
            actual: vec![3, 4],
        }
    );
    assert_eq!(var.shape(), &[2, 3, 4]);
}

#[test]
fn trailing_shape_must_match() {
    let mut cdf = variable_with_shape("flux", &[2, 3, 4], false);
    let var = cdf.get_mut("flux").unwrap();
    assert!(var
        .set_from_values(zeros(&[2, 4, 3]), None)
        .unwrap_err()
        .is_shape_mismatch());
}

#[test]
fn declared_empty_variable_takes_first_shape() {
    let mut cdf = Cdf::new();
    let var = cdf
        .add_variable("later", VariableOptions::new().declared_type(ScalarType::Double))
        .unwrap();
    var.set_from_values(zeros(&[5, 3, 4]), None).unwrap();
    assert_eq!(var.shape(), &[5, 3, 4]);
}

#[test]
fn empty_list_clears_records_and_keeps_trailing_shape() {
    let mut cdf = variable_with_shape("flux", &[2, 3], false);
    let var = cdf.get_mut("flux").unwrap();

    var.set_from_values(Value::List(vec![]), None).unwrap();
    assert_eq!(var.shape(), &[0, 3]);
    assert_eq!(var.len(), 0);

    var.set_from_values(zeros(&[4, 3]), None).unwrap();
    assert_eq!(var.shape(), &[4, 3]);
}
