//! Inferring twice gives the same type and shape.

use crate::common::*;

fn assert_idempotent(value: Value, hint: ScalarType) {
    let engine = TypeInference::default();
    let first = engine.infer(value.clone(), None, hint).unwrap();
    let second = engine.infer(value, None, hint).unwrap();
    assert_eq!(first.scalar_type(), second.scalar_type());
    assert_eq!(first.shape(), second.shape());
    assert_eq!(first, second);
}

#[test]
fn numbers() {
    assert_idempotent(Value::from(vec![1i64, -5, 300]), ScalarType::None);
    assert_idempotent(Value::from(vec![1i64, 2]), ScalarType::Int4);
    assert_idempotent(Value::list(vec![vec![0.5f64, 1.5], vec![2.5, 3.5]]), ScalarType::None);
}

#[test]
fn strings_and_instants() {
    assert_idempotent(Value::from(vec!["alpha", "be"]), ScalarType::None);
    let t = instant(2016, 12, 31, 23, 59, 59, 500);
    assert_idempotent(Value::from(vec![t, t]), ScalarType::Epoch);
}
