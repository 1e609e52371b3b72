//! Shared helpers for the contract suite.

#![allow(dead_code)]

pub use cdfkit::{
    Cdf, Error, ScalarType, TypeInference, TypedBuffer, Value, Variable, VariableOptions,
};
use chrono::{NaiveDate, NaiveDateTime};

/// Calendar instant with millisecond precision
pub fn instant(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32, ms: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, mo, d)
        .and_then(|d| d.and_hms_milli_opt(h, mi, s, ms))
        .unwrap()
}

/// Infer with no declaration and no container
pub fn infer(value: impl Into<Value>) -> TypedBuffer {
    TypeInference::default()
        .infer(value.into(), None, ScalarType::None)
        .unwrap()
}

/// Nested list of zeros with the given shape
pub fn zeros(shape: &[usize]) -> Value {
    match shape.split_first() {
        None => Value::Float(0.0),
        Some((n, rest)) => Value::List((0..*n).map(|_| zeros(rest)).collect()),
    }
}

/// Variable holding zeros of `shape`
pub fn variable_with_shape(name: &str, shape: &[usize], is_nrv: bool) -> Cdf {
    let mut cdf = Cdf::new();
    cdf.add_variable(
        name,
        VariableOptions::new().values(zeros(shape)).nrv(is_nrv),
    )
    .unwrap();
    cdf
}
