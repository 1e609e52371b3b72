//! A container's type is fixed by its first commit.

use crate::common::*;

#[test]
fn uint1_container_rejects_int2_values() {
    let mut cdf = Cdf::new();
    let var = cdf.add_variable("v", VariableOptions::new()).unwrap();
    assert_eq!(var.scalar_type(), ScalarType::None);

    assert_eq!(var.set_from_values(vec![1i64, 2, 3], None).unwrap(), ScalarType::Uint1);

    let err = var.set_from_values(vec![-300i64, 2], None).unwrap_err();
    assert_eq!(
        err,
        Error::TypeIncompatibility {
            existing: ScalarType::Uint1,
            candidate: ScalarType::Int2,
        }
    );

    let err = var
        .set_from_values(vec![1i64], Some(ScalarType::Int2))
        .unwrap_err();
    assert!(err.is_type_incompatibility());
    assert_eq!(var.scalar_type(), ScalarType::Uint1);
    assert_eq!(var.len(), 3);
}

#[test]
fn type_is_never_rewidened() {
    let mut cdf = Cdf::new();
    let var = cdf
        .add_variable("v", VariableOptions::new().values(vec![1i64]))
        .unwrap();
    // 300 needs UINT2; the UINT1 container keeps its type and rejects it
    let err = var.set_from_values(vec![300i64], None).unwrap_err();
    assert!(err.is_type_incompatibility());
    assert_eq!(var.scalar_type(), ScalarType::Uint1);
}

#[test]
fn wider_container_accepts_small_values() {
    let mut cdf = Cdf::new();
    let var = cdf
        .add_variable("v", VariableOptions::new().declared_type(ScalarType::Int4))
        .unwrap();
    var.set_from_values(vec![1i64, 2], None).unwrap();
    var.set_from_values(vec![-1i64], None).unwrap();
    assert_eq!(var.scalar_type(), ScalarType::Int4);
}
