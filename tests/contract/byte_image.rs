//! Byte images handed to and received from storage.

use crate::common::*;
use cdfkit::CompressionType;

#[test]
fn persisted_variable_round_trips_through_bytes() {
    let mut var = Variable::new("v");
    var.set_from_values(Value::list(vec![vec![-1i64, 2], vec![3, 40_000]]), None)
        .unwrap();
    let buffer = var.values().unwrap();
    assert_eq!(buffer.scalar_type(), ScalarType::Int4);

    let bytes = buffer.to_le_bytes().unwrap();
    assert_eq!(bytes.len(), 4 * 4);
    assert_eq!(&bytes[..4], &(-1i32).to_le_bytes());

    let restored = TypedBuffer::from_le_bytes(ScalarType::Int4, vec![2, 2], &bytes).unwrap();
    let persisted = Variable::from_persisted("v", restored, false, CompressionType::None).unwrap();
    assert_eq!(persisted.values(), var.values());
}

#[test]
fn wrong_byte_count_is_rejected() {
    let err = TypedBuffer::from_le_bytes(ScalarType::Double, vec![2], &[0u8; 12]).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
}

#[test]
fn persisted_variable_keeps_contract() {
    let buffer = TypedBuffer::from_le_bytes(ScalarType::Uint2, vec![1], &[1, 0]).unwrap();
    let mut var = Variable::from_persisted("v", buffer, false, CompressionType::None).unwrap();
    assert!(var
        .set_from_values(vec![-5i64], None)
        .unwrap_err()
        .is_type_incompatibility());
    var.set_from_values(vec![7i64, 8], None).unwrap();
    assert_eq!(var.scalar_type(), ScalarType::Uint2);
}
