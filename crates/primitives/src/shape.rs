//! Shape reconciliation
//!
//! A container's first axis counts records. Record-varying containers may
//! grow or shrink along it, so only the trailing axes are compared.
//! Non-record-varying containers hold one record, and a buffer shaped like a
//! single record gets a unit record axis prepended.
//!
//! While a container holds nothing and has at most one axis (`[]` or `[0]`)
//! its shape is open and the first commit decides it. An open candidate
//! committed to a record-varying container clears it to zero records and
//! keeps the trailing axes.

use cdfkit_core::{flat_size, Error, Result};

/// True while a container shape has not been fixed yet
pub fn is_open(shape: &[usize]) -> bool {
    shape.len() <= 1 && flat_size(shape) == 0
}

/// Shape a candidate buffer is stored under
///
/// Fails with `ShapeMismatch` carrying both shapes.
pub fn reconcile(
    existing: &[usize],
    candidate: &[usize],
    record_varying: bool,
) -> Result<Vec<usize>> {
    if is_open(existing) {
        if record_varying || is_open(candidate) || candidate.first() == Some(&1) {
            return Ok(candidate.to_vec());
        }
        return Ok(with_unit_record(candidate));
    }

    let trailing = &existing[1..];
    if record_varying {
        if is_open(candidate) {
            let mut cleared = Vec::with_capacity(existing.len());
            cleared.push(0);
            cleared.extend_from_slice(trailing);
            return Ok(cleared);
        }
        if candidate.len() == existing.len() && &candidate[1..] == trailing {
            return Ok(candidate.to_vec());
        }
        return Err(mismatch(existing, candidate));
    }

    if candidate == trailing {
        return Ok(with_unit_record(candidate));
    }
    if candidate.len() == existing.len() && candidate[0] == 1 && &candidate[1..] == trailing {
        return Ok(candidate.to_vec());
    }
    Err(mismatch(existing, candidate))
}

fn with_unit_record(shape: &[usize]) -> Vec<usize> {
    let mut out = Vec::with_capacity(shape.len() + 1);
    out.push(1);
    out.extend_from_slice(shape);
    out
}

fn mismatch(existing: &[usize], candidate: &[usize]) -> Error {
    Error::ShapeMismatch {
        expected: existing.to_vec(),
        actual: candidate.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_shapes() {
        assert!(is_open(&[]));
        assert!(is_open(&[0]));
        assert!(!is_open(&[3]));
        assert!(!is_open(&[0, 100, 10]));
    }

    #[test]
    fn test_record_varying_trailing_axes() {
        assert_eq!(reconcile(&[3, 4], &[10, 4], true).unwrap(), vec![10, 4]);
        assert_eq!(reconcile(&[3, 4], &[1, 4], true).unwrap(), vec![1, 4]);

        let err = reconcile(&[3, 4], &[3, 5], true).unwrap_err();
        assert_eq!(
            err,
            Error::ShapeMismatch {
                expected: vec![3, 4],
                actual: vec![3, 5],
            }
        );
        assert!(reconcile(&[3, 4], &[4], true).unwrap_err().is_shape_mismatch());
    }

    #[test]
    fn test_empty_candidate_clears_record_varying() {
        assert_eq!(reconcile(&[2, 3], &[0], true).unwrap(), vec![0, 3]);
        assert_eq!(reconcile(&[2, 3, 4], &[], true).unwrap(), vec![0, 3, 4]);
        assert_eq!(reconcile(&[5], &[0], true).unwrap(), vec![0]);
        assert!(reconcile(&[1, 3], &[0], false).unwrap_err().is_shape_mismatch());
    }

    #[test]
    fn test_record_varying_rank_one() {
        assert_eq!(reconcile(&[5], &[2], true).unwrap(), vec![2]);
    }

    #[test]
    fn test_open_container_takes_any_shape() {
        assert_eq!(reconcile(&[], &[7, 2, 3], true).unwrap(), vec![7, 2, 3]);
        assert_eq!(reconcile(&[0], &[4], true).unwrap(), vec![4]);
    }

    #[test]
    fn test_zero_records_fix_trailing_axes() {
        assert_eq!(
            reconcile(&[0, 100, 10], &[2, 100, 10], true).unwrap(),
            vec![2, 100, 10]
        );
        assert!(reconcile(&[0, 100, 10], &[2, 10, 100], true)
            .unwrap_err()
            .is_shape_mismatch());
    }

    #[test]
    fn test_non_record_varying() {
        assert_eq!(reconcile(&[1, 2, 2], &[2, 2], false).unwrap(), vec![1, 2, 2]);
        assert_eq!(reconcile(&[1, 2, 2], &[1, 2, 2], false).unwrap(), vec![1, 2, 2]);
        assert!(reconcile(&[1, 2, 2], &[3, 3], false)
            .unwrap_err()
            .is_shape_mismatch());
        assert!(reconcile(&[1, 2, 2], &[2, 2, 2], false)
            .unwrap_err()
            .is_shape_mismatch());
    }

    #[test]
    fn test_non_record_varying_first_commit() {
        assert_eq!(reconcile(&[], &[2, 2], false).unwrap(), vec![1, 2, 2]);
        assert_eq!(reconcile(&[0], &[1, 3], false).unwrap(), vec![1, 3]);
        assert_eq!(reconcile(&[], &[0], false).unwrap(), vec![0]);
    }
}
