//! Type compatibility lattice
//!
//! Decides whether values of a candidate type may be written over a
//! container already fixed to an existing type.
//!
//! ## Rules
//!
//! - `CDF_NONE` (untyped) accepts every type.
//! - Every concrete type accepts itself.
//! - Legacy aliases accept each other: INT1/BYTE, FLOAT/REAL4,
//!   DOUBLE/REAL8, CHAR/UCHAR.
//!
//! Nothing else is accepted. In particular integer types of different
//! widths or signedness never accept each other.

use super::scalar_type::ScalarType;

/// Compatibility set of every concrete type, indexed like `ScalarType::ALL`
static COMPATIBILITY: [(ScalarType, &[ScalarType]); 17] = [
    (ScalarType::Int1, &[ScalarType::Int1, ScalarType::Byte]),
    (ScalarType::Int2, &[ScalarType::Int2]),
    (ScalarType::Int4, &[ScalarType::Int4]),
    (ScalarType::Int8, &[ScalarType::Int8]),
    (ScalarType::Uint1, &[ScalarType::Uint1]),
    (ScalarType::Uint2, &[ScalarType::Uint2]),
    (ScalarType::Uint4, &[ScalarType::Uint4]),
    (ScalarType::Byte, &[ScalarType::Byte, ScalarType::Int1]),
    (ScalarType::Real4, &[ScalarType::Real4, ScalarType::Float]),
    (ScalarType::Real8, &[ScalarType::Real8, ScalarType::Double]),
    (ScalarType::Float, &[ScalarType::Float, ScalarType::Real4]),
    (ScalarType::Double, &[ScalarType::Double, ScalarType::Real8]),
    (ScalarType::Epoch, &[ScalarType::Epoch]),
    (ScalarType::Epoch16, &[ScalarType::Epoch16]),
    (ScalarType::TimeTt2000, &[ScalarType::TimeTt2000]),
    (ScalarType::Char, &[ScalarType::Char, ScalarType::Uchar]),
    (ScalarType::Uchar, &[ScalarType::Uchar, ScalarType::Char]),
];

/// Types that may overwrite a container fixed to `existing`
///
/// For `CDF_NONE` this is every type.
pub fn compatible_types(existing: ScalarType) -> &'static [ScalarType] {
    if existing.is_none() {
        return &ScalarType::ALL;
    }
    COMPATIBILITY
        .iter()
        .find(|(t, _)| *t == existing)
        .map(|(_, set)| *set)
        .unwrap_or(&[])
}

/// Check whether `candidate` values may be written over an `existing` container
pub fn is_compatible(existing: ScalarType, candidate: ScalarType) -> bool {
    existing.is_none() || compatible_types(existing).contains(&candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_covers_every_concrete_type() {
        for t in ScalarType::concrete() {
            assert!(
                COMPATIBILITY.iter().any(|(k, _)| k == t),
                "{} missing from table",
                t
            );
        }
    }

    #[test]
    fn test_none_accepts_everything() {
        for t in ScalarType::ALL {
            assert!(is_compatible(ScalarType::None, t));
        }
        assert_eq!(compatible_types(ScalarType::None).len(), 18);
    }

    #[test]
    fn test_reflexive() {
        for t in ScalarType::concrete() {
            assert!(is_compatible(*t, *t));
        }
    }

    #[test]
    fn test_alias_pairs() {
        assert!(is_compatible(ScalarType::Int1, ScalarType::Byte));
        assert!(is_compatible(ScalarType::Byte, ScalarType::Int1));
        assert!(is_compatible(ScalarType::Float, ScalarType::Real4));
        assert!(is_compatible(ScalarType::Real8, ScalarType::Double));
        assert!(is_compatible(ScalarType::Uchar, ScalarType::Char));
    }

    #[test]
    fn test_integers_of_different_width_rejected() {
        assert!(!is_compatible(ScalarType::Uint1, ScalarType::Int1));
        assert!(!is_compatible(ScalarType::Uint1, ScalarType::Uint2));
        assert!(!is_compatible(ScalarType::Int4, ScalarType::Int8));
        assert!(!is_compatible(ScalarType::Double, ScalarType::Float));
    }

    #[test]
    fn test_concrete_container_rejects_none() {
        assert!(!is_compatible(ScalarType::Double, ScalarType::None));
    }

    #[test]
    fn test_alias_pairs_share_width() {
        for (existing, set) in COMPATIBILITY.iter() {
            for candidate in set.iter() {
                assert_eq!(existing.native_width(), candidate.native_width());
            }
        }
    }
}
