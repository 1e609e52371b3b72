//! Scalar type enumeration
//!
//! Every value stored in a CDF variable or attribute entry has exactly one
//! scalar type. The type fixes the element width on disk and the host
//! representation used in memory.
//!
//! ## The Scalar Types
//!
//! | Type | Code | Width | Host representation |
//! |------|------|-------|---------------------|
//! | CDF_NONE | 0 | 0 | none (untyped) |
//! | CDF_INT1 / CDF_BYTE | 1 / 41 | 1 | i8 |
//! | CDF_INT2 | 2 | 2 | i16 |
//! | CDF_INT4 | 4 | 4 | i32 |
//! | CDF_INT8 | 8 | 8 | i64 |
//! | CDF_UINT1 | 11 | 1 | u8 |
//! | CDF_UINT2 | 12 | 2 | u16 |
//! | CDF_UINT4 | 14 | 4 | u32 |
//! | CDF_REAL4 / CDF_FLOAT | 21 / 44 | 4 | f32 |
//! | CDF_REAL8 / CDF_DOUBLE | 22 / 45 | 8 | f64 |
//! | CDF_EPOCH | 31 | 8 | f64 milliseconds |
//! | CDF_EPOCH16 | 32 | 16 | (f64, f64) |
//! | CDF_TIME_TT2000 | 33 | 8 | i64 nanoseconds |
//! | CDF_CHAR / CDF_UCHAR | 51 / 52 | 1 | byte string |

use serde::{Deserialize, Serialize};

/// The CDF scalar types
///
/// ## Invariant
///
/// Codes and widths are part of the file format and MUST NOT change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ScalarType {
    /// Untyped: the container has not been given values yet
    #[default]
    None,
    /// Signed 8-bit integer
    Int1,
    /// Signed 16-bit integer
    Int2,
    /// Signed 32-bit integer
    Int4,
    /// Signed 64-bit integer
    Int8,
    /// Unsigned 8-bit integer
    Uint1,
    /// Unsigned 16-bit integer
    Uint2,
    /// Unsigned 32-bit integer
    Uint4,
    /// Signed 8-bit integer (legacy alias of INT1)
    Byte,
    /// 32-bit float (legacy alias of FLOAT)
    Real4,
    /// 64-bit float (legacy alias of DOUBLE)
    Real8,
    /// 32-bit IEEE float
    Float,
    /// 64-bit IEEE float
    Double,
    /// Milliseconds since 0000-01-01 as f64
    Epoch,
    /// Seconds and picoseconds since 0000-01-01 as two f64
    Epoch16,
    /// Nanoseconds since J2000 (TT) as i64, leap-second aware
    TimeTt2000,
    /// Fixed-width byte string
    Char,
    /// Fixed-width unsigned byte string
    Uchar,
}

/// Host representation of one element
///
/// Several scalar types share a representation (INT1 and BYTE are both i8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeRepr {
    /// i8
    I8,
    /// u8
    U8,
    /// i16
    I16,
    /// u16
    U16,
    /// i32
    I32,
    /// u32
    U32,
    /// i64
    I64,
    /// f32
    F32,
    /// f64
    F64,
    /// TT2000 tick
    Tt2000,
    /// Epoch milliseconds
    Epoch,
    /// Epoch16 pair
    Epoch16,
    /// Raw string byte
    Char,
}

impl NativeRepr {
    /// Width of one element in bytes
    pub const fn width(&self) -> usize {
        match self {
            NativeRepr::I8 | NativeRepr::U8 | NativeRepr::Char => 1,
            NativeRepr::I16 | NativeRepr::U16 => 2,
            NativeRepr::I32 | NativeRepr::U32 | NativeRepr::F32 => 4,
            NativeRepr::I64 | NativeRepr::F64 | NativeRepr::Tt2000 | NativeRepr::Epoch => 8,
            NativeRepr::Epoch16 => 16,
        }
    }

    /// Scalar type a buffer of this representation gets when nobody declares one
    pub const fn natural_type(&self) -> ScalarType {
        match self {
            NativeRepr::I8 => ScalarType::Int1,
            NativeRepr::U8 => ScalarType::Uint1,
            NativeRepr::I16 => ScalarType::Int2,
            NativeRepr::U16 => ScalarType::Uint2,
            NativeRepr::I32 => ScalarType::Int4,
            NativeRepr::U32 => ScalarType::Uint4,
            NativeRepr::I64 => ScalarType::Int8,
            NativeRepr::F32 => ScalarType::Float,
            NativeRepr::F64 => ScalarType::Double,
            NativeRepr::Tt2000 => ScalarType::TimeTt2000,
            NativeRepr::Epoch => ScalarType::Epoch,
            NativeRepr::Epoch16 => ScalarType::Epoch16,
            NativeRepr::Char => ScalarType::Char,
        }
    }
}

impl ScalarType {
    /// All scalar types, `None` first (for iteration)
    pub const ALL: [ScalarType; 18] = [
        ScalarType::None,
        ScalarType::Int1,
        ScalarType::Int2,
        ScalarType::Int4,
        ScalarType::Int8,
        ScalarType::Uint1,
        ScalarType::Uint2,
        ScalarType::Uint4,
        ScalarType::Byte,
        ScalarType::Real4,
        ScalarType::Real8,
        ScalarType::Float,
        ScalarType::Double,
        ScalarType::Epoch,
        ScalarType::Epoch16,
        ScalarType::TimeTt2000,
        ScalarType::Char,
        ScalarType::Uchar,
    ];

    /// Every type except `None`
    pub fn concrete() -> &'static [ScalarType] {
        &Self::ALL[1..]
    }

    /// Canonical name, as written by the CDF library
    pub const fn name(&self) -> &'static str {
        match self {
            ScalarType::None => "CDF_NONE",
            ScalarType::Int1 => "CDF_INT1",
            ScalarType::Int2 => "CDF_INT2",
            ScalarType::Int4 => "CDF_INT4",
            ScalarType::Int8 => "CDF_INT8",
            ScalarType::Uint1 => "CDF_UINT1",
            ScalarType::Uint2 => "CDF_UINT2",
            ScalarType::Uint4 => "CDF_UINT4",
            ScalarType::Byte => "CDF_BYTE",
            ScalarType::Real4 => "CDF_REAL4",
            ScalarType::Real8 => "CDF_REAL8",
            ScalarType::Float => "CDF_FLOAT",
            ScalarType::Double => "CDF_DOUBLE",
            ScalarType::Epoch => "CDF_EPOCH",
            ScalarType::Epoch16 => "CDF_EPOCH16",
            ScalarType::TimeTt2000 => "CDF_TIME_TT2000",
            ScalarType::Char => "CDF_CHAR",
            ScalarType::Uchar => "CDF_UCHAR",
        }
    }

    /// Parse from canonical name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.name() == name)
    }

    /// On-disk type code
    pub const fn code(&self) -> u32 {
        match self {
            ScalarType::None => 0,
            ScalarType::Int1 => 1,
            ScalarType::Int2 => 2,
            ScalarType::Int4 => 4,
            ScalarType::Int8 => 8,
            ScalarType::Uint1 => 11,
            ScalarType::Uint2 => 12,
            ScalarType::Uint4 => 14,
            ScalarType::Real4 => 21,
            ScalarType::Real8 => 22,
            ScalarType::Epoch => 31,
            ScalarType::Epoch16 => 32,
            ScalarType::TimeTt2000 => 33,
            ScalarType::Byte => 41,
            ScalarType::Float => 44,
            ScalarType::Double => 45,
            ScalarType::Char => 51,
            ScalarType::Uchar => 52,
        }
    }

    /// Parse from on-disk type code
    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.code() == code)
    }

    /// Host representation, `None` for the untyped marker
    pub const fn repr(&self) -> Option<NativeRepr> {
        match self {
            ScalarType::None => None,
            ScalarType::Int1 | ScalarType::Byte => Some(NativeRepr::I8),
            ScalarType::Int2 => Some(NativeRepr::I16),
            ScalarType::Int4 => Some(NativeRepr::I32),
            ScalarType::Int8 => Some(NativeRepr::I64),
            ScalarType::Uint1 => Some(NativeRepr::U8),
            ScalarType::Uint2 => Some(NativeRepr::U16),
            ScalarType::Uint4 => Some(NativeRepr::U32),
            ScalarType::Real4 | ScalarType::Float => Some(NativeRepr::F32),
            ScalarType::Real8 | ScalarType::Double => Some(NativeRepr::F64),
            ScalarType::Epoch => Some(NativeRepr::Epoch),
            ScalarType::Epoch16 => Some(NativeRepr::Epoch16),
            ScalarType::TimeTt2000 => Some(NativeRepr::Tt2000),
            ScalarType::Char | ScalarType::Uchar => Some(NativeRepr::Char),
        }
    }

    /// Width of one element in bytes (0 for `None`)
    pub const fn native_width(&self) -> usize {
        match self.repr() {
            Some(repr) => repr.width(),
            None => 0,
        }
    }

    /// Check if this is the untyped marker
    pub const fn is_none(&self) -> bool {
        matches!(self, ScalarType::None)
    }

    /// Check if this is an integer type (BYTE included)
    pub const fn is_integer(&self) -> bool {
        self.is_signed_integer() || self.is_unsigned_integer()
    }

    /// Check if this is a signed integer type
    pub const fn is_signed_integer(&self) -> bool {
        matches!(
            self,
            ScalarType::Int1
                | ScalarType::Int2
                | ScalarType::Int4
                | ScalarType::Int8
                | ScalarType::Byte
        )
    }

    /// Check if this is an unsigned integer type
    pub const fn is_unsigned_integer(&self) -> bool {
        matches!(
            self,
            ScalarType::Uint1 | ScalarType::Uint2 | ScalarType::Uint4
        )
    }

    /// Check if this is a floating point type
    pub const fn is_floating_point(&self) -> bool {
        matches!(
            self,
            ScalarType::Real4 | ScalarType::Real8 | ScalarType::Float | ScalarType::Double
        )
    }

    /// Check if this is one of the three time encodings
    pub const fn is_temporal(&self) -> bool {
        matches!(
            self,
            ScalarType::Epoch | ScalarType::Epoch16 | ScalarType::TimeTt2000
        )
    }

    /// Check if this is a string type
    pub const fn is_string(&self) -> bool {
        matches!(self, ScalarType::Char | ScalarType::Uchar)
    }

    /// Inclusive value range of an integer type
    pub const fn integer_range(&self) -> Option<(i64, i64)> {
        match self {
            ScalarType::Int1 | ScalarType::Byte => Some((i8::MIN as i64, i8::MAX as i64)),
            ScalarType::Int2 => Some((i16::MIN as i64, i16::MAX as i64)),
            ScalarType::Int4 => Some((i32::MIN as i64, i32::MAX as i64)),
            ScalarType::Int8 => Some((i64::MIN, i64::MAX)),
            ScalarType::Uint1 => Some((0, u8::MAX as i64)),
            ScalarType::Uint2 => Some((0, u16::MAX as i64)),
            ScalarType::Uint4 => Some((0, u32::MAX as i64)),
            _ => None,
        }
    }

    /// Check if every value of `[min, max]` is representable by this type
    pub fn contains_range(&self, min: i64, max: i64) -> bool {
        match self.integer_range() {
            Some((lo, hi)) => lo <= min && max <= hi,
            None => false,
        }
    }
}

impl std::fmt::Display for ScalarType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Tests
// ============================================================================
