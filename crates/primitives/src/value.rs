//! Client input values
//!
//! A [`Value`] is what callers hand to `set_from_values`, `add_variable` and
//! `add_attribute`: a scalar, a (possibly nested) list, a string, a calendar
//! instant, or a pre-typed n-dimensional array. Nothing about a `Value` is
//! validated until the inference engine classifies it.

use cdfkit_core::{flat_size, BufferData, Epoch, Epoch16, Error, Result, ScalarType, Tt2000};
use chrono::NaiveDateTime;

/// Untyped client input
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Plain integer literal, narrowed by inference
    Int(i64),
    /// Plain float literal
    Float(f64),
    /// Text, stored as a fixed-width byte string
    Text(String),
    /// Calendar instant (UTC)
    DateTime(NaiveDateTime),
    /// Explicitly width-tagged scalar, keeps its own type
    Tagged(TaggedScalar),
    /// Sequence, possibly nested
    List(Vec<Value>),
    /// Pre-typed n-dimensional array
    Array(NdArray),
}

/// Scalar carrying an explicit host type
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TaggedScalar {
    /// i8
    I8(i8),
    /// i16
    I16(i16),
    /// i32
    I32(i32),
    /// i64
    I64(i64),
    /// u8
    U8(u8),
    /// u16
    U16(u16),
    /// u32
    U32(u32),
    /// f32
    F32(f32),
    /// f64
    F64(f64),
    /// Encoded TT2000 tick
    Tt2000(Tt2000),
    /// Encoded epoch milliseconds
    Epoch(Epoch),
    /// Encoded epoch16 pair
    Epoch16(Epoch16),
}

impl TaggedScalar {
    /// Scalar type the tag stands for
    pub fn scalar_type(&self) -> ScalarType {
        match self {
            TaggedScalar::I8(_) => ScalarType::Int1,
            TaggedScalar::I16(_) => ScalarType::Int2,
            TaggedScalar::I32(_) => ScalarType::Int4,
            TaggedScalar::I64(_) => ScalarType::Int8,
            TaggedScalar::U8(_) => ScalarType::Uint1,
            TaggedScalar::U16(_) => ScalarType::Uint2,
            TaggedScalar::U32(_) => ScalarType::Uint4,
            TaggedScalar::F32(_) => ScalarType::Float,
            TaggedScalar::F64(_) => ScalarType::Double,
            TaggedScalar::Tt2000(_) => ScalarType::TimeTt2000,
            TaggedScalar::Epoch(_) => ScalarType::Epoch,
            TaggedScalar::Epoch16(_) => ScalarType::Epoch16,
        }
    }

    /// Check if this is an already-encoded time value
    pub fn is_temporal(&self) -> bool {
        self.scalar_type().is_temporal()
    }

    /// Integer value, for integer tags only
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            TaggedScalar::I8(v) => Some(v.into()),
            TaggedScalar::I16(v) => Some(v.into()),
            TaggedScalar::I32(v) => Some(v.into()),
            TaggedScalar::I64(v) => Some(v),
            TaggedScalar::U8(v) => Some(v.into()),
            TaggedScalar::U16(v) => Some(v.into()),
            TaggedScalar::U32(v) => Some(v.into()),
            _ => None,
        }
    }

    /// Numeric value as f64, for integer and float tags
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            TaggedScalar::F32(v) => Some(v.into()),
            TaggedScalar::F64(v) => Some(v),
            _ => self.as_i64().map(|v| v as f64),
        }
    }
}

macro_rules! impl_from_tagged {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$t> for TaggedScalar {
                fn from(v: $t) -> Self {
                    TaggedScalar::$variant(v)
                }
            }

            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Tagged(TaggedScalar::$variant(v))
                }
            }
        )*
    };
}

impl_from_tagged!(
    i8 => I8,
    i16 => I16,
    i32 => I32,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    f32 => F32,
    Tt2000 => Tt2000,
    Epoch => Epoch,
    Epoch16 => Epoch16,
);

impl From<i64> for TaggedScalar {
    fn from(v: i64) -> Self {
        TaggedScalar::I64(v)
    }
}

impl From<f64> for TaggedScalar {
    fn from(v: f64) -> Self {
        TaggedScalar::F64(v)
    }
}

// i64 and f64 are the plain literal types; tag them explicitly with
// `Value::Tagged(TaggedScalar::I64(..))` when width must be preserved.
impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::DateTime(v)
    }
}

impl From<NdArray> for Value {
    fn from(v: NdArray) -> Self {
        Value::Array(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

impl Value {
    /// Build a list from anything convertible
    pub fn list<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    /// Check if this is an empty list
    pub fn is_empty_list(&self) -> bool {
        matches!(self, Value::List(items) if items.is_empty())
    }
}

// ============================================================================
// NdArray
// ============================================================================

/// Element storage of a pre-typed array
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayData {
    /// Fixed-width numeric or already-encoded time elements
    Numeric(BufferData),
    /// Calendar instants, encoded by inference
    Instants(Vec<NaiveDateTime>),
    /// Strings, encoded to a byte buffer by inference
    Strings(Vec<String>),
}

impl ArrayData {
    /// Number of elements
    pub fn len(&self) -> usize {
        match self {
            ArrayData::Numeric(data) => data.len(),
            ArrayData::Instants(v) => v.len(),
            ArrayData::Strings(v) => v.len(),
        }
    }

    /// Check if there are no elements
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn gather(&self, indices: &[usize]) -> Result<ArrayData> {
        Ok(match self {
            ArrayData::Numeric(data) => ArrayData::Numeric(data.gather(indices)?),
            ArrayData::Instants(v) => ArrayData::Instants(indices.iter().map(|i| v[*i]).collect()),
            ArrayData::Strings(v) => {
                ArrayData::Strings(indices.iter().map(|i| v[*i].clone()).collect())
            }
        })
    }
}

impl From<BufferData> for ArrayData {
    fn from(data: BufferData) -> Self {
        ArrayData::Numeric(data)
    }
}

impl From<Vec<NaiveDateTime>> for ArrayData {
    fn from(v: Vec<NaiveDateTime>) -> Self {
        ArrayData::Instants(v)
    }
}

impl From<Vec<String>> for ArrayData {
    fn from(v: Vec<String>) -> Self {
        ArrayData::Strings(v)
    }
}

/// Pre-typed n-dimensional array, optionally a strided view
///
/// Strides and offset are in elements. A view may alias another array's
/// storage in any order; inference always copies it into a dense row-major
/// buffer before commit.
#[derive(Debug, Clone, PartialEq)]
pub struct NdArray {
    data: ArrayData,
    shape: Vec<usize>,
    strides: Option<Vec<isize>>,
    offset: usize,
}

impl NdArray {
    /// Dense row-major array
    pub fn new(data: impl Into<ArrayData>, shape: Vec<usize>) -> Result<Self> {
        let data = data.into();
        if shape.is_empty() {
            return Err(Error::invalid_argument("arrays need at least one axis"));
        }
        if flat_size(&shape) != data.len() {
            return Err(Error::invalid_argument(format!(
                "array shape {:?} does not match {} elements",
                shape,
                data.len()
            )));
        }
        Ok(NdArray {
            data,
            shape,
            strides: None,
            offset: 0,
        })
    }

    /// One-dimensional array
    pub fn from_vec(data: impl Into<ArrayData>) -> Self {
        let data = data.into();
        let shape = vec![data.len()];
        NdArray {
            data,
            shape,
            strides: None,
            offset: 0,
        }
    }

    /// Strided view over `data`
    ///
    /// Every element reachable from `offset` with `strides` inside `shape`
    /// must lie within `data`.
    pub fn strided(
        data: impl Into<ArrayData>,
        shape: Vec<usize>,
        strides: Vec<isize>,
        offset: usize,
    ) -> Result<Self> {
        let data = data.into();
        if shape.is_empty() || strides.len() != shape.len() {
            return Err(Error::invalid_argument(format!(
                "strides {:?} do not match shape {:?}",
                strides, shape
            )));
        }
        if flat_size(&shape) > 0 {
            let out_of_bounds = || {
                Error::invalid_argument(format!(
                    "view {:?} with strides {:?} at offset {} reaches outside {} elements",
                    shape,
                    strides,
                    offset,
                    data.len()
                ))
            };
            let (lo, hi) = view_extent(&shape, &strides, offset).ok_or_else(out_of_bounds)?;
            if lo < 0 || usize::try_from(hi).map_or(true, |hi| hi >= data.len()) {
                return Err(out_of_bounds());
            }
        }
        Ok(NdArray {
            data,
            shape,
            strides: Some(strides),
            offset,
        })
    }

    /// Shape
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of elements in the view
    pub fn len(&self) -> usize {
        flat_size(&self.shape)
    }

    /// Check if the view holds no elements
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Backing storage (not necessarily in view order)
    pub fn storage(&self) -> &ArrayData {
        &self.data
    }

    /// Check if the view is dense row-major over the whole storage
    pub fn is_contiguous(&self) -> bool {
        match &self.strides {
            None => true,
            Some(strides) => {
                self.offset == 0
                    && self.data.len() == self.len()
                    && *strides == row_major_strides(&self.shape)
            }
        }
    }

    /// Take the elements in dense row-major order, with the shape
    ///
    /// Copies only when the array is a non-contiguous view.
    pub fn into_contiguous(self) -> Result<(ArrayData, Vec<usize>)> {
        if self.is_contiguous() {
            return Ok((self.data, self.shape));
        }
        let data = self.to_contiguous()?;
        Ok((data, self.shape))
    }

    /// Dense row-major copy of the view's elements
    pub fn to_contiguous(&self) -> Result<ArrayData> {
        let Some(strides) = self.strides.as_ref().filter(|_| !self.is_contiguous()) else {
            return Ok(self.data.clone());
        };
        let mut indices = Vec::with_capacity(self.len());
        let mut index = vec![0usize; self.shape.len()];
        for _ in 0..self.len() {
            let at = index
                .iter()
                .zip(strides)
                .fold(self.offset as isize, |acc, (i, s)| acc + *i as isize * s);
            indices.push(at as usize);
            for axis in (0..index.len()).rev() {
                index[axis] += 1;
                if index[axis] < self.shape[axis] {
                    break;
                }
                index[axis] = 0;
            }
        }
        self.data.gather(&indices)
    }
}

fn row_major_strides(shape: &[usize]) -> Vec<isize> {
    let mut strides = vec![1isize; shape.len()];
    for axis in (0..shape.len().saturating_sub(1)).rev() {
        strides[axis] = strides[axis + 1] * shape[axis + 1] as isize;
    }
    strides
}

/// Lowest and highest flat index a strided view touches, `None` on overflow
fn view_extent(shape: &[usize], strides: &[isize], offset: usize) -> Option<(isize, isize)> {
    let start = isize::try_from(offset).ok()?;
    let (mut lo, mut hi) = (start, start);
    for (dim, stride) in shape.iter().zip(strides) {
        let steps = isize::try_from(*dim).ok()?.checked_sub(1)?;
        let reach = steps.checked_mul(*stride)?;
        if reach < 0 {
            lo = lo.checked_add(reach)?;
        } else {
            hi = hi.checked_add(reach)?;
        }
    }
    Some((lo, hi))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_from_conversions() {
        assert_eq!(Value::from(3i64), Value::Int(3));
        assert_eq!(Value::from(3u8), Value::Tagged(TaggedScalar::U8(3)));
        assert_eq!(Value::from("a"), Value::Text("a".to_string()));
        assert_eq!(
            Value::from(vec![1i64, 2]),
            Value::List(vec![Value::Int(1), Value::Int(2)])
        );
        assert!(Value::List(vec![]).is_empty_list());
    }

    #[test]
    fn test_tagged_scalar_accessors() {
        assert_eq!(TaggedScalar::U32(7).as_i64(), Some(7));
        assert_eq!(TaggedScalar::F32(1.5).as_i64(), None);
        assert_eq!(TaggedScalar::I16(-2).as_f64(), Some(-2.0));
        assert_eq!(TaggedScalar::Tt2000(Tt2000::new(0)).as_f64(), None);
        assert!(TaggedScalar::Epoch(Epoch::PAD).is_temporal());
        assert_eq!(TaggedScalar::U16(1).scalar_type(), ScalarType::Uint2);
    }

    #[test]
    fn test_ndarray_shape_checked() {
        assert!(NdArray::new(BufferData::F64(vec![1.0; 6]), vec![2, 3]).is_ok());
        assert!(NdArray::new(BufferData::F64(vec![1.0; 6]), vec![4]).is_err());
        assert!(NdArray::new(BufferData::F64(vec![]), vec![]).is_err());
        assert!(NdArray::new(BufferData::F64(vec![]), vec![0, 100, 10]).is_ok());
    }

    #[test]
    fn test_row_major_strides() {
        assert_eq!(row_major_strides(&[2, 3, 4]), vec![12, 4, 1]);
        assert_eq!(row_major_strides(&[5]), vec![1]);
    }

    #[test]
    fn test_transposed_view_is_copied() {
        // [[0, 1, 2], [3, 4, 5]] viewed transposed as 3x2
        let data = BufferData::I32((0..6).collect());
        let view = NdArray::strided(data, vec![3, 2], vec![1, 3], 0).unwrap();
        assert!(!view.is_contiguous());
        assert_eq!(
            view.to_contiguous().unwrap(),
            ArrayData::Numeric(BufferData::I32(vec![0, 3, 1, 4, 2, 5]))
        );
    }

    #[test]
    fn test_reversed_view() {
        let data = BufferData::U8(vec![1, 2, 3, 4]);
        let view = NdArray::strided(data, vec![4], vec![-1], 3).unwrap();
        assert_eq!(
            view.to_contiguous().unwrap(),
            ArrayData::Numeric(BufferData::U8(vec![4, 3, 2, 1]))
        );
    }

    #[test]
    fn test_every_other_element_view() {
        let data = vec!["a", "b", "c", "d"].into_iter().map(String::from).collect::<Vec<_>>();
        let view = NdArray::strided(data, vec![2], vec![2], 1).unwrap();
        assert_eq!(
            view.to_contiguous().unwrap(),
            ArrayData::Strings(vec!["b".to_string(), "d".to_string()])
        );
    }

    #[test]
    fn test_view_out_of_bounds_rejected() {
        let data = BufferData::U8(vec![1, 2, 3]);
        assert!(NdArray::strided(data.clone(), vec![2], vec![2], 1).is_err());
        assert!(NdArray::strided(data.clone(), vec![2], vec![-1], 0).is_err());
        assert!(NdArray::strided(data, vec![2, 2], vec![1], 0).is_err());
    }

    #[test]
    fn test_view_with_overflowing_strides_rejected() {
        let data = BufferData::U8(vec![1, 2, 3]);
        let err = NdArray::strided(data.clone(), vec![3], vec![isize::MAX], 0).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        let err = NdArray::strided(data.clone(), vec![3], vec![isize::MIN], 2).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        let err = NdArray::strided(data.clone(), vec![2, 2], vec![isize::MAX, isize::MAX], 0)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        let err = NdArray::strided(data, vec![1], vec![1], usize::MAX).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_dense_strides_are_contiguous() {
        let data = BufferData::U8(vec![1, 2, 3, 4]);
        let view = NdArray::strided(data, vec![2, 2], vec![2, 1], 0).unwrap();
        assert!(view.is_contiguous());
    }
}
