//! Typed, shaped, contiguous value buffers
//!
//! A `TypedBuffer` is the unit of data committed into a container: a dense
//! row-major element vector, the scalar type it is tagged with, and its
//! shape. Construction checks both invariants:
//!
//! - `element_count == product(shape)`
//! - the scalar type's host representation matches the element vector
//!
//! so a buffer that exists is always consistent. Strings are stored as
//! `CDF_CHAR`/`CDF_UCHAR` byte buffers whose last axis is the fixed string
//! width.

use crate::contract::{NativeRepr, ScalarType};
use crate::error::{Error, Result};
use crate::temporal::{Epoch, Epoch16, Tt2000};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

/// Number of elements of a shape
///
/// An empty shape holds no elements. Saturates on overflow.
pub fn flat_size(shape: &[usize]) -> usize {
    if shape.is_empty() {
        return 0;
    }
    shape
        .iter()
        .try_fold(1usize, |acc, d| acc.checked_mul(*d))
        .unwrap_or(usize::MAX)
}

/// Dense element storage, one variant per host representation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BufferData {
    /// i8 elements (INT1, BYTE)
    I8(Vec<i8>),
    /// u8 elements (UINT1)
    U8(Vec<u8>),
    /// i16 elements (INT2)
    I16(Vec<i16>),
    /// u16 elements (UINT2)
    U16(Vec<u16>),
    /// i32 elements (INT4)
    I32(Vec<i32>),
    /// u32 elements (UINT4)
    U32(Vec<u32>),
    /// i64 elements (INT8)
    I64(Vec<i64>),
    /// f32 elements (FLOAT, REAL4)
    F32(Vec<f32>),
    /// f64 elements (DOUBLE, REAL8)
    F64(Vec<f64>),
    /// TT2000 ticks
    Tt2000(Vec<Tt2000>),
    /// Epoch milliseconds
    Epoch(Vec<Epoch>),
    /// Epoch16 pairs
    Epoch16(Vec<Epoch16>),
    /// String bytes (CHAR, UCHAR)
    Char(Vec<u8>),
}

/// Apply the same expression to the vector inside any variant
macro_rules! with_elements {
    ($data:expr, $v:ident => $body:expr) => {
        match $data {
            BufferData::I8($v) => $body,
            BufferData::U8($v) => $body,
            BufferData::I16($v) => $body,
            BufferData::U16($v) => $body,
            BufferData::I32($v) => $body,
            BufferData::U32($v) => $body,
            BufferData::I64($v) => $body,
            BufferData::F32($v) => $body,
            BufferData::F64($v) => $body,
            BufferData::Tt2000($v) => $body,
            BufferData::Epoch($v) => $body,
            BufferData::Epoch16($v) => $body,
            BufferData::Char($v) => $body,
        }
    };
}

/// Same as `with_elements!` but rebuilds the same variant from the result
macro_rules! map_elements {
    ($data:expr, $v:ident => $body:expr) => {
        match $data {
            BufferData::I8($v) => BufferData::I8($body),
            BufferData::U8($v) => BufferData::U8($body),
            BufferData::I16($v) => BufferData::I16($body),
            BufferData::U16($v) => BufferData::U16($body),
            BufferData::I32($v) => BufferData::I32($body),
            BufferData::U32($v) => BufferData::U32($body),
            BufferData::I64($v) => BufferData::I64($body),
            BufferData::F32($v) => BufferData::F32($body),
            BufferData::F64($v) => BufferData::F64($body),
            BufferData::Tt2000($v) => BufferData::Tt2000($body),
            BufferData::Epoch($v) => BufferData::Epoch($body),
            BufferData::Epoch16($v) => BufferData::Epoch16($body),
            BufferData::Char($v) => BufferData::Char($body),
        }
    };
}

impl BufferData {
    /// Empty storage for a representation
    pub fn empty(repr: NativeRepr) -> Self {
        match repr {
            NativeRepr::I8 => BufferData::I8(Vec::new()),
            NativeRepr::U8 => BufferData::U8(Vec::new()),
            NativeRepr::I16 => BufferData::I16(Vec::new()),
            NativeRepr::U16 => BufferData::U16(Vec::new()),
            NativeRepr::I32 => BufferData::I32(Vec::new()),
            NativeRepr::U32 => BufferData::U32(Vec::new()),
            NativeRepr::I64 => BufferData::I64(Vec::new()),
            NativeRepr::F32 => BufferData::F32(Vec::new()),
            NativeRepr::F64 => BufferData::F64(Vec::new()),
            NativeRepr::Tt2000 => BufferData::Tt2000(Vec::new()),
            NativeRepr::Epoch => BufferData::Epoch(Vec::new()),
            NativeRepr::Epoch16 => BufferData::Epoch16(Vec::new()),
            NativeRepr::Char => BufferData::Char(Vec::new()),
        }
    }

    /// Host representation of the elements
    pub fn repr(&self) -> NativeRepr {
        match self {
            BufferData::I8(_) => NativeRepr::I8,
            BufferData::U8(_) => NativeRepr::U8,
            BufferData::I16(_) => NativeRepr::I16,
            BufferData::U16(_) => NativeRepr::U16,
            BufferData::I32(_) => NativeRepr::I32,
            BufferData::U32(_) => NativeRepr::U32,
            BufferData::I64(_) => NativeRepr::I64,
            BufferData::F32(_) => NativeRepr::F32,
            BufferData::F64(_) => NativeRepr::F64,
            BufferData::Tt2000(_) => NativeRepr::Tt2000,
            BufferData::Epoch(_) => NativeRepr::Epoch,
            BufferData::Epoch16(_) => NativeRepr::Epoch16,
            BufferData::Char(_) => NativeRepr::Char,
        }
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        with_elements!(self, v => v.len())
    }

    /// Check if there are no elements
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy the elements at `indices`, in order
    ///
    /// Fails if an index is out of bounds.
    pub fn gather(&self, indices: &[usize]) -> Result<BufferData> {
        let len = self.len();
        if let Some(bad) = indices.iter().find(|i| **i >= len) {
            return Err(Error::invalid_argument(format!(
                "element index {} out of bounds for {} elements",
                bad, len
            )));
        }
        Ok(map_elements!(self, v => indices.iter().map(|i| v[*i]).collect()))
    }

    /// Read elements out as a typed slice
    pub fn as_slice<T: Element>(&self) -> Option<&[T]> {
        T::slice(self)
    }

    fn write_le<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        match self {
            BufferData::I8(v) => v.iter().try_for_each(|x| writer.write_i8(*x)),
            BufferData::U8(v) | BufferData::Char(v) => writer.write_all(v),
            BufferData::I16(v) => v.iter().try_for_each(|x| writer.write_i16::<LittleEndian>(*x)),
            BufferData::U16(v) => v.iter().try_for_each(|x| writer.write_u16::<LittleEndian>(*x)),
            BufferData::I32(v) => v.iter().try_for_each(|x| writer.write_i32::<LittleEndian>(*x)),
            BufferData::U32(v) => v.iter().try_for_each(|x| writer.write_u32::<LittleEndian>(*x)),
            BufferData::I64(v) => v.iter().try_for_each(|x| writer.write_i64::<LittleEndian>(*x)),
            BufferData::F32(v) => v.iter().try_for_each(|x| writer.write_f32::<LittleEndian>(*x)),
            BufferData::F64(v) => v.iter().try_for_each(|x| writer.write_f64::<LittleEndian>(*x)),
            BufferData::Tt2000(v) => v
                .iter()
                .try_for_each(|x| writer.write_i64::<LittleEndian>(x.value())),
            BufferData::Epoch(v) => v
                .iter()
                .try_for_each(|x| writer.write_f64::<LittleEndian>(x.value())),
            BufferData::Epoch16(v) => v.iter().try_for_each(|x| {
                writer.write_f64::<LittleEndian>(x.seconds)?;
                writer.write_f64::<LittleEndian>(x.picoseconds)
            }),
        }
    }

    fn read_le<R: Read>(repr: NativeRepr, count: usize, reader: &mut R) -> std::io::Result<Self> {
        fn collect<T>(count: usize, mut f: impl FnMut() -> std::io::Result<T>) -> std::io::Result<Vec<T>> {
            (0..count).map(|_| f()).collect()
        }
        Ok(match repr {
            NativeRepr::I8 => BufferData::I8(collect(count, || reader.read_i8())?),
            NativeRepr::U8 | NativeRepr::Char => {
                let mut bytes = vec![0u8; count];
                reader.read_exact(&mut bytes)?;
                if repr == NativeRepr::Char {
                    BufferData::Char(bytes)
                } else {
                    BufferData::U8(bytes)
                }
            }
            NativeRepr::I16 => BufferData::I16(collect(count, || reader.read_i16::<LittleEndian>())?),
            NativeRepr::U16 => BufferData::U16(collect(count, || reader.read_u16::<LittleEndian>())?),
            NativeRepr::I32 => BufferData::I32(collect(count, || reader.read_i32::<LittleEndian>())?),
            NativeRepr::U32 => BufferData::U32(collect(count, || reader.read_u32::<LittleEndian>())?),
            NativeRepr::I64 => BufferData::I64(collect(count, || reader.read_i64::<LittleEndian>())?),
            NativeRepr::F32 => BufferData::F32(collect(count, || reader.read_f32::<LittleEndian>())?),
            NativeRepr::F64 => BufferData::F64(collect(count, || reader.read_f64::<LittleEndian>())?),
            NativeRepr::Tt2000 => BufferData::Tt2000(collect(count, || {
                reader.read_i64::<LittleEndian>().map(Tt2000::new)
            })?),
            NativeRepr::Epoch => BufferData::Epoch(collect(count, || {
                reader.read_f64::<LittleEndian>().map(Epoch::new)
            })?),
            NativeRepr::Epoch16 => BufferData::Epoch16(collect(count, || {
                let seconds = reader.read_f64::<LittleEndian>()?;
                let picoseconds = reader.read_f64::<LittleEndian>()?;
                Ok(Epoch16::new(seconds, picoseconds))
            })?),
        })
    }
}

/// Element types that can be viewed out of a `BufferData`
pub trait Element: Copy {
    /// Borrow the elements if `data` holds this type
    fn slice(data: &BufferData) -> Option<&[Self]>;
}

macro_rules! impl_element {
    ($t:ty, $variant:ident) => {
        impl Element for $t {
            fn slice(data: &BufferData) -> Option<&[Self]> {
                match data {
                    BufferData::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

impl_element!(i8, I8);
impl_element!(i16, I16);
impl_element!(u16, U16);
impl_element!(i32, I32);
impl_element!(u32, U32);
impl_element!(i64, I64);
impl_element!(f32, F32);
impl_element!(f64, F64);
impl_element!(Tt2000, Tt2000);
impl_element!(Epoch, Epoch);
impl_element!(Epoch16, Epoch16);

/// u8 covers both UINT1 values and string bytes
impl Element for u8 {
    fn slice(data: &BufferData) -> Option<&[Self]> {
        match data {
            BufferData::U8(v) | BufferData::Char(v) => Some(v),
            _ => None,
        }
    }
}

// ============================================================================
// TypedBuffer
// ============================================================================

/// A validated, contiguous, typed, shaped buffer
///
/// Deserialization goes through [`TypedBuffer::new`], so a decoded buffer
/// is checked like a constructed one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTypedBuffer")]
pub struct TypedBuffer {
    scalar_type: ScalarType,
    shape: Vec<usize>,
    data: BufferData,
}

/// Unchecked wire form of a [`TypedBuffer`]
#[derive(Deserialize)]
struct RawTypedBuffer {
    scalar_type: ScalarType,
    shape: Vec<usize>,
    data: BufferData,
}

impl TryFrom<RawTypedBuffer> for TypedBuffer {
    type Error = Error;

    fn try_from(raw: RawTypedBuffer) -> Result<Self> {
        TypedBuffer::new(raw.scalar_type, raw.shape, raw.data)
    }
}

impl TypedBuffer {
    /// Build a buffer, checking type and shape against the data
    pub fn new(scalar_type: ScalarType, shape: Vec<usize>, data: BufferData) -> Result<Self> {
        match scalar_type.repr() {
            Some(repr) if repr == data.repr() => {}
            _ => {
                return Err(Error::invalid_argument(format!(
                    "{} cannot hold {:?} elements",
                    scalar_type,
                    data.repr()
                )))
            }
        }
        let expected = flat_size(&shape);
        if expected != data.len() {
            return Err(Error::invalid_argument(format!(
                "shape {:?} holds {} elements but {} were given",
                shape,
                expected,
                data.len()
            )));
        }
        Ok(TypedBuffer {
            scalar_type,
            shape,
            data,
        })
    }

    /// Zero-length buffer of a type, shape `[0]`
    pub fn empty(scalar_type: ScalarType) -> Result<Self> {
        let repr = scalar_type.repr().ok_or_else(|| {
            Error::invalid_argument("an empty buffer needs a concrete type")
        })?;
        Self::new(scalar_type, vec![0], BufferData::empty(repr))
    }

    /// Build a `[count, width]` string buffer, NUL padded
    ///
    /// `width` is the longest encoded string, at least 1.
    pub fn from_strings<S: AsRef<str>>(scalar_type: ScalarType, strings: &[S]) -> Result<Self> {
        if !scalar_type.is_string() {
            return Err(Error::invalid_argument(format!(
                "{} is not a string type",
                scalar_type
            )));
        }
        let width = strings
            .iter()
            .map(|s| s.as_ref().len())
            .max()
            .unwrap_or(0)
            .max(1);
        let mut bytes = Vec::with_capacity(width * strings.len());
        for s in strings {
            let s = s.as_ref().as_bytes();
            bytes.extend_from_slice(s);
            bytes.resize(bytes.len() + width - s.len(), 0);
        }
        Self::new(scalar_type, vec![strings.len(), width], BufferData::Char(bytes))
    }

    /// Scalar type tag
    pub fn scalar_type(&self) -> ScalarType {
        self.scalar_type
    }

    /// Shape, row-major
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Element storage
    pub fn data(&self) -> &BufferData {
        &self.data
    }

    /// Take the element storage
    pub fn into_data(self) -> BufferData {
        self.data
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the buffer holds no elements
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Size of the byte image
    pub fn byte_len(&self) -> usize {
        self.len() * self.scalar_type.native_width()
    }

    /// Typed view of the elements
    pub fn values<T: Element>(&self) -> Option<&[T]> {
        self.data.as_slice()
    }

    /// Same elements under a new shape
    pub fn reshape(self, shape: Vec<usize>) -> Result<Self> {
        Self::new(self.scalar_type, shape, self.data)
    }

    /// Same elements under an alias type of identical representation
    pub fn retag(self, scalar_type: ScalarType) -> Result<Self> {
        Self::new(scalar_type, self.shape, self.data)
    }

    /// Decode a string buffer into its strings, trailing NULs removed
    ///
    /// The last axis is the string width. Returns `None` for non-string
    /// buffers.
    pub fn strings(&self) -> Option<Vec<String>> {
        let BufferData::Char(bytes) = &self.data else {
            return None;
        };
        let width = match self.shape.last() {
            Some(0) | None => return Some(Vec::new()),
            Some(w) => *w,
        };
        Some(
            bytes
                .chunks(width)
                .map(|chunk| {
                    let end = chunk.iter().rposition(|b| *b != 0).map_or(0, |p| p + 1);
                    String::from_utf8_lossy(&chunk[..end]).into_owned()
                })
                .collect(),
        )
    }

    // =========================================================================
    // Byte images
    // =========================================================================

    /// Write the little-endian byte image of the elements
    pub fn write_le<W: Write>(&self, writer: &mut W) -> Result<()> {
        self.data
            .write_le(writer)
            .map_err(|e| Error::invalid_argument(format!("cannot write byte image: {}", e)))
    }

    /// Little-endian byte image of the elements
    pub fn to_le_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.byte_len());
        self.write_le(&mut out)?;
        Ok(out)
    }

    /// Rebuild a buffer from its little-endian byte image
    ///
    /// Fails if `bytes` is not exactly `product(shape) * native_width` long.
    pub fn from_le_bytes(scalar_type: ScalarType, shape: Vec<usize>, bytes: &[u8]) -> Result<Self> {
        let repr = scalar_type.repr().ok_or_else(|| {
            Error::invalid_argument("cannot decode a byte image without a concrete type")
        })?;
        let count = flat_size(&shape);
        let expected = count.checked_mul(repr.width());
        if expected != Some(bytes.len()) {
            return Err(Error::invalid_argument(format!(
                "byte image of {} bytes does not match {} x {:?}",
                bytes.len(),
                scalar_type,
                shape
            )));
        }
        let mut reader = bytes;
        let data = BufferData::read_le(repr, count, &mut reader)
            .map_err(|e| Error::invalid_argument(format!("cannot read byte image: {}", e)))?;
        Self::new(scalar_type, shape, data)
    }
}

/// Standard fill value of a type, as a one-element buffer
///
/// Returns `None` for `CDF_NONE`.
pub fn default_fill_value(scalar_type: ScalarType) -> Option<TypedBuffer> {
    let data = match scalar_type {
        ScalarType::None => return None,
        ScalarType::Int1 | ScalarType::Byte => BufferData::I8(vec![i8::MIN]),
        ScalarType::Int2 => BufferData::I16(vec![i16::MIN]),
        ScalarType::Int4 => BufferData::I32(vec![i32::MIN]),
        ScalarType::Int8 => BufferData::I64(vec![i64::MIN]),
        ScalarType::Uint1 => BufferData::U8(vec![u8::MAX]),
        ScalarType::Uint2 => BufferData::U16(vec![u16::MAX]),
        ScalarType::Uint4 => BufferData::U32(vec![u32::MAX]),
        ScalarType::Real4 | ScalarType::Float => BufferData::F32(vec![-1e31]),
        ScalarType::Real8 | ScalarType::Double => BufferData::F64(vec![-1e31]),
        ScalarType::Epoch => BufferData::Epoch(vec![Epoch::FILL]),
        ScalarType::Epoch16 => BufferData::Epoch16(vec![Epoch16::FILL]),
        ScalarType::TimeTt2000 => BufferData::Tt2000(vec![Tt2000::FILL]),
        ScalarType::Char | ScalarType::Uchar => BufferData::Char(vec![b' ']),
    };
    TypedBuffer::new(scalar_type, vec![1], data).ok()
}
