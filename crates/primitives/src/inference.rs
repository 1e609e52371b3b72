//! Type inference
//!
//! Turns a client [`Value`] into a contiguous [`TypedBuffer`]. The value is
//! classified once (see [`crate::classify`]) and each input kind has its own
//! path:
//!
//! - numbers: plain integer lists narrow to the smallest type covering their
//!   range (preferring the container's type when it covers it), tagged
//!   integers keep their width, floats become DOUBLE (FLOAT when every leaf is
//!   a tagged f32)
//! - strings: UTF-8, NUL padded to the longest string
//! - time values: encoded with the declared encoding, else the container's,
//!   else the configured default
//! - pre-typed arrays: passed through, copied into dense order when they are
//!   strided views
//!
//! Inference never looks at a container; the caller passes the container's
//! current type as `hint`.

use crate::classify::{classify, InputKind, Leaf, Shaped, TimeLeaf};
use crate::value::{ArrayData, NdArray, TaggedScalar, Value};
use cdfkit_core::contract::NativeRepr;
use cdfkit_core::temporal::{count_out_of_range, transcode};
use cdfkit_core::{
    BufferData, Epoch, Epoch16, Error, Limits, Result, ScalarType, TimeEncoding,
    TimeScalar, Tt2000, TypedBuffer,
};
use chrono::NaiveDateTime;
use tracing::{debug, warn};

/// Knobs of the inference engine
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceOptions {
    /// Narrow width-tagged integer lists like plain literal lists
    pub narrow_tagged_integers: bool,
    /// String type used when neither a declaration nor the container decides
    pub string_type: ScalarType,
    /// Time encoding used when neither a declaration nor the container decides
    pub time_encoding: TimeEncoding,
    /// Input size limits
    pub limits: Limits,
}

impl Default for InferenceOptions {
    fn default() -> Self {
        InferenceOptions {
            narrow_tagged_integers: false,
            string_type: ScalarType::Char,
            time_encoding: TimeEncoding::Tt2000,
            limits: Limits::default(),
        }
    }
}

/// Type inference engine
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeInference {
    options: InferenceOptions,
}

impl TypeInference {
    /// Create an engine with the given options
    pub fn new(options: InferenceOptions) -> Self {
        TypeInference { options }
    }

    /// Options in use
    pub fn options(&self) -> &InferenceOptions {
        &self.options
    }

    /// Infer a typed buffer from a value
    ///
    /// `declared` is the caller's explicit type (`Some(ScalarType::None)`
    /// counts as no declaration). `hint` is the container's current type, or
    /// `ScalarType::None` for an untyped container; it only steers the
    /// choice between types that can all hold the data.
    pub fn infer(
        &self,
        value: Value,
        declared: Option<ScalarType>,
        hint: ScalarType,
    ) -> Result<TypedBuffer> {
        let declared = declared.filter(|t| !t.is_none());
        let buffer = match classify(value, &self.options.limits)? {
            InputKind::Scalar(leaf) => self.infer_numeric(vec![leaf], vec![1], declared, hint),
            InputKind::FlatNumericSequence(leaves) => {
                let shape = vec![leaves.len()];
                self.infer_numeric(leaves, shape, declared, hint)
            }
            InputKind::NestedSequence(shaped) => {
                self.infer_numeric(shaped.leaves, shaped.shape, declared, hint)
            }
            InputKind::TextSequence(shaped) => self.infer_text(shaped, declared, hint),
            InputKind::TemporalSequence(shaped) => self.infer_temporal(shaped, declared, hint),
            InputKind::PretypedBuffer(array) => self.infer_pretyped(array, declared, hint),
        }?;
        debug!(
            target: "cdfkit::infer",
            scalar_type = %buffer.scalar_type(),
            shape = ?buffer.shape(),
            "Inferred values"
        );
        Ok(buffer)
    }

    fn infer_numeric(
        &self,
        leaves: Vec<Leaf>,
        shape: Vec<usize>,
        declared: Option<ScalarType>,
        hint: ScalarType,
    ) -> Result<TypedBuffer> {
        if leaves.is_empty() {
            let scalar_type = declared
                .or_else(|| Some(hint).filter(|t| !t.is_none()))
                .unwrap_or(ScalarType::Double);
            return empty_buffer(scalar_type, shape);
        }
        let scalar_type = match declared {
            Some(t) => t,
            None => self.natural_numeric_type(&leaves, hint),
        };
        let data = convert_leaves(&leaves, scalar_type, || {
            self.natural_numeric_type(&leaves, ScalarType::None)
        })?;
        TypedBuffer::new(scalar_type, shape, data)
    }

    /// Type numeric leaves take when nothing is declared
    fn natural_numeric_type(&self, leaves: &[Leaf], hint: ScalarType) -> ScalarType {
        let integers: Option<Vec<i64>> = leaves.iter().map(Leaf::as_i64).collect();
        let Some(integers) = integers else {
            let all_f32 = leaves
                .iter()
                .all(|l| matches!(l, Leaf::Tagged(TaggedScalar::F32(_))));
            return if all_f32 {
                ScalarType::Float
            } else {
                ScalarType::Double
            };
        };

        let tagged: Vec<ScalarType> = leaves
            .iter()
            .filter_map(|l| match l {
                Leaf::Tagged(t) => Some(t.scalar_type()),
                _ => None,
            })
            .collect();
        if tagged.is_empty() || self.options.narrow_tagged_integers {
            let (min, max) = value_range(&integers);
            return narrowest_integer(min, max, hint);
        }

        // Tagged widths are kept: cover every tagged type's full range, then
        // whatever plain literals were mixed in.
        let (mut min, mut max) = (i64::MAX, i64::MIN);
        for (lo, hi) in tagged.iter().filter_map(|t| t.integer_range()) {
            min = min.min(lo);
            max = max.max(hi);
        }
        for leaf in leaves {
            if let Leaf::Int(v) = leaf {
                min = min.min(*v);
                max = max.max(*v);
            }
        }
        narrowest_integer(min, max, ScalarType::None)
    }

    fn infer_text(
        &self,
        shaped: Shaped<String>,
        declared: Option<ScalarType>,
        hint: ScalarType,
    ) -> Result<TypedBuffer> {
        let scalar_type = match declared {
            Some(t) if t.is_string() => t,
            Some(t) => {
                return Err(Error::TypeIncompatibility {
                    existing: t,
                    candidate: self.options.string_type,
                })
            }
            None if hint.is_string() => hint,
            None => self.options.string_type,
        };
        let buffer = TypedBuffer::from_strings(scalar_type, &shaped.leaves)?;
        let width = buffer.shape().get(1).copied().unwrap_or(1);
        let mut shape = shaped.shape;
        shape.push(width);
        buffer.reshape(shape)
    }

    fn infer_temporal(
        &self,
        shaped: Shaped<TimeLeaf>,
        declared: Option<ScalarType>,
        hint: ScalarType,
    ) -> Result<TypedBuffer> {
        let encoding = match declared {
            Some(t) => TimeEncoding::from_scalar_type(t).unwrap_or_else(|| {
                warn!(
                    target: "cdfkit::infer",
                    declared = %t,
                    "Declared type ignored for time values"
                );
                self.default_encoding(hint)
            }),
            None => self.default_encoding(hint),
        };

        let instants: Vec<NaiveDateTime> = shaped
            .leaves
            .iter()
            .filter_map(|leaf| match leaf {
                TimeLeaf::Instant(t) => Some(*t),
                _ => None,
            })
            .collect();
        let clamped = count_out_of_range(&instants, encoding);
        if clamped > 0 {
            warn!(
                target: "cdfkit::infer",
                clamped,
                encoding = %encoding,
                "Instants outside the encoding range were clamped"
            );
        }

        let data = encode_time_leaves(&shaped.leaves, encoding);
        let shape = if shaped.shape.is_empty() {
            vec![1]
        } else {
            shaped.shape
        };
        TypedBuffer::new(encoding.scalar_type(), shape, data)
    }

    fn infer_pretyped(
        &self,
        array: NdArray,
        declared: Option<ScalarType>,
        hint: ScalarType,
    ) -> Result<TypedBuffer> {
        let (data, shape) = array.into_contiguous()?;
        match data {
            ArrayData::Strings(leaves) => self.infer_text(Shaped { shape, leaves }, declared, hint),
            ArrayData::Instants(instants) => {
                let leaves = instants.into_iter().map(TimeLeaf::Instant).collect();
                self.infer_temporal(Shaped { shape, leaves }, declared, hint)
            }
            ArrayData::Numeric(data) => {
                let natural = data.repr().natural_type();
                let buffer = TypedBuffer::new(natural, shape, data)?;
                match declared {
                    None => Ok(buffer),
                    Some(t) if t.repr() == Some(buffer.data().repr()) => buffer.retag(t),
                    Some(t) => match (
                        TimeEncoding::from_scalar_type(natural),
                        TimeEncoding::from_scalar_type(t),
                    ) {
                        (Some(_), Some(target)) => transcode(buffer, target),
                        _ => Err(Error::invalid_argument(format!(
                            "cannot store a {} array as {}",
                            natural, t
                        ))),
                    },
                }
            }
        }
    }

    fn default_encoding(&self, hint: ScalarType) -> TimeEncoding {
        TimeEncoding::from_scalar_type(hint).unwrap_or(self.options.time_encoding)
    }
}

/// Narrowest integer type for `[min, max]`
///
/// `hint` wins when it is an integer type that covers the range. Otherwise
/// negative ranges pick from INT1..INT8 and the rest from UINT1..UINT4, then
/// INT8.
pub fn narrowest_integer(min: i64, max: i64, hint: ScalarType) -> ScalarType {
    if hint.is_integer() && hint.contains_range(min, max) {
        return hint;
    }
    let candidates: &[ScalarType] = if min < 0 {
        &[
            ScalarType::Int1,
            ScalarType::Int2,
            ScalarType::Int4,
            ScalarType::Int8,
        ]
    } else {
        &[
            ScalarType::Uint1,
            ScalarType::Uint2,
            ScalarType::Uint4,
            ScalarType::Int8,
        ]
    };
    candidates
        .iter()
        .copied()
        .find(|t| t.contains_range(min, max))
        .unwrap_or(ScalarType::Int8)
}

fn value_range(values: &[i64]) -> (i64, i64) {
    values
        .iter()
        .fold((i64::MAX, i64::MIN), |(lo, hi), v| (lo.min(*v), hi.max(*v)))
}

fn empty_buffer(scalar_type: ScalarType, shape: Vec<usize>) -> Result<TypedBuffer> {
    let repr = scalar_type.repr().ok_or_else(|| {
        Error::invalid_argument(format!("cannot build {} values", scalar_type))
    })?;
    TypedBuffer::new(scalar_type, shape, BufferData::empty(repr))
}

/// Convert numeric leaves to the storage of `scalar_type`
///
/// `natural` names the leaves' own type when `scalar_type` cannot hold
/// numbers at all.
fn convert_leaves(
    leaves: &[Leaf],
    scalar_type: ScalarType,
    natural: impl FnOnce() -> ScalarType,
) -> Result<BufferData> {
    let repr = match scalar_type.repr() {
        Some(repr) if !scalar_type.is_string() => repr,
        _ => {
            return Err(Error::TypeIncompatibility {
                existing: scalar_type,
                candidate: natural(),
            })
        }
    };
    let data = match repr {
        NativeRepr::I8 => BufferData::I8(cast_integers(leaves, scalar_type)?),
        NativeRepr::U8 => BufferData::U8(cast_integers(leaves, scalar_type)?),
        NativeRepr::I16 => BufferData::I16(cast_integers(leaves, scalar_type)?),
        NativeRepr::U16 => BufferData::U16(cast_integers(leaves, scalar_type)?),
        NativeRepr::I32 => BufferData::I32(cast_integers(leaves, scalar_type)?),
        NativeRepr::U32 => BufferData::U32(cast_integers(leaves, scalar_type)?),
        NativeRepr::I64 => BufferData::I64(cast_integers(leaves, scalar_type)?),
        NativeRepr::F32 => BufferData::F32(
            leaves
                .iter()
                .map(|l| leaf_to_f32(l, scalar_type))
                .collect::<Result<_>>()?,
        ),
        NativeRepr::F64 => BufferData::F64(leaves.iter().map(Leaf::as_f64).collect()),
        NativeRepr::Tt2000 => BufferData::Tt2000(
            leaves
                .iter()
                .map(|l| leaf_to_i64(l, scalar_type).map(Tt2000::new))
                .collect::<Result<_>>()?,
        ),
        NativeRepr::Epoch => {
            BufferData::Epoch(leaves.iter().map(|l| Epoch::new(l.as_f64())).collect())
        }
        NativeRepr::Epoch16 => {
            return Err(Error::malformed(
                "CDF_EPOCH16 values need instants or epoch16 scalars",
            ))
        }
        NativeRepr::Char => {
            return Err(Error::TypeIncompatibility {
                existing: scalar_type,
                candidate: natural(),
            })
        }
    };
    Ok(data)
}

fn cast_integers<T: TryFrom<i64>>(leaves: &[Leaf], scalar_type: ScalarType) -> Result<Vec<T>> {
    leaves
        .iter()
        .map(|leaf| {
            let v = leaf_to_i64(leaf, scalar_type)?;
            T::try_from(v).map_err(|_| {
                Error::malformed(format!("value {} does not fit {}", v, scalar_type))
            })
        })
        .collect()
}

fn leaf_to_i64(leaf: &Leaf, scalar_type: ScalarType) -> Result<i64> {
    if let Some(v) = leaf.as_i64() {
        return Ok(v);
    }
    let f = leaf.as_f64();
    // i64::MAX as f64 rounds up to 2^63, which is already out of range
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Ok(f as i64)
    } else {
        Err(Error::malformed(format!(
            "value {} cannot be stored as {}",
            f, scalar_type
        )))
    }
}

fn leaf_to_f32(leaf: &Leaf, scalar_type: ScalarType) -> Result<f32> {
    let f = leaf.as_f64();
    if f.is_finite() && f.abs() > f32::MAX as f64 {
        return Err(Error::malformed(format!(
            "value {} does not fit {}",
            f, scalar_type
        )));
    }
    Ok(f as f32)
}

/// Encode time leaves, keeping values already in the target encoding
fn encode_time_leaves(leaves: &[TimeLeaf], encoding: TimeEncoding) -> BufferData {
    match encoding {
        TimeEncoding::Tt2000 => BufferData::Tt2000(
            leaves
                .iter()
                .map(|leaf| match leaf {
                    TimeLeaf::Tt2000(v) => *v,
                    other => Tt2000::from_instant(&other.to_instant()),
                })
                .collect(),
        ),
        TimeEncoding::Epoch => BufferData::Epoch(
            leaves
                .iter()
                .map(|leaf| match leaf {
                    TimeLeaf::Epoch(v) => *v,
                    other => Epoch::from_instant(&other.to_instant()),
                })
                .collect(),
        ),
        TimeEncoding::Epoch16 => BufferData::Epoch16(
            leaves
                .iter()
                .map(|leaf| match leaf {
                    TimeLeaf::Epoch16(v) => *v,
                    other => Epoch16::from_instant(&other.to_instant()),
                })
                .collect(),
        ),
    }
}
