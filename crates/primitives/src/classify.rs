//! Input classification
//!
//! Resolves a [`Value`] into an [`InputKind`] in one walk: nested lists are
//! checked for a consistent (non-ragged) shape, leaves are collected in
//! row-major order, and every leaf must belong to the category of the first
//! one. The inference engine then matches on the kind instead of probing the
//! value again.

use crate::value::{NdArray, TaggedScalar, Value};
use cdfkit_core::{Epoch, Epoch16, Error, Limits, Result, TimeScalar, Tt2000};
use chrono::NaiveDateTime;

/// Numeric leaf
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Leaf {
    /// Plain integer literal
    Int(i64),
    /// Plain float literal
    Float(f64),
    /// Width-tagged integer or float
    Tagged(TaggedScalar),
}

impl Leaf {
    /// Integer value of plain and tagged integers
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Leaf::Int(v) => Some(*v),
            Leaf::Float(_) => None,
            Leaf::Tagged(t) => t.as_i64(),
        }
    }

    /// Value as f64
    pub fn as_f64(&self) -> f64 {
        match self {
            Leaf::Int(v) => *v as f64,
            Leaf::Float(v) => *v,
            Leaf::Tagged(t) => t.as_f64().unwrap_or(f64::NAN),
        }
    }
}

/// Time leaf, either an instant or an already-encoded value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeLeaf {
    /// Calendar instant
    Instant(NaiveDateTime),
    /// Encoded TT2000 tick
    Tt2000(Tt2000),
    /// Encoded epoch milliseconds
    Epoch(Epoch),
    /// Encoded epoch16 pair
    Epoch16(Epoch16),
}

impl TimeLeaf {
    fn from_tagged(tagged: TaggedScalar) -> Option<Self> {
        match tagged {
            TaggedScalar::Tt2000(v) => Some(TimeLeaf::Tt2000(v)),
            TaggedScalar::Epoch(v) => Some(TimeLeaf::Epoch(v)),
            TaggedScalar::Epoch16(v) => Some(TimeLeaf::Epoch16(v)),
            _ => None,
        }
    }

    /// Calendar instant this leaf stands for
    pub fn to_instant(&self) -> NaiveDateTime {
        match self {
            TimeLeaf::Instant(t) => *t,
            TimeLeaf::Tt2000(v) => v.to_instant(),
            TimeLeaf::Epoch(v) => v.to_instant(),
            TimeLeaf::Epoch16(v) => v.to_instant(),
        }
    }
}

/// Leaves of a nested sequence, with the shape they were found in
#[derive(Debug, Clone, PartialEq)]
pub struct Shaped<T> {
    /// Shape of the nesting (empty for a scalar)
    pub shape: Vec<usize>,
    /// Leaves in row-major order
    pub leaves: Vec<T>,
}

/// Classified input
#[derive(Debug, Clone, PartialEq)]
pub enum InputKind {
    /// Single numeric value
    Scalar(Leaf),
    /// One-dimensional numeric list (possibly empty)
    FlatNumericSequence(Vec<Leaf>),
    /// Numeric list of rank two or more
    NestedSequence(Shaped<Leaf>),
    /// Text scalar or nested list of strings
    TextSequence(Shaped<String>),
    /// Instants or encoded time values, scalar or nested
    TemporalSequence(Shaped<TimeLeaf>),
    /// Pre-typed array
    PretypedBuffer(NdArray),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Category {
    Numeric,
    Text,
    Temporal,
}

impl Category {
    fn of(value: &Value) -> Option<Category> {
        match value {
            Value::Int(_) | Value::Float(_) => Some(Category::Numeric),
            Value::Tagged(t) if t.is_temporal() => Some(Category::Temporal),
            Value::Tagged(_) => Some(Category::Numeric),
            Value::Text(_) => Some(Category::Text),
            Value::DateTime(_) => Some(Category::Temporal),
            Value::List(_) | Value::Array(_) => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Category::Numeric => "number",
            Category::Text => "string",
            Category::Temporal => "time",
        }
    }
}

/// Classify a value
///
/// Fails with `MalformedInput` on ragged nesting, arrays inside lists or
/// mixed leaf categories, and with `LimitExceeded` when `limits` are broken.
pub fn classify(value: Value, limits: &Limits) -> Result<InputKind> {
    match value {
        Value::Array(array) => {
            limits.check_elements(array.len())?;
            Ok(InputKind::PretypedBuffer(array))
        }
        Value::List(_) => classify_list(value, limits),
        Value::Text(s) => {
            limits.check_string(s.len())?;
            Ok(InputKind::TextSequence(Shaped {
                shape: Vec::new(),
                leaves: vec![s],
            }))
        }
        Value::DateTime(t) => Ok(InputKind::TemporalSequence(Shaped {
            shape: Vec::new(),
            leaves: vec![TimeLeaf::Instant(t)],
        })),
        Value::Tagged(t) => match TimeLeaf::from_tagged(t) {
            Some(leaf) => Ok(InputKind::TemporalSequence(Shaped {
                shape: Vec::new(),
                leaves: vec![leaf],
            })),
            None => Ok(InputKind::Scalar(Leaf::Tagged(t))),
        },
        Value::Int(v) => Ok(InputKind::Scalar(Leaf::Int(v))),
        Value::Float(v) => Ok(InputKind::Scalar(Leaf::Float(v))),
    }
}

fn classify_list(value: Value, limits: &Limits) -> Result<InputKind> {
    let shape = measure_shape(&value, limits)?;
    limits.check_elements(cdfkit_core::flat_size(&shape))?;

    let mut leaves = Vec::new();
    collect_leaves(value, &shape, 0, &mut leaves)?;

    let category = leaves.iter().find_map(Category::of);
    if let Some(category) = category {
        if let Some(other) = leaves
            .iter()
            .filter_map(Category::of)
            .find(|c| *c != category)
        {
            return Err(Error::malformed(format!(
                "list mixes {} and {} elements",
                category.name(),
                other.name()
            )));
        }
    }

    match category {
        None | Some(Category::Numeric) => {
            let leaves = leaves.into_iter().filter_map(numeric_leaf).collect();
            if shape.len() == 1 {
                Ok(InputKind::FlatNumericSequence(leaves))
            } else {
                Ok(InputKind::NestedSequence(Shaped { shape, leaves }))
            }
        }
        Some(Category::Text) => {
            let leaves: Vec<String> = leaves
                .into_iter()
                .filter_map(|v| match v {
                    Value::Text(s) => Some(s),
                    _ => None,
                })
                .collect();
            for s in &leaves {
                limits.check_string(s.len())?;
            }
            Ok(InputKind::TextSequence(Shaped { shape, leaves }))
        }
        Some(Category::Temporal) => {
            let leaves = leaves
                .into_iter()
                .filter_map(|v| match v {
                    Value::DateTime(t) => Some(TimeLeaf::Instant(t)),
                    Value::Tagged(t) => TimeLeaf::from_tagged(t),
                    _ => None,
                })
                .collect();
            Ok(InputKind::TemporalSequence(Shaped { shape, leaves }))
        }
    }
}

fn numeric_leaf(value: Value) -> Option<Leaf> {
    match value {
        Value::Int(v) => Some(Leaf::Int(v)),
        Value::Float(v) => Some(Leaf::Float(v)),
        Value::Tagged(t) => Some(Leaf::Tagged(t)),
        _ => None,
    }
}

/// Shape along the first element of every level
fn measure_shape(value: &Value, limits: &Limits) -> Result<Vec<usize>> {
    let mut shape = Vec::new();
    let mut current = value;
    while let Value::List(items) = current {
        shape.push(items.len());
        limits.check_depth(shape.len())?;
        match items.first() {
            Some(first) => current = first,
            None => break,
        }
    }
    Ok(shape)
}

/// Walk the nesting, checking every level against `shape`
fn collect_leaves(value: Value, shape: &[usize], depth: usize, out: &mut Vec<Value>) -> Result<()> {
    match value {
        Value::List(items) => {
            if depth >= shape.len() || items.len() != shape[depth] {
                return Err(Error::malformed(format!(
                    "ragged nested list: expected {} elements at depth {}, found {}",
                    shape.get(depth).map_or("no list".to_string(), |n| n.to_string()),
                    depth,
                    items.len()
                )));
            }
            for item in items {
                collect_leaves(item, shape, depth + 1, out)?;
            }
            Ok(())
        }
        Value::Array(_) => Err(Error::malformed("arrays cannot be nested inside lists")),
        leaf => {
            if depth != shape.len() {
                return Err(Error::malformed(format!(
                    "ragged nested list: scalar found at depth {} of {}",
                    depth,
                    shape.len()
                )));
            }
            out.push(leaf);
            Ok(())
        }
    }
}
