//! Attributes
//!
//! An attribute entry is a small typed vector: a number list, a string or a
//! time list. Entries follow the mutation contract with record-varying
//! shape rules, so a later commit may change an entry's length but never
//! its type.

use crate::container::{commit_buffer, Container};
use crate::inference::TypeInference;
use crate::value::Value;
use cdfkit_core::{Error, Result, ScalarType, TypedBuffer};

/// One typed attribute entry
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeEntry {
    label: String,
    values: Option<TypedBuffer>,
}

impl AttributeEntry {
    pub(crate) fn new(label: String) -> Self {
        AttributeEntry {
            label,
            values: None,
        }
    }

    /// Entry type, `ScalarType::None` before the first commit
    pub fn scalar_type(&self) -> ScalarType {
        self.declared_type()
    }

    /// Shape of the entry's values
    pub fn shape(&self) -> &[usize] {
        self.declared_shape()
    }

    /// Committed values
    pub fn values(&self) -> Option<&TypedBuffer> {
        self.values.as_ref()
    }

    /// Number of stored elements (bytes for strings)
    pub fn len(&self) -> usize {
        self.values.as_ref().map_or(0, TypedBuffer::len)
    }

    /// True when nothing is stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The entry's string, if it holds one
    pub fn as_str(&self) -> Option<String> {
        self.values
            .as_ref()
            .and_then(TypedBuffer::strings)
            .and_then(|s| s.into_iter().next())
    }

    /// Commit a value into this entry
    ///
    /// Entries are one-dimensional; a value that infers to a higher rank is
    /// `MalformedInput`.
    pub(crate) fn set(
        &mut self,
        engine: &TypeInference,
        value: Value,
        declared: Option<ScalarType>,
    ) -> Result<ScalarType> {
        let buffer = engine.infer(value, declared, self.declared_type())?;
        if buffer.shape().len() > 1 {
            return Err(Error::malformed(format!(
                "attribute entry {} takes one-dimensional values, got shape {:?}",
                self.label,
                buffer.shape()
            )));
        }
        commit_buffer(self, buffer)
    }
}

impl Container for AttributeEntry {
    fn label(&self) -> &str {
        &self.label
    }

    fn declared_type(&self) -> ScalarType {
        self.values
            .as_ref()
            .map_or(ScalarType::None, TypedBuffer::scalar_type)
    }

    fn declared_shape(&self) -> &[usize] {
        self.values.as_ref().map_or(&[][..], TypedBuffer::shape)
    }

    fn is_record_varying(&self) -> bool {
        true
    }

    fn replace(&mut self, buffer: TypedBuffer) {
        self.values = Some(buffer);
    }
}

/// Attribute attached to a variable, holding a single entry
#[derive(Debug, Clone, PartialEq)]
pub struct VariableAttribute {
    name: String,
    entry: AttributeEntry,
    inference: TypeInference,
}

impl VariableAttribute {
    pub(crate) fn new(variable: &str, name: String, inference: TypeInference) -> Self {
        let entry = AttributeEntry::new(format!("{}.{}", variable, name));
        VariableAttribute {
            name,
            entry,
            inference,
        }
    }

    /// Attribute name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The attribute's entry
    pub fn entry(&self) -> &AttributeEntry {
        &self.entry
    }

    /// Entry type
    pub fn scalar_type(&self) -> ScalarType {
        self.entry.scalar_type()
    }

    /// Replace the attribute's value
    pub fn set_value(
        &mut self,
        value: impl Into<Value>,
        declared: Option<ScalarType>,
    ) -> Result<ScalarType> {
        self.entry.set(&self.inference, value.into(), declared)
    }
}

/// Global attribute with any number of entries
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    name: String,
    entries: Vec<AttributeEntry>,
    inference: TypeInference,
}

impl Attribute {
    pub(crate) fn new(name: String, inference: TypeInference) -> Self {
        Attribute {
            name,
            entries: Vec::new(),
            inference,
        }
    }

    /// Attribute name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the attribute has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `index`
    pub fn entry(&self, index: usize) -> Option<&AttributeEntry> {
        self.entries.get(index)
    }

    /// All entries in order
    pub fn entries(&self) -> &[AttributeEntry] {
        &self.entries
    }

    /// Replace every entry, inferring each one from scratch
    ///
    /// Either all entries are replaced or none are.
    pub fn set_values(&mut self, values: Vec<Value>) -> Result<()> {
        let declared = vec![None; values.len()];
        self.rebuild(values, declared)
    }

    /// Replace every entry with an explicit type per entry
    pub fn set_values_typed(&mut self, values: Vec<Value>, types: &[ScalarType]) -> Result<()> {
        if values.len() != types.len() {
            return Err(Error::invalid_argument(format!(
                "attribute {} got {} values but {} types",
                self.name,
                values.len(),
                types.len()
            )));
        }
        let declared = types.iter().map(|t| Some(*t)).collect();
        self.rebuild(values, declared)
    }

    /// Replace a single entry, following its fixed type
    pub fn set_entry(
        &mut self,
        index: usize,
        value: impl Into<Value>,
        declared: Option<ScalarType>,
    ) -> Result<ScalarType> {
        let len = self.entries.len();
        let entry = self.entries.get_mut(index).ok_or_else(|| {
            Error::NotFound(format!(
                "entry {} of attribute {} ({} entries)",
                index, self.name, len
            ))
        })?;
        entry.set(&self.inference, value.into(), declared)
    }

    fn rebuild(&mut self, values: Vec<Value>, declared: Vec<Option<ScalarType>>) -> Result<()> {
        let mut entries = Vec::with_capacity(values.len());
        for (index, (value, declared)) in values.into_iter().zip(declared).enumerate() {
            let mut entry = AttributeEntry::new(format!("{}[{}]", self.name, index));
            entry.set(&self.inference, value, declared)?;
            entries.push(entry);
        }
        self.entries = entries;
        Ok(())
    }
}
