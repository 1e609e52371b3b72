//! Variables
//!
//! A variable is the main container: a named, typed, shaped buffer whose
//! first axis counts records (unless it is non-record-varying), with its
//! own attributes and a compression setting that is carried for the
//! persistence layer but never interpreted here.

use crate::attribute::VariableAttribute;
use crate::container::{commit_buffer, commit_values, Container};
use crate::inference::TypeInference;
use crate::value::Value;
use cdfkit_core::{decode_buffer, CompressionType, Error, Result, ScalarType, TypedBuffer};
use chrono::NaiveDateTime;
use std::collections::BTreeMap;

/// A CDF variable
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    name: String,
    values: Option<TypedBuffer>,
    is_nrv: bool,
    compression: CompressionType,
    attributes: BTreeMap<String, VariableAttribute>,
    inference: TypeInference,
}

impl Variable {
    /// Untyped record-varying variable
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_inference(
            name.into(),
            false,
            CompressionType::None,
            TypeInference::default(),
        )
    }

    pub(crate) fn with_inference(
        name: String,
        is_nrv: bool,
        compression: CompressionType,
        inference: TypeInference,
    ) -> Self {
        Variable {
            name,
            values: None,
            is_nrv,
            compression,
            attributes: BTreeMap::new(),
            inference,
        }
    }

    /// Variable read back from storage, typed without inference
    ///
    /// A non-record-varying variable must hold exactly one record.
    pub fn from_persisted(
        name: impl Into<String>,
        values: TypedBuffer,
        is_nrv: bool,
        compression: CompressionType,
    ) -> Result<Self> {
        let name = name.into();
        if is_nrv && values.shape().first() != Some(&1) {
            return Err(Error::invalid_argument(format!(
                "non-record-varying variable {} stored with shape {:?}",
                name,
                values.shape()
            )));
        }
        let mut variable =
            Self::with_inference(name, is_nrv, compression, TypeInference::default());
        variable.values = Some(values);
        Ok(variable)
    }

    /// Variable name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fixed type, `ScalarType::None` while untyped
    pub fn scalar_type(&self) -> ScalarType {
        self.declared_type()
    }

    /// Shape of the stored values, records first
    pub fn shape(&self) -> &[usize] {
        self.declared_shape()
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.shape().first().copied().unwrap_or(0)
    }

    /// True when no records are stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stored values
    pub fn values(&self) -> Option<&TypedBuffer> {
        self.values.as_ref()
    }

    /// Whether the variable holds a single record
    pub fn is_nrv(&self) -> bool {
        self.is_nrv
    }

    /// Compression recorded for the persistence layer
    pub fn compression(&self) -> CompressionType {
        self.compression
    }

    /// Change the recorded compression
    pub fn set_compression(&mut self, compression: CompressionType) {
        self.compression = compression;
    }

    /// Replace the values with ones inferred from `value`
    ///
    /// Returns the variable's type afterwards. On error the variable is
    /// unchanged.
    pub fn set_from_values(
        &mut self,
        value: impl Into<Value>,
        declared: Option<ScalarType>,
    ) -> Result<ScalarType> {
        let engine = self.inference.clone();
        commit_values(self, &engine, value.into(), declared)
    }

    /// Replace the values with a copy of another variable's values
    pub fn set_from_existing(&mut self, other: &Variable) -> Result<ScalarType> {
        let buffer = other.values.clone().ok_or_else(|| {
            Error::invalid_argument(format!("variable {} has no values to copy", other.name))
        })?;
        commit_buffer(self, buffer)
    }

    /// Fix the type without storing values
    pub(crate) fn declare(&mut self, scalar_type: ScalarType) -> Result<()> {
        self.values = Some(TypedBuffer::empty(scalar_type)?);
        Ok(())
    }

    /// Add an attribute with an inferred type
    pub fn add_attribute(
        &mut self,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<&mut VariableAttribute> {
        self.add_attribute_typed(name, value, None)
    }

    /// Add an attribute, optionally with an explicit type
    ///
    /// Fails with `AlreadyExists` if the name is taken.
    pub fn add_attribute_typed(
        &mut self,
        name: impl Into<String>,
        value: impl Into<Value>,
        declared: Option<ScalarType>,
    ) -> Result<&mut VariableAttribute> {
        let name = name.into();
        if self.attributes.contains_key(&name) {
            return Err(Error::AlreadyExists(format!(
                "attribute {} of variable {}",
                name, self.name
            )));
        }
        let mut attribute = VariableAttribute::new(&self.name, name.clone(), self.inference.clone());
        attribute.set_value(value, declared)?;
        Ok(self.attributes.entry(name).or_insert(attribute))
    }

    /// Attribute by name
    pub fn attribute(&self, name: &str) -> Option<&VariableAttribute> {
        self.attributes.get(name)
    }

    /// Mutable attribute by name
    pub fn attribute_mut(&mut self, name: &str) -> Option<&mut VariableAttribute> {
        self.attributes.get_mut(name)
    }

    /// Attribute names in order
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    /// Decode a time variable into instants, in row-major order
    pub fn to_instants(&self) -> Result<Vec<NaiveDateTime>> {
        match &self.values {
            Some(buffer) => decode_buffer(buffer),
            None => Err(Error::invalid_argument(format!(
                "variable {} has no values",
                self.name
            ))),
        }
    }
}

impl Container for Variable {
    fn label(&self) -> &str {
        &self.name
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
        !self.is_nrv
    }

    fn replace(&mut self, buffer: TypedBuffer) {
        self.values = Some(buffer);
    }
}
