//! CDF collection
//!
//! Holds variables and global attributes by name. Creating a variable or an
//! attribute runs its initial values through the mutation contract on a
//! detached container first, so a failed creation leaves the collection
//! unchanged.

use crate::attribute::Attribute;
use crate::config::CoercionConfig;
use crate::inference::TypeInference;
use crate::value::Value;
use crate::variable::Variable;
use cdfkit_core::{CompressionType, Error, Result, ScalarType};
use std::collections::BTreeMap;
use tracing::debug;

/// Options for [`Cdf::add_variable`]
///
/// # Example
///
/// ```
/// use cdfkit_primitives::{Cdf, VariableOptions};
/// use cdfkit_core::ScalarType;
///
/// let mut cdf = Cdf::new();
/// let var = cdf
///     .add_variable(
///         "flux",
///         VariableOptions::new()
///             .values(vec![1.0f64, 2.0])
///             .attribute("units", "counts/s"),
///     )
///     .unwrap();
/// assert_eq!(var.scalar_type(), ScalarType::Double);
/// ```
#[derive(Debug, Clone, Default)]
pub struct VariableOptions {
    values: Option<Value>,
    declared_type: Option<ScalarType>,
    is_nrv: bool,
    compression: Option<CompressionType>,
    attributes: Vec<(String, Value)>,
}

impl VariableOptions {
    /// No values, inferred type, record-varying, collection compression
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial values
    pub fn values(mut self, values: impl Into<Value>) -> Self {
        self.values = Some(values.into());
        self
    }

    /// Explicit type; without values this creates an empty typed variable
    pub fn declared_type(mut self, scalar_type: ScalarType) -> Self {
        self.declared_type = Some(scalar_type);
        self
    }

    /// Make the variable non-record-varying
    pub fn nrv(mut self, is_nrv: bool) -> Self {
        self.is_nrv = is_nrv;
        self
    }

    /// Compression recorded on the variable
    pub fn compression(mut self, compression: CompressionType) -> Self {
        self.compression = Some(compression);
        self
    }

    /// Attribute added right after the values
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }
}

/// In-memory CDF: variables and global attributes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cdf {
    variables: BTreeMap<String, Variable>,
    attributes: BTreeMap<String, Attribute>,
    compression: CompressionType,
    inference: TypeInference,
}

impl Cdf {
    /// Empty CDF with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty CDF whose new variables and attributes follow `config`
    pub fn with_config(config: &CoercionConfig) -> Result<Self> {
        Ok(Cdf {
            variables: BTreeMap::new(),
            attributes: BTreeMap::new(),
            compression: config.compression,
            inference: TypeInference::new(config.to_inference_options()?),
        })
    }

    /// File-level compression
    pub fn compression(&self) -> CompressionType {
        self.compression
    }

    /// Change the file-level compression
    ///
    /// Existing variables keep their own setting.
    pub fn set_compression(&mut self, compression: CompressionType) {
        self.compression = compression;
    }

    /// Add a variable
    ///
    /// Fails with `AlreadyExists` if the name is taken, or with the error
    /// of the first failing commit; in both cases nothing is added.
    pub fn add_variable(
        &mut self,
        name: impl Into<String>,
        options: VariableOptions,
    ) -> Result<&mut Variable> {
        let name = name.into();
        if self.variables.contains_key(&name) {
            return Err(Error::AlreadyExists(format!("variable {}", name)));
        }

        let mut variable = Variable::with_inference(
            name.clone(),
            options.is_nrv,
            options.compression.unwrap_or(self.compression),
            self.inference.clone(),
        );
        match (options.values, options.declared_type) {
            (Some(values), declared) => {
                variable.set_from_values(values, declared)?;
            }
            (None, Some(scalar_type)) if !scalar_type.is_none() => {
                variable.declare(scalar_type)?;
            }
            (None, _) => {}
        }
        for (attribute, value) in options.attributes {
            variable.add_attribute(attribute, value)?;
        }

        debug!(
            target: "cdfkit::commit",
            variable = %name,
            scalar_type = %variable.scalar_type(),
            "Added variable"
        );
        Ok(self.variables.entry(name).or_insert(variable))
    }

    /// Add a global attribute with inferred entry types
    pub fn add_attribute(
        &mut self,
        name: impl Into<String>,
        entries: Vec<Value>,
    ) -> Result<&mut Attribute> {
        let name = name.into();
        let attribute = self.build_attribute(&name, |attr| attr.set_values(entries))?;
        Ok(self.attributes.entry(name).or_insert(attribute))
    }

    /// Add a global attribute with an explicit type per entry
    ///
    /// `entries` and `types` must have the same length.
    pub fn add_attribute_typed(
        &mut self,
        name: impl Into<String>,
        entries: Vec<Value>,
        types: &[ScalarType],
    ) -> Result<&mut Attribute> {
        let name = name.into();
        let attribute =
            self.build_attribute(&name, |attr| attr.set_values_typed(entries, types))?;
        Ok(self.attributes.entry(name).or_insert(attribute))
    }

    fn build_attribute(
        &self,
        name: &str,
        fill: impl FnOnce(&mut Attribute) -> Result<()>,
    ) -> Result<Attribute> {
        if self.attributes.contains_key(name) {
            return Err(Error::AlreadyExists(format!("attribute {}", name)));
        }
        let mut attribute = Attribute::new(name.to_string(), self.inference.clone());
        fill(&mut attribute)?;
        debug!(
            target: "cdfkit::commit",
            attribute = %name,
            entries = attribute.len(),
            "Added attribute"
        );
        Ok(attribute)
    }

    /// Variable by name
    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.variables.get(name)
    }

    /// Mutable variable by name
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Variable> {
        self.variables.get_mut(name)
    }

    /// Whether a variable exists
    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// Remove a variable, returning it
    pub fn remove_variable(&mut self, name: &str) -> Option<Variable> {
        self.variables.remove(name)
    }

    /// Variable names in order
    pub fn variable_names(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }

    /// Number of variables
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// Global attribute by name
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Mutable global attribute by name
    pub fn attribute_mut(&mut self, name: &str) -> Option<&mut Attribute> {
        self.attributes.get_mut(name)
    }

    /// Global attribute names in order
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }
}
