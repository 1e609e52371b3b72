//! Value coercion and typed containers for cdfkit
//!
//! Takes loosely typed client values and turns them into the strictly typed,
//! fixed-width, fixed-shape buffers a CDF container stores:
//!
//! - **Value**: the client input model (numbers, strings, instants, tagged
//!   scalars, nested lists, pre-typed arrays)
//! - **TypeInference**: picks the scalar type and shape of a value
//! - **reconcile**: fits a buffer's shape to a container's shape
//! - **Container**: the mutation contract shared by every container
//! - **Variable**, **Attribute**, **VariableAttribute**: the containers
//! - **Cdf**: variables and global attributes by name
//! - **CoercionConfig**: the `cdfkit.toml` settings
//!
//! ## Mutation Contract
//!
//! Every write infers a buffer, checks it against the container's fixed
//! type, reconciles its shape and only then replaces the stored buffer. A
//! failed write leaves the container untouched.
//!
//! ```
//! use cdfkit_primitives::{Cdf, Value, VariableOptions};
//! use cdfkit_core::ScalarType;
//!
//! let mut cdf = Cdf::new();
//! let var = cdf.add_variable("x", VariableOptions::new()).unwrap();
//! var.set_from_values(vec![1i64, 2, 3, 4], Some(ScalarType::Double)).unwrap();
//! var.set_from_values(vec![5.0f64, 6.0, 7.0, 8.0], None).unwrap();
//! assert!(var.set_from_values(vec!["a", "b"], None).is_err());
//! assert_eq!(var.scalar_type(), ScalarType::Double);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod attribute;
pub mod cdf;
pub mod classify;
pub mod config;
pub mod container;
pub mod inference;
pub mod shape;
pub mod value;
pub mod variable;

pub use attribute::{Attribute, AttributeEntry, VariableAttribute};
pub use cdf::{Cdf, VariableOptions};
pub use classify::{classify, InputKind, Leaf, Shaped, TimeLeaf};
pub use config::{CoercionConfig, CONFIG_FILE_NAME};
pub use container::{commit_buffer, commit_values, Container};
pub use inference::{narrowest_integer, InferenceOptions, TypeInference};
pub use shape::{is_open, reconcile};
pub use value::{ArrayData, NdArray, TaggedScalar, Value};
pub use variable::Variable;
