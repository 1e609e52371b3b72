//! cdfkit - typed-value coercion for CDF variables and attributes
//!
//! Turns loosely typed client values (numbers, strings, instants, nested
//! lists, pre-typed arrays) into the fixed-type, fixed-shape buffers a CDF
//! container stores, and guards every write with the container's type and
//! shape.
//!
//! # Quick Start
//!
//! ```
//! use cdfkit::{Cdf, ScalarType, VariableOptions};
//!
//! let mut cdf = Cdf::new();
//! let var = cdf
//!     .add_variable("counts", VariableOptions::new().values(vec![1i64, 2, 3]))
//!     .unwrap();
//! assert_eq!(var.scalar_type(), ScalarType::Uint1);
//! ```
//!
//! # Architecture
//!
//! - `cdfkit-core`: scalar types, the compatibility lattice, typed buffers
//!   and the time codecs
//! - `cdfkit-primitives`: the input model, type inference, shape
//!   reconciliation, the mutation contract and the containers
//!
//! Both are re-exported here.

pub use cdfkit_core::*;
pub use cdfkit_primitives::*;
