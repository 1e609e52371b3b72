//! Type contract shared by every container
//!
//! This module contains the types that decide what a container may hold:
//!
//! - `scalar_type`: the CDF scalar types, their codes, widths and host
//!   representations
//! - `lattice`: which types may overwrite a container of a given type
//! - `compression`: the opaque compression setting carried by variables
//!
//! ## Usage
//!
//! ```
//! use cdfkit_core::contract::{is_compatible, ScalarType};
//!
//! assert!(is_compatible(ScalarType::Int1, ScalarType::Byte));
//! assert!(!is_compatible(ScalarType::Uint1, ScalarType::Int1));
//! ```

pub mod compression;
pub mod lattice;
pub mod scalar_type;

// Re-exports
pub use compression::CompressionType;
pub use lattice::{compatible_types, is_compatible};
pub use scalar_type::{NativeRepr, ScalarType};
