//! Core types for cdfkit
//!
//! This crate defines the typed side of the coercion layer:
//! - ScalarType: the CDF scalar types, codes and widths
//! - Lattice: which types may overwrite a typed container
//! - CompressionType: opaque compression setting
//! - TypedBuffer: validated, contiguous, typed, shaped buffers
//! - Temporal: TT2000, EPOCH and EPOCH16 encodings and the leap-second table
//! - Limits: size limits on client input
//! - Error: Error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

// Module declarations
pub mod buffer;
pub mod contract;
pub mod error;
pub mod limits;
pub mod temporal;

// Re-export commonly used types
pub use buffer::{default_fill_value, flat_size, BufferData, Element, TypedBuffer};
pub use contract::{compatible_types, is_compatible, CompressionType, NativeRepr, ScalarType};
pub use error::{Error, Result};
pub use limits::{LimitError, Limits};
pub use temporal::{
    decode_buffer, encode_instants, transcode, Epoch, Epoch16, TimeEncoding, TimeScalar, Tt2000,
};
