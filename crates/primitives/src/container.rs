//! Mutation contract
//!
//! Every write into a container goes through [`commit_values`] (or
//! [`commit_buffer`] for an already typed buffer):
//!
//! 1. infer a buffer, using the container's type as the hint
//! 2. check the buffer's type against the container's fixed type
//! 3. reconcile the buffer's shape with the container's shape
//! 4. replace the container's buffer
//!
//! Nothing is written until every check has passed, so a failed commit
//! leaves the container exactly as it was. A container is untyped until its
//! first commit and keeps that type afterwards.

use crate::inference::TypeInference;
use crate::shape::reconcile;
use crate::value::Value;
use cdfkit_core::{is_compatible, Error, Result, ScalarType, TypedBuffer};
use tracing::debug;

/// A typed, shaped slot that accepts committed buffers
pub trait Container {
    /// Name used in diagnostics
    fn label(&self) -> &str;

    /// Fixed type, `ScalarType::None` while untyped
    fn declared_type(&self) -> ScalarType;

    /// Shape of the committed buffer, `[]` while untyped
    fn declared_shape(&self) -> &[usize];

    /// Whether the first axis counts records
    fn is_record_varying(&self) -> bool;

    /// Replace the committed buffer
    ///
    /// Only called by the contract once the buffer has been validated.
    fn replace(&mut self, buffer: TypedBuffer);
}

/// Infer a buffer from `value` and commit it into `container`
///
/// Returns the type the container holds afterwards.
pub fn commit_values<C: Container + ?Sized>(
    container: &mut C,
    engine: &TypeInference,
    value: Value,
    declared: Option<ScalarType>,
) -> Result<ScalarType> {
    let buffer = engine.infer(value, declared, container.declared_type())?;
    commit_buffer(container, buffer)
}

/// Commit an already typed buffer into `container`
pub fn commit_buffer<C: Container + ?Sized>(
    container: &mut C,
    buffer: TypedBuffer,
) -> Result<ScalarType> {
    let existing = container.declared_type();
    let candidate = buffer.scalar_type();
    if !is_compatible(existing, candidate) {
        return Err(Error::TypeIncompatibility {
            existing,
            candidate,
        });
    }

    let shape = reconcile(
        container.declared_shape(),
        buffer.shape(),
        container.is_record_varying(),
    )?;
    let mut buffer = buffer.reshape(shape)?;
    if !existing.is_none() && existing != candidate {
        buffer = buffer.retag(existing)?;
    }

    let scalar_type = buffer.scalar_type();
    debug!(
        target: "cdfkit::commit",
        container = container.label(),
        scalar_type = %scalar_type,
        shape = ?buffer.shape(),
        "Committed values"
    );
    container.replace(buffer);
    Ok(scalar_type)
}
