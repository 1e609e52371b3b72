//! Bulk conversion between instants and temporal buffers

use super::scalars::{Epoch, Epoch16, TimeEncoding, TimeScalar, Tt2000};
use crate::buffer::{BufferData, TypedBuffer};
use crate::error::{Error, Result};
use chrono::NaiveDateTime;

/// Encode instants into the element storage of an encoding
pub fn encode_instants(instants: &[NaiveDateTime], encoding: TimeEncoding) -> BufferData {
    match encoding {
        TimeEncoding::Tt2000 => BufferData::Tt2000(Tt2000::encode_slice(instants)),
        TimeEncoding::Epoch => BufferData::Epoch(Epoch::encode_slice(instants)),
        TimeEncoding::Epoch16 => BufferData::Epoch16(Epoch16::encode_slice(instants)),
    }
}

/// Number of instants an encoding cannot represent without clamping
pub fn count_out_of_range(instants: &[NaiveDateTime], encoding: TimeEncoding) -> usize {
    let in_range: fn(&NaiveDateTime) -> bool = match encoding {
        TimeEncoding::Tt2000 => Tt2000::in_range,
        TimeEncoding::Epoch => Epoch::in_range,
        TimeEncoding::Epoch16 => Epoch16::in_range,
    };
    instants.iter().filter(|i| !in_range(i)).count()
}

/// Decode a temporal buffer into instants, in row-major order
///
/// Fails with `InvalidArgument` if the buffer is not tagged with a time
/// encoding or its elements do not match the tag.
pub fn decode_buffer(buffer: &TypedBuffer) -> Result<Vec<NaiveDateTime>> {
    let encoding = TimeEncoding::from_scalar_type(buffer.scalar_type()).ok_or_else(|| {
        Error::invalid_argument(format!(
            "cannot decode {} values as time",
            buffer.scalar_type()
        ))
    })?;
    match (encoding, buffer.data()) {
        (TimeEncoding::Tt2000, BufferData::Tt2000(v)) => Ok(Tt2000::decode_slice(v)),
        (TimeEncoding::Epoch, BufferData::Epoch(v)) => Ok(Epoch::decode_slice(v)),
        (TimeEncoding::Epoch16, BufferData::Epoch16(v)) => Ok(Epoch16::decode_slice(v)),
        (encoding, data) => Err(Error::invalid_argument(format!(
            "{} buffer holds {:?} elements",
            encoding,
            data.repr()
        ))),
    }
}

/// Re-encode a temporal buffer in another encoding, keeping its shape
///
/// Transcoding to the same encoding returns the buffer unchanged.
pub fn transcode(buffer: TypedBuffer, target: TimeEncoding) -> Result<TypedBuffer> {
    if buffer.scalar_type() == target.scalar_type() {
        return Ok(buffer);
    }
    let instants = decode_buffer(&buffer)?;
    TypedBuffer::new(
        target.scalar_type(),
        buffer.shape().to_vec(),
        encode_instants(&instants, target),
    )
}
