//! Legacy amino binary encoders
//!
//! Small self-contained encoders for the handful of scalar shapes the
//! legacy amino wire format uses: varint numbers, length-prefixed
//! strings and google.protobuf.Timestamp values.

use crate::encoder::varint::write_uvarint;
use crate::errors::{UndError, UndResult};
use chrono::DateTime;

// Timestamp field headers: field 1 (seconds) fixed64, field 2 (nanos) fixed32
const TIME_SECONDS_TAG: u8 = 0x09;
const TIME_NANOS_TAG: u8 = 0x15;

/// Encode a non-negative integer as an unsigned varint
pub fn encode_number(value: i64) -> UndResult<Vec<u8>> {
    if value < 0 {
        return Err(UndError::EncodeError {
            message: format!("cannot encode negative number: {value}"),
        });
    }
    let mut out = Vec::with_capacity(10);
    write_uvarint(value as u64, &mut out);
    Ok(out)
}

/// Encode a boolean as a single byte (0x01 / 0x00)
pub fn encode_bool(value: bool) -> Vec<u8> {
    vec![u8::from(value)]
}

/// Encode a UTF-8 string as varint length prefix followed by the bytes
pub fn encode_string(value: &str) -> Vec<u8> {
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len() + 2);
    write_uvarint(bytes.len() as u64, &mut out);
    out.extend_from_slice(bytes);
    out
}

/// Encode an RFC 3339 timestamp as an amino Timestamp
///
/// Layout: `09` + little-endian fixed64 epoch seconds, then `15` +
/// little-endian fixed32 nanoseconds.
pub fn encode_time(timestamp: &str) -> UndResult<Vec<u8>> {
    let parsed = DateTime::parse_from_rfc3339(timestamp).map_err(|err| UndError::EncodeError {
        message: format!("invalid timestamp {timestamp}: {err}"),
    })?;

    let seconds = parsed.timestamp();
    if seconds < 0 {
        return Err(UndError::EncodeError {
            message: format!("timestamp before unix epoch: {timestamp}"),
        });
    }
    let nanos = parsed.timestamp_subsec_nanos();

    let mut out = Vec::with_capacity(14);
    out.push(TIME_SECONDS_TAG);
    out.extend_from_slice(&(seconds as u64).to_le_bytes());
    out.push(TIME_NANOS_TAG);
    out.extend_from_slice(&nanos.to_le_bytes());
    Ok(out)
}
