//! Type coercion table
//!
//! Maps a raw environment string and a declared [`Kind`] to a typed [`Value`].

use crate::error::CoerceError;
use crate::kind::{Kind, Value};
use crate::registry::Registry;
use std::time::Duration;

/// Coerce `raw` into a value of the given kind.
///
/// # Errors
///
/// - [`CoerceError::Invalid`] when the string is malformed for the kind
/// - [`CoerceError::OutOfRange`] when a number does not fit the declared width
/// - [`CoerceError::Unsupported`] when the kind has no coercion
pub fn coerce(raw: &str, kind: Kind, registry: &Registry) -> Result<Value, CoerceError> {
    match kind {
        Kind::String => Ok(Value::Str(raw.to_string())),
        // Anything other than "true" is false, never an error.
        Kind::Bool => Ok(Value::Bool(raw.eq_ignore_ascii_case("true"))),
        Kind::Float64 => raw
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| CoerceError::invalid(raw, kind)),
        Kind::Uint8 | Kind::Uint16 | Kind::Uint32 | Kind::Uint64 | Kind::Usize => {
            coerce_unsigned(raw, kind)
        }
        Kind::Int8 | Kind::Int16 | Kind::Int32 | Kind::Int64 | Kind::Isize => {
            coerce_signed(raw, kind)
        }
        Kind::Duration => coerce_duration(raw),
        Kind::Bytes => Ok(Value::Bytes(raw.as_bytes().to_vec())),
        Kind::Strings => Ok(Value::Strings(raw.split(',').map(String::from).collect())),
        Kind::Custom(name) => match registry.get(name) {
            Some(coerce) => coerce(raw),
            None => Err(CoerceError::unsupported(kind)),
        },
        Kind::Other(_) => Err(CoerceError::unsupported(kind)),
    }
}

fn coerce_unsigned(raw: &str, kind: Kind) -> Result<Value, CoerceError> {
    let max = kind
        .unsigned_max()
        .ok_or_else(|| CoerceError::unsupported(kind))?;
    // Digits only: no sign, no whitespace.
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CoerceError::invalid(raw, kind));
    }
    let value = raw
        .parse::<u64>()
        .map_err(|_| CoerceError::invalid(raw, kind))?;
    if value > max {
        return Err(CoerceError::out_of_range(raw, kind));
    }
    Ok(Value::Uint(value))
}

fn coerce_signed(raw: &str, kind: Kind) -> Result<Value, CoerceError> {
    let (min, max) = kind
        .signed_range()
        .ok_or_else(|| CoerceError::unsupported(kind))?;
    let value = raw
        .parse::<i64>()
        .map_err(|_| CoerceError::invalid(raw, kind))?;
    if value < min || value > max {
        return Err(CoerceError::out_of_range(raw, kind));
    }
    Ok(Value::Int(value))
}

fn coerce_duration(raw: &str) -> Result<Value, CoerceError> {
    parse_duration(raw)
        .map(Value::Duration)
        .map_err(|_| CoerceError::invalid(raw, Kind::Duration))
}

/// Parse a duration literal such as `20s`, `1h30m` or `2h 15min`.
///
/// Follows `humantime` syntax; the bare literal `0` is also accepted.
/// Negative spans are rejected.
pub(crate) fn parse_duration(raw: &str) -> Result<Duration, humantime::DurationError> {
    if raw == "0" {
        return Ok(Duration::ZERO);
    }
    humantime::parse_duration(raw)
}
