//! Declared field kinds and coerced values

use std::fmt;
use std::time::Duration;

/// Declared kind of a leaf field.
///
/// The kind selects the coercion applied to the raw environment string. Sized
/// integer kinds carry their own bounds so range checks follow the declared
/// width rather than the platform word size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    String,
    Bool,
    Float64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Usize,
    Int8,
    Int16,
    Int32,
    Int64,
    Isize,
    /// Elapsed time, written as a duration literal such as `20s` or `1h30m`.
    Duration,
    /// Raw bytes of the value.
    Bytes,
    /// Comma separated list of strings.
    Strings,
    /// Kind coerced through a function registered under this name.
    Custom(&'static str),
    /// Kind without any coercion.
    Other(&'static str),
}

impl Kind {
    /// Largest value accepted by an unsigned integer kind.
    pub const fn unsigned_max(self) -> Option<u64> {
        match self {
            Self::Uint8 => Some(u8::MAX as u64),
            Self::Uint16 => Some(u16::MAX as u64),
            Self::Uint32 => Some(u32::MAX as u64),
            Self::Uint64 => Some(u64::MAX),
            Self::Usize => Some(usize::MAX as u64),
            _ => None,
        }
    }

    /// Inclusive `[min, max]` range accepted by a signed integer kind.
    pub const fn signed_range(self) -> Option<(i64, i64)> {
        match self {
            Self::Int8 => Some((i8::MIN as i64, i8::MAX as i64)),
            Self::Int16 => Some((i16::MIN as i64, i16::MAX as i64)),
            Self::Int32 => Some((i32::MIN as i64, i32::MAX as i64)),
            Self::Int64 => Some((i64::MIN, i64::MAX)),
            Self::Isize => Some((isize::MIN as i64, isize::MAX as i64)),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Bool => "bool",
            Self::Float64 => "f64",
            Self::Uint8 => "u8",
            Self::Uint16 => "u16",
            Self::Uint32 => "u32",
            Self::Uint64 => "u64",
            Self::Usize => "usize",
            Self::Int8 => "i8",
            Self::Int16 => "i16",
            Self::Int32 => "i32",
            Self::Int64 => "i64",
            Self::Isize => "isize",
            Self::Duration => "duration",
            Self::Bytes => "bytes",
            Self::Strings => "strings",
            Self::Custom(name) | Self::Other(name) => name,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value produced by coercion, ready to be assigned to a leaf field.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Bool(bool),
    Float(f64),
    Uint(u64),
    Int(i64),
    Duration(Duration),
    Bytes(Vec<u8>),
    Strings(Vec<String>),
}

impl Value {
    /// Whether this is the zero value of its kind.
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Str(s) => s.is_empty(),
            Self::Bool(b) => !b,
            Self::Float(f) => *f == 0.0,
            Self::Uint(u) => *u == 0,
            Self::Int(i) => *i == 0,
            Self::Duration(d) => d.is_zero(),
            Self::Bytes(b) => b.is_empty(),
            Self::Strings(s) => s.is_empty(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Float(v) => write!(f, "{}", v),
            Self::Uint(v) => write!(f, "{}", v),
            Self::Int(v) => write!(f, "{}", v),
            Self::Duration(d) => write!(f, "{}", d.as_nanos()),
            Self::Bytes(b) => f.write_str(&String::from_utf8_lossy(b)),
            Self::Strings(s) => f.write_str(&s.join(",")),
        }
    }
}
