//! Logger level kinds
//!
//! [`LogLevel`] and [`SyslogPriority`] are leaf kinds coerced through the
//! built-in entries of [`Registry::new`](crate::Registry::new).

use crate::error::CoerceError;
use crate::kind::{Kind, Value};
use crate::slot::Leaf;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Verbosity of an application logger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Fatal,
    Panic,
}

impl LogLevel {
    /// Name under which the level coercion is registered.
    pub const KIND: &'static str = "LogLevel";

    const ALL: [Self; 7] = [
        Self::Trace,
        Self::Debug,
        Self::Info,
        Self::Warn,
        Self::Error,
        Self::Fatal,
        Self::Panic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Fatal => "fatal",
            Self::Panic => "panic",
        }
    }

    /// Position in the `trace..=panic` ordering.
    pub fn code(self) -> i64 {
        self as i64
    }

    pub fn from_code(code: i64) -> Option<Self> {
        usize::try_from(code).ok().and_then(|i| Self::ALL.get(i).copied())
    }

    pub(crate) fn coerce(raw: &str) -> Result<Value, CoerceError> {
        raw.parse::<Self>()
            .map(|level| Value::Int(level.code()))
            .map_err(|_| CoerceError::invalid(raw, Self::KIND))
    }
}

impl FromStr for LogLevel {
    type Err = IncorrectLevel;

    fn from_str(s: &str) -> Result<Self, IncorrectLevel> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            "fatal" => Ok(Self::Fatal),
            "panic" => Ok(Self::Panic),
            _ => Err(IncorrectLevel(s.to_string())),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Leaf for LogLevel {
    fn kind(&self) -> Kind {
        Kind::Custom(Self::KIND)
    }

    fn assign(&mut self, value: Value) -> Result<(), Value> {
        match value {
            Value::Int(code) => match Self::from_code(code) {
                Some(level) => {
                    *self = level;
                    Ok(())
                }
                None => Err(Value::Int(code)),
            },
            other => Err(other),
        }
    }

    fn value(&self) -> Value {
        Value::Int(self.code())
    }
}

crate::leaf_slot!(LogLevel);

/// Error for an unknown log level name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("log level {0} is incorrect")]
pub struct IncorrectLevel(pub String);

/// Syslog severity (RFC 5424 numeric codes).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyslogPriority {
    Emerg = 0,
    Alert = 1,
    Crit = 2,
    Error = 3,
    Warning = 4,
    Notice = 5,
    #[default]
    Info = 6,
    Debug = 7,
}

impl SyslogPriority {
    /// Name under which the priority coercion is registered.
    pub const KIND: &'static str = "SyslogPriority";

    /// Map a logger level name onto a syslog severity.
    ///
    /// `panic` maps to emerg, `fatal` to crit and `trace` to notice; the other
    /// names map to the severity of the same meaning.
    pub fn parse(level: &str) -> Result<Self, IncorrectPriority> {
        match level.to_ascii_lowercase().as_str() {
            "panic" => Ok(Self::Emerg),
            "fatal" => Ok(Self::Crit),
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warning),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Notice),
            _ => Err(IncorrectPriority(level.to_string())),
        }
    }

    /// Short human readable name.
    pub fn description(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Error => "error",
            Self::Crit => "crit",
            Self::Info => "info",
            Self::Emerg => "emerg",
            Self::Warning => "warning",
            Self::Alert | Self::Notice => "unknown syslog level",
        }
    }

    pub fn code(self) -> i64 {
        self as i64
    }

    pub fn from_code(code: i64) -> Option<Self> {
        Some(match code {
            0 => Self::Emerg,
            1 => Self::Alert,
            2 => Self::Crit,
            3 => Self::Error,
            4 => Self::Warning,
            5 => Self::Notice,
            6 => Self::Info,
            7 => Self::Debug,
            _ => return None,
        })
    }

    pub(crate) fn coerce(raw: &str) -> Result<Value, CoerceError> {
        Self::parse(raw)
            .map(|priority| Value::Int(priority.code()))
            .map_err(|_| CoerceError::invalid(raw, Self::KIND))
    }
}

impl FromStr for SyslogPriority {
    type Err = IncorrectPriority;

    fn from_str(s: &str) -> Result<Self, IncorrectPriority> {
        Self::parse(s)
    }
}

impl Leaf for SyslogPriority {
    fn kind(&self) -> Kind {
        Kind::Custom(Self::KIND)
    }

    fn assign(&mut self, value: Value) -> Result<(), Value> {
        match value {
            Value::Int(code) => match Self::from_code(code) {
                Some(priority) => {
                    *self = priority;
                    Ok(())
                }
                None => Err(Value::Int(code)),
            },
            other => Err(other),
        }
    }

    fn value(&self) -> Value {
        Value::Int(self.code())
    }
}

crate::leaf_slot!(SyslogPriority);

/// Error for a level name with no syslog severity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("syslog priority {0} is incorrect")]
pub struct IncorrectPriority(pub String);
