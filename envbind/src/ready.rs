//! Ready-made option structs

use crate::levels::{LogLevel, SyslogPriority};
use crate::Settings;
use serde::Serialize;

/// Logger settings shared by services that log to stdout and syslog.
///
/// | Field | Variable | Default |
/// |---|---|---|
/// | `log_level` | `LOG_LEVEL` | `debug` |
/// | `syslog` | `SYSLOG` | `127.0.0.1:514` |
/// | `syslog_protocol` | `SYSLOG_PROTOCOL` | `udp` |
/// | `syslog_level` | `SYSLOG_LEVEL` | `debug` |
/// | `colour` | `COLOUR` | `false` |
/// | `stdout` | `STDOUT` | `false` |
///
/// Embed it in a service config to bind it along with everything else:
///
/// ```rust
/// use envbind::{LoggerOptions, Settings};
///
/// #[derive(Debug, Default, Settings)]
/// struct Config {
///     #[env(name = "SERVICE_NAME", default = "api")]
///     name: String,
///     logger: LoggerOptions,
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Settings)]
pub struct LoggerOptions {
    #[env(name = "LOG_LEVEL", default = "debug")]
    pub log_level: LogLevel,

    /// Syslog endpoint as `host:port`.
    #[env(name = "SYSLOG", default = "127.0.0.1:514", validate = "tcp_addr")]
    pub syslog: String,

    /// `udp` or `tcp`.
    #[env(name = "SYSLOG_PROTOCOL", default = "udp", validate = "min=3,max=3")]
    pub syslog_protocol: String,

    #[env(name = "SYSLOG_LEVEL", default = "debug")]
    pub syslog_level: SyslogPriority,

    #[env(name = "COLOUR", default = "false")]
    pub colour: bool,

    #[env(name = "STDOUT", default = "false")]
    pub stdout: bool,
}
