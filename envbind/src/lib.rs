//! Bind environment variables into nested structs
//!
//! `envbind` populates a typed configuration struct from the process
//! environment. Each field declares the variable it binds to, an optional
//! default, and validation rules. Nested structs and pointers to structs are
//! walked recursively, so a whole configuration tree is filled in one call.
//!
//! # Features
//!
//! - **Declarative**: field descriptor tables generated by `#[derive(Settings)]`
//! - **Nested**: records, `Box`, `Option<Box>`, `Arc` and `Rc` are recursed into
//! - **Typed coercion**: integers with range checks, floats, booleans,
//!   durations, byte and string sequences
//! - **Validation**: rule strings such as `required,min=10`, checked per field
//!   and again over the whole struct (cross-field rules included)
//! - **Custom kinds**: named coercions in a [`Registry`], with [`LogLevel`]
//!   and [`SyslogPriority`] built in
//!
//! # Value Parsing
//!
//! - Strings: taken verbatim, `DATABASE_URL=postgres://localhost/db`
//! - Integers: decimal, range checked against the field width, `PORT=80`
//! - Booleans: `true` in any letter case, anything else is `false`
//! - Floats: `RATIO=0.5`
//! - Durations: `humantime` syntax, `TIMEOUT=1m30s` or `TIMEOUT=2h 15min`;
//!   units `ns`, `us`, `ms`, `s`, `m`/`min`, `h`, `d` and their long forms.
//!   Fractions and negative spans are rejected.
//! - `Vec<String>`: comma separated, `HOSTS=a,b,c`
//! - `Vec<u8>`: the raw bytes of the value
//!
//! # Example
//!
//! ```rust
//! use envbind::Settings;
//! use std::time::Duration;
//!
//! #[derive(Debug, Default, Settings)]
//! struct Config {
//!     #[env(name = "APP_PORT", default = "8080", validate = "min=1")]
//!     pub port: u16,
//!
//!     #[env(name = "APP_TIMEOUT", default = "30s")]
//!     pub timeout: Duration,
//!
//!     pub database: Database,
//! }
//!
//! #[derive(Debug, Default, Settings)]
//! struct Database {
//!     #[env(name = "APP_DB_URL", validate = "required")]
//!     pub url: String,
//! }
//!
//! # fn main() -> anyhow::Result<()> {
//! #     std::env::set_var("APP_DB_URL", "postgres://localhost/app");
//! #     let config = Config::from_env()?;
//! #     assert_eq!(config.port, 8080);
//! #     assert_eq!(config.timeout, Duration::from_secs(30));
//! #     assert_eq!(config.database.url, "postgres://localhost/app");
//! #     Ok(())
//! # }
//! ```
//!
//! # Attributes
//!
//! ## `#[env(name = "VAR")]`
//!
//! Bind the field to the environment variable `VAR`. Leaf fields without a
//! name keep their current value. `name = "-"`, `name = "omit"` and the bare
//! `omit` flag exclude the field entirely.
//!
//! ## `#[env(default = "value")]`
//!
//! Used when the variable is not set. The default is coerced and validated
//! exactly like a value read from the environment. An empty variable counts
//! as set.
//!
//! ## `#[env(validate = "rules")]`
//!
//! Comma separated rules, `|` between alternatives:
//!
//! ```rust
//! # use envbind::Settings;
//! #[derive(Default, Settings)]
//! struct Cache {
//!     #[env(name = "CACHE_SIZE", default = "64", validate = "min=10,max=200")]
//!     pub size: u8,
//!
//!     #[env(name = "CACHE_MODE", default = "lru", validate = "oneof=lru lfu")]
//!     pub mode: String,
//!
//!     #[env(name = "CACHE_ADDR", validate = "required_if=mode lfu")]
//!     pub addr: String,
//! }
//! ```
//!
//! ## `#[env(self_validate)]`
//!
//! On the struct: run its [`SelfValidate`] implementation after every rule
//! passed.
//!
//! # Errors
//!
//! Binding stops at the first failure and returns a [`BindError`]; fields
//! already bound keep their new values. [`BindError::kind`] gives the error
//! class for matching.

extern crate self as envbind;

mod coerce;
mod engine;
mod error;
mod kind;
mod levels;
mod ready;
mod registry;
mod slot;
mod source;
mod tags;
mod validate;

pub use coerce::coerce;
pub use engine::{Binder, DEFAULT_MAX_DEPTH};
pub use error::{BindError, BoxError, CoerceError, ErrorKind};
pub use kind::{Kind, Value};
pub use levels::{IncorrectLevel, IncorrectPriority, LogLevel, SyslogPriority};
pub use ready::LoggerOptions;
pub use registry::{CoerceFn, Registry};
pub use slot::{Field, Leaf, Pointer, Settings, Slot, SlotMut};
pub use source::{Env, Lookup, Source};
pub use tags::Tags;
pub use validate::SelfValidate;

pub use envbind_derive::Settings;

// Re-export for macro-generated code
#[doc(hidden)]
pub use anyhow;

/// Bind the process environment into `target` with the built-in registry.
///
/// See [`Binder::bind`].
pub fn bind<T: Slot + ?Sized>(target: &mut T) -> Result<(), BindError> {
    Binder::new().bind(target)
}

/// Bind the process environment into a fresh `T::default()`.
pub fn load<T: Slot + Default>() -> Result<T, BindError> {
    Binder::new().load()
}
