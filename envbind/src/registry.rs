//! Named coercions for custom field kinds

use crate::error::CoerceError;
use crate::kind::Value;
use crate::levels::{LogLevel, SyslogPriority};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A coercion from a raw string to a [`Value`].
pub type CoerceFn = Arc<dyn Fn(&str) -> Result<Value, CoerceError> + Send + Sync>;

/// Registry of coercions for [`Kind::Custom`](crate::Kind::Custom) leaves.
///
/// A leaf that declares a custom kind is coerced by the function registered
/// under the same name. Kinds without a registered function are reported as
/// unsupported.
///
/// ```rust
/// use envbind::{CoerceError, Registry, Value};
///
/// let mut registry = Registry::new();
/// registry.register("Percent", |raw: &str| {
///     let number = raw.trim_end_matches('%');
///     number
///         .parse::<u64>()
///         .ok()
///         .filter(|n| *n <= 100)
///         .map(Value::Uint)
///         .ok_or_else(|| CoerceError::Invalid { raw: raw.into(), kind: "Percent".into() })
/// });
/// assert!(registry.contains("Percent"));
/// ```
#[derive(Clone)]
pub struct Registry {
    coercions: HashMap<&'static str, CoerceFn>,
}

impl Registry {
    /// Registry with the built-in [`LogLevel`] and [`SyslogPriority`] kinds.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(LogLevel::KIND, LogLevel::coerce);
        registry.register(SyslogPriority::KIND, SyslogPriority::coerce);
        registry
    }

    /// Registry without any coercion.
    pub fn empty() -> Self {
        Self {
            coercions: HashMap::new(),
        }
    }

    /// Register (or replace) the coercion for a custom kind.
    pub fn register<F>(&mut self, kind: &'static str, coerce: F) -> &mut Self
    where
        F: Fn(&str) -> Result<Value, CoerceError> + Send + Sync + 'static,
    {
        self.coercions.insert(kind, Arc::new(coerce));
        self
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.coercions.contains_key(kind)
    }

    pub(crate) fn get(&self, kind: &str) -> Option<&CoerceFn> {
        self.coercions.get(kind)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self.coercions.keys().collect();
        kinds.sort();
        f.debug_struct("Registry").field("kinds", &kinds).finish()
    }
}
