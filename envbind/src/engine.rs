//! The structure walker
//!
//! [`Binder`] resolves the target to a record, then walks its descriptor
//! table field by field in declaration order. Records and pointers are
//! recursed into, leaves go through lookup, default substitution, coercion
//! and per-field validation. The first failure aborts the whole bind.

use crate::coerce::coerce;
use crate::error::BindError;
use crate::registry::Registry;
use crate::slot::{Field, Leaf, Settings, Slot, SlotMut};
use crate::source::{Env, Lookup, Source};
use crate::tags::Tags;
use crate::validate;

/// Default limit on record nesting.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Configurable entry point of the binding engine.
///
/// ```rust
/// use envbind::{Binder, Settings};
/// use std::collections::HashMap;
///
/// #[derive(Debug, Default, Settings)]
/// struct Config {
///     #[env(name = "PORT", default = "8080")]
///     port: u16,
/// }
///
/// let vars = HashMap::from([("PORT".to_string(), "80".to_string())]);
/// let config: Config = Binder::new().with_source(vars).load().unwrap();
/// assert_eq!(config.port, 80);
/// ```
#[derive(Debug, Clone)]
pub struct Binder<S = Env> {
    source: S,
    registry: Registry,
    max_depth: usize,
}

impl Binder<Env> {
    /// Binder reading the process environment with the built-in registry.
    pub fn new() -> Self {
        Self {
            source: Env,
            registry: Registry::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Default for Binder<Env> {
    fn default() -> Self {
        Self::new()
    }
}

enum Unresolved {
    NotARecord,
    Shared,
}

/// Follow pointers, allocating empty ones, until a record is reached.
fn resolve(mut slot: SlotMut<'_>) -> Result<&mut dyn Settings, Unresolved> {
    loop {
        slot = match slot {
            SlotMut::Record(record) => return Ok(record),
            SlotMut::Leaf(_) => return Err(Unresolved::NotARecord),
            SlotMut::Pointer(pointer) => pointer.deref_or_init().ok_or(Unresolved::Shared)?,
        };
    }
}

impl<S: Source> Binder<S> {
    /// Replace the value source.
    pub fn with_source<T: Source>(self, source: T) -> Binder<T> {
        Binder {
            source,
            registry: self.registry,
            max_depth: self.max_depth,
        }
    }

    /// Replace the registry of custom kinds.
    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Limit record nesting. Deeper structures fail with
    /// [`BindError::DepthExceeded`].
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Bind into `target` in place.
    ///
    /// `target` may be a record or any pointer to one; empty pointers are
    /// allocated with their default value. Once every field is bound, the
    /// rules of the whole structure are checked, then the struct's
    /// [`SelfValidate`](crate::SelfValidate) hook runs.
    ///
    /// # Errors
    ///
    /// Returns the first failure in declaration order, nested fields first.
    pub fn bind<T: Slot + ?Sized>(&self, target: &mut T) -> Result<(), BindError> {
        let record = match resolve(target.slot()) {
            Ok(record) => record,
            Err(Unresolved::NotARecord) => return Err(BindError::NotAStruct),
            Err(Unresolved::Shared) => return Err(BindError::NotAddressable),
        };

        let type_name = record.type_name();
        tracing::debug!(record = type_name, "binding environment");

        Cursor {
            binder: self,
            depth: 0,
        }
        .walk(&mut *record)?;

        validate::check_record(&mut *record)?;
        if let Some(hook) = record.as_self_validate() {
            hook.validate().map_err(BindError::SelfValidation)?;
        }

        tracing::debug!(record = type_name, "environment bound");
        Ok(())
    }

    /// Bind into a fresh default value of `T`.
    pub fn load<T: Slot + Default>(&self) -> Result<T, BindError> {
        let mut target = T::default();
        self.bind(&mut target)?;
        Ok(target)
    }
}

/// Traversal state of one record level.
struct Cursor<'b, S> {
    binder: &'b Binder<S>,
    depth: usize,
}

impl<S: Source> Cursor<'_, S> {
    fn walk(&self, record: &mut dyn Settings) -> Result<(), BindError> {
        let type_name = record.type_name();
        let fields = record.fields();
        if fields.is_empty() {
            return Err(BindError::EmptyStruct {
                type_name: type_name.to_string(),
            });
        }

        for field in fields {
            self.visit(field)?;
        }
        Ok(())
    }

    fn visit(&self, field: Field<'_>) -> Result<(), BindError> {
        if field.is_omitted() {
            tracing::trace!(field = field.name, "omitted");
            return Ok(());
        }

        let Field {
            name,
            type_name,
            tags,
            slot,
        } = field;
        match slot {
            Some(SlotMut::Leaf(leaf)) => self.bind_leaf(name, type_name, &tags, leaf),
            Some(structural) => {
                if let Some(key) = tags.key() {
                    tracing::debug!(field = name, key, "binding key ignored on nested field");
                }
                match resolve(structural) {
                    Ok(nested) => self.descend(name, nested),
                    Err(Unresolved::NotARecord) => Err(BindError::NotAStruct),
                    Err(Unresolved::Shared) => Err(BindError::NotAddressableField {
                        field: name.to_string(),
                    }),
                }
            }
            None => Ok(()),
        }
    }

    fn descend(&self, name: &str, nested: &mut dyn Settings) -> Result<(), BindError> {
        if self.depth >= self.binder.max_depth {
            return Err(BindError::DepthExceeded {
                field: name.to_string(),
                limit: self.binder.max_depth,
            });
        }
        tracing::trace!(field = name, depth = self.depth + 1, "entering nested record");
        Cursor {
            binder: self.binder,
            depth: self.depth + 1,
        }
        .walk(nested)
    }

    fn bind_leaf(
        &self,
        name: &str,
        type_name: &str,
        tags: &Tags,
        leaf: &mut dyn Leaf,
    ) -> Result<(), BindError> {
        let Some(key) = tags.key() else {
            tracing::trace!(field = name, "no binding key");
            return Ok(());
        };

        let raw = match self.binder.source.lookup(key) {
            Lookup::Found(raw) => raw,
            Lookup::NotUnicode => return Err(BindError::incorrect_value(key)),
            Lookup::Missing => match tags.default_value() {
                Some(default) => {
                    tracing::debug!(field = name, key, "using default value");
                    default.to_string()
                }
                None if tags.is_required() => {
                    return Err(BindError::validation(name, type_name, "required"));
                }
                None => {
                    tracing::trace!(field = name, key, "not set, keeping zero value");
                    return Ok(());
                }
            },
        };

        let value = coerce(&raw, leaf.kind(), &self.binder.registry)
            .map_err(|e| e.into_bind_error(key))?;
        validate::check_field(name, type_name, tags, &value)?;
        leaf.assign(value)
            .map_err(|_| BindError::unsupported(key))?;

        tracing::debug!(field = name, key, "bound");
        Ok(())
    }
}
