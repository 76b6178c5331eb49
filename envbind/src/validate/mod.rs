//! Validation of bound values
//!
//! Two passes use the same rule strings:
//!
//! - the per-field pass runs right after a value is coerced, before it is
//!   stored, and skips cross-field rules since siblings may not be bound yet;
//! - the record pass runs once the top-level struct is fully populated and
//!   evaluates every rule of every field, cross-field rules included.
//!
//! Finally the struct's own [`SelfValidate`] hook runs, if it has one.

mod rules;

use crate::error::{BindError, BoxError};
use crate::kind::Value;
use crate::slot::{Settings, SlotMut};
use crate::tags::Tags;

/// Validation a struct performs on itself after all rules passed.
///
/// Opt in with `#[env(self_validate)]` on a derived struct. The returned error
/// reaches the caller unchanged as [`BindError::SelfValidation`].
///
/// ```rust
/// use envbind::{BoxError, SelfValidate, Settings};
///
/// #[derive(Debug, Default, Settings)]
/// #[env(self_validate)]
/// struct Ports {
///     #[env(name = "HTTP_PORT", default = "80")]
///     http: u16,
///     #[env(name = "ADMIN_PORT", default = "8080")]
///     admin: u16,
/// }
///
/// impl SelfValidate for Ports {
///     fn validate(&self) -> Result<(), BoxError> {
///         if self.http == self.admin {
///             return Err("http and admin ports must differ".into());
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait SelfValidate {
    fn validate(&self) -> Result<(), BoxError>;
}

/// Per-field pass on a freshly coerced value.
pub(crate) fn check_field(
    name: &str,
    type_name: &str,
    tags: &Tags,
    value: &Value,
) -> Result<(), BindError> {
    let Some(rules) = tags.rules() else {
        return Ok(());
    };
    rules::check(value, rules, None).map_err(|rule| BindError::validation(name, type_name, rule))
}

/// Record pass over a fully bound struct, recursing into nested records and
/// allocated pointers in declaration order.
pub(crate) fn check_record(record: &mut dyn Settings) -> Result<(), BindError> {
    let type_name = record.type_name();
    let fields = record.fields();

    let siblings: Vec<(&'static str, Option<Value>)> = fields
        .iter()
        .map(|field| {
            let value = match &field.slot {
                Some(SlotMut::Leaf(leaf)) if !field.tags.is_omitted() => Some(leaf.value()),
                _ => None,
            };
            (field.name, value)
        })
        .collect();

    for field in fields {
        if field.is_omitted() {
            continue;
        }
        match field.slot {
            Some(SlotMut::Record(nested)) => check_record(nested)?,
            Some(SlotMut::Pointer(pointer)) => {
                if let Some(nested) = existing_record(pointer) {
                    check_record(nested)?;
                }
            }
            Some(SlotMut::Leaf(leaf)) => {
                let Some(rules) = field.tags.rules() else {
                    continue;
                };
                rules::check(&leaf.value(), rules, Some(siblings.as_slice()))
                    .map_err(|rule| BindError::validation(field.name, field.type_name, rule))?;
            }
            None => {}
        }
    }

    tracing::trace!(record = type_name, "record rules passed");
    Ok(())
}

/// Follow a chain of pointers to a record without allocating.
fn existing_record(pointer: &mut dyn crate::slot::Pointer) -> Option<&mut dyn Settings> {
    let mut slot = pointer.deref_existing()?;
    loop {
        slot = match slot {
            SlotMut::Record(record) => return Some(record),
            SlotMut::Pointer(inner) => inner.deref_existing()?,
            SlotMut::Leaf(_) => return None,
        };
    }
}
