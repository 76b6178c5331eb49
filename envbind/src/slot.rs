//! Field descriptor table
//!
//! A bindable struct describes itself through [`Settings::fields`], which
//! returns one [`Field`] per declared field in declaration order. Each field
//! exposes its storage as a [`SlotMut`]: a nested record to recurse into, a
//! pointer to dereference (allocating if empty), or a leaf to coerce into.

use crate::kind::{Kind, Value};
use crate::tags::Tags;
use crate::validate::SelfValidate;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

/// A record type whose fields can be bound from the environment.
///
/// Usually implemented with `#[derive(Settings)]`.
pub trait Settings {
    /// Name of the record type, used in error messages.
    fn type_name(&self) -> &'static str;

    /// Descriptor table in declaration order.
    fn fields(&mut self) -> Vec<Field<'_>>;

    /// The struct's own validation hook, if it has one.
    fn as_self_validate(&self) -> Option<&dyn SelfValidate> {
        None
    }
}

/// Classifies a value for the binding engine.
pub trait Slot {
    fn slot(&mut self) -> SlotMut<'_>;
}

/// Mutable view of a field's storage.
pub enum SlotMut<'a> {
    /// Nested record, always recursed into.
    Record(&'a mut dyn Settings),
    /// Indirection to another slot.
    Pointer(&'a mut dyn Pointer),
    /// Scalar or sequence value bound from a single variable.
    Leaf(&'a mut dyn Leaf),
}

/// A value coerced from a single environment string.
pub trait Leaf {
    /// Declared kind selecting the coercion.
    fn kind(&self) -> Kind;

    /// Store a coerced value. Hands the value back if it does not fit.
    fn assign(&mut self, value: Value) -> Result<(), Value>;

    /// Current value, used by rule validation.
    fn value(&self) -> Value;
}

/// An indirection the engine dereferences before recursing.
pub trait Pointer {
    /// Dereference, allocating a default pointee when empty.
    ///
    /// Returns `None` when the pointee cannot be mutated, e.g. a shared `Arc`.
    fn deref_or_init(&mut self) -> Option<SlotMut<'_>>;

    /// Dereference without allocating.
    fn deref_existing(&mut self) -> Option<SlotMut<'_>>;
}

/// One entry of a descriptor table.
pub struct Field<'a> {
    pub name: &'static str,
    pub type_name: &'static str,
    pub tags: Tags,
    /// `None` for fields excluded at compile time.
    pub slot: Option<SlotMut<'a>>,
}

impl<'a> Field<'a> {
    pub fn new(name: &'static str, type_name: &'static str, tags: Tags, slot: SlotMut<'a>) -> Self {
        Self {
            name,
            type_name,
            tags,
            slot: Some(slot),
        }
    }

    /// Entry for a field that takes no part in binding.
    pub fn omitted(name: &'static str, type_name: &'static str) -> Self {
        Self {
            name,
            type_name,
            tags: Tags::new().omitted(),
            slot: None,
        }
    }

    pub fn is_omitted(&self) -> bool {
        self.slot.is_none() || self.tags.is_omitted()
    }
}

/// Implement [`Slot`] for a type that implements [`Leaf`].
///
/// ```rust
/// use envbind::{Kind, Leaf, Value};
///
/// #[derive(Default)]
/// struct Port(u16);
///
/// impl Leaf for Port {
///     fn kind(&self) -> Kind {
///         Kind::Uint16
///     }
///     fn assign(&mut self, value: Value) -> Result<(), Value> {
///         match value {
///             Value::Uint(v) => u16::try_from(v).map(|v| self.0 = v).map_err(|_| Value::Uint(v)),
///             other => Err(other),
///         }
///     }
///     fn value(&self) -> Value {
///         Value::Uint(self.0.into())
///     }
/// }
///
/// envbind::leaf_slot!(Port);
/// ```
#[macro_export]
macro_rules! leaf_slot {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Slot for $ty {
                fn slot(&mut self) -> $crate::SlotMut<'_> {
                    $crate::SlotMut::Leaf(self)
                }
            }
        )+
    };
}

macro_rules! unsigned_leaf {
    ($($ty:ty => $kind:ident),+ $(,)?) => {
        $(
            impl Leaf for $ty {
                fn kind(&self) -> Kind {
                    Kind::$kind
                }

                fn assign(&mut self, value: Value) -> Result<(), Value> {
                    match value {
                        Value::Uint(v) => match <$ty>::try_from(v) {
                            Ok(v) => {
                                *self = v;
                                Ok(())
                            }
                            Err(_) => Err(Value::Uint(v)),
                        },
                        other => Err(other),
                    }
                }

                fn value(&self) -> Value {
                    Value::Uint(*self as u64)
                }
            }

            leaf_slot!($ty);
        )+
    };
}

macro_rules! signed_leaf {
    ($($ty:ty => $kind:ident),+ $(,)?) => {
        $(
            impl Leaf for $ty {
                fn kind(&self) -> Kind {
                    Kind::$kind
                }

                fn assign(&mut self, value: Value) -> Result<(), Value> {
                    match value {
                        Value::Int(v) => match <$ty>::try_from(v) {
                            Ok(v) => {
                                *self = v;
                                Ok(())
                            }
                            Err(_) => Err(Value::Int(v)),
                        },
                        other => Err(other),
                    }
                }

                fn value(&self) -> Value {
                    Value::Int(*self as i64)
                }
            }

            leaf_slot!($ty);
        )+
    };
}

unsigned_leaf!(u8 => Uint8, u16 => Uint16, u32 => Uint32, u64 => Uint64, usize => Usize);
signed_leaf!(i8 => Int8, i16 => Int16, i32 => Int32, i64 => Int64, isize => Isize);

/// Leaf whose coerced value maps one-to-one onto a [`Value`] variant.
macro_rules! direct_leaf {
    ($($ty:ty => $kind:ident / $variant:ident),+ $(,)?) => {
        $(
            impl Leaf for $ty {
                fn kind(&self) -> Kind {
                    Kind::$kind
                }

                fn assign(&mut self, value: Value) -> Result<(), Value> {
                    match value {
                        Value::$variant(v) => {
                            *self = v;
                            Ok(())
                        }
                        other => Err(other),
                    }
                }

                fn value(&self) -> Value {
                    Value::$variant(self.clone())
                }
            }

            leaf_slot!($ty);
        )+
    };
}

direct_leaf!(
    String => String / Str,
    bool => Bool / Bool,
    f64 => Float64 / Float,
    Duration => Duration / Duration,
    Vec<u8> => Bytes / Bytes,
    Vec<String> => Strings / Strings,
);

/// Leaf types with no coercion. Binding one fails as unsupported.
macro_rules! unsupported_leaf {
    ($($ty:ty => |$this:ident| $value:expr),+ $(,)?) => {
        $(
            impl Leaf for $ty {
                fn kind(&self) -> Kind {
                    Kind::Other(stringify!($ty))
                }

                fn assign(&mut self, value: Value) -> Result<(), Value> {
                    Err(value)
                }

                fn value(&self) -> Value {
                    let $this = self;
                    $value
                }
            }

            leaf_slot!($ty);
        )+
    };
}

unsupported_leaf!(
    f32 => |v| Value::Float(f64::from(*v)),
    char => |v| Value::Str(v.to_string()),
    i128 => |v| Value::Str(v.to_string()),
    u128 => |v| Value::Str(v.to_string()),
);

impl<T: Slot + Default> Pointer for Option<Box<T>> {
    fn deref_or_init(&mut self) -> Option<SlotMut<'_>> {
        Some(T::slot(self.get_or_insert_with(Box::default)))
    }

    fn deref_existing(&mut self) -> Option<SlotMut<'_>> {
        self.as_deref_mut().map(T::slot)
    }
}

impl<T: Slot> Pointer for Box<T> {
    fn deref_or_init(&mut self) -> Option<SlotMut<'_>> {
        Some(T::slot(self))
    }

    fn deref_existing(&mut self) -> Option<SlotMut<'_>> {
        Some(T::slot(self))
    }
}

impl<T: Slot + Default> Slot for Option<Box<T>> {
    fn slot(&mut self) -> SlotMut<'_> {
        SlotMut::Pointer(self)
    }
}

impl<T: Slot> Slot for Box<T> {
    fn slot(&mut self) -> SlotMut<'_> {
        SlotMut::Pointer(self)
    }
}

/// Shared pointers are only writable while uniquely owned.
macro_rules! shared_pointer {
    ($($ptr:ident),+) => {
        $(
            impl<T: Slot + Default> Pointer for Option<$ptr<T>> {
                fn deref_or_init(&mut self) -> Option<SlotMut<'_>> {
                    let shared = self.get_or_insert_with(|| $ptr::new(T::default()));
                    $ptr::get_mut(shared).map(T::slot)
                }

                fn deref_existing(&mut self) -> Option<SlotMut<'_>> {
                    self.as_mut()
                        .and_then($ptr::get_mut)
                        .map(T::slot)
                }
            }

            impl<T: Slot> Pointer for $ptr<T> {
                fn deref_or_init(&mut self) -> Option<SlotMut<'_>> {
                    $ptr::get_mut(self).map(T::slot)
                }

                fn deref_existing(&mut self) -> Option<SlotMut<'_>> {
                    $ptr::get_mut(self).map(T::slot)
                }
            }

            impl<T: Slot + Default> Slot for Option<$ptr<T>> {
                fn slot(&mut self) -> SlotMut<'_> {
                    SlotMut::Pointer(self)
                }
            }

            impl<T: Slot> Slot for $ptr<T> {
                fn slot(&mut self) -> SlotMut<'_> {
                    SlotMut::Pointer(self)
                }
            }
        )+
    };
}

shared_pointer!(Arc, Rc);
