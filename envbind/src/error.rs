//! Error types for binding environment variables into structs

/// Boxed error returned by a [`SelfValidate`](crate::SelfValidate) hook.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while binding environment variables into a struct.
///
/// The engine stops at the first failure, so a single `BindError` always
/// describes the first offending field in declaration order.
#[derive(Debug, thiserror::Error)]
pub enum BindError {
    /// The target (or the pointee of a pointer field) is not a record type.
    #[error("the configuration must be a struct")]
    NotAStruct,

    /// The target cannot be mutated through the handle it was given with.
    ///
    /// Occurs when the root is a shared `Arc`/`Rc` that other owners still
    /// point to.
    #[error("the configuration must be bound through an exclusively owned handle")]
    NotAddressable,

    /// A nested field cannot be mutated through its parent.
    #[error("the field '{field}' cannot be set because it is shared")]
    NotAddressableField {
        /// Name of the struct field
        field: String,
    },

    /// A struct, at any nesting depth, declares no fields.
    #[error("the input structure '{type_name}' has no fields")]
    EmptyStruct {
        /// Name of the empty record type
        type_name: String,
    },

    /// The field's declared kind has no coercion rule.
    #[error("environment variable '{key}' has been found but the field type is unsupported")]
    UnsupportedField {
        /// Binding key of the field
        key: String,
    },

    /// The value was found but could not be parsed or was out of range.
    #[error("environment variable '{key}' has been found but has incorrect value")]
    IncorrectFieldValue {
        /// Binding key of the field
        key: String,
    },

    /// A parsed value violated a validation rule, or a required field had
    /// neither a value nor a default.
    #[error("validation with rule '{rule}' failed on the field '{field}' of '{type_name}' type")]
    ValidationFailed {
        /// Name of the struct field
        field: String,
        /// Declared type of the field
        type_name: String,
        /// The rule token that failed
        rule: String,
    },

    /// Pointer nesting went deeper than the configured limit.
    #[error("the field '{field}' is nested deeper than the limit of {limit} levels")]
    DepthExceeded {
        /// Name of the field at which the limit was hit
        field: String,
        /// Configured maximum depth
        limit: usize,
    },

    /// Error returned by the struct's own validation hook, passed through.
    #[error(transparent)]
    SelfValidation(BoxError),
}

/// Closed classification of [`BindError`] values.
///
/// Useful when only the class of failure matters, e.g. in tests or when
/// mapping errors to exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotAStruct,
    NotAddressable,
    NotAddressableField,
    EmptyStruct,
    UnsupportedField,
    IncorrectFieldValue,
    ValidationFailed,
    DepthExceeded,
    SelfValidation,
}

impl BindError {
    /// Class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotAStruct => ErrorKind::NotAStruct,
            Self::NotAddressable => ErrorKind::NotAddressable,
            Self::NotAddressableField { .. } => ErrorKind::NotAddressableField,
            Self::EmptyStruct { .. } => ErrorKind::EmptyStruct,
            Self::UnsupportedField { .. } => ErrorKind::UnsupportedField,
            Self::IncorrectFieldValue { .. } => ErrorKind::IncorrectFieldValue,
            Self::ValidationFailed { .. } => ErrorKind::ValidationFailed,
            Self::DepthExceeded { .. } => ErrorKind::DepthExceeded,
            Self::SelfValidation(_) => ErrorKind::SelfValidation,
        }
    }

    /// Create an unsupported field error
    pub fn unsupported(key: impl Into<String>) -> Self {
        Self::UnsupportedField { key: key.into() }
    }

    /// Create an incorrect field value error
    pub fn incorrect_value(key: impl Into<String>) -> Self {
        Self::IncorrectFieldValue { key: key.into() }
    }

    /// Create a validation error
    pub fn validation(
        field: impl Into<String>,
        type_name: impl Into<String>,
        rule: impl Into<String>,
    ) -> Self {
        Self::ValidationFailed {
            field: field.into(),
            type_name: type_name.into(),
            rule: rule.into(),
        }
    }
}

/// Failure of a single coercion in the type coercion table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoerceError {
    /// The raw value is malformed for the target kind.
    #[error("cannot parse {raw:?} as {kind}")]
    Invalid {
        /// The raw input
        raw: String,
        /// Name of the target kind
        kind: String,
    },

    /// The value parsed but does not fit into the declared width.
    #[error("{raw:?} is out of range for {kind}")]
    OutOfRange {
        /// The raw input
        raw: String,
        /// Name of the target kind
        kind: String,
    },

    /// No coercion exists for the kind.
    #[error("no coercion is registered for {kind}")]
    Unsupported {
        /// Name of the target kind
        kind: String,
    },
}

impl CoerceError {
    pub(crate) fn invalid(raw: &str, kind: impl std::fmt::Display) -> Self {
        Self::Invalid {
            raw: raw.to_string(),
            kind: kind.to_string(),
        }
    }

    pub(crate) fn out_of_range(raw: &str, kind: impl std::fmt::Display) -> Self {
        Self::OutOfRange {
            raw: raw.to_string(),
            kind: kind.to_string(),
        }
    }

    pub(crate) fn unsupported(kind: impl std::fmt::Display) -> Self {
        Self::Unsupported {
            kind: kind.to_string(),
        }
    }

    /// Convert into the engine's error for the given binding key.
    pub fn into_bind_error(self, key: &str) -> BindError {
        match self {
            Self::Unsupported { .. } => BindError::unsupported(key),
            Self::Invalid { .. } | Self::OutOfRange { .. } => BindError::incorrect_value(key),
        }
    }
}
