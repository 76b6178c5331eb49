//! Attribute parsing for `#[env(...)]` annotations.
//!
//! Field attributes carry the binding key, the default literal and the rule
//! string. The only struct attribute is `self_validate`.

use syn::{Attribute, Field, LitStr};

/// Parsed `#[env(...)]` attributes of a struct field.
#[derive(Debug, Default)]
pub struct FieldAttrs {
    /// Environment variable name. Fields without one are not bound.
    pub name: Option<String>,

    /// Raw default, coerced like a value read from the environment.
    pub default: Option<String>,

    /// Comma separated validation rules.
    pub validate: Option<String>,

    /// Bare `omit` flag.
    pub omit: bool,
}

impl FieldAttrs {
    /// Extract `#[env(...)]` attributes from a struct field.
    ///
    /// Other attributes are left for other macros; unknown keys inside
    /// `#[env(...)]` are an error.
    pub fn from_field(field: &Field) -> syn::Result<Self> {
        let mut attrs = Self::default();

        for attr in env_attrs(&field.attrs) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    attrs.name = Some(meta.value()?.parse::<LitStr>()?.value());
                    return Ok(());
                }

                if meta.path.is_ident("default") {
                    attrs.default = Some(meta.value()?.parse::<LitStr>()?.value());
                    return Ok(());
                }

                if meta.path.is_ident("validate") {
                    attrs.validate = Some(meta.value()?.parse::<LitStr>()?.value());
                    return Ok(());
                }

                if meta.path.is_ident("omit") {
                    attrs.omit = true;
                    return Ok(());
                }

                Err(meta.error("unsupported env attribute"))
            })?;
        }

        Ok(attrs)
    }

    /// `omit`, `name = "-"` and `name = "omit"` all exclude the field.
    pub fn is_omitted(&self) -> bool {
        self.omit || matches!(self.name.as_deref(), Some("-" | "omit"))
    }
}

/// Parsed `#[env(...)]` attributes of the struct itself.
#[derive(Debug, Default)]
pub struct StructAttrs {
    /// The struct implements `SelfValidate`.
    pub self_validate: bool,
}

impl StructAttrs {
    pub fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut parsed = Self::default();

        for attr in env_attrs(attrs) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("self_validate") {
                    parsed.self_validate = true;
                    return Ok(());
                }

                Err(meta.error("unsupported struct-level env attribute"))
            })?;
        }

        Ok(parsed)
    }
}

fn env_attrs(attrs: &[Attribute]) -> impl Iterator<Item = &Attribute> {
    attrs.iter().filter(|attr| attr.path().is_ident("env"))
}
