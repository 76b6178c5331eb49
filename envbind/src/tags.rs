//! Field metadata: binding key, default, omission marker and rule string

/// Token in a rule string that makes a field mandatory.
const REQUIRED: &str = "required";

/// Metadata attached to one field.
///
/// The derive macro builds `Tags` from `#[env(...)]` attributes. Hand-written
/// [`Settings`](crate::Settings) implementations can use the builder methods
/// or [`Tags::parse`] with a struct-tag style string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tags {
    env: Option<&'static str>,
    default: Option<&'static str>,
    validate: Option<&'static str>,
    omit: bool,
}

impl Tags {
    pub const fn new() -> Self {
        Self {
            env: None,
            default: None,
            validate: None,
            omit: false,
        }
    }

    /// Set the binding key. `-` and `omit` exclude the field.
    pub const fn with_key(mut self, key: &'static str) -> Self {
        self.env = Some(key);
        self
    }

    /// Set the literal used when the key is not found.
    pub const fn with_default(mut self, default: &'static str) -> Self {
        self.default = Some(default);
        self
    }

    /// Set the comma separated rule string.
    pub const fn with_rules(mut self, rules: &'static str) -> Self {
        self.validate = Some(rules);
        self
    }

    /// Exclude the field from binding and validation.
    pub const fn omitted(mut self) -> Self {
        self.omit = true;
        self
    }

    /// Parse a struct-tag string such as `env:"PORT" default:"80" validate:"required"`.
    ///
    /// Unknown keys are ignored. Parsing stops at the first malformed pair,
    /// keeping what was read up to that point.
    pub fn parse(tag: &'static str) -> Self {
        let mut tags = Self::new();
        let mut rest = tag;
        loop {
            rest = rest.trim_start();
            let Some((name, after_name)) = rest.split_once(':') else {
                break;
            };
            let Some(quoted) = after_name.strip_prefix('"') else {
                break;
            };
            let Some(end) = quoted.find('"') else {
                break;
            };
            let value = &quoted[..end];
            rest = &quoted[end + 1..];
            match name {
                "env" => tags.env = Some(value),
                "default" => tags.default = Some(value),
                "validate" => tags.validate = Some(value),
                _ => {}
            }
        }
        tags
    }

    /// Whether the field is excluded from processing entirely.
    pub fn is_omitted(&self) -> bool {
        self.omit || matches!(self.env, Some("-") | Some("omit"))
    }

    /// Binding key, if the field is bound to a variable.
    pub fn key(&self) -> Option<&'static str> {
        if self.is_omitted() {
            return None;
        }
        self.env.filter(|key| !key.is_empty())
    }

    pub fn default_value(&self) -> Option<&'static str> {
        self.default
    }

    pub fn rules(&self) -> Option<&'static str> {
        self.validate.filter(|rules| !rules.is_empty())
    }

    /// Whether the rule string contains the `required` token.
    pub fn is_required(&self) -> bool {
        self.rules()
            .map(|rules| rules.split(',').any(|token| token.trim() == REQUIRED))
            .unwrap_or(false)
    }
}
