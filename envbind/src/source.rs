//! Where binding keys are looked up

use std::collections::{BTreeMap, HashMap};
use std::env::{self, VarError};

/// Result of looking up a binding key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Found(String),
    Missing,
    /// The variable exists but is not valid Unicode.
    NotUnicode,
}

/// A source of raw values for binding keys.
pub trait Source {
    fn lookup(&self, key: &str) -> Lookup;
}

/// The process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct Env;

impl Source for Env {
    fn lookup(&self, key: &str) -> Lookup {
        match env::var(key) {
            Ok(value) => Lookup::Found(value),
            Err(VarError::NotPresent) => Lookup::Missing,
            Err(VarError::NotUnicode(_)) => Lookup::NotUnicode,
        }
    }
}

impl Source for HashMap<String, String> {
    fn lookup(&self, key: &str) -> Lookup {
        self.get(key)
            .map_or(Lookup::Missing, |value| Lookup::Found(value.clone()))
    }
}

impl Source for BTreeMap<String, String> {
    fn lookup(&self, key: &str) -> Lookup {
        self.get(key)
            .map_or(Lookup::Missing, |value| Lookup::Found(value.clone()))
    }
}

impl<S: Source + ?Sized> Source for &S {
    fn lookup(&self, key: &str) -> Lookup {
        (**self).lookup(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_env_lookup() {
        env::set_var("ENVBIND_SOURCE_TEST", "value");
        assert_eq!(
            Env.lookup("ENVBIND_SOURCE_TEST"),
            Lookup::Found("value".into())
        );
        env::remove_var("ENVBIND_SOURCE_TEST");
        assert_eq!(Env.lookup("ENVBIND_SOURCE_TEST"), Lookup::Missing);
    }

    #[test]
    #[serial]
    fn test_env_empty_value_is_found() {
        env::set_var("ENVBIND_SOURCE_EMPTY", "");
        assert_eq!(Env.lookup("ENVBIND_SOURCE_EMPTY"), Lookup::Found(String::new()));
        env::remove_var("ENVBIND_SOURCE_EMPTY");
    }

    #[cfg(unix)]
    #[test]
    #[serial]
    fn test_env_not_unicode() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        env::set_var("ENVBIND_SOURCE_BYTES", OsStr::from_bytes(&[0x66, 0xff]));
        assert_eq!(Env.lookup("ENVBIND_SOURCE_BYTES"), Lookup::NotUnicode);
        env::remove_var("ENVBIND_SOURCE_BYTES");
    }

    #[test]
    fn test_map_sources() {
        let mut map = HashMap::new();
        map.insert("PORT".to_string(), "80".to_string());
        assert_eq!(map.lookup("PORT"), Lookup::Found("80".into()));
        assert_eq!(map.lookup("DB"), Lookup::Missing);

        let tree: BTreeMap<String, String> = [("A".to_string(), "1".to_string())].into();
        assert_eq!(tree.lookup("A"), Lookup::Found("1".into()));
    }
}
