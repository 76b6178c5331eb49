//! Integration tests

use envbind::{
    BindError, Binder, BoxError, ErrorKind, Kind, Leaf, LogLevel, Registry, SelfValidate,
    Settings, SyslogPriority, Value,
};
use serial_test::serial;
use std::collections::HashMap;
use std::env;
use std::time::Duration;

const VARIABLES: &[(&str, &str)] = &[
    ("PORT", "80"),
    ("DB", "db/file"),
    ("CACHE", "5"),
    ("BADCACHE1", "i"),
    ("BADCACHE2", "300"),
    ("BADCACHE3", "-1"),
    ("LOG_LEVEL", "debug"),
    ("SYSLOG_LEVEL", "info"),
    ("TIMEOUT", "20s"),
    ("BADPORT", "a"),
    ("STDOUT", "true"),
];

fn set_environment() {
    for (key, value) in VARIABLES {
        env::set_var(key, value);
    }
    env::remove_var("DB2");
}

fn clear_environment() {
    for (key, _) in VARIABLES {
        env::remove_var(key);
    }
}

fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[derive(Debug, Default, Settings)]
struct Service {
    #[env(name = "PORT", validate = "required")]
    pub port: String,
    #[env(name = "DB")]
    pub path_to_database: String,
}

#[derive(Debug, Default, Settings)]
struct ServiceWithUntagged {
    pub port: String,
    #[env(name = "DB")]
    pub path_to_database: String,
}

#[derive(Debug, Default, Settings)]
struct ServiceWithCache {
    #[env(name = "PORT")]
    pub port: u32,
    #[env(name = "DB")]
    pub path_to_database: String,
    #[env(name = "CACHE")]
    pub cache_size: u8,
}

#[derive(Debug, Default, Settings)]
struct NotANumberCache {
    #[env(name = "BADCACHE1")]
    pub cache_size: u8,
}

#[derive(Debug, Default, Settings)]
struct TooLargeCache {
    #[env(name = "PORT")]
    pub port: i64,
    #[env(name = "BADCACHE2")]
    pub cache_size: u8,
}

#[derive(Debug, Default, Settings)]
struct NegativeCache {
    #[env(name = "BADCACHE3")]
    pub cache_size: u8,
}

#[derive(Debug, Default, Settings)]
struct NumericPort {
    #[env(name = "PORT", validate = "numeric")]
    pub port: String,
    #[env(name = "DB", validate = "required")]
    pub path_to_database: String,
}

#[derive(Debug, Default, Settings)]
struct NonNumericPort {
    #[env(name = "BADPORT", validate = "numeric")]
    pub port: String,
    #[env(name = "DB", validate = "required")]
    pub path_to_database: String,
}

#[derive(Debug, Default, Settings)]
struct SmallCache {
    #[env(name = "PORT", validate = "numeric")]
    pub port: String,
    #[env(name = "CACHE", validate = "min=10")]
    pub cache_size: u8,
}

#[derive(Debug, Default, PartialEq, Settings)]
struct Internal {
    #[env(name = "CACHE")]
    pub cache_size: String,
}

#[derive(Debug, Default, Settings)]
struct WithPointer {
    #[env(name = "PORT")]
    pub port: String,
    #[env(name = "DB")]
    pub path_to_database: String,
    pub internal: Option<Box<Internal>>,
}

#[derive(Debug, Default, Settings)]
struct WithValue {
    #[env(name = "PORT")]
    pub port: i64,
    #[env(name = "DB")]
    pub path_to_database: String,
    pub internal: Internal,
}

#[derive(Debug, Default, Settings)]
struct RequiredDatabase {
    #[env(name = "DB2", validate = "required")]
    pub path_to_database: String,
}

#[derive(Debug, Default, Settings)]
struct Levels {
    #[env(name = "LOG_LEVEL")]
    pub log_level: LogLevel,
    #[env(name = "SYSLOG_LEVEL")]
    pub syslog_priority: SyslogPriority,
}

#[derive(Debug, Default, Settings)]
struct LevelsAndDuration {
    #[env(name = "PORT")]
    pub port: u16,
    #[env(name = "LOG_LEVEL")]
    pub log_level: LogLevel,
    #[env(name = "TIMEOUT")]
    pub timeout: Duration,
    #[env(name = "STDOUT")]
    pub stdout: bool,
}

#[derive(Debug, Default, Settings)]
struct UnsupportedFloat {
    #[env(name = "PORT")]
    pub port: f32,
}

#[test]
#[serial]
fn test_string_fields() {
    set_environment();

    let service = Service::from_env().unwrap();
    assert_eq!(service.port, "80");
    assert_eq!(service.path_to_database, "db/file");

    clear_environment();
}

#[test]
#[serial]
fn test_untagged_field_keeps_zero_value() {
    set_environment();

    let service = ServiceWithUntagged::from_env().unwrap();
    assert_eq!(service.port, "");
    assert_eq!(service.path_to_database, "db/file");

    clear_environment();
}

#[test]
#[serial]
fn test_numeric_fields() {
    set_environment();

    let service = ServiceWithCache::from_env().unwrap();
    assert_eq!(service.port, 80);
    assert_eq!(service.cache_size, 5);

    clear_environment();
}

#[test]
#[serial]
fn test_incorrect_byte_values() {
    set_environment();

    let err = envbind::load::<NotANumberCache>().unwrap_err();
    assert_eq!(
        err.to_string(),
        "environment variable 'BADCACHE1' has been found but has incorrect value"
    );
    let err = envbind::load::<TooLargeCache>().unwrap_err();
    assert!(matches!(err, BindError::IncorrectFieldValue { ref key } if key == "BADCACHE2"));
    let err = envbind::load::<NegativeCache>().unwrap_err();
    assert!(matches!(err, BindError::IncorrectFieldValue { ref key } if key == "BADCACHE3"));

    clear_environment();
}

#[test]
#[serial]
fn test_validation_rules() {
    set_environment();

    assert!(NumericPort::from_env().is_ok());

    let err = envbind::load::<NonNumericPort>().unwrap_err();
    assert_eq!(
        err.to_string(),
        "validation with rule 'numeric' failed on the field 'port' of 'String' type"
    );

    let err = envbind::load::<SmallCache>().unwrap_err();
    assert!(matches!(
        err,
        BindError::ValidationFailed { ref field, ref rule, .. } if field == "cache_size" && rule == "min=10"
    ));

    clear_environment();
}

#[test]
#[serial]
fn test_not_a_struct() {
    set_environment();

    let mut text = String::from("not a struct");
    let err = envbind::bind(&mut text).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotAStruct);
    assert_eq!(err.to_string(), "the configuration must be a struct");

    clear_environment();
}

#[test]
#[serial]
fn test_nested_pointer() {
    set_environment();

    let settings = WithPointer::from_env().unwrap();
    assert_eq!(settings.port, "80");
    assert_eq!(
        settings.internal.as_deref(),
        Some(&Internal {
            cache_size: "5".into()
        })
    );

    clear_environment();
}

#[test]
#[serial]
fn test_boxed_root() {
    set_environment();

    let mut settings = Box::new(WithPointer::default());
    envbind::bind(&mut settings).unwrap();
    assert_eq!(settings.path_to_database, "db/file");
    assert_eq!(settings.internal.unwrap().cache_size, "5");

    clear_environment();
}

#[test]
#[serial]
fn test_nested_value() {
    set_environment();

    let settings = WithValue::from_env().unwrap();
    assert_eq!(settings.port, 80);
    assert_eq!(settings.internal.cache_size, "5");

    clear_environment();
}

#[test]
#[serial]
fn test_required_without_value() {
    set_environment();

    let err = envbind::load::<RequiredDatabase>().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationFailed);
    assert_eq!(
        err.to_string(),
        "validation with rule 'required' failed on the field 'path_to_database' of 'String' type"
    );

    let err = RequiredDatabase::from_env().unwrap_err();
    assert!(err.downcast_ref::<BindError>().is_some());

    clear_environment();
}

#[test]
#[serial]
fn test_levels() {
    set_environment();

    let levels = Levels::from_env().unwrap();
    assert_eq!(levels.log_level, LogLevel::Debug);
    assert_eq!(levels.syslog_priority, SyslogPriority::Info);

    let settings = LevelsAndDuration::from_env().unwrap();
    assert_eq!(settings.port, 80);
    assert_eq!(settings.log_level, LogLevel::Debug);
    assert_eq!(settings.timeout, Duration::from_secs(20));
    assert!(settings.stdout);

    clear_environment();
}

#[test]
#[serial]
fn test_unsupported_field_type() {
    set_environment();

    let err = envbind::load::<UnsupportedFloat>().unwrap_err();
    assert_eq!(
        err.to_string(),
        "environment variable 'PORT' has been found but the field type is unsupported"
    );

    clear_environment();
}

#[test]
#[serial]
fn test_unsupported_field_without_variable_is_skipped() {
    clear_environment();

    let settings = UnsupportedFloat::from_env().unwrap();
    assert_eq!(settings.port, 0.0);
}

#[derive(Debug, Default, PartialEq, Settings)]
struct Widths {
    #[env(name = "U8")]
    u8: u8,
    #[env(name = "U16")]
    u16: u16,
    #[env(name = "U32")]
    u32: u32,
    #[env(name = "U64")]
    u64: u64,
    #[env(name = "I8")]
    i8: i8,
    #[env(name = "I16")]
    i16: i16,
    #[env(name = "I32")]
    i32: i32,
    #[env(name = "I64")]
    i64: i64,
    #[env(name = "USIZE")]
    usize: usize,
    #[env(name = "ISIZE")]
    isize: isize,
}

#[test]
fn test_integer_bounds() {
    let limits = [
        ("U8", "255", "256"),
        ("U16", "65535", "65536"),
        ("U32", "4294967295", "4294967296"),
        ("U64", "18446744073709551615", "18446744073709551616"),
        ("I8", "-128", "-129"),
        ("I16", "-32768", "-32769"),
        ("I32", "-2147483648", "-2147483649"),
        ("I64", "-9223372036854775808", "-9223372036854775809"),
        ("I8", "127", "128"),
        ("I64", "9223372036854775807", "9223372036854775808"),
    ];

    for (key, fits, overflows) in limits {
        let binder = Binder::new().with_source(vars(&[(key, fits)]));
        assert!(binder.load::<Widths>().is_ok(), "{key}={fits} should fit");

        let binder = Binder::new().with_source(vars(&[(key, overflows)]));
        let err = binder.load::<Widths>().unwrap_err();
        assert!(
            matches!(err, BindError::IncorrectFieldValue { key: ref k } if k == key),
            "{key}={overflows} should overflow, got {err}"
        );
    }

    let widths: Widths = Binder::new()
        .with_source(vars(&[
            ("U8", "255"),
            ("U16", "65535"),
            ("U32", "4294967295"),
            ("U64", "18446744073709551615"),
            ("I8", "-128"),
            ("I16", "32767"),
            ("I32", "-2147483648"),
            ("I64", "9223372036854775807"),
        ]))
        .load()
        .unwrap();
    assert_eq!(
        widths,
        Widths {
            u8: u8::MAX,
            u16: u16::MAX,
            u32: u32::MAX,
            u64: u64::MAX,
            i8: i8::MIN,
            i16: i16::MAX,
            i32: i32::MIN,
            i64: i64::MAX,
            usize: 0,
            isize: 0,
        }
    );
}

#[test]
fn test_native_integer_bounds() {
    let limits = [
        ("USIZE", usize::MAX.to_string(), (usize::MAX as u128 + 1).to_string()),
        ("ISIZE", isize::MAX.to_string(), (isize::MAX as i128 + 1).to_string()),
        ("ISIZE", isize::MIN.to_string(), (isize::MIN as i128 - 1).to_string()),
    ];

    for (key, fits, overflows) in &limits {
        let binder = Binder::new().with_source(vars(&[(*key, fits.as_str())]));
        assert!(binder.load::<Widths>().is_ok(), "{key}={fits} should fit");

        let binder = Binder::new().with_source(vars(&[(*key, overflows.as_str())]));
        let err = binder.load::<Widths>().unwrap_err();
        assert!(
            matches!(err, BindError::IncorrectFieldValue { key: ref k } if k == key),
            "{key}={overflows} should overflow, got {err}"
        );
    }

    let (umax, imin) = (usize::MAX.to_string(), isize::MIN.to_string());
    let widths: Widths = Binder::new()
        .with_source(vars(&[("USIZE", umax.as_str()), ("ISIZE", imin.as_str())]))
        .load()
        .unwrap();
    assert_eq!(widths.usize, usize::MAX);
    assert_eq!(widths.isize, isize::MIN);
}

#[test]
fn test_unsigned_sign_is_rejected() {
    let err = Binder::new()
        .with_source(vars(&[("U8", "+5")]))
        .load::<Widths>()
        .unwrap_err();
    assert!(matches!(err, BindError::IncorrectFieldValue { ref key } if key == "U8"));

    let widths: Widths = Binder::new()
        .with_source(vars(&[("I8", "+5")]))
        .load()
        .unwrap();
    assert_eq!(widths.i8, 5);
}

#[derive(Debug, Default, Settings)]
struct Flags {
    #[env(name = "FLAG")]
    flag: bool,
}

#[test]
fn test_bool_never_fails() {
    for (raw, expected) in [("true", true), ("TRUE", true), ("True", true), ("yes", false), ("1", false), ("", false)] {
        let flags: Flags = Binder::new().with_source(vars(&[("FLAG", raw)])).load().unwrap();
        assert_eq!(flags.flag, expected, "FLAG={raw:?}");
    }
}

#[derive(Debug, Default, Settings)]
struct Sequences {
    #[env(name = "HOSTS", validate = "min=2")]
    hosts: Vec<String>,
    #[env(name = "TOKEN")]
    token: Vec<u8>,
    #[env(name = "RATIO", default = "0.25")]
    ratio: f64,
}

#[test]
fn test_sequences_and_floats() {
    let sequences: Sequences = Binder::new()
        .with_source(vars(&[("HOSTS", "a,b,c"), ("TOKEN", "s3cr3t")]))
        .load()
        .unwrap();
    assert_eq!(sequences.hosts, ["a", "b", "c"]);
    assert_eq!(sequences.token, b"s3cr3t");
    assert_eq!(sequences.ratio, 0.25);

    let err = Binder::new()
        .with_source(vars(&[("HOSTS", "a")]))
        .load::<Sequences>()
        .unwrap_err();
    assert!(matches!(err, BindError::ValidationFailed { ref rule, .. } if rule == "min=2"));
}

#[derive(Debug, Default, Settings)]
struct Timeouts {
    #[env(name = "READ_TIMEOUT", default = "1m30s", validate = "min=1s")]
    read: Duration,
}

#[test]
fn test_durations() {
    let timeouts: Timeouts = Binder::new().with_source(vars(&[])).load().unwrap();
    assert_eq!(timeouts.read, Duration::from_secs(90));

    let timeouts: Timeouts = Binder::new()
        .with_source(vars(&[("READ_TIMEOUT", "1h 30m")]))
        .load()
        .unwrap();
    assert_eq!(timeouts.read, Duration::from_secs(5400));

    for raw in ["-5s", "20", "soon"] {
        let err = Binder::new()
            .with_source(vars(&[("READ_TIMEOUT", raw)]))
            .load::<Timeouts>()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IncorrectFieldValue, "{raw}");
    }

    let err = Binder::new()
        .with_source(vars(&[("READ_TIMEOUT", "500ms")]))
        .load::<Timeouts>()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationFailed);
}

#[derive(Debug, Default, Settings)]
struct Defaults {
    #[env(name = "NAME", default = "service")]
    name: String,
    #[env(name = "WORKERS", default = "many")]
    workers: u8,
}

#[test]
fn test_defaults() {
    let err = Binder::new()
        .with_source(vars(&[]))
        .load::<Defaults>()
        .unwrap_err();
    assert!(matches!(err, BindError::IncorrectFieldValue { ref key } if key == "WORKERS"));

    let defaults: Defaults = Binder::new()
        .with_source(vars(&[("WORKERS", "4")]))
        .load()
        .unwrap();
    assert_eq!(defaults.name, "service");
    assert_eq!(defaults.workers, 4);

    // An empty value counts as set.
    let defaults: Defaults = Binder::new()
        .with_source(vars(&[("NAME", ""), ("WORKERS", "4")]))
        .load()
        .unwrap();
    assert_eq!(defaults.name, "");
}

#[test]
fn test_fields_before_failure_stay_bound() {
    let mut defaults = Defaults::default();
    let err = Binder::new()
        .with_source(vars(&[("NAME", "api")]))
        .bind(&mut defaults)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IncorrectFieldValue);
    assert_eq!(defaults.name, "api");
}

/// Not bindable: no `Slot` implementation.
#[derive(Debug, Default)]
struct Handle;

#[derive(Debug, Default, Settings)]
struct WithOmitted {
    #[env(name = "PORT")]
    port: u16,
    #[env(omit)]
    handle: Handle,
    #[env(name = "-")]
    secret: String,
}

#[test]
fn test_omitted_fields() {
    let settings: WithOmitted = Binder::new()
        .with_source(vars(&[("PORT", "80"), ("-", "leaked")]))
        .load()
        .unwrap();
    assert_eq!(settings.port, 80);
    assert_eq!(settings.secret, "");
    let _ = settings.handle;
}

#[derive(Debug, Default, Settings)]
struct Database {
    #[env(name = "DB_MODE", default = "dev", validate = "oneof=dev prod")]
    mode: String,
    #[env(name = "DB_DSN", validate = "required_if=mode prod")]
    dsn: String,
}

#[derive(Debug, Default, Settings)]
struct App {
    #[env(name = "APP_NAME", default = "app")]
    name: String,
    database: Option<Box<Database>>,
}

#[test]
fn test_cross_field_rules_on_nested_records() {
    let app: App = Binder::new().with_source(vars(&[])).load().unwrap();
    assert_eq!(app.database.unwrap().mode, "dev");

    let err = Binder::new()
        .with_source(vars(&[("DB_MODE", "prod")]))
        .load::<App>()
        .unwrap_err();
    assert!(matches!(
        err,
        BindError::ValidationFailed { ref field, ref rule, .. } if field == "dsn" && rule == "required_if=mode prod"
    ));

    let app: App = Binder::new()
        .with_source(vars(&[("DB_MODE", "prod"), ("DB_DSN", "postgres://db")]))
        .load()
        .unwrap();
    assert_eq!(app.database.unwrap().dsn, "postgres://db");
}

#[derive(Debug, Default, Settings)]
#[env(self_validate)]
struct Ports {
    #[env(name = "HTTP_PORT", default = "80")]
    http: u16,
    #[env(name = "ADMIN_PORT", default = "8080")]
    admin: u16,
}

#[derive(Debug, thiserror::Error)]
#[error("ports collide on {0}")]
struct Collision(u16);

impl SelfValidate for Ports {
    fn validate(&self) -> Result<(), BoxError> {
        if self.http == self.admin {
            return Err(Collision(self.http).into());
        }
        Ok(())
    }
}

#[test]
fn test_self_validation_error_passes_through() {
    assert!(Binder::new().with_source(vars(&[])).load::<Ports>().is_ok());

    let err = Binder::new()
        .with_source(vars(&[("ADMIN_PORT", "80")]))
        .load::<Ports>()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SelfValidation);
    assert_eq!(err.to_string(), "ports collide on 80");
    match err {
        BindError::SelfValidation(inner) => assert!(inner.downcast_ref::<Collision>().is_some()),
        other => panic!("unexpected error: {other}"),
    }
}

#[derive(Debug, Default, PartialEq)]
enum Mode {
    #[default]
    Off,
    On,
}

impl Leaf for Mode {
    fn kind(&self) -> Kind {
        Kind::Custom("Mode")
    }

    fn assign(&mut self, value: Value) -> Result<(), Value> {
        match value {
            Value::Bool(on) => {
                *self = if on { Mode::On } else { Mode::Off };
                Ok(())
            }
            other => Err(other),
        }
    }

    fn value(&self) -> Value {
        Value::Bool(*self == Mode::On)
    }
}

envbind::leaf_slot!(Mode);

#[derive(Debug, Default, Settings)]
struct Feature {
    #[env(name = "FEATURE", validate = "required")]
    mode: Mode,
}

#[test]
fn test_custom_kind() {
    let source = vars(&[("FEATURE", "on")]);

    let err = Binder::new()
        .with_source(&source)
        .load::<Feature>()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedField);

    let mut registry = Registry::new();
    registry.register("Mode", |raw: &str| match raw {
        "on" => Ok(Value::Bool(true)),
        "off" => Ok(Value::Bool(false)),
        _ => Err(envbind::CoerceError::Invalid {
            raw: raw.into(),
            kind: "Mode".into(),
        }),
    });
    let binder = Binder::new().with_source(&source).with_registry(registry.clone());
    assert_eq!(binder.load::<Feature>().unwrap().mode, Mode::On);

    let err = Binder::new()
        .with_source(vars(&[("FEATURE", "maybe")]))
        .with_registry(registry.clone())
        .load::<Feature>()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IncorrectFieldValue);

    // A coercion yielding a value the leaf cannot hold.
    registry.register("Mode", |_: &str| Ok(Value::Uint(1)));
    let err = Binder::new()
        .with_source(&source)
        .with_registry(registry)
        .load::<Feature>()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedField);
}

#[derive(Debug, Default, Settings)]
struct Nothing;

#[derive(Debug, Default, Settings)]
struct HoldsNothing {
    #[env(name = "PORT")]
    port: u16,
    nothing: Option<Box<Nothing>>,
}

#[test]
fn test_empty_structs() {
    let err = Binder::new()
        .with_source(vars(&[]))
        .load::<Nothing>()
        .unwrap_err();
    assert_eq!(err.to_string(), "the input structure 'Nothing' has no fields");

    let err = Binder::new()
        .with_source(vars(&[("PORT", "80")]))
        .load::<HoldsNothing>()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyStruct);
}

#[derive(Debug, Default, Settings)]
struct NamedPointerToLeaf {
    #[env(name = "NAME")]
    name: Option<Box<String>>,
}

#[test]
fn test_pointer_to_leaf_is_not_a_struct() {
    let err = Binder::new()
        .with_source(vars(&[("NAME", "x")]))
        .load::<NamedPointerToLeaf>()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotAStruct);
}

/// A hand-written table using Go-style tag strings.
#[derive(Debug, Default)]
struct Manual {
    port: u16,
    db: String,
}

impl Settings for Manual {
    fn type_name(&self) -> &'static str {
        "Manual"
    }

    fn fields(&mut self) -> Vec<envbind::Field<'_>> {
        vec![
            envbind::Field::new(
                "port",
                "u16",
                envbind::Tags::parse(r#"env:"PORT" default:"8080" validate:"min=1""#),
                envbind::Slot::slot(&mut self.port),
            ),
            envbind::Field::new(
                "db",
                "String",
                envbind::Tags::parse(r#"env:"DB" validate:"required""#),
                envbind::Slot::slot(&mut self.db),
            ),
        ]
    }
}

impl envbind::Slot for Manual {
    fn slot(&mut self) -> envbind::SlotMut<'_> {
        envbind::SlotMut::Record(self)
    }
}

#[test]
fn test_hand_written_table() {
    let manual: Manual = Binder::new()
        .with_source(vars(&[("DB", "db/file")]))
        .load()
        .unwrap();
    assert_eq!(manual.port, 8080);
    assert_eq!(manual.db, "db/file");

    let err = Binder::new()
        .with_source(vars(&[]))
        .load::<Manual>()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationFailed);
}

#[test]
fn test_repeated_binds_are_equal() {
    let source = vars(&[("U8", "7"), ("I64", "-3")]);
    let first: Widths = Binder::new().with_source(&source).load().unwrap();
    let second: Widths = Binder::new().with_source(&source).load().unwrap();
    assert_eq!(first, second);
}
