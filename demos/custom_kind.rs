//! Custom field kinds through the registry

use envbind::{Binder, CoerceError, Kind, Leaf, Registry, Settings, Value};

/// Size in bytes, written as `512`, `64k` or `16m`.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct ByteSize(u64);

impl ByteSize {
    const KIND: &'static str = "ByteSize";

    fn coerce(raw: &str) -> Result<Value, CoerceError> {
        let invalid = || CoerceError::Invalid {
            raw: raw.to_string(),
            kind: Self::KIND.to_string(),
        };
        let (digits, scale) = match raw.as_bytes().last().copied() {
            Some(b'k' | b'K') => (&raw[..raw.len() - 1], 1 << 10),
            Some(b'm' | b'M') => (&raw[..raw.len() - 1], 1 << 20),
            _ => (raw, 1),
        };
        digits
            .parse::<u64>()
            .ok()
            .and_then(|n| n.checked_mul(scale))
            .map(Value::Uint)
            .ok_or_else(invalid)
    }
}

impl Leaf for ByteSize {
    fn kind(&self) -> Kind {
        Kind::Custom(Self::KIND)
    }

    fn assign(&mut self, value: Value) -> Result<(), Value> {
        match value {
            Value::Uint(n) => {
                self.0 = n;
                Ok(())
            }
            other => Err(other),
        }
    }

    fn value(&self) -> Value {
        Value::Uint(self.0)
    }
}

envbind::leaf_slot!(ByteSize);

#[derive(Debug, Default, Settings)]
struct Upload {
    #[env(name = "UPLOAD_LIMIT", default = "16m", validate = "max=67108864")]
    pub limit: ByteSize,

    #[env(name = "UPLOAD_CHUNK", default = "64k")]
    pub chunk: ByteSize,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("debug"))
        .init();

    // Without a registered coercion the kind is unsupported
    match envbind::load::<Upload>() {
        Ok(upload) => println!("{upload:?}"),
        Err(e) => println!("Error: {e}"),
    }

    let mut registry = Registry::new();
    registry.register(ByteSize::KIND, ByteSize::coerce);

    let upload: Upload = Binder::new().with_registry(registry).load()?;
    println!("Upload limit: {} bytes", upload.limit.0);
    println!("Upload chunk: {} bytes", upload.chunk.0);

    Ok(())
}
