//! Nested structs and pointers

use envbind::Settings;
use std::sync::Arc;

#[derive(Debug, Default, Settings)]
struct Database {
    #[env(name = "DB_URL", default = "postgres://localhost/app")]
    pub url: String,

    #[env(name = "DB_POOL", default = "8", validate = "min=1,max=64")]
    pub pool: u8,
}

#[derive(Debug, Default, Settings)]
struct Cache {
    #[env(name = "CACHE_HOSTS", default = "localhost:6379")]
    pub hosts: Vec<String>,
}

#[derive(Debug, Default, Settings)]
struct Config {
    #[env(name = "SERVICE_NAME", default = "api")]
    pub name: String,

    // Nested by value
    pub database: Database,

    // Allocated on demand
    pub cache: Option<Box<Cache>>,

    // Writable as long as nothing else holds the Arc
    pub replica: Option<Arc<Database>>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("envbind=trace"))
        .with_target(false)
        .init();

    std::env::set_var("CACHE_HOSTS", "cache-1:6379,cache-2:6379");

    let config = Config::from_env()?;
    println!("{config:#?}");

    // A shared Arc cannot be written through
    let shared = Arc::new(Database::default());
    let mut config = Config {
        replica: Some(Arc::clone(&shared)),
        ..Config::default()
    };
    match envbind::bind(&mut config) {
        Ok(()) => println!("bound"),
        Err(e) => println!("Error: {e}"),
    }

    Ok(())
}
