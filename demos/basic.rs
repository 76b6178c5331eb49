//! Basic usage example

use envbind::Settings;
use std::time::Duration;

#[derive(Debug, Default, Settings)]
struct Config {
    // Loaded from DATABASE_URL, must not be empty
    #[env(name = "DATABASE_URL", validate = "required")]
    pub database_url: String,

    // With default value
    #[env(name = "SERVER_ADDR", default = "127.0.0.1:8080", validate = "tcp_addr")]
    pub server_addr: String,

    // Numeric type, range checked against u32
    #[env(name = "MAX_CONNECTIONS", default = "10")]
    pub max_connections: u32,

    // Go-style duration literal
    #[env(name = "IDLE_TIMEOUT", default = "1m30s")]
    pub idle_timeout: Duration,

    // Anything but "true" is false
    #[env(name = "DEBUG_MODE", default = "false")]
    pub debug_mode: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::DEBUG.into()),
        )
        .init();

    // Set environment variables for demonstration
    std::env::set_var("DATABASE_URL", "postgres://localhost/mydb");
    std::env::set_var("SERVER_ADDR", "0.0.0.0:3000");

    let config = Config::from_env()?;

    println!("Configuration loaded:");
    println!("  Database URL: {}", config.database_url);
    println!("  Server Address: {}", config.server_addr);
    println!("  Max Connections: {}", config.max_connections);
    println!("  Idle Timeout: {:?}", config.idle_timeout);
    println!("  Debug Mode: {}", config.debug_mode);

    Ok(())
}
