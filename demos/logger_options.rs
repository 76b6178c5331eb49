//! Ready-made logger options embedded in a service config

use envbind::{LoggerOptions, Settings};

#[derive(Debug, Default, Settings)]
struct Config {
    #[env(name = "SERVICE_NAME", default = "worker")]
    pub name: String,

    pub logger: LoggerOptions,
}

fn main() -> anyhow::Result<()> {
    std::env::set_var("LOG_LEVEL", "info");
    std::env::set_var("SYSLOG_LEVEL", "warn");

    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(config.logger.log_level.as_str()))
        .with_ansi(config.logger.colour)
        .init();

    tracing::info!(service = %config.name, "configuration loaded");
    println!("{}", serde_json::to_string_pretty(&config.logger)?);
    println!(
        "syslog {} over {} at {} ({})",
        config.logger.syslog,
        config.logger.syslog_protocol,
        config.logger.syslog_level.code(),
        config.logger.syslog_level.description()
    );

    Ok(())
}
