//! Validation rules and self validation

use envbind::{BoxError, SelfValidate, Settings};

#[derive(Debug, Default, Settings)]
#[env(self_validate)]
struct Config {
    #[env(name = "MODE", default = "dev", validate = "oneof=dev prod")]
    pub mode: String,

    // Only needed in production
    #[env(name = "TLS_CERT", validate = "required_if=mode prod")]
    pub tls_cert: String,

    #[env(name = "HTTP_PORT", default = "8080", validate = "gte=1024")]
    pub http_port: u16,

    #[env(name = "ADMIN_PORT", default = "9090", validate = "gte=1024")]
    pub admin_port: u16,

    #[env(name = "PUBLIC_HOST", default = "localhost", validate = "hostname|ip")]
    pub public_host: String,
}

impl SelfValidate for Config {
    fn validate(&self) -> Result<(), BoxError> {
        if self.http_port == self.admin_port {
            return Err(format!("HTTP and admin ports are both {}", self.http_port).into());
        }
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let config = Config::from_env()?;
    println!("Development: {config:?}");

    std::env::set_var("MODE", "prod");
    match Config::from_env() {
        Ok(config) => println!("Production: {config:?}"),
        Err(e) => println!("Error: {e}"),
    }

    std::env::set_var("TLS_CERT", "/etc/tls/cert.pem");
    std::env::set_var("ADMIN_PORT", "8080");
    match Config::from_env() {
        Ok(config) => println!("Production: {config:?}"),
        Err(e) => println!("Error: {e}"),
    }

    std::env::set_var("ADMIN_PORT", "80");
    match Config::from_env() {
        Ok(config) => println!("Production: {config:?}"),
        Err(e) => println!("Error: {e}"),
    }

    Ok(())
}
