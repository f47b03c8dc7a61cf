use clap::{Parser, Subcommand};

use crate::config::{mask_password, mask_secret, Config};

#[derive(Parser)]
#[command(name = "eve-payments")]
#[command(about = "Eve Payments - card payment gateway orchestration", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Database management commands
    #[command(subcommand)]
    Db(DbCommands),

    /// Configuration validation
    Config,
}

#[derive(Subcommand)]
pub enum DbCommands {
    /// Run database migrations
    Migrate,
}

pub async fn handle_db_migrate(config: &Config) -> anyhow::Result<()> {
    let pool = crate::db::create_pool(config).await?;

    tracing::info!("Running database migrations...");
    crate::db::run_migrations(&pool).await?;

    println!("✓ Database migrations completed");

    Ok(())
}

pub fn handle_config_validate(config: &Config) -> anyhow::Result<()> {
    tracing::info!("Validating configuration...");

    println!("Configuration:");
    println!("  Server Port: {}", config.server_port);
    println!("  Database URL: {}", mask_password(&config.database_url));
    println!("  Gateway URL: {}", config.gateway.base_url);
    println!("  Gateway Public Key: {}", config.gateway.public_key);
    println!(
        "  Gateway Private Key: {}",
        mask_secret(&config.gateway.private_key)
    );
    println!(
        "  Gateway Integrity Key: {}",
        mask_secret(&config.gateway.integrity_key)
    );
    println!("  Gateway Timeout: {:?}", config.gateway.timeout);
    println!("  Gateway Max Retries: {}", config.gateway.max_retries);
    println!(
        "  Sandbox Status: {}",
        config.gateway.sandbox_status.as_deref().unwrap_or("(unset)")
    );

    config.gateway.validate()?;

    println!("✓ Configuration is valid");

    Ok(())
}
