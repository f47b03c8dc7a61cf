use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use eve_payments::adapters::{
    PostgresOrderRepository, PostgresTransactionLogRepository, PostgresTransactionRepository,
    PostgresUserRepository,
};
use eve_payments::cli::{self, Cli, Commands, DbCommands};
use eve_payments::config::{Config, LogFormat};
use eve_payments::gateway::GatewayClient;
use eve_payments::services::PaymentService;
use eve_payments::{create_app, db, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    init_tracing(config.log_format);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Db(DbCommands::Migrate) => cli::handle_db_migrate(&config).await,
        Commands::Config => cli::handle_config_validate(&config),
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    config.gateway.validate()?;

    // Database pool
    let pool = db::create_pool(&config).await?;
    db::run_migrations(&pool).await?;

    let gateway = GatewayClient::new(config.gateway.clone());
    tracing::info!("Gateway client initialized with URL: {}", config.gateway.base_url);

    let orders = PostgresOrderRepository::new(pool.clone());
    let users = PostgresUserRepository::new(pool.clone());
    let transactions = PostgresTransactionRepository::new(pool.clone());
    let logs = PostgresTransactionLogRepository::new(pool.clone());

    let payments = PaymentService::new(
        Arc::new(orders),
        Arc::new(users),
        Arc::new(transactions),
        Arc::new(logs),
        gateway,
    );

    let app = create_app(AppState {
        db: pool,
        payments: Arc::new(payments),
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}
