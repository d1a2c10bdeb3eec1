use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use todo_api::cli::{self, Cli};
use todo_api::config::{AppConfig, ConfigSource, LogFormat, LoggingConfig};

#[tokio::main]
async fn main() {
    // Load .env if present so DB_PASSWORD and JWT_SECRET are picked up
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let (config, source) = match AppConfig::load(&cli.config) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("error init config: {e}");
            std::process::exit(1);
        }
    };

    init_tracing(&config.logging);
    if source == ConfigSource::Defaults {
        tracing::warn!("config file {} not found, using defaults", cli.config.display());
    }
    tracing::debug!(server = ?config.server, db_host = %config.db.host, "configuration loaded");

    if let Err(e) = cli::run(cli, config).await {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=info"));
    let registry = tracing_subscriber::registry().with(filter);

    match logging.format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}
