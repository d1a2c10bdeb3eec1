use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Args;
use sqlx::PgPool;
use tokio::signal;
use tokio::sync::Notify;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::database::{manager, Repositories};
use crate::routes::{app, AppState};
use crate::services::Services;

#[derive(Debug, Default, Args)]
pub struct ServeArgs {
    #[arg(long, help = "Listen port (overrides config)")]
    pub port: Option<u16>,
}

pub async fn execute(args: ServeArgs, mut config: AppConfig) -> anyhow::Result<()> {
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let pool = manager::connect(&config.db)
        .await
        .context("failed to init db")?;

    if config.db.run_migrations {
        manager::run_migrations(&pool)
            .await
            .context("failed to apply migrations")?;
    }

    let services = Services::new(Repositories::postgres(pool.clone()), &config);
    let router = app(AppState::new(services));

    let bind_addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    info!("server started on http://{}", bind_addr);

    let stop = Arc::new(Notify::new());
    let stop_signal = stop.clone();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async move { stop_signal.notified().await })
            .await
    });

    tokio::select! {
        result = &mut server => {
            result.context("server task panicked")?.context("server error")?;
        }
        _ = shutdown_signal() => {
            info!("server shutting down");
            // notify_one keeps a permit if the server has not polled its future yet
            stop.notify_one();

            let grace = config.server.shutdown_timeout();
            match tokio::time::timeout(grace, &mut server).await {
                Ok(result) => result.context("server task panicked")?.context("server error")?,
                Err(_) => {
                    warn!("in-flight requests did not finish within {:?}, dropping them", grace);
                    server.abort();
                }
            }
        }
    }

    close_pool(&pool, config.server.shutdown_timeout()).await;
    Ok(())
}

/// Aborting the server leaves its connection tasks running, and they may
/// still hold pool connections, so closing is bounded too.
async fn close_pool(pool: &PgPool, window: Duration) {
    if finish_within(window, pool.close()).await {
        info!("database connection closed");
    } else {
        warn!("database pool did not close within {:?}, exiting anyway", window);
    }
}

async fn finish_within(window: Duration, task: impl Future<Output = ()>) -> bool {
    tokio::time::timeout(window, task).await.is_ok()
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("failed to install CTRL+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(e) => {
                warn!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
