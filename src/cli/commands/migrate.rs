use anyhow::Context;

use crate::config::AppConfig;
use crate::database::manager;

pub async fn execute(config: AppConfig) -> anyhow::Result<()> {
    let pool = manager::connect(&config.db)
        .await
        .context("failed to connect to database")?;

    manager::run_migrations(&pool)
        .await
        .context("failed to apply migrations")?;

    pool.close().await;
    Ok(())
}
