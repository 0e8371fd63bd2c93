//! Applies all pending schema migrations and exits.
//!
//! Uses `DATABASE_URL` when set, otherwise the configured `database_url`.

use anyhow::Context;
use tracing::info;

use repair_shop_api as api;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = api::config::load_config().context("loading configuration")?;
    api::config::init_tracing(cfg.log_level(), cfg.log_json);

    let database_url = std::env::var("DATABASE_URL").unwrap_or_else(|_| cfg.database_url.clone());

    info!("Starting database migration");
    api::migrator::run_migration(&database_url).await?;
    info!("Migration completed successfully");

    Ok(())
}
