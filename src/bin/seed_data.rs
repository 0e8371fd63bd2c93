//! Seed data script - populates the database with demo reference data
//!
//! Run with: cargo run --bin seed-data -- --migrate
//!
//! Loads store locations, default rates, staff and customer accounts, blog
//! posts, repair types and the device brand/series/model hierarchy. Every
//! loader is idempotent, so the script can be re-run against a seeded database.

use anyhow::Context;
use clap::Parser;
use tracing::info;

use repair_shop_api as api;

#[derive(Parser)]
#[command(name = "seed-data", about = "Populate the repair shop database with demo data", version)]
struct Cli {
    #[arg(
        long,
        env = "DATABASE_URL",
        help = "Database URL; defaults to the configured database_url"
    )]
    database_url: Option<String>,

    #[arg(long, help = "Run pending migrations before seeding")]
    migrate: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut cfg = api::config::load_config().context("loading configuration")?;
    api::config::init_tracing(cfg.log_level(), cfg.log_json);

    if let Some(url) = cli.database_url {
        cfg.database_url = url;
    }

    info!("=== Repair Shop Seed Data ===");
    let db = api::db::establish_connection_from_app_config(&cfg)
        .await
        .context("connecting to database")?;

    if cli.migrate || cfg.auto_migrate {
        api::db::run_migrations(&db)
            .await
            .context("running migrations")?;
    }

    let summary = api::seed::seed_all(&db, cfg.fallback_rates()).await?;

    info!(
        locations = summary.locations,
        default_rates = summary.default_rates,
        users = summary.users,
        blog_posts = summary.blog_posts,
        repair_types = summary.repair_types,
        device_brands = summary.device_brands,
        device_series = summary.device_series,
        device_models = summary.device_models,
        "Seed complete: {} records created",
        summary.total()
    );
    if summary.total() == 0 {
        info!("Database was already seeded; nothing to do");
    }

    Ok(())
}
