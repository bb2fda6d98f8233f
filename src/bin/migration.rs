//! Schema migration tool
//!
//! Run with: cargo run --bin migration -- <up|down|status|fresh>

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use restaurant_erp::{config, db, migrator::Migrator};

#[derive(Debug, Parser)]
#[command(name = "migration", about = "Manage the restaurant-erp database schema")]
struct Cli {
    /// Database URL; defaults to DATABASE_URL, then the application configuration
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply pending migrations
    Up {
        /// Apply at most this many
        #[arg(short, long)]
        steps: Option<u32>,
    },
    /// Roll back applied migrations
    Down {
        #[arg(short, long, default_value_t = 1)]
        steps: u32,
    },
    /// Show which migrations are applied
    Status,
    /// Drop every table and re-apply all migrations
    Fresh,
}

fn resolve_database_url(explicit: Option<String>) -> Result<String> {
    if let Some(url) = explicit {
        return Ok(url);
    }
    if let Ok(url) = std::env::var("DATABASE_URL") {
        return Ok(url);
    }
    let cfg = config::load_config().context("no --database-url given and configuration failed to load")?;
    Ok(cfg.database_url)
}

#[tokio::main]
async fn main() -> Result<()> {
    config::init_tracing("info", false);
    let cli = Cli::parse();

    let url = resolve_database_url(cli.database_url)?;
    let pool = db::establish_connection(&url).await?;

    match cli.command {
        Command::Up { steps } => {
            Migrator::up(&pool, steps).await?;
            info!("Migrations applied");
        }
        Command::Down { steps } => {
            Migrator::down(&pool, Some(steps)).await?;
            info!(steps, "Migrations rolled back");
        }
        Command::Status => {
            Migrator::status(&pool).await?;
        }
        Command::Fresh => {
            Migrator::fresh(&pool).await?;
            info!("Schema rebuilt from scratch");
        }
    }

    db::close_pool(pool).await?;
    Ok(())
}
