//! CLI administration tool for shortpath.
//!
//! Inspects mappings and manages the database without going through the
//! HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Show mapping and click totals
//! cargo run --bin admin -- stats
//!
//! # Show one mapping, live or stale
//! cargo run --bin admin -- lookup A1b2C3d
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//!
//! # Apply migrations
//! cargo run --bin admin -- db migrate --yes
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (or the `DB_*` components): PostgreSQL connection string

use shortpath::config::{self, mask_connection_string};
use shortpath::domain::entities::STALENESS_WINDOW_DAYS;
use shortpath::infrastructure::persistence::PgUrlRepository;
use shortpath::prelude::{AppError, SystemClock, UrlService};
use shortpath::server::connect_pool;
use shortpath::utils::url_validator::HostBlacklist;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing shortpath.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Show mapping and click totals
    Stats,

    /// Show a mapping by short path, including stale ones
    Lookup {
        /// The 7-character short path
        short_path: String,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,

    /// Apply pending migrations
    Migrate {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

type Service = UrlService<PgUrlRepository>;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::Config::from_env()?;
    let pool = connect_pool(&config).await?;

    let service = UrlService::new(
        Arc::new(PgUrlRepository::new(Arc::new(pool.clone()))),
        Arc::new(SystemClock),
        HostBlacklist::new(&config.blacklisted_hosts),
    );

    match cli.command {
        Commands::Stats => handle_stats(&service).await?,
        Commands::Lookup { short_path } => handle_lookup(&service, &short_path).await?,
        Commands::Db { action } => handle_db_action(action, &pool, &config.database_url).await?,
    }

    Ok(())
}

/// Displays mapping and click totals.
async fn handle_stats(service: &Service) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let totals = service
        .totals()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load statistics: {}", e))?;

    println!(
        "  Mappings:       {}",
        totals.mappings.to_string().bright_green().bold()
    );
    println!(
        "  Live mappings:  {} {}",
        totals.live_mappings.to_string().bright_green().bold(),
        format!("(created in the last {} days)", STALENESS_WINDOW_DAYS).bright_black()
    );
    println!(
        "  Clicks:         {}",
        totals.clicks.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Shows one mapping without counting a click.
async fn handle_lookup(service: &Service, short_path: &str) -> Result<()> {
    println!("{}", "🔎 Lookup".bright_blue().bold());
    println!();

    let mapping = match service.lookup(short_path).await {
        Ok(mapping) => mapping,
        Err(AppError::NotFound { .. }) => {
            println!("  {}", format!("No mapping for '{}'", short_path).yellow());
            return Ok(());
        }
        Err(e) => return Err(anyhow::anyhow!("Database error: {}", e)),
    };

    let status = if service.is_stale(&mapping) {
        "STALE".red()
    } else {
        "LIVE".green()
    };

    let created = mapping.created_at.format("%Y-%m-%d %H:%M").to_string();
    let clicks = mapping.clicks.to_string();

    println!("  Short path: {}", mapping.short_path.cyan());
    println!("  URL:        {}", mapping.url.bright_white());
    println!("  Created:    {}", created.bright_black());
    println!("  Clicks:     {}", clicks.bright_green());
    println!("  Status:     {}", status);
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool, database_url: &str) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  URL:        {}", mask_connection_string(database_url));
            println!();
        }
        DbAction::Migrate { yes } => {
            println!("{}", "🛠  Apply migrations".bright_blue().bold());
            println!();
            println!("  Target: {}", mask_connection_string(database_url).cyan());
            println!();

            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt("Apply pending migrations?")
                    .default(false)
                    .interact()?;

                if !confirmed {
                    println!("{}", "❌ Cancelled".red());
                    return Ok(());
                }
            }

            sqlx::migrate!("./migrations")
                .run(pool)
                .await
                .context("Failed to apply migrations")?;

            println!("{}", "✅ Database initialized".green().bold());
        }
    }

    Ok(())
}
