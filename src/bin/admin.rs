//! CLI administration tool for snaplink.
//!
//! Browse mappings and run database chores without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Newest mappings first
//! cargo run --bin admin -- list --page 2 --page-size 50
//!
//! # Find mappings by short code or URL fragment
//! cargo run --bin admin -- search example.com
//!
//! # Full record for one code
//! cargo run --bin admin -- show Ab3dE9
//!
//! # Totals
//! cargo run --bin admin -- stats
//!
//! # Database tools
//! cargo run --bin admin -- db check
//! cargo run --bin admin -- db migrate
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL`, or `DB_HOST` / `DB_PORT` / `DB_USER` / `DB_PASSWORD` / `DB_NAME`

use snaplink::config::Config;
use snaplink::domain::entities::UrlMapping;
use snaplink::domain::repositories::MappingRepository;
use snaplink::infrastructure::persistence::PgMappingRepository;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use sqlx::PgPool;
use std::sync::Arc;

/// Longest URL shown in table output before truncation.
const URL_COLUMN_WIDTH: usize = 60;

/// CLI tool for managing snaplink.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List mappings, newest first
    List {
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        #[arg(long, default_value_t = 25)]
        page_size: u32,
    },

    /// Search short codes and URLs (case-insensitive substring)
    Search {
        term: String,

        #[arg(short, long, default_value_t = 25)]
        limit: u32,
    },

    /// Show the full record for a short code
    Show { code: String },

    /// Show totals
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,

    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = Config::load_database_url().context("Database is not configured")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    let repo = PgMappingRepository::new(Arc::new(pool.clone()));

    match cli.command {
        Commands::List { page, page_size } => list_mappings(&repo, page, page_size).await?,
        Commands::Search { term, limit } => search_mappings(&repo, &term, limit).await?,
        Commands::Show { code } => show_mapping(&repo, &code).await?,
        Commands::Stats => handle_stats(&repo, &pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn list_mappings(repo: &PgMappingRepository, page: u32, page_size: u32) -> Result<()> {
    anyhow::ensure!(page >= 1, "--page must be at least 1");
    anyhow::ensure!(
        (1..=1000).contains(&page_size),
        "--page-size must be between 1 and 1000"
    );

    let offset = (page as i64 - 1) * page_size as i64;
    let mappings = repo.list(offset, page_size as i64).await?;
    let total = repo.count().await?;

    println!("{}", "📋 URL Mappings".bright_blue().bold());
    println!();

    if mappings.is_empty() {
        println!("{}", "  No mappings on this page".yellow());
        return Ok(());
    }

    print_table(&mappings);

    let total_pages = (total as u64).div_ceil(page_size as u64);
    println!();
    println!(
        "  Page {} of {} ({} mappings)",
        page.to_string().bright_white().bold(),
        total_pages.to_string().bright_white(),
        total.to_string().bright_white()
    );
    println!();

    Ok(())
}

async fn search_mappings(repo: &PgMappingRepository, term: &str, limit: u32) -> Result<()> {
    println!(
        "{} {}",
        "🔍 Search:".bright_blue().bold(),
        term.bright_white()
    );
    println!();

    let mappings = repo.search(term, 0, limit as i64).await?;

    if mappings.is_empty() {
        println!("{}", "  No matches".yellow());
        return Ok(());
    }

    print_table(&mappings);
    println!();
    println!(
        "  Matches: {}",
        mappings.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

async fn show_mapping(repo: &PgMappingRepository, code: &str) -> Result<()> {
    let mapping = repo
        .find_by_short_code(code)
        .await?
        .with_context(|| format!("Short code '{}' not found", code))?;

    let last_accessed = mapping
        .last_accessed
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "never".to_string());

    println!("{}", "🔗 Mapping".bright_blue().bold());
    println!();
    println!("  ID:            {}", mapping.id.to_string().bright_black());
    println!("  Short code:    {}", mapping.short_code.cyan().bold());
    println!("  Original URL:  {}", mapping.original_url.bright_white());
    println!(
        "  Created:       {}",
        mapping.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!("  Last accessed: {}", last_accessed);
    let accesses = access_summary(&mapping);
    if mapping.was_accessed() {
        println!("  Accesses:      {}", accesses.bright_green().bold());
    } else {
        println!("  Accesses:      {}", accesses.bright_black());
    }
    println!(
        "  Creator IP:    {}",
        mapping.creator_ip.as_deref().unwrap_or("-").bright_black()
    );
    println!();

    Ok(())
}

/// Displays mapping and access totals.
async fn handle_stats(repo: &PgMappingRepository, pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let mappings_count = repo.count().await?;

    let accesses_count: i64 =
        sqlx::query_scalar("SELECT COALESCE(SUM(access_count), 0)::BIGINT FROM url_mappings")
            .fetch_one(pool)
            .await?;

    let never_accessed: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM url_mappings WHERE access_count = 0")
            .fetch_one(pool)
            .await?;

    println!(
        "  Mappings:       {}",
        mappings_count.to_string().bright_green().bold()
    );
    println!(
        "  Accesses:       {}",
        accesses_count.to_string().bright_green().bold()
    );
    println!(
        "  Never accessed: {}",
        never_accessed.to_string().bright_yellow()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
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

            let size: String =
                sqlx::query_scalar("SELECT pg_size_pretty(pg_total_relation_size('url_mappings'))")
                    .fetch_one(pool)
                    .await
                    .unwrap_or_else(|_| "n/a".to_string());

            println!("  PostgreSQL:     {}", version.bright_white());
            println!("  url_mappings:   {}", size.bright_white());
            println!();
        }
        DbAction::Migrate => {
            println!("{}", "🛠  Applying migrations...".bright_blue());

            sqlx::migrate!("./migrations")
                .run(pool)
                .await
                .context("Failed to run migrations")?;

            println!("{}", "✅ Migrations applied".green().bold());
        }
    }

    Ok(())
}

fn print_table(mappings: &[UrlMapping]) {
    println!(
        "  {:<10} {:<60} {:>8}  {:<16}",
        "Code".bright_white().bold(),
        "URL".bright_white().bold(),
        "Hits".bright_white().bold(),
        "Created".bright_white().bold()
    );
    println!("  {}", "─".repeat(98).bright_black());

    for mapping in mappings {
        println!(
            "  {:<10} {:<60} {:>8}  {}",
            mapping.short_code.cyan(),
            truncate(&mapping.original_url, URL_COLUMN_WIDTH),
            mapping.access_count.to_string().bright_green(),
            mapping
                .created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black()
        );
    }
}

/// Shortens `s` to `max` characters, marking the cut with `…`.
fn access_summary(mapping: &UrlMapping) -> String {
    if mapping.was_accessed() {
        mapping.access_count.to_string()
    } else {
        "0 (never followed)".to_string()
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }

    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
