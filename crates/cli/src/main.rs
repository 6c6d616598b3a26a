//! Smart Gadgets CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Apply pending migrations
//! sg-cli migrate
//!
//! # Migrate and create the default administrator (admin / admin123)
//! sg-cli init-db
//!
//! # Create another administrator
//! sg-cli admin create -u alice -p 'correct horse'
//!
//! # Load products from a YAML catalog
//! sg-cli seed data/catalog.yaml
//! ```
//!
//! The database is the one the store uses: `STORE_DATABASE_URL`, falling
//! back to `DATABASE_URL`, then `sqlite://shop.db?mode=rwc`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sqlx::SqlitePool;

use smart_gadgets_storefront::config::StoreConfig;
use smart_gadgets_storefront::db;

mod commands;

#[derive(Parser)]
#[command(name = "sg-cli")]
#[command(author, version, about = "Smart Gadgets CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Run migrations and create the default administrator if missing
    InitDb,
    /// Manage administrators
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Add products from a YAML catalog file
    Seed {
        /// Path to the catalog file
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new administrator
    Create {
        /// Login name
        #[arg(short, long)]
        username: String,

        /// Password (at least 8 characters)
        #[arg(short, long)]
        password: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn connect() -> Result<SqlitePool, Box<dyn std::error::Error>> {
    let config = StoreConfig::from_env()?;
    tracing::info!("Connecting to database...");
    Ok(db::create_pool(&config.database_url).await?)
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let pool = connect().await?;

    match cli.command {
        Commands::Migrate => commands::migrate::run(&pool).await?,
        Commands::InitDb => {
            commands::migrate::run(&pool).await?;
            commands::admin::ensure_default(&pool).await?;
        }
        Commands::Admin { action } => match action {
            AdminAction::Create { username, password } => {
                commands::admin::create(&pool, &username, &password).await?;
            }
        },
        Commands::Seed { file } => {
            commands::seed::catalog(&pool, &file).await?;
        }
    }
    Ok(())
}
