//! Vitrine CLI - Database migrations and storefront tools.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations
//! vitrine migrate
//!
//! # Create the demo users
//! vitrine seed
//!
//! # Browse the catalog
//! vitrine catalog --category clothes --sort price-low
//!
//! # Terminal session
//! vitrine session login -e jane@example.com -p password
//! vitrine session show
//! vitrine session logout
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "vitrine")]
#[command(author, version, about = "Vitrine CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database with demo users
    Seed,
    /// Browse the catalog
    Catalog {
        /// Category to show (`all` for every product)
        #[arg(short, long, default_value = "all")]
        category: String,

        /// Sort order (`featured`, `price-low`, `price-high`, `name`)
        #[arg(short, long, default_value = "featured")]
        sort: String,
    },
    /// Manage a terminal session
    Session {
        /// Directory holding the session snapshot
        #[arg(long, default_value = ".vitrine", global = true)]
        dir: PathBuf,

        #[command(subcommand)]
        action: SessionAction,
    },
}

#[derive(Subcommand)]
enum SessionAction {
    /// Sign in
    Login {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// Show the signed-in user
    Show,
    /// Sign out
    Logout,
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

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed => commands::seed::demo_users().await?,
        Commands::Catalog { category, sort } => commands::catalog::browse(&category, &sort).await?,
        Commands::Session { dir, action } => match action {
            SessionAction::Login { email, password } => {
                commands::session::login(&dir, email, password).await?;
            }
            SessionAction::Show => commands::session::show(&dir).await?,
            SessionAction::Logout => commands::session::logout(&dir).await?,
        },
    }
    Ok(())
}
