//! OfferDesk CLI - database migrations and development tooling.
//!
//! # Usage
//!
//! ```bash
//! # Run admin database migrations
//! offerdesk-cli migrate
//!
//! # Seed local development data
//! offerdesk-cli seed --shop dev-shop.myplatform.test
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Seed the database with development data

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::print_stdout)]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "offerdesk-cli")]
#[command(author, version, about = "OfferDesk CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database with development data
    Seed {
        /// Shop domain to seed under
        #[arg(short, long, default_value = "dev-shop.myplatform.test")]
        shop: String,
    },
}

#[tokio::main]
async fn main() {
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
        Commands::Seed { shop } => commands::seed::run(&shop).await?,
    }
    Ok(())
}
