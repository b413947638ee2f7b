//! Bakugai CLI - Database migrations and benchmark data tools.
//!
//! # Usage
//!
//! ```bash
//! # Create the storefront tables
//! bakugai-cli migrate
//!
//! # Load the default seed set (5,000 users, 10,000 products, ...)
//! bakugai-cli seed
//!
//! # Smaller data set for local work
//! bakugai-cli seed --users 50 --products 200 --comments 1000 --histories 2000
//!
//! # Remove everything written since seeding
//! bakugai-cli initialize
//! ```
//!
//! Connection settings come from the same `BAKUGAI_DB_*` variables the
//! storefront reads.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

use bakugai_core::{CommentId, HistoryId, ProductId, UserId};

mod commands;

#[derive(Parser)]
#[command(name = "bakugai-cli")]
#[command(author, version, about = "Bakugai CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run storefront database migrations
    Migrate,
    /// Fill an empty database with generated benchmark data
    Seed {
        /// Number of users
        #[arg(long, default_value_t = UserId::SEED_MAX)]
        users: i32,

        /// Number of products
        #[arg(long, default_value_t = ProductId::SEED_MAX)]
        products: i32,

        /// Number of comments
        #[arg(long, default_value_t = CommentId::SEED_MAX)]
        comments: i32,

        /// Number of purchase histories
        #[arg(long, default_value_t = HistoryId::SEED_MAX)]
        histories: i32,

        /// Random seed, so repeated runs produce the same data
        #[arg(long, default_value_t = 20_160_101)]
        seed: u64,
    },
    /// Delete every row created after seeding
    Initialize,
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
        Commands::Migrate => commands::migrate::storefront().await?,
        Commands::Seed {
            users,
            products,
            comments,
            histories,
            seed,
        } => {
            let plan = commands::seed::SeedPlan {
                users,
                products,
                comments,
                histories,
            };
            commands::seed::run(plan, seed).await?;
        }
        Commands::Initialize => commands::initialize::run().await?,
    }
    Ok(())
}
