use std::path::PathBuf;

use anyhow::{Context, Result};
use bookshelf::{logging::init_logger, seed, Settings};
use bookshelf_orm::Database;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "bookshelf", version, about = "Book catalog and admin panel")]
struct Cli {
    /// Debug logging for bookshelf and the ORM (`RUST_LOG` takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create missing tables and serve the site (default)
    Serve,
    /// Create missing tables, then exit
    Migrate,
    /// Load books from a JSON fixture
    Seed {
        path: PathBuf,
        /// Drop and recreate the book table first
        #[arg(long)]
        reset: bool,
    },
}

#[rocket::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let figment = Settings::figment();
    let settings: Settings = figment.extract().context("invalid configuration")?;

    let database = Database::new(&settings.database_url)
        .await
        .map_err(|e| anyhow::anyhow!(e))
        .with_context(|| format!("failed to connect to {}", settings.database_url))?;
    database
        .migrate()
        .await
        .map_err(|e| anyhow::anyhow!(e))
        .context("failed to migrate")?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            bookshelf::build(figment, database)?
                .launch()
                .await
                .context("failed to launch rocket instance")?;
        }
        Command::Migrate => tracing::info!("tables are up to date"),
        Command::Seed { path, reset } => {
            let count = seed::load(&path, reset, &database)
                .await
                .with_context(|| format!("failed to seed from {}", path.display()))?;
            println!("Loaded {count} books from {}", path.display());
        }
    }

    Ok(())
}
