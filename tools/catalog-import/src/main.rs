//! Catalog import: bulk-loads ingredients and tags from headerless CSV files.
//!
//! ```bash
//! DATABASE_URL=postgres://... catalog-import ingredients --file data/ingredients.csv
//! DATABASE_URL=postgres://... catalog-import tags --file data/tags.csv
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sea_orm::Database;

mod rows;
mod store;

#[derive(Parser)]
#[command(about = "Import reference data into the recipes database")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rows of `name,measurement_unit`
    Ingredients {
        #[arg(long)]
        file: PathBuf,
    },
    /// Rows of `name,color,slug`
    Tags {
        #[arg(long)]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    foodgram_core::tracing::init_tracing();
    let args = Args::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
    let db = Database::connect(&database_url)
        .await
        .context("failed to connect to database")?;

    let (kind, read, inserted) = match args.command {
        Command::Ingredients { file } => {
            let rows = rows::read_ingredients(&file)?;
            let inserted = store::insert_ingredients(&db, rows.clone()).await?;
            ("ingredients", rows.len(), inserted)
        }
        Command::Tags { file } => {
            let rows = rows::read_tags(&file)?;
            let inserted = store::insert_tags(&db, rows.clone()).await?;
            ("tags", rows.len(), inserted)
        }
    };

    tracing::info!(kind, read, inserted, "catalog import finished");
    println!("success, inserted: {inserted}");
    Ok(())
}
