//! Annotation database creation utility
//!
//! **Usage:**
//! ```bash
//! eaf2txt-create-db <DATABASE>
//! ```
//!
//! Creates an empty database with the `ProcessedFiles` and `Annotations`
//! tables. An existing file is never overwritten.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use eaf2txt_common::db::create_database;
use tracing::info;

/// Create an annotation database for eaf2txt
#[derive(Parser, Debug)]
#[command(name = "eaf2txt-create-db")]
#[command(about = "Creates an empty annotation database for eaf2txt --database")]
#[command(version)]
struct Args {
    /// Path of the database file to create
    #[arg(value_name = "DATABASE")]
    database: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();

    info!(
        "eaf2txt-create-db v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    create_database(&args.database)
        .await
        .with_context(|| format!("Failed to create database {}", args.database.display()))?;

    println!("Created {}", args.database.display());
    Ok(())
}
