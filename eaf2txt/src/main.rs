//! eaf2txt - Converts EAF files to tab-delimited txt files
//!
//! Converts a single file (`--file`) or every `*.eaf` file in a directory
//! (`--directory`). Optionally prints a per-participant summary and logs the
//! annotations into a database created with `eaf2txt-create-db`.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{ArgGroup, Parser};
use eaf2txt::batch::{process_directory, process_file, ConvertOptions, FileReport};
use eaf2txt::RowOrder;
use eaf2txt_common::config::{resolve_database_path, DATABASE_ENV_VAR};
use eaf2txt_common::db::open_database;
use tracing::info;

/// Command-line arguments for eaf2txt
#[derive(Parser, Debug)]
#[command(name = "eaf2txt")]
#[command(about = "Converts EAF files to tab-delimited txt files.")]
#[command(version)]
#[command(group(ArgGroup::new("input").required(true).args(["file", "directory"])))]
struct Args {
    /// Path to the EAF file
    #[arg(short, long, value_name = "EAF_FILE")]
    file: Option<PathBuf>,

    /// Path to a directory with EAF files
    #[arg(short, long, value_name = "DIRECTORY")]
    directory: Option<PathBuf>,

    /// Print a short summary after each conversion
    #[arg(long)]
    summary: bool,

    /// Keep annotations in document order instead of sorting chronologically
    #[arg(long)]
    unordered: bool,

    /// Database to log annotations into [env: EAF2TXT_DATABASE]
    #[arg(long, value_name = "DATABASE")]
    database: Option<PathBuf>,
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
        "eaf2txt v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let options = ConvertOptions {
        order: if args.unordered {
            RowOrder::Document
        } else {
            RowOrder::Chronological
        },
        summary: args.summary,
    };

    let db = match resolve_database_path(args.database.as_deref(), DATABASE_ENV_VAR)? {
        Some(path) => {
            info!("Logging annotations to {}", path.display());
            Some(open_database(&path).await?)
        }
        None => None,
    };

    if let Some(path) = &args.file {
        if !path.exists() {
            bail!("File {} does not exist", path.display());
        }
        if !path.is_file() {
            bail!("{} is not a file", path.display());
        }
        info!("Converting {}", path.display());
        let report = process_file(path, &options, db.as_ref())
            .await
            .with_context(|| format!("Failed to convert {}", path.display()))?;
        print_summary(&report);
    }

    if let Some(dir) = &args.directory {
        if !dir.exists() {
            bail!("Directory {} does not exist", dir.display());
        }
        if !dir.is_dir() {
            bail!("{} is not a directory", dir.display());
        }

        process_directory(dir, &options, db.as_ref(), print_summary)
            .await
            .with_context(|| format!("Failed to convert {}", dir.display()))?;
    }

    if let Some(pool) = db {
        pool.close().await;
    }

    Ok(())
}

fn print_summary(report: &FileReport) {
    if let Some(summary) = &report.summary {
        println!("{}", summary);
    }
}
