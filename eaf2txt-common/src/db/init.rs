//! Database creation and connection

use crate::db::schema::{create_tables, TABLES};
use crate::{Error, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::io;
use std::path::Path;
use tracing::{info, warn};

/// Create a new annotation database at `db_path`.
///
/// Never overwrites: fails with [`Error::DatabaseExists`] if the file is
/// already there. If the tables cannot be created the new file is removed
/// again.
pub async fn create_database(db_path: &Path) -> Result<()> {
    create_database_with(db_path, &TABLES).await
}

async fn create_database_with(db_path: &Path, tables: &[(&str, &str)]) -> Result<()> {
    if db_path.exists() {
        return Err(Error::DatabaseExists(db_path.to_path_buf()));
    }

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    if let Err(e) = initialize(db_path, tables).await {
        discard_partial_database(db_path);
        return Err(e);
    }

    info!("Initialized new database: {}", db_path.display());
    Ok(())
}

async fn initialize(db_path: &Path, tables: &[(&str, &str)]) -> Result<()> {
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    let result = async {
        let mut tx = pool.begin().await?;
        create_tables(&mut tx, tables).await?;
        tx.commit().await?;
        Ok::<(), Error>(())
    }
    .await;
    pool.close().await;
    result
}

fn discard_partial_database(db_path: &Path) {
    match std::fs::remove_file(db_path) {
        Ok(()) => warn!("Removed incomplete database {}", db_path.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!("Could not remove incomplete database {}: {}", db_path.display(), e),
    }
}

/// Open an existing annotation database.
///
/// A missing file is reported as [`Error::MissingDatabase`] instead of being
/// created implicitly.
pub async fn open_database(db_path: &Path) -> Result<SqlitePool> {
    if !db_path.is_file() {
        return Err(Error::MissingDatabase(db_path.to_path_buf()));
    }

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(false)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    info!("Opened existing database: {}", db_path.display());
    Ok(pool)
}
