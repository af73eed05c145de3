//! Table schema definitions
//!
//! Executed once, when the database file is created.

use crate::Result;
use sqlx::{Sqlite, Transaction};
use tracing::debug;

/// Registry of EAF files whose annotations have been logged
pub const CREATE_PROCESSED_FILES_TABLE: &str = r#"
CREATE TABLE ProcessedFiles (
    _id INTEGER PRIMARY KEY AUTOINCREMENT,
    filename TEXT UNIQUE
)
"#;

/// One row per exported annotation, linked to its source file
pub const CREATE_ANNOTATIONS_TABLE: &str = r#"
CREATE TABLE Annotations (
    _id INTEGER PRIMARY KEY AUTOINCREMENT,
    tier_id TEXT NOT NULL,
    participant TEXT NOT NULL,
    "start" INTEGER NOT NULL,
    "end" INTEGER NOT NULL,
    duration INTEGER NOT NULL,
    value TEXT NOT NULL,
    file_id INTEGER NOT NULL,
    FOREIGN KEY (file_id) REFERENCES ProcessedFiles (_id)
)
"#;

/// All tables, in creation order
pub const TABLES: [(&str, &str); 2] = [
    ("ProcessedFiles", CREATE_PROCESSED_FILES_TABLE),
    ("Annotations", CREATE_ANNOTATIONS_TABLE),
];

/// Create the given `(name, ddl)` tables inside the transaction
pub async fn create_tables(tx: &mut Transaction<'_, Sqlite>, tables: &[(&str, &str)]) -> Result<()> {
    for &(name, ddl) in tables {
        sqlx::query(ddl).execute(&mut **tx).await?;
        debug!("Created table {}", name);
    }
    Ok(())
}
