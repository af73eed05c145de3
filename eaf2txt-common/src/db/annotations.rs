//! Annotation database operations

use crate::models::OutputRow;
use crate::{Error, Result};
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

/// Log the annotations of one EAF file.
///
/// Registers `eaf_filename` and inserts every row in a single transaction.
/// A filename that is already registered fails with
/// [`Error::DuplicateFile`] and leaves the database untouched.
///
/// Returns the id of the new `ProcessedFiles` row.
pub async fn add_annotations(
    pool: &SqlitePool,
    eaf_filename: &str,
    rows: &[OutputRow],
) -> Result<i64> {
    let mut tx = pool.begin().await?;

    let inserted = sqlx::query("INSERT INTO ProcessedFiles (filename) VALUES (?)")
        .bind(eaf_filename)
        .execute(&mut *tx)
        .await;

    let file_id = match inserted {
        Ok(result) => result.last_insert_rowid(),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            return Err(Error::DuplicateFile(eaf_filename.to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    for row in rows {
        sqlx::query(
            r#"
            INSERT INTO Annotations (tier_id, participant, "start", "end", duration, value, file_id)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&row.tier_id)
        .bind(&row.participant)
        .bind(row.start)
        .bind(row.end)
        .bind(row.duration)
        .bind(&row.value)
        .bind(file_id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    info!(
        "Logged {} annotations from {} (file id {})",
        rows.len(),
        eaf_filename,
        file_id
    );
    Ok(file_id)
}

/// True if `eaf_filename` is already registered
pub async fn is_processed(pool: &SqlitePool, eaf_filename: &str) -> Result<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ProcessedFiles WHERE filename = ?")
        .bind(eaf_filename)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

/// Load the annotations logged for `eaf_filename`, in insertion order
pub async fn load_annotations(pool: &SqlitePool, eaf_filename: &str) -> Result<Vec<OutputRow>> {
    let rows = sqlx::query(
        r#"
        SELECT a.tier_id, a.participant, a."start", a."end", a.duration, a.value
        FROM ProcessedFiles f
        INNER JOIN Annotations a ON f._id = a.file_id
        WHERE f.filename = ?
        ORDER BY a._id
        "#,
    )
    .bind(eaf_filename)
    .fetch_all(pool)
    .await?;

    debug!("Loaded {} annotations for {}", rows.len(), eaf_filename);

    Ok(rows
        .into_iter()
        .map(|row| OutputRow {
            tier_id: row.get("tier_id"),
            participant: row.get("participant"),
            start: row.get("start"),
            end: row.get("end"),
            duration: row.get("duration"),
            value: row.get("value"),
        })
        .collect())
}

/// Count all logged annotations across files
pub async fn count_annotations(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM Annotations")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
