//! Per-file conversion pipeline used by the command-line tool:
//! convert, write `.txt`, optionally summarize and log to the database.

use crate::convert::{convert_eaf_to_rows, write_txt};
use crate::eaf::{summarize, RowOrder, Summary};
use eaf2txt_common::db::{add_annotations, SqlitePool};
use eaf2txt_common::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// What to do with each file
#[derive(Debug, Clone, Copy, Default)]
pub struct ConvertOptions {
    pub order: RowOrder,
    pub summary: bool,
}

/// Outcome of converting one file
#[derive(Debug, Clone)]
pub struct FileReport {
    pub eaf_path: PathBuf,
    pub txt_path: PathBuf,
    pub rows: usize,
    /// Present when requested via [`ConvertOptions::summary`]
    pub summary: Option<Summary>,
    /// `ProcessedFiles` id when logged to a database
    pub file_id: Option<i64>,
}

/// Convert one file and, if a database is given, log its annotations.
///
/// The `.txt` file is written before logging, so a [`Error::DuplicateFile`]
/// still leaves a fresh conversion on disk.
pub async fn process_file(
    eaf_path: &Path,
    options: &ConvertOptions,
    db: Option<&SqlitePool>,
) -> Result<FileReport> {
    let rows = convert_eaf_to_rows(eaf_path, options.order)?;
    let txt_path = write_txt(eaf_path, &rows)?;
    let summary = options.summary.then(|| summarize(&rows));

    let file_id = match db {
        Some(pool) => {
            let filename = eaf_path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| eaf_path.display().to_string());
            Some(add_annotations(pool, &filename, &rows).await?)
        }
        None => None,
    };

    Ok(FileReport {
        eaf_path: eaf_path.to_path_buf(),
        txt_path,
        rows: rows.len(),
        summary,
        file_id,
    })
}

/// Convert every `*.eaf` file in `dir`, in sorted order.
///
/// A file whose annotations were logged before is converted again but only
/// warned about; any other error stops the run. `on_file` sees each report
/// as soon as its file is done. Skipped files are not in the returned list.
pub async fn process_directory(
    dir: &Path,
    options: &ConvertOptions,
    db: Option<&SqlitePool>,
    mut on_file: impl FnMut(&FileReport),
) -> Result<Vec<FileReport>> {
    let files = find_eaf_files(dir)?;
    if files.is_empty() {
        warn!("No EAF files found in {}", dir.display());
    }

    let mut reports = Vec::with_capacity(files.len());
    for path in &files {
        info!("Converting {}", path.display());
        match process_file(path, options, db).await {
            Ok(report) => {
                on_file(&report);
                reports.push(report);
            }
            Err(e) if is_already_processed(&e) => {
                warn!("Skipping database logging for {}: {}", path.display(), e);
            }
            Err(e) => {
                warn!("Stopping at {}", path.display());
                return Err(e);
            }
        }
    }

    info!("Converted {} of {} files in {}", reports.len(), files.len(), dir.display());
    Ok(reports)
}

/// `*.eaf` files directly inside `dir` (not recursive), sorted by path
pub fn find_eaf_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "eaf") {
            files.push(path);
        }
    }
    files.sort();
    debug!("Found {} EAF files in {}", files.len(), dir.display());
    Ok(files)
}

/// True for errors that only mean "this file was logged before"
pub fn is_already_processed(err: &Error) -> bool {
    matches!(err, Error::DuplicateFile(_))
}
