//! Common error types for eaf2txt

use std::path::PathBuf;
use thiserror::Error;

/// Common result type for eaf2txt operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy shared by the converter and the database sink
#[derive(Error, Debug)]
pub enum Error {
    /// XML is structurally invalid or lacks a required attribute/child.
    /// `context` names the offending node (tier, annotation, element).
    #[error("Malformed EAF input ({context}): {message}")]
    MalformedInput { context: String, message: String },

    /// Some reference annotations never reached an aligned annotation
    #[error(
        "{count} annotation(s) could not be resolved to a time range \
         (broken or cyclic references): {}",
        .annotation_ids.join(", ")
    )]
    UnresolvedReference {
        count: usize,
        annotation_ids: Vec<String>,
    },

    /// The file has already been logged to the database
    #[error("EAF file {0} has been added to the database earlier")]
    DuplicateFile(String),

    /// Database operation requested against a path with no database
    #[error(
        "Database file {} does not exist. Create it first with `eaf2txt-create-db {}`.",
        .0.display(),
        .0.display()
    )]
    MissingDatabase(PathBuf),

    /// Refusing to create a database over an existing file
    #[error("Can't create database: file {} already exists.", .0.display())]
    DatabaseExists(PathBuf),

    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Shorthand for building a [`Error::MalformedInput`]
    pub fn malformed(context: impl Into<String>, message: impl Into<String>) -> Self {
        Error::MalformedInput {
            context: context.into(),
            message: message.into(),
        }
    }
}
