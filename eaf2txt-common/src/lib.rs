//! # eaf2txt Common Library
//!
//! Shared code for the eaf2txt tools including:
//! - Error taxonomy
//! - Annotation row model
//! - Configuration loading
//! - SQLite annotation database (schema and inserts)

pub mod config;
pub mod db;
pub mod error;
pub mod models;

pub use error::{Error, Result};
pub use models::OutputRow;
