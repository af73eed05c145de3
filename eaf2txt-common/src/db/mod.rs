//! Annotation database: schema, creation and inserts

pub mod annotations;
pub mod init;
pub mod schema;

pub use annotations::*;
pub use init::*;
pub use sqlx::SqlitePool;
