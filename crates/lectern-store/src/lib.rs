//! Lectern Store: SQLite persistence for documents and their extracted items.

pub mod schema;
pub mod sqlite;
pub mod types;

pub use sqlite::SqliteStore;
pub use types::*;
