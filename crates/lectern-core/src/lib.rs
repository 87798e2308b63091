//! Lectern Core: error type, configuration, and the extracted-item model.

pub mod config;
pub mod error;
pub mod item;

pub use config::{DataPaths, LecternConfig};
pub use error::{Error, Result};
pub use item::{ExtractedItem, ItemKind, License};
