//! Configuration and data directory management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Largest source file accepted for ingestion (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Paths to all Lectern data directories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPaths {
    /// Root data directory (e.g., `data/`).
    pub root: PathBuf,
    /// Database directory (`data/db/`).
    pub db: PathBuf,
    /// Ingested source documents (`data/uploads/`).
    pub uploads: PathBuf,
}

impl DataPaths {
    /// Create data paths from a root directory. Creates directories if needed.
    pub fn new(root: impl AsRef<Path>) -> std::io::Result<Self> {
        let root = root.as_ref().to_path_buf();
        let paths = Self {
            db: root.join("db"),
            uploads: root.join("uploads"),
            root,
        };
        paths.ensure_dirs()?;
        Ok(paths)
    }

    fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.db)?;
        std::fs::create_dir_all(&self.uploads)?;
        Ok(())
    }
}

/// Top-level Lectern configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LecternConfig {
    /// Data directory paths.
    pub data_paths: DataPaths,
    /// Maximum size of a source document accepted by ingestion.
    pub max_upload_bytes: u64,
}

impl LecternConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env(data_dir: impl AsRef<Path>) -> Result<Self> {
        let max_upload_bytes = match std::env::var("LECTERN_MAX_UPLOAD_BYTES") {
            Ok(raw) => raw.trim().parse().map_err(|_| {
                Error::Config(format!("LECTERN_MAX_UPLOAD_BYTES is not a byte count: {raw}"))
            })?,
            Err(_) => DEFAULT_MAX_UPLOAD_BYTES,
        };

        let data_paths = DataPaths::new(data_dir)?;
        tracing::debug!(
            "Configured data root {} (max upload {} bytes)",
            data_paths.root.display(),
            max_upload_bytes
        );

        Ok(Self {
            data_paths,
            max_upload_bytes,
        })
    }

    /// Configuration rooted at `data_dir` with default limits, ignoring the environment.
    pub fn with_defaults(data_dir: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            data_paths: DataPaths::new(data_dir)?,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_paths_created() {
        let dir = tempfile::TempDir::new().unwrap();
        let paths = DataPaths::new(dir.path().join("data")).unwrap();
        assert!(paths.db.is_dir());
        assert!(paths.uploads.is_dir());
        assert_eq!(paths.uploads, dir.path().join("data").join("uploads"));
    }

    #[test]
    fn test_default_limits() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = LecternConfig::with_defaults(dir.path()).unwrap();
        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
    }
}
