//! Ingestion and analysis triggers: file → uploads → document row → items.

use std::path::{Path, PathBuf};

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::analyze::analyze;
use crate::pages::{extract_pages, SourceKind};
use lectern_core::{Error, LecternConfig, License, Result};
use lectern_store::{NewDocument, SqliteStore};

/// Caller-supplied details for a new book.
#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub author: Option<String>,
    pub license: License,
}

impl NewBook {
    pub fn new(title: impl Into<String>, license: License) -> Self {
        Self {
            title: title.into(),
            author: None,
            license,
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }
}

/// Result of ingesting one source file.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestOutcome {
    pub doc_id: i64,
    /// Whether the automatic analysis ran to completion.
    pub auto_analyzed: bool,
    pub items_extracted: usize,
}

/// Result of one analysis run over a stored document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub doc_id: i64,
    pub items_extracted: usize,
    pub analyzed_at: i64,
}

/// Handles document ingestion and the analysis triggers around it.
pub struct Ingester<'a> {
    store: &'a SqliteStore,
    config: &'a LecternConfig,
}

impl<'a> Ingester<'a> {
    pub fn new(store: &'a SqliteStore, config: &'a LecternConfig) -> Self {
        Self { store, config }
    }

    /// Ingest a source file.
    ///
    /// The file is copied into the uploads directory and recorded as a
    /// document. Open-distribution books are analyzed straight away; if
    /// that analysis fails the book is still ingested and can be
    /// re-analyzed later.
    pub fn ingest_file(&self, path: &Path, book: NewBook) -> Result<IngestOutcome> {
        SourceKind::from_path(path)?;

        let size = std::fs::metadata(path)?.len();
        if size > self.config.max_upload_bytes {
            return Err(Error::Ingest(format!(
                "{} is {} bytes, limit is {}",
                path.display(),
                size,
                self.config.max_upload_bytes
            )));
        }

        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("document");

        let bytes = std::fs::read(path)?;
        let stored_path = self.store_upload(filename, &bytes)?;

        let metadata = serde_json::json!({
            "source": "file",
            "filename": filename,
            "fileSize": size,
            "contentHash": content_hash(&bytes),
        });

        let inserted = self.store.add_document(NewDocument {
            title: book.title,
            author: book.author,
            license: book.license,
            source_path: Some(stored_path.to_string_lossy().into_owned()),
            metadata: Some(metadata),
            created_at: None,
        });
        let doc_id = match inserted {
            Ok(id) => id,
            Err(e) => {
                if let Err(rm) = std::fs::remove_file(&stored_path) {
                    warn!("Could not remove {}: {}", stored_path.display(), rm);
                }
                return Err(e);
            }
        };
        info!("Ingested {} as document {}", filename, doc_id);

        if !book.license.is_open_distribution() {
            debug!(
                "Document {} is {}, skipping automatic analysis",
                doc_id, book.license
            );
            return Ok(IngestOutcome {
                doc_id,
                auto_analyzed: false,
                items_extracted: 0,
            });
        }

        match self.analyze_source(doc_id, &stored_path) {
            Ok(report) => Ok(IngestOutcome {
                doc_id,
                auto_analyzed: true,
                items_extracted: report.items_extracted,
            }),
            Err(e) => {
                warn!("Automatic analysis of document {} failed: {}", doc_id, e);
                Ok(IngestOutcome {
                    doc_id,
                    auto_analyzed: false,
                    items_extracted: 0,
                })
            }
        }
    }

    /// Re-run analysis for a stored document, replacing its items.
    ///
    /// Not safe to call concurrently for the same document.
    pub fn reanalyze(&self, doc_id: i64) -> Result<AnalysisReport> {
        let doc = self
            .store
            .get_document(doc_id)?
            .ok_or_else(|| Error::NotFound(format!("document {doc_id}")))?;

        let source = doc
            .source_path
            .ok_or_else(|| Error::Ingest(format!("document {doc_id} has no source file")))?;

        self.analyze_source(doc_id, Path::new(&source))
    }

    fn analyze_source(&self, doc_id: i64, source: &Path) -> Result<AnalysisReport> {
        let pages = extract_pages(source)?;
        let items = analyze(&pages);
        let analyzed_at = chrono::Utc::now().timestamp_millis();
        let items_extracted = self.store.replace_items_at(doc_id, &items, analyzed_at)?;

        info!(
            "Analyzed document {}: {} pages, {} items",
            doc_id,
            pages.len(),
            items_extracted
        );
        Ok(AnalysisReport {
            doc_id,
            items_extracted,
            analyzed_at,
        })
    }

    fn store_upload(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        let name = format!(
            "{}-{}",
            chrono::Utc::now().timestamp_millis(),
            sanitize_filename(filename)
        );
        let dest = self.config.data_paths.uploads.join(name);
        std::fs::write(&dest, bytes)?;
        debug!("Stored upload at {}", dest.display());
        Ok(dest)
    }
}

/// Keep alphanumerics, spaces, `-`, `_` and `.`; drop everything else.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_' | '.'))
        .collect()
}

/// Compute SHA-256 content hash.
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
