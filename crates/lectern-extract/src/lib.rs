//! Lectern Extract: turns per-page document text into quotes, verses and code snippets.
//!
//! Pipeline: [`pages`] pulls ordered page text out of a source file,
//! [`normalize`] cleans each page, the [`scan`] generators collect typed
//! candidates, and [`analyze`] deduplicates, sorts and caps the result.
//! [`ingest`] wires this to the store for automatic and on-demand analysis.

pub mod analyze;
pub mod classify;
pub mod ingest;
pub mod normalize;
pub mod pages;
pub mod scan;

pub use analyze::{analyze, MAX_ITEMS};
pub use ingest::{AnalysisReport, IngestOutcome, Ingester, NewBook};
pub use normalize::normalize;
pub use pages::{extract_pages, PageBackend, PageExtractor, SourceKind};
