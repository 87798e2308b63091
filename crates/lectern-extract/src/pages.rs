//! Page text extraction with backend fallback.
//!
//! A source file becomes an ordered list of page texts. PDF sources try
//! `lopdf` first and fall back to `pdf-extract` (both behind the `pdf`
//! feature); plain-text sources split pages on form feeds.

use std::path::Path;

use tracing::{debug, info, warn};

use lectern_core::{Error, Result};

/// Kind of source document, decided by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Pdf,
    Text,
}

impl SourceKind {
    /// Detect source kind from extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "txt" | "text" | "md" => Some(Self::Text),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| Error::Unsupported(path.display().to_string()))
    }
}

/// Something that turns raw document bytes into page texts.
pub trait PageBackend: Send + Sync {
    fn name(&self) -> &'static str;

    /// Page texts in document order. May contain blank pages.
    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<String>>;
}

/// UTF-8 text; pages are separated by form feed characters.
pub struct PlainTextBackend;

impl PageBackend for PlainTextBackend {
    fn name(&self) -> &'static str {
        "plain-text"
    }

    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<String>> {
        Ok(split_form_feeds(&String::from_utf8_lossy(bytes)))
    }
}

fn split_form_feeds(text: &str) -> Vec<String> {
    text.split('\u{c}').map(str::to_string).collect()
}

#[cfg(feature = "pdf")]
pub use pdf::{LopdfBackend, PdfExtractBackend};

#[cfg(feature = "pdf")]
mod pdf {
    use super::{split_form_feeds, PageBackend};
    use lectern_core::{Error, Result};

    /// Per-page text via `lopdf`.
    pub struct LopdfBackend;

    impl PageBackend for LopdfBackend {
        fn name(&self) -> &'static str {
            "lopdf"
        }

        fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<String>> {
            let doc = lopdf::Document::load_mem(bytes)
                .map_err(|e| Error::Extraction(format!("lopdf could not load document: {e}")))?;
            doc.get_pages()
                .keys()
                .map(|&page_no| {
                    doc.extract_text(&[page_no]).map_err(|e| {
                        Error::Extraction(format!("lopdf failed on page {page_no}: {e}"))
                    })
                })
                .collect()
        }
    }

    /// Whole-document text via `pdf-extract`, split on form feeds.
    pub struct PdfExtractBackend;

    impl PageBackend for PdfExtractBackend {
        fn name(&self) -> &'static str {
            "pdf-extract"
        }

        fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<String>> {
            // pdf-extract panics on some malformed inputs.
            let text = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes))
                .map_err(|_| Error::Extraction("pdf-extract panicked".to_string()))?
                .map_err(|e| Error::Extraction(format!("pdf-extract: {e}")))?;
            Ok(split_form_feeds(&text))
        }
    }
}

/// A primary backend plus an optional fallback.
pub struct PageExtractor {
    primary: Box<dyn PageBackend>,
    fallback: Option<Box<dyn PageBackend>>,
}

impl PageExtractor {
    pub fn new(primary: Box<dyn PageBackend>, fallback: Option<Box<dyn PageBackend>>) -> Self {
        Self { primary, fallback }
    }

    /// The backends used for a source kind.
    pub fn for_kind(kind: SourceKind) -> Result<Self> {
        match kind {
            SourceKind::Text => Ok(Self::new(Box::new(PlainTextBackend), None)),
            #[cfg(feature = "pdf")]
            SourceKind::Pdf => Ok(Self::new(
                Box::new(LopdfBackend),
                Some(Box::new(PdfExtractBackend)),
            )),
            #[cfg(not(feature = "pdf"))]
            SourceKind::Pdf => Err(Error::Unsupported(
                "PDF support is disabled (build with the `pdf` feature)".to_string(),
            )),
        }
    }

    /// Extract ordered, trimmed, non-empty pages.
    ///
    /// The fallback runs when the primary fails or finds no text. Errors
    /// only when every backend that ran failed; when they ran but found
    /// nothing, returns a single empty page.
    pub fn extract(&self, bytes: &[u8]) -> Result<Vec<String>> {
        let primary_err = match self.primary.extract_pages(bytes) {
            Ok(pages) => {
                let pages = usable_pages(pages);
                if !pages.is_empty() {
                    debug!("{} extracted {} pages", self.primary.name(), pages.len());
                    return Ok(pages);
                }
                debug!("{} found no usable text", self.primary.name());
                None
            }
            Err(e) => {
                warn!("{} failed: {}", self.primary.name(), e);
                Some(e)
            }
        };

        let Some(fallback) = &self.fallback else {
            return match primary_err {
                Some(e) => Err(e),
                None => Ok(vec![String::new()]),
            };
        };

        match fallback.extract_pages(bytes) {
            Ok(pages) => {
                let pages = usable_pages(pages);
                info!(
                    "Fallback {} extracted {} pages",
                    fallback.name(),
                    pages.len()
                );
                if pages.is_empty() {
                    Ok(vec![String::new()])
                } else {
                    Ok(pages)
                }
            }
            Err(fallback_err) => match primary_err {
                Some(primary_err) => Err(Error::Extraction(format!(
                    "{}: {}; {}: {}",
                    self.primary.name(),
                    primary_err,
                    fallback.name(),
                    fallback_err
                ))),
                None => {
                    warn!("{} failed: {}", fallback.name(), fallback_err);
                    Ok(vec![String::new()])
                }
            },
        }
    }
}

fn usable_pages(pages: Vec<String>) -> Vec<String> {
    pages
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

/// Read a source file and extract its pages.
///
/// Never returns an empty list: a document without usable text yields `[""]`.
/// Fails if the file cannot be read, its type is unsupported, or every
/// backend fails.
pub fn extract_pages(path: &Path) -> Result<Vec<String>> {
    let kind = SourceKind::from_path(path)?;
    let bytes = std::fs::read(path)?;
    let extractor = PageExtractor::for_kind(kind)?;
    let pages = extractor.extract(&bytes)?;
    debug!("{}: {} pages", path.display(), pages.len());
    Ok(pages)
}
