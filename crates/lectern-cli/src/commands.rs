//! Subcommand implementations. Each returns a JSON value for `main` to print.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use serde_json::{json, Value};
use tracing::info;

use lectern_core::{LecternConfig, License};
use lectern_extract::{Ingester, NewBook};
use lectern_store::SqliteStore;

/// Parsed arguments of `lectern ingest`.
#[derive(Debug, PartialEq)]
pub struct IngestArgs {
    pub file: PathBuf,
    pub title: String,
    pub author: Option<String>,
    pub license: License,
}

impl IngestArgs {
    /// Parse `<file> --title T --license L [--author A]`.
    pub fn parse(args: &[String]) -> anyhow::Result<Self> {
        let mut file = None;
        let mut title = None;
        let mut author = None;
        let mut license = None;

        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--title" | "--author" | "--license" => {
                    let value = iter
                        .next()
                        .ok_or_else(|| anyhow!("{arg} needs a value"))?
                        .clone();
                    match arg.as_str() {
                        "--title" => title = Some(value),
                        "--author" => author = Some(value),
                        _ => license = Some(value.parse::<License>()?),
                    }
                }
                flag if flag.starts_with("--") => bail!("Unknown option: {flag}"),
                path if file.is_none() => file = Some(PathBuf::from(path)),
                extra => bail!("Unexpected argument: {extra}"),
            }
        }

        let title = title.ok_or_else(|| anyhow!("--title is required"))?;
        if title.trim().is_empty() {
            bail!("--title must not be empty");
        }

        Ok(Self {
            file: file.ok_or_else(|| anyhow!("missing <file>"))?,
            title,
            author,
            license: license.ok_or_else(|| anyhow!("--license is required"))?,
        })
    }
}

pub fn parse_doc_id(raw: Option<&String>) -> anyhow::Result<i64> {
    let raw = raw.ok_or_else(|| anyhow!("missing <doc-id>"))?;
    raw.parse()
        .with_context(|| format!("not a document id: {raw}"))
}

/// Extract and analyze a file without touching the store.
pub async fn analyze(path: PathBuf) -> anyhow::Result<Value> {
    let items = tokio::task::spawn_blocking(move || -> lectern_core::Result<_> {
        let pages = lectern_extract::extract_pages(&path)?;
        Ok(lectern_extract::analyze(&pages))
    })
    .await??;
    Ok(json!({ "count": items.len(), "items": items }))
}

pub async fn ingest(
    config: Arc<LecternConfig>,
    store: Arc<SqliteStore>,
    args: IngestArgs,
) -> anyhow::Result<Value> {
    let outcome = tokio::task::spawn_blocking(move || {
        let book = NewBook {
            title: args.title,
            author: args.author,
            license: args.license,
        };
        Ingester::new(&store, &config).ingest_file(&args.file, book)
    })
    .await??;
    Ok(serde_json::to_value(outcome)?)
}

pub async fn reanalyze(
    config: Arc<LecternConfig>,
    store: Arc<SqliteStore>,
    doc_id: i64,
) -> anyhow::Result<Value> {
    let report =
        tokio::task::spawn_blocking(move || Ingester::new(&store, &config).reanalyze(doc_id))
            .await??;
    Ok(serde_json::to_value(report)?)
}

pub fn items(store: &SqliteStore, doc_id: i64) -> anyhow::Result<Value> {
    let doc = store
        .get_document(doc_id)?
        .ok_or_else(|| anyhow!("document {doc_id} not found"))?;
    let counts = store.count_items_by_kind(doc_id)?;
    let items = store.get_items(doc_id)?;
    Ok(json!({
        "document": doc,
        "counts": counts,
        "total": counts.total(),
        "items": items,
    }))
}

pub fn documents(store: &SqliteStore) -> anyhow::Result<Value> {
    let docs = store.list_documents()?;
    let mut rows = Vec::with_capacity(docs.len());
    for doc in docs {
        let counts = store.count_items_by_kind(doc.id)?;
        let mut row = serde_json::to_value(&doc)?;
        row["itemCounts"] = serde_json::to_value(counts)?;
        rows.push(row);
    }
    Ok(Value::Array(rows))
}

pub fn open_store(config: &LecternConfig) -> anyhow::Result<SqliteStore> {
    let store = SqliteStore::open(&config.data_paths.db).map_err(|e| {
        anyhow!("Failed to open store at {}: {}", config.data_paths.db.display(), e)
    })?;
    if let Some(path) = store.db_path() {
        info!("Database: {}", path.display());
    }
    Ok(store)
}
