//! SQLite-backed store for documents and extracted items.
//!
//! The item set of a document is only ever replaced wholesale; see
//! [`SqliteStore::replace_items`].

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::schema::SCHEMA_SQL;
use crate::types::*;
use lectern_core::{Error, ExtractedItem, ItemKind, License, Result};

const DOCUMENT_COLUMNS: &str =
    "id, title, author, license, source_path, metadata_json, created_at, analyzed_at";

/// SQLite store holding documents and their extracted items.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    db_path: Option<PathBuf>,
}

impl SqliteStore {
    /// Open or create the SQLite store.
    ///
    /// `db_dir` is the directory (e.g., `data/db/`). The file will be `db_dir/lectern.db`.
    pub fn open(db_dir: impl AsRef<Path>) -> Result<Self> {
        let db_dir = db_dir.as_ref();
        std::fs::create_dir_all(db_dir).map_err(|e| Error::Storage(e.to_string()))?;
        let db_path = db_dir.join("lectern.db");

        let conn = Connection::open(&db_path).map_err(|e| Error::Database(e.to_string()))?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA foreign_keys = ON;
             PRAGMA synchronous = NORMAL;",
        )
        .map_err(|e| Error::Database(e.to_string()))?;
        Self::init_schema(&conn)?;

        let store = Self {
            conn: Mutex::new(conn),
            db_path: Some(db_path),
        };

        info!(
            "SqliteStore initialized: {} documents, path={}",
            store.count_documents()?,
            db_dir.display()
        );
        Ok(store)
    }

    /// Open a private in-memory store.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| Error::Database(e.to_string()))?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(|e| Error::Database(e.to_string()))?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            db_path: None,
        })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(SCHEMA_SQL)
            .map_err(|e| Error::Database(format!("Schema init failed: {}", e)))?;
        Ok(())
    }

    /// Location of the database file, if file-backed.
    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    // ---------------------------------------------------------------
    // Document CRUD
    // ---------------------------------------------------------------

    /// Insert a document. Returns the new document ID.
    pub fn add_document(&self, doc: NewDocument) -> Result<i64> {
        let now = doc.created_at.unwrap_or_else(now_millis);
        let meta_json = doc
            .metadata
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let conn = self.conn.lock();
        let id = conn
            .prepare_cached(
                "INSERT INTO documents (title, author, license, source_path, metadata_json, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )
            .map_err(|e| Error::Database(e.to_string()))?
            .insert(params![
                doc.title,
                doc.author,
                doc.license.as_str(),
                doc.source_path,
                meta_json,
                now
            ])
            .map_err(|e| Error::Database(e.to_string()))?;
        debug!("Added document {} ({})", id, doc.title);
        Ok(id)
    }

    /// Get a document by ID.
    pub fn get_document(&self, doc_id: i64) -> Result<Option<Document>> {
        let conn = self.conn.lock();
        let sql = format!("SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = ?1");
        let doc = conn
            .prepare_cached(&sql)
            .map_err(|e| Error::Database(e.to_string()))?
            .query_row(params![doc_id], Self::row_to_document)
            .optional()
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(doc)
    }

    /// All documents, newest first.
    pub fn list_documents(&self) -> Result<Vec<Document>> {
        let conn = self.conn.lock();
        let sql = format!("SELECT {DOCUMENT_COLUMNS} FROM documents ORDER BY created_at DESC, id DESC");
        let mut stmt = conn
            .prepare_cached(&sql)
            .map_err(|e| Error::Database(e.to_string()))?;
        let docs = stmt
            .query_map([], Self::row_to_document)
            .map_err(|e| Error::Database(e.to_string()))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(docs)
    }

    pub fn count_documents(&self) -> Result<i64> {
        let conn = self.conn.lock();
        conn.query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))
            .map_err(|e| Error::Database(e.to_string()))
    }

    /// Delete a document and its items (cascade).
    pub fn delete_document(&self, doc_id: i64) -> Result<bool> {
        let conn = self.conn.lock();
        let count = conn
            .execute("DELETE FROM documents WHERE id = ?1", params![doc_id])
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(count > 0)
    }

    // ---------------------------------------------------------------
    // Extracted items
    // ---------------------------------------------------------------

    /// Replace the stored item set of a document.
    ///
    /// Runs as three separate steps in this order: delete the old items,
    /// insert the new ones, stamp `analyzed_at`. A failure part-way leaves
    /// either the old set or an empty set behind, both of which a retry
    /// repairs. Returns the number of inserted items.
    pub fn replace_items(&self, doc_id: i64, items: &[ExtractedItem]) -> Result<usize> {
        self.replace_items_at(doc_id, items, now_millis())
    }

    /// [`replace_items`](Self::replace_items) with an explicit analysis timestamp.
    pub fn replace_items_at(
        &self,
        doc_id: i64,
        items: &[ExtractedItem],
        analyzed_at: i64,
    ) -> Result<usize> {
        let conn = self.conn.lock();

        let exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM documents WHERE id = ?1)",
                params![doc_id],
                |row| row.get(0),
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        if !exists {
            return Err(Error::NotFound(format!("document {doc_id}")));
        }

        let removed = conn
            .execute("DELETE FROM extracted_items WHERE doc_id = ?1", params![doc_id])
            .map_err(|e| Error::Database(e.to_string()))?;

        {
            let mut stmt = conn
                .prepare_cached(
                    "INSERT INTO extracted_items (doc_id, kind, content, page_number, position)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                )
                .map_err(|e| Error::Database(e.to_string()))?;
            for item in items {
                stmt.execute(params![
                    doc_id,
                    item.kind.as_str(),
                    item.content,
                    item.page_number,
                    item.position
                ])
                .map_err(|e| Error::Database(e.to_string()))?;
            }
        }

        conn.execute(
            "UPDATE documents SET analyzed_at = ?1 WHERE id = ?2",
            params![analyzed_at, doc_id],
        )
        .map_err(|e| Error::Database(e.to_string()))?;

        info!(
            "Replaced items for document {}: removed {}, inserted {}",
            doc_id,
            removed,
            items.len()
        );
        Ok(items.len())
    }

    /// Stored items of a document ordered by page, then position.
    pub fn get_items(&self, doc_id: i64) -> Result<Vec<StoredItem>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached(
                "SELECT id, doc_id, kind, content, page_number, position
                 FROM extracted_items WHERE doc_id = ?1
                 ORDER BY page_number, position",
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        let items = stmt
            .query_map(params![doc_id], Self::row_to_item)
            .map_err(|e| Error::Database(e.to_string()))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(items)
    }

    pub fn count_items(&self, doc_id: i64) -> Result<i64> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT COUNT(*) FROM extracted_items WHERE doc_id = ?1",
            params![doc_id],
            |row| row.get(0),
        )
        .map_err(|e| Error::Database(e.to_string()))
    }

    /// Item tallies per type for one document.
    pub fn count_items_by_kind(&self, doc_id: i64) -> Result<ItemCounts> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached(
                "SELECT kind, COUNT(*) FROM extracted_items WHERE doc_id = ?1 GROUP BY kind",
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        let rows = stmt
            .query_map(params![doc_id], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })
            .map_err(|e| Error::Database(e.to_string()))?;

        let mut counts = ItemCounts::default();
        for row in rows {
            let (kind, count) = row.map_err(|e| Error::Database(e.to_string()))?;
            counts.add(kind.parse()?, count);
        }
        Ok(counts)
    }

    // ---------------------------------------------------------------
    // Row mapping
    // ---------------------------------------------------------------

    fn row_to_document(row: &rusqlite::Row<'_>) -> rusqlite::Result<Document> {
        let license: String = row.get(3)?;
        let license = license
            .parse::<License>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;
        let meta_str: Option<String> = row.get(5)?;
        Ok(Document {
            id: row.get(0)?,
            title: row.get(1)?,
            author: row.get(2)?,
            license,
            source_path: row.get(4)?,
            metadata: meta_str.and_then(|s| serde_json::from_str(&s).ok()),
            created_at: row.get(6)?,
            analyzed_at: row.get(7)?,
        })
    }

    fn row_to_item(row: &rusqlite::Row<'_>) -> rusqlite::Result<StoredItem> {
        let kind: String = row.get(2)?;
        let kind = kind
            .parse::<ItemKind>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;
        Ok(StoredItem {
            id: row.get(0)?,
            doc_id: row.get(1)?,
            item: ExtractedItem {
                kind,
                content: row.get(3)?,
                page_number: row.get(4)?,
                position: row.get(5)?,
            },
        })
    }
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
