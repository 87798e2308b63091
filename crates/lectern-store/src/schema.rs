//! Database schema SQL.

/// Core tables: documents, extracted_items.
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS documents (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    author TEXT,
    license TEXT NOT NULL,
    source_path TEXT,
    metadata_json TEXT,
    created_at INTEGER NOT NULL,
    analyzed_at INTEGER
);

CREATE TABLE IF NOT EXISTS extracted_items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    doc_id INTEGER NOT NULL REFERENCES documents(id) ON DELETE CASCADE,
    kind TEXT NOT NULL CHECK (kind IN ('quote', 'verse', 'code')),
    content TEXT NOT NULL,
    page_number INTEGER NOT NULL,
    position INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_items_doc_order ON extracted_items(doc_id, page_number, position);
CREATE INDEX IF NOT EXISTS idx_items_kind ON extracted_items(doc_id, kind);
"#;
