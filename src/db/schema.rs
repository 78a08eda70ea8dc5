//! SQL DDL for the vector store.
//!
//! Defines the `collections`, `collection_entries` and `schema_meta` tables.
//! Each collection's vectors live in their own vec0 table, created when the
//! first entry fixes the collection's dimension (see [`vec_table_sql`]). All
//! static DDL uses `IF NOT EXISTS` for idempotent initialization.

use rusqlite::Connection;

use crate::collection::types::DistanceMetric;

const SCHEMA_SQL: &str = r#"
-- Named collections
CREATE TABLE IF NOT EXISTS collections (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    distance_metric TEXT NOT NULL CHECK(distance_metric IN ('cosine','l2')),
    dimension INTEGER CHECK(dimension IS NULL OR dimension > 0),
    created_at TEXT NOT NULL
);

-- Document text and metadata for every stored vector
CREATE TABLE IF NOT EXISTS collection_entries (
    collection_id INTEGER NOT NULL REFERENCES collections(id) ON DELETE CASCADE,
    id TEXT NOT NULL,
    document TEXT NOT NULL,
    metadata TEXT,
    created_at TEXT NOT NULL,
    PRIMARY KEY (collection_id, id)
);

-- Schema metadata
CREATE TABLE IF NOT EXISTS schema_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// Name of the vec0 table backing a collection.
pub fn vec_table_name(collection_id: i64) -> String {
    format!("collection_vec_{collection_id}")
}

/// vec0 DDL for one collection (sqlite-vec syntax).
pub fn vec_table_sql(collection_id: i64, dimension: usize, metric: DistanceMetric) -> String {
    format!(
        "CREATE VIRTUAL TABLE IF NOT EXISTS {} USING vec0(
            id TEXT PRIMARY KEY,
            embedding FLOAT[{dimension}] distance_metric={}
        );",
        vec_table_name(collection_id),
        metric.as_str(),
    )
}

/// Initialize all schema tables. Idempotent (uses IF NOT EXISTS).
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('schema_version', '1')",
        [],
    )?;

    Ok(())
}
