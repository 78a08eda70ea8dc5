#![allow(dead_code)]

use std::cell::Cell;
use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tastebud::collection::store::find_collection;
use tastebud::collection::types::Collection;
use tastebud::db;
use tastebud::embedding::EmbeddingProvider;
use tastebud::error::EmbeddingError;

/// Open a fresh in-memory database with schema and migrations applied.
pub fn test_db() -> Connection {
    db::open_memory_database().unwrap()
}

/// Collection the pipeline tests ingest into.
pub const COLLECTION: &str = "restaurant_collection";

/// The test collection, if a run has created it.
pub fn stored_collection(conn: &Connection) -> Option<Collection> {
    find_collection(conn, COLLECTION).unwrap()
}

/// Write `json` to `restaurants.json` inside `dir`.
pub fn write_dataset(dir: &Path, json: &str) -> PathBuf {
    let path = dir.join("restaurants.json");
    std::fs::write(&path, json).unwrap();
    path
}

/// A three-restaurant dataset.
pub const THREE_RESTAURANTS: &str = r#"[
    {"name": "Taco Spot", "address": "1 Main St", "reviews": "The tacos were great!! 5/5"},
    {"name": "Noodle Bar", "address": "2 Elm St", "reviews": ["Rich broth", "Slow service"]},
    {"name": "Pizza Place", "address": "3 Oak Ave", "reviews": "Crispy crust, fresh basil."}
]"#;

/// Deterministic 8-dim embedding derived from the text.
pub fn fake_embedding(text: &str) -> Vec<f32> {
    let mut v = vec![0.0f32; 8];
    for (i, b) in text.bytes().enumerate() {
        v[i % 8] += b as f32;
    }
    v[0] += 1.0;
    v
}

/// Embedding provider that never touches the network.
///
/// Counts calls and can be told to fail with an authentication error on the
/// call with index `fail_at`.
pub struct FakeEmbedder {
    pub calls: Cell<usize>,
    pub fail_at: Option<usize>,
    pub seen: std::cell::RefCell<Vec<String>>,
}

impl FakeEmbedder {
    pub fn new() -> Self {
        Self {
            calls: Cell::new(0),
            fail_at: None,
            seen: Default::default(),
        }
    }

    pub fn failing_at(index: usize) -> Self {
        Self {
            fail_at: Some(index),
            ..Self::new()
        }
    }
}

impl EmbeddingProvider for FakeEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let call = self.calls.get();
        self.calls.set(call + 1);
        self.seen.borrow_mut().push(text.to_string());
        if self.fail_at == Some(call) {
            return Err(EmbeddingError::Authentication {
                status: 401,
                message: "Incorrect API key provided".into(),
            });
        }
        Ok(fake_embedding(text))
    }

    fn model(&self) -> &str {
        "fake-embedding"
    }
}

/// Ids stored in a collection, in insertion order.
pub fn stored_ids(conn: &Connection, collection: &Collection) -> Vec<String> {
    conn.prepare(
        "SELECT id FROM collection_entries WHERE collection_id = ?1 ORDER BY rowid",
    )
    .unwrap()
    .query_map([collection.id], |row| row.get(0))
    .unwrap()
    .collect::<Result<Vec<_>, _>>()
    .unwrap()
}
