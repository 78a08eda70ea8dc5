use rusqlite::Connection;
use serde::Serialize;
use std::path::Path;

use super::store::{count_entries, list_collections};
use super::types::DistanceMetric;
use crate::error::StorageError;

/// Summary of one collection.
#[derive(Debug, Serialize)]
pub struct CollectionSummary {
    pub name: String,
    pub metric: DistanceMetric,
    pub dimension: Option<usize>,
    pub entries: u64,
    pub created_at: String,
}

/// Response from [`store_stats`].
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub collections: Vec<CollectionSummary>,
    pub total_entries: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding_model: Option<String>,
    pub db_size_bytes: u64,
}

/// Compute vector store statistics.
///
/// `db_path` is used for file size calculation; pass None for in-memory databases.
pub fn store_stats(conn: &Connection, db_path: Option<&Path>) -> Result<StatsResponse, StorageError> {
    let collections = list_collections(conn)?
        .into_iter()
        .map(|collection| {
            let entries = count_entries(conn, &collection)?;
            Ok(CollectionSummary {
                name: collection.name,
                metric: collection.metric,
                dimension: collection.dimension,
                entries,
                created_at: collection.created_at,
            })
        })
        .collect::<Result<Vec<_>, StorageError>>()?;

    let total_entries = collections.iter().map(|c| c.entries).sum();
    let embedding_model = crate::db::migrations::get_embedding_model(conn)?;

    let db_size_bytes = db_path
        .and_then(|p| std::fs::metadata(p).ok())
        .map(|m| m.len())
        .unwrap_or(0);

    Ok(StatsResponse {
        collections,
        total_entries,
        embedding_model,
        db_size_bytes,
    })
}
