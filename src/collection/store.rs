//! Write path: collection creation and entry insertion.
//!
//! [`get_or_create_collection`] is idempotent per name. [`add_entry`] runs a
//! single transaction per entry: dimension check (fixing the dimension and
//! creating the vec0 table on first insert), duplicate-id check, document row
//! insert, vector insert.

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::embedding_to_bytes;
use super::types::{Collection, CollectionEntry, DistanceMetric};
use crate::db::schema::{vec_table_name, vec_table_sql};
use crate::error::StorageError;

/// Check a collection name: 3-63 characters of `[A-Za-z0-9._-]`, starting and
/// ending alphanumeric, without `..`.
pub fn validate_collection_name(name: &str) -> Result<(), StorageError> {
    let len_ok = (3..=63).contains(&name.len());
    let chars_ok = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    let ends_ok = name.chars().next().is_some_and(|c| c.is_ascii_alphanumeric())
        && name.chars().last().is_some_and(|c| c.is_ascii_alphanumeric());

    if len_ok && chars_ok && ends_ok && !name.contains("..") {
        Ok(())
    } else {
        Err(StorageError::InvalidCollectionName(name.to_string()))
    }
}

/// Open the named collection, creating it with `metric` if absent.
///
/// Repeated calls return the same collection. An existing collection keeps
/// the metric it was created with.
pub fn get_or_create_collection(
    conn: &Connection,
    name: &str,
    metric: DistanceMetric,
) -> Result<Collection, StorageError> {
    validate_collection_name(name)?;

    let now = chrono::Utc::now().to_rfc3339();
    let created = conn.execute(
        "INSERT OR IGNORE INTO collections (name, distance_metric, created_at) VALUES (?1, ?2, ?3)",
        params![name, metric.as_str(), now],
    )?;

    let collection = find_collection(conn, name)?
        .ok_or_else(|| StorageError::CollectionNotFound(name.to_string()))?;

    if created > 0 {
        tracing::info!(collection = %name, metric = %metric, "collection created");
    } else if collection.metric != metric {
        tracing::warn!(
            collection = %name,
            stored = %collection.metric,
            requested = %metric,
            "collection exists with a different distance metric; keeping the stored one"
        );
    } else {
        tracing::debug!(collection = %name, "collection opened");
    }

    Ok(collection)
}

/// Look up a collection by name.
pub fn find_collection(conn: &Connection, name: &str) -> Result<Option<Collection>, StorageError> {
    let row = conn
        .query_row(
            "SELECT id, name, distance_metric, dimension, created_at FROM collections WHERE name = ?1",
            params![name],
            collection_row,
        )
        .optional()?;

    row.map(into_collection).transpose()
}

/// All collections, oldest first.
pub fn list_collections(conn: &Connection) -> Result<Vec<Collection>, StorageError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, distance_metric, dimension, created_at FROM collections ORDER BY id",
    )?;
    let rows = stmt
        .query_map([], collection_row)?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter().map(into_collection).collect()
}

/// Raw `collections` row; the metric is parsed afterwards so an unknown value
/// surfaces as a [`StorageError`].
type CollectionRow = (i64, String, String, Option<i64>, String);

fn collection_row(row: &Row<'_>) -> rusqlite::Result<CollectionRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
}

fn into_collection(
    (id, name, metric, dimension, created_at): CollectionRow,
) -> Result<Collection, StorageError> {
    let metric = metric
        .parse::<DistanceMetric>()
        .map_err(|_| StorageError::UnknownMetric {
            collection: name.clone(),
            metric,
        })?;
    Ok(Collection {
        id,
        name,
        metric,
        dimension: dimension.map(|d| d as usize),
        created_at,
    })
}

/// Insert one entry. Inserting an id that already exists in the collection
/// fails with [`StorageError::DuplicateId`]; nothing is overwritten.
pub fn add_entry(
    conn: &mut Connection,
    collection: &Collection,
    entry: CollectionEntry<'_>,
) -> Result<(), StorageError> {
    if entry.embedding.is_empty() {
        return Err(StorageError::EmptyEmbedding(entry.id.to_string()));
    }

    let tx = conn.transaction()?;

    // 1. Dimension gate. The stored row is authoritative, not the caller's copy.
    let stored: Option<(Option<i64>, String)> = tx
        .query_row(
            "SELECT dimension, distance_metric FROM collections WHERE id = ?1",
            params![collection.id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;
    let (dimension, metric) =
        stored.ok_or_else(|| StorageError::CollectionNotFound(collection.name.clone()))?;

    match dimension {
        Some(expected) if expected as usize != entry.embedding.len() => {
            return Err(StorageError::DimensionMismatch {
                collection: collection.name.clone(),
                expected: expected as usize,
                actual: entry.embedding.len(),
            });
        }
        Some(_) => {}
        None => {
            let metric = metric
                .parse::<DistanceMetric>()
                .map_err(|_| StorageError::UnknownMetric {
                    collection: collection.name.clone(),
                    metric,
                })?;
            fix_dimension(&tx, collection, entry.embedding.len(), metric)?;
        }
    }

    // 2. Duplicate gate
    let exists: bool = tx.query_row(
        "SELECT COUNT(*) > 0 FROM collection_entries WHERE collection_id = ?1 AND id = ?2",
        params![collection.id, entry.id],
        |row| row.get(0),
    )?;
    if exists {
        return Err(StorageError::DuplicateId {
            collection: collection.name.clone(),
            id: entry.id.to_string(),
        });
    }

    // 3. Document row
    let now = chrono::Utc::now().to_rfc3339();
    let metadata_json = entry.metadata.map(serde_json::to_string).transpose()?;
    tx.execute(
        "INSERT INTO collection_entries (collection_id, id, document, metadata, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![collection.id, entry.id, entry.document, metadata_json, now],
    )?;

    // 4. Vector
    tx.execute(
        &format!(
            "INSERT INTO {} (id, embedding) VALUES (?1, ?2)",
            vec_table_name(collection.id)
        ),
        params![entry.id, embedding_to_bytes(entry.embedding)],
    )?;

    tx.commit()?;
    tracing::trace!(collection = %collection.name, id = %entry.id, "entry stored");
    Ok(())
}

/// Record the collection's dimension and create its vec0 table.
fn fix_dimension(
    conn: &Connection,
    collection: &Collection,
    dimension: usize,
    metric: DistanceMetric,
) -> Result<(), StorageError> {
    conn.execute(
        "UPDATE collections SET dimension = ?1 WHERE id = ?2",
        params![dimension as i64, collection.id],
    )?;
    conn.execute_batch(&vec_table_sql(collection.id, dimension, metric))?;
    tracing::info!(
        collection = %collection.name,
        dimension,
        metric = %metric,
        "collection dimension fixed"
    );
    Ok(())
}

/// Number of entries stored in a collection.
pub fn count_entries(conn: &Connection, collection: &Collection) -> Result<u64, StorageError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM collection_entries WHERE collection_id = ?1",
        params![collection.id],
        |row| row.get(0),
    )?;
    Ok(count as u64)
}
