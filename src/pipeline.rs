//! Ingestion driver: LOAD → NORMALIZE → EMBED → STORE → DONE.
//!
//! The stages run once, in order, on the calling task. Every embedding
//! request is awaited before the next one is sent, and all embeddings are
//! obtained before anything is stored. The collection is opened (and created
//! if absent) only when STORE begins, so a load or embedding failure leaves
//! the store untouched. A storage failure part-way through STORE leaves the
//! entries written before it in place; there is no checkpoint to resume from.

use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use rusqlite::Connection;
use serde::Serialize;

use crate::collection::store::{add_entry, get_or_create_collection, validate_collection_name};
use crate::collection::types::{Collection, CollectionEntry, DistanceMetric};
use crate::dataset::{self, Restaurant};
use crate::embedding::EmbeddingProvider;
use crate::error::{EmbeddingError, IngestError, StorageError};
use crate::normalize::TextNormalizer;

/// Pipeline states, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    Normalize,
    Embed,
    Store,
    Done,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Normalize => "normalize",
            Self::Embed => "embed",
            Self::Store => "store",
            Self::Done => "done",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestReport {
    pub collection: String,
    /// Metric of the collection; the stored one if it already existed.
    pub metric: DistanceMetric,
    /// Records read from the dataset.
    pub documents: usize,
    /// Entries added to the collection.
    pub inserted: usize,
    /// Length of the stored vectors, `None` when nothing was embedded.
    pub dimension: Option<usize>,
}

/// Run the whole pipeline into the collection named `collection`, created
/// with `metric` if it does not exist yet.
pub async fn run<E: EmbeddingProvider>(
    conn: &mut Connection,
    collection: &str,
    metric: DistanceMetric,
    embedder: &E,
    normalizer: &TextNormalizer,
    dataset_path: &Path,
) -> Result<IngestReport, IngestError> {
    validate_collection_name(collection)?;

    enter(Stage::Load);
    let restaurants = dataset::load_restaurants(dataset_path)?;
    tracing::info!(path = %dataset_path.display(), records = restaurants.len(), "dataset loaded");

    enter(Stage::Normalize);
    let documents = dataset::clean_documents(&restaurants, normalizer);

    enter(Stage::Embed);
    let embeddings = embed_documents(embedder, &documents).await?;

    enter(Stage::Store);
    let collection = get_or_create_collection(conn, collection, metric)?;
    let inserted = store_documents(conn, &collection, &restaurants, &documents, &embeddings)?;

    enter(Stage::Done);
    let report = IngestReport {
        collection: collection.name,
        metric: collection.metric,
        documents: documents.len(),
        inserted,
        dimension: embeddings.first().map(Vec::len),
    };
    tracing::info!(
        collection = %report.collection,
        documents = report.documents,
        inserted = report.inserted,
        "ingestion complete"
    );
    Ok(report)
}

fn enter(stage: Stage) {
    tracing::info!(stage = %stage, "pipeline stage");
}

/// Embed each document in order, one request at a time.
pub async fn embed_documents<E: EmbeddingProvider>(
    embedder: &E,
    documents: &[String],
) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    if documents.is_empty() {
        return Ok(Vec::new());
    }

    tracing::info!(
        documents = documents.len(),
        model = %embedder.model(),
        "embedding documents"
    );

    let pb = ProgressBar::new(documents.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  {bar:40.cyan/blue} {pos}/{len} ({eta})")
            .expect("valid template")
            .progress_chars("##-"),
    );

    let mut embeddings = Vec::with_capacity(documents.len());
    for (index, document) in documents.iter().enumerate() {
        match embedder.embed(document).await {
            Ok(embedding) => embeddings.push(embedding),
            Err(e) => {
                pb.abandon();
                tracing::error!(index, error = %e, "embedding failed; aborting run");
                return Err(e);
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    Ok(embeddings)
}

/// Insert entry `i` with id `"i"` for every embedded document.
pub fn store_documents(
    conn: &mut Connection,
    collection: &Collection,
    restaurants: &[Restaurant],
    documents: &[String],
    embeddings: &[Vec<f32>],
) -> Result<usize, StorageError> {
    let mut inserted = 0;
    for (index, ((restaurant, document), embedding)) in restaurants
        .iter()
        .zip(documents)
        .zip(embeddings)
        .enumerate()
    {
        let id = index.to_string();
        let metadata = restaurant.metadata();
        add_entry(
            conn,
            collection,
            CollectionEntry {
                id: &id,
                embedding,
                document,
                metadata: Some(&metadata),
            },
        )?;
        inserted += 1;
    }
    Ok(inserted)
}
