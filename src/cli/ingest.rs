//! CLI `ingest` command — load, clean, embed, and store the dataset.

use anyhow::{Context, Result};
use std::path::Path;

use crate::collection::store::{count_entries, find_collection};
use crate::config::{OpenAiCredentials, TastebudConfig};
use crate::db;
use crate::embedding::{self, EmbeddingProvider};
use crate::normalize::TextNormalizer;
use crate::pipeline;

/// Run the ingestion pipeline with the given settings.
///
/// `dataset` overrides the configured dataset path.
pub async fn ingest(config: &TastebudConfig, dataset: Option<&Path>) -> Result<()> {
    let credentials_path = config.resolved_credentials_path();
    let credentials = OpenAiCredentials::load(&credentials_path)
        .with_context(|| format!("failed to load credentials from {}", credentials_path.display()))?;
    let provider = embedding::create_provider(&config.embedding, &credentials)
        .context("failed to create embedding provider")?;

    let db_path = config.resolved_db_path();
    let mut conn = db::open_database(&db_path)?;

    // Vectors from different models are not comparable.
    if let Some(stored_model) = db::migrations::get_embedding_model(&conn)? {
        let existing = match find_collection(&conn, &config.storage.collection)? {
            Some(collection) => count_entries(&conn, &collection)?,
            None => 0,
        };
        if stored_model != provider.model() && existing > 0 {
            tracing::warn!(
                stored = %stored_model,
                configured = %provider.model(),
                "collection holds vectors from a different embedding model"
            );
        }
    }

    let normalizer = TextNormalizer::english().with_extra_stopwords(&config.dataset.extra_stopwords);
    let dataset_path = dataset
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.resolved_dataset_path());

    let report = pipeline::run(
        &mut conn,
        &config.storage.collection,
        config.storage.distance_metric,
        &provider,
        &normalizer,
        &dataset_path,
    )
    .await?;

    if report.inserted > 0 {
        db::migrations::set_embedding_model(&conn, provider.model())?;
    }

    println!("Ingestion complete:");
    println!("  Collection:   {} ({})", report.collection, report.metric);
    println!("  Documents:    {}", report.documents);
    println!("  Inserted:     {}", report.inserted);
    if let Some(dimension) = report.dimension {
        println!("  Dimension:    {dimension}");
    }
    println!("  Database:     {}", db_path.display());

    Ok(())
}
