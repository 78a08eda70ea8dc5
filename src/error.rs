//! Error taxonomy for the ingestion pipeline.
//!
//! Each pipeline concern has its own error type; [`IngestError`] unifies them
//! so the driver can propagate any failure with `?`. Nothing here is retried
//! or recovered: a failure aborts the run.

use std::path::PathBuf;

use thiserror::Error;

/// Missing or malformed settings / credentials.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings TOML {}", path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to parse credentials JSON {}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("failed to build HTTP client")]
    HttpClient(#[source] reqwest::Error),
}

/// Missing or malformed dataset file.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("failed to read dataset {}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse dataset {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure of the remote embedding service.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding request failed")]
    Http(#[from] reqwest::Error),

    #[error("embedding service rejected credentials (HTTP {status}): {message}")]
    Authentication { status: u16, message: String },

    #[error("embedding service rate limit hit: {message}")]
    RateLimited { message: String },

    #[error("embedding service returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("failed to decode embedding response")]
    Decode(#[source] reqwest::Error),

    #[error("embedding response contained no vectors")]
    EmptyResponse,
}

/// Failure of the local vector store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to create storage directory {}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to open vector database at {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error("failed to encode entry metadata")]
    Metadata(#[from] serde_json::Error),

    #[error("invalid collection name {0:?}: expected 3-63 characters of [A-Za-z0-9._-], starting and ending alphanumeric")]
    InvalidCollectionName(String),

    #[error("collection not found: {0}")]
    CollectionNotFound(String),

    #[error("unknown distance metric stored for collection {collection}: {metric}")]
    UnknownMetric { collection: String, metric: String },

    #[error("id {id:?} already exists in collection {collection}")]
    DuplicateId { collection: String, id: String },

    #[error("embedding has {actual} dimensions but collection {collection} stores {expected}")]
    DimensionMismatch {
        collection: String,
        expected: usize,
        actual: usize,
    },

    #[error("refusing to store an empty embedding for id {0:?}")]
    EmptyEmbedding(String),
}

/// Any failure that aborts an ingestion run.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("configuration error")]
    Configuration(#[from] ConfigError),

    #[error("data load error")]
    DataLoad(#[from] DataLoadError),

    #[error("external service error")]
    ExternalService(#[from] EmbeddingError),

    #[error("storage error")]
    Storage(#[from] StorageError),
}
