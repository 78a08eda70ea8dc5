//! Restaurant review ingestion into a local vector collection.
//!
//! tastebud loads a JSON dataset of restaurants and their reviews, cleans the
//! text, embeds each restaurant through a remote embedding API, and stores the
//! vectors in a persistent collection for later similarity search.
//!
//! # Architecture
//!
//! - **Normalization**: lowercase, tokenize, keep alphabetic non-stopword tokens
//! - **Embeddings**: OpenAI `/embeddings`, one request per document
//! - **Storage**: SQLite with [sqlite-vec](https://github.com/asg017/sqlite-vec);
//!   each collection gets a vec0 table in its configured distance space
//! - **Driver**: a single sequential pass, LOAD → NORMALIZE → EMBED → STORE
//!
//! # Modules
//!
//! - [`config`] — Settings from TOML + env vars, credentials from JSON
//! - [`normalize`] — Text cleaning and the English stopword list
//! - [`dataset`] — Restaurant records and their cleaned documents
//! - [`embedding`] — Embedding provider trait and the OpenAI client
//! - [`db`] — SQLite initialization, schema, and migrations
//! - [`collection`] — Collections, entry insertion, and store statistics
//! - [`pipeline`] — The ingestion driver
//! - [`error`] — Error types for each pipeline concern

pub mod cli;
pub mod collection;
pub mod config;
pub mod dataset;
pub mod db;
pub mod embedding;
pub mod error;
pub mod normalize;
pub mod pipeline;
