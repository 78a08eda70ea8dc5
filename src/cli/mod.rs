pub mod ingest;
pub mod stats;
