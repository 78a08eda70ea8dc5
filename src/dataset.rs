//! Restaurant dataset loading.
//!
//! Reads a JSON array of restaurant records and derives one cleaned document
//! per record, in input order. The index of a record is its join key with the
//! cleaned document and, later, its id in the collection.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::DataLoadError;
use crate::normalize::TextNormalizer;

/// One restaurant as it appears in the dataset file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub name: String,
    pub address: String,
    pub reviews: Reviews,
}

/// Reviews are either a single blob of text or a list of individual reviews.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reviews {
    One(String),
    Many(Vec<String>),
}

impl Reviews {
    /// All review text joined with single spaces.
    pub fn joined(&self) -> String {
        match self {
            Self::One(text) => text.clone(),
            Self::Many(items) => items.join(" "),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::One(_) => 1,
            Self::Many(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Restaurant {
    /// Raw text fed to the normalizer: `"{name} {address} {reviews}"`.
    pub fn document_text(&self) -> String {
        format!("{} {} {}", self.name, self.address, self.reviews.joined())
    }

    /// Metadata stored alongside the embedding.
    pub fn metadata(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name,
            "address": self.address,
        })
    }
}

/// Read the restaurant records from a JSON file.
pub fn load_restaurants(path: impl AsRef<Path>) -> Result<Vec<Restaurant>, DataLoadError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|source| DataLoadError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&json).map_err(|source| DataLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Clean every record's text with `normalizer`, preserving order.
pub fn clean_documents(restaurants: &[Restaurant], normalizer: &TextNormalizer) -> Vec<String> {
    restaurants
        .iter()
        .map(|r| normalizer.normalize(&r.document_text()))
        .collect()
}
