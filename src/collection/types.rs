//! Collection type definitions.
//!
//! Defines [`DistanceMetric`] (the similarity space of a collection),
//! [`Collection`] (a row of the `collections` table) and [`CollectionEntry`]
//! (one stored document).

use serde::{Deserialize, Serialize};

/// Similarity space a collection's vec0 table is built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// Compare vector direction only.
    #[default]
    Cosine,
    /// Euclidean distance.
    L2,
}

impl DistanceMetric {
    /// SQL-compatible string representation, also the sqlite-vec option value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cosine => "cosine",
            Self::L2 => "l2",
        }
    }
}

impl std::fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DistanceMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cosine" => Ok(Self::Cosine),
            "l2" => Ok(Self::L2),
            _ => Err(format!("unknown distance metric: {s}")),
        }
    }
}

/// A named collection, matching the `collections` table schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Collection {
    /// Row id; also names the backing vec0 table.
    pub id: i64,
    pub name: String,
    pub metric: DistanceMetric,
    /// Vector length, fixed by the first stored entry. `None` while empty.
    pub dimension: Option<usize>,
    /// ISO 8601 creation timestamp.
    pub created_at: String,
}

/// One entry to add to a collection.
#[derive(Debug, Clone, Copy)]
pub struct CollectionEntry<'a> {
    pub id: &'a str,
    pub embedding: &'a [f32],
    pub document: &'a str,
    pub metadata: Option<&'a serde_json::Value>,
}
