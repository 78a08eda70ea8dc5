use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::collection::types::DistanceMetric;
use crate::error::ConfigError;

/// Default settings file, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "tastebud.toml";

/// File name of the vector database inside the storage directory.
pub const DATABASE_FILE: &str = "vectors.sqlite3";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct TastebudConfig {
    pub logging: LoggingConfig,
    pub dataset: DatasetConfig,
    pub embedding: EmbeddingConfig,
    pub storage: StorageConfig,
    /// Settings file the values were read from; `None` when defaults were used.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DatasetConfig {
    pub path: String,
    pub extra_stopwords: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub provider: String,
    pub model: String,
    pub base_url: String,
    pub credentials_path: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the vector database.
    pub path: String,
    pub collection: String,
    pub distance_metric: DistanceMetric,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: "test_data/restaurants_with_reviews.json".into(),
            extra_stopwords: Vec::new(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "openai".into(),
            model: "text-embedding-3-small".into(),
            base_url: "https://api.openai.com/v1".into(),
            credentials_path: "config.json".into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: "chroma_db".into(),
            collection: "restaurant_collection".into(),
            distance_metric: DistanceMetric::Cosine,
        }
    }
}

impl TastebudConfig {
    /// Load `tastebud.toml` from the working directory (if it exists) then
    /// apply env var overrides.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            let mut config: TastebudConfig =
                toml::from_str(&contents).map_err(|source| ConfigError::Toml {
                    path: path.to_path_buf(),
                    source,
                })?;
            config.source = Some(path.to_path_buf());
            config
        } else {
            TastebudConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides (TASTEBUD_LOG_LEVEL,
    /// TASTEBUD_DATASET, TASTEBUD_STORAGE, TASTEBUD_COLLECTION).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("TASTEBUD_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = std::env::var("TASTEBUD_DATASET") {
            self.dataset.path = val;
        }
        if let Ok(val) = std::env::var("TASTEBUD_STORAGE") {
            self.storage.path = val;
        }
        if let Ok(val) = std::env::var("TASTEBUD_COLLECTION") {
            self.storage.collection = val;
        }
    }

    /// The database file inside the storage directory, with `~` expanded.
    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.path).join(DATABASE_FILE)
    }

    pub fn resolved_dataset_path(&self) -> PathBuf {
        expand_tilde(&self.dataset.path)
    }

    pub fn resolved_credentials_path(&self) -> PathBuf {
        expand_tilde(&self.embedding.credentials_path)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

/// OpenAI credentials, read from the JSON credentials file.
#[derive(Clone, Deserialize)]
pub struct OpenAiCredentials {
    #[serde(rename = "OPEN_AI_API_KEY")]
    pub api_key: String,
    #[serde(rename = "OPEN_AI_ORG_ID", default)]
    pub organization: Option<String>,
    #[serde(rename = "OPEN_AI_PROJECT_ID", default)]
    pub project: Option<String>,
}

impl std::fmt::Debug for OpenAiCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCredentials")
            .field("api_key", &"<redacted>")
            .field("organization", &self.organization)
            .field("project", &self.project)
            .finish()
    }
}

impl OpenAiCredentials {
    /// Read and validate the credentials file. Empty org/project ids are
    /// treated as absent.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let credentials: Self =
            serde_json::from_str(&contents).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        credentials.validated()
    }

    fn validated(mut self) -> Result<Self, ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::Invalid("OPEN_AI_API_KEY is empty".into()));
        }
        self.organization = self.organization.filter(|s| !s.trim().is_empty());
        self.project = self.project.filter(|s| !s.trim().is_empty());
        Ok(self)
    }
}
