//! Text-to-vector embedding through a remote API.
//!
//! Provides the [`EmbeddingProvider`] trait and an OpenAI implementation. The
//! provider is created via [`create_provider`] from configuration and the
//! credentials file.

pub mod openai;

use crate::config::{EmbeddingConfig, OpenAiCredentials};
use crate::error::{ConfigError, EmbeddingError};

/// Trait for embedding text into vectors.
///
/// One call embeds one text. Failures are returned as-is; implementations do
/// not retry.
pub trait EmbeddingProvider {
    /// Embed a single text string into a vector.
    #[allow(async_fn_in_trait)]
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Identifier of the model producing the vectors.
    fn model(&self) -> &str;
}

/// Create an embedding provider from config.
///
/// Currently only `"openai"` is supported.
pub fn create_provider(
    config: &EmbeddingConfig,
    credentials: &OpenAiCredentials,
) -> Result<openai::OpenAiEmbeddingProvider, ConfigError> {
    match config.provider.as_str() {
        "openai" => openai::OpenAiEmbeddingProvider::new(config, credentials),
        other => Err(ConfigError::Invalid(format!(
            "unknown embedding provider: {other}. Supported: openai"
        ))),
    }
}
