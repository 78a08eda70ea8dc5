//! OpenAI embeddings client.
//!
//! Implements [`EmbeddingProvider`] against the `/embeddings` endpoint. One
//! request per text, no retry, no timeout: every failure is returned to the
//! caller.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use super::EmbeddingProvider;
use crate::config::{EmbeddingConfig, OpenAiCredentials};
use crate::error::{ConfigError, EmbeddingError};

const ORGANIZATION_HEADER: &str = "openai-organization";
const PROJECT_HEADER: &str = "openai-project";

/// Embeddings client for OpenAI-compatible endpoints.
#[derive(Debug, Clone)]
pub struct OpenAiEmbeddingProvider {
    client: Client,
    endpoint: String,
    model: String,
}

impl OpenAiEmbeddingProvider {
    pub fn new(
        config: &EmbeddingConfig,
        credentials: &OpenAiCredentials,
    ) -> Result<Self, ConfigError> {
        if config.model.trim().is_empty() {
            return Err(ConfigError::Invalid("embedding model name is empty".into()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            header_value(&format!("Bearer {}", credentials.api_key.trim()), "API key")?,
        );
        if let Some(org) = &credentials.organization {
            headers.insert(
                HeaderName::from_static(ORGANIZATION_HEADER),
                header_value(org.trim(), "organization id")?,
            );
        }
        if let Some(project) = &credentials.project {
            headers.insert(
                HeaderName::from_static(PROJECT_HEADER),
                header_value(project.trim(), "project id")?,
            );
        }

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(ConfigError::HttpClient)?;
        let endpoint = format!("{}/embeddings", config.base_url.trim_end_matches('/'));

        tracing::info!(endpoint = %endpoint, model = %config.model, "embedding client ready");

        Ok(Self {
            client,
            endpoint,
            model: config.model.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn header_value(value: &str, what: &str) -> Result<HeaderValue, ConfigError> {
    let mut value = HeaderValue::from_str(value)
        .map_err(|_| ConfigError::Invalid(format!("{what} is not a valid HTTP header value")))?;
    value.set_sensitive(true);
    Ok(value)
}

impl EmbeddingProvider for OpenAiEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let request = EmbeddingRequest {
            model: &self.model,
            input: text,
            encoding_format: "float",
        };

        let response = self.client.post(&self.endpoint).json(&request).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = api_error_message(&body);
            tracing::error!(status = status.as_u16(), %message, "embedding request rejected");
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    EmbeddingError::Authentication {
                        status: status.as_u16(),
                        message,
                    }
                }
                StatusCode::TOO_MANY_REQUESTS => EmbeddingError::RateLimited { message },
                _ => EmbeddingError::Status {
                    status: status.as_u16(),
                    message,
                },
            });
        }

        let parsed: EmbeddingResponse = response.json().await.map_err(EmbeddingError::Decode)?;
        parsed
            .data
            .into_iter()
            .min_by_key(|entry| entry.index)
            .map(|entry| entry.embedding)
            .ok_or(EmbeddingError::EmptyResponse)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// The API's `error.message` if the body carries one, else the raw body.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|parsed| parsed.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
    encoding_format: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiError,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}
