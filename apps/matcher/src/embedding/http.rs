//! HTTP embedding client for OpenAI-compatible `/embeddings` endpoints
//! (OpenAI, Text Embeddings Inference, Ollama, vLLM, ...).
//!
//! Request:  `{ "model": "...", "input": ["...", ...] }`
//! Response: `{ "data": [{ "index": 0, "embedding": [...] }, ...] }`
//!
//! Retries on 429 and 5xx with exponential backoff. Any other failure is
//! returned immediately; the engine decides how to degrade.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{EmbeddingError, EmbeddingProvider};

const MAX_RETRIES: u32 = 3;

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingDatum {
    #[serde(default)]
    index: Option<usize>,
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct HttpEmbeddingClient {
    client: Client,
    url: String,
    model: String,
    api_key: Option<String>,
    /// Learned from the first successful response when not configured.
    dimension: std::sync::Arc<std::sync::OnceLock<usize>>,
}

impl HttpEmbeddingClient {
    pub fn new(
        url: String,
        model: String,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, EmbeddingError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url,
            model,
            api_key,
            dimension: Default::default(),
        })
    }

    /// Pins the vector dimension up front instead of learning it. A later
    /// pin replaces an earlier one.
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = std::sync::Arc::new(std::sync::OnceLock::from(dimension));
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn call(&self, texts: &[String]) -> Result<EmbeddingResponse, EmbeddingError> {
        let request_body = EmbeddingRequest {
            model: &self.model,
            input: texts,
        };

        let mut last_error: Option<EmbeddingError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // 500ms, 1s
                let delay = Duration::from_millis(500 * (1 << (attempt - 1)));
                warn!(
                    "Embedding call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let mut request = self.client.post(&self.url).json(&request_body);
            if let Some(key) = &self.api_key {
                request = request.bearer_auth(key);
            }

            let response = match request.send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(EmbeddingError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Embedding API returned {}: {}", status, body);
                last_error = Some(EmbeddingError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(EmbeddingError::Api {
                    status: status.as_u16(),
                    message: api_error_message(body),
                });
            }

            let body = response.text().await?;
            let parsed: EmbeddingResponse = serde_json::from_str(&body)?;
            debug!(
                inputs = texts.len(),
                vectors = parsed.data.len(),
                "Embedding call succeeded"
            );
            return Ok(parsed);
        }

        Err(last_error.unwrap_or(EmbeddingError::Api {
            status: 429,
            message: format!("rate limited after {MAX_RETRIES} attempts"),
        }))
    }
}

/// Extracts `error.message` from a JSON error body, else returns the body as is.
fn api_error_message(body: String) -> String {
    serde_json::from_str::<ApiError>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body)
}

/// Orders vectors by their `index` field when the server provides one.
fn into_vectors(mut data: Vec<EmbeddingDatum>) -> Vec<Vec<f32>> {
    if data.iter().all(|d| d.index.is_some()) {
        data.sort_by_key(|d| d.index);
    }
    data.into_iter().map(|d| d.embedding).collect()
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingClient {
    fn name(&self) -> &str {
        "http"
    }

    /// 0 until the first response arrives, unless pinned with `with_dimension`.
    fn dimension(&self) -> usize {
        self.dimension.get().copied().unwrap_or(0)
    }

    async fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let response = self.call(texts).await?;
        let vectors = into_vectors(response.data);
        if vectors.len() != texts.len() {
            return Err(EmbeddingError::EmptyResponse {
                expected: texts.len(),
                actual: vectors.len(),
            });
        }

        let actual = vectors[0].len();
        let expected = *self.dimension.get_or_init(|| actual);
        if let Some(bad) = vectors.iter().find(|v| v.len() != expected) {
            return Err(EmbeddingError::DimensionMismatch {
                expected,
                actual: bad.len(),
            });
        }
        Ok(vectors)
    }
}
