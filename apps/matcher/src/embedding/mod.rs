//! Embedding Provider — text → fixed-length vector.
//!
//! The provider is an explicitly constructed object injected into the engine
//! (`Arc<dyn EmbeddingProvider>`), never a process-wide singleton. Backends:
//! - `HashingEmbedder`: deterministic feature hashing, offline, the default
//! - `HttpEmbeddingClient`: OpenAI-compatible `/embeddings` endpoint
//!
//! Long documents are split into word chunks and mean-pooled so nothing is
//! silently truncated by the backend.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::config::Config;
use crate::errors::MatchError;

pub mod hashing;
pub mod http;
pub mod similarity;

pub use hashing::HashingEmbedder;
pub use http::HttpEmbeddingClient;
pub use similarity::{batch_similarity, cosine_similarity, similarity_matrix};

/// Default chunk size for `embed`, in whitespace-separated words.
pub const DEFAULT_CHUNK_WORDS: usize = 300;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Embedding call timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("Expected {expected}-dimensional vectors, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Provider returned {actual} vectors for {expected} inputs")]
    EmptyResponse { expected: usize, actual: usize },
}

/// Black-box text encoder.
///
/// Implementations only provide `encode_batch`; chunking, pooling and the
/// empty-text rule live in the provided methods so every backend shares them.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    fn name(&self) -> &str;

    fn dimension(&self) -> usize;

    /// Encodes each input directly, one vector per input, in order.
    async fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    /// Embeds one document. Texts longer than `chunk_size_words` words are split
    /// into chunks whose vectors are averaged. Empty text yields the zero vector.
    async fn embed(&self, text: &str, chunk_size_words: usize) -> Result<Vec<f32>, EmbeddingError> {
        if text.trim().is_empty() {
            return Ok(vec![0.0; self.dimension()]);
        }

        let words: Vec<&str> = text.split_whitespace().collect();
        let chunk_size = chunk_size_words.max(1);
        let inputs: Vec<String> = if words.len() <= chunk_size {
            vec![text.to_string()]
        } else {
            words.chunks(chunk_size).map(|chunk| chunk.join(" ")).collect()
        };

        let vectors = self.encode_batch(&inputs).await?;
        // read after encoding: remote backends learn their dimension on first use
        let dimension = self.dimension();
        check_batch(&vectors, inputs.len(), dimension)?;
        Ok(mean_pool(&vectors, dimension))
    }

    /// Embeds short texts in one backend call. Equivalent to calling `embed` per text.
    async fn embed_many(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let (indices, inputs): (Vec<usize>, Vec<String>) = texts
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.trim().is_empty())
            .map(|(i, t)| (i, t.clone()))
            .unzip();
        if inputs.is_empty() {
            return Ok(vec![vec![0.0; self.dimension()]; texts.len()]);
        }

        let vectors = self.encode_batch(&inputs).await?;
        let dimension = self.dimension();
        check_batch(&vectors, inputs.len(), dimension)?;

        let mut out = vec![vec![0.0; dimension]; texts.len()];
        for (i, vector) in indices.into_iter().zip(vectors) {
            out[i] = vector;
        }
        Ok(out)
    }
}

fn check_batch(
    vectors: &[Vec<f32>],
    expected: usize,
    dimension: usize,
) -> Result<(), EmbeddingError> {
    if vectors.len() != expected {
        return Err(EmbeddingError::EmptyResponse {
            expected,
            actual: vectors.len(),
        });
    }
    if let Some(bad) = vectors.iter().find(|v| v.len() != dimension) {
        return Err(EmbeddingError::DimensionMismatch {
            expected: dimension,
            actual: bad.len(),
        });
    }
    Ok(())
}

/// Element-wise mean of equally sized vectors.
pub fn mean_pool(vectors: &[Vec<f32>], dimension: usize) -> Vec<f32> {
    let mut pooled = vec![0.0f32; dimension];
    if vectors.is_empty() {
        return pooled;
    }
    for vector in vectors {
        for (acc, x) in pooled.iter_mut().zip(vector) {
            *acc += x;
        }
    }
    let n = vectors.len() as f32;
    for x in &mut pooled {
        *x /= n;
    }
    pooled
}

// ────────────────────────────────────────────────────────────────────────────
// Timeout wrapper
// ────────────────────────────────────────────────────────────────────────────

/// Bounds every backend call with `tokio::time::timeout`. A timeout is an
/// ordinary `EmbeddingError`, handled by the caller's degradation policy.
pub struct TimeoutProvider {
    inner: Arc<dyn EmbeddingProvider>,
    timeout: Duration,
}

impl TimeoutProvider {
    pub fn new(inner: Arc<dyn EmbeddingProvider>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

#[async_trait]
impl EmbeddingProvider for TimeoutProvider {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    async fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        tokio::time::timeout(self.timeout, self.inner.encode_batch(texts))
            .await
            .map_err(|_| EmbeddingError::Timeout {
                secs: self.timeout.as_secs(),
            })?
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Backend selection
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingBackend {
    Hash,
    Http,
    None,
}

impl FromStr for EmbeddingBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hash" | "hashing" => Ok(Self::Hash),
            "http" => Ok(Self::Http),
            "none" | "off" | "" => Ok(Self::None),
            other => Err(anyhow::anyhow!(
                "unknown embedding backend '{other}' (expected hash, http or none)"
            )),
        }
    }
}

/// Builds the configured provider, wrapped in the per-call timeout.
/// `None` means the engine runs lexical-only with zero semantic similarity.
pub fn build_provider(config: &Config) -> Result<Option<Arc<dyn EmbeddingProvider>>, MatchError> {
    let inner: Arc<dyn EmbeddingProvider> = match config.embedding_backend {
        EmbeddingBackend::None => {
            info!("Embedding provider disabled, semantic similarity will be 0");
            return Ok(None);
        }
        EmbeddingBackend::Hash => Arc::new(HashingEmbedder::new(config.embedding_dimension)),
        EmbeddingBackend::Http => {
            let url = config.embedding_api_url.clone().ok_or_else(|| {
                MatchError::Validation("EMBEDDING_API_URL is required for the http backend".into())
            })?;
            Arc::new(HttpEmbeddingClient::new(
                url,
                config.embedding_model.clone(),
                config.embedding_api_key.clone(),
                config.embedding_timeout,
            )?)
        }
    };

    info!(
        "Embedding provider initialized (backend: {}, dimension: {})",
        inner.name(),
        inner.dimension()
    );
    Ok(Some(Arc::new(TimeoutProvider::new(
        inner,
        config.embedding_timeout,
    ))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Encodes a text as [word count, 1.0]; records how many calls it saw.
    struct CountingProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl EmbeddingProvider for CountingProvider {
        fn name(&self) -> &str {
            "counting"
        }

        fn dimension(&self) -> usize {
            2
        }

        async fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(texts
                .iter()
                .map(|t| vec![t.split_whitespace().count() as f32, 1.0])
                .collect())
        }
    }

    struct SlowProvider;

    #[async_trait]
    impl EmbeddingProvider for SlowProvider {
        fn name(&self) -> &str {
            "slow"
        }

        fn dimension(&self) -> usize {
            2
        }

        async fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(vec![vec![0.0, 0.0]; texts.len()])
        }
    }

    struct WrongDimension;

    #[async_trait]
    impl EmbeddingProvider for WrongDimension {
        fn name(&self) -> &str {
            "wrong"
        }

        fn dimension(&self) -> usize {
            3
        }

        async fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            Ok(vec![vec![1.0]; texts.len()])
        }
    }

    fn counting() -> CountingProvider {
        CountingProvider {
            calls: AtomicUsize::new(0),
        }
    }

    #[tokio::test]
    async fn test_embed_empty_text_is_zero_vector() {
        let provider = counting();
        let v = provider.embed("   ", 300).await.unwrap();
        assert_eq!(v, vec![0.0, 0.0]);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_embed_short_text_is_direct() {
        let provider = counting();
        let v = provider.embed("one two three", 300).await.unwrap();
        assert_eq!(v, vec![3.0, 1.0]);
    }

    #[tokio::test]
    async fn test_embed_long_text_mean_pools_chunks() {
        let provider = counting();
        // 5 words, chunk size 2 → chunks of 2, 2, 1 words
        let v = provider.embed("a b c d e", 2).await.unwrap();
        assert!((v[0] - 5.0 / 3.0).abs() < 1e-6);
        assert!((v[1] - 1.0).abs() < 1e-6);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_embed_many_matches_embed() {
        let provider = counting();
        let texts = vec!["rust".to_string(), String::new(), "rust and go".to_string()];
        let many = provider.embed_many(&texts).await.unwrap();
        for (text, vector) in texts.iter().zip(&many) {
            assert_eq!(&provider.embed(text, 300).await.unwrap(), vector);
        }
    }

    #[tokio::test]
    async fn test_embed_many_empty_input() {
        let provider = counting();
        assert!(provider.embed_many(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dimension_mismatch_is_an_error() {
        let err = WrongDimension.embed("text", 300).await.unwrap_err();
        assert!(matches!(
            err,
            EmbeddingError::DimensionMismatch {
                expected: 3,
                actual: 1
            }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_provider_times_out() {
        let provider = TimeoutProvider::new(Arc::new(SlowProvider), Duration::from_secs(5));
        let err = provider.embed("hello", 300).await.unwrap_err();
        assert!(matches!(err, EmbeddingError::Timeout { secs: 5 }));
    }

    #[test]
    fn test_mean_pool() {
        let pooled = mean_pool(&[vec![1.0, 3.0], vec![3.0, 5.0]], 2);
        assert_eq!(pooled, vec![2.0, 4.0]);
        assert_eq!(mean_pool(&[], 2), vec![0.0, 0.0]);
    }

    #[test]
    fn test_backend_from_str() {
        assert_eq!("hash".parse::<EmbeddingBackend>().unwrap(), EmbeddingBackend::Hash);
        assert_eq!("HTTP".parse::<EmbeddingBackend>().unwrap(), EmbeddingBackend::Http);
        assert_eq!("none".parse::<EmbeddingBackend>().unwrap(), EmbeddingBackend::None);
        assert!("onnx".parse::<EmbeddingBackend>().is_err());
    }
}
