use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::embedding::hashing::DEFAULT_DIMENSION;
use crate::embedding::{EmbeddingBackend, DEFAULT_CHUNK_WORDS};

pub const DEFAULT_EMBEDDING_MODEL: &str = "sentence-transformers/all-mpnet-base-v2";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Application configuration loaded from environment variables.
/// Everything has a default except `EMBEDDING_API_URL` for the http backend.
#[derive(Debug, Clone)]
pub struct Config {
    pub embedding_backend: EmbeddingBackend,
    pub embedding_api_url: Option<String>,
    pub embedding_api_key: Option<String>,
    pub embedding_model: String,
    pub embedding_dimension: usize,
    pub embedding_timeout: Duration,
    pub embedding_chunk_words: usize,
    pub skills_vocabulary_path: Option<PathBuf>,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key → value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let embedding_backend: EmbeddingBackend =
            parse_or(optional("EMBEDDING_BACKEND"), "EMBEDDING_BACKEND", EmbeddingBackend::Hash)?;

        let embedding_api_url = optional("EMBEDDING_API_URL");
        if embedding_backend == EmbeddingBackend::Http && embedding_api_url.is_none() {
            bail!("Required environment variable 'EMBEDDING_API_URL' is not set (EMBEDDING_BACKEND=http)");
        }

        let timeout_secs: u64 = parse_or(
            optional("EMBEDDING_TIMEOUT_SECS"),
            "EMBEDDING_TIMEOUT_SECS",
            DEFAULT_TIMEOUT_SECS,
        )?;
        let embedding_dimension: usize = parse_or(
            optional("EMBEDDING_DIMENSION"),
            "EMBEDDING_DIMENSION",
            DEFAULT_DIMENSION,
        )?;
        let embedding_chunk_words: usize = parse_or(
            optional("EMBEDDING_CHUNK_WORDS"),
            "EMBEDDING_CHUNK_WORDS",
            DEFAULT_CHUNK_WORDS,
        )?;

        for (key, value) in [
            ("EMBEDDING_TIMEOUT_SECS", timeout_secs as usize),
            ("EMBEDDING_DIMENSION", embedding_dimension),
            ("EMBEDDING_CHUNK_WORDS", embedding_chunk_words),
        ] {
            if value == 0 {
                bail!("{key} must be greater than zero");
            }
        }

        Ok(Config {
            embedding_backend,
            embedding_api_url,
            embedding_api_key: optional("EMBEDDING_API_KEY"),
            embedding_model: optional("EMBEDDING_MODEL")
                .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
            embedding_dimension,
            embedding_timeout: Duration::from_secs(timeout_secs),
            embedding_chunk_words,
            skills_vocabulary_path: optional("SKILLS_VOCABULARY_PATH").map(PathBuf::from),
            rust_log: optional("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match value {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{e}"))
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.embedding_backend, EmbeddingBackend::Hash);
        assert_eq!(config.embedding_dimension, 384);
        assert_eq!(config.embedding_timeout, Duration::from_secs(30));
        assert_eq!(config.embedding_chunk_words, 300);
        assert_eq!(config.embedding_model, DEFAULT_EMBEDDING_MODEL);
        assert!(config.skills_vocabulary_path.is_none());
        assert_eq!(config.rust_log, "info");
    }

    #[test]
    fn test_http_backend_requires_url() {
        assert!(config(&[("EMBEDDING_BACKEND", "http")]).is_err());

        let config = config(&[
            ("EMBEDDING_BACKEND", "http"),
            ("EMBEDDING_API_URL", "http://localhost:8080/v1/embeddings"),
            ("EMBEDDING_API_KEY", "secret"),
        ])
        .unwrap();
        assert_eq!(config.embedding_backend, EmbeddingBackend::Http);
        assert_eq!(config.embedding_api_key.as_deref(), Some("secret"));
    }

    #[test]
    fn test_invalid_numbers_are_rejected() {
        let err = config(&[("EMBEDDING_TIMEOUT_SECS", "soon")]).unwrap_err();
        assert!(err.to_string().contains("EMBEDDING_TIMEOUT_SECS"));
        assert!(config(&[("EMBEDDING_CHUNK_WORDS", "0")]).is_err());
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = config(&[("EMBEDDING_BACKEND", " "), ("SKILLS_VOCABULARY_PATH", "")]).unwrap();
        assert_eq!(config.embedding_backend, EmbeddingBackend::Hash);
        assert!(config.skills_vocabulary_path.is_none());
    }

    #[test]
    fn test_unknown_backend() {
        assert!(config(&[("EMBEDDING_BACKEND", "onnx")]).is_err());
    }
}
