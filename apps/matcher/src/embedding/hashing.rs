//! Deterministic feature-hashing embedder.
//!
//! Lowercased word unigrams are hashed into a fixed number of signed buckets
//! and the result is L2-normalised. No model download, no network, stable
//! across Rust versions (SipHash-1-3 with fixed keys).

use std::hash::Hasher;

use async_trait::async_trait;
use siphasher::sip::SipHasher13;

use super::{EmbeddingError, EmbeddingProvider};

/// Changing either key changes every embedding.
const HASH_SEED_K0: u64 = 0x6d61_7463_6865_7231;
const HASH_SEED_K1: u64 = 0x736b_696c_6c73_3432;

pub const DEFAULT_DIMENSION: usize = 384;

/// Function words carry no topical signal.
const IGNORED_WORDS: &[&str] = &[
    "a", "an", "and", "the", "of", "in", "on", "at", "to", "for", "with", "by", "or", "is",
    "are", "as", "be", "we", "our", "you", "your",
];

#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

impl HashingEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn bucket(&self, token: &str) -> (usize, f32) {
        let mut hasher = SipHasher13::new_with_keys(HASH_SEED_K0, HASH_SEED_K1);
        hasher.write(token.as_bytes());
        let hash = hasher.finish();

        let index = (hash % self.dimension as u64) as usize;
        let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
        (index, sign)
    }

    /// Synchronous encoding of a single text.
    pub fn encode(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];

        for token in tokenize(text) {
            let (index, sign) = self.bucket(&token);
            vector[index] += sign;
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#'))
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .filter(|t| !IGNORED_WORDS.contains(&t.as_str()))
}

#[async_trait]
impl EmbeddingProvider for HashingEmbedder {
    fn name(&self) -> &str {
        "hash"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts.iter().map(|t| self.encode(t)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::cosine_similarity;

    #[test]
    fn test_vectors_are_unit_length() {
        let embedder = HashingEmbedder::default();
        let v = embedder.encode("Rust developer with Tokio and Axum experience");
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5, "norm was {norm}");
        assert_eq!(v.len(), DEFAULT_DIMENSION);
    }

    #[test]
    fn test_deterministic_and_case_insensitive() {
        let embedder = HashingEmbedder::new(64);
        assert_eq!(embedder.encode("Python Django"), embedder.encode("python django"));
    }

    #[test]
    fn test_empty_and_stop_word_text_is_zero() {
        let embedder = HashingEmbedder::new(16);
        assert!(embedder.encode("").iter().all(|x| *x == 0.0));
        assert!(embedder.encode("and the of").iter().all(|x| *x == 0.0));
    }

    #[test]
    fn test_shared_vocabulary_scores_higher() {
        let embedder = HashingEmbedder::new(2048);
        let job = embedder.encode("python django postgresql docker");
        let close = embedder.encode("python flask postgresql docker");
        let far = embedder.encode("seo copywriting branding campaigns");
        assert!(cosine_similarity(&job, &close) > cosine_similarity(&job, &far));
    }

    #[test]
    fn test_dimension_floor() {
        assert_eq!(HashingEmbedder::new(0).dimension(), 1);
    }

    #[tokio::test]
    async fn test_encode_batch_matches_encode() {
        let embedder = HashingEmbedder::new(128);
        let texts = vec!["c++ and c#".to_string(), "go".to_string()];
        let batch = embedder.encode_batch(&texts).await.unwrap();
        assert_eq!(batch[0], embedder.encode("c++ and c#"));
        assert_eq!(batch[1], embedder.encode("go"));
    }
}
