//! Scoring — the three sub-scores and their aggregation into one 0–100 suitability score.
//!
//! - `skill_overlap`: fraction of job skills the candidate covers (semantic or lexical)
//! - `experience`: years-based relevance with entry-level shortcuts
//! - `suitability`: adaptive weighting, domain-mismatch cap, distribution shaping, boosts

use thiserror::Error;

pub mod experience;
pub mod skill_overlap;
pub mod suitability;
pub mod weights;

pub use experience::{compute_experience_relevance, extract_years, is_entry_level};
pub use skill_overlap::{compute_skill_overlap, OverlapKind, OverlapStrategy};
pub use suitability::{compute_suitability, normalize_distribution};
pub use weights::ScoringWeights;

#[derive(Debug, Error, PartialEq)]
pub enum ScoringError {
    #[error("Invalid weights: {0}")]
    InvalidWeights(String),

    #[error("Invalid years value {value} for {field}")]
    InvalidYears { field: &'static str, value: f64 },
}
