//! Explainable résumé / job suitability scoring.
//!
//! A `MatchingEngine` combines document-level semantic similarity, skill
//! overlap and experience relevance into a single 0–100 score, and reports
//! which job skills the candidate covers and which are missing.

pub mod config;
pub mod embedding;
pub mod errors;
pub mod matching;
pub mod models;
pub mod parsing;
pub mod scoring;
pub mod skills;
pub mod state;

pub use config::Config;
pub use errors::MatchError;
pub use matching::MatchingEngine;
pub use models::{JobDocument, MatchResult, ResumeDocument};
pub use scoring::ScoringWeights;
