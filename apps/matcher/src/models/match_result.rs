use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{JobDocument, ResumeDocument};
use crate::scoring::OverlapKind;

/// Outcome of matching one résumé against one job. Scores are percentages in [0, 100].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub match_id: Uuid,
    pub computed_at: DateTime<Utc>,
    pub candidate_name: String,
    pub suitability_score: f64,
    pub semantic_similarity: f64,
    pub skill_overlap: f64,
    pub experience_relevance: f64,
    /// Strategy that produced `skill_overlap`.
    pub overlap_strategy: OverlapKind,
    pub matching_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub resume: ResumeDocument,
    pub job: JobDocument,
}
