//! Matching Engine — runs every sub-score for a (résumé, job) pair and assembles the result.
//!
//! A failing sub-step never aborts a match; it is replaced by its safe default:
//! - document embedding failure → semantic similarity 0.0, overlap forced to lexical
//! - experience failure → 0.5
//! - aggregation failure → plain weighted average

use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::embedding::{
    build_provider, cosine_similarity, EmbeddingError, EmbeddingProvider, DEFAULT_CHUNK_WORDS,
};
use crate::errors::MatchError;
use crate::matching::skill_report::skill_report;
use crate::models::{JobDocument, MatchResult, ResumeDocument};
use crate::scoring::experience::compute_experience_relevance;
use crate::scoring::skill_overlap::compute_skill_overlap_detailed;
use crate::scoring::suitability::{compute_suitability, fallback_score};
use crate::scoring::ScoringWeights;
use crate::skills::normalize::normalize_text;

/// Experience relevance used when it cannot be computed.
pub const EXPERIENCE_FALLBACK: f64 = 0.5;

/// Stateless apart from its immutable provider; share it freely across tasks.
#[derive(Clone)]
pub struct MatchingEngine {
    provider: Option<Arc<dyn EmbeddingProvider>>,
    chunk_size_words: usize,
    normalize_scores: bool,
}

fn to_percent(unit: f64) -> f64 {
    ((unit * 100.0).clamp(0.0, 100.0) * 100.0).round() / 100.0
}

impl MatchingEngine {
    pub fn new(provider: Option<Arc<dyn EmbeddingProvider>>) -> Self {
        Self {
            provider,
            chunk_size_words: DEFAULT_CHUNK_WORDS,
            normalize_scores: true,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, MatchError> {
        Ok(Self::new(build_provider(config)?).with_chunk_size(config.embedding_chunk_words))
    }

    pub fn with_chunk_size(mut self, words: usize) -> Self {
        self.chunk_size_words = words.max(1);
        self
    }

    /// `false` reports the capped weighted sum without distribution shaping.
    pub fn with_normalization(mut self, normalize: bool) -> Self {
        self.normalize_scores = normalize;
        self
    }

    pub fn provider_name(&self) -> Option<&str> {
        self.provider.as_deref().map(|p| p.name())
    }

    /// Cosine similarity of the two normalized document blobs, clamped to [0, 1].
    async fn document_similarity(
        &self,
        provider: &dyn EmbeddingProvider,
        resume_blob: &str,
        job_blob: &str,
    ) -> Result<f64, EmbeddingError> {
        let resume_text = normalize_text(resume_blob);
        let job_text = normalize_text(job_blob);

        let (resume_vector, job_vector) = futures::try_join!(
            provider.embed(&resume_text, self.chunk_size_words),
            provider.embed(&job_text, self.chunk_size_words),
        )?;

        Ok(cosine_similarity(&resume_vector, &job_vector).clamp(0.0, 1.0))
    }

    /// Scores one résumé against one job.
    ///
    /// Only a résumé with no name, no text and no skills is rejected.
    pub async fn match_resume(
        &self,
        resume: &ResumeDocument,
        job: &JobDocument,
        weights: Option<&ScoringWeights>,
    ) -> Result<MatchResult, MatchError> {
        if resume.is_empty() {
            return Err(MatchError::Validation(
                "résumé has no name, text or skills".to_string(),
            ));
        }

        let candidate = resume.display_name().to_string();
        let resume_blob = resume.text_blob();
        let job_blob = job.text_blob();
        let job_universe = job.skill_universe();

        // Semantic similarity; an embedding failure also rules out semantic overlap
        let (semantic, overlap_provider) = match self.provider.as_deref() {
            Some(provider) => match self
                .document_similarity(provider, &resume_blob, &job_blob)
                .await
            {
                Ok(similarity) => (similarity, Some(provider)),
                Err(e) => {
                    warn!(candidate = %candidate, "Embedding failed, semantic similarity set to 0: {e}");
                    (0.0, None)
                }
            },
            None => {
                warn!(candidate = %candidate, "No embedding provider, semantic similarity set to 0");
                (0.0, None)
            }
        };

        let overlap = compute_skill_overlap_detailed(
            &resume.skills,
            &job_universe,
            overlap_provider,
            Some(&job_blob),
            Some(&resume_blob),
        )
        .await;

        let experience = compute_experience_relevance(
            resume.experience_years,
            job.experience_required,
            Some(&resume_blob),
            Some(&job_blob),
        )
        .unwrap_or_else(|e| {
            warn!(candidate = %candidate, "Experience relevance failed, using {EXPERIENCE_FALLBACK}: {e}");
            EXPERIENCE_FALLBACK
        });

        let suitability = compute_suitability(
            semantic,
            overlap.score,
            experience,
            weights,
            Some(&job_blob),
            self.normalize_scores,
        )
        .unwrap_or_else(|e| {
            warn!(candidate = %candidate, "Suitability aggregation failed, using plain average: {e}");
            fallback_score(semantic, overlap.score, experience)
        });

        let (matching_skills, missing_skills) = skill_report(
            overlap.semantic.as_ref(),
            &resume.skills,
            &job_universe,
            &job.required_or_universe(),
        );

        let result = MatchResult {
            match_id: Uuid::new_v4(),
            computed_at: Utc::now(),
            candidate_name: candidate,
            suitability_score: suitability.clamp(0.0, 100.0),
            semantic_similarity: to_percent(semantic),
            skill_overlap: to_percent(overlap.score),
            experience_relevance: to_percent(experience),
            overlap_strategy: overlap.kind,
            matching_skills,
            missing_skills,
            resume: resume.clone(),
            job: job.clone(),
        };

        info!(
            candidate = %result.candidate_name,
            semantic = result.semantic_similarity,
            skills_matched = result.matching_skills.len(),
            jd_skills = job_universe.len(),
            skill_overlap = result.skill_overlap,
            exp_rel = result.experience_relevance,
            strategy = ?result.overlap_strategy,
            final_score = result.suitability_score,
            "Match computed"
        );

        Ok(result)
    }

    /// Scores every résumé concurrently, drops (and logs) the ones that fail,
    /// and returns the rest by `suitability_score` descending. Ties keep input order.
    pub async fn batch_match(
        &self,
        resumes: &[ResumeDocument],
        job: &JobDocument,
        weights: Option<&ScoringWeights>,
    ) -> Vec<MatchResult> {
        let outcomes = join_all(
            resumes
                .iter()
                .map(|resume| self.match_resume(resume, job, weights)),
        )
        .await;

        let mut results: Vec<MatchResult> = outcomes
            .into_iter()
            .enumerate()
            .filter_map(|(index, outcome)| match outcome {
                Ok(result) => Some(result),
                Err(e) => {
                    warn!(index, code = e.code(), "Skipping résumé: {e}");
                    None
                }
            })
            .collect();

        results.sort_by(|a, b| b.suitability_score.total_cmp(&a.suitability_score));

        info!(
            submitted = resumes.len(),
            scored = results.len(),
            "Batch match complete"
        );
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::HashingEmbedder;
    use crate::scoring::OverlapKind;
    use async_trait::async_trait;

    struct FailingProvider;

    #[async_trait]
    impl EmbeddingProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        fn dimension(&self) -> usize {
            8
        }

        async fn encode_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            Err(EmbeddingError::Api {
                status: 500,
                message: "boom".into(),
            })
        }
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn resume(name: &str, skills: &[&str]) -> ResumeDocument {
        ResumeDocument {
            name: name.into(),
            skills: strings(skills),
            experience_years: Some(4.0),
            ..Default::default()
        }
    }

    fn job() -> JobDocument {
        JobDocument {
            title: Some("Backend Engineer".into()),
            skills_required: strings(&["Rust", "PostgreSQL", "Kubernetes"]),
            experience_required: Some(3.0),
            ..Default::default()
        }
    }

    fn hashing_engine() -> MatchingEngine {
        MatchingEngine::new(Some(Arc::new(HashingEmbedder::new(4096))))
    }

    #[tokio::test]
    async fn test_empty_resume_is_rejected() {
        let err = hashing_engine()
            .match_resume(&ResumeDocument::default(), &job(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, MatchError::Validation(_)));
    }

    #[tokio::test]
    async fn test_without_provider_semantic_is_zero_and_capped() {
        let engine = MatchingEngine::new(None);
        let result = engine
            .match_resume(&resume("Ada", &["Rust", "PostgreSQL", "Kubernetes"]), &job(), None)
            .await
            .unwrap();
        assert_eq!(result.semantic_similarity, 0.0);
        assert_eq!(result.overlap_strategy, OverlapKind::Lexical);
        assert_eq!(result.skill_overlap, 100.0);
        assert_eq!(result.experience_relevance, 100.0);
        assert!(result.suitability_score <= 40.0);
        assert_eq!(result.matching_skills, strings(&["Rust", "PostgreSQL", "Kubernetes"]));
        assert!(result.missing_skills.is_empty());
    }

    #[tokio::test]
    async fn test_embedding_failure_degrades_instead_of_failing() {
        let engine = MatchingEngine::new(Some(Arc::new(FailingProvider)));
        let result = engine
            .match_resume(&resume("Ada", &["Rust"]), &job(), None)
            .await
            .unwrap();
        assert_eq!(result.semantic_similarity, 0.0);
        assert_eq!(result.overlap_strategy, OverlapKind::Lexical);
        assert_eq!(result.missing_skills, strings(&["PostgreSQL", "Kubernetes"]));
    }

    #[tokio::test]
    async fn test_invalid_weights_use_fallback_average() {
        let engine = MatchingEngine::new(None);
        let weights = ScoringWeights {
            semantic: -1.0,
            skills: 0.0,
            experience: 0.0,
        };
        let result = engine
            .match_resume(
                &resume("Ada", &["Rust", "PostgreSQL", "Kubernetes"]),
                &job(),
                Some(&weights),
            )
            .await
            .unwrap();
        // 0.5*0 + 0.3*1 + 0.2*1
        assert_eq!(result.suitability_score, 50.0);
    }

    #[tokio::test]
    async fn test_overlap_score_agrees_with_skill_lists() {
        // single prose lines: the semantic pass finds no tokens to compare
        let job = JobDocument {
            raw_text: "We are looking for someone to build reliable storage services for our platform"
                .into(),
            skills_required: strings(&["Rust", "PostgreSQL"]),
            ..Default::default()
        };
        let input = ResumeDocument {
            name: "Ada".into(),
            raw_text: "Engineer who has spent years building reliable storage services in production"
                .into(),
            skills: strings(&["Rust", "PostgreSQL"]),
            ..Default::default()
        };

        let result = hashing_engine()
            .match_resume(&input, &job, None)
            .await
            .unwrap();
        assert_eq!(result.overlap_strategy, OverlapKind::Lexical);
        assert_eq!(result.skill_overlap, 100.0);
        assert_eq!(result.matching_skills, strings(&["Rust", "PostgreSQL"]));
        assert!(result.missing_skills.is_empty());
    }

    #[tokio::test]
    async fn test_result_embeds_inputs() {
        let input = resume("Ada", &["Rust"]);
        let result = hashing_engine()
            .match_resume(&input, &job(), None)
            .await
            .unwrap();
        assert_eq!(result.resume, input);
        assert_eq!(result.job, job());
        assert_eq!(result.candidate_name, "Ada");
    }

    #[tokio::test]
    async fn test_batch_sorts_descending_and_skips_invalid() {
        let engine = hashing_engine();
        let resumes = vec![
            resume("Weak", &["Cobol"]),
            ResumeDocument::default(),
            resume("Strong", &["Rust", "PostgreSQL", "Kubernetes"]),
        ];
        let results = engine.batch_match(&resumes, &job(), None).await;
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].candidate_name, "Strong");
        assert!(results[0].suitability_score >= results[1].suitability_score);
    }

    #[tokio::test]
    async fn test_batch_ties_keep_input_order() {
        let engine = MatchingEngine::new(None);
        let resumes = vec![
            resume("First", &["Rust"]),
            resume("Second", &["Rust"]),
            resume("Third", &["Rust"]),
        ];
        let results = engine.batch_match(&resumes, &job(), None).await;
        let names: Vec<&str> = results.iter().map(|r| r.candidate_name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_to_percent() {
        assert_eq!(to_percent(0.123456), 12.35);
        assert_eq!(to_percent(1.7), 100.0);
        assert_eq!(to_percent(-0.2), 0.0);
    }
}
