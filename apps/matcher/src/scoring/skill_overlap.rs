//! Skill overlap — the fraction of job skills covered by the candidate.
//!
//! Two strategies, chosen once per call by `OverlapStrategy::select`:
//! - Semantic: dynamic tokens from both raw texts, embedded, best match per job token ≥ 0.75
//! - Lexical: normalized skills expanded into synonym classes, set intersection
//!
//! A semantic failure (provider error or timeout) or a semantic pass that matched
//! no job token falls through to lexical, so the score and the reported skill
//! lists always come from the same strategy.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::embedding::{similarity_matrix, EmbeddingError, EmbeddingProvider};
use crate::skills::extractor::extract_skills_dynamic;
use crate::skills::normalize::normalize_skill;
use crate::skills::synonyms::expand_skill_synonyms;

/// Best cosine similarity a job token needs to count as matched.
pub const SEMANTIC_MATCH_THRESHOLD: f64 = 0.75;

const HIGH_RATIO: f64 = 0.90;
const HIGH_RATIO_BONUS: f64 = 1.05;
const GOOD_RATIO: f64 = 0.70;
const GOOD_RATIO_BONUS: f64 = 1.02;

/// Which strategy produced an overlap score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapKind {
    Semantic,
    Lexical,
}

pub enum OverlapStrategy<'a> {
    Semantic {
        provider: &'a dyn EmbeddingProvider,
        job_text: &'a str,
        resume_text: &'a str,
    },
    Lexical,
}

impl<'a> OverlapStrategy<'a> {
    /// Semantic when a provider and both non-blank texts are present, else lexical.
    pub fn select(
        provider: Option<&'a dyn EmbeddingProvider>,
        job_text: Option<&'a str>,
        resume_text: Option<&'a str>,
    ) -> Self {
        let non_blank = |t: Option<&'a str>| t.filter(|t| !t.trim().is_empty());

        match (provider, non_blank(job_text), non_blank(resume_text)) {
            (Some(provider), Some(job_text), Some(resume_text)) => Self::Semantic {
                provider,
                job_text,
                resume_text,
            },
            _ => Self::Lexical,
        }
    }

    pub fn kind(&self) -> OverlapKind {
        match self {
            Self::Semantic { .. } => OverlapKind::Semantic,
            Self::Lexical => OverlapKind::Lexical,
        }
    }
}

/// Result of the similarity-matrix decision: job tokens split into matched / missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SemanticOverlap {
    pub matched: Vec<String>,
    pub missing: Vec<String>,
    pub overlap: f64,
}

/// Score plus the strategy that actually produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlapOutcome {
    pub score: f64,
    pub kind: OverlapKind,
    pub semantic: Option<SemanticOverlap>,
}

/// Semantic overlap over dynamically extracted tokens.
pub async fn semantic_skill_overlap(
    provider: &dyn EmbeddingProvider,
    job_text: &str,
    resume_text: &str,
) -> Result<SemanticOverlap, EmbeddingError> {
    let job_tokens = extract_skills_dynamic(job_text);
    if job_tokens.is_empty() {
        return Ok(SemanticOverlap::default());
    }

    let resume_tokens = extract_skills_dynamic(resume_text);
    if resume_tokens.is_empty() {
        return Ok(SemanticOverlap {
            matched: Vec::new(),
            missing: job_tokens,
            overlap: 0.0,
        });
    }

    let job_vectors = provider.embed_many(&job_tokens).await?;
    let resume_vectors = provider.embed_many(&resume_tokens).await?;
    let matrix = similarity_matrix(&job_vectors, &resume_vectors);

    let total = job_tokens.len();
    let mut matched = Vec::new();
    let mut missing = Vec::new();
    for (token, row) in job_tokens.into_iter().zip(&matrix) {
        let best = row.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if best >= SEMANTIC_MATCH_THRESHOLD {
            matched.push(token);
        } else {
            missing.push(token);
        }
    }

    let overlap = matched.len() as f64 / total as f64;
    Ok(SemanticOverlap {
        matched,
        missing,
        overlap,
    })
}

/// Union of the synonym classes of every non-empty normalized skill.
pub fn expanded_skill_set<S: AsRef<str>>(skills: &[S]) -> BTreeSet<String> {
    skills
        .iter()
        .filter(|s| !normalize_skill(s.as_ref()).is_empty())
        .flat_map(|s| expand_skill_synonyms(s.as_ref()))
        .collect()
}

/// `|resume ∩ job| / |job|` over synonym-expanded sets, with a small bonus for high ratios.
pub fn lexical_skill_overlap<S: AsRef<str>>(resume_skills: &[S], job_skills: &[S]) -> f64 {
    let job_set = expanded_skill_set(job_skills);
    if job_set.is_empty() {
        return 0.0;
    }
    let resume_set = expanded_skill_set(resume_skills);

    let ratio = job_set.intersection(&resume_set).count() as f64 / job_set.len() as f64;
    let boosted = if ratio >= HIGH_RATIO {
        ratio * HIGH_RATIO_BONUS
    } else if ratio >= GOOD_RATIO {
        ratio * GOOD_RATIO_BONUS
    } else {
        ratio
    };

    boosted.clamp(0.0, 1.0)
}

/// Runs the selected strategy and reports which one produced the score.
pub async fn compute_skill_overlap_detailed(
    resume_skills: &[String],
    job_skills: &[String],
    provider: Option<&dyn EmbeddingProvider>,
    job_text: Option<&str>,
    resume_text: Option<&str>,
) -> OverlapOutcome {
    let strategy = OverlapStrategy::select(provider, job_text, resume_text);
    debug!(strategy = ?strategy.kind(), "Skill overlap strategy selected");

    if let OverlapStrategy::Semantic {
        provider,
        job_text,
        resume_text,
    } = strategy
    {
        match semantic_skill_overlap(provider, job_text, resume_text).await {
            Ok(semantic) if !semantic.matched.is_empty() => {
                return OverlapOutcome {
                    score: semantic.overlap.clamp(0.0, 1.0),
                    kind: OverlapKind::Semantic,
                    semantic: Some(semantic),
                };
            }
            Ok(_) => {
                debug!("Semantic skill overlap matched nothing, using lexical matching");
            }
            Err(e) => {
                warn!("Semantic skill overlap failed, using lexical matching: {e}");
            }
        }
    }

    OverlapOutcome {
        score: lexical_skill_overlap(resume_skills, job_skills),
        kind: OverlapKind::Lexical,
        semantic: None,
    }
}

/// Overlap score in [0, 1].
pub async fn compute_skill_overlap(
    resume_skills: &[String],
    job_skills: &[String],
    provider: Option<&dyn EmbeddingProvider>,
    job_text: Option<&str>,
    resume_text: Option<&str>,
) -> f64 {
    compute_skill_overlap_detailed(resume_skills, job_skills, provider, job_text, resume_text)
        .await
        .score
}
