//! Suitability aggregation: three sub-scores in, one 0–100 score out.
//!
//! Pipeline: clamp → weights → weighted sum → domain-mismatch cap →
//! distribution shaping → contextual bonus → perfect-match floor → micro-boost.
//! Every threshold below is a score-shaping constant; change them together.

use super::{ScoringError, ScoringWeights};

// ────────────────────────────────────────────────────────────────────────────
// Score-shaping constants (percent scale unless noted)
// ────────────────────────────────────────────────────────────────────────────

/// Semantic similarity below this marks a domain mismatch.
pub const DOMAIN_MISMATCH_SEMANTIC: f64 = 40.0;
/// Ceiling (0–1 scale) for a domain-mismatched score.
pub const DOMAIN_MISMATCH_CAP: f64 = 0.40;

const CURVE_LOW_IN: f64 = 30.0;
const CURVE_HIGH_IN: f64 = 80.0;
const CURVE_LOW_OUT: f64 = 40.0;
const CURVE_HIGH_OUT: f64 = 95.0;
/// Ceiling (0–1 scale) of the shaped score before bonuses.
const CURVE_CEILING: f64 = 0.95;

const BONUS_SEMANTIC: f64 = 85.0;
const BONUS_SKILLS: f64 = 70.0;
const BONUS: f64 = 0.05;

const PERFECT_SEMANTIC: f64 = 90.0;
const PERFECT_SKILLS: f64 = 80.0;
const PERFECT_FLOOR: f64 = 0.95;
const PERFECT_BOOST: f64 = 1.02;

const MICRO_SEMANTIC: f64 = 95.0;
const MICRO_BOOST: f64 = 1.01;

/// Weights of the plain average used when aggregation itself fails.
const FALLBACK_WEIGHTS: ScoringWeights = ScoringWeights {
    semantic: 0.5,
    skills: 0.3,
    experience: 0.2,
};

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Remaps a raw 0–1 score onto a recruiter-like distribution, returned on the
/// 0–1 scale and capped at 0.95: [0,30) → [0,40), [30,80] → [40,95], above 80 → 95.
pub fn normalize_distribution(raw: f64) -> f64 {
    let percent = clamp_unit(raw) * 100.0;
    let slope = (CURVE_HIGH_OUT - CURVE_LOW_OUT) / (CURVE_HIGH_IN - CURVE_LOW_IN);

    let mapped = if percent <= 0.0 {
        0.0
    } else if percent < CURVE_LOW_IN {
        percent / CURVE_LOW_IN * CURVE_LOW_OUT
    } else if percent <= CURVE_HIGH_IN {
        CURVE_LOW_OUT + (percent - CURVE_LOW_IN) * slope
    } else {
        (CURVE_LOW_OUT + (percent - CURVE_LOW_IN) * slope).min(CURVE_HIGH_OUT)
    };

    (mapped / 100.0).clamp(0.0, CURVE_CEILING)
}

/// The weighted sum before any cap or shaping, on the 0–1 scale.
///
/// Explicit weights are renormalized; without them the job text picks the set.
pub fn raw_weighted_score(
    semantic: f64,
    skill_overlap: f64,
    experience: f64,
    weights: Option<&ScoringWeights>,
    jd_text: Option<&str>,
) -> Result<f64, ScoringError> {
    let weights = match weights {
        Some(explicit) => explicit.normalized()?,
        None => ScoringWeights::adaptive(jd_text),
    };

    Ok(weights.weighted_sum(
        clamp_unit(semantic),
        clamp_unit(skill_overlap),
        clamp_unit(experience),
    ))
}

/// Final suitability score in [0, 100], rounded to two decimals.
///
/// A semantic similarity under 0.40 caps the result at 40 whatever the other
/// scores are, with or without distribution shaping.
pub fn compute_suitability(
    semantic: f64,
    skill_overlap: f64,
    experience: f64,
    weights: Option<&ScoringWeights>,
    jd_text: Option<&str>,
    normalize: bool,
) -> Result<f64, ScoringError> {
    let semantic = clamp_unit(semantic);
    let skill_overlap = clamp_unit(skill_overlap);
    let experience = clamp_unit(experience);
    let semantic_pct = semantic * 100.0;
    let skills_pct = skill_overlap * 100.0;

    let mut score = raw_weighted_score(semantic, skill_overlap, experience, weights, jd_text)?;

    let domain_mismatch = semantic_pct < DOMAIN_MISMATCH_SEMANTIC;
    if domain_mismatch {
        score = score.min(DOMAIN_MISMATCH_CAP);
    }

    if normalize {
        score = normalize_distribution(score);
        // the curve lifts 40 to 51; the cap holds on the output scale too
        if domain_mismatch {
            score = score.min(DOMAIN_MISMATCH_CAP);
        }
    }

    if semantic_pct > BONUS_SEMANTIC && skills_pct > BONUS_SKILLS {
        score = (score + BONUS).min(1.0);
    }

    if semantic_pct > PERFECT_SEMANTIC && skills_pct > PERFECT_SKILLS {
        score = score.max(PERFECT_FLOOR);
        if score >= PERFECT_FLOOR && semantic_pct > MICRO_SEMANTIC {
            score = (score * PERFECT_BOOST).min(1.0);
        }
    }

    if semantic_pct > MICRO_SEMANTIC && score < 1.0 {
        score = (score * MICRO_BOOST).min(1.0);
    }

    Ok(round2(score * 100.0).clamp(0.0, 100.0))
}

/// Plain weighted average on the 0–100 scale, used when aggregation fails.
pub fn fallback_score(semantic: f64, skill_overlap: f64, experience: f64) -> f64 {
    let score = FALLBACK_WEIGHTS.weighted_sum(
        clamp_unit(semantic),
        clamp_unit(skill_overlap),
        clamp_unit(experience),
    );
    round2(score * 100.0)
}
