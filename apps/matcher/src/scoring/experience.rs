//! Experience relevance — years of experience against the job's requirement.
//!
//! Years are `Option<f64>`: `None` means "not provided", `Some(0.0)` means a
//! stated zero. A job requirement of `None` or `Some(0.0)` is "no requirement".

use std::sync::LazyLock;

use regex::Regex;

use super::ScoringError;

/// Lexical markers of an entry-level role or candidate.
pub const ENTRY_LEVEL_TERMS: &[&str] = &[
    "intern",
    "internship",
    "fresher",
    "trainee",
    "entry level",
    "entry-level",
    "junior",
    "0-2",
    "0–2",
    "1-2",
    "1–2",
    "1-3",
    "1–3",
    "student",
    "graduate",
    "new grad",
    "new graduate",
];

/// Terms that turn an experience phrase into a nominal half year.
const TRAINEE_TERMS: &[&str] = &[
    "internship",
    "fresher",
    "trainee",
    "entry level",
    "entry-level",
    "student",
    "training",
];

/// Requirements at or below this many years make an entry-level job.
pub const ENTRY_LEVEL_MAX_YEARS: f64 = 2.0;
/// A range whose upper bound is at most this is read as "lower bound plus a bit".
pub const SHORT_RANGE_MAX_YEARS: f64 = 3.0;

const ENTRY_JOB_BASE: f64 = 0.7;
const ENTRY_JOB_RATIO_WEIGHT: f64 = 0.3;
const ENTRY_JOB_NO_EXPERIENCE: f64 = 0.6;
const SENIOR_CURVE_EXPONENT: f64 = 0.7;
const SENIOR_FLOOR: f64 = 0.3;

static NO_EXPERIENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bno\s+experience\b|\bzero\s+experience\b|\b0\s+years?\b").unwrap()
});

static YEAR_RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*[-–]\s*(\d+(?:\.\d+)?)").unwrap());

/// First number in the phrase, with or without a trailing `+`.
static SINGLE_YEARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*\+?").unwrap());

/// Case-insensitive substring match against `ENTRY_LEVEL_TERMS`.
pub fn is_entry_level(text: &str) -> bool {
    let lower = text.to_lowercase();
    ENTRY_LEVEL_TERMS.iter().any(|term| lower.contains(term))
}

/// Reads a years-of-experience figure out of a short phrase ("5-7 years", "3+ years").
/// The first matching rule wins. Unparseable text yields 0.0.
pub fn extract_years(text: &str) -> f64 {
    let lower = text.to_lowercase();

    if TRAINEE_TERMS.iter().any(|term| lower.contains(term)) {
        return 0.5;
    }

    if NO_EXPERIENCE.is_match(&lower) {
        return 0.0;
    }

    if let Some(caps) = YEAR_RANGE.captures(&lower) {
        let low: f64 = caps[1].parse().unwrap_or(0.0);
        let high: f64 = caps[2].parse().unwrap_or(0.0);
        return if high <= SHORT_RANGE_MAX_YEARS {
            low + 0.5
        } else {
            (low + high) / 2.0
        };
    }

    SINGLE_YEARS
        .captures(&lower)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(0.0)
}

fn check_years(field: &'static str, years: Option<f64>) -> Result<Option<f64>, ScoringError> {
    match years {
        Some(value) if !value.is_finite() || value < 0.0 => {
            Err(ScoringError::InvalidYears { field, value })
        }
        other => Ok(other),
    }
}

/// Maps candidate years against required years to a relevance in [0, 1].
///
/// When both texts are given and both read as entry-level, relevance is 1.0
/// whatever the numbers say. Negative or non-finite years are rejected.
pub fn compute_experience_relevance(
    candidate_years: Option<f64>,
    required_years: Option<f64>,
    resume_text: Option<&str>,
    jd_text: Option<&str>,
) -> Result<f64, ScoringError> {
    let candidate = check_years("candidate_years", candidate_years)?;
    let required = check_years("required_years", required_years)?;

    if let (Some(resume), Some(jd)) = (resume_text, jd_text) {
        if is_entry_level(resume) && is_entry_level(jd) {
            return Ok(1.0);
        }
    }

    let required = match required {
        Some(r) if r > 0.0 => r,
        _ => return Ok(1.0),
    };
    let candidate = candidate.unwrap_or(0.0);

    if candidate >= required {
        return Ok(1.0);
    }

    let relevance = if required <= ENTRY_LEVEL_MAX_YEARS {
        if candidate > 0.0 {
            ENTRY_JOB_BASE + (candidate / required) * ENTRY_JOB_RATIO_WEIGHT
        } else {
            ENTRY_JOB_NO_EXPERIENCE
        }
    } else {
        let curved = (candidate / required).powf(SENIOR_CURVE_EXPONENT);
        if candidate > 0.0 {
            curved.max(SENIOR_FLOOR)
        } else {
            curved
        }
    };

    Ok(relevance.clamp(0.0, 1.0))
}
