//! Document parsers — plain text in, `ResumeDocument` / `JobDocument` out.
//!
//! Pure regex and section heuristics: no model, no network. Missing fields
//! come back empty or `None`, never as an error.

use std::sync::LazyLock;

use regex::Regex;

use crate::scoring::experience::extract_years;

pub mod job;
pub mod resume;

pub use job::parse_job;
pub use resume::parse_resume;

static LINE_BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[•\-\*]\s*|\d+[.)]\s+)").unwrap());

static YEARS_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*[-–]\s*(\d+(?:\.\d+)?)\s*\+?\s*years?").unwrap()
});
static YEARS_OF_EXPERIENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\+?\s*years?\s*(?:of\s*)?experience").unwrap()
});
static EXPERIENCE_THEN_YEARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)experience[^\n]*?(\d+(?:\.\d+)?)\+?\s*years?").unwrap()
});

/// Non-empty section lines with bullet markers removed, longer than `min_chars`, capped.
fn bullet_lines(section: &str, min_chars: usize, cap: usize) -> Vec<String> {
    section
        .lines()
        .map(|line| LINE_BULLET.replace(line.trim(), "").trim().to_string())
        .filter(|line| line.chars().count() > min_chars)
        .take(cap)
        .collect()
}

/// First capture group of the first pattern that matches, parsed as years.
fn first_years(patterns: &[&Regex], text: &str) -> Option<f64> {
    patterns.iter().find_map(|pattern| {
        pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<f64>().ok())
    })
}

/// An explicitly stated years figure: a "5-7 years" range first, then
/// "N years of experience", "experience ... N years", then `extra` in order.
/// Zero counts as not stated.
fn stated_years(text: &str, extra: &[&Regex]) -> Option<f64> {
    if let Some(m) = YEARS_RANGE.find(text) {
        let years = extract_years(m.as_str());
        if years > 0.0 {
            return Some(years);
        }
    }

    let mut patterns: Vec<&Regex> = vec![&*YEARS_OF_EXPERIENCE, &*EXPERIENCE_THEN_YEARS];
    patterns.extend_from_slice(extra);
    first_years(&patterns, text).filter(|years| *years > 0.0)
}
