//! Résumé parser.

use std::sync::LazyLock;

use regex::Regex;

use super::{bullet_lines, stated_years};
use crate::models::ResumeDocument;
use crate::scoring::experience::is_entry_level;
use crate::skills::extractor::{extract_section, extract_skills};
use crate::skills::vocabulary::SkillVocabulary;

pub const SKILLS_CAP: usize = 50;
pub const CERTIFICATIONS_CAP: usize = 20;
/// Years credited per dated position when no explicit figure is stated.
pub const YEARS_PER_POSITION: f64 = 2.5;

const SKILL_SECTIONS: &[&str] = &["skills", "technical skills", "competencies"];
const EDUCATION_SECTIONS: &[&str] = &["education", "academic", "qualifications"];
const EXPERIENCE_SECTIONS: &[&str] = &["experience", "work experience", "employment"];
const CERTIFICATION_SECTIONS: &[&str] = &["certifications", "certificates", "licenses"];

const NAME_EXCLUDED: &[&str] = &["resume", "cv", "email", "phone", "linkedin", "@"];
const DEGREE_WORDS: &[&str] = &[
    "bachelor",
    "master",
    "phd",
    "degree",
    "diploma",
    "university",
    "college",
];
const CERTIFICATION_WORDS: &[&str] = &[
    "certified",
    "certification",
    "certificate",
    "aws",
    "azure",
    "google",
];

static DEGREE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\b(?:bachelor|master)\b[^\n]*?\b(?:science|engineering|arts)\b",
        r"(?i)\bph\.?\s?d\b",
        r"\b[BM]\.?(?:Sc|S|Tech)\.?(?:CS)?\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static YEARS_IN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+(?:\.\d+)?)\+?\s*years?\s+in\b").unwrap());
static DATE_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b\d{4}\s*[-–]\s*(?:\d{4}|present|current)\b").unwrap()
});

static CERTIFICATION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i:aws)\s+(?i:certified)(?:[ \t]+[A-Z][\w\-]*)*",
        r"(?i:azure)[ \t]+(?:[A-Z][\w\-]*[ \t]+)*?(?i:certified)",
        r"(?i:google)[ \t]+(?:[A-Z][\w\-]*[ \t]+)*?(?i:certified)",
        r"(?i:cisco)[ \t]+(?:[A-Z][\w\-]*[ \t]+)*?(?i:certified)",
        r"\bPMP\b",
        r"\bCISSP\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap()
});
static PHONE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\+?\d{1,3}[-.\s]?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}",
        r"\+?\d{10,15}",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Parses plain résumé text into a `ResumeDocument`.
pub fn parse_resume(text: &str, vocabulary: &SkillVocabulary) -> ResumeDocument {
    ResumeDocument {
        name: extract_name(text).unwrap_or_default(),
        raw_text: text.to_string(),
        skills: extract_skills(text, vocabulary, SKILL_SECTIONS, SKILLS_CAP),
        experience_years: extract_experience_years(text),
        education: extract_education(text).unwrap_or_default(),
        certifications: extract_certifications(text),
        email: EMAIL.find(text).map(|m| m.as_str().to_string()),
        phone: PHONE_PATTERNS
            .iter()
            .find_map(|p| p.find(text))
            .map(|m| m.as_str().trim().to_string()),
    }
}

/// First of the opening three lines that is short and is not a heading or contact line.
fn extract_name(text: &str) -> Option<String> {
    text.lines()
        .take(3)
        .map(str::trim)
        .find(|line| {
            let lower = line.to_lowercase();
            !line.is_empty()
                && line.split_whitespace().count() <= 4
                && !NAME_EXCLUDED.iter().any(|w| lower.contains(w))
        })
        .map(str::to_string)
}

fn extract_education(text: &str) -> Option<String> {
    let from_section = extract_section(text, EDUCATION_SECTIONS).and_then(|section| {
        section
            .lines()
            .map(str::trim)
            .find(|line| {
                let lower = line.to_lowercase();
                line.chars().count() > 10 && DEGREE_WORDS.iter().any(|w| lower.contains(w))
            })
            .map(str::to_string)
    });

    from_section.or_else(|| {
        DEGREE_PATTERNS
            .iter()
            .find_map(|p| p.find(text))
            .map(|m| m.as_str().to_string())
    })
}

/// Stated years when present; else 2.5 years per dated position; else `None`.
/// Entry-level résumés count as half a year.
fn extract_experience_years(text: &str) -> Option<f64> {
    if is_entry_level(text) {
        return Some(0.5);
    }

    if let Some(years) = stated_years(text, &[&*YEARS_IN]) {
        return Some(years);
    }

    let positions = extract_section(text, EXPERIENCE_SECTIONS)
        .map(|section| DATE_RANGE.find_iter(&section).count())
        .unwrap_or(0);
    (positions > 0).then(|| positions as f64 * YEARS_PER_POSITION)
}

fn extract_certifications(text: &str) -> Vec<String> {
    let mut certifications: Vec<String> = extract_section(text, CERTIFICATION_SECTIONS)
        .map(|section| {
            bullet_lines(&section, 5, CERTIFICATIONS_CAP)
                .into_iter()
                .filter(|line| {
                    let lower = line.to_lowercase();
                    CERTIFICATION_WORDS.iter().any(|w| lower.contains(w))
                })
                .collect()
        })
        .unwrap_or_default();

    for pattern in CERTIFICATION_PATTERNS.iter() {
        for m in pattern.find_iter(text) {
            let found = m.as_str().trim().to_string();
            if !certifications.contains(&found) {
                certifications.push(found);
            }
        }
    }

    certifications.truncate(CERTIFICATIONS_CAP);
    certifications
}
