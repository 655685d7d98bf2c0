//! Job description parser.

use std::sync::LazyLock;

use regex::Regex;

use super::{bullet_lines, stated_years};
use crate::models::JobDocument;
use crate::skills::extractor::{dedup_by_normalized, extract_section, extract_section_skills};
use crate::skills::vocabulary::SkillVocabulary;

pub const REQUIRED_CAP: usize = 30;
pub const PREFERRED_CAP: usize = 20;
pub const BULLETS_CAP: usize = 20;

const TITLE_SCAN_LINES: usize = 10;
const ROLE_WORDS: &[&str] = &[
    "engineer",
    "developer",
    "manager",
    "analyst",
    "scientist",
    "specialist",
    "architect",
    "lead",
];

const REQUIRED_SECTIONS: &[&str] = &["required skills", "must have", "essential skills", "requirements"];
const PREFERRED_SECTIONS: &[&str] = &["preferred", "nice to have", "bonus", "plus"];
const RESPONSIBILITY_SECTIONS: &[&str] = &["responsibilities", "duties", "what you will do"];
const REQUIREMENT_SECTIONS: &[&str] = &["requirements", "qualifications", "must have"];

static LABELLED_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^\s*(?:job\s+title|position|role)\s*:\s*(.+)$").unwrap());
static ROLE_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:(?:senior|junior|lead|principal|staff)\s+)?\w+\s+(?:engineer|developer|manager|analyst|scientist)\b",
    )
    .unwrap()
});

static MINIMUM_YEARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)minimum\s+(?:of\s+)?(\d+(?:\.\d+)?)\+?\s*years?").unwrap()
});
static AT_LEAST_YEARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)at\s+least\s+(\d+(?:\.\d+)?)").unwrap());

/// Parses a plain-text job description into a `JobDocument`.
///
/// Required skills are the required-section items followed by every vocabulary
/// phrase found anywhere in the text. Preferred skills come from the
/// nice-to-have section only.
pub fn parse_job(text: &str, vocabulary: &SkillVocabulary) -> JobDocument {
    let mut required = extract_section_skills(text, REQUIRED_SECTIONS);
    required.extend(vocabulary.find_in(text));
    let mut skills_required = dedup_by_normalized(required);
    skills_required.truncate(REQUIRED_CAP);

    let mut skills_preferred = extract_section_skills(text, PREFERRED_SECTIONS);
    skills_preferred.truncate(PREFERRED_CAP);

    let all_skills = dedup_by_normalized(
        skills_required
            .iter()
            .chain(skills_preferred.iter())
            .cloned(),
    );

    JobDocument {
        title: extract_title(text),
        raw_text: text.to_string(),
        skills_required,
        skills_preferred,
        all_skills,
        experience_required: stated_years(text, &[&*MINIMUM_YEARS, &*AT_LEAST_YEARS]),
        responsibilities: section_bullets(text, RESPONSIBILITY_SECTIONS),
        requirements: section_bullets(text, REQUIREMENT_SECTIONS),
    }
}

fn extract_title(text: &str) -> Option<String> {
    let from_heading = text.lines().take(TITLE_SCAN_LINES).map(str::trim).find(|line| {
        let len = line.chars().count();
        let lower = line.to_lowercase();
        len > 5 && len < 100 && ROLE_WORDS.iter().any(|w| lower.contains(w))
    });

    if let Some(line) = from_heading {
        return Some(line.to_string());
    }

    LABELLED_TITLE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|title| !title.is_empty())
        .or_else(|| ROLE_PHRASE.find(text).map(|m| m.as_str().to_string()))
}

fn section_bullets(text: &str, targets: &[&str]) -> Vec<String> {
    extract_section(text, targets)
        .map(|section| bullet_lines(&section, 10, BULLETS_CAP))
        .unwrap_or_default()
}
