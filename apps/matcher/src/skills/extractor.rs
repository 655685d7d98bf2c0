//! Skill Extractor — pulls skill / requirement tokens out of unstructured document text.
//!
//! Three strategies:
//! - vocabulary-driven: `SkillVocabulary::find_in`
//! - section-driven: `extract_section` + `parse_skill_items`
//! - dynamic: `extract_skills_dynamic`, no vocabulary at all; used by the semantic overlap path
//!
//! Every list is capped by keeping the first N after deduplication.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::skills::normalize::normalize_skill;
use crate::skills::vocabulary::SkillVocabulary;

/// Separators between skill items inside a block of text.
const ITEM_SEPARATORS: &[char] = &[',', ';', '|', '•', '\n'];

/// Words that are never a skill on their own.
const STOP_WORDS: &[&str] = &["and", "or", "the", "a", "an", "with", "using"];

/// Keywords that mark a line as a section header.
const SECTION_KEYWORDS: &[&str] = &[
    "experience",
    "education",
    "skills",
    "projects",
    "certifications",
    "responsibilities",
    "requirements",
    "qualifications",
    "benefits",
    "salary",
    "summary",
    "objective",
    "preferred",
    "nice to have",
];

/// A header line must be shorter than this.
pub const HEADER_MAX_CHARS: usize = 100;
/// A line shorter than this containing a section keyword ends the current section.
pub const SECTION_BREAK_MAX_CHARS: usize = 60;

pub const DYNAMIC_MIN_CHARS: usize = 2;
pub const DYNAMIC_MAX_CHARS: usize = 50;
pub const DYNAMIC_CAP: usize = 50;
pub const SECTION_ITEM_MIN_CHARS: usize = 2;
pub const SECTION_ITEM_MAX_CHARS: usize = 100;

/// Short "Header:" label at the start of a dynamic token ("required skills: python").
static DYNAMIC_HEADER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[^:]{1,40}:\s*").unwrap());

static QUALIFIER_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:required|preferred|must have|nice to have)\b[:\s]*").unwrap()
});

static LABEL_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:languages?|tools?|frameworks?|technologies?|databases?|platforms?|skills?)\b[:\s]*",
    )
    .unwrap()
});

static BULLET_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[•\-\*]\s*|\d+[.)]\s+)").unwrap());

// ────────────────────────────────────────────────────────────────────────────
// Formatting helpers
// ────────────────────────────────────────────────────────────────────────────

/// Title-cases a phrase: every letter that follows a non-letter is uppercased,
/// every other letter lowercased ("node.js" → "Node.Js", "ci/cd" → "Ci/Cd").
pub fn title_case(phrase: &str) -> String {
    let mut out = String::with_capacity(phrase.len());
    let mut previous_is_letter = false;

    for c in phrase.chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            out.push(c);
            previous_is_letter = false;
        }
    }

    out
}

/// Keeps the first item of each normalized class; drops items that normalize to "".
pub fn dedup_by_normalized<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .map(Into::into)
        .filter(|item| {
            let normalized = normalize_skill(item);
            !normalized.is_empty() && seen.insert(normalized)
        })
        .collect()
}

fn char_len_within(text: &str, min: usize, max: usize) -> bool {
    let len = text.chars().count();
    (min..=max).contains(&len)
}

/// True when the line has cased characters and all of them are uppercase.
fn looks_all_caps(line: &str) -> bool {
    let mut has_cased = false;
    for c in line.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            has_cased = true;
        }
    }
    has_cased
}

/// Keywords contained in the section's own target never end it, so
/// "Soft skills: ..." stays inside a skills section.
fn is_section_break(line: &str, target_lower: &str) -> bool {
    if looks_all_caps(line) {
        return true;
    }
    let lower = line.to_lowercase();
    line.chars().count() < SECTION_BREAK_MAX_CHARS
        && SECTION_KEYWORDS
            .iter()
            .any(|k| !target_lower.contains(k) && lower.contains(k))
}

// ────────────────────────────────────────────────────────────────────────────
// Section-driven extraction
// ────────────────────────────────────────────────────────────────────────────

/// Finds the first section whose header line contains one of `targets` (tried in order)
/// and returns its body up to the next section header.
///
/// Text after a colon on the header line itself ("Skills: Python, SQL") is part of the body.
pub fn extract_section(text: &str, targets: &[&str]) -> Option<String> {
    let lines: Vec<&str> = text.lines().collect();

    for target in targets {
        let target_lower = target.to_lowercase();

        for (i, line) in lines.iter().enumerate() {
            let trimmed = line.trim();
            if trimmed.chars().count() >= HEADER_MAX_CHARS
                || !trimmed.to_lowercase().contains(&target_lower)
            {
                continue;
            }

            let mut body: Vec<&str> = Vec::new();
            if let Some((_, inline)) = trimmed.split_once(':') {
                if !inline.trim().is_empty() {
                    body.push(inline.trim());
                }
            }

            for next in &lines[i + 1..] {
                let next_trimmed = next.trim();
                if !next_trimmed.is_empty() && is_section_break(next_trimmed, &target_lower) {
                    break;
                }
                body.push(next);
            }

            return Some(body.join("\n"));
        }
    }

    None
}

/// Splits a section body into cleaned skill items, deduplicated by normalized form.
pub fn parse_skill_items(block: &str) -> Vec<String> {
    let items = block.split(ITEM_SEPARATORS).filter_map(|raw| {
        let item = BULLET_PREFIX.replace(raw.trim(), "");
        let item = QUALIFIER_PREFIX.replace(item.trim(), "");
        let item = item.trim().trim_end_matches(['.', ',', ';', ':', '!', '?']);
        let item = LABEL_PREFIX.replace(item.trim(), "");
        let item = item.trim();

        char_len_within(item, SECTION_ITEM_MIN_CHARS, SECTION_ITEM_MAX_CHARS)
            .then(|| item.to_string())
    });

    dedup_by_normalized(items)
}

/// Section-driven extraction for the first section matching `targets`.
pub fn extract_section_skills(text: &str, targets: &[&str]) -> Vec<String> {
    extract_section(text, targets)
        .map(|body| parse_skill_items(&body))
        .unwrap_or_default()
}

// ────────────────────────────────────────────────────────────────────────────
// Combined and dynamic extraction
// ────────────────────────────────────────────────────────────────────────────

/// Vocabulary hits followed by section items, deduplicated by normalized form, capped.
pub fn extract_skills(
    text: &str,
    vocabulary: &SkillVocabulary,
    section_targets: &[&str],
    cap: usize,
) -> Vec<String> {
    let mut skills = vocabulary.find_in(text);
    skills.extend(extract_section_skills(text, section_targets));

    let mut deduped = dedup_by_normalized(skills);
    deduped.truncate(cap);
    deduped
}

/// Domain-agnostic extraction: split on item separators, no vocabulary dependency.
///
/// Tokens are lowercased, stripped of bullets and short "Header:" labels, kept when
/// 2–50 characters long and not a stop word, deduplicated in order, capped at 50.
pub fn extract_skills_dynamic(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() || ",.-&+/:;|•#".contains(c) {
                c
            } else {
                ' '
            }
        })
        .collect();

    let mut seen = HashSet::new();
    let mut tokens = Vec::new();

    for part in cleaned.split(ITEM_SEPARATORS) {
        let part = BULLET_PREFIX.replace(part.trim(), "");
        let part = DYNAMIC_HEADER.replace(part.trim(), "");
        let part = part.trim().trim_end_matches(['.', ':']).trim();

        if !char_len_within(part, DYNAMIC_MIN_CHARS, DYNAMIC_MAX_CHARS)
            || STOP_WORDS.contains(&part)
        {
            continue;
        }
        if seen.insert(part.to_string()) {
            tokens.push(part.to_string());
        }
        if tokens.len() == DYNAMIC_CAP {
            break;
        }
    }

    tokens
}
