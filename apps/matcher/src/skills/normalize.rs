//! Text and skill normalization — the canonical forms used as equality keys for matching.
//!
//! `normalize_text` is the lenient whole-document form fed to the embedder.
//! `normalize_skill` is the strict per-token form used for set comparisons; it is
//! applied to a fixed point so that it stays idempotent on any input.

use std::sync::LazyLock;

use regex::Regex;

/// Section labels stripped (once) from the start of free text.
const SECTION_PREFIXES: &[&str] = &[
    "ai/ml tools:",
    "frameworks & tools:",
    "languages:",
    "technologies:",
    "skills:",
    "technical skills:",
    "programming languages:",
    "tools:",
    "software:",
    "platforms:",
];

/// Punctuation removed from a skill after prefix stripping.
const SKILL_PUNCTUATION: &[char] = &['.', ',', ':', ';', '!', '?', '(', ')', '[', ']', '{', '}'];

/// Trailing characters trimmed from a skill before it is shown to a user.
const DISPLAY_TRAILING: &[char] = &['.', ',', ';', ':', '!', '?'];

/// `"<category>: x"`, `"<category> | x"`, `"<category> - x"`. The earliest separator wins.
/// A bare hyphen inside a word ("scikit-learn") is not a separator.
static CATEGORY_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^:|]+?(?:[:|]|\s*-\s)\s*").unwrap());

/// Known category labels that may survive the first pass.
static CATEGORY_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:skills?|technologies?|tools?|languages?|frameworks?|databases?|platforms?|agentic\s+ai|ai/ml\s+tools?):\s*",
    )
    .unwrap()
});

/// Canonicalizes free text for embedding and whole-document comparison.
///
/// Lowercases, strips one leading section label, turns `-` and `/` into spaces,
/// drops everything that is neither alphanumeric nor whitespace, then collapses
/// whitespace. Total: empty in, empty out.
pub fn normalize_text(text: &str) -> String {
    let lowered = text.trim_start().to_lowercase();
    let body = SECTION_PREFIXES
        .iter()
        .find_map(|prefix| lowered.strip_prefix(prefix))
        .unwrap_or(&lowered);

    let kept: String = body
        .chars()
        .map(|c| if c == '-' || c == '/' { ' ' } else { c })
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();

    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Canonical skill key: "Databases: MySQL" → "mysql", "AI/ML Tools: PyTorch" → "pytorch".
pub fn normalize_skill(skill: &str) -> String {
    let mut current = normalize_skill_once(skill);
    loop {
        let next = normalize_skill_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn normalize_skill_once(skill: &str) -> String {
    let without_prefix = CATEGORY_PREFIX.replace(skill.trim(), "");
    let without_label = CATEGORY_LABEL.replace(without_prefix.trim(), "");

    without_label
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| !SKILL_PUNCTUATION.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Trims whitespace and trailing sentence punctuation, keeping the original casing.
pub fn clean_display(skill: &str) -> &str {
    skill.trim().trim_end_matches(DISPLAY_TRAILING).trim_end()
}
