//! Parsed résumé and job documents, as produced by the parsers (or supplied as JSON).
//!
//! Every field defaults when absent, so partial JSON documents deserialize.

use serde::{Deserialize, Serialize};

use crate::skills::extractor::dedup_by_normalized;

/// Raw text shorter than this (after trimming) is replaced by a structured-field blob.
pub const MIN_RAW_TEXT_CHARS: usize = 50;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeDocument {
    pub name: String,
    pub raw_text: String,
    /// Discovery order, not deduplicated.
    pub skills: Vec<String>,
    /// `None` = not stated. `Some(0.0)` = stated zero.
    pub experience_years: Option<f64>,
    pub education: String,
    pub certifications: Vec<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobDocument {
    pub title: Option<String>,
    pub raw_text: String,
    pub skills_required: Vec<String>,
    pub skills_preferred: Vec<String>,
    /// Deduplicated union of required and preferred. May be left empty.
    pub all_skills: Vec<String>,
    /// `None` or `Some(0.0)` = no stated requirement.
    pub experience_required: Option<f64>,
    pub responsibilities: Vec<String>,
    pub requirements: Vec<String>,
}

fn has_usable_text(raw_text: &str) -> bool {
    raw_text.trim().chars().count() >= MIN_RAW_TEXT_CHARS
}

fn join_non_empty<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

impl ResumeDocument {
    pub fn display_name(&self) -> &str {
        match self.name.trim() {
            "" => "Unknown",
            name => name,
        }
    }

    /// No name, no text and no skills: nothing to match on.
    pub fn is_empty(&self) -> bool {
        self.name.trim().is_empty()
            && self.raw_text.trim().is_empty()
            && self.skills.iter().all(|s| s.trim().is_empty())
    }

    /// Full text used for embeddings and text heuristics.
    ///
    /// Falls back to name, education, skills, years and certifications when the
    /// raw text is missing or too short to carry context. Fields are comma-joined
    /// so the dynamic skill extractor still sees item boundaries.
    pub fn text_blob(&self) -> String {
        if has_usable_text(&self.raw_text) {
            return self.raw_text.clone();
        }

        let years = self.experience_years.map(|y| y.to_string()).unwrap_or_default();
        join_non_empty(
            [self.name.as_str(), self.education.as_str()]
                .into_iter()
                .chain(self.skills.iter().map(String::as_str))
                .chain([years.as_str()])
                .chain(self.certifications.iter().map(String::as_str)),
        )
    }
}

impl JobDocument {
    /// `all_skills` when given, else the union of required and preferred skills.
    pub fn skill_universe(&self) -> Vec<String> {
        if !self.all_skills.is_empty() {
            return self.all_skills.clone();
        }
        dedup_by_normalized(
            self.skills_required
                .iter()
                .chain(&self.skills_preferred)
                .cloned(),
        )
    }

    /// Skills a candidate is reported as missing: the required list, or the whole
    /// universe when no required list was parsed.
    pub fn required_or_universe(&self) -> Vec<String> {
        if self.skills_required.is_empty() {
            self.skill_universe()
        } else {
            self.skills_required.clone()
        }
    }

    /// Full text used for embeddings and text heuristics.
    ///
    /// Falls back to title, skills, responsibilities and requirements when the
    /// raw text is missing or too short.
    pub fn text_blob(&self) -> String {
        if has_usable_text(&self.raw_text) {
            return self.raw_text.clone();
        }

        join_non_empty(
            self.title
                .iter()
                .chain(&self.skills_required)
                .chain(&self.skills_preferred)
                .chain(&self.responsibilities)
                .chain(&self.requirements)
                .map(String::as_str),
        )
    }
}
