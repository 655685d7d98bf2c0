//! Matched / missing skill lists shown next to the scores.

use std::collections::HashSet;

use crate::scoring::skill_overlap::{expanded_skill_set, SemanticOverlap};
use crate::skills::normalize::{clean_display, normalize_skill};

/// Résumé skills (résumé spelling, résumé order) that the job asks for,
/// directly or through a synonym.
pub fn lexical_matching_skills(resume_skills: &[String], job_skills: &[String]) -> Vec<String> {
    let job_set = expanded_skill_set(job_skills);
    resume_skills
        .iter()
        .filter(|skill| {
            let normalized = normalize_skill(skill);
            !normalized.is_empty() && job_set.contains(&normalized)
        })
        .cloned()
        .collect()
}

/// Job skills (job spelling, job order) the résumé does not cover, even through a synonym.
pub fn lexical_missing_skills(resume_skills: &[String], job_skills: &[String]) -> Vec<String> {
    let resume_set = expanded_skill_set(resume_skills);
    job_skills
        .iter()
        .filter(|skill| {
            let normalized = normalize_skill(skill);
            !normalized.is_empty() && !resume_set.contains(&normalized)
        })
        .cloned()
        .collect()
}

/// Deduplicates by normalized form (first spelling wins) and trims trailing
/// punctuation for display.
pub fn clean_skill_list(skills: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    skills
        .iter()
        .filter_map(|skill| {
            let normalized = normalize_skill(skill);
            let display = clean_display(skill);
            (!normalized.is_empty() && !display.is_empty() && seen.insert(normalized))
                .then(|| display.to_string())
        })
        .collect()
}

/// Final (matching, missing) lists.
///
/// The semantic decision is used when it matched at least one token; otherwise
/// the lexical comparison of the parsed skill lists.
pub fn skill_report(
    semantic: Option<&SemanticOverlap>,
    resume_skills: &[String],
    job_universe: &[String],
    job_required: &[String],
) -> (Vec<String>, Vec<String>) {
    let (matching, missing) = match semantic {
        Some(overlap) if !overlap.matched.is_empty() => {
            (overlap.matched.clone(), overlap.missing.clone())
        }
        _ => (
            lexical_matching_skills(resume_skills, job_universe),
            lexical_missing_skills(resume_skills, job_required),
        ),
    };

    (clean_skill_list(&matching), clean_skill_list(&missing))
}
