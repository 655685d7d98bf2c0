//! Skill vocabulary — the curated phrase list behind vocabulary-driven extraction.
//!
//! Loaded once at startup from a JSON array of strings. A missing or unreadable file
//! is never fatal: the built-in list takes over and a warning is logged.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::errors::MatchError;
use crate::skills::extractor::title_case;

/// Built-in vocabulary used when no external list is configured.
pub const DEFAULT_SKILLS: &[&str] = &[
    "python",
    "java",
    "javascript",
    "typescript",
    "c++",
    "c#",
    "go",
    "rust",
    "react",
    "angular",
    "vue",
    "node.js",
    "django",
    "flask",
    "fastapi",
    "spring",
    "tensorflow",
    "pytorch",
    "keras",
    "scikit-learn",
    "machine learning",
    "deep learning",
    "nlp",
    "natural language processing",
    "computer vision",
    "aws",
    "amazon web services",
    "azure",
    "gcp",
    "google cloud",
    "docker",
    "kubernetes",
    "jenkins",
    "git",
    "sql",
    "nosql",
    "mongodb",
    "postgresql",
    "mysql",
    "redis",
    "elasticsearch",
    "kafka",
    "apache spark",
    "hadoop",
    "tableau",
    "power bi",
    "agile",
    "scrum",
    "ci/cd",
    "terraform",
    "ansible",
    "linux",
    "unix",
    "rest api",
    "graphql",
    "microservices",
];

/// Where the active phrase list came from.
#[derive(Debug, Clone, PartialEq)]
pub enum VocabularySource {
    Builtin,
    File(PathBuf),
    Inline,
}

/// Ordered, read-only list of known skill phrases.
#[derive(Debug, Clone)]
pub struct SkillVocabulary {
    phrases: Vec<String>,
    source: VocabularySource,
}

impl Default for SkillVocabulary {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SkillVocabulary {
    pub fn builtin() -> Self {
        Self {
            phrases: DEFAULT_SKILLS.iter().map(|s| s.to_string()).collect(),
            source: VocabularySource::Builtin,
        }
    }

    pub fn from_phrases<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            phrases: clean_phrases(phrases.into_iter().map(Into::into)),
            source: VocabularySource::Inline,
        }
    }

    /// Reads a JSON array of skill phrases. An empty list counts as corrupt.
    pub fn from_file(path: &Path) -> Result<Self, MatchError> {
        let raw = std::fs::read_to_string(path)?;
        let phrases: Vec<String> = serde_json::from_str(&raw)?;
        let phrases = clean_phrases(phrases.into_iter());

        if phrases.is_empty() {
            return Err(MatchError::Vocabulary(format!(
                "{} contains no skill phrases",
                path.display()
            )));
        }

        Ok(Self {
            phrases,
            source: VocabularySource::File(path.to_path_buf()),
        })
    }

    /// Loads `path` when given, falling back to the built-in list on any failure.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::builtin();
        };

        match Self::from_file(path) {
            Ok(vocabulary) => {
                info!(
                    path = %path.display(),
                    phrases = vocabulary.len(),
                    "Loaded skill vocabulary"
                );
                vocabulary
            }
            Err(e) => {
                warn!(
                    path = %path.display(),
                    "Could not load skill vocabulary, using built-in list: {e}"
                );
                Self::builtin()
            }
        }
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    pub fn source(&self) -> &VocabularySource {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    /// Vocabulary-driven extraction: every phrase contained (case-insensitively) in
    /// `text`, title-cased, deduplicated by exact string in first-seen order.
    pub fn find_in(&self, text: &str) -> Vec<String> {
        let text_lower = text.to_lowercase();
        let mut found: Vec<String> = Vec::new();

        for phrase in &self.phrases {
            if text_lower.contains(&phrase.to_lowercase()) {
                let formatted = title_case(phrase);
                if !found.contains(&formatted) {
                    found.push(formatted);
                }
            }
        }

        found
    }
}

fn clean_phrases(phrases: impl Iterator<Item = String>) -> Vec<String> {
    phrases
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}
