//! Skill handling — normalization, synonym expansion, vocabulary, and extraction.

pub mod extractor;
pub mod normalize;
pub mod synonyms;
pub mod vocabulary;

pub use extractor::{extract_skills, extract_skills_dynamic};
pub use normalize::{clean_display, normalize_skill, normalize_text};
pub use synonyms::{expand_skill_synonyms, SynonymTable};
pub use vocabulary::SkillVocabulary;
