use std::sync::Arc;

use tracing::info;

use crate::config::Config;
use crate::errors::MatchError;
use crate::matching::MatchingEngine;
use crate::skills::vocabulary::SkillVocabulary;

/// Everything a caller needs, built once at startup and read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub engine: Arc<MatchingEngine>,
    /// Used by the document parsers.
    pub vocabulary: Arc<SkillVocabulary>,
}

impl AppState {
    pub fn from_config(config: Config) -> Result<Self, MatchError> {
        let vocabulary = SkillVocabulary::load_or_default(config.skills_vocabulary_path.as_deref());
        info!("Skill vocabulary ready ({} phrases)", vocabulary.len());

        let engine = MatchingEngine::from_config(&config)?;

        Ok(Self {
            config,
            engine: Arc::new(engine),
            vocabulary: Arc::new(vocabulary),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_without_provider() {
        let config = Config::from_lookup(|key| match key {
            "EMBEDDING_BACKEND" => Some("none".to_string()),
            _ => None,
        })
        .unwrap();
        let state = AppState::from_config(config).unwrap();
        assert!(state.engine.provider_name().is_none());
        assert!(!state.vocabulary.is_empty());
    }

    #[test]
    fn test_from_config_with_hashing_provider() {
        let config = Config::from_lookup(|_| None).unwrap();
        let state = AppState::from_config(config).unwrap();
        assert_eq!(state.engine.provider_name(), Some("hash"));
    }
}
