use thiserror::Error;

use crate::embedding::EmbeddingError;

/// Crate-level error type.
///
/// Sub-step failures inside a match never surface as this type: the engine
/// replaces them with safe defaults. Only whole-match rejections and
/// loading failures reach the caller.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Vocabulary error: {0}")]
    Vocabulary(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MatchError {
    /// Short machine-readable code, used in log fields.
    pub fn code(&self) -> &'static str {
        match self {
            MatchError::Validation(_) => "VALIDATION_ERROR",
            MatchError::Embedding(_) => "EMBEDDING_ERROR",
            MatchError::Vocabulary(_) => "VOCABULARY_ERROR",
            MatchError::Io(_) => "IO_ERROR",
            MatchError::Json(_) => "JSON_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(
            MatchError::Validation("x".into()).code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(
            MatchError::from(EmbeddingError::Timeout { secs: 1 }).code(),
            "EMBEDDING_ERROR"
        );
        assert_eq!(
            MatchError::Vocabulary("empty".into()).code(),
            "VOCABULARY_ERROR"
        );
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(MatchError::from(io).code(), "IO_ERROR");
    }

    #[test]
    fn test_json_error_converts() {
        let err = serde_json::from_str::<Vec<String>>("nope").unwrap_err();
        let err: MatchError = err.into();
        assert!(matches!(err, MatchError::Json(_)));
        assert!(err.to_string().starts_with("JSON error"));
    }
}
