pub mod document;
pub mod match_result;

pub use document::{JobDocument, ResumeDocument};
pub use match_result::MatchResult;
