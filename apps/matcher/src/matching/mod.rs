//! Matching orchestration: one résumé against one job, and batches of résumés.

pub mod engine;
pub mod skill_report;

pub use engine::MatchingEngine;
