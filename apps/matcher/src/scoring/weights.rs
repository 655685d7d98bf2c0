use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::experience::is_entry_level;
use super::ScoringError;

/// Relative importance of the three sub-scores. Always used in renormalized form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub semantic: f64,
    pub skills: f64,
    pub experience: f64,
}

impl ScoringWeights {
    /// Mid/senior roles.
    pub const STANDARD: Self = Self {
        semantic: 0.55,
        skills: 0.30,
        experience: 0.15,
    };

    /// Entry-level roles: years are not a signal at all.
    pub const ENTRY_LEVEL: Self = Self {
        semantic: 0.65,
        skills: 0.35,
        experience: 0.0,
    };

    /// Picks the weight set from the job's seniority markers.
    pub fn adaptive(jd_text: Option<&str>) -> Self {
        match jd_text {
            Some(text) if is_entry_level(text) => Self::ENTRY_LEVEL,
            _ => Self::STANDARD,
        }
    }

    /// Rescales so the weights sum to 1. Rejects negative, non-finite or all-zero weights.
    pub fn normalized(&self) -> Result<Self, ScoringError> {
        let parts = [self.semantic, self.skills, self.experience];
        if parts.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(ScoringError::InvalidWeights(format!(
                "weights must be finite and non-negative, got {self:?}"
            )));
        }

        let total: f64 = parts.iter().sum();
        if total <= 0.0 {
            return Err(ScoringError::InvalidWeights(
                "weights must not all be zero".to_string(),
            ));
        }

        Ok(Self {
            semantic: self.semantic / total,
            skills: self.skills / total,
            experience: self.experience / total,
        })
    }

    /// Σ weight_i * value_i, clamped to [0, 1].
    pub fn weighted_sum(&self, semantic: f64, skills: f64, experience: f64) -> f64 {
        (self.semantic * semantic + self.skills * skills + self.experience * experience)
            .clamp(0.0, 1.0)
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Parses "semantic,skills,experience", e.g. "0.6,0.3,0.1".
impl FromStr for ScoringWeights {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let [semantic, skills, experience] = parts.as_slice() else {
            return Err(ScoringError::InvalidWeights(format!(
                "expected three comma-separated numbers, got '{s}'"
            )));
        };

        let parse = |part: &str| {
            part.parse::<f64>()
                .map_err(|_| ScoringError::InvalidWeights(format!("'{part}' is not a number")))
        };

        let weights = Self {
            semantic: parse(*semantic)?,
            skills: parse(*skills)?,
            experience: parse(*experience)?,
        };
        weights.normalized()?;
        Ok(weights)
    }
}
