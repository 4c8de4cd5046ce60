use serde::{Deserialize, Serialize};

use crate::error::InputValidationError;

pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Default weight vector. Skills dominate; salary is a minor signal until the
/// compensation heuristic grows up.
pub const DEFAULT_WEIGHTS: ScoringWeights = ScoringWeights {
    skills: 0.35,
    experience: 0.25,
    education: 0.15,
    location: 0.10,
    title: 0.10,
    salary: 0.05,
};

/// Per-dimension weights for the overall score. Must sum to 1.0; an invalid
/// vector is rejected at construction, never silently renormalized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub skills: f64,
    pub experience: f64,
    pub education: f64,
    pub location: f64,
    pub title: f64,
    pub salary: f64,
}

impl ScoringWeights {
    pub fn new(
        skills: f64,
        experience: f64,
        education: f64,
        location: f64,
        title: f64,
        salary: f64,
    ) -> Result<Self, InputValidationError> {
        let weights = Self {
            skills,
            experience,
            education,
            location,
            title,
            salary,
        };
        weights.validate()?;
        Ok(weights)
    }

    pub fn validate(&self) -> Result<(), InputValidationError> {
        for (name, value) in self.named() {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(InputValidationError::WeightOutOfRange { name, value });
            }
        }

        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(InputValidationError::WeightSumMismatch {
                sum,
                tolerance: WEIGHT_SUM_TOLERANCE,
            });
        }
        Ok(())
    }

    pub fn sum(&self) -> f64 {
        self.skills + self.experience + self.education + self.location + self.title + self.salary
    }

    fn named(&self) -> [(&'static str, f64); 6] {
        [
            ("skills", self.skills),
            ("experience", self.experience),
            ("education", self.education),
            ("location", self.location),
            ("title", self.title),
            ("salary", self.salary),
        ]
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        DEFAULT_WEIGHTS
    }
}
