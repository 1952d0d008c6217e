// src/types/score.rs
use serde::{Deserialize, Serialize};
use std::fmt;

use super::JobPosting;

/// Compatibility percentage for one posting. Recomputed on every run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompatibilityScore(u8);

impl CompatibilityScore {
    /// Values above 100 are capped
    pub fn new(value: u8) -> Self {
        Self(value.min(100))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for CompatibilityScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Display tier derived from a score, in increasing order of fit
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompatibilityBucket {
    Low,
    Medium,
    High,
}

impl CompatibilityBucket {
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    /// CSS class used by the HTML report
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Low => "compatibility-low",
            Self::Medium => "compatibility-medium",
            Self::High => "compatibility-high",
        }
    }

    /// Badge color: neutral gray, warning orange, success green
    pub fn color(self) -> &'static str {
        match self {
            Self::Low => "#6c757d",
            Self::Medium => "#ffa500",
            Self::High => "#28a745",
        }
    }
}

impl fmt::Display for CompatibilityBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A posting together with the score and bucket computed for it in this run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredPosting {
    pub posting: JobPosting,
    pub score: CompatibilityScore,
    pub bucket: CompatibilityBucket,
}

impl ScoredPosting {
    /// Text shown inside the report badge
    pub fn badge(&self) -> String {
        format!("Compatibility: {}", self.score)
    }
}
