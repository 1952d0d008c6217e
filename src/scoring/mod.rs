// src/scoring/mod.rs
//! Compatibility scoring, bucket classification and the relevance pre-filter

pub mod bucket;
pub mod insights;
pub mod relevance;
pub mod scorer;

pub use bucket::classify;
pub use relevance::{filter_relevant, is_relevant};
pub use scorer::{
    CompatibilityScorer, FixedJitter, Jitter, RandomJitter, ScoreBreakdown, KEY_SKILLS,
    SCORE_CEILING, SCORE_FLOOR,
};
