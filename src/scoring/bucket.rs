// src/scoring/bucket.rs
use crate::types::{CompatibilityBucket, CompatibilityScore};

/// Scores strictly above this are at least Medium
pub const MEDIUM_ABOVE: u8 = 60;
/// Scores strictly above this are High
pub const HIGH_ABOVE: u8 = 90;

/// Map a score to its display bucket.
///
/// Total over 0..=100: boundary values fall to the lower bucket, so 60 is
/// Low and 90 is Medium.
pub fn classify(score: CompatibilityScore) -> CompatibilityBucket {
    match score.value() {
        v if v > HIGH_ABOVE => CompatibilityBucket::High,
        v if v > MEDIUM_ABOVE => CompatibilityBucket::Medium,
        _ => CompatibilityBucket::Low,
    }
}
