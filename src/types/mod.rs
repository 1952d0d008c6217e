// src/types/mod.rs
//! Domain records shared by the scorer and its collaborators

pub mod posting;
pub mod profile;
pub mod score;

pub use posting::JobPosting;
pub use profile::KeywordProfile;
pub use score::{CompatibilityBucket, CompatibilityScore, ScoredPosting};
