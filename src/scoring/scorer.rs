// src/scoring/scorer.rs
//! Keyword compatibility scorer.
//!
//! Scoring formula:
//! raw = matches / total * 100          # share of profile keywords found
//!     + 2.5 * key_skill_hits           # flat bonus per key skill found
//! score = trunc(clamp(clamp(raw, 35, 95) + jitter(-5..=5), 35, 95))
//!
//! The jitter source is injected so runs can be reproduced.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::bucket::classify;
use crate::types::{CompatibilityScore, JobPosting, KeywordProfile, ScoredPosting};

pub const SCORE_FLOOR: u8 = 35;
pub const SCORE_CEILING: u8 = 95;
pub const JITTER_SPREAD: i32 = 5;
pub const KEY_SKILL_BONUS: f64 = 2.5;

/// Curated high-importance terms that earn a bonus on top of the profile share
pub const KEY_SKILLS: [&str; 7] = [
    "python",
    "sql",
    "power bi",
    "tableau",
    "data",
    "analytics",
    "business intelligence",
];

/// Source of the symmetric integer perturbation added after the first clamp
pub trait Jitter {
    /// Return an offset in `-spread..=spread`
    fn offset(&mut self, spread: i32) -> i32;
}

/// Uniform jitter drawn from any `rand` generator
pub struct RandomJitter<R> {
    rng: R,
}

impl<R: Rng> RandomJitter<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomJitter<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> Jitter for RandomJitter<R> {
    fn offset(&mut self, spread: i32) -> i32 {
        let spread = spread.abs();
        if spread == 0 {
            return 0;
        }
        self.rng.gen_range(-spread..=spread)
    }
}

/// Constant offset, clamped to the spread. `FixedJitter(0)` disables jitter.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedJitter(pub i32);

impl Jitter for FixedJitter {
    fn offset(&mut self, spread: i32) -> i32 {
        let spread = spread.abs();
        self.0.clamp(-spread, spread)
    }
}

/// Components of a score before any clamping or jitter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub matches: usize,
    pub total: usize,
    pub base: f64,
    pub key_skill_hits: usize,
    pub bonus: f64,
}

impl ScoreBreakdown {
    pub fn raw(&self) -> f64 {
        self.base + self.bonus
    }
}

pub struct CompatibilityScorer {
    profile: KeywordProfile,
}

impl CompatibilityScorer {
    pub fn new(profile: KeywordProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &KeywordProfile {
        &self.profile
    }

    /// Compute the unclamped components for a posting
    pub fn breakdown(&self, posting: &JobPosting) -> ScoreBreakdown {
        let search_text = posting.search_text();

        let total = self.profile.len();
        let matches = self.profile.count_matches(&search_text);

        // An empty profile is rejected at config load; here it just scores zero
        let base = if total > 0 {
            matches as f64 / total as f64 * 100.0
        } else {
            0.0
        };

        let key_skill_hits = KEY_SKILLS
            .iter()
            .filter(|skill| search_text.contains(*skill))
            .count();

        ScoreBreakdown {
            matches,
            total,
            base,
            key_skill_hits,
            bonus: key_skill_hits as f64 * KEY_SKILL_BONUS,
        }
    }

    /// Score a posting. Never fails; the result is always within the floor and ceiling.
    pub fn score<J: Jitter + ?Sized>(&self, posting: &JobPosting, jitter: &mut J) -> CompatibilityScore {
        let breakdown = self.breakdown(posting);
        let floor = f64::from(SCORE_FLOOR);
        let ceiling = f64::from(SCORE_CEILING);

        let clamped = breakdown.raw().clamp(floor, ceiling);
        let offset = jitter.offset(JITTER_SPREAD);
        let value = (clamped + f64::from(offset)).clamp(floor, ceiling).trunc() as u8;

        debug!(
            title = %posting.title,
            matches = breakdown.matches,
            total = breakdown.total,
            key_skill_hits = breakdown.key_skill_hits,
            raw = breakdown.raw(),
            offset,
            score = value,
            "Scored posting"
        );

        CompatibilityScore::new(value)
    }

    /// Score and classify, keeping the posting alongside its result
    pub fn assess<J: Jitter + ?Sized>(&self, posting: &JobPosting, jitter: &mut J) -> ScoredPosting {
        let score = self.score(posting, jitter);
        ScoredPosting {
            posting: posting.clone(),
            score,
            bucket: classify(score),
        }
    }
}
