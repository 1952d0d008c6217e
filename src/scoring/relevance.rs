// src/scoring/relevance.rs
use tracing::debug;

use crate::types::{JobPosting, KeywordProfile};

/// A posting is relevant when at least one profile keyword appears in its title or description
pub fn is_relevant(posting: &JobPosting, profile: &KeywordProfile) -> bool {
    profile.any_match(&posting.search_text())
}

/// Keep only relevant postings, preserving order
pub fn filter_relevant(postings: Vec<JobPosting>, profile: &KeywordProfile) -> Vec<JobPosting> {
    postings
        .into_iter()
        .filter(|posting| {
            let relevant = is_relevant(posting, profile);
            if !relevant {
                debug!("Dropping irrelevant posting: {}", posting.title);
            }
            relevant
        })
        .collect()
}
