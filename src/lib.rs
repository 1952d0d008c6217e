// src/lib.rs
//! Daily job search automation.
//!
//! Postings are collected from RSS feeds, filtered for relevance, scored for
//! compatibility against a keyword profile and bucketed into Low / Medium / High.
//! Each posting gets a tailored résumé and cover letter; the day's documents are
//! bundled into a ZIP and reported by email.

pub mod archive;
pub mod cli;
pub mod config;
pub mod demo;
pub mod documents;
pub mod error;
pub mod feeds;
pub mod fs_ops;
pub mod mailer;
pub mod pipeline;
pub mod report;
pub mod scheduler;
pub mod scoring;
pub mod types;

pub use config::AppConfig;
pub use error::{ConfigError, ItemError};
pub use pipeline::{Delivery, Pipeline, RunSummary};
pub use scoring::{classify, CompatibilityScorer, FixedJitter, Jitter, RandomJitter};
pub use types::{CompatibilityBucket, CompatibilityScore, JobPosting, KeywordProfile, ScoredPosting};
