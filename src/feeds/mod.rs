// src/feeds/mod.rs
//! RSS/Atom job feeds: download, parse, clean, filter and dedup

pub mod cleaning;
pub mod fetcher;
pub mod parser;

pub use cleaning::{clean_description, extract_location};
pub use fetcher::{dedup_by_url, FeedFetcher};
pub use parser::{parse_feed, FeedEntry};
