// src/feeds/fetcher.rs
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reqwest::Client;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{info, warn};

use super::cleaning::{clean_description, extract_location};
use super::parser::{parse_feed, FeedEntry};
use crate::error::ItemError;
use crate::scoring::filter_relevant;
use crate::types::{JobPosting, KeywordProfile};

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const UNKNOWN_COMPANY: &str = "Unknown Company";

pub struct FeedFetcher {
    client: Client,
    feeds: Vec<String>,
    max_per_feed: usize,
}

impl FeedFetcher {
    pub fn new(feeds: Vec<String>, max_per_feed: usize) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            feeds,
            max_per_feed,
        })
    }

    /// Fetch every feed in order, then keep relevant postings with unique URLs.
    /// A feed that cannot be fetched or parsed is logged and skipped.
    pub async fn fetch_all(&self, profile: &KeywordProfile) -> Vec<JobPosting> {
        let mut postings = Vec::new();

        for url in &self.feeds {
            match self.fetch_feed(url).await {
                Ok(mut batch) => {
                    info!("Fetched {} entries from {}", batch.len(), url);
                    postings.append(&mut batch);
                }
                Err(e) => {
                    let err = ItemError::Feed {
                        url: url.clone(),
                        message: format!("{:#}", e),
                    };
                    warn!("{}", err);
                }
            }
        }

        let fetched = postings.len();
        let relevant = filter_relevant(postings, profile);
        let unique = dedup_by_url(relevant);

        info!(
            "Collected {} relevant postings ({} fetched)",
            unique.len(),
            fetched
        );
        unique
    }

    pub async fn fetch_feed(&self, url: &str) -> Result<Vec<JobPosting>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to fetch feed")?;

        if !response.status().is_success() {
            anyhow::bail!("HTTP error: {}", response.status());
        }

        let body = response
            .text()
            .await
            .context("Failed to read feed body")?;

        let fetched_at = Utc::now();
        let entries = parse_feed(&body)?;

        Ok(entries
            .into_iter()
            .take(self.max_per_feed)
            .map(|entry| entry_to_posting(entry, url, fetched_at))
            .collect())
    }
}

/// Turn a raw feed entry into a cleaned posting
pub fn entry_to_posting(entry: FeedEntry, source: &str, fetched_at: DateTime<Utc>) -> JobPosting {
    let location = extract_location(entry.location.as_deref(), &entry.summary);
    let description = clean_description(&entry.summary);
    let company = entry
        .author
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .unwrap_or_else(|| UNKNOWN_COMPANY.to_string());
    let posted_date = entry
        .published
        .as_deref()
        .and_then(parse_published)
        .unwrap_or(fetched_at);

    JobPosting {
        title: entry.title.trim().to_string(),
        company,
        location,
        description,
        url: entry.link.trim().to_string(),
        posted_date,
        source: source.to_string(),
    }
}

/// RFC 2822 (RSS) or RFC 3339 (Atom)
pub fn parse_published(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// First occurrence wins; order is preserved
pub fn dedup_by_url(postings: Vec<JobPosting>) -> Vec<JobPosting> {
    let mut seen = HashSet::new();
    postings
        .into_iter()
        .filter(|p| seen.insert(p.url.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(title: &str, link: &str) -> FeedEntry {
        FeedEntry {
            title: title.to_string(),
            link: link.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_entry_defaults() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();
        let posting = entry_to_posting(entry(" Data Analyst ", "https://a/1"), "feed", now);

        assert_eq!(posting.title, "Data Analyst");
        assert_eq!(posting.company, UNKNOWN_COMPANY);
        assert_eq!(posting.location, "Remote");
        assert_eq!(posting.description, "No description available");
        assert_eq!(posting.posted_date, now);
        assert_eq!(posting.source, "feed");
    }

    #[test]
    fn test_entry_fields_are_cleaned() {
        let now = Utc::now();
        let mut raw = entry("BI Developer", "https://a/2");
        raw.author = Some("Acme".to_string());
        raw.summary = "<p>Power BI en <b>Valencia</b></p>".to_string();
        raw.published = Some("2025-06-02T08:00:00Z".to_string());

        let posting = entry_to_posting(raw, "feed", now);
        assert_eq!(posting.company, "Acme");
        assert_eq!(posting.location, "Valencia");
        assert_eq!(posting.description, "Power BI en Valencia");
        assert_eq!(
            posting.posted_date,
            Utc.with_ymd_and_hms(2025, 6, 2, 8, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_published_formats() {
        assert!(parse_published("Mon, 02 Jun 2025 09:30:00 +0200").is_some());
        assert!(parse_published("2025-06-02T08:00:00+02:00").is_some());
        assert!(parse_published("yesterday").is_none());
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let postings = vec![
            JobPosting::new("A", "").with_url("https://x/1"),
            JobPosting::new("B", "").with_url("https://x/2"),
            JobPosting::new("C", "").with_url("https://x/1"),
        ];
        let unique = dedup_by_url(postings);
        let titles: Vec<_> = unique.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_unreachable_feed_is_skipped() {
        let fetcher = FeedFetcher::new(vec!["http://127.0.0.1:9/feed".to_string()], 5).unwrap();
        let postings = fetcher.fetch_all(&KeywordProfile::new(["python"])).await;
        assert!(postings.is_empty());
    }
}
