// src/types/posting.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single job advertisement, immutable once fetched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub title: String,
    pub company: String,
    pub location: String,
    /// Markup is already stripped by the feed layer
    pub description: String,
    /// Unique per posting, used for dedup
    pub url: String,
    pub posted_date: DateTime<Utc>,
    /// Feed the posting came from
    pub source: String,
}

impl JobPosting {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            company: "Unknown Company".to_string(),
            location: "Remote".to_string(),
            description: description.into(),
            url: String::new(),
            posted_date: Utc::now(),
            source: "manual".to_string(),
        }
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = company.into();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Lowercased title and description, the text every keyword check runs against
    pub fn search_text(&self) -> String {
        format!("{} {}", self.title, self.description).to_lowercase()
    }
}
