// src/report/mod.rs
//! Daily report model plus its HTML and plain-text renderings

pub mod html;
pub mod text;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::scoring::insights::{estimate_salary_range, experience_requirement, extract_job_skills};
use crate::types::{CompatibilityBucket, ScoredPosting};

pub use html::{escape_html, render_html};
pub use text::{preview, render_job_summary, render_text};

/// Number of postings per bucket in one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BucketCounts {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

impl BucketCounts {
    pub fn add(&mut self, bucket: CompatibilityBucket) {
        match bucket {
            CompatibilityBucket::Low => self.low += 1,
            CompatibilityBucket::Medium => self.medium += 1,
            CompatibilityBucket::High => self.high += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.low + self.medium + self.high
    }
}

/// One scored posting with the details shown in its report card
#[derive(Debug, Clone)]
pub struct ReportEntry {
    pub scored: ScoredPosting,
    pub salary: &'static str,
    pub skills: Vec<String>,
    pub experience: &'static str,
    /// File names of the documents generated for this posting
    pub documents: Vec<String>,
}

impl ReportEntry {
    pub fn new(scored: ScoredPosting, documents: Vec<String>) -> Self {
        let posting = &scored.posting;
        Self {
            salary: estimate_salary_range(posting),
            skills: extract_job_skills(posting),
            experience: experience_requirement(posting),
            documents,
            scored,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Report {
    pub date: NaiveDate,
    pub generated_at: NaiveDateTime,
    pub entries: Vec<ReportEntry>,
}

impl Report {
    pub fn new(date: NaiveDate, generated_at: NaiveDateTime) -> Self {
        Self {
            date,
            generated_at,
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, entry: ReportEntry) {
        self.entries.push(entry);
    }

    pub fn jobs(&self) -> usize {
        self.entries.len()
    }

    pub fn documents(&self) -> usize {
        self.entries.iter().map(|e| e.documents.len()).sum()
    }

    pub fn bucket_counts(&self) -> BucketCounts {
        let mut counts = BucketCounts::default();
        for entry in &self.entries {
            counts.add(entry.scored.bucket);
        }
        counts
    }

    pub fn subject(&self) -> String {
        format!("Daily Job Search Report - {}", self.date.format("%Y-%m-%d"))
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::types::{CompatibilityScore, JobPosting};

    pub fn entry(title: &str, score: u8, bucket: CompatibilityBucket) -> ReportEntry {
        let posting = JobPosting::new(title, "Senior role with Python and SQL in Madrid")
            .with_company("Acme <Data>")
            .with_location("Madrid")
            .with_url("https://jobs.example.com/1?a=1&b=2");
        ReportEntry::new(
            ScoredPosting {
                posting,
                score: CompatibilityScore::new(score),
                bucket,
            },
            vec![format!("CV_Acme_{}.typ", title.replace(' ', "_"))],
        )
    }

    pub fn report() -> Report {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let mut report = Report::new(date, date.and_hms_opt(9, 0, 0).unwrap());
        report.push(entry("Data Analyst", 71, CompatibilityBucket::Medium));
        report.push(entry("BI Lead", 93, CompatibilityBucket::High));
        report
    }
}
