// src/demo.rs
//! Offline showcase: built-in postings spanning every compatibility bucket

use anyhow::{Context, Result};
use chrono::Local;
use std::path::Path;
use tracing::info;

use crate::fs_ops::FsOps;
use crate::pipeline::{Delivery, Pipeline, RunSummary};
use crate::scoring::Jitter;
use crate::types::JobPosting;

pub const DEMO_DIR: &str = "demo";

/// One posting expected to land in each bucket under the default keyword profile
pub fn sample_postings() -> Vec<JobPosting> {
    vec![
        JobPosting::new(
            "Marketing Coordinator",
            "Coordinate campaigns, events and social media calendars for a retail brand.",
        )
        .with_company("Retail Brands S.A.")
        .with_location("Valencia")
        .with_url("https://jobs.example.com/demo/marketing-coordinator")
        .with_source("demo"),
        JobPosting::new(
            "Business Intelligence Analyst",
            "Big data analytics with Python, SQL, Power BI and Tableau. You will own ETL \
             jobs and the data warehouse on Azure. A data science background is a plus.",
        )
        .with_company("Analytics Corp")
        .with_location("Madrid")
        .with_url("https://jobs.example.com/demo/bi-analyst")
        .with_source("demo"),
        JobPosting::new(
            "Senior Data Analyst",
            "Lead business intelligence and big data analytics: Python (pandas, numpy), SQL, \
             Power BI, Tableau and visualization. ETL into the data warehouse, machine learning \
             and data science on Azure Databricks with Spark. 5 years of experience.",
        )
        .with_company("DataCorp")
        .with_location("Bilbao")
        .with_url("https://jobs.example.com/demo/senior-data-analyst")
        .with_source("demo"),
    ]
}

/// Score the samples, generate their documents under `<base_dir>/demo` and copy the
/// HTML report to `out`. Nothing is sent.
pub async fn run_demo<J: Jitter + ?Sized>(
    pipeline: &Pipeline,
    out: &Path,
    jitter: &mut J,
) -> Result<RunSummary> {
    let output_dir = pipeline.config().output.base_dir.join(DEMO_DIR);
    let date = Local::now().date_naive();

    let summary = pipeline
        .process_postings(sample_postings(), &output_dir, date, jitter, Delivery::LocalOnly)
        .await?;

    if let Some(report) = &summary.report {
        if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
            FsOps::ensure_dir_exists(parent).await?;
        }
        tokio::fs::copy(report, out)
            .await
            .with_context(|| format!("Failed to copy report to {}", out.display()))?;
        info!("Demo report written to {}", out.display());
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::scoring::{classify, FixedJitter};
    use crate::types::CompatibilityBucket;

    #[test]
    fn test_samples_cover_every_bucket() {
        let scorer = crate::scoring::CompatibilityScorer::new(AppConfig::default().profile());
        let buckets: Vec<_> = sample_postings()
            .iter()
            .map(|p| classify(scorer.score(p, &mut FixedJitter(0))))
            .collect();

        assert_eq!(
            buckets,
            vec![
                CompatibilityBucket::Low,
                CompatibilityBucket::Medium,
                CompatibilityBucket::High
            ]
        );
    }

    #[tokio::test]
    async fn test_run_demo_writes_report() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.output.base_dir = dir.path().join("out");
        config.output.templates_dir = dir.path().join("templates");
        let pipeline = Pipeline::from_config(config).unwrap();

        let target = dir.path().join("demo_report.html");
        let summary = run_demo(&pipeline, &target, &mut FixedJitter(0)).await.unwrap();

        assert_eq!(summary.jobs, 3);
        assert_eq!(summary.buckets.high, 1);
        assert!(summary.mail.is_none());
        let html = std::fs::read_to_string(&target).unwrap();
        assert!(html.contains("Senior Data Analyst"));
    }
}
