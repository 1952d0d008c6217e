// src/pipeline.rs
//! One end-to-end batch: fetch, score, generate, archive, report

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{error, info, info_span, Instrument};

use crate::archive::create_archive;
use crate::config::AppConfig;
use crate::documents::{DocumentGenerator, TemplateEngine};
use crate::feeds::FeedFetcher;
use crate::fs_ops::FsOps;
use crate::mailer::{MailContent, MailOutcome, Mailer};
use crate::report::{render_html, render_job_summary, render_text, BucketCounts, Report, ReportEntry};
use crate::scoring::{CompatibilityScorer, Jitter};
use crate::types::JobPosting;

pub const REPORT_FILE: &str = "report.html";

/// Whether the report leaves the machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Email,
    LocalOnly,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub output_dir: PathBuf,
    pub jobs: usize,
    pub documents: usize,
    pub buckets: BucketCounts,
    pub archive: Option<PathBuf>,
    pub report: Option<PathBuf>,
    /// `None` when delivery was local only or nothing was found
    pub mail: Option<MailOutcome>,
}

impl RunSummary {
    pub(crate) fn empty(output_dir: &Path) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
            jobs: 0,
            documents: 0,
            buckets: BucketCounts::default(),
            archive: None,
            report: None,
            mail: None,
        }
    }
}

pub struct Pipeline {
    config: AppConfig,
    scorer: CompatibilityScorer,
    fetcher: FeedFetcher,
}

impl Pipeline {
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let scorer = CompatibilityScorer::new(config.profile());
        let fetcher = FeedFetcher::new(
            config.job_search.feeds.clone(),
            config.job_search.max_per_feed,
        )?;

        Ok(Self {
            config,
            scorer,
            fetcher,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Full daily run against the configured feeds
    pub async fn run<J: Jitter + ?Sized>(&self, jitter: &mut J) -> Result<RunSummary> {
        let date = Local::now().date_naive();
        let span = info_span!("run", date = %date);

        async move {
            info!("Starting daily job search automation");

            let output_dir = self.config.output.daily_dir(date);
            FsOps::ensure_dir_exists(&output_dir).await?;

            let postings = self.fetcher.fetch_all(self.scorer.profile()).await;
            if postings.is_empty() {
                info!("No relevant jobs found today");
                return Ok(RunSummary::empty(&output_dir));
            }

            let summary = self
                .process_postings(postings, &output_dir, date, jitter, Delivery::Email)
                .await?;

            info!("Automation completed successfully");
            info!("Files generated in: {}", summary.output_dir.display());
            info!("Total jobs processed: {}", summary.jobs);
            info!("Documents generated: {}", summary.documents);
            Ok::<_, anyhow::Error>(summary)
        }
        .instrument(span)
        .await
    }

    /// Score, generate, archive and report a batch that is already in memory.
    /// Per-posting failures are logged and skipped.
    pub async fn process_postings<J: Jitter + ?Sized>(
        &self,
        postings: Vec<JobPosting>,
        output_dir: &Path,
        date: NaiveDate,
        jitter: &mut J,
        delivery: Delivery,
    ) -> Result<RunSummary> {
        FsOps::ensure_dir_exists(output_dir).await?;

        let engine = TemplateEngine::load(&self.config.output.templates_dir)
            .await
            .context("Failed to load document templates")?;
        let generator = DocumentGenerator::new(
            engine,
            self.config.personal_info.clone(),
            output_dir,
            date,
        )
        .with_pdf(self.config.output.compile_pdf);

        let mut report = Report::new(date, Local::now().naive_local());
        let mut artifacts = Vec::new();
        let total = postings.len();

        for (i, posting) in postings.into_iter().enumerate() {
            let span = info_span!("posting", index = i + 1, title = %posting.title);

            let (scored, documents) = async {
                let scored = self.scorer.assess(&posting, jitter);
                info!(
                    "Processing job {}/{}: {} ({}, {})",
                    i + 1,
                    total,
                    posting.title,
                    scored.score,
                    scored.bucket
                );
                let documents = generator.generate_for(&posting).await;
                (scored, documents)
            }
            .instrument(span)
            .await;

            let names = documents.iter().map(|p| FsOps::file_name(p)).collect();
            artifacts.extend(documents);
            report.push(ReportEntry::new(scored, names));
        }

        let job_summary = render_job_summary(&report);
        let archive_dir = output_dir.to_path_buf();
        let archived = tokio::task::spawn_blocking(move || {
            create_archive(&archive_dir, date, &artifacts, &job_summary)
        })
        .await
        .context("Archive task panicked")
        .and_then(|result| result);

        let archive = match archived {
            Ok(path) => Some(path),
            Err(e) => {
                error!("Error creating ZIP file: {:#}", e);
                None
            }
        };

        let html = render_html(&report);
        let report_path = output_dir.join(REPORT_FILE);
        FsOps::write_file_safe(&report_path, &html).await?;
        info!("Report saved: {}", report_path.display());

        let mail = match delivery {
            Delivery::Email => {
                let text = render_text(&report);
                let subject = report.subject();
                let mailer = Mailer::new(self.config.email_config.clone());
                let outcome = mailer
                    .send_report(&MailContent {
                        subject: &subject,
                        text: &text,
                        html: &html,
                        attachment: archive.as_deref(),
                    })
                    .await;
                if !outcome.is_sent() {
                    info!("Email not sent, report saved locally");
                }
                Some(outcome)
            }
            Delivery::LocalOnly => None,
        };

        Ok(RunSummary {
            output_dir: output_dir.to_path_buf(),
            jobs: report.jobs(),
            documents: report.documents(),
            buckets: report.bucket_counts(),
            archive,
            report: Some(report_path),
            mail,
        })
    }
}
