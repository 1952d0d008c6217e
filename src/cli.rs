// src/cli.rs
use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::demo::run_demo;
use crate::error::ConfigError;
use crate::fs_ops::OutputStatus;
use crate::pipeline::Pipeline;
use crate::scheduler::Scheduler;
use crate::scoring::{classify, CompatibilityScorer, RandomJitter};
use crate::types::JobPosting;

#[derive(Parser)]
#[command(name = "job-autopilot")]
#[command(about = "Daily job search automation: fetch offers, score compatibility, generate applications")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file
    #[arg(long, global = true, default_value = "config.json")]
    pub config: PathBuf,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the daily batch once
    Run,
    /// Run the batch at the configured times every day until Ctrl-C
    Schedule,
    /// Score an ad-hoc posting against the keyword profile
    Score {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Seed for a reproducible perturbation
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Score built-in sample postings and write the HTML report, without sending mail
    Demo {
        #[arg(long, default_value = "demo_report.html")]
        out: PathBuf,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Show today's output directory and configuration files
    Status,
    /// Write the default configuration if it does not exist
    InitConfig,
}

fn jitter(seed: Option<u64>) -> RandomJitter<rand::rngs::StdRng> {
    match seed {
        Some(seed) => RandomJitter::seeded(seed),
        None => RandomJitter::from_entropy(),
    }
}

/// Offline commands still work before `init-config` has been run
fn load_or_default(path: &Path) -> Result<AppConfig> {
    match AppConfig::load(path) {
        Ok(config) => Ok(config),
        Err(ConfigError::NotFound(_)) => {
            warn!(
                "Configuration {} not found, using defaults (run init-config to create it)",
                path.display()
            );
            Ok(AppConfig::default())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn handle_command(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Run => {
            let config = AppConfig::load(&cli.config)?;
            let pipeline = Pipeline::from_config(config)?;
            let summary = pipeline.run(&mut RandomJitter::from_entropy()).await?;

            info!("✅ Run finished: {}", summary.output_dir.display());
            info!("   Jobs: {}", summary.jobs);
            info!("   Documents: {}", summary.documents);
            info!(
                "   Compatibility: {} high, {} medium, {} low",
                summary.buckets.high, summary.buckets.medium, summary.buckets.low
            );
            if let Some(archive) = &summary.archive {
                info!("   Archive: {}", archive.display());
            }
            if let Some(mail) = &summary.mail {
                info!("   Email: {:?}", mail);
            }
        }

        Command::Schedule => {
            let config = AppConfig::load(&cli.config)?;
            let mut scheduler = Scheduler::new(cli.config.clone(), &config)?;
            scheduler.run().await?;
            info!("Scheduler stopped after {} executions", scheduler.execution_count());
        }

        Command::Score {
            title,
            description,
            seed,
        } => {
            let config = load_or_default(&cli.config)?;
            let scorer = CompatibilityScorer::new(config.profile());
            let posting = JobPosting::new(title, description);

            let breakdown = scorer.breakdown(&posting);
            let score = scorer.score(&posting, &mut jitter(seed));
            let bucket = classify(score);

            info!("{}: {} ({})", posting.title, score, bucket);
            info!(
                "   Keywords matched: {}/{} (base {:.2})",
                breakdown.matches, breakdown.total, breakdown.base
            );
            info!(
                "   Key skills: {} (+{:.1})",
                breakdown.key_skill_hits, breakdown.bonus
            );
            info!("   Raw before clamp: {:.2}", breakdown.raw());
        }

        Command::Demo { out, seed } => {
            let config = load_or_default(&cli.config)?;
            let pipeline = Pipeline::from_config(config)?;
            let summary = run_demo(&pipeline, &out, &mut jitter(seed)).await?;

            info!("✅ Demo report: {}", out.display());
            info!(
                "   {} postings: {} high, {} medium, {} low",
                summary.jobs, summary.buckets.high, summary.buckets.medium, summary.buckets.low
            );
        }

        Command::Status => {
            let config = load_or_default(&cli.config)?;
            let today = config.output.daily_dir(Local::now().date_naive());
            let status = OutputStatus::scan(&today).await?;

            info!("Output directory: {}", status.dir.display());
            if status.exists {
                info!("   CVs: {}", status.cvs);
                info!("   Cover letters: {}", status.cover_letters);
                info!("   ZIP files: {}", status.archives);
                if let Some(latest) = &status.latest_archive {
                    info!("   Latest ZIP: {}", latest);
                }
            } else {
                info!("   No output for today yet");
            }

            let mark = |exists: bool| if exists { "✅" } else { "❌" };
            info!("{} {}", mark(cli.config.exists()), cli.config.display());
            info!("{} .env", mark(Path::new(".env").exists()));
        }

        Command::InitConfig => {
            if AppConfig::write_default(&cli.config)? {
                info!("✅ Created {}", cli.config.display());
                info!("   Edit personal_info and email_config before the first run");
            } else {
                info!("❌ {} already exists, leaving it untouched", cli.config.display());
            }
        }
    }

    Ok(())
}
