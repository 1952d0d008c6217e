// src/scheduler.rs
//! Serial daily scheduler. One run at a time, each bounded by a wall-clock timeout
//! and retried after a delay when it fails.

use anyhow::{bail, Context, Result};
use chrono::{Duration as ChronoDuration, Local, NaiveDateTime, NaiveTime};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::error::ConfigError;
use crate::pipeline::{Pipeline, RunSummary};
use crate::scoring::RandomJitter;

/// Free space required on the working directory's filesystem before a slot runs
pub const MIN_FREE_BYTES: u64 = 1024 * 1024 * 1024;

/// Daily wall-clock slots, sorted and without repeats
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailySchedule {
    slots: Vec<NaiveTime>,
}

impl DailySchedule {
    pub fn parse<S: AsRef<str>>(times: &[S]) -> Result<Self, ConfigError> {
        let mut slots = times
            .iter()
            .map(|t| {
                let t = t.as_ref().trim();
                NaiveTime::parse_from_str(t, "%H:%M")
                    .map_err(|_| ConfigError::InvalidScheduleTime(t.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        if slots.is_empty() {
            return Err(ConfigError::Invalid(
                "schedule.times must list at least one HH:MM entry".to_string(),
            ));
        }

        slots.sort();
        slots.dedup();
        Ok(Self { slots })
    }

    pub fn slots(&self) -> &[NaiveTime] {
        &self.slots
    }

    /// Earliest slot strictly after `from`; rolls over to tomorrow's first slot
    pub fn next_run(&self, from: NaiveDateTime) -> NaiveDateTime {
        let today = from.date();
        self.slots
            .iter()
            .map(|slot| today.and_time(*slot))
            .find(|candidate| *candidate > from)
            .unwrap_or_else(|| (today + ChronoDuration::days(1)).and_time(self.slots[0]))
    }
}

/// How a scheduled slot ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotOutcome {
    Completed,
    Failed,
    /// Health check failed, nothing was attempted
    Skipped,
    /// A shutdown signal arrived mid-slot
    Interrupted,
}

/// The configuration file must exist and the disk must have room for the day's output
pub fn check_system_health(config_path: &Path, work_dir: &Path, min_free_bytes: u64) -> Result<()> {
    if !config_path.exists() {
        bail!("Required file missing: {}", config_path.display());
    }

    let free = fs4::available_space(work_dir)
        .with_context(|| format!("Failed to read free disk space for {}", work_dir.display()))?;
    if free < min_free_bytes {
        bail!("Low disk space: {} MB free", free / (1024 * 1024));
    }

    Ok(())
}

/// Resolves on SIGINT (Ctrl-C) or, on Unix, SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT, shutting down gracefully"),
        _ = terminate => info!("Received SIGTERM, shutting down gracefully"),
    }
}

/// One attempt. Configuration is reloaded so edits apply to the next slot.
async fn load_and_run(config_path: PathBuf) -> Result<RunSummary> {
    let config = AppConfig::load(&config_path)?;
    let pipeline = Pipeline::from_config(config)?;
    let mut jitter = RandomJitter::from_entropy();
    pipeline.run(&mut jitter).await
}

pub struct Scheduler {
    config_path: PathBuf,
    schedule: DailySchedule,
    timeout: Duration,
    poll: Duration,
    max_retries: u32,
    retry_delay: Duration,
    execution_count: u64,
    last_execution: Option<NaiveDateTime>,
}

impl Scheduler {
    pub fn new(config_path: PathBuf, config: &AppConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            config_path,
            schedule: DailySchedule::parse(&config.schedule.times)?,
            timeout: config.schedule.timeout(),
            poll: Duration::from_secs(config.schedule.poll_seconds),
            max_retries: config.schedule.max_retries.max(1),
            retry_delay: config.schedule.retry_delay(),
            execution_count: 0,
            last_execution: None,
        })
    }

    pub fn execution_count(&self) -> u64 {
        self.execution_count
    }

    pub fn last_execution(&self) -> Option<NaiveDateTime> {
        self.last_execution
    }

    /// Run until SIGINT or SIGTERM. The next slot is only computed once the current one is over.
    pub async fn run(&mut self) -> Result<()> {
        info!("Starting scheduler at {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
        for slot in self.schedule.slots() {
            info!("Scheduled daily automation at {}", slot.format("%H:%M"));
        }

        let shutdown = shutdown_signal();
        tokio::pin!(shutdown);

        loop {
            let next = self.schedule.next_run(Local::now().naive_local());
            info!("Next execution: {}", next.format("%Y-%m-%d %H:%M"));

            loop {
                let remaining = next - Local::now().naive_local();
                let Ok(remaining) = remaining.to_std() else {
                    break;
                };
                if remaining.is_zero() {
                    break;
                }

                tokio::select! {
                    _ = tokio::time::sleep(remaining.min(self.poll)) => {}
                    _ = &mut shutdown => {
                        info!("Stopping scheduler");
                        return Ok(());
                    }
                }
            }

            if self.execute_slot(shutdown.as_mut()).await == SlotOutcome::Interrupted {
                warn!("Shutdown during a scheduled run, abandoning it");
                return Ok(());
            }

            info!("Total executions: {}", self.execution_count);
            if let Some(last) = self.last_execution {
                info!("Last execution: {}", last.format("%Y-%m-%d %H:%M:%S"));
            }
        }
    }

    /// Health check, then the pipeline with retries
    pub async fn execute_slot<S>(&mut self, shutdown: Pin<&mut S>) -> SlotOutcome
    where
        S: Future<Output = ()>,
    {
        info!("{}", "=".repeat(50));
        info!("SCHEDULED JOB EXECUTION STARTED");

        if let Err(e) = check_system_health(&self.config_path, Path::new("."), MIN_FREE_BYTES) {
            error!("System health check failed, skipping execution: {:#}", e);
            return SlotOutcome::Skipped;
        }

        let config_path = self.config_path.clone();
        let outcome = self
            .run_with_retry(|| load_and_run(config_path.clone()), shutdown)
            .await;

        match outcome {
            SlotOutcome::Completed => info!("Scheduled job completed successfully"),
            SlotOutcome::Failed => error!("Scheduled job failed after all retries"),
            SlotOutcome::Skipped | SlotOutcome::Interrupted => {}
        }

        info!("SCHEDULED JOB EXECUTION COMPLETED");
        info!("{}", "=".repeat(50));
        outcome
    }

    /// Up to `max_retries` bounded attempts with `retry_delay` between them.
    /// Attempts never overlap: a timed-out attempt is dropped before the next one starts.
    pub async fn run_with_retry<F, Fut, S>(&mut self, mut attempt: F, mut shutdown: Pin<&mut S>) -> SlotOutcome
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<RunSummary>>,
        S: Future<Output = ()>,
    {
        for n in 1..=self.max_retries {
            info!("Starting automation attempt {}/{}", n, self.max_retries);

            let succeeded = tokio::select! {
                ok = self.bounded(attempt()) => ok,
                _ = shutdown.as_mut() => return SlotOutcome::Interrupted,
            };
            if succeeded {
                return SlotOutcome::Completed;
            }

            warn!("Automation failed on attempt {}", n);
            if n < self.max_retries {
                info!("Waiting {} seconds before retry", self.retry_delay.as_secs());
                tokio::select! {
                    _ = tokio::time::sleep(self.retry_delay) => {}
                    _ = shutdown.as_mut() => return SlotOutcome::Interrupted,
                }
            }
        }

        error!("All {} attempts failed", self.max_retries);
        SlotOutcome::Failed
    }

    /// One run under the wall-clock timeout. Success is counted and timestamped.
    pub async fn bounded<F>(&mut self, run: F) -> bool
    where
        F: Future<Output = Result<RunSummary>>,
    {
        match tokio::time::timeout(self.timeout, run).await {
            Ok(Ok(summary)) => {
                info!(
                    "Scheduled job completed: {} jobs, {} documents",
                    summary.jobs, summary.documents
                );
                self.execution_count += 1;
                self.last_execution = Some(Local::now().naive_local());
                true
            }
            Ok(Err(e)) => {
                error!("Scheduled job failed: {:#}", e);
                false
            }
            Err(_) => {
                error!(
                    "Scheduled job timed out after {} minutes",
                    self.timeout.as_secs() / 60
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::future::pending;
    use std::pin::pin;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_parse_sorts_and_dedups() {
        let schedule = DailySchedule::parse(&["19:00", "09:00", "19:00"]).unwrap();
        assert_eq!(schedule.slots().len(), 2);
        assert_eq!(schedule.slots()[0], NaiveTime::from_hms_opt(9, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!(
            DailySchedule::parse(&["9am"]),
            Err(ConfigError::InvalidScheduleTime(_))
        ));
        let empty: [&str; 0] = [];
        assert!(matches!(
            DailySchedule::parse(&empty),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_next_run_same_day() {
        let schedule = DailySchedule::parse(&["09:00", "19:00"]).unwrap();
        assert_eq!(schedule.next_run(at(7, 30)), at(9, 0));
        assert_eq!(schedule.next_run(at(9, 0)), at(19, 0));
        assert_eq!(schedule.next_run(at(12, 0)), at(19, 0));
    }

    #[test]
    fn test_next_run_rolls_over_to_tomorrow() {
        let schedule = DailySchedule::parse(&["09:00", "19:00"]).unwrap();
        let expected = NaiveDate::from_ymd_opt(2025, 6, 2)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        assert_eq!(schedule.next_run(at(20, 15)), expected);
    }

    fn scheduler(dir: &Path) -> Scheduler {
        let mut config = AppConfig::default();
        config.schedule.timeout_minutes = 30;
        config.schedule.max_retries = 3;
        config.schedule.retry_delay_seconds = 300;
        Scheduler::new(dir.join("config.json"), &config).unwrap()
    }

    fn summary() -> RunSummary {
        RunSummary::empty(Path::new("out"))
    }

    fn failure() -> Result<RunSummary> {
        Err(anyhow::anyhow!("feed unavailable"))
    }

    /// Decrements the in-flight counter when an attempt finishes or is dropped
    struct InFlight(Arc<AtomicUsize>);

    impl Drop for InFlight {
        fn drop(&mut self) {
            self.0.fetch_sub(1, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounded_run_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let mut scheduler = scheduler(dir.path());

        let finished = scheduler
            .bounded(async {
                tokio::time::sleep(Duration::from_secs(2 * 3600)).await;
                Ok::<_, anyhow::Error>(summary())
            })
            .await;

        assert!(!finished);
        assert_eq!(scheduler.execution_count(), 0);
        assert!(scheduler.last_execution().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounded_run_records_success() {
        let dir = tempfile::tempdir().unwrap();
        let mut scheduler = scheduler(dir.path());

        let finished = scheduler
            .bounded(async {
                tokio::time::sleep(Duration::from_secs(5 * 60)).await;
                Ok::<_, anyhow::Error>(summary())
            })
            .await;

        assert!(finished);
        assert_eq!(scheduler.execution_count(), 1);
        assert!(scheduler.last_execution().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_recovers_after_failures() {
        let dir = tempfile::tempdir().unwrap();
        let mut scheduler = scheduler(dir.path());
        let calls = Arc::new(AtomicUsize::new(0));
        let started = tokio::time::Instant::now();

        let outcome = scheduler
            .run_with_retry(
                || {
                    let calls = calls.clone();
                    async move {
                        if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                            failure()
                        } else {
                            Ok(summary())
                        }
                    }
                },
                pin!(pending::<()>()),
            )
            .await;

        assert_eq!(outcome, SlotOutcome::Completed);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(scheduler.execution_count(), 1);
        assert!(started.elapsed() >= Duration::from_secs(600));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_gives_up_after_max_attempts() {
        let dir = tempfile::tempdir().unwrap();
        let mut scheduler = scheduler(dir.path());
        let calls = Arc::new(AtomicUsize::new(0));

        let outcome = scheduler
            .run_with_retry(
                || {
                    let calls = calls.clone();
                    async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        failure()
                    }
                },
                pin!(pending::<()>()),
            )
            .await;

        assert_eq!(outcome, SlotOutcome::Failed);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(scheduler.execution_count(), 0);
        assert!(scheduler.last_execution().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timed_out_attempt_never_overlaps_the_retry() {
        let dir = tempfile::tempdir().unwrap();
        let mut scheduler = scheduler(dir.path());
        let calls = Arc::new(AtomicUsize::new(0));
        let active = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let outcome = scheduler
            .run_with_retry(
                || {
                    let (calls, active, peak) = (calls.clone(), active.clone(), peak.clone());
                    async move {
                        let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                        let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                        peak.fetch_max(now, Ordering::SeqCst);
                        let _guard = InFlight(active);

                        if n == 1 {
                            tokio::time::sleep(Duration::from_secs(2 * 3600)).await;
                        }
                        Ok::<_, anyhow::Error>(summary())
                    }
                },
                pin!(pending::<()>()),
            )
            .await;

        assert_eq!(outcome, SlotOutcome::Completed);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(peak.load(Ordering::SeqCst), 1);
        assert_eq!(active.load(Ordering::SeqCst), 0);
        assert_eq!(scheduler.execution_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_interrupts_the_retry_delay() {
        let dir = tempfile::tempdir().unwrap();
        let mut scheduler = scheduler(dir.path());
        let calls = Arc::new(AtomicUsize::new(0));

        let outcome = scheduler
            .run_with_retry(
                || {
                    let calls = calls.clone();
                    async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        failure()
                    }
                },
                pin!(tokio::time::sleep(Duration::from_secs(60))),
            )
            .await;

        assert_eq!(outcome, SlotOutcome::Interrupted);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_health_check() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.json");

        assert!(check_system_health(&config_path, dir.path(), 0).is_err());

        std::fs::write(&config_path, "{}").unwrap();
        assert!(check_system_health(&config_path, dir.path(), 0).is_ok());

        let err = check_system_health(&config_path, dir.path(), u64::MAX).unwrap_err();
        assert!(err.to_string().contains("Low disk space"));
    }

    #[tokio::test]
    async fn test_slot_with_missing_config_is_skipped() {
        let mut scheduler = Scheduler::new(
            PathBuf::from("/nonexistent/config.json"),
            &AppConfig::default(),
        )
        .unwrap();

        let outcome = scheduler.execute_slot(pin!(pending::<()>())).await;
        assert_eq!(outcome, SlotOutcome::Skipped);
        assert_eq!(scheduler.execution_count(), 0);
    }
}
