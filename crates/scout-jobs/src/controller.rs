//! Research job controller.
//!
//! Owns the `running -> completed | failed` state machine. Every terminal
//! write goes through [`JobRepository::finalize`], a compare-and-set on the
//! stored status, so exactly one terminal transition wins per job even when
//! `cancel` races a resolving `await_completion`.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use scout_core::{
    normalize, validate, ContentCollector, Error, FailureKind, JobFailure, JobNotifier,
    JobRepository, NoOpNotifier, Normalized, RawFindings, ResearchJob, Result,
};

use crate::config::ControllerConfig;

/// Drives research jobs from submission to a terminal state.
///
/// Cloning is cheap; clones share the repository, collaborator, and
/// notifier.
#[derive(Clone)]
pub struct Controller {
    repo: Arc<dyn JobRepository>,
    collector: Arc<dyn ContentCollector>,
    notifier: Arc<dyn JobNotifier>,
    config: ControllerConfig,
}

impl Controller {
    /// Create a controller with default config and no notifications.
    pub fn new(repo: Arc<dyn JobRepository>, collector: Arc<dyn ContentCollector>) -> Self {
        Self {
            repo,
            collector,
            notifier: Arc::new(NoOpNotifier),
            config: ControllerConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ControllerConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the notifier invoked on submission and terminal transitions.
    pub fn with_notifier(mut self, notifier: Arc<dyn JobNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Allocate and store a new running job.
    #[instrument(skip(self, query), fields(query_len = query.chars().count()))]
    pub async fn submit(
        &self,
        user_id: &str,
        project_id: &str,
        query: &str,
    ) -> Result<ResearchJob> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::InvalidInput("query cannot be empty".to_string()));
        }
        let len = query.chars().count();
        if len > self.config.max_query_len {
            return Err(Error::InvalidInput(format!(
                "query is {} characters, maximum is {}",
                len, self.config.max_query_len
            )));
        }
        if user_id.trim().is_empty() {
            return Err(Error::InvalidInput("user_id cannot be empty".to_string()));
        }
        if project_id.trim().is_empty() {
            return Err(Error::InvalidInput("project_id cannot be empty".to_string()));
        }

        let job = ResearchJob::new(user_id, project_id, query);
        if let Err(e) = self.repo.insert(job.clone()).await {
            error!(error = %e, job_id = %job.id, "Failed to store submitted job");
            return Err(e);
        }

        info!(job_id = %job.id, "Research job submitted");
        self.notifier.on_job_submitted(&job).await;
        Ok(job)
    }

    /// Wait for the job's research to resolve and record the outcome.
    ///
    /// Returns the stored job. A job that is already terminal is returned
    /// as stored without calling the collaborator again. A result that
    /// arrives after the job was cancelled is discarded.
    #[instrument(skip(self, job), fields(job_id = %job.id))]
    pub async fn await_completion(&self, job: &ResearchJob) -> Result<ResearchJob> {
        let current = self.get(job.id).await?;
        if current.is_terminal() {
            debug!(status = %current.status, "Job already terminal, returning stored state");
            return Ok(current);
        }

        let start = Instant::now();
        let outcome =
            tokio::time::timeout(self.config.timeout, self.collector.collect(&current)).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        let failure = match outcome {
            Ok(Ok(raw)) => match publishable(raw) {
                Ok(findings) => {
                    let done = current.clone().complete(
                        findings.insight_data,
                        findings.artifacts,
                        Utc::now(),
                    )?;
                    return self.finish(done, duration_ms).await;
                }
                Err(failure) => failure,
            },
            Ok(Err(e)) => {
                let message = match e {
                    Error::Collaborator(msg) => msg,
                    other => other.to_string(),
                };
                JobFailure::new(FailureKind::Collaborator, message)
            }
            Err(_) => {
                warn!(timeout_secs = self.config.timeout.as_secs_f64(), "Collaborator timed out");
                JobFailure::new(
                    FailureKind::Timeout,
                    format!(
                        "collaborator did not resolve within {:?}",
                        self.config.timeout
                    ),
                )
            }
        };

        let failed = current.clone().fail(failure, Utc::now())?;
        self.finish(failed, duration_ms).await
    }

    /// Mark a running job as cancelled.
    ///
    /// In-flight collaborator work is not preempted; its eventual result is
    /// discarded by `await_completion`.
    #[instrument(skip(self, job), fields(job_id = %job.id))]
    pub async fn cancel(&self, job: &ResearchJob) -> Result<ResearchJob> {
        let current = self.get(job.id).await?;
        let cancelled = current.fail(
            JobFailure::new(FailureKind::Cancelled, "cancelled while running"),
            Utc::now(),
        )?;

        let stored = self.repo.finalize(cancelled).await?;
        info!("Research job cancelled");
        self.notifier.on_job_failed(&stored).await;
        Ok(stored)
    }

    /// Get the stored job.
    pub async fn get(&self, job_id: Uuid) -> Result<ResearchJob> {
        self.repo.get(job_id).await?.ok_or(Error::JobNotFound(job_id))
    }

    /// All jobs for a project, oldest first.
    pub async fn list_for_project(&self, project_id: &str) -> Result<Vec<ResearchJob>> {
        self.repo.list_for_project(project_id).await
    }

    /// Store a terminal job, discarding it if another transition won.
    async fn finish(&self, resolved: ResearchJob, duration_ms: u64) -> Result<ResearchJob> {
        let job_id = resolved.id;
        match self.repo.finalize(resolved).await {
            Ok(stored) => {
                match &stored.error {
                    None => {
                        info!(duration_ms, "Research job completed");
                        self.notifier.on_job_completed(&stored).await;
                    }
                    Some(failure) => {
                        warn!(
                            duration_ms,
                            kind = failure.kind.as_str(),
                            error = %failure.message,
                            "Research job failed"
                        );
                        self.notifier.on_job_failed(&stored).await;
                    }
                }
                Ok(stored)
            }
            Err(Error::InvalidTransition { status, .. }) => {
                warn!(%status, "Job reached a terminal state first, discarding late result");
                self.get(job_id).await
            }
            Err(e) => {
                error!(error = %e, "Failed to store terminal job");
                Err(e)
            }
        }
    }
}

/// Normalize and validate raw findings, or describe why they can't be
/// published.
fn publishable(raw: RawFindings) -> std::result::Result<Normalized, JobFailure> {
    let normalized = normalize(raw).map_err(JobFailure::validation)?;
    debug!(summary = %normalized.insight_data.summary(), "Findings normalized");
    validate(&normalized.insight_data).map_err(JobFailure::validation)?;
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use scout_core::{JobStatus, RawCitation, RawPainPoint};
    use scout_store::MemJobRepository;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingCollector {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ContentCollector for CountingCollector {
        async fn collect(&self, _job: &ResearchJob) -> Result<RawFindings> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(RawFindings {
                pain_points: vec![RawPainPoint {
                    id: "p1".into(),
                    description: "d".into(),
                    severity: "low".into(),
                    frequency: 1,
                    sources: vec!["c1".into()],
                }],
                citations: vec![RawCitation {
                    id: "c1".into(),
                    url: "https://example.com".into(),
                    title: "t".into(),
                    snippet: "s".into(),
                    relevance_score: 0.5,
                }],
                ..Default::default()
            })
        }
    }

    fn controller() -> (Controller, Arc<CountingCollector>) {
        let collector = Arc::new(CountingCollector {
            calls: AtomicUsize::new(0),
        });
        let controller = Controller::new(Arc::new(MemJobRepository::new()), collector.clone());
        (controller, collector)
    }

    #[tokio::test]
    async fn test_submit_stores_running_job() {
        let (controller, _) = controller();
        let job = controller.submit("u1", "p1", "  dog walking app ").await.unwrap();

        assert_eq!(job.status, JobStatus::Running);
        assert_eq!(job.query, "dog walking app");
        assert_eq!(controller.get(job.id).await.unwrap(), job);
    }

    #[tokio::test]
    async fn test_submit_rejects_blank_ids() {
        let (controller, _) = controller();
        assert!(matches!(
            controller.submit("", "p1", "q").await,
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            controller.submit("u1", " ", "q").await,
            Err(Error::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_query_length_counts_characters() {
        let (controller, _) = controller();
        let controller = controller.with_config(ControllerConfig::default().with_max_query_len(3));

        assert!(controller.submit("u1", "p1", "äöü").await.is_ok());
        assert!(matches!(
            controller.submit("u1", "p1", "abcd").await,
            Err(Error::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_await_is_idempotent() {
        let (controller, collector) = controller();
        let job = controller.submit("u1", "p1", "q").await.unwrap();

        let first = controller.await_completion(&job).await.unwrap();
        let second = controller.await_completion(&job).await.unwrap();

        assert_eq!(first.status, JobStatus::Completed);
        assert_eq!(first, second);
        assert_eq!(collector.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_get_unknown_job() {
        let (controller, _) = controller();
        let id = Uuid::now_v7();
        assert!(matches!(controller.get(id).await, Err(Error::JobNotFound(x)) if x == id));
    }

    #[tokio::test]
    async fn test_await_unknown_job() {
        let (controller, _) = controller();
        let stray = ResearchJob::new("u1", "p1", "q");
        assert!(matches!(
            controller.await_completion(&stray).await,
            Err(Error::JobNotFound(_))
        ));
    }
}
