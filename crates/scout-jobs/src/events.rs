//! Job lifecycle events and the notifiers that publish them.

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{info, warn};
use uuid::Uuid;

use scout_core::{FailureKind, InsightSummary, JobNotifier, ResearchJob};

use crate::config::ControllerConfig;

/// Event emitted when a job is submitted or reaches a terminal state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum JobEvent {
    /// A job was stored as running.
    Submitted { job_id: Uuid, project_id: String },
    /// A job completed with validated insight data.
    Completed {
        job_id: Uuid,
        project_id: String,
        summary: InsightSummary,
    },
    /// A job failed, including cancellation.
    Failed {
        job_id: Uuid,
        project_id: String,
        kind: FailureKind,
        error: String,
    },
}

impl JobEvent {
    pub fn job_id(&self) -> Uuid {
        match self {
            JobEvent::Submitted { job_id, .. }
            | JobEvent::Completed { job_id, .. }
            | JobEvent::Failed { job_id, .. } => *job_id,
        }
    }

    fn submitted(job: &ResearchJob) -> Self {
        JobEvent::Submitted {
            job_id: job.id,
            project_id: job.project_id.clone(),
        }
    }

    fn completed(job: &ResearchJob) -> Self {
        JobEvent::Completed {
            job_id: job.id,
            project_id: job.project_id.clone(),
            summary: job
                .insight_data
                .as_ref()
                .map(|d| d.summary())
                .unwrap_or_default(),
        }
    }

    fn failed(job: &ResearchJob) -> Self {
        let (kind, error) = match &job.error {
            Some(failure) => (failure.kind, failure.message.clone()),
            None => (FailureKind::Collaborator, String::new()),
        };
        JobEvent::Failed {
            job_id: job.id,
            project_id: job.project_id.clone(),
            kind,
            error,
        }
    }
}

/// Logs lifecycle transitions through `tracing`.
pub struct TracingNotifier;

#[async_trait]
impl JobNotifier for TracingNotifier {
    async fn on_job_submitted(&self, job: &ResearchJob) {
        info!(job_id = %job.id, project_id = %job.project_id, user_id = %job.user_id, "Job submitted");
    }

    async fn on_job_completed(&self, job: &ResearchJob) {
        let summary = job.insight_data.as_ref().map(|d| d.summary()).unwrap_or_default();
        info!(job_id = %job.id, project_id = %job.project_id, %summary, "Job completed");
    }

    async fn on_job_failed(&self, job: &ResearchJob) {
        let error = job.error.as_ref().map(|e| e.to_string()).unwrap_or_default();
        warn!(job_id = %job.id, project_id = %job.project_id, %error, "Job failed");
    }
}

/// Publishes [`JobEvent`]s on a broadcast channel.
///
/// Sending never blocks; events are dropped when nobody is subscribed.
#[derive(Clone)]
pub struct BroadcastNotifier {
    tx: broadcast::Sender<JobEvent>,
}

impl BroadcastNotifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Channel sized by `ControllerConfig::event_capacity`.
    pub fn from_config(config: &ControllerConfig) -> Self {
        Self::new(config.event_capacity)
    }

    /// Get a receiver for job events.
    pub fn subscribe(&self) -> broadcast::Receiver<JobEvent> {
        self.tx.subscribe()
    }

    fn send(&self, event: JobEvent) {
        let _ = self.tx.send(event);
    }
}

#[async_trait]
impl JobNotifier for BroadcastNotifier {
    async fn on_job_submitted(&self, job: &ResearchJob) {
        self.send(JobEvent::submitted(job));
    }

    async fn on_job_completed(&self, job: &ResearchJob) {
        self.send(JobEvent::completed(job));
    }

    async fn on_job_failed(&self, job: &ResearchJob) {
        self.send(JobEvent::failed(job));
    }
}
