//! Core traits for scout abstractions.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{CreateVersionRequest, ResearchJob, VersionHistory, VersionRecord};
use crate::normalize::RawFindings;

// =============================================================================
// JOB REPOSITORY TRAITS
// =============================================================================

/// Storage for research jobs.
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Persist a newly submitted job.
    async fn insert(&self, job: ResearchJob) -> Result<()>;

    /// Get job by ID.
    async fn get(&self, job_id: Uuid) -> Result<Option<ResearchJob>>;

    /// Store a terminal job, but only if the stored copy is still running.
    ///
    /// Returns `Error::InvalidTransition` carrying the stored status when the
    /// job already reached a terminal state, and `Error::JobNotFound` when it
    /// was never inserted. This is the single point that serializes
    /// completion against cancellation.
    async fn finalize(&self, job: ResearchJob) -> Result<ResearchJob>;

    /// All jobs for a project, oldest first.
    async fn list_for_project(&self, project_id: &str) -> Result<Vec<ResearchJob>>;

    /// All jobs submitted by a user, oldest first.
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<ResearchJob>>;
}

// =============================================================================
// VERSION HISTORY TRAITS
// =============================================================================

/// Append-only store of project version records.
#[async_trait]
pub trait VersionHistoryStore: Send + Sync {
    /// Append a record, assigning the next sequence number for its project.
    ///
    /// Sequences start at 1 and have no gaps. A snapshot that fails
    /// validation is rejected with `Error::Validation` and nothing is
    /// appended.
    async fn append(&self, req: CreateVersionRequest) -> Result<VersionRecord>;

    /// Full history of a project in sequence order. Unknown projects yield
    /// an empty history.
    async fn history(&self, project_id: &str) -> Result<VersionHistory>;
}

// =============================================================================
// RESEARCH COLLABORATOR TRAITS
// =============================================================================

/// External research capability that turns a query into raw findings.
///
/// Implementations report their own failures as `Error::Collaborator`; the
/// controller bounds the call with its configured timeout.
#[async_trait]
pub trait ContentCollector: Send + Sync {
    async fn collect(&self, job: &ResearchJob) -> Result<RawFindings>;
}

// =============================================================================
// JOB PROCESSING TRAITS
// =============================================================================

/// Notification handler for job lifecycle events.
#[async_trait]
pub trait JobNotifier: Send + Sync {
    /// Called after a job has been stored as running.
    async fn on_job_submitted(&self, job: &ResearchJob);

    /// Called once a job is stored as completed.
    async fn on_job_completed(&self, job: &ResearchJob);

    /// Called once a job is stored as failed, including cancellation.
    async fn on_job_failed(&self, job: &ResearchJob);
}

/// No-op notifier for when notifications aren't needed.
pub struct NoOpNotifier;

#[async_trait]
impl JobNotifier for NoOpNotifier {
    async fn on_job_submitted(&self, _job: &ResearchJob) {}
    async fn on_job_completed(&self, _job: &ResearchJob) {}
    async fn on_job_failed(&self, _job: &ResearchJob) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_notifier_accepts_any_job() {
        let notifier = NoOpNotifier;
        let job = ResearchJob::new("u1", "p1", "dog walking");
        notifier.on_job_submitted(&job).await;
        notifier.on_job_completed(&job).await;
        notifier.on_job_failed(&job).await;
    }

    #[test]
    fn test_traits_are_object_safe() {
        fn _repo(_: &dyn JobRepository) {}
        fn _history(_: &dyn VersionHistoryStore) {}
        fn _collector(_: &dyn ContentCollector) {}
        fn _notifier(_: &dyn JobNotifier) {}
    }
}
