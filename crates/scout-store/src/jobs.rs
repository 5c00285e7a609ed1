//! In-memory job repository.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, error};
use uuid::Uuid;

use scout_core::{Error, JobRepository, ResearchJob, Result};

/// Job repository backed by a shared map.
///
/// Clones share the same underlying map.
#[derive(Clone, Default)]
pub struct MemJobRepository {
    jobs: Arc<RwLock<HashMap<Uuid, ResearchJob>>>,
}

impl MemJobRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored jobs.
    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }

    async fn list_where(&self, pred: impl Fn(&ResearchJob) -> bool) -> Vec<ResearchJob> {
        let jobs = self.jobs.read().await;
        let mut matched: Vec<ResearchJob> = jobs.values().filter(|j| pred(j)).cloned().collect();
        // UUIDv7 ids sort in creation order.
        matched.sort_by_key(|j| (j.created_at, j.id));
        matched
    }
}

#[async_trait]
impl JobRepository for MemJobRepository {
    async fn insert(&self, job: ResearchJob) -> Result<()> {
        let mut jobs = self.jobs.write().await;
        if jobs.contains_key(&job.id) {
            error!(job_id = %job.id, "Refusing to overwrite existing job");
            return Err(Error::Internal(format!("job {} already exists", job.id)));
        }
        debug!(job_id = %job.id, project_id = %job.project_id, "Stored job");
        jobs.insert(job.id, job);
        Ok(())
    }

    async fn get(&self, job_id: Uuid) -> Result<Option<ResearchJob>> {
        Ok(self.jobs.read().await.get(&job_id).cloned())
    }

    async fn finalize(&self, job: ResearchJob) -> Result<ResearchJob> {
        if !job.is_terminal() {
            return Err(Error::Internal(format!(
                "finalize called with non-terminal job {}",
                job.id
            )));
        }

        let mut jobs = self.jobs.write().await;
        let stored = jobs.get_mut(&job.id).ok_or(Error::JobNotFound(job.id))?;
        if stored.is_terminal() {
            return Err(Error::InvalidTransition {
                job_id: stored.id,
                status: stored.status,
            });
        }

        *stored = job.clone();
        debug!(job_id = %job.id, status = %job.status, "Finalized job");
        Ok(job)
    }

    async fn list_for_project(&self, project_id: &str) -> Result<Vec<ResearchJob>> {
        Ok(self.list_where(|j| j.project_id == project_id).await)
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<ResearchJob>> {
        Ok(self.list_where(|j| j.user_id == user_id).await)
    }
}
