//! Append-only project version history.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use scout_core::{
    validate, CreateVersionRequest, Error, Result, VersionHistory, VersionHistoryStore,
    VersionRecord,
};

/// Version history kept in memory, one ordered list per project.
///
/// Sequence numbers are assigned under the write lock, so concurrent
/// appends to one project stay gapless.
#[derive(Clone, Default)]
pub struct MemVersionStore {
    projects: Arc<RwLock<HashMap<String, Vec<VersionRecord>>>>,
}

impl MemVersionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest record for a project.
    pub async fn latest(&self, project_id: &str) -> Result<Option<VersionRecord>> {
        Ok(self
            .projects
            .read()
            .await
            .get(project_id)
            .and_then(|records| records.last().cloned()))
    }

    /// Record by sequence number.
    pub async fn get_version(&self, project_id: &str, sequence: u64) -> Result<VersionRecord> {
        self.projects
            .read()
            .await
            .get(project_id)
            .and_then(|records| records.iter().find(|r| r.sequence == sequence).cloned())
            .ok_or_else(|| {
                Error::NotFound(format!("version {} of project {}", sequence, project_id))
            })
    }
}

#[async_trait]
impl VersionHistoryStore for MemVersionStore {
    async fn append(&self, req: CreateVersionRequest) -> Result<VersionRecord> {
        if req.project_id.trim().is_empty() {
            return Err(Error::InvalidInput(
                "project_id cannot be empty".to_string(),
            ));
        }
        if let Some(snapshot) = &req.snapshot {
            if let Err(violation) = validate(snapshot) {
                warn!(project_id = %req.project_id, error = %violation, "Rejected invalid snapshot");
                return Err(violation.into());
            }
        }

        let mut projects = self.projects.write().await;
        let records = projects.entry(req.project_id.clone()).or_default();
        let sequence = records.len() as u64 + 1;
        let record = VersionRecord::from_request(req, sequence);
        records.push(record.clone());

        info!(
            project_id = %record.project_id,
            sequence,
            decisions = record.decisions.len(),
            "Appended version"
        );
        Ok(record)
    }

    async fn history(&self, project_id: &str) -> Result<VersionHistory> {
        let records = self
            .projects
            .read()
            .await
            .get(project_id)
            .cloned()
            .unwrap_or_default();
        debug!(project_id, records = records.len(), "Read version history");
        Ok(VersionHistory::new(records))
    }
}
