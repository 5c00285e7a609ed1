//! End-to-end research runs: submit, await, and snapshot into the project's
//! version history.

use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{error, info, instrument};

use scout_core::{
    CreateVersionRequest, Decision, Error, InsightData, ResearchJob, Result, VersionHistoryStore,
    VersionRecord,
};

use crate::controller::Controller;

/// Parameters for one research run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResearchRequest {
    pub user_id: String,
    pub project_id: String,
    pub query: String,
}

impl ResearchRequest {
    pub fn new(
        user_id: impl Into<String>,
        project_id: impl Into<String>,
        query: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            project_id: project_id.into(),
            query: query.into(),
        }
    }
}

/// Outcome of a research run.
#[derive(Debug, Clone, PartialEq)]
pub struct ResearchRun {
    /// The job in its terminal state.
    pub job: ResearchJob,
    /// Snapshot appended on completion; `None` when the job failed.
    pub version: Option<VersionRecord>,
}

/// Runs research jobs and records completed ones as project versions.
#[derive(Clone)]
pub struct ResearchPipeline {
    controller: Controller,
    versions: Arc<dyn VersionHistoryStore>,
}

impl ResearchPipeline {
    pub fn new(controller: Controller, versions: Arc<dyn VersionHistoryStore>) -> Self {
        Self {
            controller,
            versions,
        }
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    /// Submit a query, wait for it, and snapshot the result.
    ///
    /// Submission errors are returned as `Err`. A job that fails later is
    /// returned as `Ok` with no version appended.
    #[instrument(skip(self, query))]
    pub async fn run(&self, user_id: &str, project_id: &str, query: &str) -> Result<ResearchRun> {
        let job = self.controller.submit(user_id, project_id, query).await?;
        let job = self.controller.await_completion(&job).await?;

        let Some(insight) = job.insight_data.as_ref() else {
            return Ok(ResearchRun { job, version: None });
        };

        let request = snapshot_request(&job, insight);
        let version = match self.versions.append(request).await {
            Ok(version) => version,
            Err(e) => {
                error!(error = %e, job_id = %job.id, "Failed to append research snapshot");
                return Err(e);
            }
        };
        info!(
            job_id = %job.id,
            sequence = version.sequence,
            "Research snapshot recorded"
        );

        Ok(ResearchRun {
            job,
            version: Some(version),
        })
    }

    /// Run independent requests concurrently.
    ///
    /// Results come back in request order.
    pub async fn run_many(&self, requests: Vec<ResearchRequest>) -> Vec<Result<ResearchRun>> {
        let total = requests.len();
        let mut set = JoinSet::new();
        for (index, req) in requests.into_iter().enumerate() {
            let pipeline = self.clone();
            set.spawn(async move {
                let result = pipeline
                    .run(&req.user_id, &req.project_id, &req.query)
                    .await;
                (index, result)
            });
        }

        let mut slots: Vec<Option<Result<ResearchRun>>> = (0..total).map(|_| None).collect();
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((index, result)) => slots[index] = Some(result),
                Err(e) => error!(error = %e, "Research task panicked"),
            }
        }

        slots
            .into_iter()
            .map(|slot| {
                slot.unwrap_or_else(|| Err(Error::Internal("research task aborted".to_string())))
            })
            .collect()
    }
}

/// Version request recording a completed job's insight data.
fn snapshot_request(job: &ResearchJob, insight: &InsightData) -> CreateVersionRequest {
    let mut rationale: Vec<String> = insight
        .pain_points
        .iter()
        .map(|p| format!("{} pain point: {}", p.severity, p.description))
        .collect();
    rationale.extend(
        insight
            .opportunities
            .iter()
            .map(|o| format!("{} competition opportunity: {}", o.competition_level, o.description)),
    );

    let mut decision = Decision::new(format!("Research completed: {}", insight.summary()))
        .with_rationale(rationale)
        .with_tags(["research"])
        .with_author(job.user_id.clone());
    if let Some(at) = job.completed_at {
        decision = decision.made_at(at);
    }

    CreateVersionRequest::new(job.project_id.clone(), format!("Research: {}", job.query))
        .with_author(job.user_id.clone())
        .with_decision(decision)
        .with_snapshot(insight.clone())
}
