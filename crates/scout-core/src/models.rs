//! Core data models for scout.
//!
//! These types are shared across all scout crates and represent the core
//! domain entities: the insight data produced by research, the research job
//! that produces it, and the version history that records project decisions.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::ids::new_id;
use crate::validation::ValidationError;

// =============================================================================
// INSIGHT TYPES
// =============================================================================

/// Three-step rating shared by pain point severity and competition level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Low,
    Medium,
    High,
}

/// Severity of a pain point.
pub type Severity = Level;

/// Competition level of an opportunity.
pub type CompetitionLevel = Level;

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Low => "low",
            Level::Medium => "medium",
            Level::High => "high",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = ();

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Level::Low),
            "medium" => Ok(Level::Medium),
            "high" => Ok(Level::High),
            _ => Err(()),
        }
    }
}

/// A user problem surfaced by research.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PainPoint {
    pub id: String,
    pub description: String,
    pub severity: Severity,
    pub frequency: u32,
    /// Citation ids backing this pain point (set semantics, first-seen order).
    #[serde(default)]
    pub sources: Vec<String>,
}

/// An existing product competing in the researched space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Competitor {
    pub name: String,
    pub url: String,
    pub pricing: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
}

/// A market gap worth pursuing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    pub id: String,
    pub description: String,
    pub market_size: String,
    pub competition_level: CompetitionLevel,
    #[serde(default)]
    pub sources: Vec<String>,
}

/// Demographic profile of a persona.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Demographics {
    pub age_range: String,
    pub income: String,
    pub location: String,
}

/// A representative target user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub pain_points: Vec<String>,
    #[serde(default)]
    pub goals: Vec<String>,
    #[serde(default)]
    pub demographics: Demographics,
}

/// A source document the research drew from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    pub id: String,
    pub url: String,
    pub title: String,
    pub snippet: String,
    /// Relevance to the query, within `[0, 1]`.
    pub relevance_score: f64,
}

/// Structured result of a research job.
///
/// Built once, atomically, when a job completes and never mutated after.
/// Use [`crate::validation::validate`] to check its invariants.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InsightData {
    #[serde(default)]
    pub pain_points: Vec<PainPoint>,
    #[serde(default)]
    pub competitors: Vec<Competitor>,
    #[serde(default)]
    pub opportunities: Vec<Opportunity>,
    #[serde(default, alias = "MVP_features")]
    pub mvp_features: Vec<String>,
    #[serde(default)]
    pub out_of_scope: Vec<String>,
    #[serde(default)]
    pub personas: Vec<Persona>,
    #[serde(default)]
    pub citations: Vec<Citation>,
}

/// Section counts for an [`InsightData`] value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightSummary {
    pub pain_points: usize,
    pub competitors: usize,
    pub opportunities: usize,
    pub mvp_features: usize,
    pub out_of_scope: usize,
    pub personas: usize,
    pub citations: usize,
}

impl InsightData {
    /// Count entries per section.
    pub fn summary(&self) -> InsightSummary {
        InsightSummary {
            pain_points: self.pain_points.len(),
            competitors: self.competitors.len(),
            opportunities: self.opportunities.len(),
            mvp_features: self.mvp_features.len(),
            out_of_scope: self.out_of_scope.len(),
            personas: self.personas.len(),
            citations: self.citations.len(),
        }
    }

    /// Look up a citation by id.
    pub fn citation(&self, id: &str) -> Option<&Citation> {
        self.citations.iter().find(|c| c.id == id)
    }
}

impl fmt::Display for InsightSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} pain points, {} competitors, {} opportunities, {} personas, {} citations",
            self.pain_points, self.competitors, self.opportunities, self.personas, self.citations
        )
    }
}

// =============================================================================
// JOB TYPES
// =============================================================================

/// Lifecycle status of a research job.
///
/// `Running` is the only non-terminal state; a job leaves it exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Running)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a job ended in `failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    /// Findings violated an insight data invariant.
    Validation,
    /// The content-collection collaborator returned an error.
    Collaborator,
    /// The collaborator did not resolve in time.
    Timeout,
    /// The job was cancelled while running.
    Cancelled,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Validation => "validation",
            FailureKind::Collaborator => "collaborator",
            FailureKind::Timeout => "timeout",
            FailureKind::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error recorded on a failed job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobFailure {
    pub kind: FailureKind,
    pub message: String,
    /// The violated invariant, for validation failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub violation: Option<ValidationError>,
}

impl JobFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            violation: None,
        }
    }

    pub fn validation(violation: ValidationError) -> Self {
        Self {
            kind: FailureKind::Validation,
            message: violation.to_string(),
            violation: Some(violation),
        }
    }

    /// Rebuild the typed error this failure was recorded from.
    pub fn to_error(&self, job_id: Uuid) -> Error {
        match (self.kind, &self.violation) {
            (FailureKind::Cancelled, _) => Error::Cancelled(job_id),
            (FailureKind::Validation, Some(violation)) => Error::Validation(violation.clone()),
            (FailureKind::Validation, None) => Error::Internal(self.message.clone()),
            (FailureKind::Collaborator | FailureKind::Timeout, _) => {
                Error::Collaborator(self.message.clone())
            }
        }
    }
}

impl fmt::Display for JobFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// One tracked unit of asynchronous research work.
///
/// Identity fields are fixed at creation. The only way out of `Running` is
/// [`ResearchJob::complete`] or [`ResearchJob::fail`], which consume the
/// job and enforce that insight data is present iff the job completed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchJob {
    pub id: Uuid,
    pub user_id: String,
    pub project_id: String,
    pub query: String,
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insight_data: Option<InsightData>,
    /// Opaque side output (raw source captures), only set on completion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifacts: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JobFailure>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl ResearchJob {
    /// Allocate a fresh running job.
    pub fn new(
        user_id: impl Into<String>,
        project_id: impl Into<String>,
        query: impl Into<String>,
    ) -> Self {
        Self {
            id: new_id(),
            user_id: user_id.into(),
            project_id: project_id.into(),
            query: query.into(),
            status: JobStatus::Running,
            insight_data: None,
            artifacts: None,
            error: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Transition `running -> completed`, attaching the result.
    pub fn complete(
        self,
        insight_data: InsightData,
        artifacts: Option<JsonValue>,
        at: DateTime<Utc>,
    ) -> Result<Self> {
        self.ensure_running()?;
        Ok(Self {
            status: JobStatus::Completed,
            insight_data: Some(insight_data),
            artifacts,
            error: None,
            completed_at: Some(at),
            ..self
        })
    }

    /// Transition `running -> failed`, recording the failure.
    pub fn fail(self, failure: JobFailure, at: DateTime<Utc>) -> Result<Self> {
        self.ensure_running()?;
        Ok(Self {
            status: JobStatus::Failed,
            insight_data: None,
            artifacts: None,
            error: Some(failure),
            completed_at: Some(at),
            ..self
        })
    }

    /// Typed view of the outcome: `Ok(None)` while running, the insight
    /// data once completed, or the recorded failure as an error.
    pub fn outcome(&self) -> Result<Option<&InsightData>> {
        match self.status {
            JobStatus::Running => Ok(None),
            JobStatus::Completed => Ok(self.insight_data.as_ref()),
            JobStatus::Failed => Err(self
                .error
                .as_ref()
                .map(|f| f.to_error(self.id))
                .unwrap_or_else(|| Error::Internal(format!("job {} failed without error", self.id)))),
        }
    }

    fn ensure_running(&self) -> Result<()> {
        if self.is_terminal() {
            return Err(Error::InvalidTransition {
                job_id: self.id,
                status: self.status,
            });
        }
        Ok(())
    }
}

// =============================================================================
// VERSION HISTORY TYPES
// =============================================================================

/// A single recorded project decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub id: Uuid,
    pub made_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub summary: String,
    #[serde(default)]
    pub rationale: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Decision {
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            made_at: Utc::now(),
            author: None,
            summary: summary.into(),
            rationale: Vec::new(),
            tags: Vec::new(),
        }
    }

    pub fn with_rationale<I, S>(mut self, points: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rationale = points.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn made_at(mut self, at: DateTime<Utc>) -> Self {
        self.made_at = at;
        self
    }
}

/// Request to append a new version to a project's history.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateVersionRequest {
    pub project_id: String,
    pub label: String,
    pub author: Option<String>,
    pub decisions: Vec<Decision>,
    pub snapshot: Option<InsightData>,
}

impl CreateVersionRequest {
    pub fn new(project_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            label: label.into(),
            author: None,
            decisions: Vec::new(),
            snapshot: None,
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_decision(mut self, decision: Decision) -> Self {
        self.decisions.push(decision);
        self
    }

    /// Attach insight data. Stores validate it on append.
    pub fn with_snapshot(mut self, snapshot: InsightData) -> Self {
        self.snapshot = Some(snapshot);
        self
    }
}

/// One append-only entry in a project's version history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionRecord {
    pub id: Uuid,
    pub project_id: String,
    /// Position in the project's history, starting at 1 with no gaps.
    pub sequence: u64,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub label: String,
    #[serde(default)]
    pub decisions: Vec<Decision>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<InsightData>,
}

impl VersionRecord {
    /// Materialise a request at the given sequence number.
    pub fn from_request(req: CreateVersionRequest, sequence: u64) -> Self {
        Self {
            id: new_id(),
            project_id: req.project_id,
            sequence,
            created_at: Utc::now(),
            author: req.author,
            label: req.label,
            decisions: req.decisions,
            snapshot: req.snapshot,
        }
    }
}

/// Ordered version history, read-only input to the export engine.
///
/// Serializes as a plain json array of records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionHistory {
    pub records: Vec<VersionRecord>,
}

impl VersionHistory {
    pub fn new(records: Vec<VersionRecord>) -> Self {
        Self { records }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total decisions across every record.
    pub fn decision_count(&self) -> usize {
        self.records.iter().map(|r| r.decisions.len()).sum()
    }

    /// Project id of the first record, if any.
    pub fn project_id(&self) -> Option<&str> {
        self.records.first().map(|r| r.project_id.as_str())
    }
}

impl From<Vec<VersionRecord>> for VersionHistory {
    fn from(records: Vec<VersionRecord>) -> Self {
        Self::new(records)
    }
}
