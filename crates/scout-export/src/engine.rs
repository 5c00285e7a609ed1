//! Export engine: version history in, complete artifact out.

use std::time::Instant;

use chrono::SecondsFormat;
use tracing::{debug, info, instrument};

use scout_core::defaults::{CSV_COLUMNS, CSV_LIST_DELIMITER};
use scout_core::{Error, Result, VersionHistory};

use crate::config::ExportConfig;
use crate::document;
use crate::format::{Artifact, ExportFormat};

/// Stateless exporter; one call never affects another.
#[derive(Debug, Clone, Default)]
pub struct ExportEngine {
    config: ExportConfig,
}

impl ExportEngine {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Render `history` in the requested format.
    ///
    /// An empty history is not an error: json yields `[]`, csv the header
    /// row, and the document a single "No decisions recorded" section.
    #[instrument(skip(self, history), fields(records = history.records.len()))]
    pub fn export(&self, history: &VersionHistory, format: ExportFormat) -> Result<Artifact> {
        let start = Instant::now();
        let bytes = match format {
            ExportFormat::Json => self.to_json(history)?,
            ExportFormat::Csv => to_csv(history)?,
            ExportFormat::Document => {
                let (text, pages) = document::render(history, &self.config);
                debug!(pages, "Rendered document");
                text.into_bytes()
            }
        };

        let artifact = Artifact::new(format, bytes, history.project_id());
        info!(
            %format,
            bytes = artifact.len(),
            decisions = history.decision_count(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Exported version history"
        );
        Ok(artifact)
    }

    /// Parse `format` and export. Unknown names are `UnsupportedFormat`.
    pub fn export_as(&self, history: &VersionHistory, format: &str) -> Result<Artifact> {
        self.export(history, format.parse()?)
    }

    fn to_json(&self, history: &VersionHistory) -> Result<Vec<u8>> {
        let bytes = if self.config.pretty_json {
            serde_json::to_vec_pretty(history)?
        } else {
            serde_json::to_vec(history)?
        };
        Ok(bytes)
    }
}

/// Export with default configuration.
pub fn export(history: &VersionHistory, format: ExportFormat) -> Result<Artifact> {
    ExportEngine::default().export(history, format)
}

/// One row per decision, in record then decision input order.
fn to_csv(history: &VersionHistory) -> Result<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(CSV_COLUMNS).map_err(csv_error)?;

    for record in &history.records {
        let version_id = record.id.to_string();
        for decision in &record.decisions {
            let timestamp = decision.made_at.to_rfc3339_opts(SecondsFormat::AutoSi, true);
            let decision_id = decision.id.to_string();
            let rationale = decision.rationale.join(CSV_LIST_DELIMITER);
            wtr.write_record([
                version_id.as_str(),
                timestamp.as_str(),
                decision_id.as_str(),
                decision.summary.as_str(),
                rationale.as_str(),
            ])
            .map_err(csv_error)?;
        }
    }

    wtr.into_inner()
        .map_err(|e| Error::Internal(format!("csv flush failed: {}", e)))
}

fn csv_error(e: csv::Error) -> Error {
    Error::Serialization(format!("csv: {}", e))
}
