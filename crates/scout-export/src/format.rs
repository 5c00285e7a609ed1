//! Export encodings and the artifacts they produce.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use scout_core::Error;

/// Output encoding for an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Lossless json array of version records.
    Json,
    /// One row per decision.
    Csv,
    /// Paginated, human-readable text.
    Document,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Json, ExportFormat::Csv, ExportFormat::Document];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Document => "document",
        }
    }

    pub fn media_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv",
            ExportFormat::Document => "text/plain; charset=utf-8",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Document => "txt",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    /// Case-insensitive. `pdf` and `doc` select the document format.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "document" | "doc" | "pdf" => Ok(ExportFormat::Document),
            _ => Err(Error::UnsupportedFormat(s.to_string())),
        }
    }
}

/// A complete export payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
    pub media_type: &'static str,
    /// Suggested download name, `<project>-history.<ext>`.
    pub file_name: String,
}

impl Artifact {
    pub(crate) fn new(format: ExportFormat, bytes: Vec<u8>, project_id: Option<&str>) -> Self {
        Self {
            format,
            bytes,
            media_type: format.media_type(),
            file_name: format!(
                "{}-history.{}",
                file_stem(project_id.unwrap_or("project")),
                format.extension()
            ),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Payload as text. Every format scout produces is UTF-8.
    pub fn as_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.bytes).ok()
    }
}

/// Reduce a project id to characters safe in a file name.
fn file_stem(project_id: &str) -> String {
    let stem: String = project_id
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect();
    if stem.is_empty() {
        "project".to_string()
    } else {
        stem
    }
}
