//! # scout-export
//!
//! Export engine for scout version history.
//!
//! Turns an ordered [`VersionHistory`](scout_core::VersionHistory) into one
//! of three encodings:
//!
//! - `json`: lossless array of version records; re-parses to an equal history
//! - `csv`: one row per decision with columns
//!   `version_id, timestamp, decision_id, summary, rationale`; rationale
//!   points are joined with `"; "`
//! - `document`: paginated plain text, one section per version
//!
//! The engine is pure: it reads the history and returns either a complete
//! [`Artifact`] or an error, never a partial payload.
//!
//! ## Example
//!
//! ```
//! use scout_export::{export, ExportFormat};
//! use scout_core::VersionHistory;
//!
//! let artifact = export(&VersionHistory::default(), ExportFormat::Json).unwrap();
//! assert_eq!(artifact.as_text(), Some("[]"));
//! ```

pub mod config;
pub mod document;
pub mod engine;
pub mod format;

pub use config::ExportConfig;
pub use engine::{export, ExportEngine};
pub use format::{Artifact, ExportFormat};
