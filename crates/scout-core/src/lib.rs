//! # scout-core
//!
//! Core types, validation rules, and traits for scout.
//!
//! Scout runs market research jobs for a project: a free-text query goes to
//! an external content-collection collaborator, whose findings are normalized
//! and validated into [`InsightData`]. Projects also keep an append-only
//! history of versioned decisions that the `scout-export` crate renders as
//! json, csv, or a paginated document.
//!
//! This crate has no I/O. Storage lives in `scout-store`, the job lifecycle
//! in `scout-jobs`.

pub mod defaults;
pub mod error;
pub mod ids;
pub mod models;
pub mod normalize;
pub mod traits;
pub mod validation;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use ids::{is_v7, minted_at, new_id};
pub use models::*;
pub use normalize::{
    normalize, Normalized, RawCitation, RawCompetitor, RawFindings, RawOpportunity, RawPainPoint,
    RawPersona,
};
pub use traits::*;
pub use validation::{validate, violations, EntityKind, ValidationError};
