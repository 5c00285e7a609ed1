//! Centralized default constants for scout.
//!
//! **This module is the single source of truth** for shared default values.
//! Crates reference these constants instead of defining their own magic
//! numbers. Environment overrides are applied by each crate's `from_env`.

// =============================================================================
// RESEARCH JOBS
// =============================================================================

/// Maximum research query length in characters.
pub const MAX_QUERY_LEN: usize = 500;

/// Upper bound for the collaborator wait in `await_completion`.
pub const RESEARCH_TIMEOUT_SECS: u64 = 300;

/// Broadcast channel capacity for job events.
pub const EVENT_CAPACITY: usize = 256;

// =============================================================================
// INSIGHT DATA
// =============================================================================

/// Lowest permitted citation relevance score.
pub const RELEVANCE_MIN: f64 = 0.0;

/// Highest permitted citation relevance score.
pub const RELEVANCE_MAX: f64 = 1.0;

// =============================================================================
// EXPORT
// =============================================================================

/// Delimiter used when a sequence field is flattened into one csv cell.
pub const CSV_LIST_DELIMITER: &str = "; ";

/// Fixed csv header for decision exports.
pub const CSV_COLUMNS: [&str; 5] = ["version_id", "timestamp", "decision_id", "summary", "rationale"];

/// Body lines per document page.
pub const DOCUMENT_PAGE_LINES: usize = 54;

/// Smallest accepted page length (keeps the title block on page one).
pub const DOCUMENT_PAGE_LINES_MIN: usize = 10;

/// Wrap width for document text.
pub const DOCUMENT_LINE_WIDTH: usize = 96;

/// Smallest accepted wrap width.
pub const DOCUMENT_LINE_WIDTH_MIN: usize = 40;

/// Page separator in document artifacts (ASCII form feed).
pub const PAGE_BREAK: char = '\u{0C}';
