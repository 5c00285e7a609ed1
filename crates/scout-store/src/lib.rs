//! # scout-store
//!
//! Record store for scout.
//!
//! This crate provides:
//! - A job repository with compare-and-set finalization
//! - An append-only, per-project version history with gapless sequences
//!
//! Both live in memory behind `tokio::sync::RwLock`; the traits they
//! implement are defined in `scout-core`, so a persistent backend can be
//! swapped in without touching the controller or export engine.
//!
//! ## Example
//!
//! ```rust,ignore
//! use scout_store::{Store, VersionHistoryStore, CreateVersionRequest};
//!
//! let store = Store::new();
//! let record = store.versions.append(CreateVersionRequest::new("proj", "Kickoff")).await?;
//! assert_eq!(record.sequence, 1);
//! ```
pub mod jobs;
pub mod versioning;

pub use jobs::MemJobRepository;
pub use versioning::MemVersionStore;

// Re-export core types
pub use scout_core::*;

/// Store handle bundling every repository.
///
/// Cloning is cheap; clones share state.
#[derive(Clone, Default)]
pub struct Store {
    /// Research job repository.
    pub jobs: MemJobRepository,
    /// Project version history.
    pub versions: MemVersionStore,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }
}
