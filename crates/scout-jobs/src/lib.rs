//! # scout-jobs
//!
//! Research job lifecycle for scout.
//!
//! This crate provides:
//! - The [`Controller`] state machine (`submit`, `await_completion`, `cancel`)
//! - Lifecycle notifiers, including a broadcast channel of [`JobEvent`]s
//! - [`ResearchPipeline`], which snapshots completed research into the
//!   project's version history
//!
//! Log levels: WARN for job failures, timeouts, and discarded late results;
//! INFO for lifecycle transitions; DEBUG for idempotent re-entry and
//! normalization counts; ERROR only when a store write fails.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use scout_jobs::{BroadcastNotifier, Controller, ControllerConfig};
//! use scout_store::Store;
//!
//! let store = Store::new();
//! let config = ControllerConfig::from_env();
//! let events = BroadcastNotifier::from_config(&config);
//! let controller = Controller::new(Arc::new(store.jobs.clone()), Arc::new(my_collector))
//!     .with_config(config)
//!     .with_notifier(Arc::new(events.clone()));
//!
//! let job = controller.submit("user", "project", "dog walking app").await?;
//! let job = controller.await_completion(&job).await?;
//! ```

pub mod config;
pub mod controller;
pub mod events;
pub mod pipeline;

// Re-export core types
pub use scout_core::*;

pub use config::ControllerConfig;
pub use controller::Controller;
pub use events::{BroadcastNotifier, JobEvent, TracingNotifier};
pub use pipeline::{ResearchPipeline, ResearchRequest, ResearchRun};
