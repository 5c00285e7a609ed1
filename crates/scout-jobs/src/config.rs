//! Controller configuration.

use std::time::Duration;

use scout_core::defaults;

/// Configuration for the research job controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Maximum query length in characters.
    pub max_query_len: usize,
    /// Upper bound on the collaborator wait in `await_completion`.
    pub timeout: Duration,
    /// Capacity of the job event broadcast channel.
    pub event_capacity: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            max_query_len: defaults::MAX_QUERY_LEN,
            timeout: Duration::from_secs(defaults::RESEARCH_TIMEOUT_SECS),
            event_capacity: defaults::EVENT_CAPACITY,
        }
    }
}

impl ControllerConfig {
    /// Create config from environment variables (with defaults).
    ///
    /// | Variable | Default | Description |
    /// |----------|---------|-------------|
    /// | `RESEARCH_MAX_QUERY_LEN` | `500` | Max query length in characters |
    /// | `RESEARCH_TIMEOUT_SECS` | `300` | Collaborator timeout |
    /// | `RESEARCH_EVENT_CAPACITY` | `256` | Job event channel capacity |
    pub fn from_env() -> Self {
        let max_query_len = env_parse("RESEARCH_MAX_QUERY_LEN")
            .unwrap_or(defaults::MAX_QUERY_LEN)
            .max(1);

        let timeout_secs = env_parse("RESEARCH_TIMEOUT_SECS")
            .unwrap_or(defaults::RESEARCH_TIMEOUT_SECS)
            .max(1);

        let event_capacity = env_parse("RESEARCH_EVENT_CAPACITY")
            .unwrap_or(defaults::EVENT_CAPACITY)
            .max(1);

        Self {
            max_query_len,
            timeout: Duration::from_secs(timeout_secs),
            event_capacity,
        }
    }

    /// Set the maximum query length.
    pub fn with_max_query_len(mut self, max: usize) -> Self {
        self.max_query_len = max;
        self
    }

    /// Set the collaborator timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.max(1);
        self
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
