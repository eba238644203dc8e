//! Live-reload client configuration.

use std::time::Duration;

/// Path of the change-notification endpoint on the dev server.
pub const RELOAD_ENDPOINT: &str = "/___hotstuff___/reload";

/// Default delay before the first retry after a failed poll (250ms).
pub const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_millis(250);

/// Default upper bound on the retry delay (30 seconds).
pub const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Default multiplier applied after each consecutive failure.
pub const DEFAULT_BACKOFF_MULTIPLIER: f64 = 2.0;

/// Configuration for the change poller.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Endpoint path, joined onto the page origin.
    pub endpoint_path: String,
    /// Delay after the first consecutive failure (default: 250ms).
    pub initial_backoff: Duration,
    /// Delay cap (default: 30s).
    pub max_backoff: Duration,
    /// Growth factor per consecutive failure (default: 2.0).
    pub backoff_multiplier: f64,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            endpoint_path: RELOAD_ENDPOINT.to_string(),
            initial_backoff: DEFAULT_INITIAL_BACKOFF,
            max_backoff: DEFAULT_MAX_BACKOFF,
            backoff_multiplier: DEFAULT_BACKOFF_MULTIPLIER,
        }
    }
}

impl PollerConfig {
    pub fn with_endpoint_path(mut self, path: impl Into<String>) -> Self {
        self.endpoint_path = path.into();
        self
    }

    pub fn with_backoff(mut self, initial: Duration, max: Duration) -> Self {
        self.initial_backoff = initial;
        self.max_backoff = max;
        self
    }

    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PollerConfig::default();
        assert_eq!(config.endpoint_path, "/___hotstuff___/reload");
        assert_eq!(config.initial_backoff, Duration::from_millis(250));
        assert_eq!(config.max_backoff, Duration::from_secs(30));
        assert_eq!(config.backoff_multiplier, 2.0);
    }

    #[test]
    fn test_builders() {
        let config = PollerConfig::default()
            .with_endpoint_path("/reload")
            .with_backoff(Duration::from_millis(10), Duration::from_millis(40))
            .with_backoff_multiplier(3.0);

        assert_eq!(config.endpoint_path, "/reload");
        assert_eq!(config.initial_backoff, Duration::from_millis(10));
        assert_eq!(config.max_backoff, Duration::from_millis(40));
        assert_eq!(config.backoff_multiplier, 3.0);
    }
}
