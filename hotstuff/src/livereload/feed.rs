//! Change-notification transport.
//!
//! The dev server holds `GET /___hotstuff___/reload` open until something
//! changes, then answers with `{"changes": ["/path", ...]}`.

use std::future::Future;
use std::pin::Pin;

use serde::Deserialize;
use thiserror::Error;
use tracing::trace;
use url::Url;

use super::config::PollerConfig;

/// Boxed future type for dyn-compatible async methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Result type for change-feed operations.
pub type FeedResult<T> = Result<T, FeedError>;

/// Errors from a single poll.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The request could not be completed.
    #[error("change feed request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("change feed {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// The body was not a change notification.
    #[error("invalid change notification from {url}: {reason}")]
    Decode { url: String, reason: String },

    /// The endpoint could not be derived from the page location.
    #[error("invalid change feed endpoint: {0}")]
    InvalidEndpoint(String),
}

/// Paths the server reports as changed since the last poll.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ChangeNotification {
    pub changes: Vec<String>,
}

impl ChangeNotification {
    pub fn new<I, S>(changes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            changes: changes.into_iter().map(Into::into).collect(),
        }
    }
}

/// Source of change notifications.
///
/// Each call performs one poll; the poller never issues a second call while
/// one is pending.
pub trait ChangeFeed: Send {
    fn next_changes(&mut self) -> BoxFuture<'_, FeedResult<ChangeNotification>>;
}

/// Long-polling HTTP change feed.
///
/// No client timeout is set: the server may hold the request indefinitely.
#[derive(Debug, Clone)]
pub struct HttpChangeFeed {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpChangeFeed {
    /// Feed for the page at `location`, using its origin.
    pub fn new(location: &Url, config: &PollerConfig) -> FeedResult<Self> {
        let endpoint = location
            .join(&config.endpoint_path)
            .map_err(|e| FeedError::InvalidEndpoint(format!("{}: {}", config.endpoint_path, e)))?;

        let client = reqwest::Client::builder()
            .user_agent(concat!("hotstuff/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FeedError::Transport {
                url: endpoint.to_string(),
                source: e,
            })?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn poll(&self) -> FeedResult<ChangeNotification> {
        let url = self.endpoint.as_str();
        trace!(url = %url, "Polling for changes");

        let response = self
            .client
            .get(self.endpoint.clone())
            .send()
            .await
            .map_err(|e| FeedError::Transport {
                url: url.to_string(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| FeedError::Transport {
            url: url.to_string(),
            source: e,
        })?;

        serde_json::from_slice(&body).map_err(|e| FeedError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

impl ChangeFeed for HttpChangeFeed {
    fn next_changes(&mut self) -> BoxFuture<'_, FeedResult<ChangeNotification>> {
        Box::pin(self.poll())
    }
}
