//! Change poller.
//!
//! Owns the page, its asset registry and a change feed. Each cycle awaits one
//! notification and applies it:
//!
//! | Changed path resolves to | Action                                      |
//! |--------------------------|---------------------------------------------|
//! | the page sentinel        | full reload                                 |
//! | a tracked element        | attribute set to `""`, then restored        |
//! | nothing tracked          | skipped                                     |
//!
//! Feed failures are retried with exponential backoff. The loop only ends
//! when its cancellation token fires.

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use super::backoff::Backoff;
use super::config::PollerConfig;
use super::document::{Document, ElementId, ResourceAttr};
use super::feed::{ChangeFeed, ChangeNotification};
use super::registry::{AssetEntry, AssetRegistry};

/// What the poller did for one changed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReloadAction {
    /// The page itself changed and was reloaded.
    FullReload { url: Url },
    /// A tracked element was forced to re-fetch its resource.
    Refreshed {
        url: Url,
        element: ElementId,
        attr: ResourceAttr,
    },
    /// The path is not loaded by this page.
    Skipped { path: String },
}

/// Long-lived reload loop for a single page.
pub struct ChangePoller<F: ChangeFeed, D: Document> {
    registry: AssetRegistry,
    feed: F,
    document: D,
    backoff: Backoff,
}

impl<F: ChangeFeed, D: Document> ChangePoller<F, D> {
    /// Create a poller over an already-built registry.
    pub fn new(registry: AssetRegistry, feed: F, document: D, config: &PollerConfig) -> Self {
        Self {
            registry,
            feed,
            document,
            backoff: Backoff::from_config(config),
        }
    }

    /// Scan `document` and create a poller for it.
    pub fn for_document(feed: F, document: D, config: &PollerConfig) -> Self {
        let registry = AssetRegistry::scan(&document);
        Self::new(registry, feed, document, config)
    }

    pub fn registry(&self) -> &AssetRegistry {
        &self.registry
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    /// Apply one notification to the page, in order.
    pub fn apply(&mut self, notification: &ChangeNotification) -> Vec<ReloadAction> {
        notification
            .changes
            .iter()
            .map(|path| self.apply_path(path))
            .collect()
    }

    fn apply_path(&mut self, path: &str) -> ReloadAction {
        let Some((url, entry)) = self.registry.lookup_path(path) else {
            debug!(path = %path, "Change not loaded by this page");
            return ReloadAction::Skipped {
                path: path.to_string(),
            };
        };

        match entry {
            AssetEntry::Document => {
                info!(url = %url, "Page changed, reloading");
                self.document.reload();
                ReloadAction::FullReload { url }
            }
            AssetEntry::Element { id, attr } => {
                let previous = self.document.attribute(id, attr).unwrap_or_default();
                self.document.set_attribute(id, attr, "");
                self.document.set_attribute(id, attr, &previous);
                info!(url = %url, attr = %attr, "Refreshed asset");
                ReloadAction::Refreshed {
                    url,
                    element: id,
                    attr,
                }
            }
        }
    }

    /// Poll until `shutdown` is cancelled, then hand back the document.
    pub async fn run(mut self, shutdown: CancellationToken) -> D {
        info!(
            location = %self.registry.location(),
            tracked = self.registry.len(),
            "Change poller started"
        );

        loop {
            let result = tokio::select! {
                biased;

                _ = shutdown.cancelled() => break,

                result = self.feed.next_changes() => result,
            };

            match result {
                Ok(notification) => {
                    self.backoff.reset();
                    self.apply(&notification);
                }
                Err(e) => {
                    let delay = self.backoff.next_delay();
                    warn!(
                        error = %e,
                        failures = self.backoff.failures(),
                        retry_in_ms = delay.as_millis() as u64,
                        "Change feed failed"
                    );

                    tokio::select! {
                        biased;

                        _ = shutdown.cancelled() => break,

                        _ = tokio::time::sleep(delay) => {}
                    }
                }
            }
        }

        info!("Change poller stopped");
        self.document
    }
}

impl<F, D> ChangePoller<F, D>
where
    F: ChangeFeed + 'static,
    D: Document + Send + 'static,
{
    /// Run the poller on the current tokio runtime.
    pub fn spawn(self, shutdown: CancellationToken) -> JoinHandle<D> {
        tokio::spawn(self.run(shutdown))
    }
}
