//! Live-reload client.
//!
//! # Architecture
//!
//! ```text
//! Document ──scan──► AssetRegistry
//!                          │
//!                          ▼
//! ChangeFeed ──────► ChangePoller ──► Document (reload / attribute refresh)
//!   └── HttpChangeFeed      │
//!                           └── Backoff (on feed errors)
//! ```
//!
//! The registry is built once from the loaded page and moved into the poller,
//! which runs as a tokio task until its cancellation token fires.

mod backoff;
mod config;
mod document;
mod feed;
mod poller;
mod registry;

pub use backoff::Backoff;
pub use config::{
    PollerConfig, DEFAULT_BACKOFF_MULTIPLIER, DEFAULT_INITIAL_BACKOFF, DEFAULT_MAX_BACKOFF,
    RELOAD_ENDPOINT,
};
pub use document::{
    AttributeWrite, Document, ElementId, ResourceAttr, StaticDocument, StaticElement,
};
pub use feed::{BoxFuture, ChangeFeed, ChangeNotification, FeedError, FeedResult, HttpChangeFeed};
pub use poller::{ChangePoller, ReloadAction};
pub use registry::{sentinel_url, AssetEntry, AssetRegistry};
