//! Registry of resources currently loaded by a page.
//!
//! Built once from a [`Document`] scan. Each absolute resource URL maps to the
//! element that loaded it, and the page's own canonical URL maps to
//! [`AssetEntry::Document`]. Elements added to the page after the scan are
//! not tracked.

use std::collections::HashMap;

use tracing::{debug, trace};
use url::Url;

use super::document::{Document, ElementId, ResourceAttr};

/// What a tracked URL refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetEntry {
    /// The page itself.
    Document,
    /// An element loading the resource through `attr`.
    Element { id: ElementId, attr: ResourceAttr },
}

/// Absolute resource URL to the element that loaded it.
#[derive(Debug, Clone)]
pub struct AssetRegistry {
    location: Url,
    entries: HashMap<Url, AssetEntry>,
}

impl AssetRegistry {
    /// Scan `document` for every element with a `src` or `href`.
    ///
    /// An element carrying both is tracked by its `src`. When two elements
    /// resolve to the same URL the later one wins. The page sentinel is
    /// inserted last and is never shadowed by an element.
    pub fn scan<D: Document>(document: &D) -> Self {
        let location = document.location().clone();
        let mut entries = HashMap::new();

        let src = document
            .elements_with(ResourceAttr::Src)
            .into_iter()
            .map(|id| (id, ResourceAttr::Src));
        let href = document
            .elements_with(ResourceAttr::Href)
            .into_iter()
            .filter(|id| document.attribute(*id, ResourceAttr::Src).is_none())
            .map(|id| (id, ResourceAttr::Href));

        for (id, attr) in src.chain(href) {
            let Some(value) = document.attribute(id, attr) else {
                continue;
            };
            if value.is_empty() {
                continue;
            }
            match location.join(&value) {
                Ok(url) => {
                    trace!(url = %url, element = id.0, attr = %attr, "Tracking resource");
                    entries.insert(url, AssetEntry::Element { id, attr });
                }
                Err(e) => debug!(value = %value, error = %e, "Skipping unresolvable resource"),
            }
        }

        entries.insert(sentinel_url(&location), AssetEntry::Document);
        debug!(location = %location, tracked = entries.len(), "Asset registry built");

        Self { location, entries }
    }

    /// Location of the scanned page.
    pub fn location(&self) -> &Url {
        &self.location
    }

    /// Absolute URL of a server-relative changed path, on the page's origin.
    ///
    /// The path only ever replaces the URL path, so `//host/x` stays on the
    /// page's own host.
    pub fn resolve(&self, path: &str) -> Option<Url> {
        if self.location.cannot_be_a_base() {
            return None;
        }
        let mut url = self.location.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.set_path(path);
        Some(url)
    }

    pub fn lookup(&self, url: &Url) -> Option<AssetEntry> {
        self.entries.get(url).copied()
    }

    /// Resolve and look up a changed path in one step.
    pub fn lookup_path(&self, path: &str) -> Option<(Url, AssetEntry)> {
        let url = self.resolve(path)?;
        let entry = self.lookup(&url)?;
        Some((url, entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Url, &AssetEntry)> {
        self.entries.iter()
    }
}

/// Canonical URL of the page at `location`.
///
/// Query and fragment are dropped; a directory path, including the root,
/// maps to its `index.html`.
///
/// ```
/// use hotstuff::livereload::sentinel_url;
/// use url::Url;
///
/// let loc = Url::parse("http://localhost:4000/docs/?tab=1#top").unwrap();
/// assert_eq!(sentinel_url(&loc).as_str(), "http://localhost:4000/docs/index.html");
/// ```
pub fn sentinel_url(location: &Url) -> Url {
    let mut url = location.clone();
    url.set_query(None);
    url.set_fragment(None);
    if url.path().ends_with('/') {
        let path = format!("{}index.html", url.path());
        url.set_path(&path);
    }
    url
}
