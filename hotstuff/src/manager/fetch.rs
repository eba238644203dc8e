//! Release fetching with bounded redirect following.
//!
//! Status handling for the terminal response:
//!
//! | Status               | Result                                  |
//! |----------------------|-----------------------------------------|
//! | 2xx                  | body is returned as a [`ReleaseStream`] |
//! | 3xx + `Location`     | followed while hops remain              |
//! | 3xx, hops exhausted  | [`ManagerError::TooManyRedirects`]      |
//! | 404                  | [`ManagerError::ReleaseNotFound`]       |
//! | anything else        | [`ManagerError::UnexpectedStatus`]      |

use std::fmt;
use std::io::Read;

use tracing::{debug, info};
use url::Url;

use super::config::DEFAULT_REDIRECT_HOPS;
use super::error::{ManagerError, ManagerResult};
use super::http::{HttpResponse, HttpTransport};

/// A successful release response, ready to be extracted.
pub struct ReleaseStream {
    /// URL the body was actually served from.
    pub url: String,
    /// Size of the body, if the server reported it.
    pub content_length: Option<u64>,
    /// The archive bytes.
    pub body: Box<dyn Read + Send>,
}

impl fmt::Debug for ReleaseStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReleaseStream")
            .field("url", &self.url)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// Fetches a release archive through an [`HttpTransport`].
pub struct Fetcher<T: HttpTransport> {
    transport: T,
    redirect_hops: usize,
}

impl<T: HttpTransport> Fetcher<T> {
    /// Create a fetcher that follows the default single redirect hop.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            redirect_hops: DEFAULT_REDIRECT_HOPS,
        }
    }

    /// Set how many redirect hops are followed.
    pub fn with_redirect_hops(mut self, hops: usize) -> Self {
        self.redirect_hops = hops;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// GET `url`, following redirects up to the hop limit.
    ///
    /// A single attempt is made; network failures are not retried.
    pub fn fetch(&self, url: &str) -> ManagerResult<ReleaseStream> {
        let mut current = url.to_string();
        let mut response = self.transport.get(&current)?;
        let mut hops = 0;

        loop {
            let status = response.status;
            debug!(url = %current, status, "Release response");

            match status {
                200..=299 => {
                    return Ok(ReleaseStream {
                        url: current,
                        content_length: response.content_length,
                        body: response.body,
                    });
                }
                300..=399 if response.location.is_some() => {
                    if hops >= self.redirect_hops {
                        return Err(ManagerError::TooManyRedirects {
                            url: url.to_string(),
                            hops: self.redirect_hops,
                        });
                    }
                    let next = redirect_target(&current, &response)?;
                    info!(from = %current, to = %next, "Following redirect");
                    response = self.transport.get(&next)?;
                    current = next;
                    hops += 1;
                }
                404 => return Err(ManagerError::ReleaseNotFound { url: current }),
                _ => return Err(ManagerError::UnexpectedStatus { url: current, status }),
            }
        }
    }
}

/// Resolve a `Location` header against the URL that produced it.
fn redirect_target(base: &str, response: &HttpResponse) -> ManagerResult<String> {
    let location = response.location.as_deref().unwrap_or_default();
    Url::parse(base)
        .and_then(|base| base.join(location))
        .map(String::from)
        .map_err(|e| ManagerError::DownloadFailed {
            url: base.to_string(),
            reason: format!("invalid redirect location \"{}\": {}", location, e),
        })
}
