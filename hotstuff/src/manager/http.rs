//! HTTP transport abstraction for testability.
//!
//! The installer needs to see redirects itself (it follows a bounded number
//! of hops), so the real transport never follows them automatically.

use std::fmt;
use std::io::Read;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::LOCATION;
use reqwest::redirect::Policy;

use super::config::InstallerConfig;
use super::error::{ManagerError, ManagerResult};

/// A single HTTP response with a streaming body.
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// `Location` header, if present and valid UTF-8.
    pub location: Option<String>,
    /// `Content-Length` header, if present.
    pub content_length: Option<u64>,
    /// Response body, read lazily.
    pub body: Box<dyn Read + Send>,
}

impl fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .field("location", &self.location)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// Trait for issuing a single HTTP GET.
///
/// Implementations must not follow redirects; a 3xx is returned as-is.
pub trait HttpTransport: Send + Sync {
    fn get(&self, url: &str) -> ManagerResult<HttpResponse>;
}

/// Real transport using a blocking reqwest client.
#[derive(Debug)]
pub struct ReqwestTransport {
    client: Client,
    timeout: Duration,
}

impl ReqwestTransport {
    /// Create a transport from installer configuration.
    pub fn new(config: &InstallerConfig) -> ManagerResult<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .redirect(Policy::none())
            .build()
            .map_err(|e| ManagerError::HttpError(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            timeout: config.timeout,
        })
    }
}

impl HttpTransport for ReqwestTransport {
    fn get(&self, url: &str) -> ManagerResult<HttpResponse> {
        let response = self.client.get(url).send().map_err(|e| {
            if e.is_timeout() {
                ManagerError::Timeout {
                    url: url.to_string(),
                    timeout_secs: self.timeout.as_secs(),
                }
            } else {
                ManagerError::DownloadFailed {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            }
        })?;

        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Ok(HttpResponse {
            status: response.status().as_u16(),
            location,
            content_length: response.content_length(),
            body: Box::new(response),
        })
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Cursor;
    use std::sync::Mutex;

    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Scripted transport: answers each URL with a canned response and
    /// records every request in order.
    #[derive(Default)]
    pub struct MockTransport {
        responses: HashMap<String, (u16, Option<String>, Vec<u8>)>,
        pub requests: Mutex<Vec<String>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(mut self, url: &str, status: u16, body: &[u8]) -> Self {
            self.responses
                .insert(url.to_string(), (status, None, body.to_vec()));
            self
        }

        pub fn redirect(mut self, url: &str, status: u16, location: &str) -> Self {
            self.responses.insert(
                url.to_string(),
                (status, Some(location.to_string()), Vec::new()),
            );
            self
        }

        pub fn requested(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl HttpTransport for MockTransport {
        fn get(&self, url: &str) -> ManagerResult<HttpResponse> {
            self.requests.lock().unwrap().push(url.to_string());
            let (status, location, body) =
                self.responses
                    .get(url)
                    .cloned()
                    .ok_or_else(|| ManagerError::DownloadFailed {
                        url: url.to_string(),
                        reason: "connection refused".to_string(),
                    })?;

            Ok(HttpResponse {
                status,
                location,
                content_length: Some(body.len() as u64),
                body: Box::new(Cursor::new(body)),
            })
        }
    }

    fn transport() -> ReqwestTransport {
        ReqwestTransport::new(&InstallerConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_reqwest_transport_does_not_follow_redirects() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/asset"))
            .respond_with(
                ResponseTemplate::new(302).insert_header("Location", "/storage/asset.tar.gz"),
            )
            .mount(&server)
            .await;

        let url = format!("{}/asset", server.uri());
        let (status, location) = tokio::task::spawn_blocking(move || {
            let response = transport().get(&url).unwrap();
            (response.status, response.location)
        })
        .await
        .unwrap();

        assert_eq!(status, 302);
        assert_eq!(location.as_deref(), Some("/storage/asset.tar.gz"));
    }

    #[tokio::test]
    async fn test_reqwest_transport_streams_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/file"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"payload".to_vec()))
            .mount(&server)
            .await;

        let url = format!("{}/file", server.uri());
        let (status, body) = tokio::task::spawn_blocking(move || {
            let mut response = transport().get(&url).unwrap();
            let mut body = Vec::new();
            response.body.read_to_end(&mut body).unwrap();
            (response.status, body)
        })
        .await
        .unwrap();

        assert_eq!(status, 200);
        assert_eq!(body, b"payload");
    }

    #[test]
    fn test_reqwest_transport_connection_error() {
        // Port 9 (discard) on localhost is not expected to accept HTTP.
        let err = transport().get("http://127.0.0.1:9/").unwrap_err();
        assert!(matches!(
            err,
            ManagerError::DownloadFailed { .. } | ManagerError::Timeout { .. }
        ));
    }

    #[test]
    fn test_mock_transport_records_requests() {
        let mock = MockTransport::new().respond("http://a/", 200, b"ok");
        let _ = mock.get("http://a/");
        let _ = mock.get("http://b/");
        assert_eq!(mock.requested(), vec!["http://a/", "http://b/"]);
    }
}
