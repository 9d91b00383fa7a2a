//! Network transport trait definition.

use std::collections::HashMap;
use std::fmt::{self, Debug};
use std::io::Read;

use thiserror::Error;

/// A successful response from a [`Transport`].
pub struct Response {
    /// URL the body was finally served from, after redirects
    pub url: String,
    pub status: u16,
    /// Header names are stored lowercase
    headers: HashMap<String, String>,
    pub body: Box<dyn Read + Send>,
}

impl Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Response")
            .field("url", &self.url)
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish()
    }
}

impl Response {
    pub fn new(url: impl Into<String>, status: u16, body: Box<dyn Read + Send>) -> Self {
        Self {
            url: url.into(),
            status,
            headers: HashMap::new(),
            body,
        }
    }

    /// Add a header; later values for the same name replace earlier ones.
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failure reported by a [`Transport`].
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered with a non-2xx status
    #[error("HTTP Error {status}: {url}")]
    Status { status: u16, url: String },

    /// No response was received
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
}

/// Trait for fetching a URL.
///
/// Implementations own connection handling, TLS and deadlines; the resolver
/// only issues GET requests through this seam.
pub trait Transport: Send + Sync + Debug {
    /// GET `url` with the extra request `headers`.
    fn fetch(&self, url: &str, headers: &[(&str, &str)]) -> Result<Response, FetchError>;
}

/// Transport that refuses every request.
///
/// Used when the crate is built without the `http` feature.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineTransport;

impl Transport for OfflineTransport {
    fn fetch(&self, url: &str, _headers: &[(&str, &str)]) -> Result<Response, FetchError> {
        Err(FetchError::Transport {
            url: url.to_owned(),
            message: "no network transport configured".into(),
        })
    }
}
