//! HTTP transport types for the host-does-IO split.
//!
//! # Design
//! Requests and responses are plain data. `ContentClient` builds
//! `HttpRequest` values and parses `HttpResponse` values without touching the
//! network; a [`Transport`](crate::transport::Transport) performs the actual
//! round-trip. The content API is read-only, so every request is a GET.

/// Header sent with every request.
pub const CONTENT_TYPE_JSON: (&str, &str) = ("content-type", "application/json");

/// A GET request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Absolute URL including the encoded query string.
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    pub fn get(url: String) -> Self {
        Self {
            url,
            headers: vec![(CONTENT_TYPE_JSON.0.to_string(), CONTENT_TYPE_JSON.1.to_string())],
        }
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
