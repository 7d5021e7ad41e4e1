//! Error types for the content client.
//!
//! # Design
//! Connectivity failures and non-2xx answers get separate variants so page
//! code can tell "the CMS is unreachable" from "the CMS refused the query".
//! "Not found" is deliberately absent: slug lookups with no match return
//! `Ok(None)`.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ContentError>;

/// Errors surfaced by the fetch and parse layers.
#[derive(Error, Debug)]
pub enum ContentError {
    /// The request never produced an HTTP response (DNS, refused, reset, timeout).
    #[error("cannot reach content service at {url}: {message}")]
    Connectivity { url: String, message: String },

    /// The content service answered with a non-2xx status.
    #[error("content service returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    /// The response body did not match the expected envelope.
    #[error("malformed response body: {0}")]
    Decode(String),
}

impl ContentError {
    pub fn connectivity(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Connectivity {
            url: url.into(),
            message: message.into(),
        }
    }

    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// HTTP status carried by an `Api` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Connectivity { .. })
    }
}

impl From<serde_json::Error> for ContentError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_keeps_status_and_message() {
        let err = ContentError::api(500, "Internal Server Error");
        assert_eq!(err.status(), Some(500));
        assert!(!err.is_connectivity());
        assert_eq!(
            err.to_string(),
            "content service returned HTTP 500: Internal Server Error"
        );
    }

    #[test]
    fn connectivity_error_has_no_status() {
        let err = ContentError::connectivity("http://localhost:1337/api/blogs", "connection refused");
        assert!(err.is_connectivity());
        assert_eq!(err.status(), None);
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn json_error_converts_to_decode() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: ContentError = json_err.into();
        assert!(matches!(err, ContentError::Decode(_)));
    }
}
