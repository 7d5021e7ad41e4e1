//! Content service location.
//!
//! The base origin is an explicit value handed to `ContentClient` at
//! construction. Only binaries consult the environment, through
//! [`ContentConfig::from_env`].

/// Origin used when nothing else is configured (a local CMS dev server).
pub const DEFAULT_BASE_URL: &str = "http://localhost:1337";

/// Environment variable read by [`ContentConfig::from_env`].
pub const BASE_URL_ENV: &str = "STRAPI_API_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentConfig {
    base_url: String,
}

impl ContentConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Read the origin from `STRAPI_API_URL`, falling back to [`DEFAULT_BASE_URL`].
    pub fn from_env() -> Self {
        match std::env::var(BASE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::new(url.trim()),
            _ => Self::default(),
        }
    }

    /// Origin of the content service, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Root of the REST collections.
    pub fn api_root(&self) -> String {
        format!("{}/api", self.base_url)
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
