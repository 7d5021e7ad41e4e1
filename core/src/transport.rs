//! Network execution of `HttpRequest` values.
//!
//! # Design
//! `Transport` is the one seam where the crate suspends on I/O. The default
//! implementation drives a blocking ureq agent on tokio's blocking pool so
//! several requests can be in flight from one task. Status codes are
//! returned as data; only a failure to obtain any response becomes an
//! error (`ContentError::Connectivity`).

use std::fmt;
use std::future::Future;

use crate::error::{ContentError, Result};
use crate::http::{HttpRequest, HttpResponse};

/// Executes a GET request and returns the raw response.
pub trait Transport {
    fn execute(&self, request: HttpRequest) -> impl Future<Output = Result<HttpResponse>> + Send;
}

/// `Transport` backed by a shared ureq agent.
///
/// No retries and no timeout beyond ureq's defaults.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport").finish_non_exhaustive()
    }
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let agent = self.agent.clone();
        let url = request.url.clone();
        tokio::task::spawn_blocking(move || execute_blocking(&agent, request))
            .await
            .map_err(|e| ContentError::connectivity(url, format!("request task failed: {e}")))?
    }
}

fn execute_blocking(agent: &ureq::Agent, request: HttpRequest) -> Result<HttpResponse> {
    let mut builder = agent.get(&request.url);
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }

    let mut response = builder
        .call()
        .map_err(|e| ContentError::connectivity(&request.url, e.to_string()))?;

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|e| body_read_failure(&request.url, status, e.to_string()))?;

    Ok(HttpResponse {
        status,
        headers,
        body,
    })
}

/// An error status already arrived, so a broken body is still an API error.
fn body_read_failure(url: &str, status: u16, message: String) -> ContentError {
    if (200..300).contains(&status) {
        ContentError::connectivity(url, message)
    } else {
        ContentError::api(status, format!("unreadable error body: {message}"))
    }
}
