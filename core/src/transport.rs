//! The HTTP round-trip behind every call.
//!
//! # Design
//! `Transport` is the seam where callers inject their own client (for tests,
//! proxies, or an existing agent). The default `UreqTransport` wraps a ureq
//! agent configured so that non-2xx statuses come back as data: status
//! classification belongs to the call executor, not the HTTP client.

use std::{fmt, sync::Arc, time::Duration};

use ureq::tls::TlsConfig;

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};
use crate::options::ConnectionOptions;

/// Upper bound on a response body read into memory. `file.download` returns
/// whole files base64-encoded, so this is well above ureq's default.
pub const MAX_BODY_BYTES: u64 = 1 << 30;

/// Executes one form-encoded `POST`.
///
/// Implementations must be safe to share between threads; the executor holds
/// no lock around them.
pub trait Transport: Send + Sync {
    /// Send `request` and return whatever status the server answered with.
    /// `timeout`, when set, bounds the whole exchange.
    fn execute(
        &self,
        request: &HttpRequest,
        timeout: Option<Duration>,
    ) -> Result<HttpResponse, TransportError>;
}

/// Default transport backed by [`ureq::Agent`].
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
    pub fn new(insecure_skip_verify: bool) -> Self {
        let tls = TlsConfig::builder()
            .disable_verification(insecure_skip_verify)
            .build();
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .tls_config(tls)
            .build()
            .new_agent();
        Self { agent }
    }

    /// Use a caller-configured agent.
    pub fn from_agent(agent: ureq::Agent) -> Self {
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(false)
    }
}

impl Transport for UreqTransport {
    fn execute(
        &self,
        request: &HttpRequest,
        timeout: Option<Duration>,
    ) -> Result<HttpResponse, TransportError> {
        let mut builder = self.agent.post(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if timeout.is_some() {
            builder = builder.config().timeout_global(timeout).build();
        }

        let form = request
            .form
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()));
        let mut response = match builder.send_form(form) {
            Ok(response) => response,
            // Agents supplied through `from_agent` may still treat statuses as errors.
            Err(ureq::Error::StatusCode(status)) => {
                return Ok(HttpResponse {
                    status,
                    headers: Vec::new(),
                    body: Vec::new(),
                })
            }
            Err(err) => return Err(err.into()),
        };

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        // Kept as bytes; UTF-8 is checked only when the envelope is decoded.
        let body = response
            .body_mut()
            .with_config()
            .limit(MAX_BODY_BYTES)
            .read_to_vec()?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// The transport a call should use: the injected client when present,
/// otherwise a fresh ureq transport honoring `insecure_skip_verify`.
pub fn make_transport(options: &ConnectionOptions) -> Arc<dyn Transport> {
    match &options.client {
        Some(client) => Arc::clone(client),
        None => Arc::new(UreqTransport::new(options.insecure_skip_verify)),
    }
}
