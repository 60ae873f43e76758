//! Error types for Conduit calls.
//!
//! # Design
//! A call can fail in four distinct ways and callers routinely need to tell
//! them apart: the network failed (`Transport`), the server answered with
//! something that is not a Conduit envelope (`Decode`), the server reported a
//! failure (`Conduit`), or the envelope carried neither a result nor an error
//! (`MissingResults`). None of them are retried or reinterpreted here.

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failure reported by the Conduit server, either as `error_code` /
/// `error_info` in the envelope or as a non-2xx HTTP status.
///
/// Two errors are equal when both `code` and `info` match.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {info}")]
pub struct ConduitError {
    code: String,
    info: String,
}

impl ConduitError {
    pub fn new(code: impl Into<String>, info: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            info: info.into(),
        }
    }

    /// Build an error from an HTTP status outside the 2xx range. `info` is the
    /// canonical reason phrase, or the body (lossily decoded) when the status
    /// has none.
    pub fn from_status(status: u16, body: &[u8]) -> Self {
        let reason = ureq::http::StatusCode::from_u16(status)
            .ok()
            .and_then(|status| status.canonical_reason());
        let info = match reason {
            Some(reason) => reason.to_string(),
            None => String::from_utf8_lossy(body).trim().to_string(),
        };
        Self::new(status.to_string(), info)
    }

    /// Conduit error code, e.g. `ERR-CONDUIT-CORE`, or the HTTP status digits.
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn info(&self) -> &str {
        &self.info
    }
}

/// The HTTP round-trip itself failed.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The per-call deadline elapsed before a response was read.
    #[error("request timed out")]
    Timeout,

    /// Connection, DNS, TLS or body read failure.
    #[error("{0}")]
    Failed(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl TransportError {
    /// Wrap any error raised by a custom [`Transport`](crate::Transport).
    pub fn other(err: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>) -> Self {
        Self::Failed(err.into())
    }
}

impl From<ureq::Error> for TransportError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Timeout(_) => Self::Timeout,
            other => Self::Failed(Box::new(other)),
        }
    }
}

/// Every way a Conduit call can fail.
#[derive(Debug, Error)]
pub enum Error {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The body was not a JSON envelope, or `result` did not fit the
    /// requested type.
    #[error("failed to decode conduit response: {0}")]
    Decode(#[source] serde_json::Error),

    /// The request parameters could not be turned into a JSON object.
    #[error("failed to encode conduit parameters: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("conduit error {0}")]
    Conduit(#[from] ConduitError),

    #[error("conduit response contained neither a result nor an error code")]
    MissingResults,
}

impl Error {
    pub fn as_conduit(&self) -> Option<&ConduitError> {
        match self {
            Error::Conduit(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_missing_results(&self) -> bool {
        matches!(self, Error::MissingResults)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Transport(TransportError::Timeout))
    }
}
