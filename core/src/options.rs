//! Per-connection settings: credentials, TLS and transport choice.

use std::{fmt, sync::Arc, time::Duration};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::transport::Transport;

/// Session credentials obtained from an earlier `conduit.connect`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "sessionKey")]
    pub session_key: String,
    #[serde(rename = "connectionID")]
    pub connection_id: u64,
}

/// Settings for one logical connection. Read-only once calls start.
///
/// `api_token` and `session` are alternatives; when both are set the token
/// is sent.
#[derive(Clone, Default)]
pub struct ConnectionOptions {
    pub api_token: Option<String>,
    pub session: Option<Session>,
    /// Skip TLS certificate validation. Ignored when `client` is set.
    pub insecure_skip_verify: bool,
    /// Transport reused as-is instead of building a new one.
    pub client: Option<Arc<dyn Transport>>,
    /// Deadline applied to each call.
    pub timeout: Option<Duration>,
}

impl ConnectionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn with_session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    pub fn with_insecure_skip_verify(mut self, skip: bool) -> Self {
        self.insecure_skip_verify = skip;
        self
    }

    pub fn with_client(mut self, client: Arc<dyn Transport>) -> Self {
        self.client = Some(client);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The `__conduit__` object embedded in `params`, if any credential is set.
    pub(crate) fn conduit_meta(&self) -> Option<Value> {
        if let Some(token) = &self.api_token {
            return Some(json!({ "token": token }));
        }
        self.session.as_ref().map(|session| {
            json!({
                "sessionKey": session.session_key,
                "connectionID": session.connection_id,
            })
        })
    }
}

impl fmt::Debug for ConnectionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionOptions")
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field(
                "session",
                &self.session.as_ref().map(|s| s.connection_id),
            )
            .field("insecure_skip_verify", &self.insecure_skip_verify)
            .field("client", &self.client.as_ref().map(|_| "<custom>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}
