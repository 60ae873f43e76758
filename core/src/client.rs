//! A dialed connection to one Conduit host.
//!
//! # Design
//! `Conn` resolves endpoints against a fixed host and reuses one transport
//! for every call. It holds no mutable state, so a single `Conn` can be
//! cloned or shared across threads freely.

use std::{fmt, sync::Arc, time::Duration};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::call::execute;
use crate::endpoint::endpoint_url;
use crate::error::Result;
use crate::method::Method;
use crate::methods::conduit::{Capabilities, GetCapabilities};
use crate::options::ConnectionOptions;
use crate::transport::{make_transport, Transport};

#[derive(Clone)]
pub struct Conn {
    host: String,
    options: ConnectionOptions,
    transport: Arc<dyn Transport>,
    capabilities: Capabilities,
}

impl Conn {
    /// Connect to `host` and check it speaks Conduit by fetching
    /// `conduit.getcapabilities`.
    pub fn dial(host: impl Into<String>, options: ConnectionOptions) -> Result<Self> {
        let host = host.into();
        let transport = make_transport(&options);
        let url = endpoint_url(&host, GetCapabilities::NAME);
        let capabilities: Capabilities = execute(transport.as_ref(), &url, &(), &options)?;
        tracing::info!(
            host = %host,
            authentication = ?capabilities.authentication,
            "dialed conduit host"
        );

        Ok(Self {
            host,
            options,
            transport,
            capabilities,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    pub fn options(&self) -> &ConnectionOptions {
        &self.options
    }

    /// Call `method` with arbitrary parameters and decode the result as `T`.
    pub fn call<P, T>(&self, method: &str, params: &P) -> Result<T>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = endpoint_url(&self.host, method);
        execute(self.transport.as_ref(), &url, params, &self.options)
    }

    /// Like [`call`](Self::call), with a deadline for this call only.
    pub fn call_with_timeout<P, T>(&self, method: &str, params: &P, timeout: Duration) -> Result<T>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = endpoint_url(&self.host, method);
        let options = ConnectionOptions {
            timeout: Some(timeout),
            ..self.options.clone()
        };
        execute(self.transport.as_ref(), &url, params, &options)
    }

    /// Call a typed method binding.
    pub fn invoke<M: Method>(&self, params: &M::Params) -> Result<M::Response> {
        self.call(M::NAME, params)
    }
}

impl fmt::Debug for Conn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Conn")
            .field("host", &self.host)
            .field("options", &self.options)
            .field("capabilities", &self.capabilities)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::Value;

    use super::*;
    use crate::error::{ConduitError, Error, TransportError};
    use crate::http::{HttpRequest, HttpResponse};

    /// Replies per endpoint URL and remembers every request.
    struct Scripted {
        replies: Vec<(&'static str, u16, &'static str)>,
        seen: Mutex<Vec<(String, Option<Duration>)>>,
    }

    impl Scripted {
        fn new(replies: Vec<(&'static str, u16, &'static str)>) -> Arc<Self> {
            Arc::new(Self {
                replies,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    impl Transport for Scripted {
        fn execute(
            &self,
            request: &HttpRequest,
            timeout: Option<Duration>,
        ) -> std::result::Result<HttpResponse, TransportError> {
            self.seen.lock().unwrap().push((request.url.clone(), timeout));
            let (_, status, body) = self
                .replies
                .iter()
                .find(|(url, _, _)| *url == request.url)
                .copied()
                .unwrap_or(("", 404, "404 page not found"));
            Ok(HttpResponse {
                status,
                headers: Vec::new(),
                body: body.as_bytes().to_vec(),
            })
        }
    }

    const CAPS: &str = r#"{"result":{"authentication":["token"],"output":["json"]}}"#;

    fn options(transport: Arc<Scripted>) -> ConnectionOptions {
        ConnectionOptions::new()
            .with_api_token("api-token")
            .with_client(transport)
    }

    #[test]
    fn dial_fetches_capabilities() {
        let transport = Scripted::new(vec![("https://phab/api/conduit.getcapabilities", 200, CAPS)]);
        let conn = Conn::dial("https://phab/", options(transport.clone())).unwrap();
        assert_eq!(conn.host(), "https://phab/");
        assert_eq!(conn.capabilities().authentication, ["token"]);
        assert_eq!(transport.seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn dial_fails_when_capabilities_are_unavailable() {
        let transport = Scripted::new(Vec::new());
        let err = Conn::dial("https://phab", options(transport)).unwrap_err();
        assert_eq!(err.as_conduit(), Some(&ConduitError::new("404", "Not Found")));
    }

    #[test]
    fn call_resolves_against_host() {
        let transport = Scripted::new(vec![
            ("https://phab/api/conduit.getcapabilities", 200, CAPS),
            ("https://phab/api/user.whoami", 200, r#"{"result":{"userName":"alice"}}"#),
        ]);
        let conn = Conn::dial("https://phab", options(transport)).unwrap();
        let me: Value = conn.call("user.whoami", &()).unwrap();
        assert_eq!(me["userName"], "alice");
    }

    #[test]
    fn call_with_timeout_only_affects_that_call() {
        let transport = Scripted::new(vec![
            ("https://phab/api/conduit.getcapabilities", 200, CAPS),
            ("https://phab/api/user.whoami", 200, r#"{"result":{}}"#),
        ]);
        let conn = Conn::dial("https://phab", options(transport.clone())).unwrap();

        let _: Value = conn
            .call_with_timeout("user.whoami", &(), Duration::from_millis(250))
            .unwrap();
        let _: Value = conn.call("user.whoami", &()).unwrap();

        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen[1].1, Some(Duration::from_millis(250)));
        assert_eq!(seen[2].1, None);
        assert_eq!(conn.options().timeout, None);
    }

    #[test]
    fn invoke_uses_method_name() {
        let transport = Scripted::new(vec![
            ("https://phab/api/conduit.getcapabilities", 200, CAPS),
            (
                "https://phab/api/differential.getcommitpaths",
                200,
                r#"{"result":["differential.go","differential_test.go"]}"#,
            ),
        ]);
        let conn = Conn::dial("https://phab", options(transport)).unwrap();
        let paths = conn
            .invoke::<crate::methods::DifferentialGetCommitPaths>(
                &crate::methods::differential::RevisionIdRequest { revision_id: 123 },
            )
            .unwrap();
        assert_eq!(paths, ["differential.go", "differential_test.go"]);
    }

    #[test]
    fn missing_results_propagates() {
        let transport = Scripted::new(vec![
            ("https://phab/api/conduit.getcapabilities", 200, CAPS),
            ("https://phab/api/user.whoami", 200, "{}"),
        ]);
        let conn = Conn::dial("https://phab", options(transport)).unwrap();
        let err = conn.call::<_, Value>("user.whoami", &()).unwrap_err();
        assert!(matches!(err, Error::MissingResults));
    }

    #[test]
    fn debug_hides_token() {
        let transport = Scripted::new(vec![("https://phab/api/conduit.getcapabilities", 200, CAPS)]);
        let conn = Conn::dial("https://phab", options(transport)).unwrap();
        assert!(!format!("{conn:?}").contains("api-token"));
    }
}
