//! The call executor: one Conduit request/response cycle.
//!
//! # Design
//! Split into `build_call` (parameters and credentials to an `HttpRequest`)
//! and `parse_call` (an `HttpResponse` to a typed result or error), joined by
//! a [`Transport`]. Neither half touches the network, and no state is kept
//! between calls.

use serde::de::DeserializeOwned;
use serde::ser::Error as _;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::envelope::Envelope;
use crate::error::{ConduitError, Error, Result};
use crate::http::{HttpRequest, HttpResponse};
use crate::options::ConnectionOptions;
use crate::transport::{make_transport, Transport};

/// Key of the credential object inside `params`, and of the form flag that
/// tells Phabricator to look for it.
const CONDUIT_META: &str = "__conduit__";

/// Encode `params` and the credentials in `options` as a Conduit request.
///
/// `params` must serialize to a JSON object; `()` and `None` are sent as `{}`.
pub fn build_call<P>(url: &str, params: &P, options: &ConnectionOptions) -> Result<HttpRequest>
where
    P: Serialize + ?Sized,
{
    let mut params = match serde_json::to_value(params).map_err(Error::Encode)? {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            return Err(Error::Encode(serde_json::Error::custom(format!(
                "parameters must serialize to a JSON object, got {}",
                json_kind(&other)
            ))))
        }
    };
    if let Some(meta) = options.conduit_meta() {
        params.insert(CONDUIT_META.to_string(), meta);
    }
    let encoded = serde_json::to_string(&params).map_err(Error::Encode)?;

    let mut form = vec![
        ("params".to_string(), encoded),
        ("output".to_string(), "json".to_string()),
        (CONDUIT_META.to_string(), "true".to_string()),
    ];
    if let Some(token) = &options.api_token {
        form.push(("api.token".to_string(), token.clone()));
    }

    Ok(HttpRequest {
        url: url.to_string(),
        headers: vec![("accept".to_string(), "application/json".to_string())],
        form,
    })
}

/// Classify a Conduit response and decode its `result`.
///
/// A non-2xx status is authoritative and never looks at the body.
pub fn parse_call<T: DeserializeOwned>(response: &HttpResponse) -> Result<T> {
    if !response.is_success() {
        return Err(ConduitError::from_status(response.status, &response.body).into());
    }
    Envelope::from_slice(&response.body)?.into_result()
}

/// Run one call over `transport`.
pub fn execute<P, T>(
    transport: &dyn Transport,
    url: &str,
    params: &P,
    options: &ConnectionOptions,
) -> Result<T>
where
    P: Serialize + ?Sized,
    T: DeserializeOwned,
{
    let request = build_call(url, params, options)?;
    tracing::debug!(url, "conduit call");

    let response = transport.execute(&request, options.timeout).map_err(|err| {
        tracing::debug!(url, error = %err, "conduit transport failed");
        Error::Transport(err)
    })?;
    tracing::debug!(url, status = response.status, "conduit response");

    parse_call(&response).inspect_err(|err| match err {
        Error::Conduit(conduit) => tracing::warn!(url, code = conduit.code(), info = conduit.info(), "conduit call failed"),
        Error::MissingResults => tracing::warn!(url, "conduit response had no result"),
        _ => {}
    })
}

/// Perform a single call to `url` with a transport derived from `options`.
///
/// Use [`Conn`](crate::Conn) to reuse one transport across many calls.
pub fn perform_call<P, T>(url: &str, params: &P, options: &ConnectionOptions) -> Result<T>
where
    P: Serialize + ?Sized,
    T: DeserializeOwned,
{
    let transport = make_transport(options);
    execute(transport.as_ref(), url, params, options)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use serde_json::json;

    use super::*;
    use crate::error::TransportError;
    use crate::options::Session;

    const URL: &str = "http://localhost:3000/api/differential.query";

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.as_bytes().to_vec(),
        }
    }

    fn params_of(req: &HttpRequest) -> Value {
        serde_json::from_str(req.form_value("params").unwrap()).unwrap()
    }

    // --- build ---

    #[test]
    fn build_call_encodes_params_as_form() {
        let req = build_call(URL, &json!({"ids": [123]}), &ConnectionOptions::new()).unwrap();
        assert_eq!(req.url, URL);
        assert_eq!(params_of(&req), json!({"ids": [123]}));
        assert_eq!(req.form_value("output"), Some("json"));
        assert_eq!(req.form_value("__conduit__"), Some("true"));
        assert_eq!(req.form_value("api.token"), None);
    }

    #[test]
    fn build_call_injects_token() {
        let options = ConnectionOptions::new().with_api_token("api-token");
        let req = build_call(URL, &json!({}), &options).unwrap();
        assert_eq!(params_of(&req), json!({"__conduit__": {"token": "api-token"}}));
        assert_eq!(req.form_value("api.token"), Some("api-token"));
    }

    #[test]
    fn build_call_injects_session() {
        let options = ConnectionOptions::new().with_session(Session {
            session_key: "key".to_string(),
            connection_id: 7,
        });
        let req = build_call(URL, &json!({"phids": []}), &options).unwrap();
        assert_eq!(
            params_of(&req),
            json!({"phids": [], "__conduit__": {"sessionKey": "key", "connectionID": 7}})
        );
        assert_eq!(req.form_value("api.token"), None);
    }

    #[test]
    fn build_call_accepts_unit_params() {
        let req = build_call(URL, &(), &ConnectionOptions::new()).unwrap();
        assert_eq!(params_of(&req), json!({}));
    }

    #[test]
    fn build_call_rejects_non_object_params() {
        let err = build_call(URL, &[1, 2, 3], &ConnectionOptions::new()).unwrap_err();
        assert!(matches!(err, Error::Encode(_)));
        assert!(err.to_string().contains("an array"), "{err}");
    }

    // --- parse ---

    #[test]
    fn parse_call_success() {
        let out: HashMap<String, String> =
            parse_call(&response(200, r#"{"result":{"PHID-1":"T1"}}"#)).unwrap();
        assert_eq!(out["PHID-1"], "T1");
    }

    #[test]
    fn parse_call_non_2xx_ignores_body() {
        let body = r#"{"result":{"ok":true}}"#;
        let err = parse_call::<Value>(&response(404, body)).unwrap_err();
        assert_eq!(err.as_conduit(), Some(&ConduitError::new("404", "Not Found")));

        let err = parse_call::<Value>(&response(500, "boom")).unwrap_err();
        assert_eq!(
            err.as_conduit(),
            Some(&ConduitError::new("500", "Internal Server Error"))
        );
    }

    #[test]
    fn parse_call_bad_json() {
        let err = parse_call::<Value>(&response(200, "not json")).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn parse_call_empty_envelope() {
        let err = parse_call::<Value>(&response(200, "{}")).unwrap_err();
        assert!(err.is_missing_results());
    }

    #[test]
    fn parse_call_empty_array_into_map() {
        let out: HashMap<String, Value> = parse_call(&response(200, r#"{"result":[]}"#)).unwrap();
        assert!(out.is_empty());
    }

    // --- execute ---

    #[derive(Default)]
    struct Recording {
        seen: Mutex<Vec<(HttpRequest, Option<Duration>)>>,
        reply: Option<HttpResponse>,
    }

    impl Transport for Recording {
        fn execute(
            &self,
            request: &HttpRequest,
            timeout: Option<Duration>,
        ) -> std::result::Result<HttpResponse, TransportError> {
            self.seen.lock().unwrap().push((request.clone(), timeout));
            self.reply
                .clone()
                .ok_or_else(|| TransportError::other("connection refused"))
        }
    }

    #[test]
    fn execute_passes_timeout_to_transport() {
        let transport = Recording {
            reply: Some(response(200, r#"{"result":"done"}"#)),
            ..Default::default()
        };
        let options = ConnectionOptions::new().with_timeout(Duration::from_secs(3));
        let out: String = execute(&transport, URL, &(), &options).unwrap();
        assert_eq!(out, "done");

        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].1, Some(Duration::from_secs(3)));
    }

    #[test]
    fn execute_surfaces_transport_failure() {
        let transport = Recording::default();
        let err = execute::<_, Value>(&transport, URL, &(), &ConnectionOptions::new()).unwrap_err();
        assert!(matches!(err, Error::Transport(TransportError::Failed(_))));
    }

    #[test]
    fn encode_failure_happens_before_io() {
        let transport = Recording::default();
        let err = execute::<_, Value>(&transport, URL, &"flat", &ConnectionOptions::new()).unwrap_err();
        assert!(matches!(err, Error::Encode(_)));
        assert!(transport.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn perform_call_uses_injected_client() {
        let transport = Arc::new(Recording {
            reply: Some(response(200, r#"{"result":[]}"#)),
            ..Default::default()
        });
        let options = ConnectionOptions::new().with_client(transport.clone());
        let out: Vec<String> = perform_call(URL, &(), &options).unwrap();
        assert!(out.is_empty());
        assert_eq!(transport.seen.lock().unwrap().len(), 1);
    }
}
