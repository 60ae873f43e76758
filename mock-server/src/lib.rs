//! In-process mock of a Conduit server.
//!
//! # Design
//! Each registered method name maps to a canned HTTP status and body. Requests
//! are served at `POST /api/{method}` exactly like the real service; anything
//! else answers `404 page not found`. Every call that hits a registered method
//! is recorded with its decoded form fields so tests can inspect what the
//! client put on the wire.
//!
//! `MockServer::start` runs the router on a background thread with its own
//! runtime, so synchronous client tests can use it without an async harness.

use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
    time::Duration,
};

use axum::{
    extract::{rejection::FormRejection, Path, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Form, Router,
};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::oneshot};

/// Body returned for unknown routes and non-POST requests.
pub const NOT_FOUND_BODY: &str = "404 page not found";

/// A canned reply for one Conduit method.
#[derive(Clone, Debug)]
pub struct CannedResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
    pub delay: Option<Duration>,
}

/// One request received for a registered method.
#[derive(Clone, Debug, Default)]
pub struct RecordedCall {
    pub form: HashMap<String, String>,
}

impl RecordedCall {
    /// The `params` form field decoded as JSON, or `Value::Null` if absent
    /// or malformed.
    pub fn params(&self) -> Value {
        self.form
            .get("params")
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or(Value::Null)
    }
}

#[derive(Default)]
struct Registry {
    routes: HashMap<String, CannedResponse>,
    calls: HashMap<String, Vec<RecordedCall>>,
}

/// Shared route table behind the router. Cheap to clone.
#[derive(Clone, Default)]
pub struct MockState {
    inner: Arc<RwLock<Registry>>,
}

impl MockState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `payload` as JSON with `status` for `method`.
    pub fn register_method(&self, method: &str, status: u16, payload: Value) {
        self.register_raw(method, status, &payload.to_string());
    }

    /// Serve a raw body, which need not be valid JSON.
    pub fn register_raw(&self, method: &str, status: u16, body: &str) {
        self.register_bytes(method, status, body.as_bytes());
    }

    /// Serve arbitrary bytes, which need not be UTF-8.
    pub fn register_bytes(&self, method: &str, status: u16, body: &[u8]) {
        self.insert(method, status, body.to_vec(), None);
    }

    /// Like `register_method`, but the reply is held back for `delay`.
    pub fn register_delayed(&self, method: &str, status: u16, payload: Value, delay: Duration) {
        self.insert(method, status, payload.to_string().into_bytes(), Some(delay));
    }

    /// Register the default `conduit.getcapabilities` reply.
    pub fn register_capabilities(&self) {
        self.register_method(
            "conduit.getcapabilities",
            200,
            json!({
                "result": {
                    "authentication": ["token", "session"],
                    "signatures": ["consign"],
                    "input": ["json", "urlencoded"],
                    "output": ["json"],
                }
            }),
        );
    }

    /// Calls received so far for `method`, oldest first.
    pub fn calls(&self, method: &str) -> Vec<RecordedCall> {
        let registry = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        registry.calls.get(method).cloned().unwrap_or_default()
    }

    fn insert(&self, method: &str, status: u16, body: Vec<u8>, delay: Option<Duration>) {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut registry = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        registry
            .routes
            .insert(method.to_string(), CannedResponse { status, body, delay });
    }

    fn lookup(&self, method: &str, call: RecordedCall) -> Option<CannedResponse> {
        let mut registry = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let canned = registry.routes.get(method).cloned()?;
        registry.calls.entry(method.to_string()).or_default().push(call);
        Some(canned)
    }
}

pub fn app(state: MockState) -> Router {
    Router::new()
        .route("/api/{method}", any(handle_call))
        .fallback(not_found)
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: MockState) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state)).await
}

async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, NOT_FOUND_BODY).into_response()
}

async fn handle_call(
    State(state): State<MockState>,
    method: Method,
    Path(name): Path<String>,
    form: Result<Form<HashMap<String, String>>, FormRejection>,
) -> Response {
    if method != Method::POST {
        return not_found().await;
    }

    let call = RecordedCall {
        form: form.map(|Form(fields)| fields).unwrap_or_default(),
    };
    let Some(canned) = state.lookup(&name, call) else {
        tracing::debug!(method = %name, "no canned response registered");
        return not_found().await;
    };

    if let Some(delay) = canned.delay {
        tokio::time::sleep(delay).await;
    }

    (
        canned.status,
        [(header::CONTENT_TYPE, "application/json")],
        canned.body,
    )
        .into_response()
}

/// A mock server bound to a random local port, running until dropped.
pub struct MockServer {
    url: String,
    state: MockState,
    shutdown: Option<oneshot::Sender<()>>,
}

impl MockServer {
    pub fn start() -> Result<Self, std::io::Error> {
        let std_listener = std::net::TcpListener::bind("127.0.0.1:0")?;
        let addr = std_listener.local_addr()?;
        std_listener.set_nonblocking(true)?;

        let state = MockState::new();
        let router = app(state.clone());
        let (shutdown, signal) = oneshot::channel::<()>();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        std::thread::spawn(move || {
            let served = runtime.block_on(async move {
                let listener = TcpListener::from_std(std_listener)?;
                axum::serve(listener, router)
                    .with_graceful_shutdown(async {
                        let _ = signal.await;
                    })
                    .await
            });
            if let Err(err) = served {
                tracing::error!(error = %err, "mock conduit server stopped");
            }
        });

        Ok(Self {
            url: format!("http://{addr}"),
            state,
            shutdown: Some(shutdown),
        })
    }

    /// Root URL of the server, e.g. `http://127.0.0.1:41234`.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn state(&self) -> &MockState {
        &self.state
    }

    pub fn register_method(&self, method: &str, status: u16, payload: Value) {
        self.state.register_method(method, status, payload);
    }

    pub fn register_raw(&self, method: &str, status: u16, body: &str) {
        self.state.register_raw(method, status, body);
    }

    pub fn register_bytes(&self, method: &str, status: u16, body: &[u8]) {
        self.state.register_bytes(method, status, body);
    }

    pub fn register_delayed(&self, method: &str, status: u16, payload: Value, delay: Duration) {
        self.state.register_delayed(method, status, payload, delay);
    }

    pub fn register_capabilities(&self) {
        self.state.register_capabilities();
    }

    pub fn calls(&self, method: &str) -> Vec<RecordedCall> {
        self.state.calls(method)
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}
