//! Typed client for Phabricator's Conduit API.
//!
//! # Overview
//! A Conduit call is a form-encoded `POST` to `<host>/api/<method>` whose
//! response is a JSON envelope holding either `result` or
//! `error_code`/`error_info`. This crate builds the request, runs it through
//! a [`Transport`], classifies the reply and decodes `result` into any
//! `serde` type the caller names.
//!
//! # Design
//! - [`perform_call`] is the whole pipeline for one call; [`Conn`] dials a
//!   host once and reuses its transport.
//! - Request building ([`build_call`]) and response classification
//!   ([`parse_call`]) never touch the network, so they are tested on plain
//!   data; the transport is the only I/O.
//! - Errors keep transport, decode, server-reported and missing-result
//!   failures apart (see [`Error`]).
//! - Method bindings under [`methods`] are thin data shapes; the pipeline
//!   knows nothing about them.

pub mod call;
pub mod client;
pub mod endpoint;
pub mod envelope;
pub mod error;
pub mod http;
pub mod method;
pub mod methods;
pub mod options;
pub mod transport;
pub mod types;

pub use call::{build_call, execute, parse_call, perform_call};
pub use client::Conn;
pub use endpoint::endpoint_url;
pub use envelope::{decode_result, empty_array_as_default, Envelope};
pub use error::{ConduitError, Error, Result, TransportError};
pub use http::{HttpRequest, HttpResponse};
pub use method::Method;
pub use options::{ConnectionOptions, Session};
pub use transport::{make_transport, Transport, UreqTransport};
pub use types::{Phid, SearchCursor, SearchItem, UnixTimestamp};
