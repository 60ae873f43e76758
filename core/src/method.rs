//! The `Method` trait tying a Conduit method name to its request and result types.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// A Conduit method binding: its wire name plus request and result shapes.
///
/// Implemented by zero-sized marker types and invoked through
/// [`Conn::invoke`](crate::Conn::invoke).
pub trait Method {
    const NAME: &'static str;
    type Params: Serialize;
    type Response: DeserializeOwned;
}
