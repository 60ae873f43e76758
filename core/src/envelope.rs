//! The Conduit response envelope and how a decoded one is classified.
//!
//! Conduit reports application errors inside `200` responses, so a successful
//! status only means the envelope is worth reading. Classification order:
//! a non-empty `error_code` wins, then a missing `result`, then decoding.
//!
//! Phabricator serializes "nothing" as `[]` even where it otherwise returns an
//! object, so an empty array is accepted wherever a map is expected. See
//! [`decode_result`] and [`empty_array_as_default`].

use serde::de::{DeserializeOwned, Deserializer, Error as _, Unexpected};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{ConduitError, Error, Result};

/// Top-level JSON object returned by every Conduit method.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub error_info: Option<String>,
}

impl Envelope {
    /// Read an envelope from a response body. Anything but a JSON object is a
    /// decode error, including arrays that would otherwise fill the fields
    /// positionally.
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(body).map_err(Error::Decode)?;
        if !value.is_object() {
            let err = serde_json::Error::invalid_type(unexpected(&value), &"a conduit response object");
            return Err(Error::Decode(err));
        }
        Envelope::deserialize(value).map_err(Error::Decode)
    }

    pub fn into_result<T: DeserializeOwned>(self) -> Result<T> {
        if let Some(code) = self.error_code.filter(|code| !code.is_empty()) {
            let info = self.error_info.unwrap_or_default();
            return Err(ConduitError::new(code, info).into());
        }
        match self.result {
            None | Some(Value::Null) => Err(Error::MissingResults),
            Some(result) => decode_result(result),
        }
    }
}

/// Decode a `result` value into `T`, reading `[]` as `{}` when `T` rejects
/// the array.
pub fn decode_result<T: DeserializeOwned>(result: Value) -> Result<T> {
    match T::deserialize(&result) {
        Ok(value) => Ok(value),
        Err(err) if is_empty_array(&result) => {
            T::deserialize(&Value::Object(Map::new())).map_err(|_| Error::Decode(err))
        }
        Err(err) => Err(Error::Decode(err)),
    }
}

/// Field-level version of the `[]`-as-empty rule for nested values:
///
/// ```
/// # use std::collections::HashMap;
/// # use serde::Deserialize;
/// #[derive(Deserialize)]
/// struct Revision {
///     #[serde(default, deserialize_with = "conduit_core::empty_array_as_default")]
///     reviewers: HashMap<String, String>,
/// }
///
/// let revision: Revision = serde_json::from_str(r#"{"reviewers": []}"#).unwrap();
/// assert!(revision.reviewers.is_empty());
/// ```
pub fn empty_array_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    if is_empty_array(&value) || value.is_null() {
        return Ok(T::default());
    }
    T::deserialize(value).map_err(D::Error::custom)
}

fn is_empty_array(value: &Value) -> bool {
    matches!(value, Value::Array(items) if items.is_empty())
}

fn unexpected(value: &Value) -> Unexpected<'_> {
    match value {
        Value::Null => Unexpected::Unit,
        Value::Bool(b) => Unexpected::Bool(*b),
        Value::Number(_) => Unexpected::Other("number"),
        Value::String(s) => Unexpected::Str(s),
        Value::Array(_) => Unexpected::Seq,
        Value::Object(_) => Unexpected::Map,
    }
}
