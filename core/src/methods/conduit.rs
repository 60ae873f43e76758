//! `conduit.*` and `phid.*` methods.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::method::Method;
use crate::types::Phid;

/// `conduit.getcapabilities`: what the server accepts. Used by
/// [`Conn::dial`](crate::Conn::dial) to verify the endpoint.
pub struct GetCapabilities;

impl Method for GetCapabilities {
    const NAME: &'static str = "conduit.getcapabilities";
    type Params = ();
    type Response = Capabilities;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    #[serde(default)]
    pub authentication: Vec<String>,
    #[serde(default)]
    pub signatures: Vec<String>,
    #[serde(default)]
    pub input: Vec<String>,
    #[serde(default)]
    pub output: Vec<String>,
}

/// `conduit.query`: the method catalog, keyed by method name.
pub struct ConduitQuery;

impl Method for ConduitQuery {
    const NAME: &'static str = "conduit.query";
    type Params = ();
    type Response = HashMap<String, MethodDescription>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDescription {
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "crate::envelope::empty_array_as_default")]
    pub params: HashMap<String, String>,
    #[serde(default, rename = "return")]
    pub returns: String,
}

/// `phid.lookup`: resolve monograms such as `T123` or `D45` to objects.
pub struct PhidLookup;

impl Method for PhidLookup {
    const NAME: &'static str = "phid.lookup";
    type Params = PhidLookupRequest;
    type Response = HashMap<String, PhidObject>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhidLookupRequest {
    pub names: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhidObject {
    pub phid: Phid,
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub type_name: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub status: String,
}
