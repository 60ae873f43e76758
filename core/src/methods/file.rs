//! `file.*` methods.

use serde::{Deserialize, Serialize};

use crate::method::Method;
use crate::types::{Phid, SearchCursor, SearchItem, SubscribersAttachment, UnixTimestamp};

/// `file.download`: base64-encoded file content.
pub struct FileDownload;

impl Method for FileDownload {
    const NAME: &'static str = "file.download";
    type Params = FileDownloadRequest;
    type Response = String;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDownloadRequest {
    pub phid: Phid,
}

pub struct FileSearch;

impl Method for FileSearch {
    const NAME: &'static str = "file.search";
    type Params = FileSearchRequest;
    type Response = FileSearchResponse;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSearchRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<FileSearchConstraints>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub order: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<FileSearchAttachments>,
    #[serde(flatten)]
    pub cursor: SearchCursor,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSearchConstraints {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ids: Vec<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub phids: Vec<Phid>,
    #[serde(default, rename = "authorPHIDs", skip_serializing_if = "Vec::is_empty")]
    pub author_phids: Vec<Phid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explicit: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_start: Option<UnixTimestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_end: Option<UnixTimestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subscribers: Vec<Phid>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSearchAttachments {
    pub subscribers: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSearchResponse {
    #[serde(default)]
    pub data: Vec<FileItem>,
    #[serde(default)]
    pub cursor: SearchCursor,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileItem {
    #[serde(flatten)]
    pub item: SearchItem,
    #[serde(default)]
    pub fields: FileFields,
    #[serde(default)]
    pub attachments: FileItemAttachments,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FileFields {
    pub name: String,
    pub uri: String,
    #[serde(rename = "dataURI")]
    pub data_uri: String,
    pub size: u64,
    pub date_created: Option<UnixTimestamp>,
    pub date_modified: Option<UnixTimestamp>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileItemAttachments {
    pub subscribers: Option<SubscribersAttachment>,
}
