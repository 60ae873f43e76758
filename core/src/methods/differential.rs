//! `differential.*` methods.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::envelope::empty_array_as_default;
use crate::method::Method;
use crate::types::{Phid, UnixTimestamp};

pub struct DifferentialQuery;

impl Method for DifferentialQuery {
    const NAME: &'static str = "differential.query";
    type Params = DifferentialQueryRequest;
    type Response = Vec<DifferentialRevision>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifferentialQueryRequest {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ids: Vec<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub phids: Vec<Phid>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<Phid>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reviewers: Vec<Phid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
}

/// A revision as returned by `differential.query`.
///
/// Numeric fields such as `id` and `lineCount` arrive as strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DifferentialRevision {
    pub id: String,
    pub phid: Phid,
    pub title: String,
    pub uri: String,
    pub date_created: Option<UnixTimestamp>,
    pub date_modified: Option<UnixTimestamp>,
    #[serde(rename = "authorPHID")]
    pub author_phid: Phid,
    pub status: String,
    pub status_name: String,
    pub branch: Option<String>,
    pub summary: String,
    pub test_plan: String,
    pub line_count: String,
    #[serde(rename = "activeDiffPHID")]
    pub active_diff_phid: Phid,
    pub diffs: Vec<String>,
    pub commits: Vec<Phid>,
    /// Sent as `[]` when the revision has no reviewers.
    #[serde(deserialize_with = "empty_array_as_default")]
    pub reviewers: HashMap<Phid, Phid>,
    pub ccs: Vec<Phid>,
    pub hashes: Vec<Vec<String>>,
    #[serde(deserialize_with = "empty_array_as_default")]
    pub auxiliary: HashMap<String, serde_json::Value>,
    #[serde(rename = "repositoryPHID")]
    pub repository_phid: Option<Phid>,
}

pub struct DifferentialQueryDiffs;

impl Method for DifferentialQueryDiffs {
    const NAME: &'static str = "differential.querydiffs";
    type Params = DifferentialQueryDiffsRequest;
    type Response = HashMap<String, DifferentialDiff>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifferentialQueryDiffsRequest {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ids: Vec<u64>,
    #[serde(default, rename = "revisionIDs", skip_serializing_if = "Vec::is_empty")]
    pub revision_ids: Vec<u64>,
}

/// One diff of a revision. `changes` and `properties` are left out; their
/// shape varies by repository type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DifferentialDiff {
    pub id: String,
    #[serde(rename = "revisionID")]
    pub revision_id: String,
    pub date_created: Option<UnixTimestamp>,
    pub date_modified: Option<UnixTimestamp>,
    pub source_control_base_revision: Option<String>,
    pub source_control_path: Option<String>,
    pub source_control_system: Option<String>,
    pub branch: Option<String>,
    pub bookmark: Option<String>,
    pub creation_method: String,
    pub description: String,
    pub unit_status: String,
    pub lint_status: String,
    pub author_name: Option<String>,
    pub author_email: Option<String>,
}

pub struct DifferentialGetCommitPaths;

impl Method for DifferentialGetCommitPaths {
    const NAME: &'static str = "differential.getcommitpaths";
    type Params = RevisionIdRequest;
    type Response = Vec<String>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionIdRequest {
    pub revision_id: u64,
}

pub struct DifferentialGetCommitMessage;

impl Method for DifferentialGetCommitMessage {
    const NAME: &'static str = "differential.getcommitmessage";
    type Params = CommitMessageRequest;
    type Response = String;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitMessageRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit: Option<CommitMessageEdit>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitMessageEdit {
    Edit,
    Create,
}
