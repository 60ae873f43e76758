//! `harbormaster.*` methods.

use serde::{Deserialize, Serialize};

use crate::method::Method;
use crate::types::{Phid, SearchCursor, SearchItem, UnixTimestamp};

pub struct HarbormasterBuildableSearch;

impl Method for HarbormasterBuildableSearch {
    const NAME: &'static str = "harbormaster.buildable.search";
    type Params = BuildableSearchRequest;
    type Response = BuildableSearchResponse;
}

/// Values accepted by the `statuses` constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildableStatus {
    Preparing,
    Building,
    Passed,
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildableSearchRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<BuildableSearchConstraints>,
    #[serde(flatten)]
    pub cursor: SearchCursor,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildableSearchConstraints {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ids: Vec<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub phids: Vec<Phid>,
    #[serde(default, rename = "objectPHIDs", skip_serializing_if = "Vec::is_empty")]
    pub object_phids: Vec<Phid>,
    #[serde(default, rename = "containerPHIDs", skip_serializing_if = "Vec::is_empty")]
    pub container_phids: Vec<Phid>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub statuses: Vec<BuildableStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildableSearchResponse {
    #[serde(default)]
    pub data: Vec<BuildableItem>,
    #[serde(default)]
    pub cursor: SearchCursor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildableItem {
    #[serde(flatten)]
    pub item: SearchItem,
    pub fields: BuildableFields,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildableFields {
    #[serde(rename = "objectPHID")]
    pub object_phid: Phid,
    #[serde(rename = "containerPHID")]
    pub container_phid: Option<Phid>,
    pub buildable_status: BuildableStatusField,
    #[serde(default)]
    pub is_manual: bool,
    #[serde(default)]
    pub uri: String,
    pub date_created: UnixTimestamp,
    pub date_modified: UnixTimestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildableStatusField {
    pub value: BuildableStatus,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn constraints_serialize_statuses_lowercase() {
        let req = BuildableSearchRequest {
            constraints: Some(BuildableSearchConstraints {
                ids: vec![54057],
                statuses: vec![BuildableStatus::Failed, BuildableStatus::Passed],
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(req).unwrap(),
            json!({"constraints": {"ids": [54057], "statuses": ["failed", "passed"]}})
        );
    }

    #[test]
    fn item_decodes_and_ignores_unknown_fields() {
        let item: BuildableItem = serde_json::from_value(json!({
            "id": 54057,
            "type": "HMBB",
            "phid": "PHID-HMBB-6tceawkrkt55btokp7es",
            "fields": {
                "objectPHID": "PHID-DIFF-7grzvaqb24vaorwgj6f6",
                "containerPHID": "PHID-DREV-ea4xglpfvktonm7cyzmq",
                "buildableStatus": {"value": "failed"},
                "isManual": false,
                "uri": "https://www.example.com/B54057",
                "dateCreated": 1419993553,
                "dateModified": 1419994281,
                "policy": {"view": "users", "edit": "users"}
            },
            "attachments": {}
        }))
        .unwrap();
        assert_eq!(item.item.kind, "HMBB");
        assert_eq!(item.fields.buildable_status.value, BuildableStatus::Failed);
        assert_eq!(item.fields.date_modified.as_secs(), 1419994281);
    }
}
