//! Wire types shared by many Conduit methods.
//!
//! # Design
//! Phabricator is loose with scalar types: timestamps arrive as integers in
//! most places and as numeric strings in some, and unset cursor fields are
//! `null`. These types absorb that so per-method structs can stay plain.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

/// Opaque Phabricator object identifier, e.g. `PHID-DREV-abc123`.
pub type Phid = String;

/// Seconds since the Unix epoch, as Conduit sends them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnixTimestamp(pub DateTime<Utc>);

impl UnixTimestamp {
    /// `None` if `secs` is outside chrono's representable range.
    pub fn from_secs(secs: i64) -> Option<Self> {
        DateTime::from_timestamp(secs, 0).map(Self)
    }

    pub fn as_secs(&self) -> i64 {
        self.0.timestamp()
    }
}

impl From<DateTime<Utc>> for UnixTimestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self(value)
    }
}

impl Serialize for UnixTimestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.as_secs())
    }
}

impl<'de> Deserialize<'de> for UnixTimestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TimestampVisitor)
    }
}

struct TimestampVisitor;

impl TimestampVisitor {
    fn secs<E: de::Error>(secs: i64) -> Result<UnixTimestamp, E> {
        UnixTimestamp::from_secs(secs)
            .ok_or_else(|| E::custom(format!("timestamp {secs} is out of range")))
    }
}

impl<'de> Visitor<'de> for TimestampVisitor {
    type Value = UnixTimestamp;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unix seconds as an integer or numeric string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Self::secs(v)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        let secs = i64::try_from(v).map_err(|_| E::custom(format!("timestamp {v} is out of range")))?;
        Self::secs(secs)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        let secs = v
            .trim()
            .parse::<i64>()
            .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))?;
        Self::secs(secs)
    }
}

/// Paging state returned by `*.search` methods and echoed back to page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCursor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
}

/// Identity header common to every `*.search` result row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchItem {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: String,
    pub phid: Phid,
}

/// Subscriber attachment shared by several `*.search` methods.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribersAttachment {
    #[serde(default, rename = "subscriberPHIDs")]
    pub subscriber_phids: Vec<Phid>,
    #[serde(default)]
    pub subscriber_count: u64,
    #[serde(default)]
    pub viewer_is_subscribed: bool,
}
