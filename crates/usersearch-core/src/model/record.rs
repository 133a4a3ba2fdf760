//! The primary user record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// ## Summary
/// Store-assigned record identifier.
///
/// Opaque to clients: it is rendered and accepted as a decimal string and
/// carries no meaning beyond identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(i64);

impl RecordId {
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RecordId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|e| CoreError::ParseError(format!("invalid record id {s:?}: {e}")))
    }
}

impl Serialize for RecordId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// ## Summary
/// A user record as persisted in the record store.
///
/// Every field except `id` is optional on input and defaults to its empty
/// value, so partial submissions are accepted. `id` is assigned by the store
/// and is never read from client input.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserRecord {
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub name: String,
    /// Free text, may contain markup; stored verbatim.
    pub comment: String,
    pub visits: f64,
    pub last_visit: DateTime<Utc>,
    pub birthday: DateTime<Utc>,
    /// Display order is preserved; search treats the addresses as a set.
    pub mail: Vec<String>,
    pub user_id: i64,
    pub field1: String,
    pub field2: String,
}

impl UserRecord {
    #[must_use]
    pub fn with_id(mut self, id: RecordId) -> Self {
        self.id = Some(id);
        self
    }
}
