//! The derived search projection of a [`UserRecord`](super::UserRecord).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// ## Summary
/// Denormalized projection stored in the text index under the record id.
///
/// Representation differs from the record: `mail` is one space-joined string,
/// `user_id` is stringified for exact matching, `comment` is rich text (raw
/// markup kept, tags stripped for indexing) and `field1`/`field2` are atomic
/// tokens. Serialized names match the index field names.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IndexDocument {
    #[serde(rename = "ID")]
    pub id: String,
    pub name: String,
    pub comment: String,
    pub visits: f64,
    pub last_visit: DateTime<Utc>,
    pub birthday: DateTime<Utc>,
    pub mail: String,
    #[serde(rename = "UserID")]
    pub user_id: String,
    pub field1: String,
    pub field2: String,
}

impl IndexDocument {
    /// Individual addresses of the space-joined `mail` field.
    pub fn mail_addresses(&self) -> impl Iterator<Item = &str> {
        self.mail.split_whitespace()
    }
}
