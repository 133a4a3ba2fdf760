//! DB <-> domain mapping helpers.

use usersearch_core::model::{RecordId, UserRecord};

use crate::model::user::{NewSearchUser, SearchUser};

/// ## Summary
/// Builds an insertable row from a record. The record's `id` is ignored.
#[must_use]
pub fn new_search_user(record: &UserRecord) -> NewSearchUser {
    NewSearchUser {
        name: record.name.clone(),
        comment: record.comment.clone(),
        visits: record.visits,
        last_visit: record.last_visit,
        birthday: record.birthday,
        mail: record.mail.clone(),
        user_id: record.user_id,
        field1: record.field1.clone(),
        field2: record.field2.clone(),
    }
}

impl From<SearchUser> for UserRecord {
    fn from(row: SearchUser) -> Self {
        Self {
            id: Some(RecordId::new(row.id)),
            name: row.name,
            comment: row.comment,
            visits: row.visits,
            last_visit: row.last_visit,
            birthday: row.birthday,
            mail: row.mail,
            user_id: row.user_id,
            field1: row.field1,
            field2: row.field2,
        }
    }
}
