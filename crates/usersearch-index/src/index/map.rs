//! Record <-> index document mapping helpers.

use usersearch_core::model::{IndexDocument, RecordId, UserRecord};

/// ## Summary
/// Builds the `IndexDocument` stored under `id` for a record.
///
/// Mail addresses are space-joined, the user id is stringified and the
/// comment is kept verbatim; tag stripping happens when the document is
/// written to the index.
#[must_use]
pub fn build_index_document(id: RecordId, record: &UserRecord) -> IndexDocument {
    IndexDocument {
        id: id.to_string(),
        name: record.name.clone(),
        comment: record.comment.clone(),
        visits: record.visits,
        last_visit: record.last_visit,
        birthday: record.birthday,
        mail: record
            .mail
            .iter()
            .map(|address| address.trim())
            .filter(|address| !address.is_empty())
            .collect::<Vec<_>>()
            .join(" "),
        user_id: record.user_id.to_string(),
        field1: record.field1.clone(),
        field2: record.field2.clone(),
    }
}

/// Removes markup tags and collapses whitespace.
#[must_use]
pub fn strip_html_tags(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut in_tag = false;

    for c in html.chars() {
        match c {
            '<' => {
                in_tag = true;
                result.push(' ');
            }
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    result.split_whitespace().collect::<Vec<_>>().join(" ")
}
