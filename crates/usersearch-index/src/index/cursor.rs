//! Cursor token codec.
//!
//! A token is URL-safe base64 (no padding) of `v1:{offset}:{fingerprint}`,
//! where the fingerprint pins the filter and sort the cursor was issued for.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use sha2::{Digest, Sha256};
use usersearch_core::model::{SearchCursor, SortDirection, SortField};

use crate::error::{IndexError, IndexResult};
use crate::index::filter::FilterExpression;

const CURSOR_VERSION: &str = "v1";

/// Hex characters of the digest kept in a token.
const FINGERPRINT_LEN: usize = 16;

/// ## Summary
/// Fingerprint of everything that must stay fixed while paging.
#[must_use]
pub fn fingerprint(
    filter: &FilterExpression,
    sort_field: SortField,
    sort_direction: SortDirection,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(filter.canonical().as_bytes());
    hasher.update(b"\n");
    hasher.update(sort_field.as_str().as_bytes());
    hasher.update(b"\n");
    hasher.update(sort_direction.as_str().as_bytes());
    let mut digest = hex::encode(hasher.finalize());
    digest.truncate(FINGERPRINT_LEN);
    digest
}

/// Issues a token resuming at `offset`.
#[must_use]
pub fn encode(offset: usize, fingerprint: &str) -> SearchCursor {
    let raw = format!("{CURSOR_VERSION}:{offset}:{fingerprint}");
    SearchCursor::new(URL_SAFE_NO_PAD.encode(raw))
}

/// ## Summary
/// Recovers the resume offset from a client-supplied token.
///
/// The exhaustion sentinel decodes to `None`.
///
/// ## Errors
/// Returns `IndexError::QueryInvalid` if the token does not decode, carries
/// an unknown version, or was issued for a different filter or sort.
pub fn decode(cursor: &SearchCursor, expected_fingerprint: &str) -> IndexResult<Option<usize>> {
    if cursor.is_exhausted() {
        return Ok(None);
    }

    let bytes = URL_SAFE_NO_PAD
        .decode(cursor.as_str())
        .map_err(|e| IndexError::QueryInvalid(format!("undecodable cursor: {e}")))?;
    let raw = String::from_utf8(bytes)
        .map_err(|e| IndexError::QueryInvalid(format!("undecodable cursor: {e}")))?;

    let mut parts = raw.splitn(3, ':');
    let (Some(version), Some(offset), Some(fingerprint)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(IndexError::QueryInvalid("malformed cursor".to_string()));
    };

    if version != CURSOR_VERSION {
        return Err(IndexError::QueryInvalid(format!(
            "unsupported cursor version: {version}"
        )));
    }
    if fingerprint != expected_fingerprint {
        return Err(IndexError::QueryInvalid(
            "cursor was issued for a different filter or sort".to_string(),
        ));
    }

    offset
        .parse::<usize>()
        .map(Some)
        .map_err(|e| IndexError::QueryInvalid(format!("malformed cursor offset: {e}")))
}
