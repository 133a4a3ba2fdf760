#![allow(clippy::unused_async, unused_must_use)]
//! Tests for cursor pagination on GET /search.
//!
//! Verifies complete, ordered enumeration, repeatable pages and cursor
//! validation.

use std::collections::HashSet;

use salvo::http::StatusCode;
use usersearch_test::component::index::{FilterExpression, IndexQuery, cursor};
use usersearch_test::component::model::{SortDirection, SortField};

use super::helpers::*;

/// Submits users whose birthdays are `day` days into January 1990, in the
/// given order.
async fn submit_birthdays(service: &salvo::Service, days: &[u32], mail: &str) {
    for (i, day) in days.iter().enumerate() {
        let json = format!(
            r#"{{"name":"User{i}","mail":["{mail}"],"userId":{i},"birthday":"1990-01-{day:02}T00:00:00Z"}}"#
        );
        submit_user(service, &json).await;
    }
}

fn birthday(user: &serde_json::Value) -> String {
    user["birthday"].as_str().expect("birthday").to_string()
}

/// ## Summary
/// Following cursors visits every match exactly once in birthday order and
/// ends with the empty cursor.
#[test_log::test(tokio::test)]
async fn cursors_enumerate_all_matches_in_birthday_order() {
    let mut settings = test_config();
    settings.search.page_size = 3;
    let service = create_test_service(settings);
    submit_birthdays(&service, &[9, 2, 7, 4, 1, 8, 3, 6, 5, 10], "p@x.com").await;
    submit_birthdays(&service, &[11, 12], "other@x.com").await;

    let mut seen = Vec::new();
    let mut pages = 0;
    let (mut users, mut cursor) = search_page(&service, "mail=p@x.com").await;
    loop {
        pages += 1;
        assert!(users.len() <= 3);
        seen.extend(users.iter().map(birthday));
        if cursor.is_empty() {
            break;
        }
        (users, cursor) = search_page(&service, &format!("mail=p@x.com&cursor={cursor}")).await;
    }

    assert_eq!(seen.len(), 10);
    assert_eq!(seen.iter().collect::<HashSet<_>>().len(), 10);
    let mut sorted = seen.clone();
    sorted.sort();
    assert_eq!(seen, sorted);
    assert!((4..=5).contains(&pages));
}

/// ## Summary
/// Descending sort comes from settings.
#[test_log::test(tokio::test)]
async fn descending_sort_is_configurable() {
    let mut settings = test_config();
    settings.search.sort_direction = SortDirection::Desc;
    let service = create_test_service(settings);
    submit_birthdays(&service, &[3, 1, 2], "d@x.com").await;

    let (users, cursor) = search_page(&service, "").await;
    let days: Vec<String> = users.iter().map(birthday).collect();

    assert_eq!(
        days,
        vec![
            "1990-01-03T00:00:00Z",
            "1990-01-02T00:00:00Z",
            "1990-01-01T00:00:00Z"
        ]
    );
    assert_eq!(cursor, "");
}

/// ## Summary
/// Repeating a request with the same cursor returns the same page.
#[test_log::test(tokio::test)]
async fn same_cursor_returns_same_page() {
    let mut settings = test_config();
    settings.search.page_size = 2;
    let service = create_test_service(settings);
    submit_birthdays(&service, &[5, 4, 3, 2, 1], "r@x.com").await;

    let (_, cursor) = search_page(&service, "").await;
    assert!(!cursor.is_empty());

    let first = search_page(&service, &format!("cursor={cursor}")).await;
    let second = search_page(&service, &format!("cursor={cursor}")).await;
    assert_eq!(first, second);
    assert_eq!(first.0.len(), 2);
}

/// ## Summary
/// A cursor is only valid for the filter that issued it.
#[test_log::test(tokio::test)]
async fn cursor_from_another_filter_is_rejected() {
    let mut settings = test_config();
    settings.search.page_size = 1;
    let service = create_test_service(settings);
    submit_birthdays(&service, &[1, 2], "c@x.com").await;

    let (_, cursor) = search_page(&service, "").await;
    assert!(!cursor.is_empty());

    TestRequest::get(&format!("/search?mail=c@x.com&cursor={cursor}"))
        .send(&service)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    TestRequest::get("/search?cursor=%21%21%21")
        .send(&service)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

/// ## Summary
/// An empty result is an empty page with the empty cursor, not an error.
#[test_log::test(tokio::test)]
async fn empty_index_returns_exhausted_page() {
    let service = create_test_service(test_config());

    let (users, cursor) = search_page(&service, "").await;

    assert!(users.is_empty());
    assert_eq!(cursor, "");
}

/// ## Summary
/// A well-formed cursor pointing far past the last match ends the listing
/// instead of failing.
#[test_log::test(tokio::test)]
async fn cursor_beyond_last_match_returns_empty_page() {
    let service = create_test_service(test_config());
    submit_birthdays(&service, &[1, 2, 3], "far@x.com").await;

    let fingerprint = IndexQuery::new(FilterExpression::match_all(), 1)
        .sorted_by(SortField::Birthday, SortDirection::Asc)
        .fingerprint();
    for offset in [3, 10_000_000_000_000, usize::MAX] {
        let forged = cursor::encode(offset, &fingerprint);
        let (users, next) = search_page(&service, &format!("cursor={forged}")).await;
        assert!(users.is_empty(), "offset {offset}");
        assert_eq!(next, "", "offset {offset}");
    }
}
