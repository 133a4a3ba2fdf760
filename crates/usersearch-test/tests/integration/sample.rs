#![allow(clippy::unused_async, clippy::expect_used, unused_must_use)]
//! Tests for GET /search/putsample.
//!
//! Verifies the bulk load stores and indexes every generated user.

use std::collections::HashSet;
use std::sync::Arc;

use salvo::http::StatusCode;
use usersearch_test::component::context::RequestContext;
use usersearch_test::component::db::{MemoryRecordStore, RecordStore};
use usersearch_test::component::index::{TantivyUserIndex, TextIndex};

use super::helpers::*;

/// Walks every page of `GET /search?{query}` and returns all users.
async fn collect_all(service: &salvo::Service, query: &str) -> Vec<serde_json::Value> {
    let mut all = Vec::new();
    let (mut users, mut cursor) = search_page(service, query).await;
    loop {
        all.append(&mut users);
        if cursor.is_empty() {
            return all;
        }
        let next = if query.is_empty() {
            format!("cursor={cursor}")
        } else {
            format!("{query}&cursor={cursor}")
        };
        (users, cursor) = search_page(service, &next).await;
    }
}

/// ## Summary
/// A sample load of N users yields N distinct ids, all searchable.
#[test_log::test(tokio::test)]
async fn sample_load_stores_and_indexes_every_user() {
    let settings = test_config();
    let count = settings.search.sample_count;
    let store = Arc::new(MemoryRecordStore::new());
    let index = Arc::new(
        TantivyUserIndex::in_memory(settings.index.writer_heap_bytes).expect("RAM index"),
    );
    let service = create_test_service_with(settings, store.clone(), index.clone());

    TestRequest::get("/search/putsample")
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .assert_body_contains("OK");

    let ctx = RequestContext::new();
    let expected = u64::try_from(count).expect("small count");
    assert_eq!(store.count(&ctx).await.expect("store count"), expected);
    assert_eq!(index.count(&ctx).await.expect("index count"), expected);

    let users = collect_all(&service, "").await;
    assert_eq!(users.len(), count);

    let ids: HashSet<String> = users
        .iter()
        .map(|user| user["id"].as_str().expect("id").to_string())
        .collect();
    assert_eq!(ids.len(), count);

    for id in &ids {
        TestRequest::get(&format!("/search/{id}"))
            .send(&service)
            .await
            .assert_status(StatusCode::OK);
    }
}

/// ## Summary
/// Sample users follow the generated layout and are found by their shared
/// mail addresses.
#[test_log::test(tokio::test)]
async fn sample_users_are_found_by_mail() {
    let service = create_test_service(test_config());

    TestRequest::get("/search/putsample")
        .send(&service)
        .await
        .assert_status(StatusCode::OK);

    // Users 1..=20 rotate through three mail pairs; mail2 appears in the
    // first two pairs.
    let with_mail2 = collect_all(&service, "mail=mail2@sample.com").await;
    assert_eq!(with_mail2.len(), 14);

    let with_mail5 = collect_all(&service, "mail=mail5@sample.com").await;
    assert_eq!(with_mail5.len(), 6);

    let (users, _) = search_page(&service, "userid=3").await;
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["name"], "Sample User3");
    assert_eq!(users[0]["field1"], "HOGE3");
    assert_eq!(users[0]["comment"], "<p>Sample Comment3</p>");
}

/// ## Summary
/// Loading twice appends a second batch with fresh ids.
#[test_log::test(tokio::test)]
async fn repeated_sample_loads_append() {
    let settings = test_config();
    let count = settings.search.sample_count;
    let service = create_test_service(settings);

    for _ in 0..2 {
        TestRequest::get("/search/putsample")
            .send(&service)
            .await
            .assert_status(StatusCode::OK);
    }

    let users = collect_all(&service, "").await;
    assert_eq!(users.len(), count * 2);

    let (users, _) = search_page(&service, "userid=1").await;
    assert_eq!(users.len(), 2);
    assert_ne!(users[0]["id"], users[1]["id"]);
}
