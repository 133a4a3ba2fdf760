#![allow(clippy::unused_async, unused_must_use)]
//! Tests for POST /search and GET /search/{id}.
//!
//! Verifies the dual write, lenient record bodies and the partially
//! committed outcome when the index rejects the write.

use std::sync::Arc;

use futures::future::BoxFuture;
use salvo::http::StatusCode;
use usersearch_test::component::context::RequestContext;
use usersearch_test::component::db::MemoryRecordStore;
use usersearch_test::component::index::error::{IndexError, IndexResult};
use usersearch_test::component::index::{IndexQuery, QueryPage, TantivyUserIndex, TextIndex};
use usersearch_test::component::model::IndexDocument;

use super::helpers::*;

/// Text index whose writes always fail; reads go to an empty RAM index.
struct UnavailableIndex(TantivyUserIndex);

impl TextIndex for UnavailableIndex {
    fn backend_name(&self) -> &'static str {
        "unavailable"
    }

    fn put<'a>(
        &'a self,
        _ctx: &'a RequestContext,
        _id: &'a str,
        _document: &'a IndexDocument,
    ) -> BoxFuture<'a, IndexResult<()>> {
        Box::pin(async { Err(IndexError::Unavailable("connection refused".to_string())) })
    }

    fn put_many<'a>(
        &'a self,
        _ctx: &'a RequestContext,
        _documents: &'a [IndexDocument],
    ) -> BoxFuture<'a, IndexResult<()>> {
        Box::pin(async { Err(IndexError::Unavailable("connection refused".to_string())) })
    }

    fn query<'a>(
        &'a self,
        ctx: &'a RequestContext,
        query: &'a IndexQuery,
    ) -> BoxFuture<'a, IndexResult<QueryPage>> {
        self.0.query(ctx, query)
    }

    fn count<'a>(&'a self, ctx: &'a RequestContext) -> BoxFuture<'a, IndexResult<u64>> {
        self.0.count(ctx)
    }
}

fn unavailable_index_service() -> salvo::Service {
    let settings = test_config();
    let index = TantivyUserIndex::in_memory(settings.index.writer_heap_bytes)
        .expect("RAM index should be created");
    create_test_service_with(
        settings,
        Arc::new(MemoryRecordStore::new()),
        Arc::new(UnavailableIndex(index)),
    )
}

/// ## Summary
/// Submit returns the new id and the record can be fetched by it.
#[test_log::test(tokio::test)]
async fn submit_returns_id_and_record_is_retrievable() {
    let service = create_test_service(test_config());

    let response = TestRequest::post("/search")
        .json_body(
            r#"{"name":"Ada","comment":"<p>first</p>","visits":3.5,"mail":["ada@x.com"],"userId":7,"birthday":"1990-01-05T00:00:00Z"}"#,
        )
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .assert_header("Content-Type", "application/json; charset=utf8");
    let id = response.json()["id"].as_str().expect("id").to_string();

    let record = TestRequest::get(&format!("/search/{id}"))
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(record["id"], id.as_str());
    assert_eq!(record["comment"], "<p>first</p>");
    assert_eq!(record["visits"], 3.5);
    assert_eq!(record["birthday"], "1990-01-05T00:00:00Z");
}

/// ## Summary
/// Every submit gets a distinct id, even for identical bodies.
#[test_log::test(tokio::test)]
async fn repeated_submits_get_distinct_ids() {
    let service = create_test_service(test_config());

    let first = submit_user(&service, r#"{"name":"Twin"}"#).await;
    let second = submit_user(&service, r#"{"name":"Twin"}"#).await;

    assert_ne!(first, second);
    let (users, _) = search_page(&service, "").await;
    assert_eq!(users.len(), 2);
}

/// ## Summary
/// A client-supplied id is ignored; the store assigns one.
#[test_log::test(tokio::test)]
async fn client_supplied_id_is_ignored() {
    let service = create_test_service(test_config());

    let id = submit_user(&service, r#"{"id":"9000","name":"Ada"}"#).await;

    assert_eq!(id, "1");
    TestRequest::get("/search/9000")
        .send(&service)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

/// ## Summary
/// The body is parsed as JSON regardless of the declared content type.
#[test_log::test(tokio::test)]
async fn body_without_json_content_type_is_accepted() {
    let service = create_test_service(test_config());

    TestRequest::post("/search")
        .content_type("text/plain")
        .body(r#"{"name":"Ada","userId":7}"#)
        .send(&service)
        .await
        .assert_status(StatusCode::OK);

    let (users, _) = search_page(&service, "userid=7").await;
    assert_eq!(users.len(), 1);
}

/// ## Summary
/// Bodies that are not user records are rejected before anything is written.
#[test_log::test(tokio::test)]
async fn malformed_bodies_are_bad_requests() {
    let service = create_test_service(test_config());

    TestRequest::post("/search")
        .json_body("not json")
        .send(&service)
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_body_contains("invalid user record");

    TestRequest::post("/search")
        .json_body(r#"{"userId":"seven"}"#)
        .send(&service)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    TestRequest::get("/search/1")
        .send(&service)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

/// ## Summary
/// When the index write fails after the record write, the record stays
/// retrievable by id but is absent from search.
#[test_log::test(tokio::test)]
async fn index_failure_leaves_record_retrievable_but_unsearchable() {
    let service = unavailable_index_service();

    TestRequest::post("/search")
        .json_body(r#"{"name":"Ada","mail":["ada@x.com"],"userId":7}"#)
        .send(&service)
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_header("X-Record-Id", "1")
        .assert_body_contains("not yet searchable");

    let record = TestRequest::get("/search/1")
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(record["name"], "Ada");

    let (users, cursor) = search_page(&service, "userid=7").await;
    assert!(users.is_empty());
    assert_eq!(cursor, "");
}

/// ## Summary
/// Unknown and malformed ids are both not found.
#[test_log::test(tokio::test)]
async fn unknown_record_ids_are_not_found() {
    let service = create_test_service(test_config());

    TestRequest::get("/search/12")
        .send(&service)
        .await
        .assert_status(StatusCode::NOT_FOUND)
        .assert_header_missing("X-Record-Id");

    TestRequest::get("/search/twelve")
        .send(&service)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
