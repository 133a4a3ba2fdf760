#![allow(clippy::unused_async, clippy::expect_used, dead_code)]
//! Test helpers for integration tests.
//!
//! Provides utilities for:
//! - Creating a test Salvo service backed by an in-memory store and a RAM index
//! - Making HTTP requests
//! - Asserting on responses
//!
//! ## Isolation
//! Every call to `create_test_service` builds its own store and index, so
//! tests can run in parallel without sharing state.

use std::sync::Arc;

use salvo::http::header::HeaderName;
use salvo::http::{Method, ReqBody, StatusCode};
use salvo::prelude::*;
use salvo::test::{RequestBuilder, ResponseExt, TestClient};

use usersearch_test::app::app::app_router;
use usersearch_test::component::config::Settings;
use usersearch_test::component::db::{MemoryRecordStore, RecordStore};
use usersearch_test::component::index::{TantivyUserIndex, TextIndex};
use usersearch_test::component::search::SearchService;

pub use tracing;

/// Writer heap for test indexes; tantivy's minimum is 15 MB.
const TEST_WRITER_HEAP: usize = 15_000_000;

/// Test configuration - static struct instead of loading from file.
#[must_use]
pub fn test_config() -> Settings {
    let mut settings = Settings::default();
    settings.server.request_timeout_ms = 10_000;
    settings.index.writer_heap_bytes = TEST_WRITER_HEAP;
    settings.search.sample_count = 20;
    settings.search.index_batch_size = 7;
    settings.search.sample_concurrency = 4;
    settings
}

/// ## Summary
/// Creates a fresh test service with its own memory store and RAM index.
///
/// ## Panics
/// Panics if the index cannot be created.
#[expect(clippy::expect_used, reason = "Service creation failure is fatal")]
#[must_use]
pub fn create_test_service(settings: Settings) -> Service {
    let store: Arc<dyn RecordStore> = Arc::new(MemoryRecordStore::new());
    let index: Arc<dyn TextIndex> = Arc::new(
        TantivyUserIndex::in_memory(settings.index.writer_heap_bytes)
            .expect("RAM index should be created"),
    );
    create_test_service_with(settings, store, index)
}

/// Creates a test service over the given store and index.
#[must_use]
pub fn create_test_service_with(
    settings: Settings,
    store: Arc<dyn RecordStore>,
    index: Arc<dyn TextIndex>,
) -> Service {
    let service = SearchService::new(store, index, settings.search.clone());
    Service::new(Router::new().push(app_router(settings, service)))
}

/// Submits a user record and returns the assigned id.
///
/// ## Panics
/// Panics if the submit is not successful.
pub async fn submit_user(service: &Service, json: &str) -> String {
    let response = TestRequest::post("/search")
        .json_body(json)
        .send(service)
        .await
        .assert_status(StatusCode::OK);
    response.json()["id"]
        .as_str()
        .expect("id should be a string")
        .to_string()
}

/// Runs `GET /search?{query}` and returns the users and the next cursor.
///
/// ## Panics
/// Panics if the search is not successful.
pub async fn search_page(service: &Service, query: &str) -> (Vec<serde_json::Value>, String) {
    let path = if query.is_empty() {
        "/search".to_string()
    } else {
        format!("/search?{query}")
    };
    let body = TestRequest::get(&path)
        .send(service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    let users = body["Users"].as_array().cloned().expect("Users array");
    let cursor = body["Cursor"].as_str().expect("Cursor string").to_string();
    (users, cursor)
}

/// Test request builder for constructing HTTP requests.
pub struct TestRequest {
    method: Method,
    path: String,
    headers: Vec<(String, String)>,
    body: Option<Vec<u8>>,
}

impl TestRequest {
    /// Creates a new test request with the given method and path.
    #[must_use]
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Creates a new GET request.
    #[must_use]
    pub fn get(path: &str) -> Self {
        Self::new(Method::GET, path)
    }

    /// Creates a new POST request.
    #[must_use]
    pub fn post(path: &str) -> Self {
        Self::new(Method::POST, path)
    }

    /// Adds a header to the request.
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Sets the Content-Type header.
    #[must_use]
    pub fn content_type(self, content_type: &str) -> Self {
        self.header("Content-Type", content_type)
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets a JSON request body.
    #[must_use]
    pub fn json_body(self, json: &str) -> Self {
        self.content_type("application/json")
            .body(json.as_bytes().to_vec())
    }

    /// Sends the request to the test service and returns the response.
    ///
    /// ## Panics
    /// Panics if the request cannot be sent or the response cannot be read.
    pub async fn send(self, service: &Service) -> TestResponse {
        let url = format!("http://127.0.0.1:5800{}", self.path);

        let mut client = match self.method.as_str() {
            "GET" => TestClient::get(&url),
            "POST" => TestClient::post(&url),
            _ => RequestBuilder::new(&url, self.method.clone()),
        };

        for (name, value) in self.headers {
            if let Ok(header_name) = HeaderName::try_from(name.as_str()) {
                client = client.add_header(header_name, value, true);
            }
        }

        if let Some(body_bytes) = self.body {
            client = client.body(ReqBody::Once(body_bytes.into()));
        }

        let mut response = client.send(service).await;

        let status = response
            .status_code
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
            .collect();

        let body: Vec<u8> = response.take_bytes(None).await.unwrap_or_default().to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// Represents an HTTP test response for assertions.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Asserts that the response status matches the expected code.
    #[must_use]
    pub fn assert_status(self, expected: StatusCode) -> Self {
        assert_eq!(
            self.status,
            expected,
            "Expected status {expected} but got {}: {}",
            self.status,
            self.body_string()
        );
        self
    }

    /// Asserts that a header exists with the expected value.
    #[must_use]
    pub fn assert_header(self, name: &str, expected: &str) -> Self {
        let value = self.get_header(name);
        assert!(value.is_some(), "Header '{name}' not found in response");
        assert_eq!(
            value,
            Some(expected),
            "Header '{name}' expected '{expected}' but got '{value:?}'"
        );
        self
    }

    /// Asserts that a header is absent.
    #[must_use]
    pub fn assert_header_missing(self, name: &str) -> Self {
        assert!(
            self.get_header(name).is_none(),
            "Header '{name}' unexpectedly present"
        );
        self
    }

    /// Asserts that the response body contains the expected substring.
    #[must_use]
    pub fn assert_body_contains(self, expected: &str) -> Self {
        let body = self.body_string();
        assert!(
            body.contains(expected),
            "Expected body to contain '{expected}' but got:\n{body}"
        );
        self
    }

    /// Returns the body as a UTF-8 string.
    #[must_use]
    pub fn body_string(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Parses the body as JSON.
    ///
    /// ## Panics
    /// Panics if the body is not valid JSON.
    #[must_use]
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("Response body should be JSON")
    }

    /// Gets a header value by name (case-insensitive).
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Gets the Content-Type header value.
    #[must_use]
    pub fn get_content_type(&self) -> Option<&str> {
        self.get_header("Content-Type")
    }
}
