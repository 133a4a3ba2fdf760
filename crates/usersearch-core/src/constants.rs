/// Route component constants shared across crates
pub const SEARCH_ROUTE_COMPONENT: &str = "search";
pub const SEARCH_ROUTE_PREFIX: &str = const_str::concat!("/", SEARCH_ROUTE_COMPONENT);

pub const PUT_SAMPLE_ROUTE_COMPONENT: &str = "putsample";
pub const PUT_SAMPLE_ROUTE_PREFIX: &str =
    const_str::concat!(SEARCH_ROUTE_PREFIX, "/", PUT_SAMPLE_ROUTE_COMPONENT);

pub const APP_ROUTE_COMPONENT: &str = "app";

/// Content type of every JSON response body.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf8";

/// Advertises whether `Users` holds full records or index projections.
pub const RESPONSE_MODE_HEADER: &str = "x-search-response-mode";

/// Carries the id of a record that was stored but could not be indexed.
pub const RECORD_ID_HEADER: &str = "x-record-id";
