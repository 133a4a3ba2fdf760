mod app_specific;
mod search;

use salvo::Router;

// Re-export route constants from core
pub use usersearch_core::constants::{
    APP_ROUTE_COMPONENT, PUT_SAMPLE_ROUTE_COMPONENT, PUT_SAMPLE_ROUTE_PREFIX,
    SEARCH_ROUTE_COMPONENT, SEARCH_ROUTE_PREFIX,
};

/// ## Summary
/// Constructs the API router with the search endpoints and the
/// application-specific endpoints.
#[must_use]
pub fn routes() -> Router {
    Router::new()
        .push(search::routes())
        .push(app_specific::routes())
}
