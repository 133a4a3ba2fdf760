pub mod api;

use salvo::Router;
use usersearch_core::config::Settings;
use usersearch_service::search::SearchService;

use crate::config::ConfigHandler;
use crate::service_handler::SearchServiceHandler;

/// ## Summary
/// Builds the complete application router: settings and service hoops in
/// front of every API route.
#[must_use]
pub fn app_router(settings: Settings, service: SearchService) -> Router {
    Router::new()
        .hoop(ConfigHandler { settings })
        .hoop(SearchServiceHandler { service })
        .push(api::routes())
}
