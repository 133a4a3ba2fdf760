use salvo::async_trait;
use usersearch_core::error::CoreError;
use usersearch_service::search::SearchService;

use crate::error::AppResult;

/// Injects the shared `SearchService` into every request's depot.
pub struct SearchServiceHandler {
    pub service: SearchService,
}

#[async_trait]
impl salvo::Handler for SearchServiceHandler {
    #[tracing::instrument(skip(self, _req, depot, _res, _ctrl))]
    async fn handle(
        &self,
        _req: &mut salvo::Request,
        depot: &mut salvo::Depot,
        _res: &mut salvo::Response,
        _ctrl: &mut salvo::FlowCtrl,
    ) {
        depot.inject(self.service.clone());
    }
}

/// ## Summary
/// Retrieves the search service from the depot.
///
/// ## Errors
/// Returns an error if the search service is not found in the depot.
pub fn get_service_from_depot(depot: &salvo::Depot) -> AppResult<SearchService> {
    depot
        .obtain::<SearchService>()
        .cloned()
        .map_err(|_err| CoreError::InvariantViolation("Search service not found in depot").into())
}
