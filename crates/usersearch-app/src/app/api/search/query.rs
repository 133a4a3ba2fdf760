use salvo::http::HeaderValue;
use salvo::{Depot, Request, Response, handler};
use serde::Serialize;
use usersearch_core::constants::RESPONSE_MODE_HEADER;
use usersearch_core::model::{FilterField, SearchCursor};
use usersearch_service::search::{SearchFilters, SearchUsers};

use super::response::{request_context, write_error, write_json};
use crate::service_handler::get_service_from_depot;

/// Query parameter carrying a textual filter expression.
const EXPRESSION_PARAM: &str = "q";
const CURSOR_PARAM: &str = "cursor";

/// ## Summary
/// Body of a search response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct SearchResponse {
    pub users: SearchUsers,
    pub cursor: SearchCursor,
}

/// ## Summary
/// GET /search - one page of users matching the query parameters.
///
/// Each of `mail`, `userid`, `name`, `field1` and `field2` adds an
/// exact-match filter when enabled in settings; `q` adds a filter expression
/// and `cursor` continues a previous page.
///
/// ## Errors
/// Returns HTTP 400 for an invalid expression or a foreign cursor, 503 if
/// the request was cancelled or timed out, 500 for backend failures.
#[handler]
pub(super) async fn search_users(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let service = match get_service_from_depot(depot) {
        Ok(service) => service,
        Err(e) => {
            write_error(res, &e);
            return;
        }
    };

    let mut filters = SearchFilters::new();
    for field in FilterField::ALL {
        if let Some(value) = req.query::<String>(field.param_name()) {
            filters = filters.with(field, value);
        }
    }
    if let Some(expression) = req.query::<String>(EXPRESSION_PARAM) {
        filters = filters.with_expression(expression);
    }
    let cursor = SearchCursor::from_param(req.query::<String>(CURSOR_PARAM).as_deref());

    let ctx = request_context(depot);
    let guard = ctx.cancel_on_drop();
    let result = service.search(&ctx, &filters, cursor).await;
    guard.disarm();

    match result {
        Ok(page) => {
            let mode = HeaderValue::from_static(page.users.mode().as_str());
            if res.add_header(RESPONSE_MODE_HEADER, mode, true).is_err() {
                tracing::warn!("Failed to set response mode header");
            }
            write_json(
                res,
                &SearchResponse {
                    users: page.users,
                    cursor: page.cursor,
                },
            );
        }
        Err(e) => write_error(res, &e.into()),
    }
}
