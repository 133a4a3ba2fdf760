use salvo::{Depot, Request, Response, handler};
use usersearch_core::model::RecordId;
use usersearch_service::error::ServiceError;

use super::response::{request_context, write_error, write_json};
use crate::service_handler::get_service_from_depot;

/// ## Summary
/// GET /search/{id} - fetch one stored user record.
///
/// ## Errors
/// Returns HTTP 404 if the id is malformed or no record has it, 500 for
/// store failures.
#[handler]
pub(super) async fn get_user(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let service = match get_service_from_depot(depot) {
        Ok(service) => service,
        Err(e) => {
            write_error(res, &e);
            return;
        }
    };

    let raw = req.param::<String>("id").unwrap_or_default();
    let Ok(id) = raw.parse::<RecordId>() else {
        write_error(res, &ServiceError::NotFound(format!("record {raw}")).into());
        return;
    };

    let ctx = request_context(depot);
    let guard = ctx.cancel_on_drop();
    let result = service.get_record(&ctx, id).await;
    guard.disarm();

    match result {
        Ok(record) => write_json(res, &record),
        Err(e) => write_error(res, &e.into()),
    }
}
