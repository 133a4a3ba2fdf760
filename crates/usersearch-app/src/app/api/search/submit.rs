use salvo::{Depot, Request, Response, handler};
use serde::Serialize;
use usersearch_core::model::{RecordId, UserRecord};

use super::response::{request_context, write_error, write_json};
use crate::error::AppError;
use crate::service_handler::get_service_from_depot;

/// ## Summary
/// Submit response payload
#[derive(Debug, Serialize)]
pub(super) struct SubmitResponse {
    pub id: RecordId,
}

/// ## Summary
/// POST /search - store a user record and make it searchable.
///
/// ## Side Effects
/// - Creates a record in the store
/// - Indexes the record's projection
///
/// ## Errors
/// Returns HTTP 400 if the body is not a JSON user record, 500 if either
/// write fails (with `X-Record-Id` when only the index write failed), 503 if
/// the request was cancelled or timed out.
#[handler]
pub(super) async fn submit_user(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let service = match get_service_from_depot(depot) {
        Ok(service) => service,
        Err(e) => {
            write_error(res, &e);
            return;
        }
    };

    let record: UserRecord = match req.payload().await {
        Ok(body) => match serde_json::from_slice(body) {
            Ok(record) => record,
            Err(e) => {
                write_error(res, &AppError::BadRequest(format!("invalid user record: {e}")));
                return;
            }
        },
        Err(e) => {
            write_error(res, &AppError::BadRequest(format!("unreadable body: {e}")));
            return;
        }
    };

    let ctx = request_context(depot);
    let guard = ctx.cancel_on_drop();
    let result = service.submit(&ctx, &record).await;
    guard.disarm();

    match result {
        Ok(id) => {
            tracing::info!(record_id = %id, "User record submitted");
            write_json(res, &SubmitResponse { id });
        }
        Err(e) => write_error(res, &e.into()),
    }
}
