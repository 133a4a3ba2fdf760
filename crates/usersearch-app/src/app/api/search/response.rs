use salvo::http::{HeaderValue, StatusCode};
use salvo::writing::Text;
use salvo::{Depot, Response};
use serde::Serialize;
use usersearch_core::constants::{JSON_CONTENT_TYPE, RECORD_ID_HEADER};
use usersearch_core::context::RequestContext;
use usersearch_service::error::ServiceError;

use crate::config::get_config_from_depot;
use crate::error::AppError;

/// ## Summary
/// Creates the context for one request, with the configured deadline.
pub(super) fn request_context(depot: &Depot) -> RequestContext {
    let ctx = RequestContext::new();
    match get_config_from_depot(depot)
        .ok()
        .and_then(|settings| settings.server.request_timeout())
    {
        Some(timeout) => ctx.with_timeout(timeout),
        None => ctx,
    }
}

/// ## Summary
/// Serializes `value` as the JSON response body.
///
/// ## Side Effects
/// Sets the status to 500 if serialization fails.
pub(super) fn write_json<T: Serialize>(res: &mut Response, value: &T) {
    let body = match serde_json::to_vec(value) {
        Ok(body) => body,
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize response");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
            res.render(Text::Plain(e.to_string()));
            return;
        }
    };

    #[expect(
        clippy::let_underscore_must_use,
        reason = "Header addition failure is non-fatal"
    )]
    let _ = res.add_header(
        "Content-Type",
        HeaderValue::from_static(JSON_CONTENT_TYPE),
        true,
    );
    #[expect(
        clippy::let_underscore_must_use,
        reason = "Body write failure is non-fatal"
    )]
    let _ = res.write_body(body);
}

/// ## Summary
/// Writes a plain-text error response with the status mapped from `err`.
///
/// A partially committed record additionally carries its id in the
/// `X-Record-Id` header.
pub(super) fn write_error(res: &mut Response, err: &AppError) {
    let status = err.status_code();

    if status.is_server_error() {
        tracing::error!(error = %err, status = status.as_u16(), "Request failed");
    } else {
        tracing::warn!(error = %err, status = status.as_u16(), "Request rejected");
    }

    let message = match err {
        AppError::ServiceError(ServiceError::PartiallyCommitted { id, source }) => {
            if let Ok(value) = HeaderValue::from_str(&id.to_string())
                && res.add_header(RECORD_ID_HEADER, value, true).is_err()
            {
                tracing::warn!(record_id = %id, "Failed to set record id header");
            }
            format!("record {id} was stored but is not yet searchable: {source}")
        }
        _ => err.to_string(),
    };

    res.status_code(status);
    res.render(Text::Plain(message));
}
