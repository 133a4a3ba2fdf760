use salvo::writing::Text;
use salvo::{Depot, Response, handler};

use super::response::{request_context, write_error};
use crate::service_handler::get_service_from_depot;

/// ## Summary
/// GET /search/putsample - bulk-load `search.sample_count` synthetic users.
///
/// ## Side Effects
/// - Creates the sample records in the store
/// - Indexes them in batches of `search.index_batch_size`
///
/// ## Errors
/// Returns HTTP 500 with the error message if any write fails, 503 if the
/// request was cancelled or timed out.
#[handler]
pub(super) async fn put_sample(depot: &mut Depot, res: &mut Response) {
    let service = match get_service_from_depot(depot) {
        Ok(service) => service,
        Err(e) => {
            write_error(res, &e);
            return;
        }
    };
    let count = service.settings().sample_count;

    let ctx = request_context(depot);
    let guard = ctx.cancel_on_drop();
    let result = service.submit_sample(&ctx, count).await;
    guard.disarm();

    match result {
        Ok(report) => {
            tracing::info!(
                stored = report.stored,
                indexed = report.indexed,
                "Sample users loaded"
            );
            res.render(Text::Plain("OK"));
        }
        Err(e) => write_error(res, &e.into()),
    }
}
