use std::future::Future;

use futures::future::BoxFuture;
use usersearch_core::context::RequestContext;
use usersearch_core::error::CoreError;
use usersearch_core::model::{RecordId, UserRecord};

use crate::error::{DbError, DbResult};

pub mod connection;
pub mod map;
pub mod memory;
pub mod pg_store;
pub mod schema;

pub use memory::MemoryRecordStore;
pub use pg_store::PgRecordStore;

/// ## Summary
/// Create/read access to the primary record store.
///
/// Identifiers are assigned by the store. Implementations must honour the
/// request context: a cancelled or expired context fails before the backend
/// is touched.
pub trait RecordStore: Send + Sync {
    /// Short backend name for logs.
    fn backend_name(&self) -> &'static str;

    /// Persists `record` and returns its newly assigned identifier. Any `id`
    /// already present on `record` is ignored.
    fn create<'a>(
        &'a self,
        ctx: &'a RequestContext,
        record: &'a UserRecord,
    ) -> BoxFuture<'a, DbResult<RecordId>>;

    /// Fetches records in exactly the order of `ids`. An identifier that
    /// resolves to nothing yields `None` at its position; the call fails as a
    /// whole or not at all.
    fn get_many<'a>(
        &'a self,
        ctx: &'a RequestContext,
        ids: &'a [RecordId],
    ) -> BoxFuture<'a, DbResult<Vec<Option<UserRecord>>>>;

    fn count<'a>(&'a self, ctx: &'a RequestContext) -> BoxFuture<'a, DbResult<u64>>;

    /// Direct lookup of a single record.
    fn get<'a>(
        &'a self,
        ctx: &'a RequestContext,
        id: RecordId,
    ) -> BoxFuture<'a, DbResult<Option<UserRecord>>> {
        Box::pin(async move {
            let ids = [id];
            let mut found = self.get_many(ctx, &ids).await?;
            Ok(found.pop().flatten())
        })
    }
}

/// ## Summary
/// Runs a store operation under the request's cancellation flag and deadline.
///
/// ## Errors
/// Returns `CoreError::Cancelled`/`DeadlineExceeded` wrapped in `DbError`, or
/// the operation's own error.
pub(crate) async fn bounded<T, F>(ctx: &RequestContext, operation: F) -> DbResult<T>
where
    F: Future<Output = DbResult<T>>,
{
    ctx.check()?;
    match ctx.remaining() {
        Some(left) => tokio::time::timeout(left, operation)
            .await
            .map_err(|_elapsed| DbError::CoreError(CoreError::DeadlineExceeded))?,
        None => operation.await,
    }
}
