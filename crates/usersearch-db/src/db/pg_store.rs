//! PostgreSQL-backed record store.

use std::collections::HashMap;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use futures::future::BoxFuture;
use usersearch_core::context::RequestContext;
use usersearch_core::model::{RecordId, UserRecord};

use crate::db::connection::DbPool;
use crate::db::map::new_search_user;
use crate::db::{RecordStore, bounded, schema};
use crate::error::{DbError, DbResult};
use crate::model::user::SearchUser;

/// Record store over a bb8 pool of async PostgreSQL connections.
#[derive(Clone)]
pub struct PgRecordStore {
    pool: DbPool,
}

impl PgRecordStore {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl RecordStore for PgRecordStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    /// ## Summary
    /// Inserts one row and returns its generated id.
    ///
    /// The deadline only bounds admission and connection checkout. Once the
    /// insert is sent it runs to completion, so a row that commits is always
    /// reported with its id.
    ///
    /// ## Errors
    /// Returns `CoreError::Cancelled`/`DeadlineExceeded` if the request is
    /// over before the insert starts, or the insert's own error.
    #[tracing::instrument(skip_all, fields(request_id = %ctx.request_id()))]
    fn create<'a>(
        &'a self,
        ctx: &'a RequestContext,
        record: &'a UserRecord,
    ) -> BoxFuture<'a, DbResult<RecordId>> {
        Box::pin(async move {
            let mut conn =
                bounded(ctx, async { self.pool.get().await.map_err(DbError::from) }).await?;
            let id = diesel::insert_into(schema::search_user::table)
                .values(&new_search_user(record))
                .returning(schema::search_user::id)
                .get_result::<i64>(&mut conn)
                .await?;

            tracing::debug!(record_id = id, "Inserted user record");
            Ok(RecordId::new(id))
        })
    }

    #[tracing::instrument(skip_all, fields(request_id = %ctx.request_id(), count = ids.len()))]
    fn get_many<'a>(
        &'a self,
        ctx: &'a RequestContext,
        ids: &'a [RecordId],
    ) -> BoxFuture<'a, DbResult<Vec<Option<UserRecord>>>> {
        Box::pin(bounded(ctx, async move {
            if ids.is_empty() {
                return Ok(Vec::new());
            }

            let raw: Vec<i64> = ids.iter().map(|id| id.get()).collect();
            let mut conn = self.pool.get().await?;
            let rows = schema::search_user::table
                .filter(schema::search_user::id.eq_any(raw))
                .select(SearchUser::as_select())
                .load::<SearchUser>(&mut conn)
                .await
                .map_err(|e| match DbError::from(e) {
                    // A batch read that cannot complete is an availability
                    // failure as far as callers are concerned.
                    DbError::Rejected(msg) => DbError::Unavailable(msg),
                    other => other,
                })?;

            let by_id: HashMap<i64, SearchUser> =
                rows.into_iter().map(|row| (row.id, row)).collect();

            Ok(ids
                .iter()
                .map(|id| by_id.get(&id.get()).cloned().map(UserRecord::from))
                .collect())
        }))
    }

    fn count<'a>(&'a self, ctx: &'a RequestContext) -> BoxFuture<'a, DbResult<u64>> {
        Box::pin(bounded(ctx, async move {
            let mut conn = self.pool.get().await?;
            let total = schema::search_user::table
                .count()
                .get_result::<i64>(&mut conn)
                .await?;
            Ok(u64::try_from(total).unwrap_or_default())
        }))
    }
}
