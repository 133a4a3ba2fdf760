//! Dual-write path: record store first, then the text index.

use futures::{StreamExt, TryStreamExt, stream};
use usersearch_core::context::RequestContext;
use usersearch_core::model::{IndexDocument, RecordId, UserRecord};
use usersearch_index::index::build_index_document;

use super::SearchService;
use super::sample::SampleGenerator;
use crate::error::{ServiceError, ServiceResult};

/// Outcome of a complete sample load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleReport {
    pub stored: usize,
    pub indexed: usize,
}

impl SearchService {
    /// ## Summary
    /// Persists a record and then indexes its projection.
    ///
    /// ## Side Effects
    /// - Creates one record in the store
    /// - Upserts one document in the index under the new id
    ///
    /// ## Errors
    /// Returns the store error if the record could not be created; nothing is
    /// indexed in that case. Returns `ServiceError::PartiallyCommitted` if the
    /// record was created but the index write failed. The record is not
    /// removed again.
    #[tracing::instrument(skip_all, fields(request_id = %ctx.request_id()))]
    pub async fn submit(&self, ctx: &RequestContext, record: &UserRecord) -> ServiceResult<RecordId> {
        let id = self.store.create(ctx, record).await?;
        tracing::debug!(record_id = %id, "Record stored");

        let document = build_index_document(id, record);
        if let Err(source) = self.index.put(ctx, &document.id, &document).await {
            tracing::error!(
                record_id = %id,
                error = %source,
                "Record stored but index write failed"
            );
            return Err(ServiceError::PartiallyCommitted { id, source });
        }

        tracing::debug!(record_id = %id, "Record indexed");
        Ok(id)
    }

    /// ## Summary
    /// Generates `count` synthetic records, stores all of them, then indexes
    /// them in batches.
    ///
    /// ## Side Effects
    /// - Creates `count` records, up to `sample_concurrency` at a time
    /// - Commits `ceil(count / index_batch_size)` index batches
    ///
    /// ## Errors
    /// Returns the store error if any record write fails; records written
    /// before the failure remain and nothing is indexed. Returns
    /// `ServiceError::SampleIndexIncomplete` if an index batch fails; batches
    /// committed before it stay searchable.
    #[tracing::instrument(skip(self, ctx), fields(request_id = %ctx.request_id()))]
    pub async fn submit_sample(
        &self,
        ctx: &RequestContext,
        count: usize,
    ) -> ServiceResult<SampleReport> {
        let records = SampleGenerator::from_entropy(chrono::Utc::now()).generate(count);

        let concurrency = self.settings.sample_concurrency.max(1);
        let stored: Vec<(RecordId, UserRecord)> = stream::iter(records)
            .map(|record| async move {
                let id = self.store.create(ctx, &record).await?;
                Ok::<_, ServiceError>((id, record))
            })
            .buffered(concurrency)
            .try_collect()
            .await?;
        tracing::info!(stored = stored.len(), "Sample records stored");

        let documents: Vec<IndexDocument> = stored
            .iter()
            .map(|(id, record)| build_index_document(*id, record))
            .collect();

        let mut indexed = 0;
        for batch in documents.chunks(self.settings.index_batch_size.max(1)) {
            if let Err(source) = self.index.put_many(ctx, batch).await {
                tracing::error!(
                    stored = stored.len(),
                    indexed,
                    error = %source,
                    "Sample index batch failed"
                );
                return Err(ServiceError::SampleIndexIncomplete {
                    stored: stored.len(),
                    indexed,
                    source,
                });
            }
            indexed += batch.len();
            tracing::debug!(indexed, "Sample index batch committed");
        }

        tracing::info!(stored = stored.len(), indexed, "Sample load complete");
        Ok(SampleReport {
            stored: stored.len(),
            indexed,
        })
    }
}
