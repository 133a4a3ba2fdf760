//! Construction of the store, the index and the search service from
//! settings.

use std::sync::Arc;

use anyhow::Context;
use usersearch_core::config::{IndexConfig, Settings, StoreBackend, StoreConfig};
use usersearch_db::db::connection::{create_pool, run_migrations};
use usersearch_db::db::{MemoryRecordStore, PgRecordStore, RecordStore};
use usersearch_index::index::{TantivyUserIndex, TextIndex};
use usersearch_service::search::SearchService;

/// ## Summary
/// Creates the configured record store.
///
/// ## Side Effects
/// For PostgreSQL, applies pending migrations and opens the connection pool.
///
/// ## Errors
/// Returns an error if the database is unreachable or a migration fails.
pub async fn build_store(config: &StoreConfig) -> anyhow::Result<Arc<dyn RecordStore>> {
    match config.backend {
        StoreBackend::Memory => {
            tracing::info!("Using in-memory record store");
            Ok(Arc::new(MemoryRecordStore::new()))
        }
        StoreBackend::Postgres => {
            let url = config
                .url
                .as_deref()
                .context("store.url is required for the postgres backend")?;
            run_migrations(url).await?;
            let pool = create_pool(url, u32::from(config.max_connections)).await?;
            tracing::info!("Using PostgreSQL record store");
            Ok(Arc::new(PgRecordStore::new(pool)))
        }
    }
}

/// ## Summary
/// Opens the configured text index: on disk when `index.path` is set,
/// otherwise in RAM.
///
/// ## Errors
/// Returns an error if the index directory cannot be created or opened.
pub fn build_index(config: &IndexConfig) -> anyhow::Result<Arc<dyn TextIndex>> {
    let index = match &config.path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Opening on-disk text index");
            TantivyUserIndex::open_or_create(path, config.writer_heap_bytes)?
        }
        None => {
            tracing::info!("Using in-memory text index");
            TantivyUserIndex::in_memory(config.writer_heap_bytes)?
        }
    };
    Ok(Arc::new(index))
}

/// ## Summary
/// Builds the search service for `settings`.
///
/// ## Errors
/// Returns an error if the store or the index cannot be created.
pub async fn build_service(settings: &Settings) -> anyhow::Result<SearchService> {
    if settings.store.backend == StoreBackend::Memory && settings.index.path.is_some() {
        tracing::warn!(
            "In-memory record store with an on-disk index: indexed documents will outlive their records"
        );
    }

    let store = build_store(&settings.store).await?;
    let index = build_index(&settings.index)?;
    Ok(SearchService::new(store, index, settings.search.clone()))
}
