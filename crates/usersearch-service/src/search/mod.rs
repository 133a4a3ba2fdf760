//! Search service: wires the record store and the text index together.

use std::sync::Arc;

use usersearch_core::config::SearchConfig;
use usersearch_db::db::RecordStore;
use usersearch_index::index::TextIndex;

pub mod query;
pub mod sample;
pub mod submit;

pub use query::{SearchFilters, SearchPage, SearchUsers};
pub use sample::SampleGenerator;
pub use submit::SampleReport;

/// ## Summary
/// Shared entry point for the write path and the read path.
///
/// Cheap to clone; the store and index are shared and the settings are
/// immutable after construction.
#[derive(Clone)]
pub struct SearchService {
    store: Arc<dyn RecordStore>,
    index: Arc<dyn TextIndex>,
    settings: Arc<SearchConfig>,
}

impl std::fmt::Debug for SearchService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchService")
            .field("store", &self.store.backend_name())
            .field("index", &self.index.backend_name())
            .field("settings", &self.settings)
            .finish()
    }
}

impl SearchService {
    #[must_use]
    pub fn new(
        store: Arc<dyn RecordStore>,
        index: Arc<dyn TextIndex>,
        settings: SearchConfig,
    ) -> Self {
        Self {
            store,
            index,
            settings: Arc::new(settings),
        }
    }

    #[must_use]
    pub fn settings(&self) -> &SearchConfig {
        &self.settings
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    #[must_use]
    pub fn index(&self) -> &Arc<dyn TextIndex> {
        &self.index
    }
}
