use thiserror::Error;
use usersearch_core::error::CoreError;
use usersearch_core::model::RecordId;
use usersearch_db::error::DbError;
use usersearch_index::error::IndexError;

/// Service layer errors - combines all error types
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    DatabaseError(#[from] DbError),

    #[error(transparent)]
    IndexError(#[from] IndexError),

    #[error(transparent)]
    CoreError(#[from] CoreError),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The record was stored but its index document was not written. The
    /// record stays in the store; it is retrievable by id but not searchable.
    #[error("Record {id} was stored but is not searchable: {source}")]
    PartiallyCommitted { id: RecordId, source: IndexError },

    /// Every sample record was stored but only the first `indexed` documents
    /// were committed to the index.
    #[error("Stored {stored} sample records but indexed only {indexed}: {source}")]
    SampleIndexIncomplete {
        stored: usize,
        indexed: usize,
        source: IndexError,
    },
}

impl ServiceError {
    /// The request was cancelled or ran out of time.
    #[must_use]
    pub fn is_interrupted(&self) -> bool {
        let core = match self {
            Self::CoreError(e)
            | Self::DatabaseError(DbError::CoreError(e))
            | Self::IndexError(IndexError::CoreError(e)) => e,
            _ => return false,
        };
        matches!(core, CoreError::Cancelled | CoreError::DeadlineExceeded)
    }

    /// The caller supplied an unusable filter or cursor.
    #[must_use]
    pub fn is_query_invalid(&self) -> bool {
        matches!(self, Self::IndexError(e) if e.is_query_invalid())
    }
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
