use thiserror::Error;

/// Text index errors
#[derive(Error, Debug)]
pub enum IndexError {
    /// The index could not service the request (I/O failure, writer lost,
    /// background task failure).
    #[error("Text index unavailable: {0}")]
    Unavailable(String),

    /// The index refused the document or the query against its schema.
    #[error("Text index rejected the request: {0}")]
    Rejected(String),

    /// Filter syntax, unknown fields or an unusable cursor.
    #[error("Invalid query: {0}")]
    QueryInvalid(String),

    #[error(transparent)]
    CoreError(#[from] usersearch_core::error::CoreError),
}

impl IndexError {
    #[must_use]
    pub fn is_query_invalid(&self) -> bool {
        matches!(self, Self::QueryInvalid(_))
    }
}

impl From<tantivy::TantivyError> for IndexError {
    fn from(err: tantivy::TantivyError) -> Self {
        use tantivy::TantivyError;

        match &err {
            TantivyError::FieldNotFound(_)
            | TantivyError::InvalidArgument(_)
            | TantivyError::SchemaError(_) => Self::Rejected(err.to_string()),
            _ => Self::Unavailable(err.to_string()),
        }
    }
}

impl From<tokio::task::JoinError> for IndexError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Unavailable(format!("index task failed: {err}"))
    }
}

pub type IndexResult<T> = std::result::Result<T, IndexError>;
