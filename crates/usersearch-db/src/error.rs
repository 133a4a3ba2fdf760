use thiserror::Error;

/// Record store errors
#[derive(Error, Debug)]
pub enum DbError {
    /// The store could not service the request (pool exhausted, connection
    /// lost, transient transaction failure).
    #[error("Record store unavailable: {0}")]
    Unavailable(String),

    /// The store refused the request (constraint violation, bad value,
    /// serialization failure).
    #[error("Record store rejected the request: {0}")]
    Rejected(String),

    #[error(transparent)]
    CoreError(#[from] usersearch_core::error::CoreError),
}

impl From<diesel::result::Error> for DbError {
    fn from(err: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind, Error};

        match &err {
            Error::DatabaseError(
                DatabaseErrorKind::ClosedConnection
                | DatabaseErrorKind::UnableToSendCommand
                | DatabaseErrorKind::SerializationFailure
                | DatabaseErrorKind::ReadOnlyTransaction,
                _,
            )
            | Error::BrokenTransactionManager
            | Error::RollbackErrorOnCommit { .. } => Self::Unavailable(err.to_string()),
            Error::DatabaseError(..)
            | Error::SerializationError(_)
            | Error::DeserializationError(_)
            | Error::QueryBuilderError(_)
            | Error::InvalidCString(_) => Self::Rejected(err.to_string()),
            _ => Self::Unavailable(err.to_string()),
        }
    }
}

impl From<diesel_async::pooled_connection::bb8::RunError> for DbError {
    fn from(err: diesel_async::pooled_connection::bb8::RunError) -> Self {
        Self::Unavailable(err.to_string())
    }
}

pub type DbResult<T> = std::result::Result<T, DbError>;
