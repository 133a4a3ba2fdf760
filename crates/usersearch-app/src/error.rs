use salvo::http::StatusCode;
use thiserror::Error;
use usersearch_core::error::CoreError;
use usersearch_service::error::ServiceError;

/// Application-level errors (HTTP layer)
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    ServiceError(#[from] ServiceError),

    #[error(transparent)]
    CoreError(#[from] CoreError),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// ## Summary
    /// Maps the error to the response status.
    ///
    /// Invalid queries and bodies are client errors, missing records are 404,
    /// cancelled or timed-out requests are 503 and everything else is 500.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::ServiceError(e) if e.is_query_invalid() => StatusCode::BAD_REQUEST,
            Self::ServiceError(ServiceError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::ServiceError(e) if e.is_interrupted() => StatusCode::SERVICE_UNAVAILABLE,
            Self::CoreError(CoreError::Cancelled | CoreError::DeadlineExceeded) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::ServiceError(_) | Self::CoreError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type AppResult<T> = std::result::Result<T, AppError>;
