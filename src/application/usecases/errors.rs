use axum::http::StatusCode;
use thiserror::Error;

use crate::domain::value_objects::schedule::ScheduleError;

#[derive(Debug, Error)]
pub enum StudioError {
    #[error("{0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("forbidden: {0}")]
    Forbidden(&'static str),
    #[error("attendance was not saved")]
    TransactionFailure(#[source] anyhow::Error),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl StudioError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            StudioError::Validation(_) => StatusCode::BAD_REQUEST,
            StudioError::NotFound(_) => StatusCode::NOT_FOUND,
            StudioError::Forbidden(_) => StatusCode::FORBIDDEN,
            StudioError::TransactionFailure(_) | StudioError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<ScheduleError> for StudioError {
    fn from(err: ScheduleError) -> Self {
        StudioError::Validation(err.to_string())
    }
}

pub type UseCaseResult<T> = std::result::Result<T, StudioError>;
