use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::application::usecases::errors::StudioError;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}

pub fn error_response(status: StatusCode, message: String) -> Response {
    let body = Json(ErrorResponse {
        code: status.as_u16(),
        message,
    });

    (status, body).into_response()
}

impl IntoResponse for StudioError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            StudioError::TransactionFailure(err) => {
                error!(error = ?err, "http: transaction failed");
                self.to_string()
            }
            StudioError::Internal(err) => {
                error!(error = ?err, "http: request failed");
                // Store details stay in the logs.
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        };

        error_response(status, message)
    }
}
