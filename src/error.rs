use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use greenkenya_submission::Error as SubmissionError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Form session not found")]
    NotFound,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_display = self.to_string();
        let (status_code, error_title) = match &self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "Not Found"),
            AppError::InvalidInput(_)
            | AppError::Submission(
                SubmissionError::Validation(_)
                | SubmissionError::UnknownField { .. }
                | SubmissionError::WrongKind { .. },
            ) => (StatusCode::UNPROCESSABLE_ENTITY, "Validation Error"),
            AppError::Submission(SubmissionError::InFlight) => {
                (StatusCode::CONFLICT, "Submission In Progress")
            }
            AppError::Submission(err) => {
                tracing::error!("Submission error: {:?}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        };

        let message = if status_code.is_server_error() {
            "Something went wrong. Please try again later.".to_string()
        } else {
            error_display
        };

        (
            status_code,
            Json(json!({
                "error": error_title,
                "message": message,
            })),
        )
            .into_response()
    }
}
