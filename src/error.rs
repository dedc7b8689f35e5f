use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Customer not found")]
    CustomerNotFound,
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Insufficient credits: {0}")]
    InsufficientCredits(String),
    #[error("Over-restore on card {0}")]
    OverRestore(String),
    #[error("Data integrity violation: {0}")]
    DataIntegrity(String),
    #[error("Missing API key")]
    MissingApiKey,
    #[error("Invalid API key")]
    InvalidApiKey,
    #[error("Internal server error")]
    Internal,
    #[error("Internal server error: {0}")]
    InternalWithMsg(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Database(e) => {
                if let Some(db_err) = e.as_database_error() {
                    let err_code = db_err.code().unwrap_or_default();

                    // 2067 = SQLite Unique Constraint
                    // 23505 = PostgreSQL Unique Violation
                    if err_code == "2067" || err_code == "23505" {
                        return (
                            StatusCode::CONFLICT,
                            Json(json!({ "error": "Resource already exists (duplicate entry)", "code": "CONFLICT" }))
                        ).into_response();
                    }
                }

                error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", "Internal server error".to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::CustomerNotFound => (StatusCode::NOT_FOUND, "CUSTOMER_NOT_FOUND", "Customer not found".to_string()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION", msg.clone()),
            AppError::InsufficientCredits(msg) => (StatusCode::CONFLICT, "INSUFFICIENT_CREDITS", msg.clone()),
            AppError::OverRestore(card_id) => {
                // An over-restore means a caller restored more than was ever
                // deducted. That is a bug report, not a user-facing condition.
                error!("BUG: over-restore attempted on card {}", card_id);
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", "Internal error".to_string())
            }
            AppError::DataIntegrity(msg) => {
                error!("Data integrity violation: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "DATA_INTEGRITY", msg.clone())
            }
            AppError::MissingApiKey => (StatusCode::UNAUTHORIZED, "MISSING_API_KEY", "Missing API key".to_string()),
            AppError::InvalidApiKey => (StatusCode::UNAUTHORIZED, "INVALID_API_KEY", "Invalid API key".to_string()),
            AppError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", "Internal error".to_string()),
            AppError::InternalWithMsg(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", "Internal error".to_string())
            }
        };

        let body = Json(json!({
            "error": message,
            "code": code
        }));

        (status, body).into_response()
    }
}
