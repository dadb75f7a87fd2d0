//! Error types for the Libris server

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::views;

/// A single field-level validation message, used to redisplay a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            // Handlers intercept validation failures to redisplay the
            // originating form; reaching here means one did not.
            AppError::Validation(errors) => {
                let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
                (
                    StatusCode::BAD_REQUEST,
                    Html(views::server_error(&messages.join(" "))),
                )
                    .into_response()
            }
            AppError::NotFound(msg) => {
                tracing::debug!("not found: {}", msg);
                (StatusCode::NOT_FOUND, Html(views::page_not_found())).into_response()
            }
            AppError::Database(e) => {
                tracing::error!("database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html(views::server_error(
                        "Sorry! There was an unexpected error on the server.",
                    )),
                )
                    .into_response()
            }
            AppError::Internal(msg) => {
                tracing::error!("internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html(views::server_error(
                        "Sorry! There was an unexpected error on the server.",
                    )),
                )
                    .into_response()
            }
        }
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
