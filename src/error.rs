//! Handler error type
//!
//! Validation and business-rule rejections are not errors at this level;
//! handlers re-render the originating form for those. `AppError` covers
//! what is left: missing rows and infrastructure failures, rendered as
//! the 404/500 pages.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use crate::views;

#[derive(Debug, Error)]
pub enum AppError {
    /// Requested row does not exist (404 page)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Anything else from the persistence layer
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound(what) => {
                (StatusCode::NOT_FOUND, Html(views::not_found_page(&what))).into_response()
            }
            err => {
                error!("Request failed: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html(views::server_error_page()),
                )
                    .into_response()
            }
        }
    }
}

/// Result type for HTTP handlers
pub type AppResult<T> = Result<T, AppError>;
