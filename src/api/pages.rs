//! Home page and fallback routes

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};

use crate::views;

/// GET /
pub async fn home() -> impl IntoResponse {
    Html(views::home_page(&[]))
}

/// Fallback for unmatched routes.
pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Html(views::not_found_page("The page you requested")),
    )
}
