//! Encore - booking and listing board for music venues, artists, and shows
//!
//! Server-rendered HTML over a SQLite store: browse venues and artists,
//! view detail pages with upcoming/past show lists, search by name, and
//! create/edit records through forms.

use axum::routing::get;
use axum::Router;
use sqlx::SqlitePool;
use tower_http::normalize_path::NormalizePath;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod forms;
pub mod views;

pub use crate::error::{AppError, AppResult};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
}

impl AppState {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::pages::home))
        .route("/health", get(api::health::health))
        .nest("/artists", api::artists::routes())
        .nest("/venues", api::venues::routes())
        .nest("/shows", api::shows::routes())
        .fallback(api::pages::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Build the full service. Listing pages answer with and without a
/// trailing slash (`/venues` and `/venues/`), so the router is wrapped in
/// trailing-slash normalization; this must happen outside the router,
/// before routing sees the request path.
pub fn build_service(state: AppState) -> NormalizePath<Router> {
    NormalizePath::trim_trailing_slash(build_router(state))
}
