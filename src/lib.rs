pub mod auth;
pub mod client;
pub mod config;
pub mod db;
pub mod relay;
pub mod tours;

use std::sync::Arc;

use axum::{Json, Router, extract::FromRef, http::StatusCode, response::{IntoResponse, Response}, routing::get};
use serde_json::json;
use sqlx::SqlitePool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{config::Config, relay::Relay};

#[derive(Clone, FromRef)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub relay: Arc<Relay>,
    pub config: Arc<Config>,
}

/// Build the full application router: REST API plus the relay endpoint.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(api_root))
        .nest("/api/auth", auth::router())
        .nest("/api/tours", tours::router())
        .route("/ws", get(tours::ws::tour_ws))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn api_root() -> &'static str {
    "API is running..."
}

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Database(sqlx::Error::RowNotFound) => {
                (StatusCode::NOT_FOUND, "Resource not found".to_owned())
            }
            AppError::Database(err) => {
                tracing::error!(error = %err, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_owned(),
                )
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_owned(),
                )
            }
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}
