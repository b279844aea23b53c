mod graph;
mod health;
mod plan;
mod progress;
mod recommendations;
mod revision;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Router;

use crate::response::ErrorResponse;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/health", health::router())
        .nest("/api/progress", progress::router())
        .nest("/api/revision", revision::router())
        .nest("/api/graph", graph::router())
        .nest("/api/recommendations", recommendations::router())
        .nest("/api/plan", plan::router())
        .fallback(fallback_handler)
        .with_state(state)
}

async fn fallback_handler() -> Response {
    (
        StatusCode::NOT_FOUND,
        axum::Json(ErrorResponse {
            success: false,
            error: "route not found".to_string(),
            code: "NOT_FOUND".to_string(),
        }),
    )
        .into_response()
}
