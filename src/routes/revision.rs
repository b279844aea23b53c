use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::core::srs::{RevisionItem, RevisionStats};
use crate::core::Difficulty;
use crate::response::{AppError, SuccessResponse};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/items", post(add_item))
        .route("/review", post(review))
        .route("/due", get(due))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddItemRequest {
    subject: String,
    topic: String,
    concept: String,
    difficulty: Difficulty,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewRequest {
    item_id: String,
    quality: u8,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DueResponse {
    items: Vec<RevisionItem>,
    stats: RevisionStats,
}

async fn add_item(
    State(state): State<AppState>,
    Json(payload): Json<AddItemRequest>,
) -> Result<Json<SuccessResponse<RevisionItem>>, AppError> {
    let mut scheduler = state.revision().write();
    let item = scheduler
        .add_item(
            &payload.subject,
            &payload.topic,
            &payload.concept,
            payload.difficulty,
            Utc::now(),
        )
        .clone();
    tracing::debug!(item_id = %item.id, subject = %item.subject, "revision item added");
    Ok(Json(SuccessResponse::new(item)))
}

async fn review(
    State(state): State<AppState>,
    Json(payload): Json<ReviewRequest>,
) -> Result<Json<SuccessResponse<RevisionItem>>, AppError> {
    let mut scheduler = state.revision().write();
    let item = scheduler
        .review(&payload.item_id, payload.quality, Utc::now())?
        .clone();
    Ok(Json(SuccessResponse::new(item)))
}

async fn due(
    State(state): State<AppState>,
) -> Result<Json<SuccessResponse<DueResponse>>, AppError> {
    let now = Utc::now();
    let scheduler = state.revision().read();
    let items: Vec<RevisionItem> = scheduler.due_items(now).into_iter().cloned().collect();
    let stats = scheduler.stats(now);
    Ok(Json(SuccessResponse::new(DueResponse { items, stats })))
}
