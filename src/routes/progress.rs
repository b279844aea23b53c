use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::core::difficulty::next_difficulty;
use crate::core::mastery::MasteryRecord;
use crate::core::Difficulty;
use crate::response::{AppError, SuccessResponse};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_records))
        .route("/answer", post(record_answer))
        .route("/:subject", get(get_record))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnswerRequest {
    subject: String,
    correct: bool,
    difficulty: Difficulty,
    #[serde(default)]
    concepts: Vec<String>,
    #[serde(default = "default_response_time")]
    response_time_secs: f64,
}

fn default_response_time() -> f64 {
    30.0
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnswerResponse {
    record: MasteryRecord,
    next_difficulty: Difficulty,
}

async fn record_answer(
    State(state): State<AppState>,
    Json(payload): Json<AnswerRequest>,
) -> Result<Json<SuccessResponse<AnswerResponse>>, AppError> {
    let now = Utc::now();
    let record = {
        let mut store = state.mastery().write();
        store
            .record_answer(
                &payload.subject,
                payload.correct,
                payload.difficulty,
                &payload.concepts,
                payload.response_time_secs,
                now,
            )?
            .clone()
    };

    let next = {
        let mut rng = state.drift_rng().lock();
        next_difficulty(&record, state.engine_config(), &mut *rng)
    };

    tracing::debug!(
        subject = %record.subject,
        correct = payload.correct,
        accuracy = record.accuracy_rate,
        streak = record.streak,
        "answer recorded"
    );

    Ok(Json(SuccessResponse::new(AnswerResponse {
        record,
        next_difficulty: next,
    })))
}

async fn list_records(
    State(state): State<AppState>,
) -> Result<Json<SuccessResponse<Vec<MasteryRecord>>>, AppError> {
    let store = state.mastery().read();
    let records: Vec<MasteryRecord> = store.records().cloned().collect();
    Ok(Json(SuccessResponse::new(records)))
}

async fn get_record(
    State(state): State<AppState>,
    Path(subject): Path<String>,
) -> Result<Json<SuccessResponse<MasteryRecord>>, AppError> {
    let mut store = state.mastery().write();
    let record = store.get_or_init(&subject, Utc::now()).clone();
    Ok(Json(SuccessResponse::new(record)))
}
