use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::planner::{StudyPlan, StudySession, SubjectGoal, WeeklyMilestone};
use crate::core::Level;
use crate::response::{AppError, SuccessResponse};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_plan).get(get_plan))
        .route("/calendar", get(get_calendar))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatePlanRequest {
    exam_date: NaiveDate,
    exam_type: String,
    level: Level,
    weekly_hours: f64,
    subjects: Vec<SubjectGoal>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PlanResponse {
    plan: StudyPlan,
    session_count: usize,
    milestones: Vec<WeeklyMilestone>,
}

async fn create_plan(
    State(state): State<AppState>,
    Json(payload): Json<CreatePlanRequest>,
) -> Result<Json<SuccessResponse<PlanResponse>>, AppError> {
    let today = Utc::now().date_naive();
    let mut planner = state.planner().write();
    let plan = planner
        .set_plan(
            payload.exam_date,
            &payload.exam_type,
            payload.level,
            payload.weekly_hours,
            &payload.subjects,
            today,
        )?
        .clone();

    tracing::info!(
        exam_type = %plan.exam_type,
        exam_date = %plan.exam_date,
        subjects = plan.allocations.len(),
        "study plan created"
    );

    Ok(Json(SuccessResponse::with_message(
        PlanResponse {
            session_count: planner.sessions().len(),
            milestones: planner.milestones(today),
            plan,
        },
        "study plan created",
    )))
}

async fn get_plan(
    State(state): State<AppState>,
) -> Result<Json<SuccessResponse<PlanResponse>>, AppError> {
    let today = Utc::now().date_naive();
    let planner = state.planner().read();
    let plan = planner
        .plan()
        .cloned()
        .ok_or_else(|| AppError::not_found("no active study plan"))?;
    Ok(Json(SuccessResponse::new(PlanResponse {
        session_count: planner.sessions().len(),
        milestones: planner.milestones(today),
        plan,
    })))
}

async fn get_calendar(
    State(state): State<AppState>,
) -> Result<Json<SuccessResponse<Vec<StudySession>>>, AppError> {
    let planner = state.planner().read();
    if planner.plan().is_none() {
        return Err(AppError::not_found("no active study plan"));
    }
    Ok(Json(SuccessResponse::new(planner.sessions().to_vec())))
}
