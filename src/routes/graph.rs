use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::core::curriculum::template_for;
use crate::core::graph::{GraphNode, GraphProgress, LearningGraph};
use crate::core::Level;
use crate::response::{AppError, SuccessResponse};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/performance", post(update_performance))
        .route("/:subject", get(get_graph))
        .route("/:subject/init", post(init_graph))
}

fn graph_key(subject: &str) -> String {
    subject.to_lowercase()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InitGraphRequest {
    level: Level,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphResponse {
    nodes: Vec<GraphNode>,
    progress: GraphProgress,
    completed: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PerformanceRequest {
    subject: String,
    node_id: String,
    minutes: f64,
    accuracy_pct: f64,
    difficulty_rating: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PerformanceResponse {
    node: GraphNode,
    newly_unlocked: Vec<String>,
}

fn graph_response(graph: &LearningGraph) -> GraphResponse {
    GraphResponse {
        nodes: graph.nodes().cloned().collect(),
        progress: graph.progress(),
        completed: graph.completed_ids().to_vec(),
    }
}

async fn init_graph(
    State(state): State<AppState>,
    Path(subject): Path<String>,
    Json(payload): Json<InitGraphRequest>,
) -> Result<Json<SuccessResponse<GraphResponse>>, AppError> {
    let templates = template_for(&subject)
        .ok_or_else(|| AppError::not_found(format!("no curriculum for subject {subject}")))?;
    let graph = LearningGraph::from_template(&templates, payload.level)?;
    let response = graph_response(&graph);
    state.graphs().write().insert(graph_key(&subject), graph);
    tracing::info!(subject = %subject, level = ?payload.level, "learning graph initialized");
    Ok(Json(SuccessResponse::new(response)))
}

async fn get_graph(
    State(state): State<AppState>,
    Path(subject): Path<String>,
) -> Result<Json<SuccessResponse<GraphResponse>>, AppError> {
    let graphs = state.graphs().read();
    let graph = graphs
        .get(&graph_key(&subject))
        .ok_or_else(|| AppError::not_found(format!("graph not initialized for {subject}")))?;
    Ok(Json(SuccessResponse::new(graph_response(graph))))
}

async fn update_performance(
    State(state): State<AppState>,
    Json(payload): Json<PerformanceRequest>,
) -> Result<Json<SuccessResponse<PerformanceResponse>>, AppError> {
    let mut graphs = state.graphs().write();
    let graph = graphs
        .get_mut(&graph_key(&payload.subject))
        .ok_or_else(|| {
            AppError::not_found(format!("graph not initialized for {}", payload.subject))
        })?;

    let newly_unlocked = graph.update_performance(
        &payload.node_id,
        payload.minutes,
        payload.accuracy_pct,
        payload.difficulty_rating,
    )?;
    let node = graph
        .node(&payload.node_id)
        .cloned()
        .ok_or_else(|| AppError::not_found(payload.node_id.clone()))?;

    if !newly_unlocked.is_empty() {
        tracing::info!(
            subject = %payload.subject,
            node = %payload.node_id,
            unlocked = ?newly_unlocked,
            "node completion unlocked successors"
        );
    }

    Ok(Json(SuccessResponse::new(PerformanceResponse {
        node,
        newly_unlocked,
    })))
}
