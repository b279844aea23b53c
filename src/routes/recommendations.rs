use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use std::collections::BTreeMap;

use crate::core::recommend::{recommend, Recommendation, TopicMetric};
use crate::response::{AppError, SuccessResponse};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/:subject", get(get_recommendations))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecommendationQuery {
    current_node: Option<String>,
}

async fn get_recommendations(
    State(state): State<AppState>,
    Path(subject): Path<String>,
    Query(query): Query<RecommendationQuery>,
) -> Result<Json<SuccessResponse<Vec<Recommendation>>>, AppError> {
    let graphs = state.graphs().read();
    let graph = graphs
        .get(&subject.to_lowercase())
        .ok_or_else(|| AppError::not_found(format!("graph not initialized for {subject}")))?;

    let metrics = topic_metrics(graph);
    let recs = recommend(graph, &metrics, query.current_node.as_deref());
    Ok(Json(SuccessResponse::new(recs)))
}

/// Per-topic accuracy derived from attempted graph nodes.
fn topic_metrics(graph: &crate::core::graph::LearningGraph) -> Vec<TopicMetric> {
    let mut sums: BTreeMap<&str, (f64, u32)> = BTreeMap::new();
    for node in graph.nodes().filter(|n| n.attempts > 0) {
        let entry = sums.entry(node.topic.as_str()).or_insert((0.0, 0));
        entry.0 += node.success_rate;
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(topic, (sum, count))| TopicMetric {
            topic: topic.to_string(),
            accuracy_pct: sum / f64::from(count),
        })
        .collect()
}
