//! Next-action recommendations.
//!
//! Purely derived from the learning graph and per-topic accuracy metrics:
//! no state, deterministic for a given input. Three passes (gap filling,
//! advancing past a completed node, reinforcing strengths) merged and
//! truncated to the top five by priority.

use serde::{Deserialize, Serialize};

use super::graph::{GraphNode, LearningGraph};
use super::types::Tier;

const MAX_RECOMMENDATIONS: usize = 5;
const WEAK_TOPIC_ACCURACY: f64 = 60.0;
const CRITICAL_ACCURACY: f64 = 40.0;
const STRONG_TOPIC_ACCURACY: f64 = 80.0;
const ADVANCE_PRIORITY: u8 = 8;
const REINFORCE_PRIORITY: u8 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecommendationKind {
    FillGap,
    Advance,
    Reinforce,
    Review,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicMetric {
    pub topic: String,
    pub accuracy_pct: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub node_id: String,
    pub reason: String,
    pub priority: u8,
    pub estimated_impact_pct: f64,
    pub kind: RecommendationKind,
    pub urgency: Urgency,
}

/// Derives at most five prioritized suggestions.
pub fn recommend(
    graph: &LearningGraph,
    metrics: &[TopicMetric],
    current_node: Option<&str>,
) -> Vec<Recommendation> {
    let mut out = Vec::new();

    // Pass 1: weakest topics first, their workable nodes become gap fillers.
    let mut weak: Vec<&TopicMetric> = metrics
        .iter()
        .filter(|m| m.accuracy_pct < WEAK_TOPIC_ACCURACY)
        .collect();
    weak.sort_by(|a, b| a.accuracy_pct.total_cmp(&b.accuracy_pct));

    let mut priority = 10u8;
    for metric in weak {
        let urgency = if metric.accuracy_pct < CRITICAL_ACCURACY {
            Urgency::Critical
        } else {
            Urgency::High
        };
        for node in workable_nodes(graph, &metric.topic) {
            out.push(Recommendation {
                node_id: node.id.clone(),
                reason: format!(
                    "{} accuracy is {:.0}%; {} closes the gap",
                    metric.topic, metric.accuracy_pct, node.title
                ),
                priority,
                estimated_impact_pct: (100.0 - metric.accuracy_pct) / 2.0,
                kind: RecommendationKind::FillGap,
                urgency,
            });
        }
        priority = priority.saturating_sub(1).max(1);
    }

    // Pass 2: a finished node points at its authored successors.
    if let Some(current) = current_node.and_then(|id| graph.node(id)) {
        if current.completed {
            for hint in &current.next_up {
                if let Some(node) = graph.node(hint) {
                    if node.unlocked && !node.completed {
                        out.push(Recommendation {
                            node_id: node.id.clone(),
                            reason: format!("natural next step after {}", current.title),
                            priority: ADVANCE_PRIORITY,
                            estimated_impact_pct: 20.0,
                            kind: RecommendationKind::Advance,
                            urgency: Urgency::Medium,
                        });
                    }
                }
            }
        }
    }

    // Pass 3: push the top two strong topics into Advanced material.
    let mut strong: Vec<&TopicMetric> = metrics
        .iter()
        .filter(|m| m.accuracy_pct > STRONG_TOPIC_ACCURACY)
        .collect();
    strong.sort_by(|a, b| b.accuracy_pct.total_cmp(&a.accuracy_pct));
    for metric in strong.into_iter().take(2) {
        for node in workable_nodes(graph, &metric.topic) {
            if node.tier == Tier::Advanced {
                out.push(Recommendation {
                    node_id: node.id.clone(),
                    reason: format!(
                        "{} is a strength ({:.0}%); push into {}",
                        metric.topic, metric.accuracy_pct, node.title
                    ),
                    priority: REINFORCE_PRIORITY,
                    estimated_impact_pct: 10.0,
                    kind: RecommendationKind::Reinforce,
                    urgency: Urgency::Low,
                });
            }
        }
    }

    out.sort_by(|a, b| b.priority.cmp(&a.priority));
    out.truncate(MAX_RECOMMENDATIONS);
    out
}

/// Unlocked, incomplete nodes of a topic, in graph order.
fn workable_nodes<'a>(graph: &'a LearningGraph, topic: &str) -> Vec<&'a GraphNode> {
    graph
        .nodes()
        .filter(|node| node.topic == topic && node.unlocked && !node.completed)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::curriculum::template_for;
    use crate::core::types::Level;

    fn physics_graph(level: Level) -> LearningGraph {
        LearningGraph::from_template(&template_for("Physics").unwrap(), level).unwrap()
    }

    fn metric(topic: &str, accuracy_pct: f64) -> TopicMetric {
        TopicMetric {
            topic: topic.to_string(),
            accuracy_pct,
        }
    }

    #[test]
    fn test_weak_topic_yields_critical_gap_fillers() {
        let graph = physics_graph(Level::Intermediate);
        let recs = recommend(&graph, &[metric("Mechanics", 35.0)], None);
        assert!(!recs.is_empty());
        assert!(recs
            .iter()
            .all(|r| r.kind == RecommendationKind::FillGap && r.urgency == Urgency::Critical));
        assert_eq!(recs[0].priority, 10);
    }

    #[test]
    fn test_moderately_weak_topic_is_high_not_critical() {
        let graph = physics_graph(Level::Intermediate);
        let recs = recommend(&graph, &[metric("Mechanics", 55.0)], None);
        assert!(recs.iter().all(|r| r.urgency == Urgency::High));
    }

    #[test]
    fn test_weakest_topic_outranks_weaker_ones() {
        let graph = physics_graph(Level::Intermediate);
        let recs = recommend(
            &graph,
            &[metric("Electromagnetism", 50.0), metric("Mechanics", 20.0)],
            None,
        );
        let first = recs.first().unwrap();
        let node = graph.node(&first.node_id).unwrap();
        assert_eq!(node.topic, "Mechanics");
        assert_eq!(first.priority, 10);
    }

    #[test]
    fn test_completed_node_advances_to_successors() {
        let mut graph = physics_graph(Level::Beginner);
        while !graph.node("phy-units").unwrap().completed {
            graph
                .update_performance("phy-units", 30.0, 100.0, 5.0)
                .unwrap();
        }
        let recs = recommend(&graph, &[], Some("phy-units"));
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].node_id, "phy-kinematics");
        assert_eq!(recs[0].kind, RecommendationKind::Advance);
        assert_eq!(recs[0].priority, ADVANCE_PRIORITY);
    }

    #[test]
    fn test_incomplete_current_node_advances_nothing() {
        let graph = physics_graph(Level::Beginner);
        let recs = recommend(&graph, &[], Some("phy-units"));
        assert!(recs.is_empty());
    }

    #[test]
    fn test_strong_topic_reinforces_advanced_nodes() {
        let graph = physics_graph(Level::Advanced);
        let recs = recommend(&graph, &[metric("Mechanics", 92.0)], None);
        assert!(!recs.is_empty());
        for rec in &recs {
            assert_eq!(rec.kind, RecommendationKind::Reinforce);
            assert_eq!(graph.node(&rec.node_id).unwrap().tier, Tier::Advanced);
        }
    }

    #[test]
    fn test_output_capped_at_five_and_priority_sorted() {
        let graph = physics_graph(Level::Advanced);
        let recs = recommend(
            &graph,
            &[
                metric("Mechanics", 10.0),
                metric("Electromagnetism", 30.0),
                metric("General", 50.0),
            ],
            None,
        );
        assert!(recs.len() <= 5);
        assert!(recs.windows(2).all(|w| w[0].priority >= w[1].priority));
    }

    #[test]
    fn test_deterministic_given_inputs() {
        let graph = physics_graph(Level::Intermediate);
        let metrics = [metric("Mechanics", 45.0), metric("General", 85.0)];
        let a = recommend(&graph, &metrics, None);
        let b = recommend(&graph, &metrics, None);
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.node_id, y.node_id);
            assert_eq!(x.priority, y.priority);
        }
    }
}
