//! Prerequisite graph of topics per subject.
//!
//! Nodes move Locked -> Unlocked -> Completed, and Completed is terminal.
//! A node unlocks only when every prerequisite is completed; completing a
//! node re-scans the whole graph for newly satisfied nodes rather than
//! trusting the hand-authored successor hints, which are kept purely as
//! recommendation material.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::types::{Level, Tier};

const COMPLETION_MASTERY: f64 = 80.0;

#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("validation error: {0}")]
    InvalidInput(String),
    #[error("node not found: {0}")]
    NotFound(String),
    #[error("node is locked: {0}")]
    NodeLocked(String),
    #[error("unknown prerequisite {prerequisite} referenced by {node}")]
    UnknownPrerequisite { node: String, prerequisite: String },
    #[error("prerequisite cycle involving {0}")]
    PrerequisiteCycle(String),
}

/// Static description of a node, the shape curricula are authored in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeTemplate {
    pub id: String,
    pub title: String,
    pub subject: String,
    pub topic: String,
    pub subtopic: String,
    pub tier: Tier,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    /// Hand-authored "what to study next" hints, surfaced by the
    /// recommendation engine. Not consulted for unlocking.
    #[serde(default)]
    pub next_up: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: String,
    pub title: String,
    pub subject: String,
    pub topic: String,
    pub subtopic: String,
    pub tier: Tier,
    pub prerequisites: Vec<String>,
    pub next_up: Vec<String>,
    pub mastery: f64,
    pub attempts: u32,
    pub success_rate: f64,
    pub time_spent_mins: f64,
    pub unlocked: bool,
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphProgress {
    pub total_nodes: usize,
    pub unlocked_nodes: usize,
    pub completed_nodes: usize,
    pub average_mastery: f64,
}

#[derive(Debug, Clone)]
pub struct LearningGraph {
    nodes: BTreeMap<String, GraphNode>,
    completed_order: Vec<String>,
}

impl LearningGraph {
    /// Builds a graph from a curriculum template. Fails fast on unknown
    /// prerequisite ids and on prerequisite cycles.
    pub fn from_template(templates: &[NodeTemplate], level: Level) -> Result<Self, GraphError> {
        if templates.is_empty() {
            return Err(GraphError::InvalidInput("template has no nodes".into()));
        }

        validate_references(templates)?;
        validate_acyclic(templates)?;

        let level_offset = match level {
            Level::Beginner => 0.0,
            Level::Intermediate => 20.0,
            Level::Advanced => 40.0,
        };

        let mut nodes = BTreeMap::new();
        for template in templates {
            let unlocked = match template.tier {
                Tier::Foundation => true,
                Tier::Intermediate => level != Level::Beginner,
                Tier::Advanced => level == Level::Advanced,
                Tier::Expert => false,
            };
            let mastery = (level_offset + template.tier.initial_mastery_offset()).max(0.0);

            if nodes
                .insert(
                    template.id.clone(),
                    GraphNode {
                        id: template.id.clone(),
                        title: template.title.clone(),
                        subject: template.subject.clone(),
                        topic: template.topic.clone(),
                        subtopic: template.subtopic.clone(),
                        tier: template.tier,
                        prerequisites: template.prerequisites.clone(),
                        next_up: template.next_up.clone(),
                        mastery,
                        attempts: 0,
                        success_rate: 0.0,
                        time_spent_mins: 0.0,
                        unlocked,
                        completed: false,
                    },
                )
                .is_some()
            {
                return Err(GraphError::InvalidInput(format!(
                    "duplicate node id {}",
                    template.id
                )));
            }
        }

        Ok(Self {
            nodes,
            completed_order: Vec::new(),
        })
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }

    pub fn completed_ids(&self) -> &[String] {
        &self.completed_order
    }

    pub fn progress(&self) -> GraphProgress {
        let total = self.nodes.len();
        let mastery_sum: f64 = self.nodes.values().map(|n| n.mastery).sum();
        GraphProgress {
            total_nodes: total,
            unlocked_nodes: self.nodes.values().filter(|n| n.unlocked).count(),
            completed_nodes: self.completed_order.len(),
            average_mastery: if total > 0 {
                mastery_sum / total as f64
            } else {
                0.0
            },
        }
    }

    /// Records a study session against a node. Returns the ids of any nodes
    /// unlocked as a consequence.
    pub fn update_performance(
        &mut self,
        node_id: &str,
        minutes: f64,
        accuracy_pct: f64,
        difficulty_rating: f64,
    ) -> Result<Vec<String>, GraphError> {
        if !(0.0..=100.0).contains(&accuracy_pct) {
            return Err(GraphError::InvalidInput(format!(
                "accuracy must be within 0-100, got {accuracy_pct}"
            )));
        }
        if !(0.0..=5.0).contains(&difficulty_rating) {
            return Err(GraphError::InvalidInput(format!(
                "difficulty rating must be within 0-5, got {difficulty_rating}"
            )));
        }
        if !minutes.is_finite() || minutes < 0.0 {
            return Err(GraphError::InvalidInput(format!(
                "minutes must be non-negative, got {minutes}"
            )));
        }

        let node = self
            .nodes
            .get_mut(node_id)
            .ok_or_else(|| GraphError::NotFound(node_id.to_string()))?;
        if !node.unlocked {
            return Err(GraphError::NodeLocked(node_id.to_string()));
        }

        node.time_spent_mins += minutes;
        node.attempts += 1;
        node.success_rate += (accuracy_pct - node.success_rate) / f64::from(node.attempts);

        let increase =
            (accuracy_pct / 10.0) * (difficulty_rating / 5.0) * node.tier.mastery_multiplier();
        node.mastery = (node.mastery + increase).min(100.0);

        let mut unlocked = Vec::new();
        if node.mastery >= COMPLETION_MASTERY && !node.completed {
            node.completed = true;
            self.completed_order.push(node_id.to_string());
            unlocked = self.unlock_satisfied_nodes();
        }
        Ok(unlocked)
    }

    fn unlock_satisfied_nodes(&mut self) -> Vec<String> {
        let satisfied: Vec<String> = self
            .nodes
            .values()
            .filter(|node| {
                !node.unlocked
                    && node
                        .prerequisites
                        .iter()
                        .all(|p| self.nodes.get(p).is_some_and(|n| n.completed))
            })
            .map(|node| node.id.clone())
            .collect();
        for id in &satisfied {
            if let Some(node) = self.nodes.get_mut(id) {
                node.unlocked = true;
            }
        }
        satisfied
    }
}

fn validate_references(templates: &[NodeTemplate]) -> Result<(), GraphError> {
    let ids: std::collections::BTreeSet<&str> =
        templates.iter().map(|t| t.id.as_str()).collect();
    for template in templates {
        for prerequisite in &template.prerequisites {
            if !ids.contains(prerequisite.as_str()) {
                return Err(GraphError::UnknownPrerequisite {
                    node: template.id.clone(),
                    prerequisite: prerequisite.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Three-color DFS over the prerequisite edges.
fn validate_acyclic(templates: &[NodeTemplate]) -> Result<(), GraphError> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        White,
        Grey,
        Black,
    }

    let index: BTreeMap<&str, &NodeTemplate> =
        templates.iter().map(|t| (t.id.as_str(), t)).collect();
    let mut marks: BTreeMap<&str, Mark> =
        templates.iter().map(|t| (t.id.as_str(), Mark::White)).collect();

    fn visit<'a>(
        id: &'a str,
        index: &BTreeMap<&'a str, &'a NodeTemplate>,
        marks: &mut BTreeMap<&'a str, Mark>,
    ) -> Result<(), GraphError> {
        match marks[id] {
            Mark::Black => return Ok(()),
            Mark::Grey => return Err(GraphError::PrerequisiteCycle(id.to_string())),
            Mark::White => {}
        }
        marks.insert(id, Mark::Grey);
        if let Some(template) = index.get(id) {
            for prerequisite in &template.prerequisites {
                visit(prerequisite.as_str(), index, marks)?;
            }
        }
        marks.insert(id, Mark::Black);
        Ok(())
    }

    for template in templates {
        visit(template.id.as_str(), &index, &mut marks)?;
    }
    Ok(())
}
