//! Shared types for the adaptive learning engine.

use serde::{Deserialize, Serialize};

/// Question difficulty tier served to the learner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn step_up(self) -> Self {
        match self {
            Self::Easy => Self::Medium,
            Self::Medium | Self::Hard => Self::Hard,
        }
    }

    pub fn step_down(self) -> Self {
        match self {
            Self::Hard => Self::Medium,
            Self::Medium | Self::Easy => Self::Easy,
        }
    }
}

/// Overall proficiency level per subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

/// Difficulty tier of a learning-graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Foundation,
    Intermediate,
    Advanced,
    Expert,
}

impl Tier {
    /// Multiplier applied to mastery gains: easier tiers move faster.
    pub fn mastery_multiplier(self) -> f64 {
        match self {
            Self::Foundation => 1.2,
            Self::Intermediate => 1.0,
            Self::Advanced => 0.8,
            Self::Expert => 0.6,
        }
    }

    /// Initial mastery adjustment when a graph is seeded.
    pub fn initial_mastery_offset(self) -> f64 {
        match self {
            Self::Foundation => 10.0,
            Self::Intermediate => 0.0,
            Self::Advanced => -10.0,
            Self::Expert => -20.0,
        }
    }
}

/// Engine tunables. Defaults match the production behavior; tests and
/// deployments can override individual knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Exponential smoothing factor for average response time.
    /// 0.5 weighs the latest sample and the history equally.
    pub response_time_alpha: f64,
    /// Probability of a one-tier drift (each direction) when the
    /// difficulty policy has no strong signal.
    pub drift_chance: f64,
    /// Concept score at first sighting.
    pub concept_initial_score: f64,
    /// Concept score delta on a correct answer.
    pub concept_gain: f64,
    /// Concept score delta on a wrong answer.
    pub concept_loss: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            response_time_alpha: 0.5,
            drift_chance: 0.1,
            concept_initial_score: 50.0,
            concept_gain: 10.0,
            concept_loss: 5.0,
        }
    }
}
