//! Per-subject mastery tracking.
//!
//! One [`MasteryRecord`] per subject accumulates answer outcomes and keeps
//! derived views (accuracy, weak/strong concepts, proficiency level,
//! preferred difficulty) consistent after every update. The store is the
//! single mutation entry point; callers never touch records directly.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::{Difficulty, EngineConfig, Level};

const WEAK_SCORE_CEILING: f64 = 40.0;
const STRONG_SCORE_FLOOR: f64 = 80.0;
const MAX_AREA_LIST: usize = 5;

#[derive(Debug, thiserror::Error)]
pub enum MasteryError {
    #[error("validation error: {0}")]
    InvalidInput(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasteryRecord {
    pub subject: String,
    pub current_level: Level,
    pub difficulty_preference: Difficulty,
    pub accuracy_rate: f64,
    pub total_questions: u32,
    pub correct_answers: u32,
    pub concept_scores: BTreeMap<String, f64>,
    pub weak_areas: Vec<String>,
    pub strong_areas: Vec<String>,
    pub streak: u32,
    pub avg_response_time_secs: f64,
    pub updated_at: DateTime<Utc>,
}

impl MasteryRecord {
    fn new(subject: &str, now: DateTime<Utc>) -> Self {
        Self {
            subject: subject.to_string(),
            current_level: Level::Beginner,
            difficulty_preference: Difficulty::Easy,
            accuracy_rate: 0.0,
            total_questions: 0,
            correct_answers: 0,
            concept_scores: BTreeMap::new(),
            weak_areas: Vec::new(),
            strong_areas: Vec::new(),
            streak: 0,
            avg_response_time_secs: 0.0,
            updated_at: now,
        }
    }
}

/// In-memory store of mastery records, keyed by subject.
#[derive(Debug, Default)]
pub struct MasteryStore {
    records: BTreeMap<String, MasteryRecord>,
    config: EngineConfig,
}

impl MasteryStore {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            records: BTreeMap::new(),
            config,
        }
    }

    /// Returns the record for `subject`, creating a zeroed one if unseen.
    pub fn get_or_init(&mut self, subject: &str, now: DateTime<Utc>) -> &MasteryRecord {
        self.records
            .entry(subject.to_string())
            .or_insert_with(|| MasteryRecord::new(subject, now))
    }

    pub fn get(&self, subject: &str) -> Option<&MasteryRecord> {
        self.records.get(subject)
    }

    pub fn records(&self) -> impl Iterator<Item = &MasteryRecord> {
        self.records.values()
    }

    /// Applies one answered question to the subject's record.
    pub fn record_answer(
        &mut self,
        subject: &str,
        correct: bool,
        difficulty: Difficulty,
        concepts: &[String],
        response_time_secs: f64,
        now: DateTime<Utc>,
    ) -> Result<&MasteryRecord, MasteryError> {
        if subject.trim().is_empty() {
            return Err(MasteryError::InvalidInput("subject must not be empty".into()));
        }
        if !response_time_secs.is_finite() || response_time_secs < 0.0 {
            return Err(MasteryError::InvalidInput(format!(
                "response time must be a non-negative number, got {response_time_secs}"
            )));
        }
        if concepts.iter().any(|c| c.trim().is_empty()) {
            return Err(MasteryError::InvalidInput(
                "concept names must not be empty".into(),
            ));
        }

        let alpha = self.config.response_time_alpha;
        let (init, gain, loss) = (
            self.config.concept_initial_score,
            self.config.concept_gain,
            self.config.concept_loss,
        );

        let record = self
            .records
            .entry(subject.to_string())
            .or_insert_with(|| MasteryRecord::new(subject, now));

        record.total_questions += 1;
        if correct {
            record.correct_answers += 1;
            record.streak += 1;
        } else {
            record.streak = 0;
        }
        record.accuracy_rate =
            100.0 * f64::from(record.correct_answers) / f64::from(record.total_questions);

        // Exponential smoothing rather than a true mean: recent pace matters
        // more than the session-long history. See EngineConfig.
        record.avg_response_time_secs = if record.total_questions == 1 {
            response_time_secs
        } else {
            (1.0 - alpha) * record.avg_response_time_secs + alpha * response_time_secs
        };

        for concept in concepts {
            let score = record
                .concept_scores
                .entry(concept.clone())
                .or_insert(init);
            *score = if correct {
                (*score + gain).min(100.0)
            } else {
                (*score - loss).max(0.0)
            };
        }

        let (weak, strong) = split_areas(&record.concept_scores);
        record.weak_areas = weak;
        record.strong_areas = strong;

        if record.streak >= 3 && record.accuracy_rate > 75.0 && difficulty == record.difficulty_preference {
            record.difficulty_preference = record.difficulty_preference.step_up();
        } else if !correct && record.accuracy_rate < 60.0 {
            record.difficulty_preference = record.difficulty_preference.step_down();
        }

        record.current_level = if record.accuracy_rate >= 85.0 && record.total_questions >= 20 {
            Level::Advanced
        } else if record.accuracy_rate >= 65.0 && record.total_questions >= 10 {
            Level::Intermediate
        } else {
            Level::Beginner
        };

        record.updated_at = now;
        Ok(record)
    }
}

/// Weakest (score <= 40) and strongest (score >= 80) concepts, at most
/// five each, weakest-first / strongest-first.
fn split_areas(scores: &BTreeMap<String, f64>) -> (Vec<String>, Vec<String>) {
    let mut weak: Vec<(&String, f64)> = scores
        .iter()
        .filter(|(_, s)| **s <= WEAK_SCORE_CEILING)
        .map(|(c, s)| (c, *s))
        .collect();
    weak.sort_by(|a, b| a.1.total_cmp(&b.1));

    let mut strong: Vec<(&String, f64)> = scores
        .iter()
        .filter(|(_, s)| **s >= STRONG_SCORE_FLOOR)
        .map(|(c, s)| (c, *s))
        .collect();
    strong.sort_by(|a, b| b.1.total_cmp(&a.1));

    (
        weak.into_iter().take(MAX_AREA_LIST).map(|(c, _)| c.clone()).collect(),
        strong.into_iter().take(MAX_AREA_LIST).map(|(c, _)| c.clone()).collect(),
    )
}
