//! Next-question difficulty policy.
//!
//! Pure decision over a [`MasteryRecord`]; the only non-determinism is the
//! anti-monotony drift, drawn from an injected RNG so tests stay
//! reproducible.

use rand::Rng;

use super::mastery::MasteryRecord;
use super::types::{Difficulty, EngineConfig, Level};

const COLD_START_QUESTIONS: u32 = 5;

/// Picks the difficulty of the next question for a subject.
pub fn next_difficulty<R: Rng + ?Sized>(
    record: &MasteryRecord,
    config: &EngineConfig,
    rng: &mut R,
) -> Difficulty {
    if record.total_questions < COLD_START_QUESTIONS || record.accuracy_rate < 40.0 {
        return Difficulty::Easy;
    }

    if record.accuracy_rate > 80.0 && record.streak >= 3 {
        let escalated = record.difficulty_preference.step_up();
        // Beginner sessions never escalate past Medium.
        if record.current_level == Level::Beginner {
            return escalated.min(Difficulty::Medium);
        }
        return escalated;
    }

    if record.accuracy_rate < 60.0 && record.streak == 0 {
        return record.difficulty_preference.step_down();
    }

    // No strong signal: hold, with a small chance of drifting a tier in
    // either direction so long sessions do not feel monotonous.
    let roll: f64 = rng.gen();
    if roll < config.drift_chance {
        record.difficulty_preference.step_down()
    } else if roll < 2.0 * config.drift_chance {
        record.difficulty_preference.step_up()
    } else {
        record.difficulty_preference
    }
}
