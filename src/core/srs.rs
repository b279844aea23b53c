//! SM-2 spaced-repetition scheduling for revision items.
//!
//! Classic SuperMemo-2: an ease factor per item, interval 1 day then 6 days
//! then `interval * ease`, with failed recalls resetting the interval. Items
//! deactivate (soft delete) once mastered so the due queue stays small.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::types::Difficulty;

const MIN_EASE_FACTOR: f64 = 1.3;
const INITIAL_EASE_FACTOR: f64 = 2.5;
// Ten years. Keeps next_review representable no matter how long a streak runs.
const MAX_INTERVAL_DAYS: u32 = 3650;
const FAIL_MASTERY_PENALTY: f64 = 20.0;
const MASTERED_LEVEL: f64 = 90.0;
const MASTERED_MIN_REVIEWS: u32 = 5;

#[derive(Debug, thiserror::Error)]
pub enum SrsError {
    #[error("revision item not found: {0}")]
    NotFound(String),
    #[error("quality must be between 0 and 5, got {0}")]
    InvalidQuality(u8),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionItem {
    pub id: String,
    pub subject: String,
    pub topic: String,
    pub concept: String,
    pub difficulty: Difficulty,
    pub last_reviewed: DateTime<Utc>,
    pub next_review: DateTime<Utc>,
    pub review_count: u32,
    pub mastery_level: f64,
    pub interval_days: u32,
    pub ease_factor: f64,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionStats {
    pub total: usize,
    pub active: usize,
    pub mastered: usize,
    pub due: usize,
}

/// In-memory revision scheduler. Items are never removed; mastered items
/// flip inactive and drop out of the due queue.
#[derive(Debug, Default)]
pub struct RevisionScheduler {
    items: Vec<RevisionItem>,
    next_id: u64,
}

impl RevisionScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_item(
        &mut self,
        subject: &str,
        topic: &str,
        concept: &str,
        difficulty: Difficulty,
        now: DateTime<Utc>,
    ) -> &RevisionItem {
        self.next_id += 1;
        let item = RevisionItem {
            id: format!("rev-{}", self.next_id),
            subject: subject.to_string(),
            topic: topic.to_string(),
            concept: concept.to_string(),
            difficulty,
            last_reviewed: now,
            next_review: now + Duration::days(1),
            review_count: 0,
            mastery_level: 0.0,
            interval_days: 1,
            ease_factor: INITIAL_EASE_FACTOR,
            is_active: true,
        };
        self.items.push(item);
        self.items.last().expect("just pushed")
    }

    pub fn get(&self, id: &str) -> Option<&RevisionItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Applies one recall attempt, quality graded 0 (blackout) to 5 (perfect).
    pub fn review(
        &mut self,
        id: &str,
        quality: u8,
        now: DateTime<Utc>,
    ) -> Result<&RevisionItem, SrsError> {
        if quality > 5 {
            return Err(SrsError::InvalidQuality(quality));
        }
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| SrsError::NotFound(id.to_string()))?;

        // Mastered items are frozen; reviewing one changes nothing.
        if !item.is_active {
            return Ok(item);
        }

        item.review_count += 1;

        let q = f64::from(quality);
        item.ease_factor =
            (item.ease_factor + (0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02))).max(MIN_EASE_FACTOR);

        if quality < 3 {
            // Failed recall: restart the spacing and claw back mastery.
            item.interval_days = 1;
            item.mastery_level = (item.mastery_level - FAIL_MASTERY_PENALTY).max(0.0);
        } else {
            item.interval_days = match item.review_count {
                1 => 1,
                2 => 6,
                _ => ((f64::from(item.interval_days) * item.ease_factor).round() as u32)
                    .min(MAX_INTERVAL_DAYS),
            };
            item.mastery_level = (item.mastery_level + q * 5.0).min(100.0);
        }

        item.last_reviewed = now;
        item.next_review = now + Duration::days(i64::from(item.interval_days));

        if item.mastery_level >= MASTERED_LEVEL && item.review_count >= MASTERED_MIN_REVIEWS {
            item.is_active = false;
        }

        Ok(item)
    }

    /// Active items due at `now`, soonest first.
    pub fn due_items(&self, now: DateTime<Utc>) -> Vec<&RevisionItem> {
        let mut due: Vec<&RevisionItem> = self
            .items
            .iter()
            .filter(|item| item.is_active && item.next_review <= now)
            .collect();
        due.sort_by_key(|item| item.next_review);
        due
    }

    pub fn stats(&self, now: DateTime<Utc>) -> RevisionStats {
        RevisionStats {
            total: self.items.len(),
            active: self.items.iter().filter(|i| i.is_active).count(),
            mastered: self.items.iter().filter(|i| !i.is_active).count(),
            due: self.due_items(now).len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduler_with_item(now: DateTime<Utc>) -> (RevisionScheduler, String) {
        let mut scheduler = RevisionScheduler::new();
        let id = scheduler
            .add_item("Physics", "Mechanics", "Projectile motion", Difficulty::Medium, now)
            .id
            .clone();
        (scheduler, id)
    }

    #[test]
    fn test_fresh_item_defaults() {
        let now = Utc::now();
        let (scheduler, id) = scheduler_with_item(now);
        let item = scheduler.get(&id).unwrap();
        assert_eq!(item.interval_days, 1);
        assert!((item.ease_factor - 2.5).abs() < f64::EPSILON);
        assert_eq!(item.next_review, now + Duration::days(1));
        assert!(item.is_active);
    }

    #[test]
    fn test_first_perfect_review() {
        let now = Utc::now();
        let (mut scheduler, id) = scheduler_with_item(now);
        let item = scheduler.review(&id, 5, now).unwrap();
        assert_eq!(item.review_count, 1);
        assert_eq!(item.interval_days, 1);
        assert!(item.ease_factor > 2.5);
        assert_eq!(item.next_review, now + Duration::days(1));
    }

    #[test]
    fn test_second_perfect_review_jumps_to_six_days() {
        let now = Utc::now();
        let (mut scheduler, id) = scheduler_with_item(now);
        scheduler.review(&id, 5, now).unwrap();
        let item = scheduler.review(&id, 5, now).unwrap();
        assert_eq!(item.review_count, 2);
        assert_eq!(item.interval_days, 6);
    }

    #[test]
    fn test_third_review_multiplies_by_ease() {
        let now = Utc::now();
        let (mut scheduler, id) = scheduler_with_item(now);
        scheduler.review(&id, 5, now).unwrap();
        scheduler.review(&id, 5, now).unwrap();
        let ease_before = scheduler.get(&id).unwrap().ease_factor;
        let item = scheduler.review(&id, 4, now).unwrap();
        assert_eq!(item.interval_days, (6.0 * item.ease_factor).round() as u32);
        assert!(item.ease_factor >= ease_before);
    }

    #[test]
    fn test_failed_recall_resets_interval_and_penalizes_mastery() {
        let now = Utc::now();
        let (mut scheduler, id) = scheduler_with_item(now);
        scheduler.review(&id, 5, now).unwrap();
        scheduler.review(&id, 5, now).unwrap();
        let mastery_before = scheduler.get(&id).unwrap().mastery_level;
        let item = scheduler.review(&id, 1, now).unwrap();
        assert_eq!(item.interval_days, 1);
        assert!(item.mastery_level < mastery_before);
    }

    #[test]
    fn test_ease_factor_never_drops_below_floor() {
        let now = Utc::now();
        let (mut scheduler, id) = scheduler_with_item(now);
        for _ in 0..20 {
            let item = scheduler.review(&id, 0, now).unwrap();
            assert!(item.ease_factor >= 1.3);
        }
    }

    #[test]
    fn test_rejects_out_of_range_quality() {
        let now = Utc::now();
        let (mut scheduler, id) = scheduler_with_item(now);
        assert!(matches!(
            scheduler.review(&id, 6, now),
            Err(SrsError::InvalidQuality(6))
        ));
    }

    #[test]
    fn test_unknown_item_is_not_found() {
        let now = Utc::now();
        let mut scheduler = RevisionScheduler::new();
        assert!(matches!(
            scheduler.review("rev-99", 4, now),
            Err(SrsError::NotFound(_))
        ));
    }

    #[test]
    fn test_mastered_item_deactivates() {
        let now = Utc::now();
        let (mut scheduler, id) = scheduler_with_item(now);
        // 5 * quality-5 reviews: mastery 25/50/75/100, count reaches 5.
        for _ in 0..5 {
            scheduler.review(&id, 5, now).unwrap();
        }
        let item = scheduler.get(&id).unwrap();
        assert!(item.mastery_level >= 90.0 && item.review_count >= 5);
        assert!(!item.is_active);
        assert!(scheduler.due_items(now + Duration::days(400)).is_empty());
    }

    #[test]
    fn test_long_perfect_streak_keeps_interval_bounded() {
        let now = Utc::now();
        let (mut scheduler, id) = scheduler_with_item(now);
        for _ in 0..30 {
            let item = scheduler.review(&id, 5, now).unwrap();
            assert!(item.interval_days <= 3650);
            assert!(item.next_review <= now + Duration::days(3650));
        }
    }

    #[test]
    fn test_reviewing_mastered_item_changes_nothing() {
        let now = Utc::now();
        let (mut scheduler, id) = scheduler_with_item(now);
        for _ in 0..5 {
            scheduler.review(&id, 5, now).unwrap();
        }
        let frozen = scheduler.get(&id).unwrap().clone();
        assert!(!frozen.is_active);

        let item = scheduler.review(&id, 0, now + Duration::days(1)).unwrap();
        assert_eq!(item.review_count, frozen.review_count);
        assert_eq!(item.interval_days, frozen.interval_days);
        assert_eq!(item.last_reviewed, frozen.last_reviewed);
        assert!((item.mastery_level - frozen.mastery_level).abs() < f64::EPSILON);
    }

    #[test]
    fn test_due_items_sorted_and_active_only() {
        let now = Utc::now();
        let mut scheduler = RevisionScheduler::new();
        let a = scheduler
            .add_item("Physics", "Optics", "Lenses", Difficulty::Easy, now)
            .id
            .clone();
        let b = scheduler
            .add_item("Chemistry", "Organic", "Alkanes", Difficulty::Hard, now)
            .id
            .clone();
        // Push `a` further out than `b`.
        scheduler.review(&a, 5, now).unwrap();
        scheduler.review(&a, 5, now).unwrap();

        let later = now + Duration::days(30);
        let due = scheduler.due_items(later);
        assert_eq!(due.len(), 2);
        assert_eq!(due[0].id, b);
        assert_eq!(due[1].id, a);
        assert!(due.windows(2).all(|w| w[0].next_review <= w[1].next_review));
    }
}
