//! Study-plan allocation and calendar generation.
//!
//! Weekly hours are split across subjects proportionally to the strength
//! gap (target - current); the calendar packs one block per subject into
//! every study day before the exam until the day fills up, with session
//! kinds rotating by simple date rules. Regenerating the calendar touches only future sessions, so
//! history survives a re-plan.

use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use super::types::Level;

const MAX_HORIZON_DAYS: i64 = 90;
const MAX_WEEKLY_HOURS: f64 = 168.0;
const MIN_SESSION_MINS: i64 = 30;
const BREAK_MINS: i64 = 15;
const DAY_START_MINS: i64 = 9 * 60;
const DAY_END_MINS: i64 = 22 * 60;

#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("validation error: {0}")]
    InvalidInput(String),
    #[error("no active study plan")]
    NoPlan,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectGoal {
    pub subject: String,
    pub current_strength: u8,
    pub target_strength: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Allocation {
    pub subject: String,
    pub weightage_pct: f64,
    pub current_strength: u8,
    pub target_strength: u8,
    pub weekly_hours: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionKind {
    Study,
    Practice,
    Revision,
    MockTest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub duration_mins: i64,
    pub subject: String,
    pub kind: SessionKind,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyMilestone {
    pub week: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub target_hours: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyPlan {
    pub exam_date: NaiveDate,
    pub exam_type: String,
    pub level: Level,
    pub weekly_hours: f64,
    pub allocations: Vec<Allocation>,
}

/// Splits weekly hours by strength gap. Equal split when nothing is behind.
pub fn allocate(subjects: &[SubjectGoal], weekly_hours: f64) -> Result<Vec<Allocation>, PlanError> {
    if subjects.is_empty() {
        return Err(PlanError::InvalidInput("at least one subject required".into()));
    }
    if !weekly_hours.is_finite() || weekly_hours <= 0.0 || weekly_hours > MAX_WEEKLY_HOURS {
        return Err(PlanError::InvalidInput(format!(
            "weekly hours must be between 0 and {MAX_WEEKLY_HOURS}, got {weekly_hours}"
        )));
    }
    for goal in subjects {
        if goal.subject.trim().is_empty() {
            return Err(PlanError::InvalidInput("subject must not be empty".into()));
        }
        if !(1..=10).contains(&goal.current_strength) || !(1..=10).contains(&goal.target_strength) {
            return Err(PlanError::InvalidInput(format!(
                "{}: strengths must be within 1-10",
                goal.subject
            )));
        }
        if goal.target_strength < goal.current_strength {
            return Err(PlanError::InvalidInput(format!(
                "{}: target strength below current",
                goal.subject
            )));
        }
    }

    let total_gap: f64 = subjects
        .iter()
        .map(|g| f64::from(g.target_strength - g.current_strength))
        .sum();

    Ok(subjects
        .iter()
        .map(|goal| {
            let weightage_pct = if total_gap > 0.0 {
                f64::from(goal.target_strength - goal.current_strength) / total_gap * 100.0
            } else {
                100.0 / subjects.len() as f64
            };
            Allocation {
                subject: goal.subject.clone(),
                weightage_pct,
                current_strength: goal.current_strength,
                target_strength: goal.target_strength,
                weekly_hours: weekly_hours * weightage_pct / 100.0,
            }
        })
        .collect())
}

/// Session kind for a calendar day. Saturday mock tests win, then the
/// every-third-day revision slot, then the every-fifth-day practice slot.
fn session_kind(date: NaiveDate) -> SessionKind {
    if date.weekday() == Weekday::Sat {
        SessionKind::MockTest
    } else if date.day() % 3 == 0 {
        SessionKind::Revision
    } else if date.day() % 5 == 0 {
        SessionKind::Practice
    } else {
        SessionKind::Study
    }
}

fn sessions_for_day(date: NaiveDate, allocations: &[Allocation]) -> Vec<StudySession> {
    let mut ordered: Vec<&Allocation> = allocations.iter().collect();
    ordered.sort_by(|a, b| b.weekly_hours.total_cmp(&a.weekly_hours));

    let kind = session_kind(date);
    // Minutes since midnight; blocks that would run past the day end are
    // dropped rather than letting start times wrap around midnight.
    let mut cursor_mins = DAY_START_MINS;
    let mut sessions = Vec::with_capacity(ordered.len());
    for allocation in ordered {
        let duration_mins = ((allocation.weekly_hours / 6.0) * 60.0).round() as i64;
        let duration_mins = duration_mins.max(MIN_SESSION_MINS);
        if cursor_mins + duration_mins > DAY_END_MINS {
            break;
        }
        let start = NaiveTime::from_hms_opt(cursor_mins as u32 / 60, cursor_mins as u32 % 60, 0)
            .expect("cursor stays within the day");
        sessions.push(StudySession {
            date,
            start,
            duration_mins,
            subject: allocation.subject.clone(),
            kind,
        });
        cursor_mins += duration_mins + BREAK_MINS;
    }
    sessions
}

/// One plan per planner; keeps the generated calendar alongside it.
#[derive(Debug, Default)]
pub struct StudyPlanner {
    plan: Option<StudyPlan>,
    sessions: Vec<StudySession>,
}

impl StudyPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plan(&self) -> Option<&StudyPlan> {
        self.plan.as_ref()
    }

    pub fn sessions(&self) -> &[StudySession] {
        &self.sessions
    }

    pub fn milestones(&self, today: NaiveDate) -> Vec<WeeklyMilestone> {
        let Some(plan) = &self.plan else {
            return Vec::new();
        };
        let horizon_end = horizon_end(today, plan.exam_date);
        let mut milestones = Vec::new();
        let mut start = today;
        let mut week = 1u32;
        while start < horizon_end {
            let end = (start + Duration::days(6)).min(horizon_end);
            milestones.push(WeeklyMilestone {
                week,
                start_date: start,
                end_date: end,
                target_hours: plan.weekly_hours * f64::from(week),
            });
            start += Duration::days(7);
            week += 1;
        }
        milestones
    }

    /// Installs a plan and (re)builds its calendar. Only sessions dated
    /// `today` or later are cleared, so regeneration is idempotent for a
    /// fixed `today` and never rewrites history.
    pub fn set_plan(
        &mut self,
        exam_date: NaiveDate,
        exam_type: &str,
        level: Level,
        weekly_hours: f64,
        subjects: &[SubjectGoal],
        today: NaiveDate,
    ) -> Result<&StudyPlan, PlanError> {
        if exam_date <= today {
            return Err(PlanError::InvalidInput(
                "exam date must be in the future".into(),
            ));
        }
        let allocations = allocate(subjects, weekly_hours)?;
        self.plan = Some(StudyPlan {
            exam_date,
            exam_type: exam_type.to_string(),
            level,
            weekly_hours,
            allocations,
        });
        self.regenerate_calendar(today)?;
        Ok(self.plan.as_ref().expect("just set"))
    }

    pub fn regenerate_calendar(&mut self, today: NaiveDate) -> Result<usize, PlanError> {
        let plan = self.plan.as_ref().ok_or(PlanError::NoPlan)?;
        let horizon = horizon_end(today, plan.exam_date);

        self.sessions.retain(|s| s.date < today);

        let mut date = today;
        let mut added = 0;
        while date < horizon {
            if date.weekday() != Weekday::Sun {
                let day_sessions = sessions_for_day(date, &plan.allocations);
                added += day_sessions.len();
                self.sessions.extend(day_sessions);
            }
            date += Duration::days(1);
        }
        self.sessions.sort_by_key(|s| (s.date, s.start));
        Ok(added)
    }
}

fn horizon_end(today: NaiveDate, exam_date: NaiveDate) -> NaiveDate {
    exam_date.min(today + Duration::days(MAX_HORIZON_DAYS))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal(subject: &str, current: u8, target: u8) -> SubjectGoal {
        SubjectGoal {
            subject: subject.to_string(),
            current_strength: current,
            target_strength: target,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_allocation_is_gap_proportional() {
        let allocations =
            allocate(&[goal("Physics", 5, 8), goal("Chemistry", 6, 8)], 20.0).unwrap();
        assert!((allocations[0].weightage_pct - 60.0).abs() < 1e-9);
        assert!((allocations[1].weightage_pct - 40.0).abs() < 1e-9);
        assert!((allocations[0].weekly_hours - 12.0).abs() < 1e-9);
        assert!((allocations[1].weekly_hours - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_total_gap_splits_equally() {
        let allocations = allocate(
            &[goal("Physics", 7, 7), goal("Chemistry", 5, 5), goal("Maths", 9, 9)],
            18.0,
        )
        .unwrap();
        for allocation in &allocations {
            assert!((allocation.weightage_pct - 100.0 / 3.0).abs() < 1e-9);
            assert!((allocation.weekly_hours - 6.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_weightages_sum_to_hundred() {
        let allocations = allocate(
            &[goal("Physics", 3, 9), goal("Chemistry", 4, 7), goal("Maths", 5, 6)],
            25.0,
        )
        .unwrap();
        let sum: f64 = allocations.iter().map(|a| a.weightage_pct).sum();
        assert!((sum - 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_allocation_rejects_bad_input() {
        assert!(allocate(&[], 10.0).is_err());
        assert!(allocate(&[goal("Physics", 5, 8)], 0.0).is_err());
        assert!(allocate(&[goal("Physics", 5, 8)], 2000.0).is_err());
        assert!(allocate(&[goal("Physics", 5, 8)], 169.0).is_err());
        assert!(allocate(&[goal("Physics", 0, 8)], 10.0).is_err());
        assert!(allocate(&[goal("Physics", 8, 5)], 10.0).is_err());
    }

    #[test]
    fn test_calendar_skips_sundays() {
        let mut planner = StudyPlanner::new();
        // 2026-03-02 is a Monday.
        let today = date(2026, 3, 2);
        planner
            .set_plan(date(2026, 3, 16), "JEE", Level::Beginner, 12.0, &[goal("Physics", 5, 8)], today)
            .unwrap();
        assert!(planner
            .sessions()
            .iter()
            .all(|s| s.date.weekday() != Weekday::Sun));
        // Two full weeks minus two Sundays.
        let days: std::collections::BTreeSet<NaiveDate> =
            planner.sessions().iter().map(|s| s.date).collect();
        assert_eq!(days.len(), 12);
    }

    #[test]
    fn test_session_kind_rules() {
        // 2026-03-07 is a Saturday.
        assert_eq!(session_kind(date(2026, 3, 7)), SessionKind::MockTest);
        // Day 9: divisible by 3.
        assert_eq!(session_kind(date(2026, 3, 9)), SessionKind::Revision);
        // Day 10: divisible by 5, not 3.
        assert_eq!(session_kind(date(2026, 3, 10)), SessionKind::Practice);
        // Day 15: divisible by both; revision wins.
        assert_eq!(session_kind(date(2026, 4, 15)), SessionKind::Revision);
        assert_eq!(session_kind(date(2026, 3, 11)), SessionKind::Study);
    }

    #[test]
    fn test_blocks_ordered_by_hours_with_breaks() {
        let sessions = sessions_for_day(
            date(2026, 3, 2),
            &allocate(&[goal("Physics", 5, 8), goal("Chemistry", 6, 8)], 20.0).unwrap(),
        );
        assert_eq!(sessions[0].subject, "Physics");
        assert_eq!(sessions[0].start, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        // 12h/week -> 120 minutes.
        assert_eq!(sessions[0].duration_mins, 120);
        // Next block starts after the session plus a 15 minute break.
        assert_eq!(
            sessions[1].start,
            NaiveTime::from_hms_opt(11, 15, 0).unwrap()
        );
        // 8h/week -> 80 minutes.
        assert_eq!(sessions[1].duration_mins, 80);
    }

    #[test]
    fn test_overfull_day_drops_blocks_instead_of_wrapping() {
        // 168h/week over three equal gaps -> 560-minute blocks; only the
        // first fits between 09:00 and 22:00.
        let sessions = sessions_for_day(
            date(2026, 3, 2),
            &allocate(
                &[goal("Physics", 5, 8), goal("Chemistry", 4, 7), goal("Maths", 6, 9)],
                168.0,
            )
            .unwrap(),
        );
        assert_eq!(sessions.len(), 1);
        let end = NaiveTime::from_hms_opt(22, 0, 0).unwrap();
        for (i, session) in sessions.iter().enumerate() {
            assert!(session.start + Duration::minutes(session.duration_mins) <= end);
            if i > 0 {
                assert!(session.start > sessions[i - 1].start);
            }
        }
    }

    #[test]
    fn test_minimum_session_length() {
        let sessions = sessions_for_day(
            date(2026, 3, 2),
            &allocate(&[goal("Physics", 5, 6), goal("Chemistry", 5, 10)], 6.0).unwrap(),
        );
        assert!(sessions.iter().all(|s| s.duration_mins >= 30));
    }

    #[test]
    fn test_horizon_capped_at_ninety_days() {
        let mut planner = StudyPlanner::new();
        let today = date(2026, 3, 2);
        planner
            .set_plan(date(2027, 3, 2), "NEET", Level::Intermediate, 10.0, &[goal("Biology", 4, 9)], today)
            .unwrap();
        let last = planner.sessions().iter().map(|s| s.date).max().unwrap();
        assert!(last < today + Duration::days(MAX_HORIZON_DAYS));
    }

    #[test]
    fn test_regeneration_preserves_past_sessions() {
        let mut planner = StudyPlanner::new();
        let today = date(2026, 3, 2);
        planner
            .set_plan(date(2026, 5, 1), "JEE", Level::Beginner, 12.0, &[goal("Physics", 5, 8)], today)
            .unwrap();

        let later = date(2026, 3, 10);
        let past_before: Vec<StudySession> = planner
            .sessions()
            .iter()
            .filter(|s| s.date < later)
            .cloned()
            .collect();

        planner.regenerate_calendar(later).unwrap();
        let past_after: Vec<&StudySession> = planner
            .sessions()
            .iter()
            .filter(|s| s.date < later)
            .collect();
        assert_eq!(past_before.len(), past_after.len());

        // Running it again for the same day is a no-op in count.
        let count = planner.sessions().len();
        planner.regenerate_calendar(later).unwrap();
        assert_eq!(planner.sessions().len(), count);
    }

    #[test]
    fn test_rejects_past_exam_date() {
        let mut planner = StudyPlanner::new();
        let today = date(2026, 3, 2);
        assert!(planner
            .set_plan(today, "JEE", Level::Beginner, 10.0, &[goal("Physics", 5, 8)], today)
            .is_err());
    }
}
