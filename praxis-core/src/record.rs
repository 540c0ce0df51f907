//! The persisted progress aggregate.
//!
//! One `ProgressRecord` exists per learner. It is mutated only through
//! [`crate::store::ProgressStore`] actions and serialized whole for both
//! the local cache and remote pushes. Collections use `BTreeMap`/`BTreeSet`
//! so snapshots serialize deterministically.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Per-item spaced-repetition state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewState {
    /// Next scheduled review date.
    pub due_date: NaiveDate,
    /// Current interval in days.
    pub interval_days: u32,
    /// SM-2 ease factor, never below 1.3.
    pub ease_factor: f64,
    /// Consecutive successful reviews.
    pub repetition_count: u32,
}

/// Daily-challenge completion state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyChallengeState {
    pub last_completed_date: Option<NaiveDate>,
    pub completed_today: bool,
}

/// The mutable, persisted progress aggregate for one learner.
///
/// Created empty on a learner's first session; fully replaced by
/// hydration; destroyed only by an explicit reset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    /// Units marked complete.
    pub completed_units: BTreeSet<String>,

    /// Units whose full exercise set was answered correctly.
    pub mastered_units: BTreeSet<String>,

    /// Unit id -> exercise indices answered correctly.
    pub exercise_outcomes: BTreeMap<String, BTreeSet<u32>>,

    /// Total gamified score. Non-negative, monotone except on reset.
    pub total_score: u64,

    /// Consecutive active days.
    pub streak_length: u32,

    /// Last day with any progress-affecting activity.
    pub last_active_date: Option<NaiveDate>,

    /// Streak-freeze consumables held. Spending is an explicit action.
    pub streak_freezes: u32,

    /// Current consecutive-correct counter.
    pub combo_count: u32,

    /// Historical maximum of `combo_count`.
    pub best_combo: u32,

    /// Badge ids earned, each at most once.
    pub badges_earned: BTreeSet<String>,

    /// Review-item key (unit or exercise id) -> scheduling state.
    pub review_queue: BTreeMap<String, ReviewState>,

    pub daily_challenge: DailyChallengeState,
}

impl ProgressRecord {
    /// Exercise indices answered correctly for a unit.
    pub fn outcomes_for(&self, unit_id: &str) -> Option<&BTreeSet<u32>> {
        self.exercise_outcomes.get(unit_id)
    }

    /// Count of correct exercises across the given unit ids.
    pub fn correct_count_in(&self, unit_ids: &[&str]) -> usize {
        unit_ids
            .iter()
            .filter_map(|id| self.exercise_outcomes.get(*id))
            .map(|set| set.len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_default_record_is_empty() {
        let record = ProgressRecord::default();
        assert!(record.completed_units.is_empty());
        assert_eq!(record.total_score, 0);
        assert_eq!(record.streak_length, 0);
        assert!(record.last_active_date.is_none());
        assert!(!record.daily_challenge.completed_today);
    }

    #[test]
    fn test_snapshot_round_trip_is_identical() {
        let mut record = ProgressRecord::default();
        record.completed_units.insert("limits".into());
        record
            .exercise_outcomes
            .entry("limits".into())
            .or_default()
            .extend([0, 2, 5]);
        record.total_score = 135;
        record.streak_length = 4;
        record.last_active_date = Some(date(2025, 6, 1));
        record.badges_earned.insert("week-streak".into());
        record.review_queue.insert(
            "limits".into(),
            ReviewState {
                due_date: date(2025, 6, 4),
                interval_days: 3,
                ease_factor: 2.6,
                repetition_count: 2,
            },
        );
        record.daily_challenge = DailyChallengeState {
            last_completed_date: Some(date(2025, 6, 1)),
            completed_today: true,
        };

        let json = serde_json::to_string(&record).unwrap();
        let parsed: ProgressRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_serialization_is_deterministic() {
        let mut record = ProgressRecord::default();
        // Insertion order differs from sorted order on purpose.
        for unit in ["vectors", "derivatives", "limits"] {
            record.completed_units.insert(unit.into());
        }
        let a = serde_json::to_string(&record).unwrap();
        let b = serde_json::to_string(&record.clone()).unwrap();
        assert_eq!(a, b);
        // BTreeSet serializes sorted.
        assert!(a.find("derivatives").unwrap() < a.find("limits").unwrap());
    }

    #[test]
    fn test_correct_count_in_ignores_unknown_units() {
        let mut record = ProgressRecord::default();
        record
            .exercise_outcomes
            .entry("limits".into())
            .or_default()
            .extend([0, 1]);
        assert_eq!(record.correct_count_in(&["limits", "no-such-unit"]), 2);
    }
}
