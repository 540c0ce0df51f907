//! Gamification rules: levels, streaks, combo multiplier.
//!
//! All pure functions over plain values; the store applies them and owns
//! the side effects.

use chrono::{Duration, NaiveDate};

/// A score threshold paired with its level label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Level {
    pub threshold: u64,
    pub label: &'static str,
}

/// Strictly ordered level ladder.
pub const LEVELS: &[Level] = &[
    Level {
        threshold: 0,
        label: "Novice",
    },
    Level {
        threshold: 200,
        label: "Apprentice",
    },
    Level {
        threshold: 500,
        label: "Expert",
    },
    Level {
        threshold: 750,
        label: "Champion",
    },
    Level {
        threshold: 1000,
        label: "Master",
    },
    Level {
        threshold: 2000,
        label: "Legend",
    },
    Level {
        threshold: 3500,
        label: "Invincible",
    },
];

/// The highest level whose threshold does not exceed the score.
pub fn level_for(score: u64) -> &'static Level {
    LEVELS
        .iter()
        .rev()
        .find(|l| score >= l.threshold)
        .unwrap_or(&LEVELS[0])
}

/// The next level above the score, if any.
pub fn next_level(score: u64) -> Option<&'static Level> {
    LEVELS.iter().find(|l| l.threshold > score)
}

/// Progress within the current level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelProgress {
    /// Score accumulated past the current threshold.
    pub into_level: u64,
    /// Width of the current level band (0 at the top level).
    pub span: u64,
    /// Percent toward the next level, clamped to 100.
    pub percent: u8,
}

pub fn level_progress(score: u64) -> LevelProgress {
    let current = level_for(score);
    match next_level(score) {
        Some(next) => {
            let span = next.threshold - current.threshold;
            let into_level = score - current.threshold;
            let percent = ((into_level * 100) / span).min(100) as u8;
            LevelProgress {
                into_level,
                span,
                percent,
            }
        }
        None => LevelProgress {
            into_level: score - current.threshold,
            span: 0,
            percent: 100,
        },
    }
}

/// Streak continuation rule. Idempotent within a day; a one-day gap
/// extends the streak; anything longer resets it to 1. The freeze
/// consumable is spent by an explicit store action before this runs,
/// never here.
pub fn advance_streak(last_active: Option<NaiveDate>, current: u32, today: NaiveDate) -> u32 {
    match last_active {
        None => 1,
        Some(d) if d == today => current,
        Some(d) if d == today - Duration::days(1) => current + 1,
        Some(_) => 1,
    }
}

/// Step-function score multiplier for consecutive correct answers.
pub fn combo_multiplier(combo: u32) -> f64 {
    if combo >= 10 {
        2.0
    } else if combo >= 5 {
        1.5
    } else if combo >= 3 {
        1.25
    } else {
        1.0
    }
}

/// Bonus multiplier for completing the daily challenge on a streak.
pub fn daily_challenge_multiplier(streak: u32) -> f64 {
    if streak >= 5 {
        1.5
    } else if streak >= 3 {
        1.25
    } else {
        1.0
    }
}
