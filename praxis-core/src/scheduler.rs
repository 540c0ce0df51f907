//! Spaced-repetition scheduler (SM-2).
//!
//! Pure function from a prior review state and a recall quality score to
//! the next state. No I/O; the current date is passed in.

use chrono::{Duration, NaiveDate};

use crate::record::ReviewState;

/// Ease factor assigned to a never-reviewed item.
pub const INITIAL_EASE: f64 = 2.5;

/// Lower bound the ease factor can never drop below.
pub const MIN_EASE: f64 = 1.3;

/// Compute the next review state for an item.
///
/// `quality` is a caller-supplied 0-5 recall rating; values above 5 are
/// clamped. Below 3 counts as a failed recall: the repetition count and
/// interval reset. On success the interval follows the 1, 3,
/// round(previous x ease) ladder. The ease factor is updated on every
/// call, pass or fail, and never drops below [`MIN_EASE`].
pub fn schedule(prior: Option<&ReviewState>, quality: u8, today: NaiveDate) -> ReviewState {
    let (mut interval, ease, reps) = match prior {
        Some(s) => (s.interval_days, s.ease_factor, s.repetition_count),
        None => (1, INITIAL_EASE, 0),
    };

    let repetition_count = if quality < 3 {
        interval = 1;
        0
    } else {
        interval = match reps {
            0 => 1,
            1 => 3,
            _ => ((f64::from(interval) * ease).round() as u32).max(1),
        };
        reps + 1
    };

    let q = f64::from(quality.min(5));
    let ease_factor = (ease + (0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02))).max(MIN_EASE);

    ReviewState {
        due_date: today + Duration::days(i64::from(interval)),
        interval_days: interval,
        ease_factor,
        repetition_count,
    }
}
