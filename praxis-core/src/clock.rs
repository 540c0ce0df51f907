//! Clock abstraction for date-dependent logic.
//!
//! Streak breaks, daily-challenge resets, and review due dates all depend
//! on "today". Injecting the clock keeps that logic deterministic in tests
//! without touching real time.

use std::sync::Mutex;

use chrono::{NaiveDate, Utc};

/// Source of the current calendar day (day granularity, no time-of-day).
pub trait Clock: Send + Sync {
    /// The current calendar date.
    fn today(&self) -> NaiveDate;
}

/// Clock backed by the system time (UTC).
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Clock pinned to a settable date, for tests.
#[derive(Debug)]
pub struct FixedClock {
    date: Mutex<NaiveDate>,
}

impl FixedClock {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date: Mutex::new(date),
        }
    }

    /// Move the pinned date.
    pub fn set(&self, date: NaiveDate) {
        *self.date.lock().unwrap() = date;
    }

    /// Advance the pinned date by whole days.
    pub fn advance_days(&self, days: i64) {
        let mut date = self.date.lock().unwrap();
        *date += chrono::Duration::days(days);
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        *self.date.lock().unwrap()
    }
}
