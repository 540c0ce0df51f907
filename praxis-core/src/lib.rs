//! Core learning-progress engine.
//!
//! Pure, synchronous state: the unit catalog, the progress record, the
//! SM-2 review scheduler, the prerequisite unlock graph, and the
//! gamification rules (score, levels, streaks, combos, badges). The
//! [`ProgressStore`] ties them together and exposes the mutation actions;
//! everything network-facing lives in the sync crate, which observes the
//! store through its revision watch channel.

pub mod badges;
pub mod cache;
pub mod catalog;
pub mod clock;
pub mod error;
pub mod gamify;
pub mod graph;
pub mod record;
pub mod scheduler;
pub mod store;

pub use cache::{LocalCache, MemoryCache};
pub use catalog::{BadgeCondition, BadgeDef, Catalog, LearningUnit};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{CoreError, Result};
pub use gamify::{Level, LevelProgress, LEVELS};
pub use graph::UnlockGraph;
pub use record::{DailyChallengeState, ProgressRecord, ReviewState};
pub use scheduler::{schedule, INITIAL_EASE, MIN_EASE};
pub use store::ProgressStore;
