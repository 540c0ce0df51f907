//! The progress store: in-memory authoritative state for the session.
//!
//! All mutations are synchronous and total: no reachable input makes an
//! action fail, and unknown unit identifiers degrade to no-ops. Every
//! state-changing action records activity (streak), re-evaluates badges,
//! writes the record through the local cache, and bumps a revision
//! counter observable over a watch channel. The sync layer debounces on
//! that channel and reads the current snapshot at push time.

use std::sync::Arc;

use tokio::sync::watch;

use crate::badges;
use crate::cache::LocalCache;
use crate::catalog::Catalog;
use crate::clock::Clock;
use crate::gamify;
use crate::graph::UnlockGraph;
use crate::record::{ProgressRecord, ReviewState};
use crate::scheduler::{self, INITIAL_EASE};

/// Base score for a correctly answered exercise, before the combo
/// multiplier.
const EXERCISE_BASE_SCORE: f64 = 10.0;

/// Session-owned progress state with the mutation actions of the engine.
pub struct ProgressStore {
    record: ProgressRecord,
    catalog: Arc<Catalog>,
    graph: UnlockGraph,
    clock: Arc<dyn Clock>,
    cache: Option<Box<dyn LocalCache>>,
    revision: u64,
    revision_tx: watch::Sender<u64>,
}

impl ProgressStore {
    pub fn new(catalog: Arc<Catalog>, clock: Arc<dyn Clock>) -> Self {
        let graph = UnlockGraph::new(&catalog);
        let (revision_tx, _) = watch::channel(0);
        Self {
            record: ProgressRecord::default(),
            catalog,
            graph,
            clock,
            cache: None,
            revision: 0,
            revision_tx,
        }
    }

    /// Attach the local durable cache the store writes through on every
    /// mutation.
    #[must_use]
    pub fn with_cache(mut self, cache: Box<dyn LocalCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Adopt the locally cached record, if one exists. Called before
    /// remote hydration so the session starts from the last known local
    /// state. Returns whether a cached record was found.
    pub fn load_cached(&mut self) -> bool {
        if let Some(record) = self.cache.as_ref().and_then(|c| c.load()) {
            self.record = record;
            true
        } else {
            false
        }
    }

    // ─── Queries ────────────────────────────────────────────────────

    pub fn record(&self) -> &ProgressRecord {
        &self.record
    }

    /// Owned copy of the current record, for outgoing payloads.
    pub fn snapshot(&self) -> ProgressRecord {
        self.record.clone()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Receiver that observes the revision counter; used by the sync
    /// controller's debounce loop.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision_tx.subscribe()
    }

    pub fn is_unit_locked(&self, unit_id: &str) -> bool {
        self.graph.is_locked(unit_id, &self.record.completed_units)
    }

    pub fn unit_depth(&self, unit_id: &str) -> u32 {
        self.graph.depth(unit_id)
    }

    pub fn level(&self) -> &'static gamify::Level {
        gamify::level_for(self.record.total_score)
    }

    pub fn level_progress(&self) -> gamify::LevelProgress {
        gamify::level_progress(self.record.total_score)
    }

    pub fn combo_multiplier(&self) -> f64 {
        gamify::combo_multiplier(self.record.combo_count)
    }

    /// Review-item keys due on or before today.
    pub fn due_reviews(&self) -> Vec<&str> {
        let today = self.clock.today();
        self.record
            .review_queue
            .iter()
            .filter(|(_, state)| state.due_date <= today)
            .map(|(key, _)| key.as_str())
            .collect()
    }

    // ─── Mutations ──────────────────────────────────────────────────

    /// Toggle a unit's completed state. The unit's reward is applied
    /// only on the completing transition; un-completing never removes
    /// score. Returns whether the unit is complete afterwards. Unknown
    /// ids are no-ops.
    pub fn toggle_unit_complete(&mut self, unit_id: &str) -> bool {
        let Some(unit) = self.catalog.unit(unit_id) else {
            tracing::debug!(unit = unit_id, "Ignoring unknown unit");
            return false;
        };

        let now_complete = if self.record.completed_units.contains(unit_id) {
            self.record.completed_units.remove(unit_id);
            false
        } else {
            self.record.completed_units.insert(unit_id.to_string());
            self.record.total_score += u64::from(unit.reward);
            true
        };

        self.after_mutation();
        now_complete
    }

    /// Record the outcome of one exercise attempt. A correct answer
    /// extends the combo and awards `10 x multiplier`; an incorrect
    /// answer resets the combo and awards nothing. Re-recording an
    /// already-correct index is a no-op for scoring and combo. Unknown
    /// unit ids are no-ops.
    pub fn record_exercise_outcome(&mut self, unit_id: &str, index: u32, correct: bool) {
        let Some(unit) = self.catalog.unit(unit_id) else {
            tracing::debug!(unit = unit_id, "Ignoring unknown unit");
            return;
        };
        let exercise_count = unit.exercise_count;

        if correct {
            let outcomes = self
                .record
                .exercise_outcomes
                .entry(unit_id.to_string())
                .or_default();
            if outcomes.insert(index) {
                self.record.combo_count += 1;
                self.record.best_combo = self.record.best_combo.max(self.record.combo_count);

                let multiplier = gamify::combo_multiplier(self.record.combo_count);
                self.record.total_score += (EXERCISE_BASE_SCORE * multiplier).round() as u64;

                if exercise_count > 0 && outcomes.len() as u32 >= exercise_count {
                    self.record.mastered_units.insert(unit_id.to_string());
                }
            }
        } else {
            self.record.combo_count = 0;
        }

        self.after_mutation();
    }

    /// Additive score award (never negative by construction).
    pub fn award_score(&mut self, amount: u32) {
        self.record.total_score += u64::from(amount);
        self.after_mutation();
    }

    /// Complete today's daily challenge. At most once per calendar day;
    /// returns whether the completion was applied. The streak bonus
    /// multiplier uses the streak as of the completion.
    pub fn complete_daily_challenge(&mut self, base_score: u32) -> bool {
        let today = self.clock.today();
        let challenge = &self.record.daily_challenge;
        if challenge.completed_today && challenge.last_completed_date == Some(today) {
            return false;
        }

        let multiplier = gamify::daily_challenge_multiplier(self.record.streak_length);
        self.record.total_score += (f64::from(base_score) * multiplier).round() as u64;
        self.record.daily_challenge.last_completed_date = Some(today);
        self.record.daily_challenge.completed_today = true;

        self.after_mutation();
        true
    }

    /// Seed a review item with a one-day interval due today. Idempotent
    /// if the key is already queued.
    pub fn add_to_review_queue(&mut self, key: &str) {
        if self.record.review_queue.contains_key(key) {
            return;
        }
        let today = self.clock.today();
        self.record.review_queue.insert(
            key.to_string(),
            ReviewState {
                due_date: today,
                interval_days: 1,
                ease_factor: INITIAL_EASE,
                repetition_count: 0,
            },
        );
        self.after_mutation();
    }

    /// Submit a review outcome; delegates scheduling to the SM-2
    /// scheduler. An unqueued key starts from the fresh-item state.
    pub fn submit_review(&mut self, key: &str, quality: u8) {
        let today = self.clock.today();
        let next = scheduler::schedule(self.record.review_queue.get(key), quality, today);
        self.record.review_queue.insert(key.to_string(), next);
        self.after_mutation();
    }

    /// Hand the learner a streak-freeze consumable. Granting is decided
    /// by the surrounding application (purchase, reward, ...).
    pub fn grant_streak_freeze(&mut self) {
        self.record.streak_freezes += 1;
        self.persist_and_notify();
    }

    /// Explicitly spend a held streak freeze to bridge a missed day.
    /// Effective only when exactly one day was missed (the last activity
    /// was the day before yesterday); the gap is rewritten so the next
    /// recorded activity continues the streak. Returns whether a freeze
    /// was spent.
    pub fn spend_streak_freeze(&mut self) -> bool {
        if self.record.streak_freezes == 0 {
            return false;
        }
        let today = self.clock.today();
        let two_days_ago = today - chrono::Duration::days(2);
        if self.record.last_active_date != Some(two_days_ago) {
            return false;
        }

        self.record.streak_freezes -= 1;
        self.record.last_active_date = Some(today - chrono::Duration::days(1));
        tracing::debug!("Streak freeze spent");
        self.persist_and_notify();
        true
    }

    /// Clear the record back to empty defaults. The only destructive
    /// action; does not count as activity.
    pub fn reset(&mut self) {
        self.record = ProgressRecord::default();
        self.persist_and_notify();
    }

    /// Fully replace the in-memory record with the remote one. Called by
    /// the sync controller on the hydration "found" path; lock state and
    /// levels are derived, so no further fixup is needed.
    pub fn hydrate(&mut self, record: ProgressRecord) {
        self.record = record;
        if let Some(cache) = &self.cache {
            cache.store(&self.record);
        }
    }

    // ─── Internal ───────────────────────────────────────────────────

    fn after_mutation(&mut self) {
        self.record_activity();
        self.award_badges();
        self.persist_and_notify();
    }

    fn record_activity(&mut self) {
        let today = self.clock.today();
        self.record.streak_length = gamify::advance_streak(
            self.record.last_active_date,
            self.record.streak_length,
            today,
        );
        self.record.last_active_date = Some(today);

        // Daily-challenge flag rolls over on the first activity of a
        // new day.
        if self.record.daily_challenge.last_completed_date != Some(today) {
            self.record.daily_challenge.completed_today = false;
        }
    }

    fn award_badges(&mut self) {
        let earned: Vec<(String, u64)> = badges::newly_earned(&self.record, &self.catalog)
            .into_iter()
            .map(|b| (b.id.clone(), b.bonus))
            .collect();
        for (id, bonus) in earned {
            tracing::debug!(badge = %id, bonus, "Badge earned");
            self.record.badges_earned.insert(id);
            self.record.total_score += bonus;
        }
    }

    fn persist_and_notify(&mut self) {
        if let Some(cache) = &self.cache {
            cache.store(&self.record);
        }
        self.revision += 1;
        // Receivers may not exist yet (e.g. before the controller
        // attaches); send_replace never fails.
        self.revision_tx.send_replace(self.revision);
    }
}

impl std::fmt::Debug for ProgressStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressStore")
            .field("revision", &self.revision)
            .field("total_score", &self.record.total_score)
            .field("completed_units", &self.record.completed_units.len())
            .field("has_cache", &self.cache.is_some())
            .finish()
    }
}
