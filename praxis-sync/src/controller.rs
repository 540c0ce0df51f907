//! Synchronization controller.
//!
//! State machine over the session lifecycle: hydrate once at start, then
//! watch the store's revision channel and push the current snapshot after
//! a debounce quiet period. Writes go to an ordered list of channels;
//! when all of them fail the payload is retained as pending and retried
//! on the next online signal. Exit flushes bypass the debounce timer
//! entirely.
//!
//! No raw I/O error escapes this module into the store or the pure
//! helpers; failures become state transitions, the pending slot, or a
//! user-visible notice.

use std::sync::{Arc, Mutex};

use praxis_core::ProgressStore;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::SyncConfig;
use crate::error::{Result, SyncError};
use crate::payload::PushPayload;
use crate::ports::{ExitTransport, LoadOutcome, RemoteStore, WriteChannel, WriteOptions};

/// Why the controller entered the degraded state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegradedReason {
    /// Hydration exceeded the configured timeout.
    Timeout,
    /// The remote read returned an error.
    ReadFailed,
}

/// Controller lifecycle states. Degraded disables all network writes so
/// the session cannot silently diverge from an unknown remote truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Uninitialized,
    Hydrating,
    Ready,
    Degraded(DegradedReason),
}

/// Soft, non-blocking signal surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncNotice {
    /// A push could not be delivered on any channel; it is retained and
    /// will be retried.
    WillRetry,
}

/// State shared between the controller handle and the watcher task.
struct Shared {
    store: Arc<Mutex<ProgressStore>>,
    remote: Arc<dyn RemoteStore>,
    channels: Vec<Arc<dyn WriteChannel>>,
    learner_id: String,
    state: Mutex<SyncState>,
    pending: Mutex<Option<PushPayload>>,
    notice_tx: watch::Sender<Option<SyncNotice>>,
}

impl Shared {
    fn build_payload(&self) -> PushPayload {
        let store = self.store.lock().unwrap();
        PushPayload::new(&self.learner_id, store.revision(), store.snapshot())
    }

    /// Debounced-push endpoint: read current state at send time and try
    /// the channels in order. No-op unless the controller is ready.
    async fn push_current(&self, options: WriteOptions) {
        if *self.state.lock().unwrap() != SyncState::Ready {
            tracing::debug!("Push skipped; controller not ready");
            return;
        }
        let payload = self.build_payload();
        self.try_deliver(payload, options).await;
    }

    /// Ordered write-through. Success on any channel clears the pending
    /// slot and the retry notice; exhausting all channels retains the
    /// payload instead of dropping it.
    async fn try_deliver(&self, payload: PushPayload, options: WriteOptions) {
        for channel in &self.channels {
            match channel.write_progress(&payload, options).await {
                Ok(()) => {
                    tracing::debug!(
                        channel = channel.name(),
                        revision = payload.revision,
                        "Progress pushed"
                    );
                    *self.pending.lock().unwrap() = None;
                    self.notice_tx.send_replace(None);
                    return;
                }
                Err(e) => {
                    tracing::warn!(channel = channel.name(), error = %e, "Write channel failed");
                }
            }
        }
        tracing::warn!(
            revision = payload.revision,
            "All write channels failed; payload retained"
        );
        *self.pending.lock().unwrap() = Some(payload);
        self.notice_tx.send_replace(Some(SyncNotice::WillRetry));
    }
}

/// Orchestrates hydration, debounced pushes, reconnect retries and exit
/// flushes for one session.
pub struct SyncController {
    shared: Arc<Shared>,
    exit: Arc<dyn ExitTransport>,
    config: SyncConfig,
    cancel: CancellationToken,
    watcher: Mutex<Option<JoinHandle<()>>>,
}

impl SyncController {
    pub fn new(
        store: Arc<Mutex<ProgressStore>>,
        remote: Arc<dyn RemoteStore>,
        channels: Vec<Arc<dyn WriteChannel>>,
        exit: Arc<dyn ExitTransport>,
        config: SyncConfig,
        learner_id: impl Into<String>,
    ) -> Self {
        let (notice_tx, _) = watch::channel(None);
        Self {
            shared: Arc::new(Shared {
                store,
                remote,
                channels,
                learner_id: learner_id.into(),
                state: Mutex::new(SyncState::Uninitialized),
                pending: Mutex::new(None),
                notice_tx,
            }),
            exit,
            config,
            cancel: CancellationToken::new(),
            watcher: Mutex::new(None),
        }
    }

    pub fn state(&self) -> SyncState {
        *self.shared.state.lock().unwrap()
    }

    /// Whether an undelivered payload is waiting for a retry.
    pub fn has_pending(&self) -> bool {
        self.shared.pending.lock().unwrap().is_some()
    }

    /// Receiver for the user-visible notice signal.
    pub fn notices(&self) -> watch::Receiver<Option<SyncNotice>> {
        self.shared.notice_tx.subscribe()
    }

    /// Hydrate the store from the remote record, with a bounded timeout.
    ///
    /// A found record fully replaces the in-memory copy; an absent one is
    /// the normal first-session state and leaves the local defaults. On
    /// error or timeout the controller enters the degraded state, network
    /// writes stay disabled, and the returned error is retryable by
    /// calling `hydrate` again.
    pub async fn hydrate(&self) -> Result<()> {
        {
            let mut state = self.shared.state.lock().unwrap();
            if *state == SyncState::Ready {
                return Ok(());
            }
            *state = SyncState::Hydrating;
        }
        self.spawn_watcher();

        // Adopt the local cache first so the session has the last known
        // state even if the remote read fails.
        self.shared.store.lock().unwrap().load_cached();

        let outcome = tokio::time::timeout(
            self.config.hydrate_timeout(),
            self.shared.remote.load_progress(&self.shared.learner_id),
        )
        .await;

        match outcome {
            Ok(Ok(LoadOutcome::Found(record))) => {
                self.shared.store.lock().unwrap().hydrate(record);
                self.set_state(SyncState::Ready);
                tracing::info!("Hydrated from remote record");
                Ok(())
            }
            Ok(Ok(LoadOutcome::Absent)) => {
                self.set_state(SyncState::Ready);
                tracing::info!("No remote record; starting from local state");
                Ok(())
            }
            Ok(Err(e)) => {
                self.set_state(SyncState::Degraded(DegradedReason::ReadFailed));
                tracing::warn!(error = %e, "Hydration failed; writes disabled");
                Err(SyncError::HydrationFailed(e.to_string()))
            }
            Err(_) => {
                self.set_state(SyncState::Degraded(DegradedReason::Timeout));
                tracing::warn!(
                    timeout_ms = self.config.hydrate_timeout_ms,
                    "Hydration timed out; writes disabled"
                );
                Err(SyncError::HydrationTimeout(self.config.hydrate_timeout_ms))
            }
        }
    }

    /// Transition-to-online signal: if a payload is pending, retry the
    /// same ordered channel sequence immediately.
    pub async fn notify_online(&self) {
        let pending = self.shared.pending.lock().unwrap().clone();
        if let Some(payload) = pending {
            tracing::info!(revision = payload.revision, "Online again; retrying pending push");
            self.shared
                .try_deliver(payload, WriteOptions::default())
                .await;
        }
    }

    /// Best-effort flush on session teardown. Does not wait for the
    /// debounce timer and never blocks: the snapshot is handed to the
    /// fire-and-forget transport, or failing that, to a detached
    /// low-priority network write whose result nobody awaits.
    pub fn flush_on_exit(&self) {
        if self.state() != SyncState::Ready {
            return;
        }
        let payload = self.shared.build_payload();
        if self.exit.send(&payload) {
            tracing::debug!(revision = payload.revision, "Exit flush handed to transport");
            return;
        }
        tracing::debug!("Exit transport unavailable; falling back to network write");
        let shared = self.shared.clone();
        tokio::spawn(async move {
            shared
                .try_deliver(payload, WriteOptions { low_priority: true })
                .await;
        });
    }

    /// Cancel the debounce watcher and wait for it to wind down. An
    /// in-flight write is allowed to finish; cancelling it could lose
    /// the only copy of the payload.
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        let handle = self.watcher.lock().unwrap().take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }

    fn set_state(&self, state: SyncState) {
        *self.shared.state.lock().unwrap() = state;
    }

    /// Start the debounce watcher over the store's revision channel.
    /// Idempotent; the task lives until shutdown or the store is gone.
    fn spawn_watcher(&self) {
        let mut slot = self.watcher.lock().unwrap();
        if slot.is_some() {
            return;
        }

        let shared = self.shared.clone();
        let cancel = self.cancel.clone();
        let debounce = self.config.debounce();
        let mut revisions = shared.store.lock().unwrap().subscribe();

        *slot = Some(tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    changed = revisions.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        // Quiet-period loop: every further mutation
                        // restarts the timer.
                        loop {
                            let timer = tokio::time::sleep(debounce);
                            tokio::pin!(timer);
                            tokio::select! {
                                _ = cancel.cancelled() => return,
                                _ = &mut timer => break,
                                changed = revisions.changed() => {
                                    if changed.is_err() {
                                        break;
                                    }
                                }
                            }
                        }
                        shared.push_current(WriteOptions::default()).await;
                    }
                }
            }
            tracing::debug!("Sync watcher stopped");
        }));
    }
}

impl std::fmt::Debug for SyncController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncController")
            .field("state", &self.state())
            .field("has_pending", &self.has_pending())
            .field("learner_id", &self.shared.learner_id)
            .finish()
    }
}
