//! Mock ports for tests.
//!
//! Shipped in the crate (not behind cfg(test)) so integration tests and
//! downstream consumers can drive the controller without a network.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use praxis_core::ProgressRecord;

use crate::error::{Result, SyncError};
use crate::payload::PushPayload;
use crate::ports::{ExitTransport, LoadOutcome, RemoteStore, WriteChannel, WriteOptions};

/// What the mock remote does when asked for the record.
#[derive(Debug, Clone)]
pub enum MockLoadBehavior {
    Found(ProgressRecord),
    Absent,
    Fail(String),
    /// Never answers; exercises the hydration timeout.
    Hang,
}

/// Remote read side with scripted behavior.
pub struct MockRemote {
    behavior: Mutex<MockLoadBehavior>,
}

impl MockRemote {
    pub fn new(behavior: MockLoadBehavior) -> Self {
        Self {
            behavior: Mutex::new(behavior),
        }
    }

    pub fn set_behavior(&self, behavior: MockLoadBehavior) {
        *self.behavior.lock().unwrap() = behavior;
    }
}

#[async_trait]
impl RemoteStore for MockRemote {
    async fn load_progress(&self, _learner_id: &str) -> Result<LoadOutcome> {
        let behavior = self.behavior.lock().unwrap().clone();
        match behavior {
            MockLoadBehavior::Found(record) => Ok(LoadOutcome::Found(record)),
            MockLoadBehavior::Absent => Ok(LoadOutcome::Absent),
            MockLoadBehavior::Fail(reason) => Err(SyncError::HydrationFailed(reason)),
            MockLoadBehavior::Hang => {
                tokio::time::sleep(Duration::from_secs(86_400)).await;
                Ok(LoadOutcome::Absent)
            }
        }
    }
}

/// Write channel that records payloads and can be toggled to fail.
pub struct MockChannel {
    name: &'static str,
    failing: AtomicBool,
    writes: Mutex<Vec<(PushPayload, WriteOptions)>>,
}

impl MockChannel {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            failing: AtomicBool::new(false),
            writes: Mutex::new(Vec::new()),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn write_count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }

    pub fn last_write(&self) -> Option<PushPayload> {
        self.writes.lock().unwrap().last().map(|(p, _)| p.clone())
    }

    pub fn last_options(&self) -> Option<WriteOptions> {
        self.writes.lock().unwrap().last().map(|(_, o)| *o)
    }
}

#[async_trait]
impl WriteChannel for MockChannel {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn write_progress(&self, payload: &PushPayload, options: WriteOptions) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(SyncError::ChannelWrite {
                channel: self.name.to_string(),
                reason: "mock failure".to_string(),
            });
        }
        self.writes.lock().unwrap().push((payload.clone(), options));
        Ok(())
    }
}

/// Exit transport that records accepted payloads.
pub struct MockExitTransport {
    accepting: AtomicBool,
    sent: Mutex<Vec<PushPayload>>,
}

impl MockExitTransport {
    pub fn new(accepting: bool) -> Self {
        Self {
            accepting: AtomicBool::new(accepting),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn last_sent(&self) -> Option<PushPayload> {
        self.sent.lock().unwrap().last().cloned()
    }
}

impl ExitTransport for MockExitTransport {
    fn send(&self, payload: &PushPayload) -> bool {
        if !self.accepting.load(Ordering::SeqCst) {
            return false;
        }
        self.sent.lock().unwrap().push(payload.clone());
        true
    }
}
