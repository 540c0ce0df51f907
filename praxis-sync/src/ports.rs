//! External persistence ports.
//!
//! The controller speaks to the outside world only through these traits:
//! a remote read side for hydration, an ordered list of write channels
//! for pushes, and a synchronous fire-and-forget transport for exit
//! flushes.

use async_trait::async_trait;
use praxis_core::ProgressRecord;

use crate::error::Result;
use crate::payload::PushPayload;

/// Result of a remote read. `Absent` is the normal first-session state,
/// distinct from an error or timeout.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Found(ProgressRecord),
    Absent,
}

/// Remote read side used once per session, at hydration.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn load_progress(&self, learner_id: &str) -> Result<LoadOutcome>;
}

/// Delivery options for a write.
#[derive(Debug, Clone, Copy, Default)]
pub struct WriteOptions {
    /// Hint that the write happens during teardown and must not contend
    /// with interactive traffic.
    pub low_priority: bool,
}

/// One write strategy. Channels are tried in order; each must upsert by
/// learner id so a payload can be replayed on any of them.
#[async_trait]
pub trait WriteChannel: Send + Sync {
    /// Stable name for logs and error messages.
    fn name(&self) -> &'static str;

    async fn write_progress(&self, payload: &PushPayload, options: WriteOptions) -> Result<()>;
}

/// Non-blocking transport that survives session teardown. `send` returns
/// whether the payload was accepted for delivery; there is no completion
/// signal by design of the exit path.
pub trait ExitTransport: Send + Sync {
    fn send(&self, payload: &PushPayload) -> bool;
}
