//! Synchronization layer for the learning-progress engine.
//!
//! Wraps a [`praxis_core::ProgressStore`] with session-lifecycle
//! plumbing: remote hydration at start, a debounced write-behind push on
//! every mutation, an ordered fallback across write channels, offline
//! retention with retry-on-reconnect, and a best-effort exit flush. All
//! remote I/O goes through the trait ports in [`ports`], so the whole
//! controller is testable against the mocks in [`mock`].

pub mod cache;
pub mod config;
pub mod controller;
pub mod error;
pub mod mock;
pub mod paths;
pub mod payload;
pub mod ports;

pub use cache::JsonFileCache;
pub use config::SyncConfig;
pub use controller::{DegradedReason, SyncController, SyncNotice, SyncState};
pub use error::{Result, SyncError};
pub use payload::PushPayload;
pub use ports::{ExitTransport, LoadOutcome, RemoteStore, WriteChannel, WriteOptions};
