//! Error types for praxis-sync

use thiserror::Error;

/// Error type for synchronization operations.
///
/// All remote I/O failures are caught at the controller boundary and
/// converted into state transitions or retry-queue entries; the variants
/// here are what callers see at the session-facing surface.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Hydration did not complete within the configured timeout
    #[error("Hydration timed out after {0}ms")]
    HydrationTimeout(u64),

    /// The remote record could not be read
    #[error("Hydration failed: {0}")]
    HydrationFailed(String),

    /// A write channel rejected the payload
    #[error("Write channel '{channel}' failed: {reason}")]
    ChannelWrite { channel: String, reason: String },

    /// Serialization of a payload or config failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Config file could not be parsed
    #[error("Config parse error: {0}")]
    ConfigParse(String),

    /// No usable data directory on this platform
    #[error("No data directory available")]
    NoDataDir,

    /// IO operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for synchronization operations
pub type Result<T> = std::result::Result<T, SyncError>;
