//! Error types for overlap-engine operations.
//!
//! A participant with no timezone is deliberately not represented here:
//! the aggregator excludes such participants and projection reports `None`,
//! an expected state rather than an error.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    /// An interval whose start is after its end. Rejected at the store
    /// boundary; never enters canonical storage.
    #[error("invalid interval: start {start} is after end {end}")]
    InvalidInterval { start: String, end: String },

    #[error("unknown participant: {0}")]
    UnknownParticipant(u32),

    #[error("unknown interval: {0}")]
    UnknownInterval(u64),

    #[error("invalid timezone: {0}")]
    InvalidTimezone(String),

    /// A local time could not be mapped to an instant (DST gap wider than
    /// the shift-forward probe allows).
    #[error("normalization failed: {0}")]
    Normalization(String),

    /// Surfaced by a [`crate::sync::SyncDocument`] implementation.
    #[error("sync document error: {0}")]
    Sync(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
