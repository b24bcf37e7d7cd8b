//! Feed boundary errors.
//!
//! None of these stop the engine: the adapter logs them and keeps showing the
//! last good frame.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeedError {
    /// Payload could not be turned into a `VibeFrame`.
    #[error("malformed vibe frame: {reason}")]
    MalformedFrame { reason: String },

    /// A named event the adapter does not listen for.
    #[error("unknown feed event '{0}'")]
    UnknownEvent(String),

    /// Delivery after the adapter was released.
    #[error("feed adapter released")]
    Detached,
}

impl FeedError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        FeedError::MalformedFrame {
            reason: reason.into(),
        }
    }
}
