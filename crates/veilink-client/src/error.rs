// ============================================
// File: crates/veilink-client/src/error.rs
// ============================================
//! # Client Error Types

use thiserror::Error;

use veilink_common::error::CommonError;
use veilink_common::types::RequestId;
use veilink_core::error::CoreError;

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Client error types.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Invalid configuration value.
    #[error("Invalid configuration: {field} - {reason}")]
    ConfigInvalid {
        /// The offending field.
        field: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Too many link requests are already awaiting results.
    #[error("Pending link limit reached: max {limit} in flight")]
    PendingLimitReached {
        /// The configured capacity bound.
        limit: usize,
    },

    /// A pending link already exists under this request id.
    ///
    /// The existing context is left untouched; the caller should
    /// generate a fresh id and retry.
    #[error("Duplicate link request: {0}")]
    DuplicateRequest(RequestId),

    /// No pending link matches the result event's request id.
    ///
    /// Either the id was never issued, the entry expired, or the
    /// result was already consumed once.
    #[error("Unknown or expired link request: {0}")]
    UnknownRequest(RequestId),

    /// Error from the codec.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Error from the common crate.
    #[error(transparent)]
    Common(#[from] CommonError),
}

impl ClientError {
    /// Creates a `ConfigInvalid` error.
    pub fn config_invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConfigInvalid {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Returns `true` if the caller can recover by discarding the
    /// offending result event and carrying on.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::UnknownRequest(_)
            | Self::PendingLimitReached { .. }
            | Self::DuplicateRequest(_) => true,
            Self::Core(core) => core.is_recoverable(),
            Self::ConfigInvalid { .. } | Self::Common(_) => false,
        }
    }
}

// ============================================
// Tests
// ============================================
