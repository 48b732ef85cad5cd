//! Error types for loopaudit.
//!
//! All errors are strongly typed using thiserror. The audit layer itself
//! introduces no failure kind of its own: an uncovered read is reported
//! through the diagnostic sinks, never as an error value. The enums here
//! describe the collaborator contracts (data-access client, control-loop
//! engine) whose failures pass through the audit wrappers unchanged.

use thiserror::Error;

use crate::object::ObjectKey;

/// Errors surfaced by an [`ObjectStore`](crate::store::ObjectStore) collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No object is stored under the requested key.
    #[error("object not found: {key}")]
    NotFound {
        /// Key the read was issued for.
        key: ObjectKey,
    },

    /// Backend error.
    #[error("store backend error: {message}")]
    Backend {
        /// Backend-supplied description.
        message: String,
    },
}

/// Errors surfaced by a [`Controller`](crate::controller::Controller) collaborator.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Controller construction failed.
    #[error("controller construction failed: {message}")]
    Construction {
        /// Engine-supplied description.
        message: String,
    },

    /// The engine rejected a watch registration.
    #[error("watch registration failed: {message}")]
    Registration {
        /// Engine-supplied description.
        message: String,
    },

    /// Backend error.
    #[error("controller backend error: {message}")]
    Backend {
        /// Engine-supplied description.
        message: String,
    },
}

/// Top-level error type for loopaudit.
///
/// Hosts composing both collaborator seams can funnel either error through
/// this enum; the audit wrappers themselves always return the collaborator's
/// own error type unchanged.
#[derive(Debug, Error)]
pub enum LoopAuditError {
    /// A data-access failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A control-loop engine failure.
    #[error("controller error: {0}")]
    Controller(#[from] ControllerError),
}

impl LoopAuditError {
    /// Returns true if this is a store error.
    #[must_use]
    pub const fn is_store(&self) -> bool {
        matches!(self, Self::Store(_))
    }

    /// Returns true if this is a controller error.
    #[must_use]
    pub const fn is_controller(&self) -> bool {
        matches!(self, Self::Controller(_))
    }
}

/// Result alias for loopaudit operations.
pub type AuditResult<T> = Result<T, LoopAuditError>;
