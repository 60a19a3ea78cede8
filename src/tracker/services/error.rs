//! Service-level failure taxonomy.

use crate::tracker::{
    domain::{AccessDenied, TaskId, TaskStatus, TrackerDomainError, Username},
    ports::{RecordKind, TrackerStoreError},
};
use thiserror::Error;
use uuid::Uuid;

/// Coarse classification of a [`TrackerError`], used by outer layers to pick
/// a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The actor lacks permission.
    Forbidden,
    /// The status change is not an allowed edge.
    InvalidTransition,
    /// The operation is never allowed on this entity state.
    InvalidOperation,
    /// A referenced entity or user does not exist.
    NotFound,
    /// Input failed validation.
    Validation,
    /// Infrastructure failure.
    Store,
}

/// Errors returned by [`super::TrackerService`] operations.
#[derive(Debug, Clone, Error)]
pub enum TrackerError {
    /// Permission evaluation denied the action.
    #[error(transparent)]
    Forbidden(#[from] AccessDenied),

    /// The requested status change is not permitted.
    #[error("task {task_id} cannot move from {from} to {to}")]
    InvalidTransition {
        /// Task whose status change was rejected.
        task_id: TaskId,
        /// Current status.
        from: TaskStatus,
        /// Requested status.
        to: TaskStatus,
    },

    /// The operation is structurally disallowed, such as removing the creator.
    #[error("invalid operation: {0}")]
    InvalidOperation(TrackerDomainError),

    /// A referenced record does not exist.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Kind of record.
        kind: RecordKind,
        /// Missing identifier.
        id: Uuid,
    },

    /// No user holds the handle.
    #[error("user not found: {0}")]
    UnknownUsername(Username),

    /// Input was rejected by domain validation.
    #[error("validation failed: {0}")]
    Validation(TrackerDomainError),

    /// Store operation failed.
    #[error(transparent)]
    Store(TrackerStoreError),
}

impl TrackerError {
    /// Builds a not-found error for `id`.
    #[must_use]
    pub fn not_found(kind: RecordKind, id: impl AsRef<Uuid>) -> Self {
        Self::NotFound {
            kind,
            id: *id.as_ref(),
        }
    }

    /// Classifies the error.
    ///
    /// Store-level duplicate usernames count as validation failures and
    /// store-level missing records as not found.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::Forbidden(_) => FailureKind::Forbidden,
            Self::InvalidTransition { .. } => FailureKind::InvalidTransition,
            Self::InvalidOperation(_) => FailureKind::InvalidOperation,
            Self::NotFound { .. }
            | Self::UnknownUsername(_)
            | Self::Store(TrackerStoreError::NotFound { .. }) => FailureKind::NotFound,
            Self::Validation(_) | Self::Store(TrackerStoreError::DuplicateUsername(_)) => {
                FailureKind::Validation
            }
            Self::Store(_) => FailureKind::Store,
        }
    }
}

impl From<TrackerStoreError> for TrackerError {
    fn from(err: TrackerStoreError) -> Self {
        match err {
            TrackerStoreError::AssigneeNotMember {
                project_id,
                user_id,
            } => Self::Validation(TrackerDomainError::AssigneeNotMember {
                project_id,
                user_id,
            }),
            other => Self::Store(other),
        }
    }
}

impl From<TrackerDomainError> for TrackerError {
    fn from(err: TrackerDomainError) -> Self {
        match err {
            TrackerDomainError::InvalidStatusTransition { task_id, from, to } => {
                Self::InvalidTransition { task_id, from, to }
            }
            TrackerDomainError::CreatorRemoval { .. } => Self::InvalidOperation(err),
            other => Self::Validation(other),
        }
    }
}

/// Result type for tracker service operations.
pub type TrackerResult<T> = Result<T, TrackerError>;
