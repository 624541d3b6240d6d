//! Error types for the sync engine.

use crate::store::StoreError;
use liftlog_model::{RecordId, RecordKind};
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur during sync operations.
#[derive(Error, Debug)]
pub enum SyncError {
    /// No account is signed in. A full sync treats this as a no-op, not a
    /// failure.
    #[error("no account is signed in")]
    NotAuthenticated,

    /// No network connectivity. Pending records stay queued and are retried
    /// on reconnect.
    #[error("device is offline")]
    Offline,

    /// The remote store rejected one specific record. The record stays
    /// dirty (or tombstoned) locally for a later retry.
    #[error("remote rejected {kind} {id}: {message}")]
    RemoteRejected {
        /// The record's collection.
        kind: RecordKind,
        /// The record's id.
        id: RecordId,
        /// What the remote reported.
        message: String,
    },

    /// A local or remote store adapter failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The upload phase completed but the download phase failed; the
    /// uploaded count is preserved.
    #[error("download failed after {uploaded} uploads: {message}")]
    PartialFailure {
        /// Records uploaded before the failure.
        uploaded: u64,
        /// What went wrong in the download phase.
        message: String,
    },
}

impl SyncError {
    /// Returns true if a later sync attempt may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            SyncError::Offline
            | SyncError::RemoteRejected { .. }
            | SyncError::PartialFailure { .. } => true,
            SyncError::Store(StoreError::Backend(_)) => true,
            SyncError::NotAuthenticated | SyncError::Store(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_classification() {
        assert!(SyncError::Offline.is_retryable());
        assert!(SyncError::PartialFailure {
            uploaded: 3,
            message: "connection reset".into()
        }
        .is_retryable());
        assert!(!SyncError::NotAuthenticated.is_retryable());
    }

    #[test]
    fn partial_failure_reports_uploaded_count() {
        let err = SyncError::PartialFailure {
            uploaded: 7,
            message: "timeout".into(),
        };
        assert!(err.to_string().contains('7'));
    }
}
