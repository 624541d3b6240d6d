//! # LiftLog Sync Engine
//!
//! Offline-first synchronization for LiftLog records.
//!
//! All writes land in the device-local store first; the engine reconciles
//! them with a per-account cloud store whenever connectivity allows. A full
//! sync uploads dirty records and tombstones, then downloads and merges
//! remote collections through per-kind conflict policies, then recomputes
//! personal records from the merged session history.
//!
//! The engine is generic over its collaborators: [`LocalStore`] and
//! [`RemoteStore`] for persistence, [`IdentityProvider`] for the signed-in
//! account, and [`ConnectivityProvider`] for network state. In-memory
//! adapters for all four live in [`memory`].
//!
//! ```
//! use liftlog_model::WorkoutSession;
//! use liftlog_sync_engine::memory::{
//!     MemoryLocalStore, MemoryRemoteStore, MockConnectivity, StaticIdentity,
//! };
//! use liftlog_sync_engine::{SyncConfig, SyncEngine};
//! use std::sync::Arc;
//!
//! let account = liftlog_model::AccountId::new();
//! let engine = SyncEngine::new(
//!     SyncConfig::new(),
//!     Arc::new(MemoryLocalStore::new()),
//!     Arc::new(MemoryRemoteStore::new()),
//!     Arc::new(StaticIdentity::signed_in(account)),
//!     Arc::new(MockConnectivity::new(true)),
//! );
//!
//! engine
//!     .record_local_mutation(WorkoutSession::start(None, "Morning lift", 0).into())
//!     .unwrap();
//! let report = engine.trigger_full_sync();
//! assert!(report.success);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod download;
mod engine;
mod error;
pub mod memory;
mod status;
mod store;
mod upload;

pub use config::{RetryConfig, SyncConfig};
pub use liftlog_merge::PrCandidate;
pub use download::{DownloadMerger, MergeReport};
pub use engine::{SyncEngine, SyncPhase, SyncReport};
pub use error::{SyncError, SyncResult};
pub use status::{StatusCell, SubscriptionId, SyncStatus};
pub use store::{
    ConnectivityProvider, IdentityProvider, LocalStore, RemoteStore, StoreError, StoreResult,
};
pub use upload::{UploadReconciler, UploadReport};
