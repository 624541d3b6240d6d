//! # LiftLog Merge
//!
//! Pure decision logic for the LiftLog sync engine:
//!
//! - Per-kind conflict resolution policies (RemoteWins for sessions and
//!   personal records, last-write-wins for templates, revive-with-rename for
//!   zombie exercises, pending-deletion handling for measurements).
//! - The deterministic personal-record recalculation reducer.
//!
//! Nothing in this crate performs I/O; the sync engine feeds it local and
//! remote state and executes the returned decisions.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod policy;
mod pr;

pub use policy::{
    disambiguated_name, resolve_exercise, resolve_measurement, resolve_personal_record,
    resolve_session, resolve_template, revived_name, LocalView, Resolution,
};
pub use pr::{recalculate, rebuild_records, session_new_bests, PrCandidate, RebuildOutcome};
