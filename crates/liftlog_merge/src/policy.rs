//! Per-kind conflict resolution policies.
//!
//! Each policy is a pure function of the local view of a record and the
//! remote copy, returning a [`Resolution`] that the download merger
//! executes. Keeping the policies named and separate from the merge loop
//! makes them swappable per record kind.

use liftlog_model::{
    canonicalize_name, BodyMeasurement, CustomExercise, PersonalRecord, WorkoutSession,
    WorkoutTemplate,
};
use std::collections::HashSet;

/// What the local store holds for a given record id.
#[derive(Debug)]
pub enum LocalView<'a, T> {
    /// The id is unknown locally.
    Absent,
    /// An active local copy exists.
    Active(&'a T),
    /// A local soft-delete tombstone exists.
    Tombstoned,
}

/// Outcome of applying a policy to one remote record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// No local copy; insert the remote record. Counts as "added".
    Insert,
    /// Replace the local copy wholesale. Counts as "conflict resolved".
    AcceptRemote,
    /// The local copy is strictly newer; leave it untouched.
    KeepLocal,
    /// A local tombstone (or pending deletion) wins; ignore the remote copy.
    SkipTombstoned,
    /// Zombie exercise: tombstoned locally, active remotely. Revive it.
    Revive,
    /// The remote copy is itself deleted; hard-purge the local copy.
    PurgeLocal,
}

/// Handling for a remote record that is itself a tombstone.
///
/// The remote side already holds the final state, so an active local copy is
/// purged outright with no local tombstone of its own.
fn resolve_remote_tombstone<T>(local: &LocalView<'_, T>) -> Resolution {
    match local {
        LocalView::Active(_) => Resolution::PurgeLocal,
        LocalView::Absent | LocalView::Tombstoned => Resolution::SkipTombstoned,
    }
}

/// The RemoteWins policy: the cloud copy is authoritative on id collision.
fn remote_wins<T>(local: &LocalView<'_, T>) -> Resolution {
    match local {
        LocalView::Absent => Resolution::Insert,
        LocalView::Active(_) => Resolution::AcceptRemote,
        LocalView::Tombstoned => Resolution::SkipTombstoned,
    }
}

/// Sessions: RemoteWins. Once uploaded, the cloud copy is authoritative.
pub fn resolve_session(
    local: LocalView<'_, WorkoutSession>,
    remote: &WorkoutSession,
) -> Resolution {
    if remote.sync.is_tombstone() {
        return resolve_remote_tombstone(&local);
    }
    remote_wins(&local)
}

/// Personal records: RemoteWins.
///
/// Safe because PRs are derived data; both sides converge to the same
/// deterministic answer once either side's set history is complete.
pub fn resolve_personal_record(
    local: LocalView<'_, PersonalRecord>,
    remote: &PersonalRecord,
) -> Resolution {
    if remote.sync.is_tombstone() {
        return resolve_remote_tombstone(&local);
    }
    remote_wins(&local)
}

/// Templates: last-write-wins on `updated_at`.
pub fn resolve_template(
    local: LocalView<'_, WorkoutTemplate>,
    remote: &WorkoutTemplate,
) -> Resolution {
    if remote.sync.is_tombstone() {
        return resolve_remote_tombstone(&local);
    }
    match local {
        LocalView::Absent => Resolution::Insert,
        LocalView::Tombstoned => Resolution::SkipTombstoned,
        LocalView::Active(ours) => {
            if ours.updated_at > remote.updated_at {
                Resolution::KeepLocal
            } else {
                Resolution::AcceptRemote
            }
        }
    }
}

/// Custom exercises: prefer remote, but revive local zombies.
pub fn resolve_exercise(
    local: LocalView<'_, CustomExercise>,
    remote: &CustomExercise,
) -> Resolution {
    if remote.sync.is_tombstone() {
        return resolve_remote_tombstone(&local);
    }
    match local {
        LocalView::Absent => Resolution::Insert,
        LocalView::Active(_) => Resolution::AcceptRemote,
        LocalView::Tombstoned => Resolution::Revive,
    }
}

/// Measurements: RemoteWins, except ids on the local pending-deletion list.
pub fn resolve_measurement(
    local: LocalView<'_, BodyMeasurement>,
    pending_deletion: bool,
    remote: &BodyMeasurement,
) -> Resolution {
    if pending_deletion {
        return Resolution::SkipTombstoned;
    }
    if remote.sync.is_tombstone() {
        return resolve_remote_tombstone(&local);
    }
    remote_wins(&local)
}

/// Picks a name for a revived exercise, renaming on collision.
///
/// `taken` holds the canonical names of the owner's *active* exercises.
pub fn revived_name(desired: &str, taken: &HashSet<String>) -> String {
    unique_name(desired, " (Revived)", taken)
}

/// Picks a name for a newly inserted exercise, renaming on collision.
pub fn disambiguated_name(desired: &str, taken: &HashSet<String>) -> String {
    unique_name(desired, " (2)", taken)
}

fn unique_name(desired: &str, suffix: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(&canonicalize_name(desired)) {
        return desired.to_string();
    }
    let first = format!("{desired}{suffix}");
    if !taken.contains(&canonicalize_name(&first)) {
        return first;
    }
    // Suffixed name is taken too; count upwards until one is free.
    let mut n = 2u32;
    loop {
        let candidate = format!("{first} ({n})");
        if !taken.contains(&canonicalize_name(&candidate)) {
            return candidate;
        }
        n += 1;
    }
}
