//! Inventory domain model.
//!
//! # Responsibility
//! - Define items and the master records (category, location, tag) they
//!   reference.
//! - Keep mutation rules on the entity, not in callers.
//!
//! # Invariants
//! - Every record is identified by a stable UUID assigned at creation.
//! - Relationships are owned by the item side; reverse lookups are derived.

pub mod item;
pub mod master;

/// Unix epoch milliseconds, the timestamp unit used across core.
pub type EpochMs = i64;

/// Current wall-clock time in epoch milliseconds.
pub fn now_epoch_ms() -> EpochMs {
    chrono::Utc::now().timestamp_millis()
}

/// Time source injected into services; tests pass fixed clocks.
pub type Clock = fn() -> EpochMs;
