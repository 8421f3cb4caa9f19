//! Journal domain model.
//!
//! # Responsibility
//! - Define the persisted resonance entry and its polarity.
//! - Own field validation shared by every write path.
//!
//! # Invariants
//! - Every entry is identified by a stable, non-nil `EntryId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod entry;
