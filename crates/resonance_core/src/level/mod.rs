//! Aggregate resonance level derivation.
//!
//! # Responsibility
//! - Reduce a snapshot of entries into one bounded level score.
//! - Map a level onto display bands, progress tones and messages.
//!
//! # Invariants
//! - Every function here is pure, total and free of I/O.
//! - Levels are recomputed from the full snapshot on every call; nothing is
//!   cached or updated incrementally.

pub mod band;
pub mod calculator;
