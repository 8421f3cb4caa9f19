//! One-time import paths from older journal storage.
//!
//! # Responsibility
//! - Move externally stored entries into the SQLite store through the
//!   regular creation contract.
//!
//! # Invariants
//! - Import is best-effort: failures are logged and counted, never raised.

pub mod legacy;
