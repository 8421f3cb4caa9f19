//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes enforce `ResonanceEntry::validate()` before persistence.
//! - Missing rows surface as `RepoError::NotFound`, never as validation errors.

pub mod entry_repo;
