//! Core domain logic for the resonance journal.
//! This crate is the single source of truth for entry invariants and the
//! level derivation.

pub mod config;
pub mod db;
pub mod import;
pub mod level;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{AppConfig, ConfigError, ConfigOverrides};
pub use import::legacy::{import_legacy_file, import_legacy_json, ImportReport};
pub use level::band::{band_for_level, LevelBand, LevelSummary, ProgressTone, LEVEL_BANDS};
pub use level::calculator::{calculate_level, Polarized, ResonanceLevel};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::entry::{
    EntryId, EntryValidationError, ResonanceEntry, ResonanceKind, NOTE_MAX_CHARS,
};
pub use repo::entry_repo::{
    EntryListQuery, EntryRepository, RepoError, RepoResult, SqliteEntryRepository,
};
pub use service::entry_service::{
    parse_entry_id, parse_occurred_at, EntryService, ServiceError,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
