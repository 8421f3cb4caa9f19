//! Journal entry use-case service.
//!
//! # Responsibility
//! - Add, edit, delete and read entries with caller-facing defaults.
//! - Derive the resonance level from a fresh storage snapshot.
//!
//! # Invariants
//! - Service APIs never bypass repository validation.
//! - Not-found and bad-input failures stay distinguishable for callers.
//! - The level is recomputed on every call.
//! - Note text never reaches the logs.

use crate::level::band::LevelSummary;
use crate::level::calculator::{calculate_level, ResonanceLevel};
use crate::model::entry::{EntryId, EntryValidationError, ResonanceEntry, ResonanceKind};
use crate::repo::entry_repo::{now_epoch_ms, EntryListQuery, EntryRepository, RepoError};
use chrono::DateTime;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Service error for entry use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Identifier text is not a valid entry ID.
    InvalidId(String),
    /// Occurrence time is not an RFC 3339 timestamp.
    InvalidTimestamp(String),
    /// Caller input failed field validation.
    Validation(EntryValidationError),
    /// Target entry does not exist.
    NotFound(EntryId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Write succeeded but read-back did not match.
    InconsistentState(&'static str),
}

impl ServiceError {
    /// Whether the failure is the caller's fault rather than the store's.
    pub fn is_bad_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidId(_) | Self::InvalidTimestamp(_) | Self::Validation(_)
        )
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidId(value) => write!(f, "invalid entry id `{value}`"),
            Self::InvalidTimestamp(value) => {
                write!(f, "invalid timestamp `{value}`, expected RFC 3339")
            }
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "entry not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent entry state: {details}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<EntryValidationError> for ServiceError {
    fn from(value: EntryValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Parses caller-provided identifier text.
///
/// Surrounding whitespace is ignored; the nil UUID is rejected.
pub fn parse_entry_id(raw: &str) -> Result<EntryId, ServiceError> {
    let trimmed = raw.trim();
    match Uuid::parse_str(trimmed) {
        Ok(id) if !id.is_nil() => Ok(id),
        _ => Err(ServiceError::InvalidId(trimmed.to_string())),
    }
}

/// Parses a caller-provided occurrence time into epoch milliseconds.
pub fn parse_occurred_at(raw: &str) -> Result<i64, ServiceError> {
    let trimmed = raw.trim();
    DateTime::parse_from_rfc3339(trimmed)
        .map(|parsed| parsed.timestamp_millis())
        .map_err(|_| ServiceError::InvalidTimestamp(trimmed.to_string()))
}

/// Entry service facade over repository implementations.
pub struct EntryService<R: EntryRepository> {
    repo: R,
}

impl<R: EntryRepository> EntryService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Records a new entry.
    ///
    /// # Contract
    /// - `kind` defaults to `ResonanceKind::Positive` when absent.
    /// - `occurred_at` defaults to the current time (epoch ms).
    /// - Returns the stored record as read back from the repository.
    pub fn add_entry(
        &self,
        note: &str,
        kind: Option<ResonanceKind>,
        occurred_at: Option<i64>,
    ) -> Result<ResonanceEntry, ServiceError> {
        let kind = kind.unwrap_or_default();
        let entry = ResonanceEntry::new(note, kind, occurred_at.unwrap_or_else(now_epoch_ms))
            .inspect_err(|err| {
                warn!("event=entry_create module=service status=rejected kind={kind} reason={err}");
            })?;

        let id = self.repo.create_entry(&entry)?;
        let stored = self
            .repo
            .get_entry(id)?
            .ok_or(ServiceError::InconsistentState(
                "created entry not found in read-back",
            ))?;

        info!(
            "event=entry_create module=service status=ok entry_id={id} kind={kind} note_chars={}",
            stored.note.chars().count()
        );
        Ok(stored)
    }

    /// Replaces the note of an existing entry and returns the updated record.
    pub fn edit_note(&self, id: EntryId, note: &str) -> Result<ResonanceEntry, ServiceError> {
        self.repo.update_note(id, note)?;
        let updated = self.get_entry(id)?;
        info!("event=entry_edit module=service status=ok entry_id={id}");
        Ok(updated)
    }

    /// Hard-deletes one entry.
    pub fn delete_entry(&self, id: EntryId) -> Result<(), ServiceError> {
        self.repo.delete_entry(id)?;
        info!("event=entry_delete module=service status=ok entry_id={id}");
        Ok(())
    }

    /// Gets one entry, mapping absence to `ServiceError::NotFound`.
    pub fn get_entry(&self, id: EntryId) -> Result<ResonanceEntry, ServiceError> {
        self.repo.get_entry(id)?.ok_or(ServiceError::NotFound(id))
    }

    /// Lists entries newest first.
    pub fn list_entries(&self, query: &EntryListQuery) -> Result<Vec<ResonanceEntry>, ServiceError> {
        Ok(self.repo.list_entries(query)?)
    }

    /// Derives the current level from every stored entry.
    pub fn level(&self) -> Result<ResonanceLevel, ServiceError> {
        let level = calculate_level(self.repo.list_polarities()?);
        info!(
            "event=level_compute module=service status=ok total={} positive={} negative={} level={}",
            level.total, level.positive, level.negative, level.level
        );
        Ok(level)
    }

    /// Current level plus its display band, tone and message.
    pub fn summary(&self) -> Result<LevelSummary, ServiceError> {
        Ok(LevelSummary::from_level(self.level()?))
    }
}
