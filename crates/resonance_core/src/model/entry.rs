//! Resonance entry domain model.
//!
//! # Responsibility
//! - Define the canonical journal record and its `positive|negative` kind.
//! - Normalize and validate user-provided note text.
//!
//! # Invariants
//! - `id` is stable and never reused for another entry.
//! - `note` is trimmed, non-empty and at most `NOTE_MAX_CHARS` characters.
//! - `kind` and `occurred_at` never change after creation.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Maximum note length, counted in characters after trimming.
pub const NOTE_MAX_CHARS: usize = 1000;

/// Stable identifier for one journal entry.
pub type EntryId = Uuid;

/// Polarity of a recorded event.
///
/// Creation requests without a kind are treated as positive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResonanceKind {
    /// Something that raised the writer's resonance.
    #[default]
    Positive,
    /// A pattern that needs attention.
    Negative,
}

impl ResonanceKind {
    /// Stable lowercase name used by storage and wire formats.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
        }
    }
}

impl Display for ResonanceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResonanceKind {
    type Err = EntryValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "positive" => Ok(Self::Positive),
            "negative" => Ok(Self::Negative),
            other => Err(EntryValidationError::UnknownKind(other.to_string())),
        }
    }
}

/// Validation failures for entry fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryValidationError {
    /// Note is empty after trimming.
    EmptyNote,
    /// Note carries leading or trailing whitespace.
    UntrimmedNote,
    /// Note exceeds the maximum character count.
    NoteTooLong { max: usize, actual: usize },
    /// Kind is not `positive` or `negative`.
    UnknownKind(String),
    /// Nil UUID cannot identify an entry.
    NilId,
}

impl Display for EntryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyNote => write!(f, "note is required"),
            Self::UntrimmedNote => write!(f, "note must be trimmed before storage"),
            Self::NoteTooLong { max, actual } => {
                write!(f, "note cannot exceed {max} characters (got {actual})")
            }
            Self::UnknownKind(value) => write!(f, "invalid resonance kind `{value}`"),
            Self::NilId => write!(f, "entry id must not be nil"),
        }
    }
}

impl Error for EntryValidationError {}

/// Canonical persisted journal record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResonanceEntry {
    pub id: EntryId,
    /// Trimmed free-text note.
    pub note: String,
    pub kind: ResonanceKind,
    /// Unix epoch milliseconds of when the event happened.
    pub occurred_at: i64,
    /// Storage bookkeeping, epoch milliseconds. Not used in scoring.
    pub created_at: i64,
    /// Storage bookkeeping, epoch milliseconds. Refreshed on note edits.
    pub updated_at: i64,
}

impl ResonanceEntry {
    /// Builds a new entry with a generated ID.
    ///
    /// The note is normalized with [`normalize_note`]; bookkeeping timestamps
    /// start at `occurred_at` until storage assigns its own values.
    pub fn new(
        note: &str,
        kind: ResonanceKind,
        occurred_at: i64,
    ) -> Result<Self, EntryValidationError> {
        Self::with_id(Uuid::new_v4(), note, kind, occurred_at)
    }

    /// Builds an entry with a caller-provided ID.
    ///
    /// # Errors
    /// - `NilId` when `id` is the nil UUID.
    /// - Note errors from [`normalize_note`].
    pub fn with_id(
        id: EntryId,
        note: &str,
        kind: ResonanceKind,
        occurred_at: i64,
    ) -> Result<Self, EntryValidationError> {
        if id.is_nil() {
            return Err(EntryValidationError::NilId);
        }
        Ok(Self {
            id,
            note: normalize_note(note)?,
            kind,
            occurred_at,
            created_at: occurred_at,
            updated_at: occurred_at,
        })
    }

    /// Re-checks invariants on an already constructed entry.
    ///
    /// Write paths call this before touching storage, read paths after
    /// decoding a row.
    pub fn validate(&self) -> Result<(), EntryValidationError> {
        if self.id.is_nil() {
            return Err(EntryValidationError::NilId);
        }
        let normalized = normalize_note(&self.note)?;
        if normalized.len() != self.note.len() {
            return Err(EntryValidationError::UntrimmedNote);
        }
        Ok(())
    }
}

/// Trims a note and enforces the non-empty and length rules.
pub fn normalize_note(note: &str) -> Result<String, EntryValidationError> {
    let trimmed = note.trim();
    if trimmed.is_empty() {
        return Err(EntryValidationError::EmptyNote);
    }
    let actual = trimmed.chars().count();
    if actual > NOTE_MAX_CHARS {
        return Err(EntryValidationError::NoteTooLong {
            max: NOTE_MAX_CHARS,
            actual,
        });
    }
    Ok(trimmed.to_string())
}
