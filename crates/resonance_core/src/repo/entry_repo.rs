//! Entry repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `entries` table.
//! - Expose a cheap polarity snapshot for level derivation.
//!
//! # Invariants
//! - Write paths call `ResonanceEntry::validate()` before SQL mutations.
//! - Full-row reads reject invalid persisted state instead of masking it.
//! - The polarity snapshot tolerates unknown kinds (see `list_polarities`).

use crate::db::migrations::{current_version, latest_version};
use crate::db::DbError;
use crate::model::entry::{
    normalize_note, EntryId, EntryValidationError, ResonanceEntry, ResonanceKind,
};
use log::warn;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const ENTRY_SELECT_SQL: &str = "SELECT
    id,
    note,
    kind,
    occurred_at,
    created_at,
    updated_at
FROM entries";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for entry persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(EntryValidationError),
    Db(DbError),
    NotFound(EntryId),
    InvalidData(String),
    /// Connection has not been migrated to the schema this build expects.
    SchemaNotReady { found: u32, expected: u32 },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "entry not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted entry data: {message}"),
            Self::SchemaNotReady { found, expected } => write!(
                f,
                "journal schema version {found} does not match expected {expected}"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EntryValidationError> for RepoError {
    fn from(value: EntryValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Query options for listing entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryListQuery {
    pub kind: Option<ResonanceKind>,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for entry CRUD operations.
pub trait EntryRepository {
    fn create_entry(&self, entry: &ResonanceEntry) -> RepoResult<EntryId>;
    fn get_entry(&self, id: EntryId) -> RepoResult<Option<ResonanceEntry>>;
    /// Lists entries newest first (`occurred_at DESC, id ASC`).
    fn list_entries(&self, query: &EntryListQuery) -> RepoResult<Vec<ResonanceEntry>>;
    /// Replaces the note text; kind and occurrence time are untouched.
    fn update_note(&self, id: EntryId, note: &str) -> RepoResult<()>;
    fn delete_entry(&self, id: EntryId) -> RepoResult<()>;
    /// Returns the kind of every stored row, `None` for unknown values.
    fn list_polarities(&self) -> RepoResult<Vec<Option<ResonanceKind>>>;
}

/// SQLite-backed entry repository.
pub struct SqliteEntryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEntryRepository<'conn> {
    /// Wraps a connection after checking it is migrated to the latest schema.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let found = current_version(conn)?;
        let expected = latest_version();
        if found != expected {
            return Err(RepoError::SchemaNotReady { found, expected });
        }
        Ok(Self { conn })
    }
}

impl EntryRepository for SqliteEntryRepository<'_> {
    fn create_entry(&self, entry: &ResonanceEntry) -> RepoResult<EntryId> {
        entry.validate()?;

        self.conn.execute(
            "INSERT INTO entries (
                id,
                note,
                kind,
                occurred_at,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?5);",
            params![
                entry.id.to_string(),
                entry.note.as_str(),
                entry.kind.as_str(),
                entry.occurred_at,
                now_epoch_ms(),
            ],
        )?;

        Ok(entry.id)
    }

    fn get_entry(&self, id: EntryId) -> RepoResult<Option<ResonanceEntry>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ENTRY_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_entry_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_entries(&self, query: &EntryListQuery) -> RepoResult<Vec<ResonanceEntry>> {
        let mut sql = format!("{ENTRY_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(kind) = query.kind {
            sql.push_str(" AND kind = ?");
            bind_values.push(Value::Text(kind.as_str().to_string()));
        }

        sql.push_str(" ORDER BY occurred_at DESC, id ASC");

        match query.limit {
            Some(limit) => {
                sql.push_str(" LIMIT ?");
                bind_values.push(Value::Integer(i64::from(limit)));
            }
            None if query.offset > 0 => sql.push_str(" LIMIT -1"),
            None => {}
        }
        if query.offset > 0 {
            sql.push_str(" OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(parse_entry_row(row)?);
        }

        Ok(entries)
    }

    fn update_note(&self, id: EntryId, note: &str) -> RepoResult<()> {
        let note = normalize_note(note)?;

        let changed = self.conn.execute(
            "UPDATE entries
             SET
                note = ?1,
                updated_at = ?2
             WHERE id = ?3;",
            params![note, now_epoch_ms(), id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn delete_entry(&self, id: EntryId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM entries WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn list_polarities(&self) -> RepoResult<Vec<Option<ResonanceKind>>> {
        let mut stmt = self.conn.prepare("SELECT id, kind FROM entries;")?;
        let mut rows = stmt.query([])?;
        let mut polarities = Vec::new();

        while let Some(row) = rows.next()? {
            let kind: Option<String> = row.get("kind")?;
            let polarity = kind.as_deref().and_then(|value| value.parse().ok());
            if polarity.is_none() {
                let id: String = row.get("id")?;
                warn!(
                    "event=entry_kind_unknown module=repo status=degraded entry_id={id} kind={}",
                    kind.as_deref().unwrap_or("<null>")
                );
            }
            polarities.push(polarity);
        }

        Ok(polarities)
    }
}

fn parse_entry_row(row: &Row<'_>) -> RepoResult<ResonanceEntry> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in entries.id"))
    })?;

    let kind_text: String = row.get("kind")?;
    let kind = kind_text.parse::<ResonanceKind>().map_err(|_| {
        RepoError::InvalidData(format!("invalid kind `{kind_text}` in entries.kind"))
    })?;

    let entry = ResonanceEntry {
        id,
        note: row.get("note")?,
        kind,
        occurred_at: row.get("occurred_at")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    entry.validate()?;
    Ok(entry)
}

pub(crate) fn now_epoch_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
