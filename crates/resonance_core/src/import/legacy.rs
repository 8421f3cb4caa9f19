//! Legacy JSON export import.
//!
//! The legacy format is a JSON array of
//! `{ "id": "...", "timestamp": "<rfc3339>" | <epoch ms>, "note": "...", "type": "positive" }`
//! objects, where `type` may be missing, `null` or blank (all treated as
//! positive).
//!
//! # Invariants
//! - Every accepted item goes through `EntryService::add_entry`.
//! - A malformed item only fails itself; remaining items are still imported.
//! - Legacy IDs are not reused; stored entries get fresh IDs.

use crate::model::entry::ResonanceKind;
use crate::repo::entry_repo::EntryRepository;
use crate::service::entry_service::{parse_occurred_at, EntryService};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// One item of a legacy export.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LegacyEntry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<LegacyTimestamp>,
    pub note: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// Legacy timestamps were written either as ISO strings or epoch millis.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LegacyTimestamp {
    EpochMillis(i64),
    Text(String),
}

impl LegacyTimestamp {
    fn to_epoch_ms(&self) -> Result<i64, String> {
        match self {
            Self::EpochMillis(value) => Ok(*value),
            Self::Text(text) => {
                parse_occurred_at(text).map_err(|err| format!("unparseable timestamp: {err}"))
            }
        }
    }
}

/// Outcome counters of one import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub imported: usize,
    pub failed: usize,
}

impl ImportReport {
    /// Whether the run moved data and nothing was left behind.
    pub fn is_complete(&self) -> bool {
        self.imported > 0 && self.failed == 0
    }
}

/// Imports a legacy export file.
///
/// An unreadable or unparseable file is logged and yields an empty report.
pub fn import_legacy_file<R: EntryRepository>(
    service: &EntryService<R>,
    path: impl AsRef<Path>,
) -> ImportReport {
    let path = path.as_ref();
    match std::fs::read_to_string(path) {
        Ok(json) => import_legacy_json(service, &json),
        Err(err) => {
            warn!(
                "event=legacy_import module=import status=error error_code=read_failed path={} error={err}",
                path.display()
            );
            ImportReport::default()
        }
    }
}

/// Imports a legacy export held in memory.
pub fn import_legacy_json<R: EntryRepository>(
    service: &EntryService<R>,
    json: &str,
) -> ImportReport {
    match serde_json::from_str::<Vec<Value>>(json) {
        Ok(items) => import_legacy_items(service, items),
        Err(err) => {
            warn!(
                "event=legacy_import module=import status=error error_code=parse_failed error={err}"
            );
            ImportReport::default()
        }
    }
}

/// Imports already-decoded legacy items one by one.
pub fn import_legacy_items<R: EntryRepository>(
    service: &EntryService<R>,
    items: Vec<Value>,
) -> ImportReport {
    let mut report = ImportReport::default();

    for (index, item) in items.into_iter().enumerate() {
        match import_one(service, item) {
            Ok(()) => report.imported += 1,
            Err(reason) => {
                report.failed += 1;
                warn!(
                    "event=legacy_import_item module=import status=skipped index={index} reason={reason}"
                );
            }
        }
    }

    info!(
        "event=legacy_import module=import status=ok imported={} failed={}",
        report.imported, report.failed
    );
    report
}

fn import_one<R: EntryRepository>(service: &EntryService<R>, item: Value) -> Result<(), String> {
    let legacy: LegacyEntry =
        serde_json::from_value(item).map_err(|err| format!("malformed item: {err}"))?;

    let kind = match legacy
        .kind
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
    {
        None => ResonanceKind::Positive,
        Some(value) => value
            .parse::<ResonanceKind>()
            .map_err(|err| err.to_string())?,
    };
    let occurred_at = legacy
        .timestamp
        .as_ref()
        .map(LegacyTimestamp::to_epoch_ms)
        .transpose()?;

    service
        .add_entry(&legacy.note, Some(kind), occurred_at)
        .map(|_| ())
        .map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::{LegacyEntry, LegacyTimestamp};

    #[test]
    fn legacy_entry_accepts_both_timestamp_shapes_and_missing_type() {
        let text: LegacyEntry = serde_json::from_str(
            r#"{"id":"1","timestamp":"2024-05-01T08:30:00.000Z","note":"sunrise walk"}"#,
        )
        .unwrap();
        assert_eq!(text.kind, None);
        assert_eq!(
            text.timestamp.unwrap().to_epoch_ms().unwrap(),
            1_714_552_200_000
        );

        let millis: LegacyEntry = serde_json::from_str(
            r#"{"id":"2","timestamp":1714552200000,"note":"argument","type":"negative"}"#,
        )
        .unwrap();
        assert_eq!(
            millis.timestamp,
            Some(LegacyTimestamp::EpochMillis(1_714_552_200_000))
        );
        assert_eq!(millis.kind.as_deref(), Some("negative"));
    }

    #[test]
    fn invalid_text_timestamp_is_reported() {
        let err = LegacyTimestamp::Text("yesterday".to_string())
            .to_epoch_ms()
            .unwrap_err();
        assert!(err.contains("unparseable timestamp"));
    }
}
