use resonance_core::db::open_db_in_memory;
use resonance_core::{
    EntryListQuery, EntryRepository, EntryValidationError, RepoError, ResonanceEntry,
    ResonanceKind, SqliteEntryRepository,
};
use rusqlite::params;
use uuid::Uuid;

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();

    let entry = ResonanceEntry::new("  morning gratitude  ", ResonanceKind::Positive, 1_000).unwrap();
    let id = repo.create_entry(&entry).unwrap();

    let loaded = repo.get_entry(id).unwrap().unwrap();
    assert_eq!(loaded.id, entry.id);
    assert_eq!(loaded.note, "morning gratitude");
    assert_eq!(loaded.kind, ResonanceKind::Positive);
    assert_eq!(loaded.occurred_at, 1_000);
    assert_eq!(loaded.created_at, loaded.updated_at);
}

#[test]
fn get_missing_entry_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();

    assert!(repo.get_entry(Uuid::new_v4()).unwrap().is_none());
}

#[test]
fn create_rejects_untrimmed_or_empty_note() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();

    let mut entry = ResonanceEntry::new("valid", ResonanceKind::Negative, 5).unwrap();
    entry.note = " padded ".to_string();
    let err = repo.create_entry(&entry).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(EntryValidationError::UntrimmedNote)
    ));

    entry.note = "   ".to_string();
    let err = repo.create_entry(&entry).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(EntryValidationError::EmptyNote)
    ));
}

#[test]
fn update_note_keeps_kind_and_occurrence() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();

    let entry = ResonanceEntry::new("draft", ResonanceKind::Negative, 42).unwrap();
    repo.create_entry(&entry).unwrap();
    conn.execute(
        "UPDATE entries SET updated_at = 0 WHERE id = ?1;",
        params![entry.id.to_string()],
    )
    .unwrap();

    repo.update_note(entry.id, "  revised  ").unwrap();

    let loaded = repo.get_entry(entry.id).unwrap().unwrap();
    assert_eq!(loaded.note, "revised");
    assert_eq!(loaded.kind, ResonanceKind::Negative);
    assert_eq!(loaded.occurred_at, 42);
    assert!(loaded.updated_at > 0);
}

#[test]
fn update_and_delete_missing_entry_return_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();
    let missing = Uuid::new_v4();

    let update_err = repo.update_note(missing, "anything").unwrap_err();
    assert!(matches!(update_err, RepoError::NotFound(id) if id == missing));

    let delete_err = repo.delete_entry(missing).unwrap_err();
    assert!(matches!(delete_err, RepoError::NotFound(id) if id == missing));
}

#[test]
fn update_with_blank_note_is_validation_not_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();

    let err = repo.update_note(Uuid::new_v4(), " \n ").unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(EntryValidationError::EmptyNote)
    ));
}

#[test]
fn delete_removes_row() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();

    let entry = ResonanceEntry::new("short lived", ResonanceKind::Positive, 1).unwrap();
    repo.create_entry(&entry).unwrap();
    repo.delete_entry(entry.id).unwrap();

    assert!(repo.get_entry(entry.id).unwrap().is_none());
    assert!(matches!(
        repo.delete_entry(entry.id).unwrap_err(),
        RepoError::NotFound(_)
    ));
}

#[test]
fn list_orders_newest_first_and_filters_by_kind() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();

    let oldest = ResonanceEntry::new("oldest", ResonanceKind::Positive, 100).unwrap();
    let middle = ResonanceEntry::new("middle", ResonanceKind::Negative, 200).unwrap();
    let newest = ResonanceEntry::new("newest", ResonanceKind::Positive, 300).unwrap();
    for entry in [&middle, &oldest, &newest] {
        repo.create_entry(entry).unwrap();
    }

    let all = repo.list_entries(&EntryListQuery::default()).unwrap();
    let notes: Vec<&str> = all.iter().map(|entry| entry.note.as_str()).collect();
    assert_eq!(notes, vec!["newest", "middle", "oldest"]);

    let positives = repo
        .list_entries(&EntryListQuery {
            kind: Some(ResonanceKind::Positive),
            ..EntryListQuery::default()
        })
        .unwrap();
    assert_eq!(positives.len(), 2);
    assert!(positives
        .iter()
        .all(|entry| entry.kind == ResonanceKind::Positive));
}

#[test]
fn list_supports_limit_and_offset() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();

    for at in 1..=5 {
        let entry = ResonanceEntry::new(&format!("entry {at}"), ResonanceKind::Positive, at).unwrap();
        repo.create_entry(&entry).unwrap();
    }

    let page = repo
        .list_entries(&EntryListQuery {
            limit: Some(2),
            offset: 1,
            ..EntryListQuery::default()
        })
        .unwrap();
    let occurred: Vec<i64> = page.iter().map(|entry| entry.occurred_at).collect();
    assert_eq!(occurred, vec![4, 3]);

    let tail = repo
        .list_entries(&EntryListQuery {
            offset: 3,
            ..EntryListQuery::default()
        })
        .unwrap();
    let occurred: Vec<i64> = tail.iter().map(|entry| entry.occurred_at).collect();
    assert_eq!(occurred, vec![2, 1]);
}

#[test]
fn full_row_reads_reject_unknown_kind_but_polarities_tolerate_it() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();

    let valid = ResonanceEntry::new("valid", ResonanceKind::Negative, 10).unwrap();
    repo.create_entry(&valid).unwrap();
    let odd_id = Uuid::new_v4();
    conn.execute(
        "INSERT INTO entries (id, note, kind, occurred_at) VALUES (?1, 'odd', 'neutral', 20);",
        params![odd_id.to_string()],
    )
    .unwrap();

    let err = repo.get_entry(odd_id).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(message) if message.contains("neutral")));

    let mut polarities = repo.list_polarities().unwrap();
    polarities.sort_by_key(|polarity| polarity.is_some());
    assert_eq!(polarities, vec![None, Some(ResonanceKind::Negative)]);
}
