//! Command implementations over the core entry service.

use crate::Commands;
use anyhow::{Context as _, Result};
use chrono::{DateTime, Local, Utc};
use clap::{Args, ValueEnum};
use log::{info, warn};
use resonance_core::db::open_db;
use resonance_core::{
    import_legacy_file, parse_entry_id, parse_occurred_at, EntryListQuery, EntryService,
    LevelSummary, ResonanceEntry, ResonanceKind, SqliteEntryRepository,
};
use std::path::{Path, PathBuf};

const NOTE_PREVIEW_CHARS: usize = 60;
const PROGRESS_BAR_WIDTH: usize = 40;
const IMPORTED_SUFFIX: &str = "imported";

/// Shared settings for every command.
pub struct Context {
    pub db_path: PathBuf,
    pub json_output: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Positive,
    Negative,
}

impl From<KindArg> for ResonanceKind {
    fn from(value: KindArg) -> Self {
        match value {
            KindArg::Positive => ResonanceKind::Positive,
            KindArg::Negative => ResonanceKind::Negative,
        }
    }
}

/// Arguments for the add command.
#[derive(Args, Debug)]
pub struct AddArgs {
    /// What happened
    pub note: String,

    /// Entry polarity (defaults to positive)
    #[arg(short, long, value_enum)]
    pub kind: Option<KindArg>,

    /// When it happened, RFC 3339 (defaults to now)
    #[arg(long)]
    pub at: Option<String>,
}

/// Arguments for the list command.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only show entries of this kind
    #[arg(short, long, value_enum)]
    pub kind: Option<KindArg>,

    /// Maximum entries to show
    #[arg(short, long)]
    pub limit: Option<u32>,

    /// Entries to skip
    #[arg(long, default_value = "0")]
    pub offset: u32,
}

/// Arguments for the import command.
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Legacy JSON export file
    pub path: PathBuf,

    /// Leave the source file in place after a complete import
    #[arg(long)]
    pub keep_file: bool,
}

/// Opens the journal and runs one command against it.
pub fn dispatch(command: Commands, ctx: &Context) -> Result<()> {
    let conn = open_db(&ctx.db_path)
        .with_context(|| format!("cannot open journal at {}", ctx.db_path.display()))?;
    let service = EntryService::new(SqliteEntryRepository::try_new(&conn)?);

    match command {
        Commands::Add(args) => {
            let occurred_at = args.at.as_deref().map(parse_occurred_at).transpose()?;
            let entry = service.add_entry(&args.note, args.kind.map(Into::into), occurred_at)?;
            print_entry(ctx, &entry, "Recorded")?;
        }
        Commands::List(args) => {
            let query = EntryListQuery {
                kind: args.kind.map(Into::into),
                limit: args.limit,
                offset: args.offset,
            };
            let entries = service.list_entries(&query)?;
            if ctx.json_output {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else if entries.is_empty() {
                println!("No entries yet");
            } else {
                for entry in &entries {
                    println!("{}", entry_line(entry));
                }
            }
        }
        Commands::Show { id } => {
            let entry = service.get_entry(parse_entry_id(&id)?)?;
            if ctx.json_output {
                println!("{}", serde_json::to_string_pretty(&entry)?);
            } else {
                println!("{}  {}", entry.id, sign(entry.kind));
                println!("occurred  {}", format_time(entry.occurred_at));
                println!("updated   {}", format_time(entry.updated_at));
                println!();
                println!("{}", entry.note);
            }
        }
        Commands::Edit { id, note } => {
            let entry = service.edit_note(parse_entry_id(&id)?, &note)?;
            print_entry(ctx, &entry, "Updated")?;
        }
        Commands::Delete { id } => {
            let id = parse_entry_id(&id)?;
            service.delete_entry(id)?;
            if ctx.json_output {
                println!("{}", serde_json::json!({ "deleted": id }));
            } else {
                println!("Deleted {id}");
            }
        }
        Commands::Level => {
            let summary = service.summary()?;
            if ctx.json_output {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_summary(&summary);
            }
        }
        Commands::Import(args) => {
            let report = import_legacy_file(&service, &args.path);
            if report.is_complete() && !args.keep_file {
                retire_import_source(&args.path);
            }
            if ctx.json_output {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "Imported {} entries ({} skipped)",
                    report.imported, report.failed
                );
            }
        }
    }

    Ok(())
}

fn print_entry(ctx: &Context, entry: &ResonanceEntry, verb: &str) -> Result<()> {
    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(entry)?);
    } else {
        println!("{verb} {}", entry_line(entry));
    }
    Ok(())
}

fn print_summary(summary: &LevelSummary) {
    let level = &summary.level;
    println!("Resonance Level  {}", summary.band.label);
    println!(
        "Level {:.1}  [{}]  {:.1}%",
        level.level,
        progress_bar(level.percentage, PROGRESS_BAR_WIDTH),
        level.percentage
    );
    println!(
        "Total {}  +{}  -{}",
        level.total, level.positive, level.negative
    );
    println!();
    println!("{}", summary.message);
}

fn entry_line(entry: &ResonanceEntry) -> String {
    format!(
        "[{}] {} {}  {}",
        &entry.id.to_string()[..8],
        sign(entry.kind),
        format_time(entry.occurred_at),
        truncate(&entry.note, NOTE_PREVIEW_CHARS)
    )
}

fn sign(kind: ResonanceKind) -> &'static str {
    match kind {
        ResonanceKind::Positive => "+",
        ResonanceKind::Negative => "-",
    }
}

fn format_time(epoch_ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(epoch_ms)
        .map(|time| time.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| epoch_ms.to_string())
}

fn truncate(text: &str, max_chars: usize) -> String {
    let single_line = text.replace(['\n', '\r'], " ");
    if single_line.chars().count() <= max_chars {
        return single_line;
    }
    let mut cut: String = single_line.chars().take(max_chars.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}

fn progress_bar(percentage: f64, width: usize) -> String {
    let filled = ((percentage.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("{}{}", "#".repeat(filled), "-".repeat(width - filled))
}

fn imported_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(IMPORTED_SUFFIX);
    PathBuf::from(name)
}

// Renaming keeps the export recoverable while preventing a second import.
fn retire_import_source(path: &Path) {
    let target = imported_path(path);
    match std::fs::rename(path, &target) {
        Ok(()) => info!(
            "event=legacy_import_retire module=cli status=ok target={}",
            target.display()
        ),
        Err(err) => warn!(
            "event=legacy_import_retire module=cli status=error path={} error={err}",
            path.display()
        ),
    }
}
