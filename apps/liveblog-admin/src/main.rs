//! # liveblog-admin
//!
//! Operator CLI over a JSON dump of a liveblog record store.
//!
//! Repair is a dry run unless `--apply` is given: the planned writes are
//! listed first so they can be checked before anything changes.
//!
//! ```text
//! liveblog-admin repair --store dump.json              # plan every feed
//! liveblog-admin repair --store dump.json --feed 3 --apply
//! liveblog-admin page   --store dump.json --feed 3 --jump 812
//! liveblog-admin poll   --store dump.json --feed 3 --since 1700000000
//! ```

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::*;
use liveblog_core::{EntryId, EntryType, EntryView, FeedId};
use liveblog_repair::{ArchiveRepair, BatchReport, RepairAction, RepairConfig, RepairPlan};
use liveblog_sdk::{FeedConfig, FeedService, SdkError};
use liveblog_store::{EntryPatch, MemoryRecordStore, NewEntry, RecordStore, StoreError};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

// ─── CLI ───────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "liveblog-admin")]
#[command(about = "Inspect and repair liveblog feed dumps")]
#[command(version)]
struct Cli {
    /// Feed settings as JSON; defaults apply when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print responses as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Relink drifted replace pointers and restore lost edits
    Repair {
        /// Store dump to read (and rewrite with --apply)
        #[arg(long)]
        store: PathBuf,
        /// Only this feed; every feed otherwise
        #[arg(long)]
        feed: Option<u64>,
        /// Write the planned changes
        #[arg(long)]
        apply: bool,
    },
    /// One archive page, newest slot first
    Page {
        #[arg(long)]
        store: PathBuf,
        #[arg(long)]
        feed: u64,
        /// 1-based; 0 lets --jump pick the page
        #[arg(long, default_value_t = 0)]
        page: usize,
        /// Resume from this slot
        #[arg(long)]
        cursor: Option<u64>,
        /// Land on the page holding this slot
        #[arg(long)]
        jump: Option<u64>,
    },
    /// What changed in a time window
    Poll {
        #[arg(long)]
        store: PathBuf,
        #[arg(long)]
        feed: u64,
        #[arg(long, default_value_t = 0)]
        since: i64,
        #[arg(long)]
        until: Option<i64>,
    },
    /// Key events, newest first
    KeyEvents {
        #[arg(long)]
        store: PathBuf,
        #[arg(long)]
        feed: u64,
    },
    /// Walk through an edit, a delete, a race and its repair
    Demo,
}

// ─── Store and config files ────────────────────────────────────────────────

fn load_store(path: &Path) -> Result<MemoryRecordStore, SdkError> {
    let json = std::fs::read_to_string(path).map_err(StoreError::from)?;
    Ok(MemoryRecordStore::from_json(&json)?)
}

fn save_store(path: &Path, store: &MemoryRecordStore) -> Result<(), SdkError> {
    std::fs::write(path, store.to_json()?).map_err(StoreError::from)?;
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<FeedConfig, SdkError> {
    match path {
        Some(path) => Ok(FeedConfig::load(path)?),
        None => Ok(FeedConfig::default()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), SdkError> {
    let json = serde_json::to_string_pretty(value).map_err(StoreError::from)?;
    println!("{}", json);
    Ok(())
}

// ─── Pretty printing ──────────────────────────────────────────────────────

fn header(text: &str) {
    let bar = "═".repeat(60);
    println!("\n{}", bar.bright_cyan());
    println!("  {}", text.bold().bright_white());
    println!("{}", bar.bright_cyan());
}

fn section(text: &str) {
    println!("\n{} {}", "▸".bright_yellow(), text.bold());
}

fn step(text: &str) {
    println!("  {} {}", "•".bright_green(), text);
}

fn show_entry(view: &EntryView) {
    let kind = match view.entry_type {
        EntryType::New => "new   ".bright_green(),
        EntryType::Update => "update".bright_yellow(),
        EntryType::Delete => "delete".bright_red(),
    };
    let key = if view.key_event { "★".bright_yellow() } else { " ".normal() };
    let content = if view.entry_type == EntryType::Delete {
        format!("(retracts {})", view.replaces.map(|id| id.to_string()).unwrap_or_default())
            .dimmed()
            .to_string()
    } else {
        view.render.clone()
    };

    println!(
        "  {} {} {:>8} {:>12}  {}",
        kind,
        key,
        format!("#{}", view.id).bright_white(),
        view.created_at.to_string().dimmed(),
        content
    );
}

fn show_entries(views: &[EntryView]) {
    if views.is_empty() {
        println!("  {}", "(no entries)".dimmed());
    }
    for view in views {
        show_entry(view);
    }
}

fn show_plan(plan: &RepairPlan) {
    section(&format!("Feed {}", plan.feed));
    if plan.is_empty() {
        step("nothing to repair");
    }
    for action in &plan.actions {
        let marker = match action {
            RepairAction::Relink { .. } => "↪".bright_cyan(),
            RepairAction::ReplaceContent { .. } => "✎".bright_magenta(),
        };
        println!("  {} {}", marker, action);
    }
    if plan.content_skipped {
        println!(
            "  {} {}",
            "!".bright_red(),
            "content repair skipped, duplicate count does not match the relinks".bright_red()
        );
    }
}

fn show_batch(batch: &BatchReport) {
    let total = batch.total();
    let verb = if batch.dry_run { "would correct" } else { "corrected" };
    println!(
        "\n  {} {} {} pointers, replaced {} contents across {} feeds",
        if total.is_clean() { "✓".bright_green().bold() } else { "✎".bright_yellow().bold() },
        verb,
        total.entries_corrected.to_string().bold(),
        total.content_replaced.to_string().bold(),
        batch.feeds.len()
    );
    if batch.dry_run && !total.is_clean() {
        println!("  {}", "re-run with --apply to write these changes".dimmed());
    }
}

// ─── Commands ──────────────────────────────────────────────────────────────

fn run_repair(
    path: &Path,
    feed: Option<u64>,
    apply: bool,
    json: bool,
) -> Result<(), SdkError> {
    let mut store = load_store(path)?;
    let feeds = match feed {
        Some(feed) => vec![FeedId(feed)],
        None => store.feeds()?,
    };

    let repair = ArchiveRepair::new(if apply {
        RepairConfig::apply()
    } else {
        RepairConfig::dry_run()
    });
    let mut batch = BatchReport {
        dry_run: !apply,
        feeds: Vec::new(),
    };

    if !json {
        header(if apply { "REPAIR — applying" } else { "REPAIR — dry run" });
    }
    for feed in feeds {
        let plan = repair.plan(&store, feed)?;
        if !json {
            show_plan(&plan);
        }
        let report = if apply {
            repair.apply(&mut store, &plan)?
        } else {
            plan.report()
        };
        batch.feeds.push((feed, report));
    }

    if apply && !batch.total().is_clean() {
        save_store(path, &store)?;
    }

    if json {
        print_json(&batch)
    } else {
        show_batch(&batch);
        Ok(())
    }
}

fn open(path: &Path, config: &FeedConfig) -> Result<FeedService<MemoryRecordStore>, SdkError> {
    Ok(FeedService::new(load_store(path)?, config.clone()))
}

fn run_page(
    service: &FeedService<MemoryRecordStore>,
    feed: FeedId,
    page: usize,
    cursor: Option<u64>,
    jump: Option<u64>,
    json: bool,
) -> Result<(), SdkError> {
    let response = service.entries_paged(feed, page, cursor.map(EntryId), jump.map(EntryId))?;
    if json {
        return print_json(&response);
    }

    header(&format!(
        "Feed {} — page {} of {} ({} entries)",
        feed, response.page, response.pages, response.total
    ));
    show_entries(&response.entries);
    Ok(())
}

fn run_poll(
    service: &FeedService<MemoryRecordStore>,
    feed: FeedId,
    since: i64,
    until: Option<i64>,
    json: bool,
) -> Result<(), SdkError> {
    let response = match until {
        Some(until) => service.entries_between(feed, since, until)?,
        None => service.entries_since(feed, since)?,
    };
    if json {
        return print_json(&response);
    }

    header(&format!("Feed {} — changes since {}", feed, since));
    show_entries(&response.entries);
    match response.latest_timestamp {
        Some(latest) => step(&format!("caught up to {}", latest)),
        None if !response.entries.is_empty() => {
            step("more entries pending, poll again from the newest one shown")
        }
        None => {}
    }
    Ok(())
}

fn run_key_events(
    service: &FeedService<MemoryRecordStore>,
    feed: FeedId,
    json: bool,
) -> Result<(), SdkError> {
    let response = service.key_events(feed)?;
    if json {
        return print_json(&response);
    }

    header(&format!("Feed {} — key events", feed));
    show_entries(&response.entries);
    Ok(())
}

// ─── Demo ──────────────────────────────────────────────────────────────────

fn run_demo(config: FeedConfig) -> Result<(), SdkError> {
    let feed = FeedId(1);
    let service = FeedService::new(MemoryRecordStore::new(), config);

    header("DEMO — One Log, Three Views");

    section("Phase 1: Editors write");
    let kickoff = service.insert_entry(feed, "/key Match starts", None, 100)?;
    step(&format!("insert #{}: \"/key Match starts\"", kickoff));
    let chatter = service.insert_entry(feed, "Warm sunshine at the ground", None, 120)?;
    step(&format!("insert #{}: \"Warm sunshine at the ground\"", chatter));
    let edit = service.update_entry(feed, kickoff, "/key Match starts, 1-0", None, 160)?;
    step(&format!("update #{} via notification #{}", kickoff, edit));
    let tombstone = service.delete_entry(feed, chatter, None, 200)?;
    step(&format!("delete #{} via tombstone #{}", chatter, tombstone));

    section("Full state (resolved)");
    let single = service.single_entry(feed, kickoff)?;
    show_entries(&single.entries);

    section("Delta since 130 (what a poller receives)");
    show_entries(&service.entries_since(feed, 130)?.entries);

    section("Archive page 1 (compacted)");
    show_entries(&service.entries_paged(feed, 1, None, None)?.entries);

    section("Key events");
    show_entries(&service.key_events(feed)?.entries);

    header("RACE — A Stale Edit, Then Repair");

    section("Phase 1: An editor edits through the notification's id");
    {
        let mut store = service.store().write();
        store.insert(NewEntry::new(feed, "/key Match starts, 2-0", 210).replacing(edit))?;
        store.update(edit, EntryPatch::new().content("/key Match starts, 2-0"))?;
    }
    step("pointer and in-place rewrite both missed the original");

    section("Phase 2: Dry run");
    let dry = service.repair(feed, true)?;
    step(&format!(
        "would correct {} pointers, replace {} contents",
        dry.entries_corrected, dry.content_replaced
    ));

    section("Phase 3: Apply");
    let applied = service.repair(feed, false)?;
    step(&format!(
        "corrected {} pointers, replaced {} contents",
        applied.entries_corrected, applied.content_replaced
    ));
    show_entries(&service.single_entry(feed, kickoff)?.entries);

    let again = service.repair(feed, true)?;
    if again.is_clean() {
        println!(
            "\n  {} {}",
            "✓".bright_green().bold(),
            "Second run plans nothing, repair is idempotent".bright_green().bold()
        );
    }
    Ok(())
}

// ─── Entry point ───────────────────────────────────────────────────────────

fn run(cli: Cli) -> Result<(), SdkError> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Repair { store, feed, apply } => run_repair(&store, feed, apply, cli.json),
        Commands::Page { store, feed, page, cursor, jump } => {
            run_page(&open(&store, &config)?, FeedId(feed), page, cursor, jump, cli.json)
        }
        Commands::Poll { store, feed, since, until } => {
            run_poll(&open(&store, &config)?, FeedId(feed), since, until, cli.json)
        }
        Commands::KeyEvents { store, feed } => {
            run_key_events(&open(&store, &config)?, FeedId(feed), cli.json)
        }
        Commands::Demo => run_demo(config),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("{} {}", "error:".bright_red().bold(), e);
        std::process::exit(1);
    }
}
