//! Mnemos CLI
//!
//! Terminal session adapter: each invocation restores one deck from the
//! snapshot store, applies at most one grade event, and persists the result.

mod items;
mod settings;

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use mnemos_core::storage::{load_snapshot, save_snapshot, SnapshotStore, SqliteStore};
use mnemos_core::{
    format_interval, CardState, Grade, GradeOutcome, Item, ReviewSession, SelectionSource,
    SrsConfig,
};

/// Mnemos - spaced repetition from the terminal
#[derive(Parser)]
#[command(name = "mnemos")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Learning-box + memory-decay spaced repetition scheduler")]
#[command(long_about = "Mnemos schedules vocabulary and phrase review.\n\nNew items climb a short learning ladder, then a power-law decay model decides when each one comes back.")]
struct Cli {
    /// Snapshot database (defaults to the platform data directory)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Scheduler configuration (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Evaluate as of this RFC 3339 instant instead of the current time
    #[arg(long, global = true, value_parser = parse_instant)]
    at: Option<DateTime<Utc>>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the card to study next
    Next {
        #[arg(long)]
        deck: String,
        /// JSON array of item keys or {key, highEffort} objects
        #[arg(long)]
        items: PathBuf,
    },

    /// Grade a card and show the next one
    Grade {
        #[arg(long)]
        deck: String,
        #[arg(long)]
        items: PathBuf,
        /// Card key
        key: String,
        /// fail (again), hard, good or easy
        #[arg(value_parser = parse_grade)]
        grade: Grade,
    },

    /// Show deck statistics
    Stats {
        #[arg(long)]
        deck: String,
        #[arg(long)]
        items: PathBuf,
    },

    /// Show the interval each grade would give a card
    Preview {
        #[arg(long)]
        deck: String,
        #[arg(long)]
        items: PathBuf,
        /// Card key
        key: String,
    },

    /// Forget all progress on a deck
    Reset {
        #[arg(long)]
        deck: String,
    },

    /// List stored decks
    Decks,

    /// Print the effective configuration as TOML
    Config,

    /// Drill graduated cards from one or more decks, weakest first
    Practice {
        /// Decks to draw from (all stored decks when omitted)
        #[arg(long = "deck")]
        decks: Vec<String>,
        /// Number of cards to list
        #[arg(long, default_value = "10")]
        limit: usize,
    },
}

fn parse_grade(s: &str) -> Result<Grade, String> {
    Grade::parse_name(s).ok_or_else(|| format!("unknown grade '{}', expected fail, hard, good or easy", s))
}

fn parse_instant(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| format!("invalid timestamp '{}': {}", s, e))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with_writer(io::stderr)
        .with_target(false)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();
    let now = cli.at.unwrap_or_else(Utc::now);
    let (config, config_path) = settings::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Next { deck, items } => run_next(cli.db, config, &deck, &items, now),
        Commands::Grade {
            deck,
            items,
            key,
            grade,
        } => run_grade(cli.db, config, &deck, &items, &key, grade, now),
        Commands::Stats { deck, items } => run_stats(cli.db, config, &deck, &items, now),
        Commands::Preview { deck, items, key } => run_preview(cli.db, config, &deck, &items, &key, now),
        Commands::Reset { deck } => run_reset(cli.db, &deck),
        Commands::Decks => run_decks(cli.db),
        Commands::Config => run_config(&config, config_path.as_deref()),
        Commands::Practice { decks, limit } => run_practice(cli.db, config, decks, limit, now),
    }
}

// ============================================================================
// SESSION PLUMBING
// ============================================================================

fn open_store(db: Option<PathBuf>) -> anyhow::Result<SqliteStore> {
    SqliteStore::open(db).context("Failed to open snapshot database")
}

fn open_session(
    store: &SqliteStore,
    config: SrsConfig,
    deck: &str,
    items_path: &Path,
    now: DateTime<Utc>,
) -> anyhow::Result<ReviewSession<Item>> {
    let items = items::load_items(items_path)?;
    if items.is_empty() {
        bail!("Items file {} contains no items", items_path.display());
    }
    let snapshot = load_snapshot(store, deck)?;
    Ok(ReviewSession::restore(snapshot, items, config, now))
}

fn persist(store: &SqliteStore, deck: &str, session: &ReviewSession<Item>, now: DateTime<Utc>) -> anyhow::Result<()> {
    save_snapshot(store, deck, &session.snapshot(now)).context("Failed to save deck")
}

// ============================================================================
// COMMANDS
// ============================================================================

fn run_next(
    db: Option<PathBuf>,
    config: SrsConfig,
    deck: &str,
    items: &Path,
    now: DateTime<Utc>,
) -> anyhow::Result<()> {
    let store = open_store(db)?;
    let session = open_session(&store, config, deck, items, now)?;
    persist(&store, deck, &session, now)?;

    print_next(&session, now);
    Ok(())
}

fn run_grade(
    db: Option<PathBuf>,
    config: SrsConfig,
    deck: &str,
    items: &Path,
    key: &str,
    grade: Grade,
    now: DateTime<Utc>,
) -> anyhow::Result<()> {
    let store = open_store(db)?;
    let mut session = open_session(&store, config, deck, items, now)?;

    let Some(outcome) = session.handle_grade(key, grade, now) else {
        println!("{} '{}' is not an introduced card in deck '{}'", "Skipped:".yellow().bold(), key, deck);
        return Ok(());
    };
    persist(&store, deck, &session, now)?;

    print_outcome(&outcome, grade, now);
    println!();
    print_next(&session, now);
    Ok(())
}

fn run_stats(
    db: Option<PathBuf>,
    config: SrsConfig,
    deck: &str,
    items: &Path,
    now: DateTime<Utc>,
) -> anyhow::Result<()> {
    let store = open_store(db)?;
    let session = open_session(&store, config, deck, items, now)?;
    persist(&store, deck, &session, now)?;

    let stats = session.stats();
    let retention = session.retention(now);

    println!("{}", format!("=== Deck '{}' ===", deck).cyan().bold());
    println!();
    println!("{}: {}", "Due Now".white().bold(), stats.due_count);
    println!("{}: {}", "In Learning".white().bold(), stats.learning_count);
    println!("{}: {}", "Graduated".white().bold(), stats.graduated_count);
    println!("{}: {} / {}", "Introduced".white().bold(), stats.total_introduced, stats.total_available);
    println!("{}: {}", "Easy Streak".white().bold(), session.deck().consecutive_easy_count);

    println!();
    println!("{}", "=== Retention ===".yellow().bold());
    if retention.reviewed_count == 0 {
        println!("{}", "No cards reviewed yet.".dimmed());
        return Ok(());
    }
    println!("{}: {:.1}%", "Average Recall".white().bold(), retention.average_retrievability * 100.0);
    println!("{}: {}", "At Risk (<50%)".white().bold(), retention.at_risk_count);

    let total = retention.reviewed_count;
    println!();
    print_distribution_bar("Strong (>=90%)", retention.strong_count, total, "green");
    print_distribution_bar("Fading (50-90%)", retention.fading_count, total, "yellow");
    print_distribution_bar("At risk (<50%)", retention.at_risk_count, total, "red");
    Ok(())
}

fn run_preview(
    db: Option<PathBuf>,
    config: SrsConfig,
    deck: &str,
    items: &Path,
    key: &str,
    now: DateTime<Utc>,
) -> anyhow::Result<()> {
    let store = open_store(db)?;
    let session = open_session(&store, config, deck, items, now)?;

    let Some(card) = session.cards().get(key) else {
        bail!("'{}' is not an introduced card in deck '{}'", key, deck);
    };
    let Some(preview) = session.preview(key, now) else {
        bail!("No preview available for '{}'", key);
    };

    println!("{}", format!("=== {} ===", key).cyan().bold());
    print_card(card, now);
    println!();
    for update in preview {
        let label = if card.is_learning() {
            "long-term"
        } else {
            "next review"
        };
        println!(
            "  {:>5}  {} {:>5}  (stability {:.2}d)",
            update.grade.as_str().bold(),
            label.dimmed(),
            format_interval(update.scheduled_days),
            update.stability
        );
    }
    Ok(())
}

fn run_reset(db: Option<PathBuf>, deck: &str) -> anyhow::Result<()> {
    let store = open_store(db)?;
    if store.remove(deck)? {
        println!("{} deck '{}' reset", "Done:".green().bold(), deck);
    } else {
        println!("{} no stored progress for deck '{}'", "Nothing to do:".yellow().bold(), deck);
    }
    Ok(())
}

fn run_decks(db: Option<PathBuf>) -> anyhow::Result<()> {
    let store = open_store(db)?;
    let decks = store.list()?;

    println!("{}", "=== Stored Decks ===".cyan().bold());
    if decks.is_empty() {
        println!("{}", "No decks yet.".dimmed());
        return Ok(());
    }
    for deck in decks {
        match load_snapshot(&store, &deck)? {
            Some(snapshot) => {
                let graduated = snapshot.cards.values().filter(|c| c.is_graduated()).count();
                println!(
                    "  {:20} {:>4} cards, {:>4} graduated, saved {}",
                    deck.bold(),
                    snapshot.cards.len(),
                    graduated,
                    snapshot.saved_at.format("%Y-%m-%d %H:%M")
                );
            }
            None => println!("  {:20} {}", deck.bold(), "(discarded: unreadable snapshot)".red()),
        }
    }
    Ok(())
}

fn run_config(config: &SrsConfig, source: Option<&Path>) -> anyhow::Result<()> {
    match source {
        Some(path) => println!("# loaded from {}", path.display()),
        None => println!("# built-in defaults"),
    }
    print!("{}", toml::to_string(config).context("Failed to render configuration")?);
    Ok(())
}

fn run_practice(
    db: Option<PathBuf>,
    config: SrsConfig,
    decks: Vec<String>,
    limit: usize,
    now: DateTime<Utc>,
) -> anyhow::Result<()> {
    let store = open_store(db)?;
    let decks = if decks.is_empty() { store.list()? } else { decks };

    let mut snapshots = Vec::new();
    for deck in &decks {
        match load_snapshot(&store, deck)? {
            Some(snapshot) => snapshots.push(snapshot),
            None => println!("{} no stored progress for deck '{}'", "Skipped:".yellow().bold(), deck),
        }
    }

    let session = ReviewSession::practice(snapshots, config, now);
    println!("{}", "=== Practice ===".cyan().bold());
    if session.cards().is_empty() {
        println!("{}", "No graduated cards to practice yet.".dimmed());
        return Ok(());
    }

    let mut cards: Vec<&CardState> = session.cards().iter().collect();
    cards.sort_by(|a, b| a.stability.total_cmp(&b.stability).then_with(|| a.key.cmp(&b.key)));
    for card in cards.into_iter().take(limit) {
        let marker = if session.current_card().is_some_and(|c| c.key == card.key) {
            ">".green().bold()
        } else {
            " ".normal()
        };
        println!(
            "{} {:30} stability {:>6.2}d  due {}",
            marker,
            card.key,
            card.stability,
            due_label(card.due, now)
        );
    }
    Ok(())
}

// ============================================================================
// OUTPUT
// ============================================================================

fn due_label(due: DateTime<Utc>, now: DateTime<Utc>) -> String {
    if due <= now {
        "now".to_string()
    } else {
        format!("in {}", format_interval(mnemos_core::decay::days_between(now, due)))
    }
}

fn print_card(card: &CardState, now: DateTime<Utc>) {
    println!("{}: {}", "Phase".white().bold(), card.phase);
    if card.is_learning() {
        println!("{}: {}", "Learning Step".white().bold(), card.learning_step);
    }
    println!("{}: {}", "Due".white().bold(), due_label(card.due_at(), now));
    println!("{}: {:.2} days", "Stability".white().bold(), card.stability);
    println!("{}: {:.2}", "Difficulty".white().bold(), card.difficulty);
    println!("{}: {} ({} lapses)", "Reviews".white().bold(), card.reps, card.lapses);
}

fn print_outcome(outcome: &GradeOutcome, grade: Grade, now: DateTime<Utc>) {
    println!(
        "{} {} -> {} ({}, due {})",
        "Graded".green().bold(),
        outcome.card.key.bold(),
        grade,
        outcome.kind.as_str(),
        due_label(outcome.card.due_at(), now)
    );
    if let Some(key) = &outcome.introduced {
        println!("{} {}", "New card:".magenta().bold(), key);
    }
}

fn print_next(session: &ReviewSession<Item>, now: DateTime<Utc>) {
    let selection = session.selection();
    let stats = session.stats();

    match session.current_card() {
        Some(card) => {
            let source = match selection.source {
                SelectionSource::Learning => "learning".yellow(),
                SelectionSource::Review => "review".green(),
                SelectionSource::LearningWaiting => "waiting".dimmed(),
                SelectionSource::Practice => "practice".blue(),
                other => other.as_str().normal(),
            };
            println!("{} {} [{}]", "Next:".cyan().bold(), card.key.bold(), source);
            if selection.source == SelectionSource::LearningWaiting {
                println!("  step due {}", due_label(card.step_due, now));
            }
        }
        None if selection.all_complete => println!("{}", "All done. Nothing left to study.".green().bold()),
        None => println!("{}", "Nothing to show right now.".dimmed()),
    }

    println!(
        "  {} due, {} learning, {} graduated, {}/{} introduced",
        stats.due_count, stats.learning_count, stats.graduated_count, stats.total_introduced, stats.total_available
    );
}

fn print_distribution_bar(label: &str, count: usize, total: usize, color: &str) {
    let percentage = if total > 0 {
        (count as f64 / total as f64) * 100.0
    } else {
        0.0
    };

    let bar_width: usize = 30;
    let filled = ((percentage / 100.0) * bar_width as f64) as usize;
    let bar = format!("{}{}", "#".repeat(filled), "-".repeat(bar_width.saturating_sub(filled)));
    let colored_bar = match color {
        "green" => bar.green(),
        "yellow" => bar.yellow(),
        "red" => bar.red(),
        _ => bar.white(),
    };

    println!("  {:16} [{}] {:>4} ({:>5.1}%)", label, colored_bar, count, percentage);
}
