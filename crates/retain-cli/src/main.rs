//! Retain CLI
//!
//! Command-line inspector for the scheduling engine: create cards, apply
//! ratings and preview outcomes without a card store.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, bail};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use colored::Colorize;
use retain_core::{
    FixedClock, FsrsParameters, MemoryCard, Rating, SchedulingEngine, SchedulingResult,
    days_between, new_card, retrievability,
};
use tracing::{Level, debug};
use tracing_subscriber::EnvFilter;

/// Environment variable naming a JSON weight table
const PARAMS_ENV: &str = "RETAIN_PARAMS";

/// Retain - FSRS-4.5 scheduling CLI
#[derive(Parser)]
#[command(name = "retain")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Inspect FSRS-4.5 scheduling decisions")]
#[command(long_about = "Retain computes spaced repetition schedules with the FSRS-4.5 model.\n\nCards are passed as JSON (or @path to a JSON file) and printed back as JSON.\nSet RETAIN_PARAMS to a weight-table file to use a custom calibration.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a never-reviewed card as JSON
    New,

    /// Apply one rating to a card
    Review {
        /// Card JSON, or @path to a JSON file
        #[arg(long)]
        card: String,
        /// Rating: 1=Again, 2=Hard, 3=Good, 4=Easy
        #[arg(long)]
        rating: i64,
        /// Review instant (RFC 3339), defaults to now
        #[arg(long)]
        now: Option<String>,
        /// Last review instant (RFC 3339); recomputes elapsedDays
        #[arg(long)]
        last_review: Option<String>,
        /// Weight table JSON file
        #[arg(long)]
        params: Option<PathBuf>,
        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the outcome of every rating for a card
    Preview {
        /// Card JSON, or @path to a JSON file
        #[arg(long)]
        card: String,
        /// Review instant (RFC 3339), defaults to now
        #[arg(long)]
        now: Option<String>,
        /// Last review instant (RFC 3339); recomputes elapsedDays
        #[arg(long)]
        last_review: Option<String>,
        /// Weight table JSON file
        #[arg(long)]
        params: Option<PathBuf>,
        /// Print all results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Probability of recall after some days
    Retrievability {
        /// Stability in days
        #[arg(long)]
        stability: f64,
        /// Days since the last review
        #[arg(long)]
        elapsed: f64,
    },

    /// Print the effective weight table
    Params {
        /// Weight table JSON file
        #[arg(long)]
        params: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::WARN.into()))
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        Commands::New => run_new(),
        Commands::Review {
            card,
            rating,
            now,
            last_review,
            params,
            json,
        } => run_review(&card, rating, now, last_review, params, json),
        Commands::Preview {
            card,
            now,
            last_review,
            params,
            json,
        } => run_preview(&card, now, last_review, params, json),
        Commands::Retrievability { stability, elapsed } => run_retrievability(stability, elapsed),
        Commands::Params { params } => run_params(params),
    }
}

/// Run new command
fn run_new() -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&new_card())?);
    Ok(())
}

/// Run review command
fn run_review(
    card: &str,
    rating: i64,
    now: Option<String>,
    last_review: Option<String>,
    params: Option<PathBuf>,
    json: bool,
) -> anyhow::Result<()> {
    let now = parse_instant(now.as_deref())?;
    let card = load_card(card, last_review.as_deref(), now)?;
    let engine = build_engine(params, now)?;

    let result = engine.review(&card, rating)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("{}", "=== Retain Review ===".cyan().bold());
    println!();
    println!("{}: {}", "Rating".white().bold(), result.rating);
    println!(
        "{}: {:.1}%",
        "Retrievability at review".white().bold(),
        result.retrievability * 100.0
    );
    println!(
        "{}: {:.3} -> {:.3} days",
        "Stability".white().bold(),
        card.stability,
        result.card.stability
    );
    println!(
        "{}: {:.3} -> {:.3}",
        "Difficulty".white().bold(),
        card.difficulty,
        result.card.difficulty
    );
    println!(
        "{}: {} -> {}  {}: {} -> {}",
        "Reps".white().bold(),
        card.reps,
        result.card.reps,
        "Lapses".white().bold(),
        card.lapses,
        result.card.lapses
    );
    print_due(&result);
    println!();
    println!("{}", serde_json::to_string(&result.card)?.dimmed());

    Ok(())
}

/// Run preview command
fn run_preview(
    card: &str,
    now: Option<String>,
    last_review: Option<String>,
    params: Option<PathBuf>,
    json: bool,
) -> anyhow::Result<()> {
    let now = parse_instant(now.as_deref())?;
    let card = load_card(card, last_review.as_deref(), now)?;
    let engine = build_engine(params, now)?;

    let preview = engine.preview(&card);

    if json {
        println!("{}", serde_json::to_string_pretty(&preview)?);
        return Ok(());
    }

    println!("{}", "=== Retain Preview ===".cyan().bold());
    println!(
        "{}: {:.1}%",
        "Current retrievability".white().bold(),
        engine.retrievability_of(&card) * 100.0
    );
    println!();

    for rating in Rating::all() {
        let result = preview.get(rating);
        let label = match rating {
            Rating::Again => rating.as_str().red(),
            Rating::Hard => rating.as_str().yellow(),
            Rating::Good => rating.as_str().green(),
            Rating::Easy => rating.as_str().cyan(),
        };
        println!(
            "  {:6} S {:>9.3}  D {:>6.3}  {:>5} days  due {}",
            label,
            result.card.stability,
            result.card.difficulty,
            result.card.scheduled_days,
            result.due_date.format("%Y-%m-%d")
        );
    }

    Ok(())
}

/// Run retrievability command
fn run_retrievability(stability: f64, elapsed: f64) -> anyhow::Result<()> {
    let r = retrievability(elapsed, stability);
    println!(
        "{}: {:.4} ({:.1}%)",
        "Retrievability".white().bold(),
        r,
        r * 100.0
    );
    Ok(())
}

/// Run params command
fn run_params(params: Option<PathBuf>) -> anyhow::Result<()> {
    let params = load_parameters(params)?;
    println!("{}", serde_json::to_string_pretty(&params)?);
    Ok(())
}

fn print_due(result: &SchedulingResult) {
    let days = result.interval_days();
    let text = format!("{} day{}", days, if days == 1 { "" } else { "s" });
    let colored_days = if days <= 1 {
        text.red()
    } else if days < 7 {
        text.yellow()
    } else {
        text.green()
    };
    println!(
        "{}: {} (due {})",
        "Next interval".white().bold(),
        colored_days,
        result.due_date.format("%Y-%m-%d")
    );
}

/// Engine with the chosen weight table, frozen at `now`
fn build_engine(
    params: Option<PathBuf>,
    now: DateTime<Utc>,
) -> anyhow::Result<SchedulingEngine<FixedClock>> {
    let params = load_parameters(params)?;
    let engine = SchedulingEngine::with_parameters(params)?;
    Ok(engine.with_clock(FixedClock::at(now)))
}

/// Weight table from `--params`, then RETAIN_PARAMS, then the built-in default
fn load_parameters(path: Option<PathBuf>) -> anyhow::Result<FsrsParameters> {
    let path = path.or_else(|| std::env::var_os(PARAMS_ENV).map(PathBuf::from));
    match path {
        Some(path) => FsrsParameters::from_file(&path)
            .with_context(|| format!("loading parameters from {}", path.display())),
        None => Ok(FsrsParameters::default()),
    }
}

fn parse_instant(value: Option<&str>) -> anyhow::Result<DateTime<Utc>> {
    match value {
        Some(s) => Ok(DateTime::parse_from_rfc3339(s)
            .with_context(|| format!("invalid RFC 3339 instant '{}'", s))?
            .with_timezone(&Utc)),
        None => Ok(Utc::now()),
    }
}

/// Parse a card argument, optionally recomputing elapsed days from the last review
fn load_card(
    arg: &str,
    last_review: Option<&str>,
    now: DateTime<Utc>,
) -> anyhow::Result<MemoryCard> {
    let json = match arg.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading card from {}", path))?,
        None => arg.to_string(),
    };
    let mut card: MemoryCard = serde_json::from_str(&json).context("parsing card JSON")?;

    if let Some(last) = last_review {
        let last = parse_instant(Some(last))?;
        if last > now {
            bail!("last review {} is after the review instant {}", last, now);
        }
        card.elapsed_days = days_between(last, now);
        debug!("elapsed days recomputed as {:.3}", card.elapsed_days);
    }

    Ok(card)
}
