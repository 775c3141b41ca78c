use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use rand::SeedableRng;
use rand::rngs::StdRng;
use snapshot::{TasteSnapshotReader, DEFAULT_SAMPLE_SIZE};
use std::path::PathBuf;
use std::time::Instant;
use store::{read_event_log, replay_events, JsonFileRepository, TasteRepository};
use taste_model::{UserId, UserTaste};
use tracing::info;

/// taste - per-user taste model tooling
#[derive(Parser)]
#[command(name = "taste")]
#[command(about = "Replay, inspect and snapshot per-user taste state", long_about = None)]
struct Cli {
    /// Path to the JSON state file
    #[arg(short, long, default_value = "data/taste-state.json")]
    state: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a JSON-lines event log on top of the stored state
    Replay {
        /// Event log to apply
        #[arg(long)]
        events: PathBuf,
    },

    /// Show a user's watch ledger, genre scores and likes
    Profile {
        /// User ID to display
        #[arg(long)]
        user_id: UserId,
    },

    /// Print the recommendation-seed snapshot for a user as JSON
    Snapshot {
        /// User ID to snapshot
        #[arg(long)]
        user_id: UserId,

        /// Number of liked movies to sample
        #[arg(long, default_value_t = DEFAULT_SAMPLE_SIZE)]
        sample_size: usize,

        /// Seed for a reproducible sample
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let repo = JsonFileRepository::open(&cli.state)
        .with_context(|| format!("Failed to open state file {}", cli.state.display()))?;

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Replay { events } => handle_replay(&repo, events)?,
        Commands::Profile { user_id } => handle_profile(&repo, user_id)?,
        Commands::Snapshot {
            user_id,
            sample_size,
            seed,
        } => handle_snapshot(&repo, user_id, sample_size, seed)?,
    }

    Ok(())
}

/// Handle the 'replay' command
fn handle_replay(repo: &JsonFileRepository, events_path: PathBuf) -> Result<()> {
    let start = Instant::now();

    let events = read_event_log(&events_path)
        .with_context(|| format!("Failed to read event log {}", events_path.display()))?;
    info!(events = events.len(), "loaded event log");

    let summary = replay_events(repo, &events).context("Failed to replay event log")?;

    println!(
        "{} Replayed {} events for {} users in {:?}",
        "✓".green(),
        summary.events,
        summary.users,
        start.elapsed()
    );
    Ok(())
}

/// Handle the 'profile' command
fn handle_profile(repo: &JsonFileRepository, user_id: UserId) -> Result<()> {
    let stored = repo
        .load(user_id)
        .with_context(|| format!("Failed to load user {}", user_id))?;
    print_profile(&stored.value, stored.version);
    Ok(())
}

/// Handle the 'snapshot' command
fn handle_snapshot(
    repo: &JsonFileRepository,
    user_id: UserId,
    sample_size: usize,
    seed: Option<u64>,
) -> Result<()> {
    let taste = repo
        .load(user_id)
        .with_context(|| format!("Failed to load user {}", user_id))?
        .value;

    let reader = TasteSnapshotReader::new().with_sample_size(sample_size);
    let snapshot = match seed {
        Some(seed) => reader.build(&taste, &mut StdRng::seed_from_u64(seed)),
        None => reader.build_with_thread_rng(&taste),
    };

    let json = serde_json::to_string_pretty(&snapshot).context("Failed to encode snapshot")?;
    println!("{}", json);
    Ok(())
}

/// Helper function to format and print a user's taste state
fn print_profile(taste: &UserTaste, version: u64) {
    println!(
        "{}",
        format!("User ID: {} (version {})", taste.user_id, version)
            .bold()
            .blue()
    );
    println!("{}B-movie lover: {}", "• ".green(), taste.flags.is_b_lover);
    println!("{}Hipster: {}", "• ".green(), taste.flags.is_hipster);

    println!("{}", "Genre preferences:".bold());
    if taste.affinity.is_empty() {
        println!("  (none)");
    }
    for (genre, score) in taste.affinity.ranked() {
        let score_str = if score < 0 {
            score.to_string().red()
        } else {
            score.to_string().green()
        };
        println!("  - {}: {}", genre, score_str);
    }

    println!("{}", "Watched movies:".bold());
    if taste.watched.is_empty() {
        println!("  (none)");
    }
    for (movie_id, count) in taste.watched.counts() {
        println!("  - {} x{}", movie_id, count);
    }

    let liked = taste
        .liked
        .iter()
        .map(|m| m.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    println!("{}Liked movies: [{}]", "• ".cyan(), liked);
}
