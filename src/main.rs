use anyhow::{Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod dataset;
mod error;
mod models;
mod playlist;
mod user;

#[cfg(test)]
mod user_tests;

use crate::config::load_config;
use crate::dataset::ScanPolicy;
use crate::models::Song;
use crate::playlist::{Preferences, PlaylistSummary, SortField};
use crate::user::{PlaybackSink, User};

#[derive(Parser)]
#[command(name = "playlist-queue")]
#[command(about = "Filter a tab-delimited song catalog by preferences and build a playback queue")]
#[command(version)]
struct Args {
    /// Path to the tab-separated dataset (overrides DATASET_PATH)
    #[arg(short = 'f', long = "dataset")]
    dataset: Option<String>,

    /// Preferences JSON file (overrides PREFERENCES_PATH)
    #[arg(short = 'p', long = "preferences")]
    preferences_file: Option<String>,

    /// Exact genre to keep, or "none"
    #[arg(long)]
    genre: Option<String>,

    /// Minimum popularity (0-100), or "none"
    #[arg(long = "min-popularity")]
    min_popularity: Option<String>,

    /// Maximum duration in milliseconds, or "none"
    #[arg(long = "max-duration")]
    max_duration: Option<String>,

    /// Explicit flag to require (true/false), or "none"
    #[arg(long)]
    explicit: Option<String>,

    /// Extra preference as dimension=value, may be repeated
    #[arg(long = "pref")]
    prefs: Vec<String>,

    /// Sort the queue by this field instead of shuffling
    #[arg(short = 's', long = "sort-by")]
    sort_by: Option<String>,

    /// Sort descending
    #[arg(short = 'r', long)]
    reverse: bool,

    /// Number of songs in the queue (overrides QUEUE_LENGTH)
    #[arg(short = 'n', long)]
    length: Option<usize>,

    /// Seed for the shuffle, for repeatable queues
    #[arg(long)]
    seed: Option<u64>,

    /// Second dataset whose matches are merged into the playlist
    #[arg(long = "merge")]
    merge_dataset: Option<String>,

    /// Drop a song from the playlist, given as ARTIST::TRACK; may be repeated
    #[arg(long = "remove")]
    remove: Vec<String>,

    /// Order the playlist by popularity before building the queue (asc or desc)
    #[arg(long = "order")]
    order: Option<String>,

    /// Abort on the first malformed dataset line instead of skipping it
    #[arg(long)]
    strict: bool,

    /// Play this many songs from the front of the queue
    #[arg(long, default_value_t = 0)]
    play: usize,

    /// Enable debug logging
    #[arg(short = 'd', long = "debug")]
    debug: bool,

    /// Quiet mode - only warnings and errors
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,
}

/// Playback consumer that announces songs on stdout
struct StdoutSink;

impl PlaybackSink for StdoutSink {
    fn play(&mut self, song: &Song) -> Result<()> {
        println!("▶ Now playing: {song}");
        Ok(())
    }
}

fn init_tracing(args: &Args) {
    let default_level = if args.debug {
        "debug"
    } else if args.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();
}

fn build_preferences(args: &Args, file: Option<&str>) -> Result<Preferences> {
    let mut assignments: Vec<String> = Vec::new();
    let typed = [
        ("genre", &args.genre),
        ("popularity", &args.min_popularity),
        ("duration", &args.max_duration),
        ("explicit", &args.explicit),
    ];
    for (dimension, value) in typed {
        if let Some(value) = value {
            assignments.push(format!("{dimension}={value}"));
        }
    }
    assignments.extend(args.prefs.iter().cloned());

    let preferences = match file {
        Some(path) => Preferences::load_from_file(path)
            .with_context(|| format!("Failed to load preferences from '{path}'"))?
            .with_assignments(&assignments)?,
        None => Preferences::from_assignments(&assignments)?,
    };
    Ok(preferences)
}

/// Split a `--remove` value into artist and track
fn parse_remove(entry: &str) -> Result<(&str, &str)> {
    match entry.split_once("::") {
        Some((artist, track)) if !artist.trim().is_empty() && !track.trim().is_empty() => {
            Ok((artist.trim(), track.trim()))
        }
        _ => anyhow::bail!("Invalid --remove '{entry}', expected ARTIST::TRACK"),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args);

    let config = load_config()?;
    let dataset_path = args.dataset.clone().unwrap_or(config.dataset_path);
    let preferences_file = args.preferences_file.clone().or(config.preferences_path);
    let length = args.length.unwrap_or(config.queue_length);

    // Reject a bad sort field before touching the dataset
    let sort_field = args
        .sort_by
        .as_deref()
        .map(str::parse::<SortField>)
        .transpose()?;

    let ascending = match args.order.as_deref().map(str::to_lowercase).as_deref() {
        None => None,
        Some("asc") | Some("ascending") => Some(true),
        Some("desc") | Some("descending") => Some(false),
        Some(other) => anyhow::bail!("Unknown playlist order '{other}', expected asc or desc"),
    };

    let removals = args
        .remove
        .iter()
        .map(|entry| parse_remove(entry))
        .collect::<Result<Vec<_>>>()?;

    let preferences = build_preferences(&args, preferences_file.as_deref())?;
    if preferences.is_empty() {
        info!("No preferences set, every song matches");
    } else {
        info!("Using preferences: {:?}", preferences);
    }

    let mut user = User::new("listener", preferences);
    let policy = if args.strict {
        ScanPolicy::Strict
    } else {
        ScanPolicy::SkipMalformed
    };
    // Only a dataset that cannot be opened is fatal, a partial read is kept
    let report = user
        .load_matches_from_path(&dataset_path, policy)
        .with_context(|| format!("Failed to open dataset '{dataset_path}'"))?;

    if let Some(merge_path) = &args.merge_dataset {
        let mut other = User::new("merge", user.preferences.clone());
        other
            .load_matches_from_path(merge_path, policy)
            .with_context(|| format!("Failed to open dataset '{merge_path}'"))?;
        let before = user.playlist.len();
        user.playlist = user.playlist.union(&other.playlist);
        info!(
            "Merged '{}': playlist grew from {} to {} songs",
            merge_path,
            before,
            user.playlist.len()
        );
    }

    for (artist, track) in removals {
        match user.playlist.remove(artist, track) {
            Ok(song) => info!("Removed {song}"),
            Err(e) => warn!("{e}"),
        }
    }

    if let Some(ascending) = ascending {
        user.playlist.sort_by_popularity(ascending);
    }

    let summary = PlaylistSummary::from_songs(&user.playlist);
    println!("\n=== PLAYLIST ===");
    println!(
        "Scanned {} songs ({} malformed lines skipped), {} matched, {} in playlist",
        report.scanned,
        report.skipped,
        report.matched,
        user.playlist.len()
    );
    if report.duplicates > 0 {
        println!("Ignored {} duplicate track names", report.duplicates);
    }
    if !user.playlist.is_empty() {
        let total_secs = summary.total_duration_ms / 1000;
        println!(
            "Duration: {}m{}s | Avg popularity: {:.1} | Artists: {} | Explicit: {}",
            total_secs / 60,
            total_secs % 60,
            summary.average_popularity,
            summary.artist_count,
            summary.explicit_count
        );
        if let Some((genre, count)) = summary.top_genre() {
            println!("Top genre: {genre} ({count})");
        }
        if let Some(bpm) = summary.average_bpm {
            println!("Avg BPM: {bpm:.0}");
        }
    }

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let queue = user.refresh_queue(sort_field, length, args.reverse, &mut rng);

    println!("\n=== QUEUE ({} songs) ===", queue.len());
    if queue.is_empty() {
        println!("Nothing to play - no songs matched the preferences.");
    }
    for (i, song) in queue.iter().enumerate() {
        println!("  {}. {}", i + 1, song);
    }
    if let Some(song) = queue.now_playing() {
        println!("\nNow playing: {song}");
    }
    if let Some(song) = queue.up_next() {
        println!("Up next: {song}");
    }

    if args.play > 0 {
        let mut sink = StdoutSink;
        for _ in 0..args.play {
            if user.play_next(&mut sink)?.is_none() {
                break;
            }
        }
    }

    Ok(())
}
