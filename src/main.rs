//! Community-Archiver main entry point
//!
//! This is the command-line interface for archiving a creator's community feed.

use anyhow::Context;
use clap::Parser;
use community_archiver::config::{
    load_tuning_with_hash, validate, ArchiverSettings, CommentCategory, CommentSelection,
    MembersFilter, Tuning, DEFAULT_OUTPUT_DIR,
};
use community_archiver::crawler::run_archiver;
use community_archiver::output::print_statistics;
use community_archiver::BrowserFamily;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Community-Archiver: archives community posts, polls and comments
///
/// Drives a real browser over WebDriver, scrolls the feed at URL and writes
/// one directory per post under the output directory.
#[derive(Parser, Debug)]
#[command(name = "community-archiver")]
#[command(version)]
#[command(about = "Archives a creator's community feed", long_about = None)]
struct Cli {
    /// Feed or single-post URL to archive
    #[arg(value_name = "URL")]
    url: String,

    /// Directory to write archive units to
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Browser profile directory to reuse (e.g. ~/.config/chromium)
    #[arg(short, long)]
    profile_dir: Option<PathBuf>,

    /// Profile name inside the profile directory (chrome only)
    #[arg(short = 'n', long)]
    profile_name: Option<String>,

    /// Netscape-format cookie file to install before crawling
    #[arg(short, long)]
    cookie_path: Option<PathBuf>,

    /// How many times to run the archiver
    #[arg(short, long, default_value_t = 1)]
    rerun: i64,

    /// Stop after this many posts have been seen
    #[arg(short, long)]
    max_posts: Option<usize>,

    /// Browser to drive
    #[arg(short = 'd', long = "driver", value_enum, default_value_t = BrowserFamily::Chrome)]
    driver: BrowserFamily,

    /// Path to the browser binary
    #[arg(long)]
    binary_override: Option<String>,

    /// WebDriver server endpoint (defaults to localhost:9515 for chrome, localhost:4444 for firefox)
    #[arg(long)]
    webdriver_url: Option<String>,

    /// Only archive members posts, or skip them
    #[arg(long, value_enum)]
    members: Option<MembersFilter>,

    /// Show the browser window
    #[arg(long)]
    not_headless: bool,

    /// Save a screenshot of every post
    #[arg(long)]
    take_screenshots: bool,

    /// Comment categories to save
    #[arg(long, value_enum, num_args = 1..)]
    save_comments: Vec<CommentCategory>,

    /// Maximum comments to save per post
    #[arg(long)]
    max_comments: Option<usize>,

    /// Skip posts that already have an archive directory
    #[arg(long)]
    skip_existing: bool,

    /// TOML file with timing and crawl threshold overrides
    #[arg(long, value_name = "FILE")]
    tuning: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let tuning = match &cli.tuning {
        Some(path) => {
            let (tuning, hash) = load_tuning_with_hash(path)
                .with_context(|| format!("Failed to load tuning from {}", path.display()))?;
            tracing::info!("Tuning loaded from {} (hash: {})", path.display(), hash);
            tuning
        }
        None => Tuning::default(),
    };

    let rerun = cli.rerun.max(1);
    let settings = build_settings(cli, tuning)?;
    validate(&settings).context("Invalid settings")?;

    println!("Running the archiver {} time(s) on `{}`...", rerun, settings.url);

    let mut all_stats = Vec::new();
    for run in 1..=rerun {
        if rerun > 1 {
            println!("===== Run {} =====", run);
        }

        match run_archiver(&settings).await {
            Ok(stats) => all_stats.push(stats),
            Err(e) => {
                tracing::error!("Encountered a fatal error: {}", e);
                let mut source = std::error::Error::source(&e);
                while let Some(cause) = source {
                    tracing::error!("  caused by: {}", cause);
                    source = cause.source();
                }
                std::process::exit(1);
            }
        }
    }

    for (index, stats) in all_stats.iter().enumerate() {
        print_statistics(index + 1, stats);
    }
    println!("Done!");

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("community_archiver=info,warn"),
            1 => EnvFilter::new("community_archiver=debug,info"),
            2 => EnvFilter::new("community_archiver=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Splits a pasted URL argument the way a POSIX shell would and returns the first word
///
/// Returns `None` for blank input or an unterminated quote.
fn first_word(raw: &str) -> Option<String> {
    let mut word = String::new();
    let mut started = false;
    let mut chars = raw.trim_start().chars();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => break,
            '\\' => {
                started = true;
                match chars.next() {
                    Some('\n') | None => {}
                    Some(escaped) => word.push(escaped),
                }
            }
            '\'' => {
                started = true;
                loop {
                    match chars.next()? {
                        '\'' => break,
                        quoted => word.push(quoted),
                    }
                }
            }
            '"' => {
                started = true;
                loop {
                    match chars.next()? {
                        '"' => break,
                        '\\' => match chars.next()? {
                            escaped @ ('"' | '\\' | '$' | '`') => word.push(escaped),
                            '\n' => {}
                            other => {
                                word.push('\\');
                                word.push(other);
                            }
                        },
                        quoted => word.push(quoted),
                    }
                }
            }
            other => {
                started = true;
                word.push(other);
            }
        }
    }

    started.then_some(word)
}

fn build_settings(cli: Cli, tuning: Tuning) -> anyhow::Result<ArchiverSettings> {
    let url = first_word(&cli.url)
        .with_context(|| format!("Could not read a URL from `{}`", cli.url))?;

    Ok(ArchiverSettings {
        output_dir: cli.output_dir,
        profile_dir: cli.profile_dir,
        profile_name: cli.profile_name,
        cookie_path: cli.cookie_path,
        browser: cli.driver,
        binary_override: cli.binary_override,
        webdriver_url: cli.webdriver_url,
        headless: !cli.not_headless,
        max_posts: cli.max_posts,
        members: cli.members,
        comments: CommentSelection::new(cli.save_comments, cli.max_comments),
        take_screenshots: cli.take_screenshots,
        skip_existing: cli.skip_existing,
        tuning,
        ..ArchiverSettings::new(url)
    })
}
