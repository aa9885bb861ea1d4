//! Statistics for a single archiver run
//!
//! The crawl engine tallies post outcomes as it goes; the binary prints one
//! summary per run once every run has finished.

use crate::state::{PostOutcome, StopReason};
use std::fmt::Write;
use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Posts whose metadata was written
    pub posts_archived: u64,

    /// Posts rejected by the members filter
    pub posts_filtered: u64,

    /// Posts skipped because their directory already existed
    pub posts_skipped_existing: u64,

    /// Post elements that had not finished rendering when visited
    pub posts_incomplete: u64,

    /// Comment documents written across all posts
    pub comments_saved: u64,

    /// Scroll rounds performed
    pub scroll_rounds: u32,

    /// Why the crawl ended; `None` if it has not ended
    pub stop_reason: Option<StopReason>,

    /// Wall time of the run
    pub elapsed: Duration,
}

impl CrawlStats {
    /// Records how one post was handled
    pub fn record(&mut self, outcome: PostOutcome, comments_saved: usize) {
        match outcome {
            PostOutcome::Archived => self.posts_archived += 1,
            PostOutcome::Filtered => self.posts_filtered += 1,
            PostOutcome::SkippedExisting => self.posts_skipped_existing += 1,
            PostOutcome::NotAPost | PostOutcome::Incomplete => self.posts_incomplete += 1,
        }
        self.comments_saved += comments_saved as u64;
    }

    /// Posts added to the seen-set
    pub fn posts_seen(&self) -> u64 {
        self.posts_archived + self.posts_filtered + self.posts_skipped_existing
    }
}

/// Formats statistics for display
///
/// # Arguments
///
/// * `run` - 1-based run number
/// * `stats` - The statistics to display
pub fn format_statistics(run: usize, stats: &CrawlStats) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "=== Run {} Statistics ===", run);
    let _ = writeln!(out, "  Posts seen: {}", stats.posts_seen());
    let _ = writeln!(out, "  Posts archived: {}", stats.posts_archived);
    let _ = writeln!(out, "  Skipped (already archived): {}", stats.posts_skipped_existing);
    let _ = writeln!(out, "  Filtered (members): {}", stats.posts_filtered);
    if stats.posts_incomplete > 0 {
        let _ = writeln!(out, "  Incomplete renders revisited: {}", stats.posts_incomplete);
    }
    let _ = writeln!(out, "  Comments saved: {}", stats.comments_saved);
    let _ = writeln!(out, "  Scroll rounds: {}", stats.scroll_rounds);
    let _ = writeln!(out, "  Elapsed: {:.1}s", stats.elapsed.as_secs_f64());
    let _ = writeln!(
        out,
        "  Stopped: {}",
        stats
            .stop_reason
            .map(|reason| reason.to_string())
            .unwrap_or_else(|| "did not finish".to_string())
    );

    out
}

/// Prints statistics to stdout
pub fn print_statistics(run: usize, stats: &CrawlStats) {
    print!("{}", format_statistics(run, stats));
}
