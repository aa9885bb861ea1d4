//! Output module for reporting crawl results
//!
//! This module handles the end-of-run statistics summary.

pub mod stats;

pub use stats::{format_statistics, print_statistics, CrawlStats};
