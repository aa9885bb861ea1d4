//! Configuration module for Community-Archiver
//!
//! Run settings are assembled by the binary from command-line flags; timings
//! and crawl thresholds can additionally be loaded from a TOML tuning file.
//!
//! # Example
//!
//! ```no_run
//! use community_archiver::config::load_tuning;
//! use std::path::Path;
//!
//! let tuning = load_tuning(Path::new("tuning.toml")).unwrap();
//! println!("Feed stalls after {} rounds", tuning.crawl.stall_rounds);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    ArchiverSettings, CommentCategory, CommentSelection, CrawlTuning, MembersFilter, TimingConfig,
    Tuning, DEFAULT_OUTPUT_DIR,
};

// Re-export parser and validation functions
pub use parser::{compute_tuning_hash, load_tuning, load_tuning_with_hash, parse_tuning};
pub use validation::{validate, validate_tuning};
