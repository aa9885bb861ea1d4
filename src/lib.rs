//! Community-Archiver: archives a creator's community feed from a live browser
//!
//! This crate drives a real browser over WebDriver, scrolls an infinitely
//! loading community feed, extracts posts, polls and comments from the rendered
//! DOM and writes them to an on-disk archive keyed by post identity.

pub mod browser;
pub mod config;
pub mod cookies;
pub mod crawler;
pub mod extract;
pub mod model;
pub mod output;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for archiver operations
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("DOM error: {0}")]
    Dom(#[from] DomError),

    #[error("Cookies path at {path} doesn't exist")]
    CookieFileMissing { path: String },

    #[error("Could not derive a post id from {url}")]
    InvalidPostUrl { url: String },

    #[error("Failed to launch browser: {0}")]
    Browser(String),

    #[error("Interrupted by operator")]
    Interrupted,

    #[error("Gave up on {url} after {attempts} attempts: {source}")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        source: Box<ArchiveError>,
    },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ArchiveError {
    /// Returns true for configuration and environment failures
    ///
    /// These abort the run immediately; retrying the same post cannot fix them.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Config(_)
                | Self::CookieFileMissing { .. }
                | Self::InvalidPostUrl { .. }
                | Self::Browser(_)
                | Self::Interrupted
        )
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Errors raised while talking to the rendered page
///
/// The browser adapter folds driver-specific failures into these few kinds so
/// the crawl engine can decide how to recover.
#[derive(Debug, Error)]
pub enum DomError {
    #[error("Element is no longer attached to the page: {0}")]
    Stale(String),

    #[error("Move target out of bounds: {0}")]
    OutOfBounds(String),

    #[error("No such element: {0}")]
    NoSuchElement(String),

    #[error("Script failed: {0}")]
    Script(String),

    #[error("Driver error: {0}")]
    Driver(String),
}

/// Result type alias for archiver operations
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for DOM operations
pub type DomResult<T> = std::result::Result<T, DomError>;

// Re-export commonly used types
pub use browser::{BrowserFamily, BrowserSession, ElementQuery, Locator};
pub use config::ArchiverSettings;
pub use crawler::Archiver;
pub use model::{Comment, Poll, PollEntry, Post};
pub use state::{PostOutcome, StopReason};
pub use storage::ArchiveWriter;
