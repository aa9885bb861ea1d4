//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PostOutcome`: how handling a single feed post ended (archived, filtered, skipped, retry later)
//! - `StopReason`: why the crawl loop stopped

mod post_outcome;
mod stop_reason;

// Re-export main types
pub use post_outcome::PostOutcome;
pub use stop_reason::StopReason;
