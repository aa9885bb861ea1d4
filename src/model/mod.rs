//! Archived record types
//!
//! - `Post`: one feed item with its text, media and engagement metadata
//! - `Poll` / `PollEntry`: an embedded multiple-choice widget
//! - `Comment`: one top-level comment thread row
//!
//! Records are built once, after every extraction step for them has
//! finished, and are never mutated afterwards.

mod comment;
mod post;

pub use comment::Comment;
pub use post::{Poll, PollEntry, Post};

use chrono::{DateTime, Utc};

/// Timestamp recorded on every archived record
pub fn archival_timestamp() -> DateTime<Utc> {
    Utc::now()
}
