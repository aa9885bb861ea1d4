//! Per-post outcome definitions
//!
//! This module defines every way handling a single feed post can end.
use std::fmt;

/// Result of handing one post to the Post Builder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostOutcome {
    // ===== Success States =====
    /// Post metadata was written (comments and screenshot are best-effort)
    Archived,

    // ===== Skip States =====
    /// Post did not pass the members filter
    Filtered,

    /// Post directory already existed and skip-existing is enabled
    SkippedExisting,

    // ===== Retry-Later States =====
    /// Element carried no canonical post link
    NotAPost,

    /// Element has not finished rendering its text region
    Incomplete,
}

impl PostOutcome {
    /// Returns true if the post should be added to the seen-set
    ///
    /// Elements that were not real posts, or had not finished rendering, are
    /// left out so a later pass can pick them up again.
    pub fn marks_seen(&self) -> bool {
        matches!(self, Self::Archived | Self::Filtered | Self::SkippedExisting)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Archived => "archived",
            Self::Filtered => "filtered",
            Self::SkippedExisting => "skipped_existing",
            Self::NotAPost => "not_a_post",
            Self::Incomplete => "incomplete",
        }
    }
}

impl fmt::Display for PostOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
