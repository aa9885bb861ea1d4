use std::fmt;

/// Why a crawl loop ended without error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// The seen-set reached the configured post cap
    PostCap,

    /// The active view was a single post with no tab to fall back to
    FeedExhausted,

    /// Too many consecutive scroll rounds produced no new post
    Stalled,
}

impl StopReason {
    pub fn description(&self) -> &'static str {
        match self {
            Self::PostCap => "hit maximum posts",
            Self::FeedExhausted => "no more posts to visit",
            Self::Stalled => "feed stopped producing new posts",
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}
