//! Per-run crawl state

use crate::browser::TabId;
use std::collections::HashSet;

/// Mutable state owned by one run of the crawl engine
///
/// Bundles the seen-set, the primary tab handle and the stall counter so
/// they are passed around explicitly.
#[derive(Debug, Default)]
pub struct CrawlSession {
    seen: HashSet<String>,
    max_posts: Option<usize>,
    primary_tab: Option<TabId>,
    stalled_rounds: u32,
    seen_at_last_round: usize,
    rounds: u32,
}

impl CrawlSession {
    pub fn new(max_posts: Option<usize>) -> Self {
        Self {
            max_posts,
            ..Self::default()
        }
    }

    pub fn is_seen(&self, url: &str) -> bool {
        self.seen.contains(url)
    }

    /// Adds `url` to the seen-set; returns false if it was already there
    pub fn mark_seen(&mut self, url: impl Into<String>) -> bool {
        self.seen.insert(url.into())
    }

    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    /// Returns true once the seen-set has reached the post cap
    pub fn at_cap(&self) -> bool {
        self.max_posts.is_some_and(|max| self.seen.len() >= max)
    }

    pub fn set_primary_tab(&mut self, tab: TabId) {
        self.primary_tab = Some(tab);
    }

    pub fn primary_tab(&self) -> Option<&TabId> {
        self.primary_tab.as_ref()
    }

    /// Closes a scroll round and returns the consecutive stalled-round count
    ///
    /// A round is stalled when the seen-set did not grow since the previous
    /// round; any growth resets the counter.
    pub fn record_round(&mut self) -> u32 {
        self.rounds += 1;

        if self.seen.len() == self.seen_at_last_round {
            self.stalled_rounds += 1;
        } else {
            self.stalled_rounds = 0;
        }
        self.seen_at_last_round = self.seen.len();

        self.stalled_rounds
    }

    pub fn stalled_rounds(&self) -> u32 {
        self.stalled_rounds
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }
}
