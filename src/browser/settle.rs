//! Named settle waits
//!
//! The page never tells us when asynchronous rendering has finished, so every
//! action that triggers rendering is followed by a fixed pause. Each pause has
//! a name so its duration is tuned in one place.

use crate::config::TimingConfig;
use std::time::Duration;

/// Points in the crawl where rendering must be allowed to catch up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlePoint {
    /// After navigation, refresh or opening a tab
    PageLoad,
    /// After clicking a poll entry
    PollReveal,
    /// After closing an auxiliary tab
    TabClose,
    /// After scrolling the window
    Scroll,
    /// Between failed attempts at the same post
    RetryBackoff,
}

/// Settle-wait policy: minimum time to let pass at each `SettlePoint`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettleWait {
    page_load: Duration,
    poll_reveal: Duration,
    tab_close: Duration,
    scroll: Duration,
    retry_backoff: Duration,
}

impl SettleWait {
    /// Builds the policy from configured millisecond timings
    pub fn from_timing(timing: &TimingConfig) -> Self {
        Self {
            page_load: Duration::from_millis(timing.page_load_ms),
            poll_reveal: Duration::from_millis(timing.poll_reveal_ms),
            tab_close: Duration::from_millis(timing.tab_close_ms),
            scroll: Duration::from_millis(timing.scroll_ms),
            retry_backoff: Duration::from_millis(timing.retry_backoff_ms),
        }
    }

    /// A policy that never waits (for tests against a synchronous DOM)
    pub fn immediate() -> Self {
        Self {
            page_load: Duration::ZERO,
            poll_reveal: Duration::ZERO,
            tab_close: Duration::ZERO,
            scroll: Duration::ZERO,
            retry_backoff: Duration::ZERO,
        }
    }

    pub fn duration(&self, point: SettlePoint) -> Duration {
        match point {
            SettlePoint::PageLoad => self.page_load,
            SettlePoint::PollReveal => self.poll_reveal,
            SettlePoint::TabClose => self.tab_close,
            SettlePoint::Scroll => self.scroll,
            SettlePoint::RetryBackoff => self.retry_backoff,
        }
    }

    /// Waits at least the configured time for `point`
    pub async fn settle(&self, point: SettlePoint) {
        let duration = self.duration(point);
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

impl Default for SettleWait {
    fn default() -> Self {
        Self::from_timing(&TimingConfig::default())
    }
}
