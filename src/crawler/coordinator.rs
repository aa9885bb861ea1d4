//! Crawl engine - main archive orchestration logic
//!
//! This module contains the scroll-driven crawl loop, including:
//! - Navigating to the target and installing cookies
//! - Discovering newly rendered, unseen post elements
//! - Dispatching each post to the Post Builder under retry
//! - Scrolling, stall detection and the post cap
//! - Releasing the browser on every exit path

use crate::browser::{
    close_current_tab, launch, BrowserSession, Locator, SettlePoint, SettleWait,
};
use crate::config::ArchiverSettings;
use crate::cookies::{cookies_for_url, load_cookies};
use crate::crawler::builder::{BuildReport, PostBuilder};
use crate::crawler::retry::{classify_post_error, retry, Attempt, Disposition, RetryPolicy};
use crate::crawler::session::CrawlSession;
use crate::extract::post::POST_ELEMENT_ID;
use crate::extract::{post_link, true_comment_count};
use crate::output::CrawlStats;
use crate::state::{PostOutcome, StopReason};
use crate::storage::ArchiveWriter;
use crate::{ArchiveError, ElementQuery};
use std::time::{Duration, Instant};

/// The crawl engine for one run
///
/// Owns the browser session; the seen-set and counters live in a
/// `CrawlSession` created fresh by every call to `run`.
pub struct Archiver<B: BrowserSession> {
    browser: B,
    settings: ArchiverSettings,
    writer: ArchiveWriter,
    settle: SettleWait,
}

impl<B: BrowserSession> Archiver<B> {
    /// Creates an archiver over an already launched browser
    ///
    /// # Arguments
    ///
    /// * `browser` - The browser session to drive
    /// * `settings` - Run settings
    /// * `writer` - Archive writer rooted at the output directory
    pub fn new(browser: B, settings: ArchiverSettings, writer: ArchiveWriter) -> Self {
        let settle = SettleWait::from_timing(&settings.tuning.timing);
        Self {
            browser,
            settings,
            writer,
            settle,
        }
    }

    /// Replaces the settle-wait policy
    pub fn with_settle(mut self, settle: SettleWait) -> Self {
        self.settle = settle;
        self
    }

    pub fn browser(&self) -> &B {
        &self.browser
    }

    pub fn settings(&self) -> &ArchiverSettings {
        &self.settings
    }

    /// Runs the crawl loop until the cap, the end of the feed or a stall
    ///
    /// 1. Navigates to the target URL, installing cookies and reloading if configured
    /// 2. Handles every newly rendered post not yet in the seen-set
    /// 3. Scrolls, closing a single-post view first if one is active
    /// 4. Stops on the post cap, an exhausted feed or too many stalled rounds
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlStats)` - The crawl ended normally
    /// * `Err(ArchiveError)` - A fatal error, or a post that failed every attempt
    pub async fn run(&self) -> Result<CrawlStats, ArchiveError> {
        let start = Instant::now();
        let mut stats = CrawlStats::default();
        let mut session = CrawlSession::new(self.settings.max_posts);

        self.open_target().await?;
        session.set_primary_tab(self.browser.current_tab().await?);

        let stop_reason = self.crawl(&mut session, &mut stats).await?;
        tracing::info!(
            "Crawl stopped ({}): {} posts seen over {} scroll rounds",
            stop_reason,
            session.seen_count(),
            session.rounds()
        );

        stats.stop_reason = Some(stop_reason);
        stats.elapsed = start.elapsed();
        Ok(stats)
    }

    /// Quits the browser, logging any failure
    pub async fn shutdown(&self) {
        if let Err(e) = self.browser.quit().await {
            tracing::warn!("Failed to shut down browser: {}", e);
        }
    }

    async fn open_target(&self) -> Result<(), ArchiveError> {
        let url = &self.settings.url;
        tracing::info!("Opening {}", url);
        self.browser.goto(url).await?;

        if let Some(cookie_path) = &self.settings.cookie_path {
            let cookies = load_cookies(cookie_path)?;
            self.settle.settle(SettlePoint::PageLoad).await;

            let applicable = cookies_for_url(&cookies, url);
            tracing::info!("Installing {} of {} cookies", applicable.len(), cookies.len());
            for cookie in applicable {
                self.browser.add_cookie(cookie).await?;
            }

            self.browser.refresh().await?;
        }

        self.settle.settle(SettlePoint::PageLoad).await;
        Ok(())
    }

    async fn crawl(
        &self,
        session: &mut CrawlSession,
        stats: &mut CrawlStats,
    ) -> Result<StopReason, ArchiveError> {
        let stall_rounds = self.settings.tuning.crawl.stall_rounds;

        loop {
            if session.at_cap() {
                return Ok(self.hit_cap());
            }

            let posts = match self.find_unseen_posts(session).await {
                Ok(posts) => posts,
                Err(e) => {
                    tracing::warn!("Couldn't scan for posts this round: {}", e);
                    Vec::new()
                }
            };

            for (element, url) in posts {
                if session.is_seen(&url) {
                    continue;
                }

                let report = if self.should_skip(&url)? {
                    tracing::info!("Skipping `{}` as it already exists.", url);
                    BuildReport {
                        outcome: PostOutcome::SkippedExisting,
                        comments_saved: 0,
                    }
                } else {
                    self.handle_post(&element, &url).await?
                };

                stats.record(report.outcome, report.comments_saved);
                if report.outcome.marks_seen() {
                    session.mark_seen(url);
                }

                if session.at_cap() {
                    return Ok(self.hit_cap());
                }
            }

            if !self.could_scroll(session).await? {
                tracing::info!("No more posts to visit. Halting.");
                return Ok(StopReason::FeedExhausted);
            }
            self.settle.settle(SettlePoint::Scroll).await;
            stats.scroll_rounds += 1;

            let stalled = session.record_round();
            if stalled >= stall_rounds {
                tracing::info!("No new posts after {} scroll rounds. Halting.", stalled);
                return Ok(StopReason::Stalled);
            }
        }
    }

    fn hit_cap(&self) -> StopReason {
        if let Some(max) = self.settings.max_posts {
            tracing::info!("Hit maximum posts ({}). Halting.", max);
        }
        StopReason::PostCap
    }

    /// Post elements whose canonical URL is not in the seen-set
    async fn find_unseen_posts(
        &self,
        session: &CrawlSession,
    ) -> Result<Vec<(B::Element, String)>, ArchiveError> {
        let mut posts = Vec::new();

        for element in self.browser.find_all(Locator::Id(POST_ELEMENT_ID)).await? {
            let Some((_, url)) = post_link(&element).await? else {
                continue;
            };
            if !session.is_seen(&url) {
                posts.push((element, url));
            }
        }

        tracing::debug!("Found {} unseen posts", posts.len());
        Ok(posts)
    }

    fn should_skip(&self, url: &str) -> Result<bool, ArchiveError> {
        if !self.settings.skip_existing {
            return Ok(false);
        }
        self.writer.contains(url)
    }

    /// Hands one post to the Post Builder, retrying transient failures
    async fn handle_post(&self, element: &B::Element, url: &str) -> Result<BuildReport, ArchiveError> {
        let crawl = &self.settings.tuning.crawl;
        let policy = RetryPolicy::new(
            crawl.post_attempts,
            self.settle.duration(SettlePoint::RetryBackoff),
        );
        let family = self.settings.browser;
        let builder = self.post_builder();

        retry(
            &policy,
            |e| classify_post_error(family, e),
            |attempt| self.attempt_post(&builder, element, url, attempt),
        )
        .await
        .map_err(|e| e.into_archive_error(url))
    }

    async fn attempt_post(
        &self,
        builder: &PostBuilder<'_, B>,
        element: &B::Element,
        url: &str,
        attempt: Attempt,
    ) -> Result<BuildReport, ArchiveError> {
        if attempt.after_nudge {
            self.browser
                .scroll_by(self.settings.tuning.crawl.nudge_step)
                .await?;
        }

        element.scroll_into_view().await?;
        builder.process(element, url).await
    }

    fn post_builder(&self) -> PostBuilder<'_, B> {
        PostBuilder {
            browser: &self.browser,
            writer: &self.writer,
            settle: &self.settle,
            members: self.settings.members,
            comments: &self.settings.comments,
            take_screenshots: self.settings.take_screenshots,
            comment_stall_rounds: self.settings.tuning.crawl.comment_stall_rounds,
            scroll_step: self.settings.tuning.crawl.scroll_step,
        }
    }

    /// Scrolls the feed, or reports that there is nothing left to scroll
    ///
    /// A visible comments panel means the active tab shows a single post. That
    /// tab is closed first; if it was the only tab, the target itself was a
    /// single post and the crawl is over.
    async fn could_scroll(&self, session: &CrawlSession) -> Result<bool, ArchiveError> {
        let policy = RetryPolicy::new(self.settings.tuning.crawl.scroll_attempts, Duration::ZERO);

        retry(
            &policy,
            |e: &ArchiveError| {
                if e.is_fatal() {
                    Disposition::Fatal
                } else {
                    Disposition::Backoff
                }
            },
            |_| self.try_scroll(session),
        )
        .await
        .map_err(|e| e.into_archive_error(&self.settings.url))
    }

    async fn try_scroll(&self, session: &CrawlSession) -> Result<bool, ArchiveError> {
        if true_comment_count(&self.browser).await?.is_some() {
            // A single post's page is showing; fall back to the feed tab if one is left
            if !close_current_tab(&self.browser, &self.settle).await? {
                return Ok(false);
            }
            if let Some(primary) = session.primary_tab() {
                if self.browser.tabs().await?.contains(primary) {
                    self.browser.switch_to_tab(primary).await?;
                }
            }
        }

        self.browser
            .scroll_by(self.settings.tuning.crawl.scroll_step)
            .await?;
        Ok(true)
    }
}

pub async fn run_archiver(settings: &ArchiverSettings) -> Result<CrawlStats, ArchiveError> {
    let writer = ArchiveWriter::new(&settings.output_dir)?;
    let browser = launch(settings).await?;
    let archiver = Archiver::new(browser, settings.clone(), writer);

    let result = tokio::select! {
        result = archiver.run() => result,
        _ = tokio::signal::ctrl_c() => Err(ArchiveError::Interrupted),
    };

    archiver.shutdown().await;
    result
}
