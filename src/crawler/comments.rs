//! Comment Collector
//!
//! Scrolls a post's comment section, saving every thread that matches the
//! requested categories until the cap is hit or scrolling stops producing
//! new threads.

use crate::browser::{BrowserSession, ElementQuery, Locator, SettlePoint, SettleWait};
use crate::config::CommentSelection;
use crate::extract::comment::COMMENT_THREAD_TAG;
use crate::extract::{extract_comment, matches_categories, thread_link};
use crate::storage::ArchiveWriter;
use crate::ArchiveError;
use std::collections::HashSet;

pub struct CommentCollector<'a, B: BrowserSession> {
    pub browser: &'a B,
    pub writer: &'a ArchiveWriter,
    pub settle: &'a SettleWait,
    pub selection: &'a CommentSelection,
    /// Consecutive empty scroll rounds before giving up
    pub stall_rounds: u32,
    pub scroll_step: i64,
}

impl<'a, B: BrowserSession> CommentCollector<'a, B> {
    /// Saves matching comments of the active post view under `post_url`
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - Number of comment documents written
    /// * `Err(ArchiveError)` - A DOM interaction failed
    pub async fn collect(&self, post_url: &str) -> Result<usize, ArchiveError> {
        let mut seen = HashSet::new();
        let mut saved = 0;
        let mut stalled = 0;

        let mut batch = self.unseen_threads(&seen).await?;
        if batch.is_empty() {
            tracing::debug!("No comments rendered for `{}`", post_url);
            return Ok(0);
        }

        loop {
            for (thread, link) in batch {
                if !matches_categories(&thread, self.selection).await? {
                    seen.insert(link);
                    continue;
                }

                if self.selection.cap_reached(saved) {
                    return Ok(saved);
                }

                thread.scroll_into_view().await?;
                seen.insert(link.clone());

                let comment = extract_comment(&thread, &link).await?;
                if self.writer.save_comment(post_url, &comment).await?.is_some() {
                    saved += 1;
                }

                if self.selection.cap_reached(saved) {
                    tracing::info!("Saved maximum comments ({}) for `{}`", saved, post_url);
                    return Ok(saved);
                }
            }

            self.browser.scroll_by(self.scroll_step).await?;
            self.settle.settle(SettlePoint::Scroll).await;

            batch = self.unseen_threads(&seen).await?;
            if batch.is_empty() {
                stalled += 1;
                if stalled >= self.stall_rounds {
                    break;
                }
            } else {
                stalled = 0;
            }
        }

        tracing::info!("Saved {} comments for `{}`", saved, post_url);
        Ok(saved)
    }

    /// Rendered comment threads whose permalink has not been visited yet
    async fn unseen_threads(
        &self,
        seen: &HashSet<String>,
    ) -> Result<Vec<(B::Element, String)>, ArchiveError> {
        let mut threads = Vec::new();

        for thread in self.browser.find_all(Locator::Tag(COMMENT_THREAD_TAG)).await? {
            let Some(link) = thread_link(&thread).await? else {
                continue;
            };
            if !seen.contains(&link) {
                threads.push((thread, link));
            }
        }

        Ok(threads)
    }
}
