//! Post Builder
//!
//! Turns one feed-rendered post element into a persisted `Post`. When the feed
//! view lacks the true comment count, the post's own page is opened in an
//! auxiliary tab for the count, the screenshot and the comments.

use crate::browser::{BrowserSession, ElementQuery, Locator, SettlePoint, SettleWait, TabId};
use crate::config::{CommentSelection, MembersFilter};
use crate::crawler::comments::CommentCollector;
use crate::extract::{
    approximate_comment_count, find_post_element, is_members_post, like_count, post_images,
    post_link, post_links, post_text, resolve_poll, true_comment_count,
};
use crate::model::{archival_timestamp, Post};
use crate::state::PostOutcome;
use crate::storage::ArchiveWriter;
use crate::ArchiveError;

/// What handling one post produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildReport {
    pub outcome: PostOutcome,
    pub comments_saved: usize,
}

impl BuildReport {
    fn skipped(outcome: PostOutcome) -> Self {
        Self {
            outcome,
            comments_saved: 0,
        }
    }
}

/// Per-post extraction and persistence
pub struct PostBuilder<'a, B: BrowserSession> {
    pub browser: &'a B,
    pub writer: &'a ArchiveWriter,
    pub settle: &'a SettleWait,
    pub members: Option<MembersFilter>,
    pub comments: &'a CommentSelection,
    pub take_screenshots: bool,
    pub comment_stall_rounds: u32,
    pub scroll_step: i64,
}

impl<'a, B: BrowserSession> PostBuilder<'a, B> {
    /// Extracts, filters and persists the post rendered by `element`
    ///
    /// Filtered and incomplete posts are reported through `PostOutcome`, not
    /// as errors. If an auxiliary tab is opened it is always closed again and
    /// focus returns to the tab that was active on entry.
    ///
    /// # Arguments
    ///
    /// * `element` - The feed's post element
    /// * `url` - The post's canonical URL, as found by the caller
    ///
    /// # Returns
    ///
    /// * `Ok(BuildReport)` - How the post was handled and how many comments were saved
    /// * `Err(ArchiveError)` - A DOM interaction failed; the caller may retry
    pub async fn process(&self, element: &B::Element, url: &str) -> Result<BuildReport, ArchiveError> {
        tracing::info!("Handling `{}`", url);

        let Some((anchor, _)) = post_link(element).await? else {
            tracing::debug!("Element has no post link");
            return Ok(BuildReport::skipped(PostOutcome::NotAPost));
        };
        let relative_date = anchor.text().await?;

        let is_members = is_members_post(element).await?;
        if !MembersFilter::admits(self.members, is_members) {
            if is_members {
                tracing::info!("Skipping as it is a members post and no-members is configured.");
            } else {
                tracing::info!("Skipping as it is not a members post and members-only is configured.");
            }
            return Ok(BuildReport::skipped(PostOutcome::Filtered));
        }

        let Some(text) = post_text(element).await? else {
            tracing::debug!("Post text has not rendered yet; leaving `{}` for a later pass", url);
            return Ok(BuildReport::skipped(PostOutcome::Incomplete));
        };

        let links = post_links(element).await?;
        let images = post_images(element).await?;
        let approximate_num_comments = approximate_comment_count(element).await?;
        let num_thumbs_up = like_count(element).await?;
        let poll = resolve_poll(self.browser, element, self.settle).await?;

        let draft = Post {
            url: url.to_string(),
            text,
            images,
            links,
            is_members,
            relative_date,
            approximate_num_comments,
            num_comments: None,
            num_thumbs_up,
            poll,
            when_archived: archival_timestamp(),
        };

        if let Some(num_comments) = true_comment_count(self.browser).await? {
            return self
                .finish(draft, Some(num_comments), Some(element.clone()))
                .await;
        }

        // The feed view has no comments panel; load the post on its own page
        let origin = self.browser.current_tab().await?;
        self.browser.open_tab().await?;

        let result = self.finish_in_tab(draft).await;
        let closed = self.close_aux_tab(&origin).await;

        match (result, closed) {
            (Ok(report), Ok(())) => Ok(report),
            (Ok(_), Err(e)) => Err(e),
            (Err(e), closed) => {
                if let Err(close_error) = closed {
                    tracing::warn!("Couldn't close auxiliary tab: {}", close_error);
                }
                Err(e)
            }
        }
    }

    async fn finish_in_tab(&self, draft: Post) -> Result<BuildReport, ArchiveError> {
        self.browser.goto(&draft.url).await?;
        self.settle.settle(SettlePoint::PageLoad).await;

        let full_post = find_post_element(self.browser).await?;
        let num_comments = true_comment_count(self.browser).await?;
        self.finish(draft, num_comments, full_post).await
    }

    /// Persists the post, then screenshot and comments from the active view
    async fn finish(
        &self,
        draft: Post,
        num_comments: Option<String>,
        full_post: Option<B::Element>,
    ) -> Result<BuildReport, ArchiveError> {
        let post = Post {
            num_comments,
            when_archived: archival_timestamp(),
            ..draft
        };

        let report = self.writer.save_post(&post).await?;
        tracing::info!(
            "Saved `{}` ({} new images, {} already present, {} failed)",
            post.url,
            report.images_written,
            report.images_existing,
            report.images_failed
        );
        if !report.is_complete() {
            tracing::warn!("`{}` was only partially saved to {}", post.url, report.post_dir.display());
        }

        if self.take_screenshots {
            match &full_post {
                Some(full_post) => self.screenshot(full_post, &post.url).await?,
                None => tracing::warn!("No post element to screenshot for `{}`", post.url),
            }
        }

        let comments_saved = if self.comments.is_empty() {
            0
        } else {
            CommentCollector {
                browser: self.browser,
                writer: self.writer,
                settle: self.settle,
                selection: self.comments,
                stall_rounds: self.comment_stall_rounds,
                scroll_step: self.scroll_step,
            }
            .collect(&post.url)
            .await?
        };

        Ok(BuildReport {
            outcome: PostOutcome::Archived,
            comments_saved,
        })
    }

    async fn screenshot(&self, full_post: &B::Element, url: &str) -> Result<(), ArchiveError> {
        if let Some(more) = full_post.find_first(Locator::Class("more-button")).await? {
            if more.is_visible().await? {
                more.scroll_into_view().await?;
                more.click().await?;
            }
        }

        full_post.scroll_into_view().await?;
        let png = full_post.screenshot_png().await?;
        self.writer.save_screenshot(url, &png).await?;
        Ok(())
    }

    async fn close_aux_tab(&self, origin: &TabId) -> Result<(), ArchiveError> {
        self.browser.close_active_tab().await?;
        self.browser.switch_to_tab(origin).await?;
        self.settle.settle(SettlePoint::TabClose).await;
        Ok(())
    }
}
