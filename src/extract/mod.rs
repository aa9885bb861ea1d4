//! DOM extraction helpers
//!
//! Functions in this module map a rendered element to typed values. They only
//! depend on the `ElementQuery` / `BrowserSession` capabilities, never on a
//! concrete driver.
//!
//! # Components
//!
//! - `post`: canonical link, membership, links, images, counts and text of a post
//! - `comment`: comment-thread permalink, category badges and the `Comment` record
//! - `poll`: the Poll Resolver, which may click entries to reveal percentages

pub mod comment;
pub mod poll;
pub mod post;

pub use comment::{extract_comment, matches_categories, render_comment_contents, thread_link};
pub use poll::resolve_poll;
pub use post::{
    approximate_comment_count, find_post_element, is_members_post, is_signed_in, like_count,
    post_images, post_link, post_links, post_text, true_comment_count,
};

use crate::browser::{ElementQuery, Locator};
use crate::DomResult;

/// Trimmed text of the first element matching `locator`, `None` if absent or blank
pub(crate) async fn first_text<E: ElementQuery>(
    root: &E,
    locator: Locator<'_>,
) -> DomResult<Option<String>> {
    let Some(element) = root.find_first(locator).await? else {
        return Ok(None);
    };

    let text = element.text().await?;
    let text = text.trim();
    Ok((!text.is_empty()).then(|| text.to_string()))
}

/// Reads a URL-valued property (`href`, `src`) as the resolved absolute URL
///
/// Elements without the attribute report an empty property; that is `None`.
pub(crate) async fn url_property<E: ElementQuery>(
    element: &E,
    name: &str,
) -> DomResult<Option<String>> {
    Ok(element
        .property(name)
        .await?
        .filter(|url| !url.trim().is_empty()))
}
