//! Post field extraction

use crate::browser::{BrowserSession, ElementQuery, Locator};
use crate::extract::{first_text, url_property};
use crate::url::{is_post_link, upgrade_image_url};
use crate::DomResult;
use std::collections::HashSet;

/// Element id of a rendered post, both in the feed and on a post's own page
pub const POST_ELEMENT_ID: &str = "post";

/// Class carried by the members-only badge
const MEMBERS_BADGE_CLASS: &str = "ytd-sponsors-only-badge-renderer";

/// Class marking the carousel arrow of a multi-image post
const CAROUSEL_CLASS: &str = "ytd-post-multi-image-renderer";

/// Upper bound on carousel clicks for a single arrow
const MAX_CAROUSEL_CLICKS: usize = 50;

/// Host of sign-in redirect links, which are never archived
const AUTH_REDIRECT_HOST: &str = "accounts.google.com";

/// Finds the post's canonical permalink anchor
///
/// A post element contains many anchors (channel, avatar, outbound links);
/// the permalink is the first one whose href is a community post URL.
///
/// # Returns
///
/// * `Ok(Some((anchor, href)))` - The anchor and its href
/// * `Ok(None)` - The element is not a real post
pub async fn post_link<E: ElementQuery>(post: &E) -> DomResult<Option<(E, String)>> {
    for anchor in post.find_all(Locator::Tag("a")).await? {
        if let Some(href) = url_property(&anchor, "href").await? {
            if is_post_link(&href) {
                return Ok(Some((anchor, href)));
            }
        }
    }

    Ok(None)
}

pub async fn is_members_post<E: ElementQuery>(post: &E) -> DomResult<bool> {
    Ok(post
        .find_first(Locator::Class(MEMBERS_BADGE_CLASS))
        .await?
        .is_some())
}

/// Outbound links of a post
///
/// Hrefs are de-duplicated keeping first occurrence and sign-in redirects are
/// removed; the first remaining link is the channel and is dropped.
pub async fn post_links<E: ElementQuery>(post: &E) -> DomResult<Vec<String>> {
    let mut seen = HashSet::new();
    let mut hrefs = Vec::new();

    for anchor in post.find_all(Locator::Tag("a")).await? {
        if let Some(href) = url_property(&anchor, "href").await? {
            if seen.insert(href.clone()) {
                hrefs.push(href);
            }
        }
    }

    Ok(hrefs
        .into_iter()
        .filter(|href| !href.contains(AUTH_REDIRECT_HOST))
        .skip(1)
        .collect())
}

/// High-resolution image URLs of a post, avatar excluded
///
/// Multi-image posts only render the images the carousel has scrolled past,
/// so the carousel arrow is clicked until it hides before collecting `img`
/// sources.
pub async fn post_images<E: ElementQuery>(post: &E) -> DomResult<Vec<String>> {
    for arrow in post.find_all(Locator::Id("right-arrow")).await? {
        let is_carousel = arrow
            .attribute("class")
            .await?
            .is_some_and(|class| class.contains(CAROUSEL_CLASS));
        if !is_carousel {
            continue;
        }

        let mut clicks = 0;
        while clicks < MAX_CAROUSEL_CLICKS && arrow.is_visible().await? {
            arrow.click().await?;
            clicks += 1;
        }
        tracing::debug!("Advanced image carousel {} times", clicks);
    }

    let mut sources = Vec::new();
    for image in post.find_all(Locator::Tag("img")).await? {
        if let Some(src) = url_property(&image, "src").await? {
            sources.push(src);
        }
    }

    // The first image is always the channel avatar
    Ok(sources
        .iter()
        .skip(1)
        .map(|src| upgrade_image_url(src))
        .collect())
}

/// Comment count as shown under the post in the feed
///
/// Only the first line of the reply button text is the count.
pub async fn approximate_comment_count<E: ElementQuery>(post: &E) -> DomResult<Option<String>> {
    let Some(button) = post.find_first(Locator::Id("reply-button-end")).await? else {
        return Ok(None);
    };

    let text = button.text().await?;
    Ok(text
        .trim()
        .lines()
        .next()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string))
}

pub async fn like_count<E: ElementQuery>(post: &E) -> DomResult<Option<String>> {
    first_text(post, Locator::Id("vote-count-middle")).await
}

/// Raw text body of a post
///
/// # Returns
///
/// * `Ok(Some(text))` - The text region exists (the text itself may be empty)
/// * `Ok(None)` - The text region has not rendered; the post is incomplete
pub async fn post_text<E: ElementQuery>(post: &E) -> DomResult<Option<String>> {
    let Some(content) = post.find_first(Locator::Id("content")).await? else {
        return Ok(None);
    };

    Ok(Some(content.property("innerText").await?.unwrap_or_default()))
}

/// Comment count from a post's dedicated comments panel
///
/// The panel only exists when the active tab shows a single post, so a
/// `Some` result also tells the caller it is not looking at the feed.
pub async fn true_comment_count<B: BrowserSession>(browser: &B) -> DomResult<Option<String>> {
    let Some(panel) = browser.find_first(Locator::Tag("ytd-comments")).await? else {
        return Ok(None);
    };
    let Some(count) = panel.find_first(Locator::Id("count")).await? else {
        return Ok(None);
    };

    let text = count.text().await?;
    Ok(text.split_whitespace().next().map(str::to_string))
}

/// The first post element in the active tab
pub async fn find_post_element<B: BrowserSession>(browser: &B) -> DomResult<Option<B::Element>> {
    browser.find_first(Locator::Id(POST_ELEMENT_ID)).await
}

/// Returns true if the page shows a signed-in viewer
pub async fn is_signed_in<B: BrowserSession>(browser: &B) -> DomResult<bool> {
    Ok(browser.find_first(Locator::Id("avatar-btn")).await?.is_some())
}
