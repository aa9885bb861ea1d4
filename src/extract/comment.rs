//! Comment field extraction

use crate::browser::{ElementQuery, Locator};
use crate::config::{CommentCategory, CommentSelection};
use crate::extract::{first_text, url_property};
use crate::model::{archival_timestamp, Comment};
use crate::DomResult;
use scraper::{Html, Node, Selector};

/// Tag name of one top-level comment thread
pub const COMMENT_THREAD_TAG: &str = "ytd-comment-thread-renderer";

/// Element id whose presence marks a comment as belonging to `category`
///
/// `All` has no marker; it matches every comment.
fn badge_id(category: CommentCategory) -> Option<&'static str> {
    match category {
        CommentCategory::All => None,
        CommentCategory::Hearted => Some("creator-heart-button"),
        CommentCategory::Pinned => Some("pinned-comment-badge"),
        CommentCategory::Creator => Some("author-comment-badge"),
        CommentCategory::Members => Some("custom-badge"),
    }
}

/// Permalink of a comment thread, read from its timestamp anchor
pub async fn thread_link<E: ElementQuery>(thread: &E) -> DomResult<Option<String>> {
    let Some(published) = thread.find_first(Locator::Id("published-time-text")).await? else {
        return Ok(None);
    };
    let Some(anchor) = published.find_first(Locator::Tag("a")).await? else {
        return Ok(None);
    };

    url_property(&anchor, "href").await
}

/// Returns true if the thread falls into at least one requested category
pub async fn matches_categories<E: ElementQuery>(
    thread: &E,
    selection: &CommentSelection,
) -> DomResult<bool> {
    if selection.wants(CommentCategory::All) {
        return Ok(true);
    }

    for category in &selection.categories {
        let Some(id) = badge_id(*category) else {
            continue;
        };
        if thread.find_first(Locator::Id(id)).await?.is_some() {
            return Ok(true);
        }
    }

    Ok(false)
}

/// Builds a `Comment` from a rendered thread
///
/// Every field degrades to `None`/`false` on its own; only driver failures
/// abort the extraction.
pub async fn extract_comment<E: ElementQuery>(thread: &E, link: &str) -> DomResult<Comment> {
    let author = author(thread).await?;
    let relative_date = first_text(thread, Locator::Id("published-time-text")).await?;
    let member_length = member_length(thread).await?;
    let likes = first_text(thread, Locator::Id("vote-count-middle")).await?;
    let is_hearted = visible_badge(thread, "creator-heart-button").await?;
    let is_pinned = visible_badge(thread, "pinned-comment-badge").await?;
    let contents = render_comment_contents(&thread.inner_html().await?);
    let replies = first_text(thread, Locator::Id("more-replies")).await?;

    Ok(Comment {
        author,
        relative_date,
        member_length,
        likes,
        is_hearted,
        is_pinned,
        contents,
        replies,
        link: link.to_string(),
        when_archived: archival_timestamp(),
    })
}

async fn author<E: ElementQuery>(thread: &E) -> DomResult<Option<String>> {
    if let Some(author) = first_text(thread, Locator::Id("author-text")).await? {
        return Ok(Some(author));
    }

    // Creator replies render the name inside a channel-name badge instead
    let Some(channel) = thread.find_first(Locator::Id("channel-name")).await? else {
        return Ok(None);
    };
    first_text(&channel, Locator::Tag("yt-formatted-string")).await
}

async fn member_length<E: ElementQuery>(thread: &E) -> DomResult<Option<String>> {
    let Some(badge) = thread.find_first(Locator::Id("custom-badge")).await? else {
        return Ok(None);
    };
    let Some(shadow) = badge.find_first(Locator::Tag("yt-img-shadow")).await? else {
        return Ok(None);
    };

    Ok(shadow
        .attribute("shared-tooltip-text")
        .await?
        .map(|tooltip| tooltip.trim().to_string())
        .filter(|tooltip| !tooltip.is_empty()))
}

async fn visible_badge<E: ElementQuery>(thread: &E, id: &str) -> DomResult<bool> {
    match thread.find_first(Locator::Id(id)).await? {
        Some(badge) => badge.is_visible().await,
        None => Ok(false),
    }
}

/// Renders a comment body from the thread's inner HTML
///
/// Walks the first `span` inside `#content-text`, keeping text nodes and
/// replacing emote images with `<::alt::>` markers.
///
/// # Examples
///
/// ```
/// use community_archiver::extract::render_comment_contents;
///
/// let html = r#"<div id="content-text"><span>nice <img alt="wave"> post</span></div>"#;
/// assert_eq!(render_comment_contents(html).as_deref(), Some("nice <::wave::> post"));
/// ```
pub fn render_comment_contents(html: &str) -> Option<String> {
    if html.trim().is_empty() {
        return None;
    }

    let fragment = Html::parse_fragment(html);
    let wrapper_selector = Selector::parse("#content-text").ok()?;
    let span_selector = Selector::parse("span").ok()?;

    let wrapper = fragment.select(&wrapper_selector).next()?;
    let span = wrapper.select(&span_selector).next()?;

    let mut text = String::new();
    for node in span.descendants() {
        match node.value() {
            Node::Text(chunk) => text.push_str(chunk),
            Node::Element(element) if element.name() == "img" => {
                if let Some(alt) = element.attr("alt").filter(|alt| !alt.is_empty()) {
                    text.push_str(&format!("<::{}::>", alt));
                }
            }
            _ => {}
        }
    }

    Some(text)
}
