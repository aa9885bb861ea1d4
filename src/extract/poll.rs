//! Poll Resolver
//!
//! Polls hide their percentages from signed-in viewers who have not voted.
//! Clicking an entry reveals them; clicking it again withdraws the vote, so
//! the resolver clicks, reads, then clicks back.

use crate::browser::{BrowserSession, ElementQuery, Locator, SettlePoint, SettleWait};
use crate::extract::is_signed_in;
use crate::model::{Poll, PollEntry};
use crate::DomResult;

const CHOICE_CLASS: &str = "choice-info";
const PERCENTAGE_CLASS: &str = "vote-percentage";

/// Reads the poll attached to `post`, revealing hidden percentages if needed
///
/// # Arguments
///
/// * `browser` - Session owning the active tab, used for the sign-in check
/// * `post` - The rendered post element
/// * `settle` - Settle policy; `PollReveal` is awaited after the reveal click
///
/// # Returns
///
/// * `Ok(None)` - The post has no poll
/// * `Ok(Some(poll))` - Entries in display order, unreadable fields as `None`
pub async fn resolve_poll<B: BrowserSession>(
    browser: &B,
    post: &B::Element,
    settle: &SettleWait,
) -> DomResult<Option<Poll>> {
    let choices = post.find_all(Locator::Class(CHOICE_CLASS)).await?;
    if choices.is_empty() {
        return Ok(None);
    }

    let revealed = if is_signed_in(browser).await? {
        reveal_percentages(&choices, settle).await?
    } else {
        None
    };

    let choices = post.find_all(Locator::Class(CHOICE_CLASS)).await?;
    let mut entries = Vec::with_capacity(choices.len());
    for choice in &choices {
        if let Some(raw) = choice.property("innerText").await? {
            entries.push(PollEntry::parse(&raw));
        }
    }

    if let Some(choice) = revealed {
        if let Err(e) = choice.click().await {
            tracing::debug!("Could not restore poll state: {}", e);
        }
    }

    let total_votes = match post.find_first(Locator::Id("vote-info")).await? {
        Some(info) => Some(info.text().await?),
        None => None,
    };

    tracing::debug!("Resolved poll with {} entries", entries.len());
    Ok(Some(Poll {
        entries,
        total_votes,
    }))
}

/// Clicks the first choice whose percentage is blank
///
/// Returns the clicked choice so the caller can click it back.
async fn reveal_percentages<E: ElementQuery>(
    choices: &[E],
    settle: &SettleWait,
) -> DomResult<Option<E>> {
    for choice in choices {
        let Some(percentage) = choice.find_first(Locator::Class(PERCENTAGE_CLASS)).await? else {
            continue;
        };

        let shown = percentage.property("innerText").await?.unwrap_or_default();
        if shown.is_empty() {
            choice.click().await?;
            settle.settle(SettlePoint::PollReveal).await;
            return Ok(Some(choice.clone()));
        }
    }

    Ok(None)
}
