//! Browser session capabilities
//!
//! Everything above this module talks to the page through two narrow traits:
//! - `BrowserSession`: navigation, cookies, window scrolling and tab management
//! - `ElementQuery`: read-and-poke access to a single rendered element
//!
//! The production implementation is the WebDriver adapter in `webdriver`;
//! tests drive the same code paths with an in-memory DOM.

mod family;
mod settle;
mod webdriver;

pub use family::{BrowserFamily, OutOfBoundsRecovery};
pub use settle::{SettlePoint, SettleWait};
pub use webdriver::{launch, WebDriverElement, WebDriverSession};

use crate::cookies::Cookie;
use crate::DomResult;
use async_trait::async_trait;

/// Opaque handle naming one browser tab
pub type TabId = String;

/// How to locate elements relative to a root
///
/// Only the three lookups the archiver needs are modelled; every one of them
/// searches descendants of the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locator<'a> {
    /// Match the `id` attribute
    Id(&'a str),
    /// Match one entry of the `class` attribute
    Class(&'a str),
    /// Match the tag name
    Tag(&'a str),
}

/// Access to a single rendered element
#[async_trait]
pub trait ElementQuery: Clone + Send + Sync {
    /// Finds all descendants matching `locator`, in document order
    async fn find_all(&self, locator: Locator<'_>) -> DomResult<Vec<Self>>;

    /// Finds the first matching descendant, if any
    async fn find_first(&self, locator: Locator<'_>) -> DomResult<Option<Self>> {
        Ok(self.find_all(locator).await?.into_iter().next())
    }

    /// Reads an HTML attribute exactly as written in the markup
    async fn attribute(&self, name: &str) -> DomResult<Option<String>>;

    /// Reads a DOM property such as `innerText`
    ///
    /// `href` and `src` properties are absolute URLs resolved against the
    /// page, unlike the raw attributes.
    async fn property(&self, name: &str) -> DomResult<Option<String>>;

    /// Visible text of the element
    async fn text(&self) -> DomResult<String>;

    /// Serialized HTML of the element's children
    async fn inner_html(&self) -> DomResult<String>;

    async fn is_visible(&self) -> DomResult<bool>;

    async fn click(&self) -> DomResult<()>;

    async fn scroll_into_view(&self) -> DomResult<()>;

    /// PNG screenshot of just this element
    async fn screenshot_png(&self) -> DomResult<Vec<u8>>;
}

/// A controllable browser with one or more tabs
#[async_trait]
pub trait BrowserSession: Send + Sync {
    type Element: ElementQuery;

    async fn goto(&self, url: &str) -> DomResult<()>;

    async fn refresh(&self) -> DomResult<()>;

    async fn add_cookie(&self, cookie: &Cookie) -> DomResult<()>;

    /// Finds all elements in the active tab matching `locator`
    async fn find_all(&self, locator: Locator<'_>) -> DomResult<Vec<Self::Element>>;

    async fn find_first(&self, locator: Locator<'_>) -> DomResult<Option<Self::Element>> {
        Ok(self.find_all(locator).await?.into_iter().next())
    }

    /// Scrolls the active tab's window vertically by `dy` pixels
    async fn scroll_by(&self, dy: i64) -> DomResult<()>;

    async fn current_tab(&self) -> DomResult<TabId>;

    /// All open tabs, oldest first
    async fn tabs(&self) -> DomResult<Vec<TabId>>;

    /// Opens a new blank tab and focuses it
    async fn open_tab(&self) -> DomResult<TabId>;

    async fn switch_to_tab(&self, tab: &TabId) -> DomResult<()>;

    /// Closes the focused tab; focus is undefined until the next switch
    async fn close_active_tab(&self) -> DomResult<()>;

    /// Ends the session, closing every tab
    async fn quit(&self) -> DomResult<()>;
}

/// Closes the focused tab if another one remains and refocuses the oldest survivor
///
/// # Returns
///
/// * `Ok(true)` - A tab was closed and focus moved to the oldest remaining tab
/// * `Ok(false)` - Only one tab is open; nothing was closed
pub async fn close_current_tab<B: BrowserSession>(
    browser: &B,
    settle: &SettleWait,
) -> DomResult<bool> {
    let tabs = browser.tabs().await?;
    if tabs.len() <= 1 {
        return Ok(false);
    }

    let current = browser.current_tab().await?;
    let Some(next) = tabs.iter().find(|tab| **tab != current).cloned() else {
        return Ok(false);
    };

    browser.close_active_tab().await?;
    browser.switch_to_tab(&next).await?;
    settle.settle(SettlePoint::TabClose).await;
    Ok(true)
}
