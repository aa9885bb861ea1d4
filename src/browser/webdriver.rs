//! WebDriver-backed browser session
//!
//! Talks to a running chromedriver or geckodriver through `thirtyfour`.

use crate::browser::{BrowserFamily, BrowserSession, ElementQuery, Locator, TabId};
use crate::config::ArchiverSettings;
use crate::cookies::Cookie;
use crate::{ArchiveError, DomError, DomResult};
use async_trait::async_trait;
use serde_json::json;
use thirtyfour::prelude::*;
use thirtyfour::{ChromiumLikeCapabilities, Cookie as DriverCookie, WindowHandle};

/// A live WebDriver session
#[derive(Clone)]
pub struct WebDriverSession {
    driver: WebDriver,
}

/// An element handle inside a `WebDriverSession`
#[derive(Clone)]
pub struct WebDriverElement {
    element: WebElement,
}

/// Launches a browser session configured from `settings`
///
/// Connects to the WebDriver server for the configured family (or the
/// explicit `webdriver_url`), applies window size, headless mode, profile and
/// binary override, then sets the window rect again in case the launch flag
/// was ignored.
///
/// # Returns
///
/// * `Ok(WebDriverSession)` - Browser is up and focused on a blank tab
/// * `Err(ArchiveError::Browser)` - Capabilities were rejected or the driver is unreachable
pub async fn launch(settings: &ArchiverSettings) -> Result<WebDriverSession, ArchiveError> {
    let family = settings.browser;
    let size = settings.window_size();
    let args = family.launch_args(
        settings.headless,
        size,
        settings.profile_dir.as_deref(),
        settings.profile_name.as_deref(),
    );
    let server_url = settings
        .webdriver_url
        .clone()
        .unwrap_or_else(|| family.default_webdriver_url().to_string());

    tracing::info!(
        "Launching {} (headless: {}, {}x{}) via {}",
        family,
        settings.headless,
        size.0,
        size.1,
        server_url
    );

    let driver = match family {
        BrowserFamily::Chrome => {
            let mut caps = DesiredCapabilities::chrome();
            for arg in &args {
                caps.add_arg(arg).map_err(launch_error)?;
            }
            if let Some(binary) = &settings.binary_override {
                caps.set_binary(binary).map_err(launch_error)?;
            }
            WebDriver::new(&server_url, caps).await.map_err(launch_error)?
        }
        BrowserFamily::Firefox => {
            let mut caps = DesiredCapabilities::firefox();
            for arg in &args {
                caps.add_arg(arg).map_err(launch_error)?;
            }
            if let Some(binary) = &settings.binary_override {
                caps.set_firefox_binary(binary).map_err(launch_error)?;
            }
            WebDriver::new(&server_url, caps).await.map_err(launch_error)?
        }
    };

    driver
        .set_window_rect(0, 0, size.0, size.1)
        .await
        .map_err(launch_error)?;

    Ok(WebDriverSession { driver })
}

fn launch_error(err: WebDriverError) -> ArchiveError {
    ArchiveError::Browser(err.to_string())
}

/// Folds a driver error into one of the archiver's DOM error kinds
fn classify(err: WebDriverError) -> DomError {
    let message = err.to_string();
    let lower = message.to_lowercase();

    if lower.contains("stale element") {
        DomError::Stale(message)
    } else if lower.contains("out of bounds") {
        DomError::OutOfBounds(message)
    } else if lower.contains("no such element") {
        DomError::NoSuchElement(message)
    } else if lower.contains("javascript error") {
        DomError::Script(message)
    } else {
        DomError::Driver(message)
    }
}

fn to_by(locator: Locator<'_>) -> By {
    match locator {
        Locator::Id(id) => By::Id(id),
        Locator::Class(class) => By::ClassName(class),
        Locator::Tag(tag) => By::Tag(tag),
    }
}

fn wrap(elements: Vec<WebElement>) -> Vec<WebDriverElement> {
    elements
        .into_iter()
        .map(|element| WebDriverElement { element })
        .collect()
}

#[async_trait]
impl ElementQuery for WebDriverElement {
    async fn find_all(&self, locator: Locator<'_>) -> DomResult<Vec<Self>> {
        let found = self.element.find_all(to_by(locator)).await.map_err(classify)?;
        Ok(wrap(found))
    }

    async fn attribute(&self, name: &str) -> DomResult<Option<String>> {
        self.element.attr(name).await.map_err(classify)
    }

    async fn property(&self, name: &str) -> DomResult<Option<String>> {
        self.element.prop(name).await.map_err(classify)
    }

    async fn text(&self) -> DomResult<String> {
        self.element.text().await.map_err(classify)
    }

    async fn inner_html(&self) -> DomResult<String> {
        self.element.inner_html().await.map_err(classify)
    }

    async fn is_visible(&self) -> DomResult<bool> {
        self.element.is_displayed().await.map_err(classify)
    }

    async fn click(&self) -> DomResult<()> {
        self.element.click().await.map_err(classify)
    }

    async fn scroll_into_view(&self) -> DomResult<()> {
        self.element.scroll_into_view().await.map_err(classify)
    }

    async fn screenshot_png(&self) -> DomResult<Vec<u8>> {
        self.element.screenshot_as_png().await.map_err(classify)
    }
}

#[async_trait]
impl BrowserSession for WebDriverSession {
    type Element = WebDriverElement;

    async fn goto(&self, url: &str) -> DomResult<()> {
        self.driver.goto(url).await.map_err(classify)
    }

    async fn refresh(&self) -> DomResult<()> {
        self.driver.refresh().await.map_err(classify)
    }

    async fn add_cookie(&self, cookie: &Cookie) -> DomResult<()> {
        let driver_cookie: DriverCookie = serde_json::from_value(json!({
            "name": cookie.name,
            "value": cookie.value,
            "domain": cookie.domain,
            "path": cookie.path,
            "httpOnly": cookie.http_only,
            "expiry": cookie.expiry,
        }))
        .map_err(|e| DomError::Driver(format!("Invalid cookie {}: {}", cookie.name, e)))?;

        self.driver.add_cookie(driver_cookie).await.map_err(classify)
    }

    async fn find_all(&self, locator: Locator<'_>) -> DomResult<Vec<Self::Element>> {
        let found = self.driver.find_all(to_by(locator)).await.map_err(classify)?;
        Ok(wrap(found))
    }

    async fn scroll_by(&self, dy: i64) -> DomResult<()> {
        self.driver
            .execute(format!("window.scrollBy(0, {});", dy), Vec::new())
            .await
            .map_err(classify)?;
        Ok(())
    }

    async fn current_tab(&self) -> DomResult<TabId> {
        let handle = self.driver.window().await.map_err(classify)?;
        Ok(handle.to_string())
    }

    async fn tabs(&self) -> DomResult<Vec<TabId>> {
        let handles = self.driver.windows().await.map_err(classify)?;
        Ok(handles.iter().map(ToString::to_string).collect())
    }

    async fn open_tab(&self) -> DomResult<TabId> {
        let handle = self.driver.new_tab().await.map_err(classify)?;
        let id = handle.to_string();
        self.driver.switch_to_window(handle).await.map_err(classify)?;
        Ok(id)
    }

    async fn switch_to_tab(&self, tab: &TabId) -> DomResult<()> {
        self.driver
            .switch_to_window(WindowHandle::from(tab.clone()))
            .await
            .map_err(classify)
    }

    async fn close_active_tab(&self) -> DomResult<()> {
        self.driver.close_window().await.map_err(classify)
    }

    async fn quit(&self) -> DomResult<()> {
        self.driver.clone().quit().await.map_err(classify)
    }
}
