use std::fmt;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use thirtyfour::prelude::*;
use thirtyfour::support::sleep;
use tracing::{debug, info};

use crate::config::Settings;
use crate::error::{ScrapeError, ScrapeResult};
use crate::scraping::constants::{CHROME_ARGS, WAIT_POLL_MILLIS};

/// How an element is located on the page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    Name(String),
    Id(String),
    Css(String),
    XPath(String),
}

impl Target {
    pub fn name(name: impl Into<String>) -> Self {
        Target::Name(name.into())
    }

    pub fn id(id: impl Into<String>) -> Self {
        Target::Id(id.into())
    }

    pub fn css(selector: impl Into<String>) -> Self {
        Target::Css(selector.into())
    }

    pub fn xpath(expr: impl Into<String>) -> Self {
        Target::XPath(expr.into())
    }

    fn by(&self) -> By {
        match self {
            Target::Name(name) => By::Name(name),
            Target::Id(id) => By::Id(id),
            Target::Css(selector) => By::Css(selector),
            Target::XPath(expr) => By::XPath(expr),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Name(name) => write!(f, "[name={name:?}]"),
            Target::Id(id) => write!(f, "#{id}"),
            Target::Css(selector) => write!(f, "css `{selector}`"),
            Target::XPath(expr) => write!(f, "xpath `{expr}`"),
        }
    }
}

/// The browser operations the booking flow needs. A single session is
/// driven sequentially; the implementor owns the current-tab focus.
#[async_trait]
pub trait BookingBrowser: Send + Sync {
    type Element: Send + Sync;

    async fn goto(&self, url: &str) -> ScrapeResult<()>;

    /// Polls until `target` is visible and enabled. `Ok(None)` when the
    /// timeout elapses first.
    async fn find_clickable(
        &self,
        target: &Target,
        timeout: Duration,
    ) -> ScrapeResult<Option<Self::Element>>;

    async fn find(&self, target: &Target) -> ScrapeResult<Self::Element>;

    async fn find_all(&self, target: &Target) -> ScrapeResult<Vec<Self::Element>>;

    async fn click(&self, element: &Self::Element) -> ScrapeResult<()>;

    /// Modifier-click the element so its target opens in a new tab, then
    /// focus that tab. `Ok(false)` when no tab appeared; focus is unchanged.
    async fn click_into_new_tab(&self, element: &Self::Element) -> ScrapeResult<bool>;

    /// Displayed and enabled.
    async fn is_interactable(&self, element: &Self::Element) -> ScrapeResult<bool>;

    async fn attr(&self, element: &Self::Element, name: &str) -> ScrapeResult<Option<String>>;

    async fn text(&self, element: &Self::Element) -> ScrapeResult<String>;

    async fn window_count(&self) -> ScrapeResult<usize>;

    /// Close the focused tab and focus the first remaining one.
    async fn close_tab_and_return(&self) -> ScrapeResult<()>;

    async fn quit(self) -> ScrapeResult<()>;

    async fn wait_clickable(&self, target: &Target, timeout: Duration) -> ScrapeResult<Self::Element> {
        self.find_clickable(target, timeout)
            .await?
            .ok_or_else(|| ScrapeError::NotClickable {
                target: target.to_string(),
                timeout,
            })
    }

    async fn click_when_clickable(&self, target: &Target, timeout: Duration) -> ScrapeResult<()> {
        let element = self.wait_clickable(target, timeout).await?;
        debug!("clicking {}", target);
        self.click(&element).await
    }
}

/// Chrome driven over WebDriver (chromedriver).
pub struct WebDriverSession {
    driver: WebDriver,
    wait_timeout: Duration,
}

impl WebDriverSession {
    pub async fn launch(settings: &Settings) -> ScrapeResult<Self> {
        let mut caps = DesiredCapabilities::chrome();
        if settings.headless {
            caps.set_headless()?;
        }
        for arg in CHROME_ARGS {
            caps.add_arg(arg)?;
        }

        info!("starting Chrome session via {}", settings.webdriver_url);
        let driver = WebDriver::new(settings.webdriver_url.as_str(), caps).await?;

        Ok(WebDriverSession {
            driver,
            wait_timeout: settings.wait_timeout,
        })
    }

    fn modifier_key() -> Key {
        if cfg!(target_os = "macos") {
            Key::Command
        } else {
            Key::Control
        }
    }
}

#[async_trait]
impl BookingBrowser for WebDriverSession {
    type Element = WebElement;

    async fn goto(&self, url: &str) -> ScrapeResult<()> {
        self.driver.goto(url).await?;
        Ok(())
    }

    async fn find_clickable(
        &self,
        target: &Target,
        timeout: Duration,
    ) -> ScrapeResult<Option<WebElement>> {
        let element = self
            .driver
            .query(target.by())
            .wait(timeout, Duration::from_millis(WAIT_POLL_MILLIS))
            .and_clickable()
            .first_opt()
            .await?;
        Ok(element)
    }

    async fn find(&self, target: &Target) -> ScrapeResult<WebElement> {
        self.driver
            .query(target.by())
            .first_opt()
            .await?
            .ok_or_else(|| ScrapeError::ElementMissing(target.to_string()))
    }

    async fn find_all(&self, target: &Target) -> ScrapeResult<Vec<WebElement>> {
        Ok(self.driver.find_all(target.by()).await?)
    }

    async fn click(&self, element: &WebElement) -> ScrapeResult<()> {
        element.click().await?;
        Ok(())
    }

    async fn click_into_new_tab(&self, element: &WebElement) -> ScrapeResult<bool> {
        let before = self.driver.windows().await?.len();

        self.driver
            .action_chain()
            .key_down(Self::modifier_key())
            .click_element(element)
            .key_up(Self::modifier_key())
            .perform()
            .await?;

        // the new window handle shows up asynchronously after the click
        let started = Instant::now();
        let mut windows = self.driver.windows().await?;
        while windows.len() <= before && started.elapsed() < self.wait_timeout {
            sleep(Duration::from_millis(WAIT_POLL_MILLIS)).await;
            windows = self.driver.windows().await?;
        }

        if windows.len() <= before {
            return Ok(false);
        }
        if let Some(newest) = windows.pop() {
            self.driver.switch_to_window(newest).await?;
        }
        Ok(true)
    }

    async fn is_interactable(&self, element: &WebElement) -> ScrapeResult<bool> {
        Ok(element.is_displayed().await? && element.is_enabled().await?)
    }

    async fn attr(&self, element: &WebElement, name: &str) -> ScrapeResult<Option<String>> {
        Ok(element.attr(name).await?)
    }

    async fn text(&self, element: &WebElement) -> ScrapeResult<String> {
        Ok(element.text().await?)
    }

    async fn window_count(&self) -> ScrapeResult<usize> {
        Ok(self.driver.windows().await?.len())
    }

    async fn close_tab_and_return(&self) -> ScrapeResult<()> {
        self.driver.close_window().await?;
        if let Some(original) = self.driver.windows().await?.into_iter().next() {
            self.driver.switch_to_window(original).await?;
        }
        Ok(())
    }

    async fn quit(self) -> ScrapeResult<()> {
        info!("Quitting Chrome session");
        self.driver.quit().await?;
        Ok(())
    }
}
