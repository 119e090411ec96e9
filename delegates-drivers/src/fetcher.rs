use crate::browser::{driver::BrowserDriver, wait::ChallengeWait};
use async_trait::async_trait;
use delegates_common::{RawPage, StealthLevel};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Failures that stop the fetch stage.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("could not start a browser session via {endpoint}: {reason}")]
    Session { endpoint: String, reason: String },

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("could not read the page source of {url}: {reason}")]
    Capture { url: String, reason: String },
}

/// Produces the rendered markup of a page.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<RawPage, FetchError>;
}

/// How the WebDriver-backed fetcher drives the browser.
#[derive(Debug, Clone)]
pub struct BrowserSettings {
    pub webdriver_url: String,
    pub headless: bool,
    pub stealth: StealthLevel,
    pub challenge_wait: Duration,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:9515".to_string(),
            headless: false,
            stealth: StealthLevel::Balanced,
            challenge_wait: Duration::from_secs(30),
        }
    }
}

/// Fetcher backed by a fantoccini WebDriver session.
///
/// Each call opens a fresh session and closes it before returning, on the
/// error paths as well.
pub struct WebDriverFetcher {
    settings: BrowserSettings,
}

impl WebDriverFetcher {
    pub fn new(settings: BrowserSettings) -> Self {
        Self { settings }
    }

    async fn capture(&self, driver: &mut BrowserDriver, url: &Url) -> Result<String, FetchError> {
        let page = driver
            .goto(url.as_str())
            .await
            .map_err(|e| FetchError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        ChallengeWait::new(self.settings.challenge_wait).settle().await;

        if let Ok(title) = page.get_title().await {
            debug!(target: "browser.page", %title, "page title after wait");
        }

        page.get_content().await.map_err(|e| FetchError::Capture {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl PageFetcher for WebDriverFetcher {
    async fn fetch(&self, url: &Url) -> Result<RawPage, FetchError> {
        let mut driver = BrowserDriver::connect(
            &self.settings.webdriver_url,
            self.settings.headless,
            self.settings.stealth,
        )
        .await
        .map_err(|e| FetchError::Session {
            endpoint: self.settings.webdriver_url.clone(),
            reason: e.to_string(),
        })?;

        let result = self.capture(&mut driver, url).await;
        if let Err(e) = driver.close().await {
            warn!(target: "browser.driver", error = %e, "failed to close browser session");
        }

        let html = result?;
        info!(target: "browser.page", %url, bytes = html.len(), "captured page source");
        Ok(RawPage::new(html))
    }
}

/// Serves fixed markup without touching the network.
#[derive(Debug, Clone)]
pub struct InMemoryFetcher {
    markup: String,
}

impl InMemoryFetcher {
    pub fn new(markup: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
        }
    }
}

#[async_trait]
impl PageFetcher for InMemoryFetcher {
    async fn fetch(&self, _url: &Url) -> Result<RawPage, FetchError> {
        Ok(RawPage::new(self.markup.clone()))
    }
}
