use crate::browser::{
    fingerprint::{pick_session_profile, UserAgentProfile},
    page::BrowserPage,
    stealth::build_stealth_arguments,
};
use anyhow::Result;
use delegates_common::StealthLevel;
use fantoccini::{Client, ClientBuilder};
use serde_json::json;
use std::collections::HashMap;
use tracing::debug;
use webdriver::capabilities::Capabilities;

/// Thin wrapper around a `fantoccini` WebDriver client with stealth settings.
pub struct BrowserDriver {
    client: Client,
    stealth_level: StealthLevel,
    profile: UserAgentProfile,
}

impl BrowserDriver {
    /// Start a new Chrome session through the WebDriver service at `endpoint`
    /// (usually Chromedriver on `http://localhost:9515`).
    pub async fn connect(endpoint: &str, headless: bool, stealth_level: StealthLevel) -> Result<Self> {
        let profile = pick_session_profile(&mut rand::thread_rng());
        let mut args = build_stealth_arguments(stealth_level, &profile);
        if headless {
            args.push("--headless=new".to_string());
            args.push("--disable-gpu".to_string());
        }

        let mut chrome_opts = HashMap::new();
        chrome_opts.insert("args".to_string(), json!(args));
        if stealth_level != StealthLevel::Lightweight {
            chrome_opts.insert("excludeSwitches".to_string(), json!(["enable-automation"]));
        }

        let mut caps = Capabilities::new();
        caps.insert("goog:chromeOptions".to_string(), json!(chrome_opts));

        debug!(target: "browser.driver", %endpoint, headless, ?stealth_level, "starting session");
        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(endpoint)
            .await?;

        Ok(Self {
            client,
            stealth_level,
            profile,
        })
    }

    /// Navigate to `url` and return a [`BrowserPage`] with stealth scripts applied.
    pub async fn goto(&mut self, url: &str) -> Result<BrowserPage> {
        let mut page = BrowserPage::new(
            self.client.clone(),
            self.stealth_level,
            self.profile.clone(),
        );
        page.goto(url).await?;
        Ok(page)
    }

    /// Close the underlying browser session.
    pub async fn close(self) -> Result<()> {
        self.client.close().await?;
        Ok(())
    }
}
