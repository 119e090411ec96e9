use crate::browser::{fingerprint::UserAgentProfile, stealth::StealthScripts};
use anyhow::Result;
use delegates_common::StealthLevel;
use fantoccini::Client;
use tracing::info;

/// A navigated tab of a [`BrowserDriver`](super::driver::BrowserDriver) session.
pub struct BrowserPage {
    client: Client,
    stealth_level: StealthLevel,
    profile: UserAgentProfile,
}

impl BrowserPage {
    pub fn new(client: Client, stealth_level: StealthLevel, profile: UserAgentProfile) -> Self {
        Self {
            client,
            stealth_level,
            profile,
        }
    }

    /// Navigate to `url` and apply the stealth scripts for this session.
    pub async fn goto(&mut self, url: &str) -> Result<()> {
        info!(target: "browser.page", %url, "navigating");
        self.client.goto(url).await?;
        self.apply_stealth().await
    }

    async fn apply_stealth(&mut self) -> Result<()> {
        for script in StealthScripts::for_level(self.stealth_level) {
            self.client.execute(script, vec![]).await?;
        }

        if self.stealth_level == StealthLevel::Maximum {
            self.client
                .execute(
                    &format!(
                        "Object.defineProperty(navigator, 'platform', {{ get: () => '{}' }});",
                        self.profile.platform
                    ),
                    vec![],
                )
                .await?;
        }
        Ok(())
    }

    /// Return the full rendered page source.
    pub async fn get_content(&self) -> Result<String> {
        Ok(self.client.source().await?)
    }

    /// Return the page title.
    pub async fn get_title(&self) -> Result<String> {
        Ok(self.client.title().await?)
    }
}
