use crate::checker::WaVotes;
use delegates_common::{ArtifactError, DelegateList};
use reqwest::{Client, StatusCode, Url};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum VoteError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("request build failed: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("{url} returned {status}")]
    Status { url: String, status: StatusCode },
    #[error("delegate list unreadable: {0}")]
    Source(#[from] ArtifactError),
}

/// Where the delegate ranking is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DelegateSource {
    Remote(Url),
    Local(PathBuf),
}

impl DelegateSource {
    /// `http://` and `https://` values are URLs, anything else a file path.
    pub fn parse(raw: &str) -> Result<Self, VoteError> {
        let raw = raw.trim();
        if raw.starts_with("http://") || raw.starts_with("https://") {
            let url = Url::parse(raw).map_err(|e| VoteError::Url(e.to_string()))?;
            Ok(Self::Remote(url))
        } else {
            Ok(Self::Local(PathBuf::from(raw)))
        }
    }
}

/// Client for the NationStates public API.
#[derive(Clone)]
pub struct NationStatesClient {
    base: Url,
    inner: Client,
}

impl NationStatesClient {
    /// Build a client for `base` (e.g. `https://www.nationstates.net`).
    /// The API rejects requests without a descriptive `User-Agent`.
    pub fn new(base: &str, user_agent: &str, timeout: Duration) -> Result<Self, VoteError> {
        let base = Url::parse(base).map_err(|e| VoteError::Url(e.to_string()))?;
        let inner = Client::builder()
            .user_agent(user_agent)
            .connect_timeout(Duration::from_secs(5))
            .timeout(timeout)
            .build()
            .map_err(|e| VoteError::Build(e.to_string()))?;
        Ok(Self { base, inner })
    }

    /// Current General Assembly and Security Council votes of `nation_id`.
    pub async fn wa_votes(&self, nation_id: &str) -> Result<WaVotes, VoteError> {
        let mut url = self
            .base
            .join("cgi-bin/api.cgi")
            .map_err(|e| VoteError::Url(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("nation", nation_id)
            .append_pair("q", "wa_votes");

        let body = self.get_text(url).await?;
        Ok(WaVotes::from_xml(&body))
    }

    /// Load the delegate ranking from `source`.
    pub async fn delegates(&self, source: &DelegateSource) -> Result<DelegateList, VoteError> {
        match source {
            DelegateSource::Remote(url) => {
                let text = self.get_text(url.clone()).await?;
                Ok(DelegateList::from_json(&text)?)
            }
            DelegateSource::Local(path) => Ok(DelegateList::read_from(path)?),
        }
    }

    async fn get_text(&self, url: Url) -> Result<String, VoteError> {
        let t0 = std::time::Instant::now();
        let resp = self
            .inner
            .get(url.clone())
            .send()
            .await
            .map_err(|e| VoteError::Network(e.to_string()))?;
        let status = resp.status();
        debug!(
            target: "votes.http",
            host_path = %format!("{}{}", url.domain().unwrap_or("-"), url.path()),
            status = status.as_u16(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "http.response"
        );

        if !status.is_success() {
            return Err(VoteError::Status {
                url: url.to_string(),
                status,
            });
        }
        resp.text()
            .await
            .map_err(|e| VoteError::Network(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_and_paths_are_told_apart() {
        assert!(matches!(
            DelegateSource::parse("https://example.test/delegates.json").unwrap(),
            DelegateSource::Remote(_)
        ));
        assert_eq!(
            DelegateSource::parse("./delegates.json").unwrap(),
            DelegateSource::Local(PathBuf::from("./delegates.json"))
        );
    }

    #[test]
    fn broken_base_url_is_rejected() {
        let result = NationStatesClient::new("not a url", "ua", Duration::from_secs(1));
        assert!(matches!(result, Err(VoteError::Url(_))));
    }
}
