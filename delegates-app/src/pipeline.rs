use crate::setup::extract_patterns;
use delegates_common::{ArtifactError, DelegateList, RawPage};
use delegates_config::DelegatesConfig;
use delegates_drivers::{FetchError, PageFetcher};
use delegates_extract::{DelegateExtractor, ExtractError};
use delegates_publish::{PublishError, PublishOutcome, Publisher};
use std::path::PathBuf;
use tracing::{info, warn};
use url::Url;

/// A failed run, labelled with the stage that failed.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error("fetch stage failed: invalid page URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("fetch stage failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("extract stage failed: {0}")]
    Extract(#[from] ExtractError),

    #[error("{stage} stage failed: {source}")]
    Artifact {
        stage: &'static str,
        #[source]
        source: ArtifactError,
    },

    #[error("publish stage failed: {0}")]
    Publish(#[from] PublishError),
}

impl PipelineError {
    pub fn stage(&self) -> &'static str {
        match self {
            Self::InvalidUrl { .. } | Self::Fetch(_) => "fetch",
            Self::Extract(_) => "extract",
            Self::Artifact { stage, .. } => *stage,
            Self::Publish(_) => "publish",
        }
    }
}

/// What a completed run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub markup_path: PathBuf,
    pub delegates_path: PathBuf,
    pub truncated: bool,
    pub delegates: usize,
    /// `None` when publishing is switched off.
    pub publish: Option<PublishOutcome>,
}

/// The three stages, run strictly one after another.
///
/// Fetch and extract failures stop the run before anything is published.
/// A publish failure leaves the freshly written artifacts on disk.
pub struct Pipeline<'a> {
    config: &'a DelegatesConfig,
    fetcher: &'a dyn PageFetcher,
    publisher: Option<&'a dyn Publisher>,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        config: &'a DelegatesConfig,
        fetcher: &'a dyn PageFetcher,
        publisher: Option<&'a dyn Publisher>,
    ) -> Self {
        Self {
            config,
            fetcher,
            publisher,
        }
    }

    pub async fn run(&self) -> Result<RunSummary, PipelineError> {
        let page = self.fetch().await?;
        let list = self.extract()?;
        let publish = match self.publisher {
            Some(publisher) => Some(self.publish(publisher)?),
            None => {
                info!(target: "pipeline", "publishing disabled; artifacts left on disk");
                None
            }
        };

        Ok(RunSummary {
            markup_path: self.config.output.markup_path(),
            delegates_path: self.config.output.delegates_path(),
            truncated: page.was_truncated(),
            delegates: list.len(),
            publish,
        })
    }

    /// Capture the page, apply the sentinel cut, and write the markup artifact.
    pub async fn fetch(&self) -> Result<RawPage, PipelineError> {
        let fetch = &self.config.fetch;
        let url = Url::parse(&fetch.url).map_err(|e| PipelineError::InvalidUrl {
            url: fetch.url.clone(),
            reason: e.to_string(),
        })?;

        let page = self.fetcher.fetch(&url).await?.truncate_at(&fetch.sentinel);
        if page.was_truncated() {
            info!(target: "pipeline", sentinel = %fetch.sentinel, bytes = page.len(), "sentinel found; markup truncated");
        } else {
            warn!(target: "pipeline", sentinel = %fetch.sentinel, bytes = page.len(), "sentinel not found; keeping full markup");
        }

        let path = self.config.output.markup_path();
        page.write_to(&path).map_err(|source| PipelineError::Artifact {
            stage: "fetch",
            source,
        })?;
        info!(target: "pipeline", path = %path.display(), "saved markup");
        Ok(page)
    }

    /// Extract the ranking from the markup artifact and write the delegates artifact.
    pub fn extract(&self) -> Result<DelegateList, PipelineError> {
        let extractor = DelegateExtractor::new(extract_patterns(&self.config.extract))?;
        let list = extractor.extract_file(self.config.output.markup_path())?;

        let path = self.config.output.delegates_path();
        list.write_to(&path).map_err(|source| PipelineError::Artifact {
            stage: "extract",
            source,
        })?;
        info!(target: "pipeline", path = %path.display(), delegates = list.len(), "saved delegates");
        Ok(list)
    }

    /// Commit and push both artifacts.
    pub fn publish(&self, publisher: &dyn Publisher) -> Result<PublishOutcome, PipelineError> {
        let markup = self.config.output.markup_path();
        let delegates = self.config.output.delegates_path();
        let outcome = publisher.publish(
            &[markup.as_path(), delegates.as_path()],
            &self.config.publish.commit_message,
        )?;
        info!(target: "pipeline", ?outcome, "publish finished");
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_name_their_stage() {
        let err = PipelineError::InvalidUrl {
            url: "nope".into(),
            reason: "relative URL without a base".into(),
        };
        assert_eq!(err.stage(), "fetch");
        assert!(err.to_string().starts_with("fetch stage failed"));

        let err = PipelineError::from(ExtractError::Parse("bad bytes".into()));
        assert_eq!(err.stage(), "extract");

        let err = PipelineError::from(PublishError::RepositoryNotFound("/tmp/x".into()));
        assert_eq!(err.stage(), "publish");
        assert_eq!(
            err.to_string(),
            "publish stage failed: no git repository found at /tmp/x"
        );
    }
}
