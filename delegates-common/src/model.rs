//! Artifacts exchanged between the pipeline stages.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Failures while persisting or loading an artifact file.
#[derive(thiserror::Error, Debug)]
pub enum ArtifactError {
    #[error("artifact I/O failed for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("artifact encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl ArtifactError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Return the part of `markup` before the first `sentinel`, or `None` when
/// the sentinel does not occur. An empty sentinel never matches.
///
/// ```
/// use delegates_common::truncate_at_sentinel;
///
/// assert_eq!(truncate_at_sentinel("<tr>a</tr><31>rest", "<31>"), Some("<tr>a</tr>"));
/// assert_eq!(truncate_at_sentinel("<tr>a</tr>", "<31>"), None);
/// ```
pub fn truncate_at_sentinel<'a>(markup: &'a str, sentinel: &str) -> Option<&'a str> {
    if sentinel.is_empty() {
        return None;
    }
    markup.find(sentinel).map(|pos| &markup[..pos])
}

/// Page markup as captured by a fetcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPage {
    markup: String,
    truncated: bool,
}

impl RawPage {
    pub fn new(markup: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
            truncated: false,
        }
    }

    /// Apply the truncation policy: keep only the text preceding the first
    /// occurrence of `sentinel`, or everything when it is absent.
    pub fn truncate_at(self, sentinel: &str) -> Self {
        match truncate_at_sentinel(&self.markup, sentinel) {
            Some(prefix) => Self {
                markup: prefix.to_string(),
                truncated: true,
            },
            None => self,
        }
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub fn into_markup(self) -> String {
        self.markup
    }

    /// Whether the sentinel was found and the tail discarded.
    pub fn was_truncated(&self) -> bool {
        self.truncated
    }

    pub fn len(&self) -> usize {
        self.markup.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markup.is_empty()
    }

    /// Overwrite `path` with the markup as UTF-8.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), ArtifactError> {
        let path = path.as_ref();
        std::fs::write(path, self.markup.as_bytes()).map_err(|e| ArtifactError::io(path, e))
    }
}

/// One ranked delegate: the display name and the nation identifier used in
/// links and API calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegateRecord {
    pub name: String,
    pub nation_id: String,
}

impl DelegateRecord {
    pub fn new(name: impl Into<String>, nation_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nation_id: nation_id.into(),
        }
    }
}

/// Envelope around the ordered delegate ranking as stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegateList {
    pub delegates: Vec<DelegateRecord>,
}

impl DelegateList {
    pub fn new(delegates: Vec<DelegateRecord>) -> Self {
        Self { delegates }
    }

    pub fn len(&self) -> usize {
        self.delegates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.delegates.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DelegateRecord> {
        self.delegates.iter()
    }

    /// Two-space indented JSON with a stable field order.
    pub fn to_pretty_json(&self) -> Result<String, ArtifactError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self, ArtifactError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Overwrite `path` with the pretty JSON document.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), ArtifactError> {
        let path = path.as_ref();
        let mut json = self.to_pretty_json()?;
        json.push('\n');
        std::fs::write(path, json).map_err(|e| ArtifactError::io(path, e))
    }

    pub fn read_from(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ArtifactError::io(path, e))?;
        Self::from_json(&text)
    }
}

impl<'a> IntoIterator for &'a DelegateList {
    type Item = &'a DelegateRecord;
    type IntoIter = std::slice::Iter<'a, DelegateRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.delegates.iter()
    }
}
