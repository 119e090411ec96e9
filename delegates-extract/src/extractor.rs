use crate::patterns::{ExtractPatterns, Selectors};
use delegates_common::{DelegateList, DelegateRecord};
use scraper::{ElementRef, Html};
use std::path::Path;
use tracing::{debug, info};

#[derive(thiserror::Error, Debug)]
pub enum ExtractError {
    /// The input could not be treated as markup at all.
    #[error("markup could not be parsed: {0}")]
    Parse(String),

    #[error("could not read markup from {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid selector pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

/// Pulls [`DelegateRecord`]s out of the ranking table.
pub struct DelegateExtractor {
    patterns: ExtractPatterns,
    selectors: Selectors,
}

impl DelegateExtractor {
    /// Compile `patterns` into selectors; fails if a class marker does not
    /// form a valid CSS selector.
    pub fn new(patterns: ExtractPatterns) -> Result<Self, ExtractError> {
        let selectors = patterns.compile()?;
        Ok(Self {
            patterns,
            selectors,
        })
    }

    pub fn patterns(&self) -> &ExtractPatterns {
        &self.patterns
    }

    /// Extract the ranking from `markup`, in table row order.
    ///
    /// A sparse or empty table yields a short or empty list, never an error.
    pub fn extract(&self, markup: &str) -> Result<DelegateList, ExtractError> {
        let doc = self.parse(markup);

        let mut examined = 0usize;
        let delegates: Vec<DelegateRecord> = doc
            .select(&self.selectors.row)
            .skip(self.patterns.header_rows)
            .take(self.patterns.row_window)
            .inspect(|_| examined += 1)
            .filter_map(|row| self.record_from_row(row))
            .collect();

        info!(
            target: "extract",
            rows = examined,
            delegates = delegates.len(),
            skipped = examined - delegates.len(),
            "extracted delegates"
        );
        Ok(DelegateList::new(delegates))
    }

    /// Parse as a document. html5ever drops `tr` tokens outside a table, so
    /// markup whose rows have no enclosing `<table>` is parsed again with one.
    fn parse(&self, markup: &str) -> Html {
        let doc = Html::parse_document(markup);
        if doc.select(&self.selectors.row).next().is_some()
            || !markup.to_ascii_lowercase().contains("<tr")
        {
            return doc;
        }
        debug!(target: "extract", "rows found outside a table; reparsing in table context");
        Html::parse_fragment(&format!("<table>{markup}</table>"))
    }

    /// Read a markup artifact from disk and extract from it.
    pub fn extract_file(&self, path: impl AsRef<Path>) -> Result<DelegateList, ExtractError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| ExtractError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let markup = String::from_utf8(bytes).map_err(|e| {
            ExtractError::Parse(format!("{} is not valid UTF-8: {e}", path.display()))
        })?;
        self.extract(&markup)
    }

    fn record_from_row(&self, row: ElementRef<'_>) -> Option<DelegateRecord> {
        let Some(cell) = row.select(&self.selectors.cell).nth(self.patterns.cell_index) else {
            debug!(target: "extract", "row has too few cells");
            return None;
        };
        let container = cell.select(&self.selectors.container).next()?;
        let anchor = container.select(&self.selectors.anchor).next()?;

        let nation_id = anchor
            .value()
            .attr("href")
            .and_then(|href| self.nation_id_from_href(href));
        let name = anchor
            .select(&self.selectors.name)
            .next()
            .map(|span| span.text().collect::<String>().trim().to_string());

        match (name, nation_id) {
            (Some(name), Some(nation_id)) if !name.is_empty() && !nation_id.is_empty() => {
                Some(DelegateRecord { name, nation_id })
            }
            _ => None,
        }
    }

    fn nation_id_from_href(&self, href: &str) -> Option<String> {
        if !href.starts_with(self.patterns.id_prefix.as_str()) {
            return None;
        }
        href.split_once('=').map(|(_, id)| id.to_string())
    }
}
