use crate::extractor::ExtractError;
use scraper::Selector;

/// Structural markers of the delegate table.
///
/// These are tied to how one external page happens to be laid out, so they
/// are inputs rather than constants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractPatterns {
    /// Leading rows to skip (the header).
    pub header_rows: usize,
    /// Maximum number of rows examined after the header.
    pub row_window: usize,
    /// Zero-based index of the cell holding the delegate link.
    pub cell_index: usize,
    pub container_class: String,
    pub anchor_class: String,
    pub name_class: String,
    /// Link targets must start with this; the id is what follows the first `=`.
    pub id_prefix: String,
}

impl Default for ExtractPatterns {
    fn default() -> Self {
        Self {
            header_rows: 1,
            row_window: 30,
            cell_index: 2,
            container_class: "nscodealigncenter".to_string(),
            anchor_class: "nlink".to_string(),
            name_class: "nnameblock".to_string(),
            id_prefix: "nation=".to_string(),
        }
    }
}

pub(crate) struct Selectors {
    pub row: Selector,
    pub cell: Selector,
    pub container: Selector,
    pub anchor: Selector,
    pub name: Selector,
}

impl ExtractPatterns {
    pub(crate) fn compile(&self) -> Result<Selectors, ExtractError> {
        Ok(Selectors {
            row: parse("tr")?,
            cell: parse("td")?,
            container: parse(&class_selector("div", &self.container_class)?)?,
            anchor: parse(&class_selector("a", &self.anchor_class)?)?,
            name: parse(&class_selector("span", &self.name_class)?)?,
        })
    }
}

/// `tag.class`, where `class` must be a single class name. Anything else
/// would silently turn into a compound or descendant selector.
fn class_selector(tag: &str, class: &str) -> Result<String, ExtractError> {
    let class = class.trim();
    let is_identifier = !class.is_empty()
        && !class.starts_with(|c: char| c.is_ascii_digit())
        && class
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_');
    if !is_identifier {
        return Err(ExtractError::InvalidPattern {
            pattern: class.to_string(),
            reason: "class marker must be a single CSS class name".to_string(),
        });
    }
    Ok(format!("{tag}.{class}"))
}

fn parse(pattern: &str) -> Result<Selector, ExtractError> {
    Selector::parse(pattern).map_err(|e| ExtractError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}
