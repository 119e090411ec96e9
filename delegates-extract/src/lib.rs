//! Extraction of the delegate ranking from the dispatch page markup.
//!
//! The page lists delegates in an HTML table, one per row, in rank order.
//! [`DelegateExtractor`] walks a bounded window of those rows and pulls a
//! display name and nation id out of the third cell. Rows that do not have
//! the expected shape are skipped without error; the number of records is
//! the only signal of how many rows failed.
//!
//! ```
//! use delegates_extract::{DelegateExtractor, ExtractPatterns};
//!
//! let markup = r#"<table>
//!   <tr><th>#</th><th>Region</th><th>Delegate</th></tr>
//!   <tr><td>1</td><td>The Pacific</td><td><div class="nscodealigncenter">
//!     <a class="nlink" href="nation=testlandia"><span class="nnameblock"> Testlandia </span></a>
//!   </div></td></tr>
//! </table>"#;
//!
//! let extractor = DelegateExtractor::new(ExtractPatterns::default()).unwrap();
//! let list = extractor.extract(markup).unwrap();
//! assert_eq!(list.delegates[0].name, "Testlandia");
//! assert_eq!(list.delegates[0].nation_id, "testlandia");
//! ```
mod extractor;
mod patterns;

pub use extractor::{DelegateExtractor, ExtractError};
pub use patterns::ExtractPatterns;
