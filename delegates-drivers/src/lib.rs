//! Driver layer for capturing the delegate page through a real browser.
//!
//! The page sits behind a client-side challenge, so a plain HTTP GET is not
//! enough: a WebDriver-controlled Chrome loads it, waits, and hands back the
//! rendered source.
//!
//! - [`fetcher::PageFetcher`]: the contract the pipeline depends on
//! - [`fetcher::WebDriverFetcher`]: Fantoccini-backed implementation
//! - [`fetcher::InMemoryFetcher`]: canned markup for tests and offline runs
//! - [`browser::driver::BrowserDriver`]: WebDriver client wrapper
//! - [`browser::page::BrowserPage`]: navigation and source capture
//! - [`browser::stealth`]: Chrome arguments and JS evasions
pub mod browser;
pub mod fetcher;

pub use fetcher::{BrowserSettings, FetchError, InMemoryFetcher, PageFetcher, WebDriverFetcher};
