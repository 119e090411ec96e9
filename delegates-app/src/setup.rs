//! Translation of [`DelegatesConfig`] sections into the settings each crate
//! takes.
use delegates_common::observability::LogConfig;
use delegates_config::{
    ConfigError, DelegatesConfig, DelegatesConfigLoader, ExtractConfig, FetchConfig,
    LoggingConfig,
};
use delegates_drivers::BrowserSettings;
use delegates_extract::ExtractPatterns;
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "delegates.yaml";

/// Load configuration from `explicit` (which must exist) or, without one,
/// from `delegates.yaml` in the working directory if present.
pub fn load_config(explicit: Option<&Path>) -> Result<DelegatesConfig, ConfigError> {
    let loader = DelegatesConfigLoader::new();
    let loader = match explicit {
        Some(path) => loader.with_file(path),
        None => loader.with_optional_file(DEFAULT_CONFIG_FILE),
    };
    loader.load()
}

pub fn log_config(app_name: &'static str, logging: &LoggingConfig) -> LogConfig {
    LogConfig {
        app_name,
        log_dir: logging.dir.clone(),
        emit_stderr: logging.emit_stderr,
        format: logging.format,
        default_filter: logging.filter.clone(),
    }
}

pub fn browser_settings(fetch: &FetchConfig) -> BrowserSettings {
    BrowserSettings {
        webdriver_url: fetch.webdriver_url.clone(),
        headless: fetch.headless,
        stealth: fetch.stealth,
        challenge_wait: fetch.challenge_wait(),
    }
}

pub fn extract_patterns(extract: &ExtractConfig) -> ExtractPatterns {
    ExtractPatterns {
        header_rows: extract.header_rows,
        row_window: extract.row_window,
        cell_index: extract.cell_index,
        container_class: extract.container_class.clone(),
        anchor_class: extract.anchor_class.clone(),
        name_class: extract.name_class.clone(),
        id_prefix: extract.id_prefix.clone(),
    }
}
