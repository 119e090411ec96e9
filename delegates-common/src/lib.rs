//! Common types and utilities shared across the delegates crates.
//!
//! This crate defines the artifact model handed from stage to stage,
//! observability helpers, and the small enums that both configuration and
//! drivers need to agree on. It stays dependency-light so every crate in the
//! workspace can depend on it.
//!
//! # Overview
//!
//! - [`RawPage`]: fetched page markup, optionally cut at a sentinel
//! - [`DelegateRecord`] and [`DelegateList`]: the extracted ranking
//! - [`observability`]: centralised tracing/logging initialisation
//! - [`ArtifactError`]: failures reading or writing artifact files
//! - [`StealthLevel`]: how hard the browser tries to look human
//!
//! # Examples
//!
//! ```rust
//! use delegates_common::{DelegateList, DelegateRecord};
//!
//! let list = DelegateList::new(vec![DelegateRecord::new("Testlandia", "testlandia")]);
//! let json = list.to_pretty_json().unwrap();
//! assert!(json.starts_with("{\n  \"delegates\": ["));
//! ```
use serde::{Deserialize, Serialize};

pub mod model;
pub mod observability;

pub use model::{truncate_at_sentinel, ArtifactError, DelegateList, DelegateRecord, RawPage};

/// Browser automation stealth level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StealthLevel {
    Lightweight,
    #[default]
    Balanced,
    Maximum,
}
