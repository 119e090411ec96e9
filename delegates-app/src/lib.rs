//! Orchestration of the scrape → extract → publish run.
//!
//! The binaries in this crate are thin: they load [`DelegatesConfig`], set up
//! logging, build the collaborators, and hand everything to [`Pipeline`].
//!
//! [`DelegatesConfig`]: delegates_config::DelegatesConfig
pub mod pipeline;
pub mod setup;

pub use pipeline::{Pipeline, PipelineError, RunSummary};
