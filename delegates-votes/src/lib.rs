//! World Assembly vote lookup for the published delegate ranking.
//!
//! - [`DelegateSource`]: where the ranking comes from (URL or file)
//! - [`NationStatesClient`]: minimal client for the public `api.cgi` endpoint
//! - [`VoteChecker`]: walks the ranking and collects [`VoteRecord`]s
//! - [`nation_id_from_name`]: slug used when a ranking entry has no id
mod checker;
mod client;
mod slug;

pub use checker::{VoteChecker, VoteRecord, WaVotes, NO_VOTE};
pub use client::{DelegateSource, NationStatesClient, VoteError};
pub use slug::nation_id_from_name;
