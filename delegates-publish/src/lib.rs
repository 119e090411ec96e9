//! Publishing of the scraped artifacts to a git remote.
//!
//! [`GitPublisher`] runs the `git` executable in the working repository:
//! stage the artifacts, commit only those paths, push the current branch.
//! There is no rebase, conflict handling, or retry; a rejected push ends the
//! run and leaves the local commit in place.
mod error;
mod git;
mod publisher;

pub use error::PublishError;
pub use git::GitRepository;
pub use publisher::{GitPublisher, PublishOutcome, Publisher};
