use crate::error::Result;
use crate::git::GitRepository;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::info;

/// What a successful publish did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    Pushed { commit: String, remote: String },
    /// The artifacts matched `HEAD`; nothing was committed or pushed.
    Unchanged,
}

/// Hands a set of files to version control with a commit message.
pub trait Publisher {
    fn publish(&self, files: &[&Path], message: &str) -> Result<PublishOutcome>;
}

/// Commits the artifacts and pushes the current branch to `remote`.
pub struct GitPublisher {
    repo_path: PathBuf,
    remote: String,
}

impl GitPublisher {
    pub fn new(repo_path: impl Into<PathBuf>, remote: impl Into<String>) -> Self {
        Self {
            repo_path: repo_path.into(),
            remote: remote.into(),
        }
    }
}

impl Publisher for GitPublisher {
    fn publish(&self, files: &[&Path], message: &str) -> Result<PublishOutcome> {
        let repo = GitRepository::open(&self.repo_path)?;
        let paths: Vec<PathBuf> = files.iter().map(|f| repo.relative_path(f)).collect();

        repo.run(with_paths(&["add", "--"], &paths))?;

        let unchanged = repo.check(with_paths(&["diff", "--cached", "--quiet", "--"], &paths))?;
        if unchanged {
            info!(target: "publish", files = paths.len(), "artifacts unchanged; nothing to publish");
            return Ok(PublishOutcome::Unchanged);
        }

        repo.run(with_paths(&["commit", "--only", "-m", message, "--"], &paths))?;
        let commit = repo.run(["rev-parse", "HEAD"])?.trim().to_string();
        info!(target: "publish", %commit, "committed artifacts");

        repo.run(["push", self.remote.as_str(), "HEAD"])?;
        info!(target: "publish", remote = %self.remote, %commit, "pushed");

        Ok(PublishOutcome::Pushed {
            commit,
            remote: self.remote.clone(),
        })
    }
}

fn with_paths(head: &[&str], paths: &[PathBuf]) -> Vec<OsString> {
    head.iter()
        .map(OsString::from)
        .chain(paths.iter().map(|p| p.as_os_str().to_os_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PublishError;

    #[test]
    fn publishing_outside_a_repository_fails_up_front() {
        let tmp = tempfile::TempDir::new().unwrap();
        let file = tmp.path().join("delegates.json");
        std::fs::write(&file, "{}").unwrap();

        let publisher = GitPublisher::new(tmp.path(), "origin");
        let err = publisher.publish(&[file.as_path()], "update").unwrap_err();
        assert!(matches!(err, PublishError::RepositoryNotFound(_)));
    }

    #[test]
    fn paths_follow_the_subcommand() {
        let args = with_paths(&["add", "--"], &[PathBuf::from("a.html"), PathBuf::from("b.json")]);
        assert_eq!(args, vec!["add", "--", "a.html", "b.json"]);
    }
}
