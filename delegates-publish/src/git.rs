use crate::error::{PublishError, Result};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tracing::debug;

/// A working tree the `git` executable is run in.
pub struct GitRepository {
    root: PathBuf,
}

impl GitRepository {
    /// Open the repository rooted at `path`. The directory itself must hold
    /// the `.git` entry; parent directories are not searched.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.join(".git").exists() {
            return Err(PublishError::RepositoryNotFound(path.display().to_string()));
        }
        let root = path.canonicalize()?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Run a git command and return its stdout; a non-zero exit becomes
    /// [`PublishError::Command`] carrying stderr.
    pub fn run<I, S>(&self, args: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let (command, output) = self.output(args)?;
        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        } else {
            Err(PublishError::Command {
                command,
                diagnostic: diagnostic(&output),
            })
        }
    }

    /// Run a git command whose exit code answers a yes/no question
    /// (0 = yes, 1 = no). Any other exit is an error.
    pub fn check<I, S>(&self, args: I) -> Result<bool>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let (command, output) = self.output(args)?;
        match output.status.code() {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => Err(PublishError::Command {
                command,
                diagnostic: diagnostic(&output),
            }),
        }
    }

    /// Express `path` relative to the repository root when it lies inside it.
    pub fn relative_path(&self, path: &Path) -> PathBuf {
        path.canonicalize()
            .ok()
            .and_then(|abs| abs.strip_prefix(&self.root).ok().map(Path::to_path_buf))
            .unwrap_or_else(|| path.to_path_buf())
    }

    fn output<I, S>(&self, args: I) -> Result<(String, Output)>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args: Vec<_> = args.into_iter().map(|a| a.as_ref().to_os_string()).collect();
        let command = args
            .iter()
            .map(|a| a.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ");
        debug!(target: "publish.git", %command, root = %self.root.display(), "running git");

        let output = Command::new("git")
            .args(&args)
            .current_dir(&self.root)
            .env("GIT_TERMINAL_PROMPT", "0")
            .output()?;
        Ok((command, output))
    }
}

fn diagnostic(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if !stderr.is_empty() {
        return stderr;
    }
    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if !stdout.is_empty() {
        return stdout;
    }
    format!("exited with {}", output.status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_directory_is_not_a_repository() {
        let tmp = tempfile::TempDir::new().unwrap();
        let result = GitRepository::open(tmp.path());
        assert!(matches!(result, Err(PublishError::RepositoryNotFound(_))));
    }

    #[test]
    fn missing_directory_is_not_a_repository() {
        let result = GitRepository::open("/tmp/delegates-not-a-repo/nested");
        assert!(matches!(result, Err(PublishError::RepositoryNotFound(_))));
    }

    #[test]
    fn nested_directory_of_a_repository_is_rejected() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join(".git")).unwrap();
        std::fs::create_dir(tmp.path().join("sub")).unwrap();
        assert!(GitRepository::open(tmp.path()).is_ok());
        assert!(matches!(
            GitRepository::open(tmp.path().join("sub")),
            Err(PublishError::RepositoryNotFound(_))
        ));
    }

    #[test]
    fn paths_inside_the_root_become_relative() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join(".git")).unwrap();
        let file = tmp.path().join("delegates.json");
        std::fs::write(&file, "{}").unwrap();

        let repo = GitRepository::open(tmp.path()).unwrap();
        assert_eq!(repo.relative_path(&file), PathBuf::from("delegates.json"));
        assert_eq!(
            repo.relative_path(Path::new("/elsewhere/out.html")),
            PathBuf::from("/elsewhere/out.html")
        );
    }
}
