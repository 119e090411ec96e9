use thiserror::Error;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("no git repository found at {0}")]
    RepositoryNotFound(String),

    #[error("`git {command}` failed: {diagnostic}")]
    Command { command: String, diagnostic: String },

    #[error("could not run git: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PublishError>;
