use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TodoError {
    #[error("No entry found: {0}")]
    NotFound(String),

    #[error("Entry already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Invalid entry in {}: {message}", path.display())]
    Validation { path: PathBuf, message: String },

    #[error("No unique prefix for id {0} (duplicate id?)")]
    NoUniquePrefix(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not parse entry {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_yaml::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Api Error: {0}")]
    Api(String),

    #[error("Remote call failed with {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl TodoError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, TodoError::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, TodoError>;
