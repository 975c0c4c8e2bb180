use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] tales_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Story not found: {0}")]
    NoteNotFound(String),
    #[error("{0}")]
    Rejected(String),
    #[error("{0}")]
    LoadFailed(String),
    #[error("{0}")]
    SaveFailed(String),
    #[error("{0}")]
    DeleteFailed(String),
}
