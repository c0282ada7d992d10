use std::{io, path::PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to read task store {path}: {source}")]
    ReadStore { path: PathBuf, source: io::Error },

    #[error("failed to write task store {path}: {source}")]
    WriteStore { path: PathBuf, source: io::Error },

    #[error("task store {path} is not valid JSON: {source}")]
    DecodeStore {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to encode tasks: {0}")]
    EncodeStore(#[from] serde_json::Error),

    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
