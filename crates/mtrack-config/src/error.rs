use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Malformed configuration `{path}`: {message}")]
    Serde { path: PathBuf, message: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
