// src/errors.rs

//! Crate-wide error type and `Result` alias.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeckbakeError {
    #[error("configuration error: {0}")]
    Config(String),

    /// An external collaborator script exited with a non-zero status.
    ///
    /// The rendered message is part of the runner contract and is asserted
    /// in tests; keep the wording stable.
    #[error("{label} script exited with status {status}")]
    ScriptExit { label: String, status: i32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("file watch error: {0}")]
    Notify(#[from] notify::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, DeckbakeError>;
