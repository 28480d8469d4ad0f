// src/fsops.rs

//! Small async filesystem helpers shared by the pipeline stages.
//!
//! These wrap `tokio::fs` and attach path context to errors; stages never
//! touch `tokio::fs` directly.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use crate::errors::Result;

/// Create a directory, including any missing parents. Succeeds if the
/// directory already exists.
pub async fn ensure_dir(path: &Path) -> Result<()> {
    tokio::fs::create_dir_all(path)
        .await
        .with_context(|| format!("creating directory {:?}", path))?;
    debug!(path = ?path, "ensured directory");
    Ok(())
}

/// Remove a directory tree. Succeeds if the directory does not exist.
pub async fn remove_dir(path: &Path) -> Result<()> {
    match tokio::fs::remove_dir_all(path).await {
        Ok(()) => {
            debug!(path = ?path, "removed directory");
            Ok(())
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(anyhow::Error::from(err)
            .context(format!("removing directory {:?}", path))
            .into()),
    }
}

/// Remove a single file.
pub async fn remove_file(path: &Path) -> Result<()> {
    tokio::fs::remove_file(path)
        .await
        .with_context(|| format!("removing file {:?}", path))?;
    Ok(())
}

/// List the immediate subdirectories of `path`.
pub async fn list_dirs(path: &Path) -> Result<Vec<PathBuf>> {
    list_entries(path, true).await
}

/// List the immediate files of `path`.
pub async fn list_files(path: &Path) -> Result<Vec<PathBuf>> {
    list_entries(path, false).await
}

async fn list_entries(path: &Path, dirs: bool) -> Result<Vec<PathBuf>> {
    let mut reader = tokio::fs::read_dir(path)
        .await
        .with_context(|| format!("reading directory {:?}", path))?;

    let mut entries = Vec::new();
    while let Some(entry) = reader
        .next_entry()
        .await
        .with_context(|| format!("reading entry in {:?}", path))?
    {
        let file_type = entry
            .file_type()
            .await
            .with_context(|| format!("stat'ing {:?}", entry.path()))?;
        if file_type.is_dir() == dirs {
            entries.push(entry.path());
        }
    }

    // Directory iteration order is platform-dependent; keep it stable.
    entries.sort();
    Ok(entries)
}
