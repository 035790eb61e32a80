//! Host-side abstractions over the note collection and the open workspace

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by vault operations
#[derive(Debug, Error)]
pub enum VaultError {
    /// The path escapes the vault or contains an unusable segment
    #[error("invalid vault path: {0}")]
    InvalidPath(String),
    /// A file already exists where a new one was requested
    #[error("file already exists: {0}")]
    AlreadyExists(String),
    /// The underlying filesystem operation failed
    #[error("failed to create {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Where new notes go when no folder is given explicitly
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NewFileLocation {
    /// The vault root
    #[default]
    Root,
    /// The folder of the reference (usually active) file
    CurrentFolder,
    /// A fixed folder inside the vault
    Folder(String),
}

/// The note collection, addressed by `/`-separated vault paths
pub trait Vault {
    /// Check whether a file exists at `path`. Never fails; unusable paths
    /// simply do not exist.
    fn exists(&self, path: &str) -> bool;

    /// Create a new file at `path` with `contents`. Never overwrites.
    fn create(&mut self, path: &str, contents: &str) -> Result<(), VaultError>;

    /// Folder a new file should be created in, given a reference file path
    fn new_file_parent(&self, reference: &str) -> String;
}

/// The editing surface that shows notes to the user
pub trait Workspace {
    /// Path of the focused note, if any
    fn active_file(&self) -> Option<String>;

    /// Open the note at `path`
    fn open(&mut self, path: &str);
}

/// Split a vault path into its segments, rejecting `.` and `..`
pub fn normalize(path: &str) -> Result<PathBuf, VaultError> {
    let mut relative = PathBuf::new();
    for segment in path.split(['/', '\\']).filter(|s| !s.is_empty()) {
        if segment == "." || segment == ".." {
            return Err(VaultError::InvalidPath(path.to_string()));
        }
        relative.push(segment);
    }

    if relative.as_os_str().is_empty() {
        return Err(VaultError::InvalidPath(path.to_string()));
    }
    Ok(relative)
}

/// Parent folder of a vault path, `/` for top-level entries
pub fn parent_folder(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    match trimmed.rfind('/') {
        Some(idx) => trimmed[..idx].to_string(),
        None => "/".to_string(),
    }
}
