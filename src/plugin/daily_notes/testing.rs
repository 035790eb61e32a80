//! In-memory host doubles for plugin tests

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, TimeZone};

use crate::core::vault::{parent_folder, Vault, VaultError, Workspace};

/// Midnight UTC on the given day
pub fn instant(year: i32, month: u32, day: u32) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(year, month, day, 0, 0, 0)
        .unwrap()
}

#[derive(Debug, Default)]
pub struct MemoryVault {
    pub files: BTreeMap<String, String>,
    pub creates: usize,
    pub read_only: bool,
    pub current_folder: bool,
}

impl MemoryVault {
    pub fn current_folder() -> Self {
        Self {
            current_folder: true,
            ..Self::default()
        }
    }

    pub fn content(&self, path: &str) -> Option<&str> {
        self.files.get(key(path)).map(String::as_str)
    }
}

fn key(path: &str) -> &str {
    path.trim_start_matches('/')
}

impl Vault for MemoryVault {
    fn exists(&self, path: &str) -> bool {
        self.files.contains_key(key(path))
    }

    fn create(&mut self, path: &str, contents: &str) -> Result<(), VaultError> {
        if self.read_only {
            return Err(VaultError::Io {
                path: path.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            });
        }
        if self.exists(path) {
            return Err(VaultError::AlreadyExists(path.to_string()));
        }
        self.files.insert(key(path).to_string(), contents.to_string());
        self.creates += 1;
        Ok(())
    }

    fn new_file_parent(&self, reference: &str) -> String {
        if self.current_folder && self.exists(reference) {
            parent_folder(reference)
        } else {
            "/".to_string()
        }
    }
}

#[derive(Debug, Default)]
pub struct RecordingWorkspace {
    pub active: Option<String>,
    pub opened: Vec<String>,
}

impl Workspace for RecordingWorkspace {
    fn active_file(&self) -> Option<String> {
        self.active.clone()
    }

    fn open(&mut self, path: &str) {
        self.opened.push(path.to_string());
    }
}
