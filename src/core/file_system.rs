//! Filesystem-backed vault

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use super::vault::{normalize, parent_folder, NewFileLocation, Vault, VaultError};

/// A vault rooted at a directory on disk
#[derive(Debug, Clone)]
pub struct FsVault {
    root: PathBuf,
    new_file_location: NewFileLocation,
}

impl FsVault {
    /// Open a vault rooted at `root`
    pub fn new(root: impl Into<PathBuf>, new_file_location: NewFileLocation) -> Self {
        Self {
            root: root.into(),
            new_file_location,
        }
    }

    /// Vault root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute location of a vault path
    pub fn absolute(&self, path: &str) -> Result<PathBuf, VaultError> {
        Ok(self.root.join(normalize(path)?))
    }

    fn is_folder(&self, path: &str) -> bool {
        self.absolute(path).map(|p| p.is_dir()).unwrap_or(false)
    }

    /// All markdown notes in the vault as vault paths, sorted
    pub fn markdown_files(&self) -> Vec<String> {
        let mut files: Vec<String> = WalkDir::new(&self.root)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && is_markdown(e.path()))
            .filter_map(|e| {
                let relative = e.path().strip_prefix(&self.root).ok()?;
                let segments: Vec<_> = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect();
                Some(segments.join("/"))
            })
            .collect();
        files.sort();
        files
    }
}

impl Vault for FsVault {
    fn exists(&self, path: &str) -> bool {
        self.absolute(path).map(|p| p.exists()).unwrap_or(false)
    }

    fn create(&mut self, path: &str, contents: &str) -> Result<(), VaultError> {
        let target = self.absolute(path)?;
        let io_err = |source| VaultError::Io {
            path: path.to_string(),
            source,
        };

        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => VaultError::AlreadyExists(path.to_string()),
                _ => io_err(e),
            })?;
        file.write_all(contents.as_bytes()).map_err(io_err)?;

        tracing::info!("Created note: {}", target.display());
        Ok(())
    }

    fn new_file_parent(&self, reference: &str) -> String {
        match &self.new_file_location {
            NewFileLocation::Root => "/".to_string(),
            NewFileLocation::CurrentFolder => {
                if self.exists(reference) {
                    parent_folder(reference)
                } else {
                    "/".to_string()
                }
            }
            NewFileLocation::Folder(folder) => {
                if self.is_folder(folder) {
                    folder.trim_matches('/').to_string()
                } else {
                    tracing::warn!("Configured folder for new notes does not exist: {}", folder);
                    "/".to_string()
                }
            }
        }
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

/// Check if a path is a markdown file
fn is_markdown(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext == "md" || ext == "markdown")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vault(location: NewFileLocation) -> (tempfile::TempDir, FsVault) {
        let dir = tempfile::tempdir().unwrap();
        let vault = FsVault::new(dir.path(), location);
        (dir, vault)
    }

    #[test]
    fn test_create_makes_parents() {
        let (dir, mut vault) = vault(NewFileLocation::Root);
        vault.create("Journal/2024/03-05.md", "").unwrap();
        assert!(dir.path().join("Journal/2024/03-05.md").is_file());
        assert!(vault.exists("Journal/2024/03-05.md"));
        assert!(vault.exists("/Journal/2024/03-05.md"));
    }

    #[test]
    fn test_create_never_overwrites() {
        let (dir, mut vault) = vault(NewFileLocation::Root);
        std::fs::write(dir.path().join("note.md"), "keep me").unwrap();

        let err = vault.create("/note.md", "").unwrap_err();
        assert!(matches!(err, VaultError::AlreadyExists(_)));
        assert_eq!(std::fs::read_to_string(dir.path().join("note.md")).unwrap(), "keep me");
    }

    #[test]
    fn test_rejects_traversal() {
        let (_dir, mut vault) = vault(NewFileLocation::Root);
        assert!(matches!(
            vault.create("../escape.md", ""),
            Err(VaultError::InvalidPath(_))
        ));
        assert!(!vault.exists("../escape.md"));
    }

    #[test]
    fn test_new_file_parent_current_folder() {
        let (dir, vault) = vault(NewFileLocation::CurrentFolder);
        std::fs::create_dir_all(dir.path().join("Projects/Rust")).unwrap();
        std::fs::write(dir.path().join("Projects/Rust/notes.md"), "").unwrap();

        assert_eq!(vault.new_file_parent("Projects/Rust/notes.md"), "Projects/Rust");
        assert_eq!(vault.new_file_parent("missing/file.md"), "/");
        assert_eq!(vault.new_file_parent(""), "/");
    }

    #[test]
    fn test_new_file_parent_folder() {
        let (dir, vault) = vault(NewFileLocation::Folder("Journal".to_string()));
        assert_eq!(vault.new_file_parent(""), "/");

        std::fs::create_dir(dir.path().join("Journal")).unwrap();
        assert_eq!(vault.new_file_parent(""), "Journal");
    }

    #[test]
    fn test_markdown_files_skips_hidden() {
        let (dir, mut vault) = vault(NewFileLocation::Root);
        vault.create("b.md", "").unwrap();
        vault.create("Journal/a.markdown", "").unwrap();
        vault.create("Journal/image.png", "").unwrap();
        std::fs::create_dir_all(dir.path().join(".obsidian")).unwrap();
        std::fs::write(dir.path().join(".obsidian/hidden.md"), "").unwrap();

        assert_eq!(vault.markdown_files(), vec!["Journal/a.markdown", "b.md"]);
    }
}
