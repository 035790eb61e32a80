//! Application configuration management

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use super::vault::NewFileLocation;

/// Maximum number of remembered vaults
const MAX_RECENT_VAULTS: usize = 10;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Last opened vault path
    pub last_vault: Option<PathBuf>,
    /// Recent vaults, most recent first
    pub recent_vaults: Vec<PathBuf>,
    /// Vault behaviour
    pub vault: VaultConfig,
    /// Plugin settings
    pub plugins: PluginConfig,
}

/// Vault settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    /// Default location for new notes
    pub new_file_location: NewFileLocation,
}

/// Plugin settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginConfig {
    /// Plugin data directory
    pub data_dir: Option<PathBuf>,
    /// Enabled plugin ids
    pub enabled: Vec<String>,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            enabled: vec!["daily-notes".to_string()],
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "dailynotes", "Dailynotes")
}

impl AppConfig {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from disk, defaulting when the file is missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to disk
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure config directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;

        tracing::info!("Saved config to: {}", path.display());
        Ok(())
    }

    /// Add a vault to recent vaults
    pub fn add_recent_vault(&mut self, path: PathBuf) {
        self.recent_vaults.retain(|p| p != &path);
        self.recent_vaults.insert(0, path);
        self.recent_vaults.truncate(MAX_RECENT_VAULTS);
    }

    /// Get the plugin data directory
    pub fn plugin_data_dir(&self) -> PathBuf {
        self.plugins.data_dir.clone().unwrap_or_else(|| {
            project_dirs()
                .map(|dirs| dirs.data_dir().join("plugins"))
                .unwrap_or_else(|| PathBuf::from("plugins"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.plugins.enabled, vec!["daily-notes"]);
        assert_eq!(config.vault.new_file_location, NewFileLocation::Root);
    }

    #[test]
    fn test_partial_file_merges_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"vault":{"new_file_location":"current_folder"}}"#).unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.vault.new_file_location, NewFileLocation::CurrentFolder);
        assert_eq!(config.plugins, PluginConfig::default());
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = AppConfig::default();
        config.last_vault = Some(PathBuf::from("/notes"));
        config.vault.new_file_location = NewFileLocation::Folder("Journal".to_string());
        config.save_to(&path).unwrap();

        assert_eq!(AppConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_recent_vaults_order_and_limit() {
        let mut config = AppConfig::default();
        for i in 0..12 {
            config.add_recent_vault(PathBuf::from(format!("/vault{i}")));
        }
        config.add_recent_vault(PathBuf::from("/vault5"));

        assert_eq!(config.recent_vaults.len(), MAX_RECENT_VAULTS);
        assert_eq!(config.recent_vaults[0], PathBuf::from("/vault5"));
        assert_eq!(config.recent_vaults[1], PathBuf::from("/vault11"));
        assert_eq!(config.recent_vaults.iter().filter(|p| p.ends_with("vault5")).count(), 1);
    }
}
