//! Plugin API definitions

use std::path::PathBuf;

use chrono::{DateTime, FixedOffset};
use thiserror::Error;

use crate::core::vault::{Vault, VaultError, Workspace};

/// Invocation source of the file explorer's context menu
pub const FILE_EXPLORER_CONTEXT_MENU: &str = "file-explorer-context-menu";

/// Errors surfaced by plugins and the plugin manager
#[derive(Debug, Error)]
pub enum PluginError {
    #[error("unknown plugin: {0}")]
    UnknownPlugin(String),
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("unknown setting: {0}")]
    UnknownSetting(String),
    #[error(transparent)]
    Vault(#[from] VaultError),
    #[error("plugin data error at {path}: {source}")]
    Data {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid plugin data: {0}")]
    Json(#[from] serde_json::Error),
}

/// Context provided to plugins
#[derive(Debug, Clone)]
pub struct PluginContext {
    /// Id of the plugin this context belongs to
    pub plugin_id: String,
    /// Plugin data directory
    pub data_dir: PathBuf,
    /// Current vault path
    pub vault_path: Option<PathBuf>,
}

impl PluginContext {
    /// Create a context for `plugin_id` under the shared plugins directory
    pub fn new(plugin_id: &str, plugins_dir: &std::path::Path, vault_path: Option<PathBuf>) -> Self {
        Self {
            plugin_id: plugin_id.to_string(),
            data_dir: plugins_dir.join(plugin_id),
            vault_path,
        }
    }

    /// File holding the plugin's persisted data
    pub fn data_file(&self) -> PathBuf {
        self.data_dir.join("data.json")
    }

    /// Load the plugin's persisted data, `None` if nothing was saved yet
    pub fn load_data(&self) -> Result<Option<serde_json::Value>, PluginError> {
        let path = self.data_file();
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(PluginError::Data { path, source }),
        }
    }

    /// Persist the plugin's data
    pub fn save_data(&self, data: &serde_json::Value) -> Result<(), PluginError> {
        let path = self.data_file();
        std::fs::create_dir_all(&self.data_dir).map_err(|source| PluginError::Data {
            path: self.data_dir.clone(),
            source,
        })?;

        let content = serde_json::to_string_pretty(data)?;
        std::fs::write(&path, content).map_err(|source| PluginError::Data {
            path: path.clone(),
            source,
        })?;

        tracing::debug!("Saved data for plugin {} to {}", self.plugin_id, path.display());
        Ok(())
    }
}

/// Host services available while a plugin handles a command
pub struct HostContext<'a> {
    /// Note collection
    pub vault: &'a mut dyn Vault,
    /// Editing surface
    pub workspace: &'a mut dyn Workspace,
    /// Invocation instant
    pub now: DateTime<FixedOffset>,
}

/// Plugin trait that all plugins must implement
pub trait Plugin: Send + Sync {
    /// Get the plugin id
    fn id(&self) -> &str;

    /// Get the plugin name
    fn name(&self) -> &str;

    /// Get the plugin version
    fn version(&self) -> &str;

    /// Get the plugin description
    fn description(&self) -> &str {
        ""
    }

    /// Called when the plugin is loaded
    fn on_load(&mut self, ctx: &PluginContext) -> Result<(), PluginError>;

    /// Called when the plugin is unloaded
    fn on_unload(&mut self) {}

    /// Get commands provided by this plugin
    fn commands(&self) -> Vec<PluginCommand> {
        Vec::new()
    }

    /// Handle a command from the user
    fn on_command(
        &mut self,
        command: &str,
        _args: &[String],
        _host: &mut HostContext<'_>,
    ) -> Result<Option<String>, PluginError> {
        Err(PluginError::UnknownCommand(command.to_string()))
    }

    /// Entries this plugin adds to a file menu opened on `target` from `source`
    fn file_menu(&self, _target: Option<&MenuTarget>, _source: &str) -> Vec<MenuItem> {
        Vec::new()
    }

    /// Settings exposed by this plugin
    fn setting_fields(&self) -> Vec<SettingField> {
        Vec::new()
    }

    /// Change a setting and persist it
    fn update_setting(
        &mut self,
        _ctx: &PluginContext,
        key: &str,
        _value: &str,
    ) -> Result<(), PluginError> {
        Err(PluginError::UnknownSetting(key.to_string()))
    }
}

/// A command provided by a plugin
#[derive(Debug, Clone)]
pub struct PluginCommand {
    /// Command id, unique within the plugin
    pub id: String,
    /// Command name
    pub name: String,
    /// Command usage
    pub usage: String,
}

impl PluginCommand {
    /// Create a new plugin command
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            usage: String::new(),
        }
    }

    /// Set command usage
    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = usage.into();
        self
    }
}

/// The file or folder a context menu was opened on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuTarget {
    /// Vault path of the target
    pub path: String,
    /// Whether the target is a folder
    pub is_folder: bool,
}

/// A context menu entry; activating it runs `command` with `args`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub title: String,
    pub icon: String,
    pub section: String,
    /// Fully qualified command (`plugin-id:command-id`)
    pub command: String,
    pub args: Vec<String>,
}

/// A single entry of a plugin's settings tab
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingField {
    pub key: String,
    pub name: String,
    pub description: String,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plugin_data_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = PluginContext::new("daily-notes", dir.path(), None);
        assert!(ctx.load_data().unwrap().is_none());

        let data = serde_json::json!({ "dateFormat": "DD.MM.YYYY" });
        ctx.save_data(&data).unwrap();

        assert_eq!(ctx.data_file(), dir.path().join("daily-notes").join("data.json"));
        assert_eq!(ctx.load_data().unwrap(), Some(data));
    }

    #[test]
    fn test_corrupt_data_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = PluginContext::new("daily-notes", dir.path(), None);
        std::fs::create_dir_all(&ctx.data_dir).unwrap();
        std::fs::write(ctx.data_file(), "{not json").unwrap();

        assert!(matches!(ctx.load_data(), Err(PluginError::Json(_))));
    }
}
