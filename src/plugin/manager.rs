//! Plugin manager for loading and managing plugins

use std::path::PathBuf;

use super::api::{
    HostContext, MenuItem, MenuTarget, Plugin, PluginCommand, PluginContext, PluginError,
    SettingField,
};
use super::daily_notes::DailyNotesPlugin;

/// A registered plugin with its context
struct RegisteredPlugin {
    plugin: Box<dyn Plugin>,
    context: PluginContext,
    loaded: bool,
}

/// Plugin manager
pub struct PluginManager {
    /// Registered plugins, in registration order
    plugins: Vec<RegisteredPlugin>,
    /// Directory holding every plugin's data directory
    plugins_dir: PathBuf,
    /// Current vault path
    vault_path: Option<PathBuf>,
}

impl PluginManager {
    /// Create a new plugin manager
    pub fn new(plugins_dir: PathBuf, vault_path: Option<PathBuf>) -> Self {
        Self {
            plugins: Vec::new(),
            plugins_dir,
            vault_path,
        }
    }

    /// Create a manager with every built-in plugin registered
    pub fn with_builtin_plugins(plugins_dir: PathBuf, vault_path: Option<PathBuf>) -> Self {
        let mut manager = Self::new(plugins_dir, vault_path);
        manager.register(Box::new(DailyNotesPlugin::new()));
        manager
    }

    /// Register a plugin without loading it
    pub fn register(&mut self, plugin: Box<dyn Plugin>) {
        let context = PluginContext::new(plugin.id(), &self.plugins_dir, self.vault_path.clone());
        tracing::debug!("Registered plugin: {} v{}", plugin.id(), plugin.version());
        self.plugins.push(RegisteredPlugin {
            plugin,
            context,
            loaded: false,
        });
    }

    /// Load every registered plugin whose id is in `enabled`. Failures are
    /// logged and leave that plugin unloaded.
    pub fn load_enabled(&mut self, enabled: &[String]) {
        for id in enabled {
            if let Err(e) = self.enable_plugin(id) {
                tracing::error!("Failed to load plugin {}: {}", id, e);
            }
        }
        tracing::info!("Loaded {} plugins", self.plugin_count());
    }

    /// Load a plugin
    pub fn enable_plugin(&mut self, id: &str) -> Result<(), PluginError> {
        let entry = self
            .plugins
            .iter_mut()
            .find(|p| p.plugin.id() == id)
            .ok_or_else(|| PluginError::UnknownPlugin(id.to_string()))?;

        if entry.loaded {
            return Ok(());
        }

        entry.plugin.on_load(&entry.context)?;
        entry.loaded = true;
        tracing::info!("Loaded plugin: {} v{}", entry.plugin.name(), entry.plugin.version());
        Ok(())
    }

    /// Unload every loaded plugin
    pub fn unload_all(&mut self) {
        for entry in self.plugins.iter_mut().filter(|p| p.loaded) {
            entry.plugin.on_unload();
            entry.loaded = false;
            tracing::debug!("Unloaded plugin: {}", entry.plugin.id());
        }
    }

    fn loaded(&self) -> impl Iterator<Item = &RegisteredPlugin> {
        self.plugins.iter().filter(|p| p.loaded)
    }

    fn loaded_mut(&mut self, id: &str) -> Result<&mut RegisteredPlugin, PluginError> {
        self.plugins
            .iter_mut()
            .find(|p| p.loaded && p.plugin.id() == id)
            .ok_or_else(|| PluginError::UnknownPlugin(id.to_string()))
    }

    /// Ids and names of loaded plugins
    pub fn loaded_plugins(&self) -> Vec<(&str, &str)> {
        self.loaded()
            .map(|p| (p.plugin.id(), p.plugin.name()))
            .collect()
    }

    /// Commands of all loaded plugins, keyed by `plugin-id:command-id`
    pub fn commands(&self) -> Vec<(String, PluginCommand)> {
        self.loaded()
            .flat_map(|p| {
                p.plugin
                    .commands()
                    .into_iter()
                    .map(move |cmd| (format!("{}:{}", p.plugin.id(), cmd.id), cmd))
            })
            .collect()
    }

    /// Execute a plugin command given as `plugin-id:command-id`
    pub fn execute_command(
        &mut self,
        command: &str,
        args: &[String],
        host: &mut HostContext<'_>,
    ) -> Result<Option<String>, PluginError> {
        let (plugin_id, command_id) = command
            .split_once(':')
            .ok_or_else(|| PluginError::UnknownCommand(command.to_string()))?;

        tracing::debug!("Executing command {} in plugin {}", command_id, plugin_id);
        let entry = self.loaded_mut(plugin_id)?;
        entry.plugin.on_command(command_id, args, host)
    }

    /// Menu entries every loaded plugin contributes for `target` opened from `source`
    pub fn file_menu(&self, target: Option<&MenuTarget>, source: &str) -> Vec<MenuItem> {
        self.loaded()
            .flat_map(|p| p.plugin.file_menu(target, source))
            .collect()
    }

    /// Settings of a loaded plugin
    pub fn setting_fields(&self, plugin_id: &str) -> Result<Vec<SettingField>, PluginError> {
        self.loaded()
            .find(|p| p.plugin.id() == plugin_id)
            .map(|p| p.plugin.setting_fields())
            .ok_or_else(|| PluginError::UnknownPlugin(plugin_id.to_string()))
    }

    /// Change and persist a setting of a loaded plugin
    pub fn update_setting(
        &mut self,
        plugin_id: &str,
        key: &str,
        value: &str,
    ) -> Result<(), PluginError> {
        let entry = self.loaded_mut(plugin_id)?;
        entry.plugin.update_setting(&entry.context, key, value)
    }

    /// Get loaded plugin count
    pub fn plugin_count(&self) -> usize {
        self.loaded().count()
    }
}
