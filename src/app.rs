//! Application state and command coordination

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, FixedOffset, Local, NaiveDate, TimeZone};

use crate::cli::{Command, SettingsAction};
use crate::core::config::AppConfig;
use crate::core::file_system::FsVault;
use crate::core::vault::{normalize, Workspace};
use crate::plugin::api::{HostContext, MenuItem, MenuTarget};
use crate::plugin::daily_notes::{CREATE_COMMAND, PLUGIN_ID};
use crate::plugin::manager::PluginManager;

/// Workspace that reports opened notes on stdout and can hand them to the
/// system opener
#[derive(Debug)]
pub struct CliWorkspace {
    root: PathBuf,
    active: Option<String>,
    launch: bool,
    /// Absolute paths of every note opened so far
    pub opened: Vec<PathBuf>,
}

impl CliWorkspace {
    pub fn new(root: PathBuf, active: Option<String>, launch: bool) -> Self {
        Self {
            root,
            active,
            launch,
            opened: Vec::new(),
        }
    }
}

impl Workspace for CliWorkspace {
    fn active_file(&self) -> Option<String> {
        self.active.clone()
    }

    fn open(&mut self, path: &str) {
        let absolute = match normalize(path) {
            Ok(relative) => self.root.join(relative),
            Err(e) => {
                tracing::error!("Cannot open {}: {}", path, e);
                return;
            }
        };

        println!("{}", absolute.display());
        if self.launch {
            if let Err(e) = open::that(&absolute) {
                tracing::error!("Failed to launch {}: {}", absolute.display(), e);
            }
        }
        self.opened.push(absolute);
    }
}

/// Main application state
pub struct DailyNotesApp {
    /// Application configuration
    pub config: AppConfig,
    /// Where the configuration is saved, if anywhere
    config_path: Option<PathBuf>,
    /// Current vault
    pub vault: FsVault,
    /// Editing surface
    pub workspace: CliWorkspace,
    /// Plugin manager
    pub plugin_manager: PluginManager,
    /// Day to use instead of today
    pub date: Option<NaiveDate>,
}

impl DailyNotesApp {
    /// Create a new application instance with the enabled plugins loaded
    pub fn new(
        config: AppConfig,
        config_path: Option<PathBuf>,
        vault_root: PathBuf,
        active: Option<String>,
        launch: bool,
    ) -> Self {
        let vault = FsVault::new(&vault_root, config.vault.new_file_location.clone());
        let workspace = CliWorkspace::new(vault_root.clone(), active, launch);

        let mut plugin_manager =
            PluginManager::with_builtin_plugins(config.plugin_data_dir(), Some(vault_root));
        plugin_manager.load_enabled(&config.plugins.enabled);

        Self {
            config,
            config_path,
            vault,
            workspace,
            plugin_manager,
            date: None,
        }
    }

    /// Invocation instant: now, or midnight of the requested day
    fn now(&self) -> Result<DateTime<FixedOffset>> {
        match self.date {
            None => Ok(Local::now().fixed_offset()),
            Some(date) => {
                let midnight = date.and_hms_opt(0, 0, 0).unwrap_or_default();
                Local
                    .from_local_datetime(&midnight)
                    .earliest()
                    .map(|d| d.fixed_offset())
                    .ok_or_else(|| anyhow!("{} has no local midnight", date))
            }
        }
    }

    /// Run a parsed CLI command
    pub fn run(&mut self, command: Command) -> Result<()> {
        match command {
            Command::New { folder } => {
                self.create_daily_note(folder)?;
            }
            Command::Menu {
                target,
                source,
                activate,
            } => {
                let items = self.menu_items(&target, &source);
                match activate {
                    Some(number) => {
                        let item = number
                            .checked_sub(1)
                            .and_then(|i| items.get(i))
                            .ok_or_else(|| anyhow!("No menu entry {}", number))?;
                        self.run_command(&item.command, &item.args)?;
                    }
                    None => {
                        for (i, item) in items.iter().enumerate() {
                            println!(
                                "{}. {} [{}, {}] -> {} {}",
                                i + 1,
                                item.title,
                                item.icon,
                                item.section,
                                item.command,
                                item.args.join(" ")
                            );
                        }
                    }
                }
            }
            Command::Run { command, args } => {
                if let Some(output) = self.run_command(&command, &args)? {
                    tracing::info!("{}: {}", command, output);
                }
            }
            Command::Commands => {
                for (id, name) in self.plugin_manager.loaded_plugins() {
                    println!("# {} ({})", name, id);
                }
                for (id, cmd) in self.plugin_manager.commands() {
                    println!("{} {}\t{}", id, cmd.usage, cmd.name);
                }
            }
            Command::Settings { action } => match action {
                SettingsAction::Show { plugin } => {
                    for field in self.plugin_manager.setting_fields(&plugin)? {
                        println!("{} = {:?}", field.key, field.value);
                        println!("    {}: {}", field.name, field.description);
                    }
                }
                SettingsAction::Set { key, value, plugin } => {
                    self.plugin_manager
                        .update_setting(&plugin, &key, &value)
                        .with_context(|| format!("Failed to update {}.{}", plugin, key))?;
                }
            },
            Command::Vault { path } => self.open_vault(path)?,
            Command::List => {
                for note in self.vault.markdown_files() {
                    println!("{}", note);
                }
            }
        }
        Ok(())
    }

    /// Create or open today's note, in `folder` when given
    pub fn create_daily_note(&mut self, folder: Option<String>) -> Result<Option<String>> {
        let args: Vec<String> = folder.into_iter().collect();
        self.run_command(&format!("{PLUGIN_ID}:{CREATE_COMMAND}"), &args)
            .context("Failed to create daily note")
    }

    /// Execute a qualified plugin command against this vault
    pub fn run_command(&mut self, command: &str, args: &[String]) -> Result<Option<String>> {
        let now = self.now()?;
        let mut host = HostContext {
            vault: &mut self.vault,
            workspace: &mut self.workspace,
            now,
        };
        Ok(self.plugin_manager.execute_command(command, args, &mut host)?)
    }

    /// Context menu entries for a vault path. Anything that is not an existing
    /// file is treated as a folder.
    pub fn menu_items(&self, target: &str, source: &str) -> Vec<MenuItem> {
        let is_file = self
            .vault
            .absolute(target)
            .map(|p| p.is_file())
            .unwrap_or(false);
        let target = MenuTarget {
            path: target.to_string(),
            is_folder: !is_file,
        };
        self.plugin_manager.file_menu(Some(&target), source)
    }

    /// Switch to a vault and remember it
    pub fn open_vault(&mut self, path: PathBuf) -> Result<()> {
        if !path.is_dir() {
            bail!("Not a directory: {}", path.display());
        }
        let path = path.canonicalize().unwrap_or(path);

        self.vault = FsVault::new(&path, self.config.vault.new_file_location.clone());
        self.workspace.root = path.clone();
        self.config.last_vault = Some(path.clone());
        self.config.add_recent_vault(path);

        if let Some(config_path) = &self.config_path {
            self.config.save_to(config_path)?;
        }
        Ok(())
    }

    /// Vault root directory
    pub fn vault_root(&self) -> &Path {
        self.vault.root()
    }

    /// Unload plugins before exit
    pub fn shutdown(&mut self) {
        self.plugin_manager.unload_all();
    }
}
