//! Daily notes plugin
//!
//! Creates a note named after the current date in a chosen folder and opens
//! it. An existing note for the day is opened as-is.

mod path;
mod settings;
#[cfg(test)]
pub(crate) mod testing;

pub use path::resolve_path;
pub use settings::{DailyNotesSettings, DEFAULT_DATE_FORMAT};

use crate::core::vault::{parent_folder, Vault, Workspace};

use super::api::{
    HostContext, MenuItem, MenuTarget, Plugin, PluginCommand, PluginContext, PluginError,
    SettingField, FILE_EXPLORER_CONTEXT_MENU,
};

pub const PLUGIN_ID: &str = "daily-notes";
pub const CREATE_COMMAND: &str = "create-daily-note";

const DATE_FORMAT_KEY: &str = "dateFormat";

/// Daily notes plugin state
#[derive(Debug, Default)]
pub struct DailyNotesPlugin {
    settings: DailyNotesSettings,
}

impl DailyNotesPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn settings(&self) -> &DailyNotesSettings {
        &self.settings
    }

    /// Create (or reopen) today's note in `folder`, or in the folder the vault
    /// picks for the active file. Returns the note's vault path.
    pub fn create_new_note(
        &self,
        folder: Option<&str>,
        host: &mut HostContext<'_>,
    ) -> Result<String, PluginError> {
        let active = host.workspace.active_file();
        let path = resolve_path(
            folder,
            active.as_deref(),
            &self.settings.date_format,
            &host.now,
            &*host.vault,
        );
        tracing::debug!("Daily note for {}: {}", host.now, path);

        ensure_and_open(&path, &mut *host.vault, &mut *host.workspace)?;
        Ok(path)
    }
}

/// Make sure a note exists at `path`, creating an empty one if needed, then
/// open it. Creation failures are returned without opening anything.
pub fn ensure_and_open(
    path: &str,
    vault: &mut dyn Vault,
    workspace: &mut dyn Workspace,
) -> Result<(), PluginError> {
    if vault.exists(path) {
        tracing::debug!("Daily note already exists: {}", path);
    } else {
        vault.create(path, "")?;
    }
    workspace.open(path);
    Ok(())
}

impl Plugin for DailyNotesPlugin {
    fn id(&self) -> &str {
        PLUGIN_ID
    }

    fn name(&self) -> &str {
        "Better Daily Notes"
    }

    fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }

    fn description(&self) -> &str {
        "Create a dated note in any folder and open it"
    }

    fn on_load(&mut self, ctx: &PluginContext) -> Result<(), PluginError> {
        self.settings = DailyNotesSettings::from_stored(ctx.load_data()?);
        tracing::debug!(vault = ?ctx.vault_path, "Loaded daily notes settings: {:?}", self.settings);
        Ok(())
    }

    fn commands(&self) -> Vec<PluginCommand> {
        vec![
            PluginCommand::new(CREATE_COMMAND, "Create new daily note to current folder")
                .with_usage("[folder]"),
        ]
    }

    fn on_command(
        &mut self,
        command: &str,
        args: &[String],
        host: &mut HostContext<'_>,
    ) -> Result<Option<String>, PluginError> {
        match command {
            CREATE_COMMAND => {
                let folder = args.first().map(String::as_str);
                self.create_new_note(folder, host).map(Some)
            }
            other => Err(PluginError::UnknownCommand(other.to_string())),
        }
    }

    fn file_menu(&self, target: Option<&MenuTarget>, source: &str) -> Vec<MenuItem> {
        let Some(target) = target else {
            return Vec::new();
        };
        if source != FILE_EXPLORER_CONTEXT_MENU {
            return Vec::new();
        }

        let folder = if target.is_folder {
            target.path.clone()
        } else {
            parent_folder(&target.path)
        };

        vec![MenuItem {
            title: "New daily note".to_string(),
            icon: "calendar-fold".to_string(),
            section: "action-primary".to_string(),
            command: format!("{PLUGIN_ID}:{CREATE_COMMAND}"),
            args: vec![folder],
        }]
    }

    fn setting_fields(&self) -> Vec<SettingField> {
        vec![SettingField {
            key: DATE_FORMAT_KEY.to_string(),
            name: "Date format".to_string(),
            description: "Syntax ref: https://momentjs.com/docs/#/displaying/format/".to_string(),
            value: self.settings.date_format.clone(),
        }]
    }

    fn update_setting(
        &mut self,
        ctx: &PluginContext,
        key: &str,
        value: &str,
    ) -> Result<(), PluginError> {
        match key {
            DATE_FORMAT_KEY => self.settings.date_format = value.to_string(),
            other => return Err(PluginError::UnknownSetting(other.to_string())),
        }

        ctx.save_data(&self.settings.to_stored()?)?;
        tracing::info!("Updated {} setting {} to {:?}", PLUGIN_ID, key, value);
        Ok(())
    }
}
