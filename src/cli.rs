use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand};

use crate::plugin::api::FILE_EXPLORER_CONTEXT_MENU;
use crate::plugin::daily_notes::PLUGIN_ID;

#[derive(Parser, Debug)]
#[command(name = "dailynotes")]
#[command(about = "Create and open dated daily notes in a markdown vault")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
    /// Vault directory (defaults to the last used vault, then the current directory)
    #[arg(long, global = true)]
    pub vault: Option<PathBuf>,

    /// Vault path of the note currently being edited
    #[arg(long, global = true)]
    pub active: Option<String>,

    /// Use this day instead of today (YYYY-MM-DD)
    #[arg(long, global = true)]
    pub date: Option<NaiveDate>,

    /// Also open notes with the system's default application
    #[arg(long, global = true)]
    pub launch: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand to execute. Creates today's note when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create today's note (or open it if it exists)
    New {
        /// Folder to create the note in, used verbatim
        #[arg(long)]
        folder: Option<String>,
    },
    /// Show the file explorer context menu for a file or folder
    Menu {
        /// Vault path the menu is opened on
        target: String,
        /// Invocation source reported to plugins
        #[arg(long, default_value = FILE_EXPLORER_CONTEXT_MENU)]
        source: String,
        /// Activate the entry with this number instead of listing
        #[arg(long)]
        activate: Option<usize>,
    },
    /// Run a plugin command (`plugin-id:command-id`)
    Run {
        /// Qualified command id
        command: String,
        /// Command arguments
        args: Vec<String>,
    },
    /// List plugin commands
    Commands,
    /// Show or change plugin settings
    Settings {
        /// Settings subcommand action.
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Remember a directory as the default vault
    Vault {
        /// Vault directory
        path: PathBuf,
    },
    /// List the markdown notes in the vault
    List,
}

/// Settings subcommands.
#[derive(Subcommand, Debug)]
pub enum SettingsAction {
    /// Print a plugin's settings
    Show {
        /// Plugin id
        #[arg(long, default_value = PLUGIN_ID)]
        plugin: String,
    },
    /// Change a plugin setting and persist it
    Set {
        /// Setting key (e.g. dateFormat)
        key: String,
        /// New value
        value: String,
        /// Plugin id
        #[arg(long, default_value = PLUGIN_ID)]
        plugin: String,
    },
}
