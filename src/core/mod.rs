//! Core functionality for vault access, date formatting, and configuration

pub mod config;
pub mod file_system;
pub mod moment;
pub mod vault;
