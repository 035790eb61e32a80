//! Plugin API, built-in plugins, and the manager that hosts them

pub mod api;
pub mod daily_notes;
pub mod manager;
