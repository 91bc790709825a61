//! Host-facing side of Decor
//!
//! This crate provides:
//! - `DecorationPlugin`: load/unload lifecycle and host event handling
//! - `Host` / `DecorationRenderer`: capabilities the host supplies
//! - Context-menu model and the status → CSS class lookup table
//! - `PluginConfig` (TOML)

pub mod config;
pub mod host;
pub mod menu;
pub mod plugin;
pub mod style;

// Re-exports
pub use config::PluginConfig;
pub use host::{DecorationRenderer, Host, HostEvent, MenuAction};
pub use menu::{MenuEntry, MenuSource};
pub use plugin::DecorationPlugin;

pub use decor_core::{DecorationMap, DecorationStatus};
pub use decor_watcher::WatchMode;
