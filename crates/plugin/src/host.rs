//! Capabilities consumed from, and events received from, the host application

use decor_core::{DecorationMap, DecorationStatus};
use std::path::PathBuf;

/// Services the host application provides to the plugin
pub trait Host {
    /// Local directory holding per-vault data
    ///
    /// `None` when the vault is not backed by the local file system; the
    /// plugin then runs with decorations disabled.
    fn data_root(&self) -> Option<PathBuf>;

    /// Show a short notice to the user
    fn notify_user(&mut self, message: &str);
}

/// The host's file browser, as seen by the plugin
pub trait DecorationRenderer {
    /// Insert or replace the style element with the given id
    fn install_styles(&mut self, element_id: &str, css: &str);

    /// Remove the style element with the given id, if present
    fn remove_styles(&mut self, element_id: &str);

    /// Re-apply decoration classes to every visible file/folder entry
    fn apply_decorations(&mut self, decorations: &DecorationMap);
}

/// Events forwarded by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// The workspace finished its initial layout
    LayoutReady,
    /// Panes were opened, closed or rearranged
    LayoutChange,
    /// A file or folder was renamed or moved
    Rename { old_path: String, new_path: String },
    /// A file or folder was deleted
    Delete { path: String },
    /// The user picked a decoration menu entry for a selection
    Assign { paths: Vec<String>, action: MenuAction },
}

/// What a decoration menu entry does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    /// Decorate every target with this status
    Set(DecorationStatus),
    /// Remove decorations from every target
    Clear,
}
