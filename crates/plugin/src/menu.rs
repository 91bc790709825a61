//! Context-menu entries offered to the host

use crate::host::MenuAction;
use decor_core::{DecorationMap, DecorationStatus};

/// Menu section grouping the decoration entries
pub const MENU_SECTION: &str = "be-decoration";

/// Origin of multi-selection menus opened from the file explorer
pub const EXPLORER_CONTEXT_MENU: &str = "file-explorer-context-menu";

/// Where a menu was opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuSource<'a> {
    /// Menu for a single file or folder
    File,
    /// Menu for a multi-selection, tagged with the host's origin string
    Files { origin: &'a str },
}

/// One entry to render in the host menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub title: &'static str,
    pub icon: &'static str,
    pub section: &'static str,
    pub disabled: bool,
    pub action: MenuAction,
}

/// (status, title, icon)
const STATUS_ENTRIES: [(DecorationStatus, &str, &str); 3] = [
    (DecorationStatus::NotStarted, "Set not started", "x-circle"),
    (DecorationStatus::InProgress, "Set in progress", "circle"),
    (DecorationStatus::Documented, "Set documented", "check-circle-2"),
];

/// Entries for a menu over `targets`
///
/// Multi-selection menus only get entries when opened from the file
/// explorer. "Remove markings" is disabled unless a target is decorated.
pub fn menu_entries<S: AsRef<str>>(
    decorations: &DecorationMap,
    targets: &[S],
    source: MenuSource<'_>,
) -> Vec<MenuEntry> {
    if let MenuSource::Files { origin } = source {
        if origin != EXPLORER_CONTEXT_MENU {
            return Vec::new();
        }
    }

    let any_decorated = targets
        .iter()
        .any(|target| decorations.contains(target.as_ref()));

    let mut entries: Vec<MenuEntry> = STATUS_ENTRIES
        .iter()
        .map(|&(status, title, icon)| MenuEntry {
            title,
            icon,
            section: MENU_SECTION,
            disabled: false,
            action: MenuAction::Set(status),
        })
        .collect();

    entries.push(MenuEntry {
        title: "Remove markings",
        icon: "eraser",
        section: MENU_SECTION,
        disabled: !any_decorated,
        action: MenuAction::Clear,
    });

    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decorated() -> DecorationMap {
        [("a.md", DecorationStatus::Documented)].into_iter().collect()
    }

    #[test]
    fn test_entries_for_single_file() {
        let entries = menu_entries(&decorated(), &["a.md"], MenuSource::File);

        let titles: Vec<_> = entries.iter().map(|e| e.title).collect();
        assert_eq!(
            titles,
            vec!["Set not started", "Set in progress", "Set documented", "Remove markings"]
        );
        assert!(entries.iter().all(|e| e.section == MENU_SECTION));
        assert!(entries.iter().all(|e| !e.disabled));
        assert_eq!(entries[2].action, MenuAction::Set(DecorationStatus::Documented));
        assert_eq!(entries[3].action, MenuAction::Clear);
    }

    #[test]
    fn test_remove_disabled_when_nothing_decorated() {
        let entries = menu_entries(&decorated(), &["b.md", "c.md"], MenuSource::File);
        assert!(entries[3].disabled);
        assert!(!entries[0].disabled);
    }

    #[test]
    fn test_remove_enabled_when_any_target_decorated() {
        let source = MenuSource::Files {
            origin: EXPLORER_CONTEXT_MENU,
        };
        let entries = menu_entries(&decorated(), &["b.md", "a.md"], source);
        assert!(!entries[3].disabled);
    }

    #[test]
    fn test_multi_selection_outside_explorer_gets_nothing() {
        let source = MenuSource::Files { origin: "tab-header" };
        assert!(menu_entries(&decorated(), &["a.md"], source).is_empty());
    }
}
