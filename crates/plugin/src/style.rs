//! Status → CSS class lookup and the injected style sheet

use decor_core::DecorationStatus;

/// Id of the `<style>` element the plugin owns
pub const STYLE_ELEMENT_ID: &str = "beDecorationStyles";

/// Every class the plugin manages starts with this
pub const CLASS_PREFIX: &str = "decfile-color";

/// Classes added to every decorated entry
pub const DECORATED_CLASSES: [&str; 2] = ["decfile-color-file", "decfile-color-type-text"];

/// Host path of the vault root, which is never decorated
pub const ROOT_PATH: &str = "/";

struct StatusStyle {
    class: &'static str,
    palette_var: &'static str,
}

/// Indexed by `DecorationStatus::index()`
const STATUS_STYLES: [StatusStyle; 3] = [
    StatusStyle {
        class: "decfile-color-color-red",
        palette_var: "--color-red",
    },
    StatusStyle {
        class: "decfile-color-color-orange",
        palette_var: "--color-orange",
    },
    StatusStyle {
        class: "decfile-color-color-green",
        palette_var: "--color-green",
    },
];

/// CSS class carrying a status's color
pub fn style_class(status: DecorationStatus) -> &'static str {
    STATUS_STYLES[status.index()].class
}

/// Style sheet mapping each status class to the host palette
pub fn style_sheet() -> String {
    DecorationStatus::ALL
        .iter()
        .map(|status| {
            let style = &STATUS_STYLES[status.index()];
            format!(
                ".{} {{ --decfile-color-color: var({}); }}",
                style.class, style.palette_var
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Recompute an entry's class list
///
/// Strips every plugin class from `existing`, then adds the decoration
/// classes when `status` is set. The vault root is returned unchanged.
pub fn restyle_classes(existing: &str, path: &str, status: Option<DecorationStatus>) -> String {
    if path == ROOT_PATH {
        return existing.to_string();
    }

    let mut classes: Vec<&str> = existing
        .split_whitespace()
        .filter(|class| !class.starts_with(CLASS_PREFIX))
        .collect();

    if let Some(status) = status {
        classes.extend(DECORATED_CLASSES);
        classes.push(style_class(status));
    }

    classes.join(" ")
}
