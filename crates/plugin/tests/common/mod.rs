//! Common fakes for plugin integration tests
//!
//! `FakeHost` stands in for the host application and `FakeExplorer` for
//! its file browser, keeping per-entry class lists the way the real DOM
//! would.

#![allow(dead_code)]

use decor_plugin::style::restyle_classes;
use decor_plugin::{DecorationMap, DecorationRenderer, Host, PluginConfig, WatchMode};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::time::{Duration, Instant};

static TRACING: Once = Once::new();

/// Route plugin logs to the test output
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    });
}

/// Host with a configurable data root that records user notices
pub struct FakeHost {
    pub root: Option<PathBuf>,
    pub notices: Vec<String>,
}

impl FakeHost {
    pub fn local(root: &Path) -> Self {
        Self {
            root: Some(root.to_path_buf()),
            notices: Vec::new(),
        }
    }

    /// A vault on a non-local adapter
    pub fn remote() -> Self {
        Self {
            root: None,
            notices: Vec::new(),
        }
    }
}

impl Host for FakeHost {
    fn data_root(&self) -> Option<PathBuf> {
        self.root.clone()
    }

    fn notify_user(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }
}

/// File browser with one class list per visible entry
#[derive(Default)]
pub struct FakeExplorer {
    /// path -> class attribute
    pub items: BTreeMap<String, String>,
    /// style element id -> css
    pub styles: BTreeMap<String, String>,
    /// Number of `apply_decorations` calls
    pub applied: usize,
}

impl FakeExplorer {
    pub fn with_items(paths: &[&str]) -> Self {
        let mut explorer = Self::default();
        explorer.items.insert("/".to_string(), "tree-item nav-folder mod-root".to_string());
        for path in paths {
            explorer.items.insert(path.to_string(), "tree-item nav-file".to_string());
        }
        explorer
    }

    pub fn classes(&self, path: &str) -> &str {
        self.items.get(path).map(String::as_str).unwrap_or("")
    }
}

impl DecorationRenderer for FakeExplorer {
    fn install_styles(&mut self, element_id: &str, css: &str) {
        self.styles.insert(element_id.to_string(), css.to_string());
    }

    fn remove_styles(&mut self, element_id: &str) {
        self.styles.remove(element_id);
    }

    fn apply_decorations(&mut self, decorations: &DecorationMap) {
        self.applied += 1;
        for (path, classes) in self.items.iter_mut() {
            *classes = restyle_classes(classes, path, decorations.get(path));
        }
    }
}

/// Config with watching off, so tests drive time explicitly
pub fn quiet_config() -> PluginConfig {
    let mut config = PluginConfig::default();
    config.watch.mode = WatchMode::Off;
    config
}

pub fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// An instant far enough past any debounce window opened at `t`
pub fn settled(t: Instant) -> Instant {
    t + ms(1000)
}
