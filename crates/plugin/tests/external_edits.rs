//! Backing file changes made outside the plugin, picked up through a real
//! file watcher

mod common;

use common::{init_tracing, ms, FakeExplorer, FakeHost};
use decor_core::CONFIG_FILE_NAME;
use decor_plugin::{DecorationPlugin, DecorationStatus, HostEvent, MenuAction, PluginConfig, WatchMode};
use std::fs;
use std::time::{Duration, Instant};
use tempfile::TempDir;

type Plugin = DecorationPlugin<FakeHost, FakeExplorer>;

const PATIENCE: Duration = Duration::from_secs(5);

fn load(vault: &TempDir, mode: WatchMode) -> Plugin {
    init_tracing();
    let mut config = PluginConfig::default();
    config.watch.mode = mode;
    config.watch.poll_interval_ms = 50;

    let mut plugin = DecorationPlugin::onload(
        FakeHost::local(vault.path()),
        FakeExplorer::with_items(&["Notes/todo.md"]),
        config,
    );
    plugin.handle(HostEvent::LayoutReady, Instant::now());
    pump_until(&mut plugin, |p| p.renderer().applied >= 1);
    plugin
}

/// Pump the plugin until `done` holds; false on timeout
fn pump_until(plugin: &mut Plugin, done: impl Fn(&Plugin) -> bool) -> bool {
    let deadline = Instant::now() + PATIENCE;
    while Instant::now() < deadline {
        plugin.pump(ms(20));
        if done(plugin) {
            return true;
        }
    }
    false
}

/// Keep pumping for `period` regardless of state
fn pump_for(plugin: &mut Plugin, period: Duration) {
    let end = Instant::now() + period;
    while Instant::now() < end {
        plugin.pump(ms(20));
    }
}

#[test]
fn test_external_write_is_reloaded_and_painted() {
    let vault = TempDir::new().unwrap();
    let mut plugin = load(&vault, WatchMode::Native);
    let before = plugin.renderer().applied;

    fs::write(
        vault.path().join(CONFIG_FILE_NAME),
        r#"[["Notes/todo.md",2]]"#,
    )
    .unwrap();

    assert!(pump_until(&mut plugin, |p| {
        p.status("Notes/todo.md") == Some(DecorationStatus::Documented) && p.renderer().applied > before
    }));
    assert!(plugin
        .renderer()
        .classes("Notes/todo.md")
        .contains("decfile-color-color-green"));
}

#[test]
fn test_external_delete_clears_decorations() {
    let vault = TempDir::new().unwrap();
    fs::write(vault.path().join(CONFIG_FILE_NAME), r#"[["Notes/todo.md",0]]"#).unwrap();
    let mut plugin = load(&vault, WatchMode::Native);
    assert!(plugin
        .renderer()
        .classes("Notes/todo.md")
        .contains("decfile-color-color-red"));

    fs::remove_file(vault.path().join(CONFIG_FILE_NAME)).unwrap();

    assert!(pump_until(&mut plugin, |p| p.decorations().is_empty()));
    assert!(pump_until(&mut plugin, |p| {
        !p.renderer().classes("Notes/todo.md").contains("decfile-color")
    }));
}

#[test]
fn test_own_saves_do_not_trigger_reload() {
    let vault = TempDir::new().unwrap();
    let mut plugin = load(&vault, WatchMode::Native);
    let before = plugin.renderer().applied;

    plugin.handle(
        HostEvent::Assign {
            paths: vec!["Notes/todo.md".into()],
            action: MenuAction::Set(DecorationStatus::InProgress),
        },
        Instant::now(),
    );

    // Our own write comes back through the watcher; it must not cause a
    // second paint
    pump_for(&mut plugin, ms(500));
    assert_eq!(plugin.renderer().applied, before + 1);
    assert_eq!(plugin.status("Notes/todo.md"), Some(DecorationStatus::InProgress));
}

#[test]
fn test_poll_mode_sees_external_write() {
    let vault = TempDir::new().unwrap();
    let mut plugin = load(&vault, WatchMode::Poll);

    fs::write(
        vault.path().join(CONFIG_FILE_NAME),
        r#"[["Notes/todo.md",1]]"#,
    )
    .unwrap();

    assert!(pump_until(&mut plugin, |p| {
        p.renderer()
            .classes("Notes/todo.md")
            .contains("decfile-color-color-orange")
    }));
}

#[test]
fn test_unload_stops_watching() {
    let vault = TempDir::new().unwrap();
    let mut plugin = load(&vault, WatchMode::Native);
    plugin.onunload();

    fs::write(vault.path().join(CONFIG_FILE_NAME), r#"[["Notes/todo.md",2]]"#).unwrap();
    pump_for(&mut plugin, ms(200));

    assert_eq!(plugin.status("Notes/todo.md"), None);
}
