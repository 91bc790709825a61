//! Plugin lifecycle: wires host events, the decoration store, the backing
//! file watcher and the debounced display refresh together.
//!
//! Everything here runs on the host's event thread. The host calls
//! `handle` for each event and `poll` (or `pump`) from its loop; `poll`
//! returns the next instant it wants to be called again.

use crate::config::PluginConfig;
use crate::host::{DecorationRenderer, Host, HostEvent, MenuAction};
use crate::menu::{self, MenuEntry, MenuSource};
use crate::style::{self, STYLE_ELEMENT_ID};
use crossbeam_channel::Receiver;
use decor_core::{normalize_key, DecorationMap, DecorationStatus, DecorationStore, StoreError, StoreEvent};
use decor_watcher::{ConfigWatcher, Debouncer};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// A loaded plugin instance
pub struct DecorationPlugin<H: Host, R: DecorationRenderer> {
    host: H,
    renderer: R,
    config: PluginConfig,
    /// Resolved data root (None = decorations disabled)
    data_root: Option<PathBuf>,
    store: DecorationStore,
    store_events: Receiver<StoreEvent>,
    watcher: ConfigWatcher,
    refresh: Debouncer,
    /// Host finished initial layout; refreshes before this are dropped
    layout_ready: bool,
    /// A write failure has already been shown to the user
    write_failure_reported: bool,
    unloaded: bool,
}

impl<H: Host, R: DecorationRenderer> DecorationPlugin<H, R> {
    /// Load the plugin
    ///
    /// Never fails: an unresolvable data root or a watcher that cannot be
    /// started only degrade functionality.
    pub fn onload(host: H, renderer: R, config: PluginConfig) -> Self {
        let data_root = host.data_root();

        let mut store = match &data_root {
            Some(root) => DecorationStore::with_file_name(Some(root), &config.file_name),
            None => {
                warn!("{}; decorations disabled", StoreError::StorageUnavailable);
                DecorationStore::disabled()
            }
        };

        // Watch before reading so no external write can slip in between
        let watcher = match store.config_path() {
            Ok(path) => ConfigWatcher::start(path, config.watch_options()).unwrap_or_else(|e| {
                warn!("{:#}; external edits to decorations will not be picked up", e);
                ConfigWatcher::idle(path.to_path_buf())
            }),
            Err(_) => ConfigWatcher::idle(PathBuf::new()),
        };

        let outcome = store.load();
        info!("Decoration plugin loaded ({:?})", outcome);

        let store_events = store.subscribe();
        let refresh = config.debouncer();

        Self {
            host,
            renderer,
            config,
            data_root,
            store,
            store_events,
            watcher,
            refresh,
            layout_ready: false,
            write_failure_reported: false,
            unloaded: false,
        }
    }

    /// Unload the plugin: stop watching, drop pending refreshes and remove
    /// the injected styles. Later calls are no-ops.
    pub fn onunload(&mut self) {
        if self.unloaded {
            return;
        }

        self.watcher.stop();
        self.refresh.cancel();
        self.renderer.remove_styles(STYLE_ELEMENT_ID);
        self.unloaded = true;
        info!("Decoration plugin unloaded");
    }

    /// React to a host event
    pub fn handle(&mut self, event: HostEvent, now: Instant) {
        if self.unloaded {
            return;
        }

        match event {
            HostEvent::LayoutReady => {
                self.layout_ready = true;
                self.renderer.install_styles(STYLE_ELEMENT_ID, &style::style_sheet());
                if self.config.prune_on_layout_ready {
                    self.prune_missing();
                }
                self.request_refresh(now);
            }
            HostEvent::LayoutChange => self.request_refresh(now),
            HostEvent::Rename { old_path, new_path } => {
                if let (Some(old), Some(new)) = (key(&old_path), key(&new_path)) {
                    let result = self.store.rename_key(&old, &new);
                    self.report(result);
                }
            }
            HostEvent::Delete { path } => {
                if let Some(path) = key(&path) {
                    let result = self.store.remove(&path);
                    self.report(result);
                }
            }
            HostEvent::Assign { paths, action } => {
                let keys: Vec<String> = paths.iter().filter_map(|p| key(p)).collect();
                let result = match action {
                    MenuAction::Set(status) => self.store.set_many(&keys, status),
                    MenuAction::Clear => self.store.remove_many(&keys),
                };
                self.report(result);
            }
        }

        self.drain_store_events(now);
    }

    /// Process pending work and fire a due refresh
    ///
    /// Returns when the plugin next needs polling, if a refresh is pending.
    pub fn poll(&mut self, now: Instant) -> Option<Instant> {
        self.poll_with(now, 0)
    }

    /// Block until a backing-file event arrives, the pending refresh is
    /// due, or `timeout` elapses; then poll.
    pub fn pump(&mut self, timeout: Duration) -> Option<Instant> {
        if self.unloaded {
            return None;
        }

        let wait = match self.refresh.deadline() {
            Some(deadline) => deadline.saturating_duration_since(Instant::now()).min(timeout),
            None => timeout,
        };

        let woke = self.watcher.events().recv_timeout(wait).is_ok();
        self.poll_with(Instant::now(), usize::from(woke))
    }

    fn poll_with(&mut self, now: Instant, mut config_events: usize) -> Option<Instant> {
        if self.unloaded {
            return None;
        }

        // One reload per batch of notifications
        config_events += self.watcher.events().try_iter().count();
        if config_events > 0 {
            debug!("{} backing file events", config_events);
            let result = self.store.reload_if_changed();
            self.report(result);
        }

        self.drain_store_events(now);

        if self.refresh.poll(now) {
            self.refresh_now();
        }

        self.refresh.deadline()
    }

    /// Drop decorations whose path no longer exists under the data root
    pub fn prune_missing(&mut self) -> usize {
        let root = match &self.data_root {
            Some(root) => root.clone(),
            None => return 0,
        };

        let result = self.store.retain(|path, _| root.join(path).exists());
        let dropped = self.report(result).unwrap_or(0);
        if dropped > 0 {
            info!("Pruned {} decorations for missing paths", dropped);
        }
        dropped
    }

    /// Menu entries for a selection; empty when decorations are disabled
    pub fn menu_entries<S: AsRef<str>>(&self, paths: &[S], source: MenuSource<'_>) -> Vec<MenuEntry> {
        if !self.store.is_enabled() {
            return Vec::new();
        }

        let keys: Vec<String> = paths.iter().filter_map(|p| key(p.as_ref())).collect();
        menu::menu_entries(self.store.map(), keys.as_slice(), source)
    }

    /// Status lookup by host path
    pub fn status(&self, path: &str) -> Option<DecorationStatus> {
        key(path).and_then(|key| self.store.get(&key))
    }

    /// Every current decoration
    pub fn decorations(&self) -> &DecorationMap {
        self.store.map()
    }

    /// Whether decorations are persisted anywhere
    pub fn is_enabled(&self) -> bool {
        self.store.is_enabled()
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    fn drain_store_events(&mut self, now: Instant) {
        let changes = self.store_events.try_iter().count();
        if changes > 0 {
            debug!("{} decoration changes, scheduling refresh", changes);
            self.request_refresh(now);
        }
    }

    fn request_refresh(&mut self, now: Instant) {
        if self.refresh.trigger(now) {
            self.refresh_now();
        }
    }

    fn refresh_now(&mut self) {
        if !self.layout_ready {
            debug!("Layout not ready, skipping refresh");
            return;
        }

        debug!("Applying {} decorations", self.store.map().len());
        self.renderer.apply_decorations(self.store.map());
    }

    /// Log a store error; write failures are also shown to the user once
    fn report<T>(&mut self, result: Result<T, StoreError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                warn!("{}", err);
                if err.is_user_visible() && !self.write_failure_reported {
                    self.write_failure_reported = true;
                    self.host.notify_user(
                        "Decorations could not be saved to disk. Changes are kept until the app is closed.",
                    );
                }
                None
            }
        }
    }
}

/// Normalize a host path, logging paths that cannot be decoration keys
fn key(raw: &str) -> Option<String> {
    match normalize_key(raw) {
        Ok(key) => Some(key),
        Err(e) => {
            debug!("Ignoring path: {}", e);
            None
        }
    }
}
