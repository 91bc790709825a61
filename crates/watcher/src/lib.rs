//! Backing-file watching for Decor
//!
//! This crate provides:
//! - `ConfigWatcher`: native or polling notification of changes to
//!   `decorations.txt` made outside the store (manual edits, sync clients)
//! - `Debouncer`: leading/trailing coalescing of refresh triggers

pub mod debounce;

pub use debounce::Debouncer;

use anyhow::{Context, Result};
use crossbeam_channel::{Receiver, Sender};
use notify::event::{ModifyKind, RenameMode};
use notify::{EventKind, PollWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// How changes to the backing file are detected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatchMode {
    /// Platform notification backend (inotify, FSEvents, ReadDirectoryChangesW)
    Native,
    /// Periodic metadata scan
    Poll,
    /// Do not watch
    Off,
}

impl Default for WatchMode {
    fn default() -> Self {
        WatchMode::Native
    }
}

/// Watcher options
#[derive(Debug, Clone, Copy)]
pub struct WatchOptions {
    pub mode: WatchMode,
    /// Scan interval for `WatchMode::Poll`
    pub poll_interval: Duration,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            mode: WatchMode::Native,
            poll_interval: Duration::from_secs(1),
        }
    }
}

/// A change to the backing file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigEvent {
    /// Path reported by the backend
    pub path: PathBuf,
    /// Type of change
    pub kind: ConfigEventKind,
}

/// Type of backing-file change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigEventKind {
    /// File appeared (created, or renamed into place)
    Created,
    /// File contents or metadata changed
    Modified,
    /// File disappeared (deleted, or renamed away)
    Removed,
}

/// Watches the directory holding the backing file and reports events for
/// that file only
///
/// The directory is watched rather than the file itself so that creation,
/// replacement by rename and deletion are all observed.
pub struct ConfigWatcher {
    /// File being watched
    config_path: PathBuf,
    /// Live notify backend (None when stopped or mode is Off)
    backend: Option<Box<dyn Watcher + Send>>,
    /// Filtered events
    events: Receiver<ConfigEvent>,
}

impl ConfigWatcher {
    /// Start watching `config_path`
    pub fn start(config_path: &Path, options: WatchOptions) -> Result<Self> {
        let config_path = config_path.to_path_buf();

        if options.mode == WatchMode::Off {
            debug!("Config watching disabled for {}", config_path.display());
            return Ok(Self::idle(config_path));
        }

        let dir = config_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .context("Config path has no parent directory")?
            .to_path_buf();
        let file_name = config_path
            .file_name()
            .context("Config path has no file name")?
            .to_os_string();

        let (tx, rx) = crossbeam_channel::unbounded();
        let handler = move |res: notify::Result<notify::Event>| match res {
            Ok(event) => forward_event(&file_name, event, &tx),
            Err(e) => warn!("Config watcher error: {}", e),
        };

        let mut backend: Box<dyn Watcher + Send> = match options.mode {
            WatchMode::Poll => {
                let config = notify::Config::default().with_poll_interval(options.poll_interval);
                Box::new(PollWatcher::new(handler, config).context("Failed to create poll watcher")?)
            }
            _ => Box::new(
                notify::recommended_watcher(handler).context("Failed to create file watcher")?,
            ),
        };

        backend
            .watch(&dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch {}", dir.display()))?;

        info!(
            "Watching {} ({:?})",
            config_path.display(),
            options.mode
        );

        Ok(Self {
            config_path,
            backend: Some(backend),
            events: rx,
        })
    }

    /// A watcher that never reports anything
    pub fn idle(config_path: PathBuf) -> Self {
        Self {
            config_path,
            backend: None,
            events: crossbeam_channel::never(),
        }
    }

    /// Receiver of backing-file events
    pub fn events(&self) -> &Receiver<ConfigEvent> {
        &self.events
    }

    /// Whether a backend is running
    pub fn is_active(&self) -> bool {
        self.backend.is_some()
    }

    /// File being watched
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Stop watching; later calls are no-ops
    pub fn stop(&mut self) {
        if self.backend.take().is_some() {
            info!("Stopped watching {}", self.config_path.display());
        }
        self.events = crossbeam_channel::never();
    }
}

/// Translate a notify event into zero or more `ConfigEvent`s for our file
fn forward_event(file_name: &OsString, event: notify::Event, tx: &Sender<ConfigEvent>) {
    for (index, path) in event.paths.iter().enumerate() {
        if path.file_name() != Some(file_name.as_os_str()) {
            continue;
        }

        let kind = match classify(&event.kind, index) {
            Some(kind) => kind,
            None => continue,
        };

        debug!("Config event {:?} for {}", kind, path.display());
        // Receiver gone means the watcher is being torn down
        let _ = tx.send(ConfigEvent {
            path: path.clone(),
            kind,
        });
    }
}

/// Map a notify event kind to ours; `index` is the path's position in the event
fn classify(kind: &EventKind, index: usize) -> Option<ConfigEventKind> {
    match kind {
        EventKind::Access(_) => None,
        EventKind::Create(_) => Some(ConfigEventKind::Created),
        EventKind::Remove(_) => Some(ConfigEventKind::Removed),
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => Some(ConfigEventKind::Removed),
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => Some(ConfigEventKind::Created),
        // Both: paths are [from, to]
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => Some(if index == 0 {
            ConfigEventKind::Removed
        } else {
            ConfigEventKind::Created
        }),
        EventKind::Modify(_) | EventKind::Any | EventKind::Other => Some(ConfigEventKind::Modified),
    }
}
