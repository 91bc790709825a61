//! On-disk decoration store
//!
//! Owns the in-memory `DecorationMap` and its backing file:
//! ```text
//! <data root>/
//!   decorations.txt      [["Notes/todo.md",1],...]
//! ```
//!
//! Every effective mutation is written through immediately and announced
//! to subscribers as a `StoreEvent`. When the data root is unknown the
//! store is disabled and every operation is a no-op.

use crate::hash::Fingerprint;
use crate::{DecorationMap, DecorationStatus, Result, StoreError};
use crossbeam_channel::{Receiver, Sender};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Default name of the backing file inside the data root
pub const CONFIG_FILE_NAME: &str = "decorations.txt";

/// Result of a `load()`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Store is disabled; nothing was read
    Disabled,
    /// No backing file yet; map is empty
    Missing,
    /// Backing file parsed
    Loaded { entries: usize },
    /// Backing file was not valid JSON pairs; map is empty
    Corrupt,
    /// Backing file could not be read; map is empty
    Unreadable,
}

/// What caused a map change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeCause {
    Set,
    Remove,
    Rename,
    Retain,
    /// The backing file was changed by someone else and re-read
    Reload,
}

/// "Map changed" notification sent to subscribers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreEvent {
    pub cause: ChangeCause,
}

/// Decoration store bound to a single backing file
pub struct DecorationStore {
    /// Backing file (None = storage unavailable)
    config_path: Option<PathBuf>,
    /// Current decorations
    map: DecorationMap,
    /// Fingerprint of the bytes last read or written
    fingerprint: Option<Fingerprint>,
    /// Change subscribers
    subscribers: Vec<Sender<StoreEvent>>,
}

impl DecorationStore {
    /// Bind a store to `decorations.txt` under the data root
    ///
    /// A `None` data root yields a disabled store. Nothing is read until
    /// `load()`.
    pub fn open(data_root: Option<&Path>) -> Self {
        Self::with_file_name(data_root, CONFIG_FILE_NAME)
    }

    /// Bind a store to a custom file name under the data root
    pub fn with_file_name(data_root: Option<&Path>, file_name: &str) -> Self {
        match data_root {
            Some(root) => Self {
                config_path: Some(root.join(file_name)),
                map: DecorationMap::new(),
                fingerprint: None,
                subscribers: Vec::new(),
            },
            None => Self::disabled(),
        }
    }

    /// A store whose operations are all no-ops
    pub fn disabled() -> Self {
        Self {
            config_path: None,
            map: DecorationMap::new(),
            fingerprint: None,
            subscribers: Vec::new(),
        }
    }

    /// Whether the store has somewhere to persist to
    pub fn is_enabled(&self) -> bool {
        self.config_path.is_some()
    }

    /// Path of the backing file
    pub fn config_path(&self) -> Result<&Path> {
        self.config_path
            .as_deref()
            .ok_or(StoreError::StorageUnavailable)
    }

    /// Current decorations
    pub fn map(&self) -> &DecorationMap {
        &self.map
    }

    /// Status lookup by path
    pub fn get(&self, path: &str) -> Option<DecorationStatus> {
        self.map.get(path)
    }

    /// Fingerprint of the bytes last read or written
    pub fn fingerprint(&self) -> Option<Fingerprint> {
        self.fingerprint
    }

    /// Subscribe to "map changed" events
    pub fn subscribe(&mut self) -> Receiver<StoreEvent> {
        let (tx, rx) = crossbeam_channel::unbounded();
        self.subscribers.push(tx);
        rx
    }

    /// Replace the map with the contents of the backing file
    ///
    /// Never fails: a missing file gives an empty map, unreadable or
    /// malformed content is logged and also gives an empty map.
    pub fn load(&mut self) -> LoadOutcome {
        let path = match &self.config_path {
            Some(path) => path.clone(),
            None => return LoadOutcome::Disabled,
        };

        match read_config(&path) {
            Ok(None) => {
                self.map.clear();
                self.fingerprint = None;
                debug!("No decoration config at {}, starting empty", path.display());
                LoadOutcome::Missing
            }
            Ok(Some(bytes)) => {
                self.fingerprint = Some(Fingerprint::of(&bytes));
                self.decode(&path, &bytes)
            }
            Err(e) => {
                warn!("{}; starting with no decorations", e);
                self.map.clear();
                self.fingerprint = None;
                LoadOutcome::Unreadable
            }
        }
    }

    /// Write the whole map to the backing file
    pub fn save(&mut self) -> Result<()> {
        let path = match &self.config_path {
            Some(path) => path,
            None => return Ok(()),
        };

        let write_failure = |source: io::Error| StoreError::WriteFailure {
            path: path.clone(),
            source,
        };

        let json = self.map.to_json().map_err(|e| write_failure(e.into()))?;
        atomic_write(path, json.as_bytes()).map_err(write_failure)?;

        let fingerprint = Fingerprint::of(json.as_bytes());
        debug!(
            "Saved {} decorations to {} ({})",
            self.map.len(),
            path.display(),
            fingerprint.short()
        );
        self.fingerprint = Some(fingerprint);
        Ok(())
    }

    /// Insert or overwrite the status for a path
    pub fn set(&mut self, path: &str, status: DecorationStatus) -> Result<()> {
        self.set_many([path], status).map(|_| ())
    }

    /// Set the same status on several paths, saving once
    ///
    /// Returns how many entries actually changed.
    pub fn set_many<I, S>(&mut self, paths: I, status: DecorationStatus) -> Result<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if !self.is_enabled() {
            return Ok(0);
        }

        let mut changed = 0;
        for path in paths {
            let path = path.as_ref();
            if self.map.insert(path, status) != Some(status) {
                debug!("Decorated {} as {}", path, status);
                changed += 1;
            }
        }

        self.commit(changed, ChangeCause::Set)
    }

    /// Remove a path's decoration; returns whether one existed
    pub fn remove(&mut self, path: &str) -> Result<bool> {
        self.remove_many([path]).map(|removed| removed > 0)
    }

    /// Remove several decorations, saving once
    pub fn remove_many<I, S>(&mut self, paths: I) -> Result<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if !self.is_enabled() {
            return Ok(0);
        }

        let mut removed = 0;
        for path in paths {
            let path = path.as_ref();
            if self.map.remove(path).is_some() {
                debug!("Removed decoration from {}", path);
                removed += 1;
            }
        }

        self.commit(removed, ChangeCause::Remove)
    }

    /// Move the decoration at `old` to `new`
    ///
    /// Overwrites any entry at `new`. No-op when `old` is not decorated.
    pub fn rename_key(&mut self, old: &str, new: &str) -> Result<bool> {
        if !self.is_enabled() || !self.map.rename(old, new) {
            return Ok(false);
        }

        debug!("Moved decoration {} -> {}", old, new);
        self.commit(1, ChangeCause::Rename).map(|_| true)
    }

    /// Drop every decoration whose path fails `keep`, saving once
    pub fn retain<F>(&mut self, keep: F) -> Result<usize>
    where
        F: FnMut(&str, DecorationStatus) -> bool,
    {
        if !self.is_enabled() {
            return Ok(0);
        }

        let dropped = self.map.retain(keep);
        self.commit(dropped, ChangeCause::Retain)
    }

    /// Re-read the backing file if someone else changed it
    ///
    /// Content matching the last fingerprint (our own save, or a touch that
    /// kept the bytes) is ignored. Returns whether the map was replaced.
    pub fn reload_if_changed(&mut self) -> Result<bool> {
        let path = match &self.config_path {
            Some(path) => path.clone(),
            None => return Ok(false),
        };

        let bytes = read_config(&path)?;
        let fingerprint = bytes.as_deref().map(Fingerprint::of);
        if fingerprint == self.fingerprint {
            debug!("Decoration config unchanged, skipping reload");
            return Ok(false);
        }

        match bytes {
            Some(bytes) => {
                self.fingerprint = fingerprint;
                self.decode(&path, &bytes);
            }
            None => {
                self.fingerprint = None;
                self.map.clear();
            }
        }

        info!("Decoration config changed externally, reloaded {} entries", self.map.len());
        self.notify(ChangeCause::Reload);
        Ok(true)
    }

    /// Parse file bytes into the map, failing soft on corruption
    fn decode(&mut self, path: &Path, bytes: &[u8]) -> LoadOutcome {
        match DecorationMap::from_json_bytes(bytes) {
            Ok(map) => {
                self.map = map;
                info!("Loaded {} decorations from {}", self.map.len(), path.display());
                LoadOutcome::Loaded {
                    entries: self.map.len(),
                }
            }
            Err(source) => {
                let err = StoreError::CorruptConfig {
                    path: path.to_path_buf(),
                    source,
                };
                warn!("{}; starting with no decorations", err);
                self.map.clear();
                LoadOutcome::Corrupt
            }
        }
    }

    /// Persist and announce a mutation that touched `count` entries
    fn commit(&mut self, count: usize, cause: ChangeCause) -> Result<usize> {
        if count == 0 {
            return Ok(0);
        }

        // The in-memory map stays authoritative even if the write fails
        let saved = self.save();
        self.notify(cause);
        saved.map(|_| count)
    }

    fn notify(&mut self, cause: ChangeCause) {
        let event = StoreEvent { cause };
        self.subscribers.retain(|tx| tx.send(event).is_ok());
    }
}

/// Read the backing file, treating absence as `None`
fn read_config(path: &Path) -> Result<Option<Vec<u8>>> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(StoreError::ReadFailure {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Atomic write helper
///
/// Writes data to a temporary file next to the target, fsyncs it, then
/// renames it over the target.
pub fn atomic_write(target: &Path, data: &[u8]) -> io::Result<()> {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(".decorations-")
        .suffix(".tmp")
        .tempfile_in(dir)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    tmp.persist(target).map_err(|e| e.error)?;
    Ok(())
}
