//! Plugin configuration
//!
//! Loaded from a TOML file chosen by the host. Every field has a default,
//! so a missing file or a partial file is fine:
//!
//! ```toml
//! file_name = "decorations.txt"
//! prune_on_layout_ready = false
//!
//! [refresh]
//! debounce_ms = 50
//! max_wait_ms = 250
//! leading_edge = false
//!
//! [watch]
//! mode = "native"   # native | poll | off
//! poll_interval_ms = 1000
//! ```

use anyhow::{Context, Result};
use decor_core::CONFIG_FILE_NAME;
use decor_watcher::{Debouncer, WatchMode, WatchOptions};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Top-level plugin configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PluginConfig {
    /// Name of the decoration file inside the data root
    #[serde(default = "default_file_name")]
    pub file_name: String,

    /// Drop decorations for paths that no longer exist when layout is ready
    #[serde(default)]
    pub prune_on_layout_ready: bool,

    /// Refresh debouncing
    #[serde(default)]
    pub refresh: RefreshConfig,

    /// External change detection
    #[serde(default)]
    pub watch: WatchConfig,
}

/// Refresh debounce settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RefreshConfig {
    /// Quiet period before a refresh runs (default: 50)
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Longest a continuous burst may defer a refresh (default: 250)
    #[serde(default = "default_max_wait_ms")]
    pub max_wait_ms: u64,

    /// Also refresh on the first trigger of a burst (default: false)
    #[serde(default)]
    pub leading_edge: bool,
}

/// Backing-file watch settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchConfig {
    #[serde(default)]
    pub mode: WatchMode,

    /// Scan interval when `mode = "poll"` (default: 1000)
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_file_name() -> String {
    CONFIG_FILE_NAME.to_string()
}
fn default_debounce_ms() -> u64 {
    50
}
fn default_max_wait_ms() -> u64 {
    250
}
fn default_poll_interval_ms() -> u64 {
    1000
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            file_name: default_file_name(),
            prune_on_layout_ready: false,
            refresh: RefreshConfig::default(),
            watch: WatchConfig::default(),
        }
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            max_wait_ms: default_max_wait_ms(),
            leading_edge: false,
        }
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            mode: WatchMode::default(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl PluginConfig {
    /// Load from a TOML file; a missing file yields defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read plugin config {}", path.display()))?;
        Self::from_toml_str(&text)
            .with_context(|| format!("Invalid plugin config {}", path.display()))
    }

    /// Parse and validate TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).context("Failed to parse plugin config")?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.file_name.is_empty()
            || self.file_name.contains(|c: char| c == '/' || c == '\\')
            || self.file_name == "."
            || self.file_name == ".."
        {
            anyhow::bail!("file_name must be a bare file name, got {:?}", self.file_name);
        }

        if !(1..=5000).contains(&self.refresh.debounce_ms) {
            anyhow::bail!(
                "refresh.debounce_ms must be 1-5000, got {}",
                self.refresh.debounce_ms
            );
        }

        if self.refresh.max_wait_ms < self.refresh.debounce_ms {
            anyhow::bail!(
                "refresh.max_wait_ms ({}) must not be below refresh.debounce_ms ({})",
                self.refresh.max_wait_ms,
                self.refresh.debounce_ms
            );
        }

        if !(10..=60_000).contains(&self.watch.poll_interval_ms) {
            anyhow::bail!(
                "watch.poll_interval_ms must be 10-60000, got {}",
                self.watch.poll_interval_ms
            );
        }

        Ok(())
    }

    /// Debouncer for display refreshes
    pub fn debouncer(&self) -> Debouncer {
        Debouncer::new(Duration::from_millis(self.refresh.debounce_ms))
            .with_max_wait(Duration::from_millis(self.refresh.max_wait_ms))
            .with_leading_edge(self.refresh.leading_edge)
    }

    /// Options for the backing-file watcher
    pub fn watch_options(&self) -> WatchOptions {
        WatchOptions {
            mode: self.watch.mode,
            poll_interval: Duration::from_millis(self.watch.poll_interval_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = PluginConfig::load(&temp_dir.path().join("decor.toml")).unwrap();

        assert_eq!(config, PluginConfig::default());
        assert_eq!(config.file_name, "decorations.txt");
        assert_eq!(config.refresh.debounce_ms, 50);
        assert_eq!(config.watch.mode, WatchMode::Native);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config = PluginConfig::from_toml_str(
            r#"
            [watch]
            mode = "poll"
            poll_interval_ms = 200
            "#,
        )
        .unwrap();

        assert_eq!(config.watch.mode, WatchMode::Poll);
        assert_eq!(config.watch_options().poll_interval, Duration::from_millis(200));
        assert_eq!(config.refresh, RefreshConfig::default());
        assert!(!config.prune_on_layout_ready);
    }

    #[test]
    fn test_load_reads_file() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("decor.toml");
        fs::write(
            &path,
            "file_name = \"status.json\"\nprune_on_layout_ready = true\n[refresh]\nleading_edge = true\n",
        )?;

        let config = PluginConfig::load(&path)?;
        assert_eq!(config.file_name, "status.json");
        assert!(config.prune_on_layout_ready);
        assert!(config.refresh.leading_edge);
        Ok(())
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(PluginConfig::from_toml_str("file_name = \"sub/dir.txt\"").is_err());
        assert!(PluginConfig::from_toml_str("file_name = \"\"").is_err());
        assert!(PluginConfig::from_toml_str("[refresh]\ndebounce_ms = 0").is_err());
        assert!(PluginConfig::from_toml_str("[refresh]\ndebounce_ms = 100\nmax_wait_ms = 50").is_err());
        assert!(PluginConfig::from_toml_str("[watch]\npoll_interval_ms = 1").is_err());
        assert!(PluginConfig::from_toml_str("[watch]\nmode = \"sometimes\"").is_err());
    }

    #[test]
    fn test_serialized_default_round_trips() {
        let text = toml::to_string(&PluginConfig::default()).unwrap();
        assert_eq!(PluginConfig::from_toml_str(&text).unwrap(), PluginConfig::default());
    }
}
