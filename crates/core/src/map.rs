//! Path → status mapping and its on-disk codec
//!
//! The persisted form is a JSON array of two-element arrays:
//!
//! ```text
//! [["Notes/todo.md",1],["Projects",2]]
//! ```
//!
//! Keys are kept sorted so that saving the same map always produces the
//! same bytes (and therefore the same fingerprint).

use crate::DecorationStatus;
use std::collections::btree_map::{self, BTreeMap};

/// Mapping from host-relative path to decoration status
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecorationMap {
    entries: BTreeMap<String, DecorationStatus>,
}

impl DecorationMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the persisted JSON-pairs form
    ///
    /// Duplicate paths resolve to the last pair. A blank file decodes as
    /// an empty map.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        Self::from_json_bytes(text.as_bytes())
    }

    /// Parse the persisted form straight from file bytes (UTF-8 is validated)
    pub fn from_json_bytes(bytes: &[u8]) -> serde_json::Result<Self> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::new());
        }

        let pairs: Vec<(String, DecorationStatus)> = serde_json::from_slice(bytes)?;
        Ok(pairs.into_iter().collect())
    }

    /// Serialize to the persisted JSON-pairs form
    pub fn to_json(&self) -> serde_json::Result<String> {
        let pairs: Vec<(&String, &DecorationStatus)> = self.entries.iter().collect();
        serde_json::to_string(&pairs)
    }

    /// Look up the status for a path
    pub fn get(&self, path: &str) -> Option<DecorationStatus> {
        self.entries.get(path).copied()
    }

    /// Whether a path is decorated
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Insert or overwrite, returning the previous status
    pub fn insert(&mut self, path: impl Into<String>, status: DecorationStatus) -> Option<DecorationStatus> {
        self.entries.insert(path.into(), status)
    }

    /// Remove a path, returning its status if it was present
    pub fn remove(&mut self, path: &str) -> Option<DecorationStatus> {
        self.entries.remove(path)
    }

    /// Move the entry at `old` to `new`, overwriting whatever `new` held
    ///
    /// Returns `false` (and leaves the map untouched) when `old` has no
    /// entry or both paths are equal.
    pub fn rename(&mut self, old: &str, new: &str) -> bool {
        if old == new {
            return false;
        }

        match self.entries.remove(old) {
            Some(status) => {
                self.entries.insert(new.to_string(), status);
                true
            }
            None => false,
        }
    }

    /// Keep only entries whose path satisfies `keep`, returning how many were dropped
    pub fn retain<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&str, DecorationStatus) -> bool,
    {
        let before = self.entries.len();
        self.entries.retain(|path, status| keep(path, *status));
        before - self.entries.len()
    }

    /// Iterate over `(path, status)` in path order
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    /// All decorated paths in path order
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of decorated paths
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is decorated
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Iterator over map entries
pub struct Iter<'a> {
    inner: btree_map::Iter<'a, String, DecorationStatus>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, DecorationStatus);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(path, status)| (path.as_str(), *status))
    }
}

impl<'a> IntoIterator for &'a DecorationMap {
    type Item = (&'a str, DecorationStatus);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Into<String>> FromIterator<(K, DecorationStatus)> for DecorationMap {
    fn from_iter<I: IntoIterator<Item = (K, DecorationStatus)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(path, status)| (path.into(), status)).collect(),
        }
    }
}
