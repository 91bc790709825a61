//! Decoration store for Decor
//!
//! This crate provides:
//! - The closed `DecorationStatus` enum and its on-disk ordinal
//! - `DecorationMap` and the JSON-pairs codec for `decorations.txt`
//! - `DecorationStore` (load/save/set/remove/rename + change events)
//! - Content fingerprints for telling own writes from external edits
//! - Host path normalization

pub mod error;
pub mod hash;
pub mod map;
pub mod path;
pub mod status;
pub mod store;

// Re-exports
pub use error::StoreError;
pub use hash::Fingerprint;
pub use map::DecorationMap;
pub use path::normalize_key;
pub use status::DecorationStatus;
pub use store::{atomic_write, ChangeCause, DecorationStore, LoadOutcome, StoreEvent, CONFIG_FILE_NAME};

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;
