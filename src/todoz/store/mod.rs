//! # Storage Layer
//!
//! This module defines the storage abstraction for todoz. The [`EntryStore`]
//! trait allows the application to work with different storage backends.
//!
//! ## Files are Truth
//!
//! There is no index or metadata cache: every entry is one file, and every
//! operation starts from a full scan of the active directory. A file is found
//! by its content (the `id` inside it), not by its name, so entries may be
//! renamed freely. Only `insert` looks at filenames, to refuse overwriting an
//! existing `<title><ext>`.
//!
//! ## Storage Layout
//!
//! ```text
//! ~/.todo/
//! ├── config.json         # Configuration (never scanned as an entry)
//! ├── Buy milk.yml        # One YAML file per active entry
//! ├── Water plants.yml
//! └── archive/
//!     └── Pay rent.yml    # Resolved entries
//! ```
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: Production implementation.
//! - [`memory::InMemoryStore`]: For testing logic without filesystem I/O.
//! - [`guarded::GuardedStore`]: Serializes access to any other store.
//!
//! All methods take `&self`. File stores hold no state beyond their paths, and
//! the in-memory store handles its own interior mutability, so a store can be
//! shared between threads once wrapped in a [`guarded::GuardedStore`].

use crate::error::Result;
use crate::model::Entry;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod fs;
pub mod guarded;
pub mod memory;

/// What a scan does with a file that can not be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodePolicy {
    /// Fail the whole operation.
    #[default]
    Strict,
    /// Log a warning and leave the file out.
    Skip,
}

/// Abstract interface for entry storage.
pub trait EntryStore {
    /// All active entries, in storage order.
    fn list_all(&self) -> Result<Vec<Entry>>;

    /// All archived (resolved) entries.
    fn list_archived(&self) -> Result<Vec<Entry>>;

    /// The active entry with the given id.
    fn find_by_id(&self, id: &Uuid) -> Result<Entry>;

    /// Stores a new entry and assigns its location.
    fn insert(&self, entry: &mut Entry) -> Result<()>;

    /// Overwrites an existing entry at its location.
    fn update(&self, entry: &Entry) -> Result<()>;

    /// Removes an entry permanently.
    fn delete(&self, entry: &Entry) -> Result<()>;

    /// Moves an entry to the archive and updates its location.
    fn archive(&self, entry: &mut Entry) -> Result<()>;
}
