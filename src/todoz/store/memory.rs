use super::EntryStore;
use crate::error::{Result, TodoError};
use crate::model::Entry;
use parking_lot::Mutex;
use std::path::PathBuf;
use uuid::Uuid;

const ARCHIVE_PREFIX: &str = "archive";

/// In-memory storage for testing and development.
/// Does NOT persist data.
///
/// Locations are synthetic paths (`<title>.yml`, `archive/<title>.yml`) so the
/// same filename collision rule as the file store applies.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    active: Vec<Entry>,
    archived: Vec<Entry>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(active: &[Entry], entry: &Entry) -> Result<usize> {
        active
            .iter()
            .position(|e| e.location.is_some() && e.location == entry.location)
            .ok_or_else(|| TodoError::NotFound(entry.id_string()))
    }
}

impl EntryStore for InMemoryStore {
    fn list_all(&self) -> Result<Vec<Entry>> {
        Ok(self.state.lock().active.clone())
    }

    fn list_archived(&self) -> Result<Vec<Entry>> {
        Ok(self.state.lock().archived.clone())
    }

    fn find_by_id(&self, id: &Uuid) -> Result<Entry> {
        self.state
            .lock()
            .active
            .iter()
            .find(|e| e.id == *id)
            .cloned()
            .ok_or_else(|| TodoError::NotFound(id.to_string()))
    }

    fn insert(&self, entry: &mut Entry) -> Result<()> {
        let mut state = self.state.lock();
        let path = PathBuf::from(entry.file_name(".yml"));
        if state
            .active
            .iter()
            .any(|e| e.location.as_ref() == Some(&path))
        {
            return Err(TodoError::AlreadyExists(path));
        }
        entry.location = Some(path);
        state.active.push(entry.clone());
        Ok(())
    }

    fn update(&self, entry: &Entry) -> Result<()> {
        let mut state = self.state.lock();
        let idx = Self::position(&state.active, entry)?;
        state.active[idx] = entry.clone();
        Ok(())
    }

    fn delete(&self, entry: &Entry) -> Result<()> {
        let mut state = self.state.lock();
        let idx = Self::position(&state.active, entry)?;
        state.active.remove(idx);
        Ok(())
    }

    fn archive(&self, entry: &mut Entry) -> Result<()> {
        let mut state = self.state.lock();
        let idx = Self::position(&state.active, entry)?;
        let mut moved = entry.clone();
        state.active.remove(idx);
        let name = entry
            .location
            .as_ref()
            .and_then(|path| path.file_name())
            .map(PathBuf::from)
            .unwrap_or_default();
        moved.location = Some(PathBuf::from(ARCHIVE_PREFIX).join(name));
        entry.location = moved.location.clone();
        state.archived.push(moved);
        Ok(())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use chrono::{DateTime, Utc};

    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
            }
        }

        pub fn with_entries(self, count: usize) -> Self {
            for i in 0..count {
                let mut entry = Entry::new(
                    format!("Test Entry {}", i + 1),
                    format!("Details for entry {}", i + 1),
                    None,
                );
                self.store.insert(&mut entry).unwrap();
            }
            self
        }

        pub fn with_entry(self, title: &str) -> Self {
            let mut entry = Entry::new(title.to_string(), String::new(), None);
            self.store.insert(&mut entry).unwrap();
            self
        }

        pub fn with_due_entry(self, title: &str, due: DateTime<Utc>) -> Self {
            let mut entry = Entry::new(title.to_string(), String::new(), Some(due));
            self.store.insert(&mut entry).unwrap();
            self
        }

        pub fn with_notified_entry(self, title: &str, due: DateTime<Utc>) -> Self {
            let mut entry = Entry::new(title.to_string(), String::new(), Some(due));
            entry.mark_notified(due);
            self.store.insert(&mut entry).unwrap();
            self
        }
    }
}
