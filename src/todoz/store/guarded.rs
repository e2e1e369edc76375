//! Serializes every operation of a store behind one lock.
//!
//! A `GuardedStore` is what the server shares between the notifier loop, the
//! REST handlers and the reload path: all of them go through the same lock,
//! so store operations never interleave. The lock is released when the guard
//! drops, which covers early returns and panics alike.

use super::EntryStore;
use crate::error::Result;
use crate::model::Entry;
use parking_lot::Mutex;
use uuid::Uuid;

pub struct GuardedStore<S> {
    inner: Mutex<S>,
}

impl<S: EntryStore> GuardedStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner: Mutex::new(inner),
        }
    }
}

impl<S: EntryStore> EntryStore for GuardedStore<S> {
    fn list_all(&self) -> Result<Vec<Entry>> {
        self.inner.lock().list_all()
    }

    fn list_archived(&self) -> Result<Vec<Entry>> {
        self.inner.lock().list_archived()
    }

    fn find_by_id(&self, id: &Uuid) -> Result<Entry> {
        self.inner.lock().find_by_id(id)
    }

    fn insert(&self, entry: &mut Entry) -> Result<()> {
        self.inner.lock().insert(entry)
    }

    fn update(&self, entry: &Entry) -> Result<()> {
        self.inner.lock().update(entry)
    }

    fn delete(&self, entry: &Entry) -> Result<()> {
        self.inner.lock().delete(entry)
    }

    fn archive(&self, entry: &mut Entry) -> Result<()> {
        self.inner.lock().archive(entry)
    }
}
