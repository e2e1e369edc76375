//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It is the single
//! entry point for every todo operation, whether it comes from the CLI, the
//! REST server or the notifier loop.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Dispatches** to the appropriate command function
//! - **Supplies the clock** (`now`) to commands that stamp times
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! It holds no business logic (that lives in `commands/*.rs`) and does no
//! presentation: no stdout, no HTTP status codes.
//!
//! ## Generic Over EntryStore
//!
//! `TodoApi<S: EntryStore>` is generic over the storage backend:
//! - Production: `TodoApi<GuardedStore<FileStore>>`
//! - Testing: `TodoApi<InMemoryStore>`
//!
//! All methods take `&self`, so one facade can be shared between threads
//! whenever its store can.
//!
//! ## Local and Remote
//!
//! [`TodoService`] is the set of operations a client may call. `TodoApi`
//! implements it over a local store; [`crate::remote::RemoteApi`] implements
//! it by calling the REST API of a running `todoz serve`.
//!
//! ## Addressing
//!
//! Mutating calls take the full id. Callers holding a user-typed token first
//! resolve it with [`TodoApi::find_by_token`]; every id-accepting call fails
//! with `NotFound` when the id has no entry.

use crate::commands;
use crate::error::Result;
use crate::store::EntryStore;
use chrono::{DateTime, Utc};
use uuid::Uuid;

pub use commands::list::ListFilter;
pub use commands::{CmdMessage, CmdResult, MessageLevel};

pub struct TodoApi<S: EntryStore> {
    store: S,
}

impl<S: EntryStore> TodoApi<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn list_all(&self) -> Result<CmdResult> {
        commands::list::run(&self.store, ListFilter::All)
    }

    pub fn list_due_before(&self, threshold: DateTime<Utc>) -> Result<CmdResult> {
        commands::list::run(&self.store, ListFilter::DueBefore(threshold))
    }

    pub fn list_pending_notification_due_before(
        &self,
        threshold: DateTime<Utc>,
    ) -> Result<CmdResult> {
        commands::list::run(&self.store, ListFilter::PendingNotificationBefore(threshold))
    }

    pub fn list_archived(&self) -> Result<CmdResult> {
        commands::list::run(&self.store, ListFilter::Archived)
    }

    pub fn find_by_token(&self, token: &str) -> Result<CmdResult> {
        commands::find::by_token(&self.store, token)
    }

    pub fn find_by_id(&self, id: &Uuid) -> Result<CmdResult> {
        commands::find::by_id(&self.store, id)
    }

    pub fn first(&self) -> Result<CmdResult> {
        commands::find::first(&self.store)
    }

    pub fn add(
        &self,
        title: &str,
        details: String,
        due: Option<DateTime<Utc>>,
    ) -> Result<CmdResult> {
        commands::add::run(&self.store, title, details, due)
    }

    pub fn remove(&self, id: &Uuid) -> Result<CmdResult> {
        commands::remove::run(&self.store, id)
    }

    pub fn mark_notified(&self, id: &Uuid) -> Result<CmdResult> {
        commands::notify::mark_notified(&self.store, id, Utc::now())
    }

    pub fn reschedule(&self, id: &Uuid, due: DateTime<Utc>) -> Result<CmdResult> {
        commands::reschedule::run(&self.store, id, due)
    }

    pub fn resolve(&self, id: &Uuid) -> Result<CmdResult> {
        commands::resolve::run(&self.store, id, Utc::now())
    }

    pub fn edit(
        &self,
        id: &Uuid,
        title: Option<&str>,
        details: Option<String>,
    ) -> Result<CmdResult> {
        commands::edit::run(&self.store, id, title, details)
    }
}

/// The todo operations, independent of where the entries live.
pub trait TodoService {
    fn list_all(&self) -> Result<CmdResult>;
    fn list_due_before(&self, threshold: DateTime<Utc>) -> Result<CmdResult>;
    fn list_pending_notification_due_before(&self, threshold: DateTime<Utc>)
        -> Result<CmdResult>;
    fn list_archived(&self) -> Result<CmdResult>;
    fn find_by_token(&self, token: &str) -> Result<CmdResult>;
    fn find_by_id(&self, id: &Uuid) -> Result<CmdResult>;
    fn first(&self) -> Result<CmdResult>;
    fn add(&self, title: &str, details: String, due: Option<DateTime<Utc>>) -> Result<CmdResult>;
    fn remove(&self, id: &Uuid) -> Result<CmdResult>;
    fn mark_notified(&self, id: &Uuid) -> Result<CmdResult>;
    fn reschedule(&self, id: &Uuid, due: DateTime<Utc>) -> Result<CmdResult>;
    fn resolve(&self, id: &Uuid) -> Result<CmdResult>;
    fn edit(&self, id: &Uuid, title: Option<&str>, details: Option<String>) -> Result<CmdResult>;
}

impl<S: EntryStore> TodoService for TodoApi<S> {
    fn list_all(&self) -> Result<CmdResult> {
        TodoApi::list_all(self)
    }

    fn list_due_before(&self, threshold: DateTime<Utc>) -> Result<CmdResult> {
        TodoApi::list_due_before(self, threshold)
    }

    fn list_pending_notification_due_before(
        &self,
        threshold: DateTime<Utc>,
    ) -> Result<CmdResult> {
        TodoApi::list_pending_notification_due_before(self, threshold)
    }

    fn list_archived(&self) -> Result<CmdResult> {
        TodoApi::list_archived(self)
    }

    fn find_by_token(&self, token: &str) -> Result<CmdResult> {
        TodoApi::find_by_token(self, token)
    }

    fn find_by_id(&self, id: &Uuid) -> Result<CmdResult> {
        TodoApi::find_by_id(self, id)
    }

    fn first(&self) -> Result<CmdResult> {
        TodoApi::first(self)
    }

    fn add(&self, title: &str, details: String, due: Option<DateTime<Utc>>) -> Result<CmdResult> {
        TodoApi::add(self, title, details, due)
    }

    fn remove(&self, id: &Uuid) -> Result<CmdResult> {
        TodoApi::remove(self, id)
    }

    fn mark_notified(&self, id: &Uuid) -> Result<CmdResult> {
        TodoApi::mark_notified(self, id)
    }

    fn reschedule(&self, id: &Uuid, due: DateTime<Utc>) -> Result<CmdResult> {
        TodoApi::reschedule(self, id, due)
    }

    fn resolve(&self, id: &Uuid) -> Result<CmdResult> {
        TodoApi::resolve(self, id)
    }

    fn edit(&self, id: &Uuid, title: Option<&str>, details: Option<String>) -> Result<CmdResult> {
        TodoApi::edit(self, id, title, details)
    }
}
