//! Client for the REST API of a running `todoz serve`.
//!
//! [`RemoteApi`] speaks the routes of [`crate::server::rest`] and answers with
//! the same [`CmdResult`] values as the local facade, so the CLI can work on
//! the todo home of another machine. It is selected by setting
//! `remote_base_url` in the configuration.
//!
//! The REST API has no routes for archived entries or for editing; those
//! calls fail with [`TodoError::Api`]. Every call is bounded by the
//! configured timeout.

use crate::api::{CmdMessage, CmdResult, TodoService};
use crate::error::{Result, TodoError};
use crate::model::{Entry, DEFAULT_DUE_IN_HOURS};
use crate::server::rest::{AddBody, DueBody, SearchBody, TodosResponse};
use crate::short_id::display_entries;
use chrono::{DateTime, Duration, Utc};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::StatusCode;
use std::time::Duration as Timeout;
use tracing::{debug, warn};
use uuid::Uuid;

pub struct RemoteApi {
    client: Client,
    base_url: String,
}

impl RemoteApi {
    pub fn new(base_url: &str, timeout: Timeout) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends `request` and turns error statuses into errors. A 404 becomes
    /// `NotFound(subject)`.
    fn send(&self, request: RequestBuilder, subject: &str) -> Result<Response> {
        let response = request.send()?;
        let status = response.status();
        debug!(status = status.as_u16(), subject, "remote call");

        if status == StatusCode::NOT_FOUND {
            return Err(TodoError::NotFound(subject.to_string()));
        }
        if status.is_client_error() || status.is_server_error() {
            let message = response.text().unwrap_or_default();
            return Err(TodoError::Remote {
                status: status.as_u16(),
                message: message.trim().to_string(),
            });
        }
        Ok(response)
    }

    fn fetch(&self, id: &Uuid) -> Result<Entry> {
        let subject = id.to_string();
        let request = self.client.get(self.url(&format!("/todos/{}", id)));
        Ok(self.send(request, &subject)?.json()?)
    }

    fn fetch_all(&self) -> Result<TodosResponse> {
        let request = self.client.get(self.url("/todos"));
        Ok(self.send(request, "todos")?.json()?)
    }

    fn search(&self, body: &SearchBody) -> Result<TodosResponse> {
        let request = self.client.post(self.url("/search")).json(body);
        Ok(self.send(request, "search")?.json()?)
    }

    fn post_action(&self, id: &Uuid, action: &str) -> Result<()> {
        let request = self
            .client
            .post(self.url(&format!("/todos/{}/{}", id, action)));
        self.send(request, &id.to_string())?;
        Ok(())
    }

    /// Looks the short id up in the current listing; a failed listing only
    /// costs the short id.
    fn short_id_of(&self, entry: &Entry) -> String {
        match self.fetch_all() {
            Ok(listing) => listing.short_id_map.of(entry).to_string(),
            Err(err) => {
                warn!(error = %err, "no short id for {}", entry.id);
                String::new()
            }
        }
    }

    fn listing(response: TodosResponse) -> CmdResult {
        let entries = display_entries(response.todos, &response.short_id_map);
        CmdResult::default()
            .with_listed_entries(entries)
            .with_short_ids(response.short_id_map)
    }

    fn targeted(entry: Entry, short_id: String, message: Option<String>) -> CmdResult {
        let mut result = CmdResult::default();
        if let Some(message) = message {
            result.add_message(CmdMessage::success(message));
        }
        result.with_affected_entry(entry, short_id)
    }
}

impl TodoService for RemoteApi {
    fn list_all(&self) -> Result<CmdResult> {
        Ok(Self::listing(self.fetch_all()?))
    }

    fn list_due_before(&self, threshold: DateTime<Utc>) -> Result<CmdResult> {
        let body = SearchBody {
            due_before: Some(threshold),
            ..SearchBody::default()
        };
        Ok(Self::listing(self.search(&body)?))
    }

    fn list_pending_notification_due_before(
        &self,
        threshold: DateTime<Utc>,
    ) -> Result<CmdResult> {
        let body = SearchBody {
            notified_before: Some(threshold),
            ..SearchBody::default()
        };
        Ok(Self::listing(self.search(&body)?))
    }

    fn list_archived(&self) -> Result<CmdResult> {
        Err(TodoError::Api(
            "archived entries are not available in remote mode".to_string(),
        ))
    }

    fn find_by_token(&self, token: &str) -> Result<CmdResult> {
        let body = SearchBody {
            search_for: token.to_string(),
            ..SearchBody::default()
        };
        let found = self.search(&body)?;
        let entry = found
            .todos
            .into_iter()
            .next()
            .ok_or_else(|| TodoError::NotFound(token.to_string()))?;
        let short_id = found.short_id_map.of(&entry).to_string();
        Ok(Self::targeted(entry, short_id, None))
    }

    fn find_by_id(&self, id: &Uuid) -> Result<CmdResult> {
        let entry = self.fetch(id)?;
        let short_id = self.short_id_of(&entry);
        Ok(Self::targeted(entry, short_id, None))
    }

    fn first(&self) -> Result<CmdResult> {
        let listing = self.fetch_all()?;
        let mut result = CmdResult::default();
        if let Some(entry) = listing.todos.into_iter().next() {
            let short_id = listing.short_id_map.of(&entry).to_string();
            result = result.with_affected_entry(entry, short_id);
        }
        Ok(result)
    }

    fn add(&self, title: &str, details: String, due: Option<DateTime<Utc>>) -> Result<CmdResult> {
        let due = due.unwrap_or_else(|| Utc::now() + Duration::hours(DEFAULT_DUE_IN_HOURS));
        let body = AddBody {
            title: title.trim().to_string(),
            details,
            due: Some(due),
        };
        let request = self.client.post(self.url("/todos")).json(&body);
        let entry: Entry = self.send(request, &body.title)?.json()?;

        let short_id = self.short_id_of(&entry);
        let message = format!("Entry created ({}): {}", short_id, entry.title);
        Ok(Self::targeted(entry, short_id, Some(message)))
    }

    fn remove(&self, id: &Uuid) -> Result<CmdResult> {
        let entry = self.fetch(id)?;
        let short_id = self.short_id_of(&entry);
        let request = self.client.delete(self.url(&format!("/todos/{}", id)));
        self.send(request, &id.to_string())?;

        let message = format!("Entry deleted ({}): {}", short_id, entry.title);
        Ok(Self::targeted(entry, short_id, Some(message)))
    }

    fn mark_notified(&self, id: &Uuid) -> Result<CmdResult> {
        let mut entry = self.fetch(id)?;
        self.post_action(id, "notified")?;
        entry.mark_notified(Utc::now());
        let short_id = self.short_id_of(&entry);
        Ok(Self::targeted(entry, short_id, None))
    }

    fn reschedule(&self, id: &Uuid, due: DateTime<Utc>) -> Result<CmdResult> {
        let mut entry = self.fetch(id)?;
        let request = self
            .client
            .post(self.url(&format!("/todos/{}/due", id)))
            .json(&DueBody { due: Some(due) });
        self.send(request, &id.to_string())?;

        entry.reschedule(due);
        let short_id = self.short_id_of(&entry);
        let message = format!("Entry rescheduled ({}): {}", short_id, entry.title);
        Ok(Self::targeted(entry, short_id, Some(message)))
    }

    fn resolve(&self, id: &Uuid) -> Result<CmdResult> {
        let mut entry = self.fetch(id)?;
        let short_id = self.short_id_of(&entry);
        self.post_action(id, "resolved")?;

        entry.resolve(Utc::now());
        let message = format!("Entry resolved ({}): {}", short_id, entry.title);
        Ok(Self::targeted(entry, short_id, Some(message)))
    }

    fn edit(&self, _id: &Uuid, _title: Option<&str>, _details: Option<String>) -> Result<CmdResult> {
        Err(TodoError::Api(
            "editing is not available in remote mode".to_string(),
        ))
    }
}
