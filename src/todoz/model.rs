use crate::error::{Result, TodoError};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use uuid::Uuid;

/// How long after creation a new entry falls due when no due time is given.
pub const DEFAULT_DUE_IN_HOURS: i64 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    #[default]
    None,
    Once,
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationType::None => write!(f, "none"),
            NotificationType::Once => write!(f, "once"),
        }
    }
}

impl FromStr for NotificationType {
    type Err = String;

    /// Case-insensitive; an empty value reads as `none`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("none") {
            Ok(NotificationType::None)
        } else if s.eq_ignore_ascii_case("once") {
            Ok(NotificationType::Once)
        } else {
            Err(format!("notification type {} unknown", s))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(rename = "type")]
    pub kind: NotificationType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notified_at: Option<DateTime<Utc>>,
}

impl Notification {
    pub fn once() -> Self {
        Self {
            kind: NotificationType::Once,
            notified_at: None,
        }
    }
}

/// A single todo. Serialized as-is into its backing file, except for
/// `location`, which the store assigns on read and insert. Deserializing
/// (e.g. from a REST response) leaves `location` empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "StoredEntry")]
pub struct Entry {
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub details: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<DateTime<Utc>>,
    pub id: Uuid,
    pub notification: Notification,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub location: Option<PathBuf>,
}

impl Entry {
    pub fn new(title: String, details: String, due: Option<DateTime<Utc>>) -> Self {
        let due = due.unwrap_or_else(|| Utc::now() + Duration::hours(DEFAULT_DUE_IN_HOURS));
        Self {
            title,
            details,
            due: Some(due),
            id: Uuid::new_v4(),
            notification: Notification::once(),
            resolved_at: None,
            location: None,
        }
    }

    /// Canonical string form of the id, as used for short ids and matching.
    pub fn id_string(&self) -> String {
        self.id.hyphenated().to_string()
    }

    /// The filename a new entry is stored under.
    pub fn file_name(&self, file_ext: &str) -> String {
        format!("{}{}", self.title, file_ext)
    }

    /// An entry without a due time is treated as due since forever.
    pub fn is_due_before(&self, threshold: DateTime<Utc>) -> bool {
        match self.due {
            Some(due) => due < threshold,
            None => true,
        }
    }

    pub fn is_pending_notification_before(&self, threshold: DateTime<Utc>) -> bool {
        self.is_due_before(threshold)
            && self.notification.kind == NotificationType::Once
            && self.notification.notified_at.is_none()
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved_at.is_some()
    }

    pub fn mark_notified(&mut self, at: DateTime<Utc>) {
        self.notification.notified_at = Some(at);
    }

    /// Moving the due time re-arms the notification.
    pub fn reschedule(&mut self, due: DateTime<Utc>) {
        self.due = Some(due);
        self.notification.notified_at = None;
    }

    pub fn resolve(&mut self, at: DateTime<Utc>) {
        self.resolved_at = Some(at);
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Parses and validates the content of an entry file.
    pub fn from_yaml(content: &str, path: &Path) -> Result<Self> {
        let stored: StoredEntry =
            serde_yaml::from_str(content).map_err(|source| TodoError::Decode {
                path: path.to_path_buf(),
                source,
            })?;
        stored.validate(path)
    }
}

/// On-disk shape of an entry. The notification type is kept as a raw string
/// so an unknown value surfaces as a validation failure, not a parse error.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredEntry {
    title: String,
    #[serde(default)]
    details: String,
    #[serde(default)]
    due: Option<DateTime<Utc>>,
    id: Uuid,
    #[serde(default)]
    notification: StoredNotification,
    #[serde(default)]
    resolved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredNotification {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    notified_at: Option<DateTime<Utc>>,
}

impl StoredEntry {
    fn validate(self, path: &Path) -> Result<Entry> {
        let mut entry = Entry::try_from(self).map_err(|message| TodoError::Validation {
            path: path.to_path_buf(),
            message,
        })?;
        entry.location = Some(path.to_path_buf());
        Ok(entry)
    }
}

impl TryFrom<StoredEntry> for Entry {
    type Error = String;

    fn try_from(stored: StoredEntry) -> std::result::Result<Self, Self::Error> {
        let kind = NotificationType::from_str(&stored.notification.kind)?;
        Ok(Entry {
            title: stored.title,
            details: stored.details,
            due: stored.due,
            id: stored.id,
            notification: Notification {
                kind,
                notified_at: stored.notification.notified_at,
            },
            resolved_at: stored.resolved_at,
            location: None,
        })
    }
}
