use crate::model::Entry;
use crate::short_id::{DisplayEntry, ShortIds};

pub mod add;
pub mod edit;
pub mod find;
pub mod helpers;
pub mod list;
pub mod notify;
pub mod remove;
pub mod reschedule;
pub mod resolve;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }
}

/// What a command produced: entries to list, entries it changed, and
/// messages for the user. Presentation is left to the caller.
#[derive(Debug, Default)]
pub struct CmdResult {
    pub listed_entries: Vec<DisplayEntry>,
    pub affected_entries: Vec<DisplayEntry>,
    /// Short ids of the listing the entries above came from.
    pub short_ids: ShortIds,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_listed_entries(mut self, entries: Vec<DisplayEntry>) -> Self {
        self.listed_entries = entries;
        self
    }

    pub fn with_affected_entry(mut self, entry: Entry, short_id: impl Into<String>) -> Self {
        self.affected_entries.push(DisplayEntry {
            entry,
            short_id: short_id.into(),
        });
        self
    }

    pub fn with_short_ids(mut self, short_ids: ShortIds) -> Self {
        self.short_ids = short_ids;
        self
    }

    /// The single entry a targeted command acted on.
    pub fn affected(&self) -> Option<&Entry> {
        self.affected_entries.first().map(|d| &d.entry)
    }
}
