use crate::commands::CmdResult;
use crate::error::Result;
use crate::short_id::{display_entries, ShortIds};
use crate::store::EntryStore;
use chrono::{DateTime, Utc};

use super::helpers::listing;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFilter {
    All,
    /// Entries whose due time lies before the threshold.
    DueBefore(DateTime<Utc>),
    /// Due entries that still wait for their one notification.
    PendingNotificationBefore(DateTime<Utc>),
    /// Resolved entries from the archive.
    Archived,
}

/// Lists entries in storage order. Short ids always come from the full
/// listing the entries belong to, so filtering never shortens them.
pub fn run<S: EntryStore>(store: &S, filter: ListFilter) -> Result<CmdResult> {
    let (entries, mut short_ids) = match filter {
        ListFilter::Archived => {
            let archived = store.list_archived()?;
            let short_ids = ShortIds::compute(&archived)?;
            (archived, short_ids)
        }
        _ => listing(store)?,
    };

    let selected: Vec<_> = entries
        .into_iter()
        .filter(|entry| match filter {
            ListFilter::All | ListFilter::Archived => true,
            ListFilter::DueBefore(threshold) => entry.is_due_before(threshold),
            ListFilter::PendingNotificationBefore(threshold) => {
                entry.is_pending_notification_before(threshold)
            }
        })
        .collect();
    short_ids.retain_entries(&selected);

    let listed = display_entries(selected, &short_ids);
    Ok(CmdResult::default()
        .with_listed_entries(listed)
        .with_short_ids(short_ids))
}
