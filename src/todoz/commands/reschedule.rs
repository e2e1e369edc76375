use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::EntryStore;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::helpers::load;

/// Moves the due time and re-arms the notification.
pub fn run<S: EntryStore>(store: &S, id: &Uuid, due: DateTime<Utc>) -> Result<CmdResult> {
    let mut target = load(store, id)?;
    target.entry.reschedule(due);
    store.update(&target.entry)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Entry rescheduled ({}): {}",
        target.short_id, target.entry.title
    )));
    Ok(result.with_affected_entry(target.entry, target.short_id))
}
