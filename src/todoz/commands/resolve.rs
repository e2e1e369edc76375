use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::EntryStore;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::helpers::load;

/// Stamps the entry as resolved, writes it, then moves it to the archive.
pub fn run<S: EntryStore>(store: &S, id: &Uuid, at: DateTime<Utc>) -> Result<CmdResult> {
    let mut target = load(store, id)?;
    target.entry.resolve(at);
    store.update(&target.entry)?;
    store.archive(&mut target.entry)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Entry resolved ({}): {}",
        target.short_id, target.entry.title
    )));
    if let Some(name) = target.entry.location.as_deref().and_then(|l| l.file_name()) {
        result.add_message(CmdMessage::info(format!(
            "Archived as {}",
            name.to_string_lossy()
        )));
    }
    Ok(result.with_affected_entry(target.entry, target.short_id))
}
