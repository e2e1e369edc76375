use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::EntryStore;
use uuid::Uuid;

use super::helpers::{load, validate_title};

/// Rewrites title and/or details in place. The file keeps its name, so a
/// retitled entry no longer matches `<title><ext>`; lookups go by content.
pub fn run<S: EntryStore>(
    store: &S,
    id: &Uuid,
    title: Option<&str>,
    details: Option<String>,
) -> Result<CmdResult> {
    let mut target = load(store, id)?;
    let mut result = CmdResult::default();

    if title.is_none() && details.is_none() {
        result.add_message(CmdMessage::warning("Nothing to change"));
        return Ok(result.with_affected_entry(target.entry, target.short_id));
    }

    if let Some(title) = title {
        target.entry.title = validate_title(title)?;
    }
    if let Some(details) = details {
        target.entry.details = details;
    }
    store.update(&target.entry)?;

    result.add_message(CmdMessage::success(format!(
        "Entry updated ({}): {}",
        target.short_id, target.entry.title
    )));
    Ok(result.with_affected_entry(target.entry, target.short_id))
}
