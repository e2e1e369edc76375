use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::EntryStore;
use uuid::Uuid;

use super::helpers::load;

/// Deletes the entry's file. There is no trash: the entry is gone.
pub fn run<S: EntryStore>(store: &S, id: &Uuid) -> Result<CmdResult> {
    let target = load(store, id)?;
    store.delete(&target.entry)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Entry deleted ({}): {}",
        target.short_id, target.entry.title
    )));
    Ok(result.with_affected_entry(target.entry, target.short_id))
}
