use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::Entry;
use crate::store::EntryStore;
use chrono::{DateTime, Utc};

use super::helpers::{short_id_of, validate_title};

pub fn run<S: EntryStore>(
    store: &S,
    title: &str,
    details: String,
    due: Option<DateTime<Utc>>,
) -> Result<CmdResult> {
    let title = validate_title(title)?;
    let mut entry = Entry::new(title, details, due);
    store.insert(&mut entry)?;

    // the entry is stored now; nothing after this point may fail the call
    let short_id = short_id_of(store, &entry);

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Entry created ({}): {}",
        short_id, entry.title
    )));
    Ok(result.with_affected_entry(entry, short_id))
}
