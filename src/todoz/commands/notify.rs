use crate::commands::CmdResult;
use crate::error::Result;
use crate::store::EntryStore;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::helpers::load;

pub fn mark_notified<S: EntryStore>(store: &S, id: &Uuid, at: DateTime<Utc>) -> Result<CmdResult> {
    let mut target = load(store, id)?;
    target.entry.mark_notified(at);
    store.update(&target.entry)?;
    Ok(CmdResult::default().with_affected_entry(target.entry, target.short_id))
}
