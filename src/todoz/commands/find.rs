use crate::commands::CmdResult;
use crate::error::Result;
use crate::store::EntryStore;
use uuid::Uuid;

use super::helpers::{load, resolve_token};

pub fn by_token<S: EntryStore>(store: &S, token: &str) -> Result<CmdResult> {
    let found = resolve_token(store, token)?;
    Ok(CmdResult::default().with_affected_entry(found.entry, found.short_id))
}

pub fn by_id<S: EntryStore>(store: &S, id: &Uuid) -> Result<CmdResult> {
    let found = load(store, id)?;
    Ok(CmdResult::default().with_affected_entry(found.entry, found.short_id))
}

/// The first entry of the current listing, if any.
pub fn first<S: EntryStore>(store: &S) -> Result<CmdResult> {
    let (entries, short_ids) = super::helpers::listing(store)?;
    let mut result = CmdResult::default();
    if let Some(entry) = entries.into_iter().next() {
        let short_id = short_ids.of(&entry).to_string();
        result = result.with_affected_entry(entry, short_id);
    }
    Ok(result)
}
