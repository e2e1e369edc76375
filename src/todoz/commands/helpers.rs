use crate::error::{Result, TodoError};
use crate::finder;
use crate::model::Entry;
use crate::short_id::{DisplayEntry, ShortIds};
use crate::store::EntryStore;
use tracing::warn;
use uuid::Uuid;

/// The current active listing together with its short ids.
pub fn listing<S: EntryStore>(store: &S) -> Result<(Vec<Entry>, ShortIds)> {
    let entries = store.list_all()?;
    let short_ids = ShortIds::compute(&entries)?;
    Ok((entries, short_ids))
}

/// Short ids for `entries`, or an empty map when they can not be computed.
/// Listings still fail on duplicate ids; lookups only lose their short ids.
fn short_ids_or_empty(entries: &[Entry]) -> ShortIds {
    match ShortIds::compute(entries) {
        Ok(short_ids) => short_ids,
        Err(err) => {
            warn!(error = %err, "short ids unavailable");
            ShortIds::default()
        }
    }
}

/// Resolves a user token against the current listing.
pub fn resolve_token<S: EntryStore>(store: &S, token: &str) -> Result<DisplayEntry> {
    let entries = store.list_all()?;
    let short_ids = short_ids_or_empty(&entries);
    let found = finder::find(&entries, &short_ids, token)
        .ok_or_else(|| TodoError::NotFound(token.to_string()))?;
    Ok(DisplayEntry {
        entry: found.entry.clone(),
        short_id: found.short_id,
    })
}

/// Loads an active entry by id, along with its short id in the current
/// listing (empty if that listing has none to offer).
pub fn load<S: EntryStore>(store: &S, id: &Uuid) -> Result<DisplayEntry> {
    let entry = store.find_by_id(id)?;
    let short_id = short_id_of(store, &entry);
    Ok(DisplayEntry { entry, short_id })
}

/// Short id of `entry` in the current listing, or an empty string.
pub fn short_id_of<S: EntryStore>(store: &S, entry: &Entry) -> String {
    match store.list_all() {
        Ok(entries) => short_ids_or_empty(&entries).of(entry).to_string(),
        Err(err) => {
            warn!(id = %entry.id, error = %err, "listing unavailable for short id");
            String::new()
        }
    }
}

/// Titles name files, so they must be non-empty and free of path separators.
pub fn validate_title(title: &str) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(TodoError::Api("Title must not be empty".to_string()));
    }
    if title.contains(['/', '\\']) || title == "." || title == ".." {
        return Err(TodoError::Api(format!(
            "Title must not contain path separators: {}",
            title
        )));
    }
    Ok(title.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::memory::InMemoryStore;

    #[test]
    fn resolve_token_by_title() {
        let store = StoreFixture::new().with_entries(3).store;
        let found = resolve_token(&store, "entry 2").unwrap();
        assert_eq!(found.entry.title, "Test Entry 2");
        assert!(!found.short_id.is_empty());
    }

    #[test]
    fn resolve_token_not_found() {
        let store = StoreFixture::new().with_entries(1).store;
        let err = resolve_token(&store, "nothing like it").unwrap_err();
        assert!(matches!(err, TodoError::NotFound(t) if t == "nothing like it"));
    }

    fn twin_store() -> (InMemoryStore, Uuid) {
        let store = StoreFixture::new().with_entry("Twin one").store;
        let first = store.list_all().unwrap().remove(0);
        let mut second = Entry::new("Twin two".into(), String::new(), None);
        second.id = first.id;
        store.insert(&mut second).unwrap();
        (store, first.id)
    }

    #[test]
    fn load_works_despite_duplicate_ids() {
        let (store, id) = twin_store();
        assert!(matches!(listing(&store), Err(TodoError::NoUniquePrefix(_))));

        let loaded = load(&store, &id).unwrap();
        assert_eq!(loaded.entry.title, "Twin one");
        assert_eq!(loaded.short_id, "");
    }

    #[test]
    fn resolve_token_works_despite_duplicate_ids() {
        let (store, _) = twin_store();
        let found = resolve_token(&store, "two").unwrap();
        assert_eq!(found.entry.title, "Twin two");
        assert_eq!(found.short_id, "");
    }

    #[test]
    fn titles_are_trimmed_and_checked() {
        assert_eq!(validate_title("  Buy milk ").unwrap(), "Buy milk");
        assert!(validate_title("   ").is_err());
        assert!(validate_title("a/b").is_err());
        assert!(validate_title("a\\b").is_err());
        assert!(validate_title("..").is_err());
    }
}
