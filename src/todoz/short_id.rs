//! # Short ids
//!
//! Entries are identified by UUIDs, which are stable but unpleasant to type.
//! For display and lookup every entry also gets a *short id*: the shortest
//! prefix of its id that no other entry's id starts with. Comparison is
//! case-insensitive.
//!
//! ```text
//! abc651b1-69ea-…   ->  ab
//! ac1651b1-69ea-…   ->  ac
//! bdc651b1-69ea-…   ->  b
//! ```
//!
//! Short ids are recomputed from the current listing every time; nothing is
//! persisted. They are therefore only stable for the lifetime of one listing
//! and may grow or shrink as entries are added or removed.

use crate::error::{Result, TodoError};
use crate::model::Entry;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Full id string -> short id, for one listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShortIds(HashMap<String, String>);

impl ShortIds {
    /// Computes the short id of every entry in `entries`.
    ///
    /// Fails with [`TodoError::NoUniquePrefix`] when an id can not be told
    /// apart from another one, i.e. on duplicate ids or when one id is a
    /// literal prefix of another.
    pub fn compute(entries: &[Entry]) -> Result<Self> {
        let ids: Vec<String> = entries.iter().map(Entry::id_string).collect();
        let folded: Vec<String> = ids.iter().map(|id| id.to_lowercase()).collect();

        let mut map = HashMap::with_capacity(ids.len());
        for (i, id) in ids.iter().enumerate() {
            let short = shortest_unique_prefix(i, id, &folded)
                .ok_or_else(|| TodoError::NoUniquePrefix(id.clone()))?;
            map.insert(id.clone(), short.to_string());
        }
        Ok(Self(map))
    }

    pub fn get(&self, full_id: &str) -> Option<&str> {
        self.0.get(full_id).map(String::as_str)
    }

    /// Short id of `entry`, or an empty string if it was not part of the listing.
    pub fn of(&self, entry: &Entry) -> &str {
        self.get(&entry.id_string()).unwrap_or("")
    }

    /// Full id whose short id equals `token`, ignoring case.
    pub fn full_id_for(&self, token: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(_, short)| short.eq_ignore_ascii_case(token))
            .map(|(full, _)| full.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Restricts the map to the given entries.
    pub fn retain_entries(&mut self, entries: &[Entry]) {
        let keep: Vec<String> = entries.iter().map(Entry::id_string).collect();
        self.0.retain(|full, _| keep.contains(full));
    }
}

impl FromIterator<(String, String)> for ShortIds {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Grows a prefix of `id` one character at a time until no other id in
/// `folded` (lowercased ids, `folded[index]` being `id` itself) shares it.
fn shortest_unique_prefix<'a>(index: usize, id: &'a str, folded: &[String]) -> Option<&'a str> {
    let mut ends: Vec<usize> = id.char_indices().skip(1).map(|(pos, _)| pos).collect();
    ends.push(id.len());

    for end in ends {
        let candidate = &id[..end];
        let candidate_folded = candidate.to_lowercase();
        let shared = folded
            .iter()
            .enumerate()
            .any(|(j, other)| j != index && other.starts_with(&candidate_folded));
        if !shared {
            return Some(candidate);
        }
    }
    None
}

/// An entry together with its short id in the listing it came from.
#[derive(Debug, Clone, Serialize)]
pub struct DisplayEntry {
    pub entry: Entry,
    pub short_id: String,
}

/// Pairs every entry with its short id, keeping listing order.
pub fn display_entries(entries: Vec<Entry>, short_ids: &ShortIds) -> Vec<DisplayEntry> {
    entries
        .into_iter()
        .map(|entry| {
            let short_id = short_ids.of(&entry).to_string();
            DisplayEntry { entry, short_id }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    const ABC: &str = "abc651b1-69ea-4ce3-abac-0f1e829623d5";
    const AC: &str = "ac1651b1-69ea-4ce3-abac-0f1e829623d5";
    const BD: &str = "bdc651b1-69ea-4ce3-abac-0f1e829623d5";

    fn entry_with_id(id: &str) -> Entry {
        let mut entry = Entry::new(format!("entry {}", id), String::new(), None);
        entry.id = Uuid::parse_str(id).unwrap();
        entry
    }

    fn entries(ids: &[&str]) -> Vec<Entry> {
        ids.iter().map(|id| entry_with_id(id)).collect()
    }

    #[test]
    fn empty_listing() {
        let short_ids = ShortIds::compute(&[]).unwrap();
        assert!(short_ids.is_empty());
    }

    #[test]
    fn single_entry_gets_first_character() {
        let short_ids = ShortIds::compute(&entries(&[ABC])).unwrap();
        assert_eq!(short_ids.len(), 1);
        assert_eq!(short_ids.get(ABC), Some("a"));
    }

    #[test]
    fn two_distinct_entries() {
        let short_ids = ShortIds::compute(&entries(&[ABC, BD])).unwrap();
        assert_eq!(short_ids.get(ABC), Some("a"));
        assert_eq!(short_ids.get(BD), Some("b"));
    }

    #[test]
    fn two_overlapping_entries() {
        let short_ids = ShortIds::compute(&entries(&[ABC, AC])).unwrap();
        assert_eq!(short_ids.get(ABC), Some("ab"));
        assert_eq!(short_ids.get(AC), Some("ac"));
    }

    #[test]
    fn three_entries() {
        let short_ids = ShortIds::compute(&entries(&[ABC, AC, BD])).unwrap();
        assert_eq!(short_ids.len(), 3);
        assert_eq!(short_ids.get(ABC), Some("ab"));
        assert_eq!(short_ids.get(AC), Some("ac"));
        assert_eq!(short_ids.get(BD), Some("b"));
    }

    #[test]
    fn order_does_not_change_result() {
        let forward = ShortIds::compute(&entries(&[ABC, AC, BD])).unwrap();
        let backward = ShortIds::compute(&entries(&[BD, AC, ABC])).unwrap();
        assert_eq!(forward, backward);
    }

    #[test]
    fn duplicate_ids_have_no_unique_prefix() {
        let err = ShortIds::compute(&entries(&[ABC, ABC])).unwrap_err();
        assert!(matches!(err, TodoError::NoUniquePrefix(id) if id == ABC));
    }

    #[test]
    fn short_ids_are_unique_prefixes_of_random_ids() {
        let listing: Vec<Entry> = (0..200)
            .map(|i| Entry::new(format!("entry {}", i), String::new(), None))
            .collect();
        let short_ids = ShortIds::compute(&listing).unwrap();

        let mut seen = std::collections::HashSet::new();
        for entry in &listing {
            let short = short_ids.of(entry);
            let full = entry.id_string();
            assert!(!short.is_empty());
            assert!(full.starts_with(short));
            assert!(short.len() < full.len());
            assert!(seen.insert(short.to_string()), "duplicate short id {}", short);
        }
    }

    #[test]
    fn full_id_lookup_ignores_case() {
        let short_ids = ShortIds::compute(&entries(&[ABC, AC])).unwrap();
        assert_eq!(short_ids.full_id_for("AB"), Some(ABC));
        assert_eq!(short_ids.full_id_for("ac"), Some(AC));
        assert_eq!(short_ids.full_id_for("a"), None);
    }

    #[test]
    fn prefix_comparison_ignores_case() {
        let folded = vec!["abc".to_string(), "abd".to_string()];
        assert_eq!(shortest_unique_prefix(0, "ABC", &folded), Some("ABC"));
        assert_eq!(shortest_unique_prefix(1, "abd", &folded), Some("abd"));
    }

    #[test]
    fn literal_prefix_of_another_id_fails() {
        let folded = vec!["ab".to_string(), "abc".to_string()];
        assert_eq!(shortest_unique_prefix(0, "ab", &folded), None);
        assert_eq!(shortest_unique_prefix(1, "abc", &folded), Some("abc"));
    }

    #[test]
    fn display_entries_keep_order() {
        let listing = entries(&[BD, ABC]);
        let short_ids = ShortIds::compute(&listing).unwrap();
        let displayed = display_entries(listing, &short_ids);
        assert_eq!(displayed[0].short_id, "b");
        assert_eq!(displayed[1].short_id, "a");
    }
}
