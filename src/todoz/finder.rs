//! Resolves a user-typed token to at most one entry of a listing.
//!
//! Strategies are tried in order and the first one that matches wins:
//!
//! 1. [`MatchStrategy::ShortId`]: the token equals a short id (ignoring case).
//! 2. [`MatchStrategy::IdSubstring`]: the token is contained in a full id.
//! 3. [`MatchStrategy::TitleSubstring`]: the token is contained in a title.
//!
//! Within a strategy the first entry in listing order wins. Listing order is
//! directory order, so ties are not stable across filesystems.

use crate::model::Entry;
use crate::short_id::ShortIds;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrategy {
    ShortId,
    IdSubstring,
    TitleSubstring,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Found<'a> {
    pub entry: &'a Entry,
    pub short_id: String,
    pub strategy: MatchStrategy,
}

pub fn find<'a>(entries: &'a [Entry], short_ids: &ShortIds, token: &str) -> Option<Found<'a>> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    let needle = token.to_lowercase();

    let by_short_id = short_ids.full_id_for(token).and_then(|full| {
        entries
            .iter()
            .find(|entry| entry.id_string().eq_ignore_ascii_case(full))
    });

    let (entry, strategy) = if let Some(entry) = by_short_id {
        (entry, MatchStrategy::ShortId)
    } else if let Some(entry) = entries
        .iter()
        .find(|entry| entry.id_string().to_lowercase().contains(&needle))
    {
        (entry, MatchStrategy::IdSubstring)
    } else {
        let entry = entries
            .iter()
            .find(|entry| entry.title.to_lowercase().contains(&needle))?;
        (entry, MatchStrategy::TitleSubstring)
    };

    Some(Found {
        entry,
        short_id: short_ids.of(entry).to_string(),
        strategy,
    })
}
