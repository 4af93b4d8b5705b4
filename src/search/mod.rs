//! Full-text search: every `STRING`/`TAG` value is tokenized into its
//! substrings ("infixes") so a caller can later find a record by any
//! contiguous fragment of a value, not just its prefix. The query side
//! (`phrase_match`) tokenizes the query the same way and only matches
//! records where the query's words occur at consecutive ordinal positions
//! in the indexed field — `"quick brown"` hits `"the quick brown fox"`,
//! `"fox quick"` does not, since it would require position `p+1` to sit
//! before position `p`.

mod indexer;
mod tokenizer;

pub use indexer::Indexer;
pub use tokenizer::{infixes, words};

use std::collections::{BTreeMap, BTreeSet};

use crate::{codec::value::PrimaryKey, codec::Text, revision::Action, revision::Revision};

/// Records whose `field` holds `query` as an ordered run of words, given
/// every posting revision (Corpus shape) relevant to those words. `postings`
/// may contain postings for fields other than `field` and for other terms;
/// only the ones that match are considered.
pub fn phrase_match(field: &Text, query: &str, postings: &[Revision]) -> Vec<PrimaryKey> {
    let words: Vec<String> = tokenizer::words(query).into_iter().map(|(w, _)| w).collect();
    if words.is_empty() {
        return Vec::new();
    }

    // by_word[i]: record -> positions where query word i is present in
    // `field`, folding ADD/REMOVE in version order (oldest first) so a
    // later REMOVE retracts an earlier ADD of the same position.
    let mut by_word: Vec<BTreeMap<PrimaryKey, BTreeSet<i32>>> = vec![BTreeMap::new(); words.len()];

    let mut ordered: Vec<&Revision> = postings.iter().collect();
    ordered.sort_by_key(|r| r.version);

    for revision in ordered {
        let Some(slot) = words.iter().position(|w| w == revision.key().as_str()) else {
            continue;
        };
        let Some((posting_field, position)) = indexer::decode_posting(revision.value()) else {
            continue;
        };
        if posting_field != field.as_str() {
            continue;
        }
        let positions = by_word[slot].entry(revision.record()).or_default();
        match revision.action() {
            Action::Add => {
                positions.insert(position);
            }
            Action::Remove => {
                positions.remove(&position);
            }
            Action::Compare => (),
        }
    }

    let mut hits = BTreeSet::new();
    if let Some(first) = by_word.first() {
        for (&record, starts) in first {
            let matches_at = |start: i32| {
                by_word.iter().enumerate().all(|(offset, positions)| {
                    positions.get(&record).map_or(false, |set| set.contains(&(start + offset as i32)))
                })
            };
            if starts.iter().any(|&start| matches_at(start)) {
                hits.insert(record);
            }
        }
    }
    hits.into_iter().collect()
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;
