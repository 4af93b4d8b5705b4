use super::*;
use crate::{
    codec::Value,
    revision::Write as RWrite,
};

/// Build the postings `tokenize` would have produced for `text`, without
/// going through the indexer's worker pool.
fn postings_for(text: &str, field: &str, record: i64, version: i64) -> Vec<Revision> {
    infixes(text)
        .into_iter()
        .filter_map(|(term, position)| {
            let term_key = Text::new(term).ok()?;
            let value = Value::Str(format!("{}:{}", field, position));
            Some(Revision::new(RWrite::add(record, term_key, value), version))
        })
        .collect()
}

#[test]
fn test_phrase_in_order_matches() {
    let postings = postings_for("the quick brown fox", "bio", 5, 1);
    let hits = phrase_match(&Text::new("bio").unwrap(), "quick brown", &postings);
    assert_eq!(hits, vec![5]);
}

#[test]
fn test_phrase_reversed_does_not_match() {
    let postings = postings_for("the quick brown fox", "bio", 5, 1);
    let hits = phrase_match(&Text::new("bio").unwrap(), "fox quick", &postings);
    assert!(hits.is_empty());
}

#[test]
fn test_phrase_wrong_field_does_not_match() {
    let postings = postings_for("the quick brown fox", "bio", 5, 1);
    let hits = phrase_match(&Text::new("summary").unwrap(), "quick brown", &postings);
    assert!(hits.is_empty());
}

#[test]
fn test_removed_word_no_longer_matches() {
    let mut postings = postings_for("the quick brown fox", "bio", 5, 1);
    // Retract "brown" at its position (2): an ADD at version 1, REMOVE at version 2.
    postings.push(Revision::new(RWrite::remove(5, Text::new("brown").unwrap(), Value::Str("bio:2".into())), 2));
    let hits = phrase_match(&Text::new("bio").unwrap(), "quick brown", &postings);
    assert!(hits.is_empty());
}
