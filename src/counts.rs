//! src/counts.rs
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Token frequency mapping, for one chunk (partial count) or a whole source
/// document (aggregate count).
///
/// A `BTreeMap` keeps keys in lexicographic order, so serializing one always
/// yields the same bytes for the same counts. The order carries no meaning;
/// it exists for reproducibility.
pub type TokenCounts = BTreeMap<String, u64>;

static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9']+").expect("token pattern is valid"));

/// Count every maximal run of alphanumerics and apostrophes, folded to
/// lowercase.
pub fn count_tokens(text: &str) -> TokenCounts {
    let mut counts = TokenCounts::new();
    for token in TOKEN_PATTERN.find_iter(text) {
        *counts.entry(token.as_str().to_lowercase()).or_insert(0) += 1;
    }
    counts
}

/// Sum token counts across any number of mappings.
///
/// Commutative and associative with the empty mapping as identity, so a
/// reduction over partial counts does not depend on the order they arrive in.
pub fn merge_counts<I>(parts: I) -> TokenCounts
where
    I: IntoIterator<Item = TokenCounts>,
{
    let mut total = TokenCounts::new();
    for part in parts {
        for (token, count) in part {
            *total.entry(token).or_insert(0) += count;
        }
    }
    total
}
