//! Hashtag extraction and frequency counting.
//!
//! A hashtag is a `#` followed by one or more ASCII letters, digits or
//! underscores. Tags are compared lower-cased and without the leading `#`.

use std::collections::HashMap;

use domains::HashtagCount;
use once_cell::sync::Lazy;
use regex::Regex;

static HASHTAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#[A-Za-z0-9_]+").expect("hashtag pattern is valid"));

/// Maximum number of tags returned by a frequency search.
pub const TOP_HASHTAGS: usize = 10;

/// Lower-cased tags in `content`, in order of appearance, duplicates kept.
pub fn extract_hashtags(content: &str) -> impl Iterator<Item = String> + '_ {
    HASHTAG
        .find_iter(content)
        .map(|m| m.as_str()[1..].to_lowercase())
}

/// Accepts `rust`, `#rust` or `#Rust` and yields `rust`.
pub fn normalize_tag(raw: &str) -> String {
    raw.trim().trim_start_matches('#').to_lowercase()
}

/// True when `content` carries `#tag` as a whole token, ignoring case.
/// `#java` does not match a post that only mentions `#javascript`.
pub fn has_hashtag(content: &str, tag: &str) -> bool {
    let wanted = normalize_tag(tag);
    !wanted.is_empty() && extract_hashtags(content).any(|t| t == wanted)
}

/// Counts every occurrence of every tag containing `query` (case-insensitive
/// substring) and returns the most frequent ones.
///
/// Ties are ordered by tag name so the output is deterministic.
pub fn top_matching_hashtags<'a, I>(contents: I, query: &str, limit: usize) -> Vec<HashtagCount>
where
    I: IntoIterator<Item = &'a str>,
{
    let needle = query.trim().to_lowercase();
    let mut counts: HashMap<String, u64> = HashMap::new();

    for content in contents {
        for tag in extract_hashtags(content).filter(|t| t.contains(&needle)) {
            *counts.entry(tag).or_default() += 1;
        }
    }

    let mut ranked: Vec<HashtagCount> = counts
        .into_iter()
        .map(|(name, count)| HashtagCount { name, count })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    ranked.truncate(limit);
    ranked
}
