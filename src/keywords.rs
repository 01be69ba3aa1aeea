//! Pure text-analysis helpers shared by the insight engine and the live memory-hints
//! lookup. Grounded on the teacher's preference for small pure helper modules (the
//! `RateLimiter::check_with_info` style of a self-contained function over shared state)
//! and on `regex` for line-oriented scanning, the way the pack's agent-orchestration
//! examples parse structured text out of free-form notes.

use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

/// ~110 common English stop-words plus conversational filler, per the glossary.
const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "are", "but", "not", "you", "all", "any", "can", "had", "her",
    "was", "one", "our", "out", "day", "get", "has", "him", "his", "how", "man", "new",
    "now", "old", "see", "two", "way", "who", "boy", "did", "its", "let", "put", "say",
    "she", "too", "use", "that", "with", "have", "this", "will", "your", "from", "they",
    "know", "want", "been", "good", "much", "some", "time", "very", "when", "come",
    "here", "just", "like", "long", "make", "many", "over", "such", "take", "than",
    "them", "well", "were", "what", "about", "after", "again", "could", "every", "first",
    "found", "great", "house", "large", "learn", "never", "other", "place", "right",
    "small", "sound", "spell", "still", "study", "their", "there", "these", "thing",
    "think", "three", "water", "where", "which", "world", "would", "write", "should",
    "because", "between", "something", "through", "really", "actually", "maybe", "going",
    "around", "together", "little", "people", "before", "those", "while", "during",
    "might", "same", "said", "look", "also", "into", "only", "then",
];

static STOP_WORDS_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STOP_WORDS.iter().copied().collect());

static ATTENDEES_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)attendees?\s*:\s*(.+)").unwrap());

static SPEAKER_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^([a-z]{2,15}):").unwrap());

/// Normalizes to `[a-z0-9 \t\n]`, drops short/stop tokens, returns the top-20 tokens by
/// descending frequency.
pub fn keywords(text: &str) -> Vec<String> {
    let normalized: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == ' ' || c == '\t' || c == '\n' {
                c
            } else {
                ' '
            }
        })
        .collect();

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for token in normalized.split_whitespace() {
        if token.len() > 3 && !STOP_WORDS_SET.contains(token) {
            *counts.entry(token).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked.into_iter().take(20).map(|(t, _)| t.to_string()).collect()
}

/// Returns the keyword set of `text` as a `HashSet`, for overlap comparisons.
pub fn keyword_set(text: &str) -> HashSet<String> {
    keywords(text).into_iter().collect()
}

/// Union of two noisy heuristics: an "Attendees:" line, and speaker-prefix lines
/// (`name:`). Output is lowercase and deliberately noisy — callers treat overlap, not
/// exact match, as signal.
pub fn people(text: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    let mut seen = HashSet::new();

    if let Some(caps) = ATTENDEES_LINE_RE.captures(text) {
        let list = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        for entry in list.split(|c| c == ',' || c == ';' || c == '&') {
            let name = entry.trim().split_whitespace().next().unwrap_or("");
            let name = name.to_lowercase();
            if name.len() >= 2 && name.len() <= 19 && seen.insert(name.clone()) {
                found.push(name);
            }
        }
    }

    for caps in SPEAKER_PREFIX_RE.captures_iter(text) {
        let name = caps.get(1).map(|m| m.as_str().to_lowercase()).unwrap_or_default();
        if !name.is_empty() && seen.insert(name.clone()) {
            found.push(name);
        }
    }

    found
}

pub fn titlecase(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
