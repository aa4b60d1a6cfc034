//! Syllable tables and string shaping for monster names.
//!
//! The chain alternates between consonant-ish and vowel-ish tokens: the
//! table for the next token depends on whether the name so far ends in a
//! vowel.

use rand::Rng;

use crate::weighted::weighted_choice;

/// Opening tokens.
const START: &[(&str, f64)] = &[
    ("b", 5.0), ("br", 3.0), ("bl", 3.0), ("c", 6.0), ("ch", 4.0), ("cl", 3.0),
    ("cr", 3.0), ("d", 5.0), ("dr", 3.0), ("f", 4.0), ("fr", 3.0), ("g", 4.0),
    ("gr", 3.0), ("h", 3.0), ("j", 2.0), ("k", 4.0), ("kr", 2.0), ("l", 5.0),
    ("m", 5.0), ("n", 5.0), ("p", 5.0), ("pr", 3.0), ("q", 1.0), ("r", 5.0),
    ("s", 6.0), ("sh", 3.0), ("st", 4.0), ("t", 6.0), ("tr", 3.0), ("v", 3.0),
    ("w", 3.0), ("y", 2.0), ("z", 2.0), ("a", 8.0), ("e", 8.0), ("i", 7.0),
    ("o", 8.0), ("u", 7.0),
];

/// Tokens following a vowel, mostly consonants.
const AFTER_VOWEL: &[(&str, f64)] = &[
    ("n", 8.0), ("m", 7.0), ("r", 9.0), ("s", 9.0), ("th", 4.0), ("k", 7.0),
    ("l", 8.0), ("d", 7.0), ("t", 8.0), ("sh", 5.0), ("x", 3.0), ("z", 4.0),
    ("b", 6.0), ("c", 6.0), ("f", 5.0), ("g", 5.0), ("p", 6.0), ("v", 4.0),
    ("a", 1.0), ("e", 1.0), ("i", 1.0), ("o", 1.0), ("u", 1.0),
];

/// Tokens following a consonant: vowels and diphthongs.
const AFTER_CONSONANT: &[(&str, f64)] = &[
    ("a", 10.0), ("e", 10.0), ("i", 9.0), ("o", 10.0), ("u", 9.0), ("y", 4.0),
    ("ae", 3.0), ("io", 3.0), ("ea", 3.0), ("ai", 3.0), ("ou", 3.0), ("ua", 2.0),
];

/// Flavor used when a type has no pools of its own.
pub const GENERIC_PREFIXES: &[&str] = &["Omni", "Null", "Eth", "Anom"];
pub const GENERIC_SUFFIXES: &[&str] = &["us", "ex", "ion", "oid"];

/// Drawn from when none of the applied mutagens carries an epithet.
pub const GENERIC_EPITHETS: &[&str] = &[
    "the Wanderer",
    "the Hidden",
    "the Silent",
    "the Brute",
    "the Shard",
    "the Lonesome",
    "the Gleaming",
    "the Hollow",
    "the Forgotten",
    "the Lost",
    "the Sentinel",
];

const ARTICLES: &[&str] = &["the", "of", "a", "an"];

fn ends_with_vowel(s: &str) -> bool {
    s.chars()
        .last()
        .is_some_and(|c| matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u'))
}

fn pick(table: &'static [(&'static str, f64)], rng: &mut impl Rng) -> &'static str {
    // tables are constant and positive
    weighted_choice(table.iter().copied(), rng).unwrap_or("a")
}

/// The next chain token given what has been built so far.
pub fn next_token(so_far: &str, rng: &mut impl Rng) -> &'static str {
    if so_far.is_empty() {
        pick(START, rng)
    } else if ends_with_vowel(so_far) {
        pick(AFTER_VOWEL, rng)
    } else {
        pick(AFTER_CONSONANT, rng)
    }
}

/// Concatenate `tokens` chain tokens.
pub fn syllable_chain(tokens: usize, rng: &mut impl Rng) -> String {
    let mut name = String::new();
    for _ in 0..tokens {
        let token = next_token(&name, rng);
        name.push_str(token);
    }
    name
}

/// Uppercase the first letter, lowercase the rest.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Shorten any run of three or more identical letters to two.
pub fn collapse_repeats(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev: Option<char> = None;
    let mut run = 0;
    for c in s.chars() {
        let lower = c.to_ascii_lowercase();
        if prev == Some(lower) {
            run += 1;
        } else {
            prev = Some(lower);
            run = 1;
        }
        if run <= 2 {
            out.push(c);
        }
    }
    out
}

pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Attach an epithet to a base name.
///
/// Compound modifiers ("Cinder-Wake") and phrases that already carry an
/// article ("the Hidden", "of Stellar Origin") are joined with a space;
/// bare words get ", the ".
pub fn join_epithet(base: &str, epithet: &str) -> String {
    let reads_as_modifier = epithet.contains('-')
        || epithet
            .split_whitespace()
            .any(|w| ARTICLES.contains(&w.to_lowercase().as_str()));
    if reads_as_modifier {
        format!("{base} {epithet}")
    } else {
        format!("{base}, the {epithet}")
    }
}
