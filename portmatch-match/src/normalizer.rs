//! Canonical comparison keys for free-text game titles.
//!
//! Storefronts and the catalog disagree on punctuation, articles and
//! spacing:
//! ```text
//! The Witcher 3: Wild Hunt   →  witcher 3 wild hunt
//! Witcher 3 - Wild Hunt      →  witcher 3 wild hunt
//! ```

/// Words dropped when they appear standalone.
pub const STOPWORDS: &[&str] = &[
    "the", "a", "an", "of", "in", "on", "at", "to", "for", "with", "by", "and", "&",
];

/// Map a raw title to its comparison key.
///
/// Lowercases, turns every character that is not a letter, digit or
/// whitespace into a space (as well as uppercase letters that have no
/// lowercase form), drops [`STOPWORDS`], then collapses whitespace.
/// An empty result means the title carries no comparable signal.
///
/// # Examples
///
/// ```
/// use portmatch_match::normalize;
///
/// assert_eq!(normalize("The Witcher 3: Wild Hunt"), "witcher 3 wild hunt");
/// assert_eq!(normalize("Tom & Jerry"), "tom jerry");
/// assert_eq!(normalize("  "), "");
/// ```
pub fn normalize(title: &str) -> String {
    let cleaned: String = title
        .to_lowercase()
        .chars()
        .map(|c| {
            // Some uppercase letters have no lowercase form (e.g. ℂ).
            if (c.is_alphanumeric() && !c.is_uppercase()) || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    cleaned
        .split_whitespace()
        .filter(|word| !STOPWORDS.contains(word))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lowercase a title and remove every whitespace character.
///
/// Punctuation is kept, so `"A Short Hike"` and `"AShortHike"` agree while
/// `"Hike!"` and `"Hike"` do not.
pub fn strip_whitespace(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

#[cfg(test)]
#[path = "tests/normalizer_tests.rs"]
mod tests;
