//! Movement name resolution against a dictionary.
//!
//! Matching is exact after normalization (lower-case, one trailing `s`
//! stripped) against canonical names first and aliases second. There is
//! no fuzzy matching: an unknown phrase always falls back to a title-cased
//! copy of itself so the same input always yields the same name.

use crate::MovementEntry;

/// Outcome of resolving one movement phrase
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution<'d> {
    /// Canonical name, or the title-cased fallback
    pub name: String,
    /// Matched dictionary entry, if any
    pub entry: Option<&'d MovementEntry>,
}

impl Resolution<'_> {
    pub fn is_match(&self) -> bool {
        self.entry.is_some()
    }

    /// Catalog identifier of the matched entry
    pub fn movement_id(&self) -> Option<&str> {
        self.entry.and_then(|e| e.id.as_deref())
    }
}

/// Lower-case and drop a single trailing `s`
pub fn normalize(phrase: &str) -> String {
    let mut key = phrase.trim().to_lowercase();
    if key.ends_with('s') {
        key.pop();
    }
    key
}

/// Upper-case the first character of a word and keep the rest as typed
///
/// This is the only word-casing rule in the crate: `kb` becomes `Kb`, `KB`
/// stays `KB`. Callers that want `Even` from `EVEN` lower-case first.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `capitalize` every whitespace-separated token
pub fn title_case(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolves phrases against a borrowed movement dictionary
#[derive(Clone, Copy, Debug)]
pub struct MovementResolver<'d> {
    entries: &'d [MovementEntry],
}

impl<'d> MovementResolver<'d> {
    pub fn new(entries: &'d [MovementEntry]) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &'d [MovementEntry] {
        self.entries
    }

    /// Find the dictionary entry for a phrase, names before aliases
    pub fn lookup(&self, phrase: &str) -> Option<&'d MovementEntry> {
        let key = normalize(phrase);
        if key.is_empty() {
            return None;
        }

        self.entries
            .iter()
            .find(|entry| normalize(&entry.name) == key)
            .or_else(|| {
                self.entries
                    .iter()
                    .find(|entry| entry.aliases.iter().any(|alias| normalize(alias) == key))
            })
    }

    /// Resolve a phrase, falling back to a title-cased name
    pub fn resolve(&self, phrase: &str) -> Resolution<'d> {
        match self.lookup(phrase) {
            Some(entry) => Resolution {
                name: entry.name.clone(),
                entry: Some(entry),
            },
            None => {
                tracing::debug!("No dictionary match for {:?}, using fallback name", phrase);
                Resolution {
                    name: title_case(phrase),
                    entry: None,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dictionary() -> Vec<MovementEntry> {
        vec![
            MovementEntry {
                id: Some("thruster".into()),
                ..MovementEntry::new("Thruster").with_aliases(["barbell thruster"])
            },
            MovementEntry::new("Pull-up").with_aliases(["pullup", "chin-over-bar pull-up"]),
            MovementEntry::new("Toes-to-Bar").with_aliases(["t2b", "ttb"]),
            MovementEntry::new("Burpee Pull-up").with_aliases(["pull-up"]),
        ]
    }

    #[test]
    fn test_exact_name_case_insensitive() {
        let entries = dictionary();
        let resolver = MovementResolver::new(&entries);

        let resolution = resolver.resolve("THRUSTER");
        assert_eq!(resolution.name, "Thruster");
        assert_eq!(resolution.movement_id(), Some("thruster"));
    }

    #[test]
    fn test_trailing_plural_stripped() {
        let entries = dictionary();
        let resolver = MovementResolver::new(&entries);

        assert_eq!(resolver.resolve("Thrusters").name, "Thruster");
        assert_eq!(resolver.resolve("pull-ups").name, "Pull-up");
    }

    #[test]
    fn test_alias_match() {
        let entries = dictionary();
        let resolver = MovementResolver::new(&entries);

        assert_eq!(resolver.resolve("T2B").name, "Toes-to-Bar");
        assert_eq!(resolver.resolve("pullups").name, "Pull-up");
    }

    #[test]
    fn test_names_win_over_aliases() {
        let entries = dictionary();
        let resolver = MovementResolver::new(&entries);

        // "pull-up" is both a canonical name and another entry's alias
        assert_eq!(resolver.resolve("Pull-up").name, "Pull-up");
    }

    #[test]
    fn test_unknown_falls_back_to_title_case() {
        let entries = dictionary();
        let resolver = MovementResolver::new(&entries);

        let resolution = resolver.resolve("unicorn lunges");
        assert!(!resolution.is_match());
        assert_eq!(resolution.name, "Unicorn Lunges");
        assert_eq!(resolution.movement_id(), None);
    }

    #[test]
    fn test_casing_keeps_typed_capitals() {
        assert_eq!(capitalize("kb"), "Kb");
        assert_eq!(capitalize("KB"), "KB");
        assert_eq!(capitalize(""), "");
        assert_eq!(title_case("  KB  swings "), "KB Swings");
        assert_eq!(title_case("ghd sit-ups"), "Ghd Sit-ups");
    }

    #[test]
    fn test_no_fuzzy_matching() {
        let entries = dictionary();
        let resolver = MovementResolver::new(&entries);

        assert!(!resolver.resolve("Thruster!").is_match());
        assert!(!resolver.resolve("Thrustr").is_match());
    }

    #[test]
    fn test_empty_dictionary() {
        let resolver = MovementResolver::new(&[]);
        assert_eq!(resolver.resolve("KB   swings").name, "KB Swings");
        assert_eq!(resolver.resolve("").name, "");
    }
}
