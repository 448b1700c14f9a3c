// WHY: Centralized suppression rules so a period inside "Dr. Smith" or
// "e.g. this" never ends a sentence

use std::collections::HashSet;

/// Words whose trailing period is part of the word, not a sentence boundary.
/// Compared case-insensitively against the word ending at the candidate period.
pub const KNOWN_ABBREVIATIONS: &[&str] = &[
    "mr.", "mrs.", "ms.", "dr.", "prof.", "sr.", "jr.", "st.", "vs.", "etc.", "e.g.", "i.e.",
    "cf.", "al.", "inc.", "fig.", "no.", "vol.", "approx.",
];

/// Decides whether the word ending at a candidate `.` boundary suppresses the
/// split. `!` and `?` candidates never reach this check.
pub struct AbbreviationChecker {
    abbreviations: HashSet<&'static str>,
}

impl AbbreviationChecker {
    pub fn new() -> Self {
        Self {
            abbreviations: KNOWN_ABBREVIATIONS.iter().copied().collect(),
        }
    }

    /// True when `word` (the whitespace-delimited token ending at the
    /// candidate period, final period included) must not split the sentence.
    pub fn suppresses_boundary(&self, word: &str) -> bool {
        // Quotes around the token don't change what the period belongs to
        let clean = word.trim_matches(|c: char| {
            matches!(c, '"' | '\'' | '\u{201C}' | '\u{201D}' | '\u{2018}' | '\u{2019}')
        });

        self.is_known_abbreviation(clean)
            || Self::is_single_letter_initial(clean)
            || Self::has_interior_period(clean)
    }

    fn is_known_abbreviation(&self, word: &str) -> bool {
        self.abbreviations.contains(word.to_lowercase().as_str())
    }

    /// Single-letter initials such as "A." in "A. B. Smith"
    fn is_single_letter_initial(word: &str) -> bool {
        let mut chars = word.chars();
        matches!(
            (chars.next(), chars.next(), chars.next()),
            (Some(first), Some('.'), None) if first.is_alphabetic()
        )
    }

    /// Multi-part abbreviations such as "U.S.A." where the last four
    /// characters form letter-period-letter-period
    fn has_interior_period(word: &str) -> bool {
        let chars: Vec<char> = word.chars().collect();
        let n = chars.len();
        n >= 4
            && chars[n - 1] == '.'
            && chars[n - 2].is_alphanumeric()
            && chars[n - 3] == '.'
            && chars[n - 4].is_alphanumeric()
    }
}

impl Default for AbbreviationChecker {
    fn default() -> Self {
        Self::new()
    }
}
