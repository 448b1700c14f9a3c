// WHY: DFA-scanned boundary candidates plus abbreviation suppression keep the
// split O(n) while never breaking on "Dr. Smith" or "e.g. this"

use anyhow::Result;
use regex_automata::{
    dfa::{dense::DFA, Automaton},
    Input,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub mod abbreviations;
pub use abbreviations::AbbreviationChecker;

/// A sentence extracted from a document, with its location in the source text.
///
/// `start`/`end` are half-open byte offsets into the original (untrimmed)
/// document, so `&document[start..end]` always equals `text` exactly. `index`
/// is the dense zero-based position among kept sentences, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    pub text: String,
    pub start: usize,
    pub end: usize,
    pub index: usize,
}

/// A named document and the sentences extracted from it.
#[derive(Debug, Clone)]
pub struct Document {
    pub name: String,
    pub sentences: Vec<Sentence>,
}

/// Splits raw text into sentences with source offsets.
pub struct Segmenter {
    /// Compiled DFA matching end punctuation followed by whitespace
    boundary_dfa: DFA<Vec<u32>>,
    abbreviations: AbbreviationChecker,
}

impl Segmenter {
    pub fn new() -> Result<Self> {
        debug!("Compiling sentence boundary DFA");
        let boundary_dfa = DFA::new(r"[.!?]\s")?;
        Ok(Self {
            boundary_dfa,
            abbreviations: AbbreviationChecker::new(),
        })
    }

    /// Split `text` into trimmed sentences with spans into the original text.
    ///
    /// Sentences whose trimmed length is below `min_length` chars are dropped
    /// entirely and the survivors renumbered densely. Deterministic: the same
    /// input always yields the same output.
    pub fn segment(&self, text: &str, min_length: usize) -> Result<Vec<Sentence>> {
        debug!("Segmenting {} bytes of text", text.len());

        let bytes = text.as_bytes();
        let mut regions: Vec<(usize, usize)> = Vec::new();

        let mut cursor = 0; // start of the current sentence region
        let mut search = 0;

        while search < bytes.len() {
            let input = Input::new(&bytes[search..]);
            let Some(half_match) = self.boundary_dfa.try_search_fwd(&input)? else {
                break;
            };
            // Offset is the end of "[.!?]\s"; walk back over the whitespace
            // char to the punctuation that closes the sentence
            let match_end = search + half_match.offset();
            let mut punct = match_end - 1;
            while !matches!(bytes[punct], b'.' | b'!' | b'?') {
                punct -= 1;
            }

            if bytes[punct] == b'.' && self.suppressed_at(text, punct) {
                search = match_end;
                continue;
            }

            regions.push((cursor, punct + 1));
            cursor = match_end;
            search = match_end;
        }

        // Text after the last boundary is one final sentence
        if cursor < bytes.len() {
            regions.push((cursor, bytes.len()));
        }

        let mut sentences = Vec::with_capacity(regions.len());
        for (region_start, region_end) in regions {
            let raw = &text[region_start..region_end];
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.chars().count() < min_length {
                continue;
            }
            let leading = raw.len() - raw.trim_start().len();
            let start = region_start + leading;
            sentences.push(Sentence {
                text: trimmed.to_string(),
                start,
                end: start + trimmed.len(),
                index: sentences.len(),
            });
        }

        info!("Segmented text into {} sentences", sentences.len());
        Ok(sentences)
    }

    /// Segment a whole document, pairing its name with the extracted sentences.
    pub fn segment_document(&self, name: &str, text: &str, min_length: usize) -> Result<Document> {
        Ok(Document {
            name: name.to_string(),
            sentences: self.segment(text, min_length)?,
        })
    }

    /// Whether the word ending at the period at byte `punct` suppresses the
    /// boundary (initials, known abbreviations, multi-part abbreviations).
    fn suppressed_at(&self, text: &str, punct: usize) -> bool {
        let head = &text[..=punct];
        match head.split_whitespace().last() {
            Some(word) => self.abbreviations.suppresses_boundary(word),
            None => false,
        }
    }
}
