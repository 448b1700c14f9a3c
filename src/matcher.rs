// WHY: One full cross-product pass with set-keyed deduplication, so the match
// list is deterministic and never carries the same sentence pair twice

use std::collections::HashSet;

use anyhow::Result;
use thiserror::Error;
use tracing::{debug, info};

use crate::segmenter::{Document, Sentence};
use crate::similarity::{Metric, MetricParams};

/// Construction-time validation failure for a plagiarism match
#[derive(Debug, Error, PartialEq)]
pub enum InvalidMatchError {
    #[error("input sentence text is empty")]
    EmptyInputSentence,
    #[error("reference sentence text is empty")]
    EmptyReferenceSentence,
    #[error("reference document name is empty")]
    EmptyReferenceDocument,
    #[error("similarity score {0} is outside [0, 1]")]
    ScoreOutOfRange(f64),
}

/// A sentence pair scored at or above the configured threshold.
///
/// Fields are private so a match can only exist in a validated state; it is
/// read-only after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct PlagiarismMatch {
    input: Sentence,
    reference: Sentence,
    reference_document: String,
    similarity_score: f64,
    metric: Metric,
}

impl PlagiarismMatch {
    pub fn new(
        input: Sentence,
        reference: Sentence,
        reference_document: String,
        similarity_score: f64,
        metric: Metric,
    ) -> Result<Self, InvalidMatchError> {
        if input.text.is_empty() {
            return Err(InvalidMatchError::EmptyInputSentence);
        }
        if reference.text.is_empty() {
            return Err(InvalidMatchError::EmptyReferenceSentence);
        }
        if reference_document.is_empty() {
            return Err(InvalidMatchError::EmptyReferenceDocument);
        }
        if !(0.0..=1.0).contains(&similarity_score) {
            return Err(InvalidMatchError::ScoreOutOfRange(similarity_score));
        }
        Ok(Self {
            input,
            reference,
            reference_document,
            similarity_score,
            metric,
        })
    }

    pub fn input(&self) -> &Sentence {
        &self.input
    }

    pub fn reference(&self) -> &Sentence {
        &self.reference
    }

    pub fn reference_document(&self) -> &str {
        &self.reference_document
    }

    pub fn similarity_score(&self) -> f64 {
        self.similarity_score
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }
}

/// Explicit configuration value object passed into the matcher at call time.
#[derive(Debug, Clone)]
pub struct MatchConfig {
    /// Minimum similarity score for a pair to be reported
    pub threshold: f64,
    /// Minimum trimmed sentence length (chars) to enter comparison
    pub min_sentence_length: usize,
    pub metric: Metric,
    pub params: MetricParams,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            threshold: 0.8,
            min_sentence_length: 10,
            metric: Metric::Jaccard,
            params: MetricParams::default(),
        }
    }
}

impl MatchConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            anyhow::bail!("similarity threshold must be in [0, 1], got {}", self.threshold);
        }
        Ok(())
    }
}

/// Compare every input sentence against every sentence of every reference
/// document, keeping pairs whose score reaches the threshold.
///
/// Output order is deterministic: input sentence index ascending, then
/// reference documents in provided order, then reference sentence index
/// ascending. A given (input index, reference document, reference index)
/// triple appears at most once.
pub fn find_matches(
    input_sentences: &[Sentence],
    references: &[Document],
    config: &MatchConfig,
) -> Result<Vec<PlagiarismMatch>> {
    config.validate()?;

    let total_refs: usize = references.iter().map(|d| d.sentences.len()).sum();
    debug!(
        "Comparing {} input sentences against {} reference sentences with {}",
        input_sentences.len(),
        total_refs,
        config.metric
    );

    let mut matches = Vec::new();
    let mut seen: HashSet<(usize, &str, usize)> = HashSet::new();

    for input in input_sentences {
        for document in references {
            for reference in &document.sentences {
                let score = config
                    .metric
                    .score(&input.text, &reference.text, &config.params);
                if score < config.threshold {
                    continue;
                }
                if !seen.insert((input.index, document.name.as_str(), reference.index)) {
                    continue;
                }
                matches.push(PlagiarismMatch::new(
                    input.clone(),
                    reference.clone(),
                    document.name.clone(),
                    score,
                    config.metric,
                )?);
            }
        }
    }

    info!("Found {} matches at threshold {}", matches.len(), config.threshold);
    Ok(matches)
}
