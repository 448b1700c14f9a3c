// WHY: All metrics are pure functions over plain strings so the matcher can
// cross-compare sentence pairs without any shared state

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Requested metric name is not one of the recognized set
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown similarity metric: {0}")]
pub struct UnknownMetricError(pub String);

/// Recognized similarity metrics.
///
/// Jaccard, Sorensen-Dice, and Cosine are symmetric. Tversky is symmetric only
/// when alpha == beta. Overlap normalizes by the smaller token set, so swapping
/// arguments of different sizes is directional by design. Jaro and Jaro-Winkler
/// are computed symmetrically but grouped with the character-level metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    #[serde(rename = "jaccard_similarity")]
    Jaccard,
    #[serde(rename = "sorensen_dice_similarity")]
    SorensenDice,
    #[serde(rename = "overlap_similarity")]
    Overlap,
    #[serde(rename = "tversky_similarity")]
    Tversky,
    #[serde(rename = "cosine_similarity")]
    Cosine,
    #[serde(rename = "jaro_similarity")]
    Jaro,
    #[serde(rename = "jaro_winkler_similarity")]
    JaroWinkler,
}

/// Metric-specific parameters. Only Tversky consumes them; alpha and beta
/// default to 0.5 each, which reduces Tversky to Dice-like behavior.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricParams {
    pub alpha: f64,
    pub beta: f64,
}

impl Default for MetricParams {
    fn default() -> Self {
        Self {
            alpha: 0.5,
            beta: 0.5,
        }
    }
}

impl Metric {
    /// All recognized metric names, in declaration order.
    pub const NAMES: &'static [&'static str] = &[
        "jaccard_similarity",
        "sorensen_dice_similarity",
        "overlap_similarity",
        "tversky_similarity",
        "cosine_similarity",
        "jaro_similarity",
        "jaro_winkler_similarity",
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Metric::Jaccard => "jaccard_similarity",
            Metric::SorensenDice => "sorensen_dice_similarity",
            Metric::Overlap => "overlap_similarity",
            Metric::Tversky => "tversky_similarity",
            Metric::Cosine => "cosine_similarity",
            Metric::Jaro => "jaro_similarity",
            Metric::JaroWinkler => "jaro_winkler_similarity",
        }
    }

    /// Compute the similarity of two sentences in [0, 1].
    ///
    /// Token-based metrics lowercase and strip punctuation before building
    /// word sets or term-frequency vectors; Jaro variants compare the raw
    /// character sequences. Every zero-denominator case is defined as 0.0.
    pub fn score(&self, a: &str, b: &str, params: &MetricParams) -> f64 {
        match self {
            Metric::Jaro => jaro(a, b),
            Metric::JaroWinkler => jaro_winkler(a, b),
            Metric::Cosine => {
                let tokens_a = tokenize(a);
                let tokens_b = tokenize(b);
                cosine(&tokens_a, &tokens_b)
            }
            _ => {
                let tokens_a = tokenize(a);
                let tokens_b = tokenize(b);
                let set_a: HashSet<&str> = tokens_a.iter().map(String::as_str).collect();
                let set_b: HashSet<&str> = tokens_b.iter().map(String::as_str).collect();
                match self {
                    Metric::Jaccard => jaccard(&set_a, &set_b),
                    Metric::SorensenDice => sorensen_dice(&set_a, &set_b),
                    Metric::Overlap => overlap(&set_a, &set_b),
                    Metric::Tversky => tversky(&set_a, &set_b, params.alpha, params.beta),
                    _ => unreachable!("character metrics handled above"),
                }
            }
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = UnknownMetricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "jaccard_similarity" => Ok(Metric::Jaccard),
            "sorensen_dice_similarity" => Ok(Metric::SorensenDice),
            "overlap_similarity" => Ok(Metric::Overlap),
            "tversky_similarity" => Ok(Metric::Tversky),
            "cosine_similarity" => Ok(Metric::Cosine),
            "jaro_similarity" => Ok(Metric::Jaro),
            "jaro_winkler_similarity" => Ok(Metric::JaroWinkler),
            other => Err(UnknownMetricError(other.to_string())),
        }
    }
}

/// Lowercased word tokens with punctuation stripped, document order preserved.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|word| !word.is_empty())
        .map(|word| word.to_lowercase())
        .collect()
}

fn jaccard(a: &HashSet<&str>, b: &HashSet<&str>) -> f64 {
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}

fn sorensen_dice(a: &HashSet<&str>, b: &HashSet<&str>) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    2.0 * intersection as f64 / total as f64
}

fn overlap(a: &HashSet<&str>, b: &HashSet<&str>) -> f64 {
    let smaller = a.len().min(b.len());
    if smaller == 0 {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    intersection as f64 / smaller as f64
}

fn tversky(a: &HashSet<&str>, b: &HashSet<&str>, alpha: f64, beta: f64) -> f64 {
    let shared = a.intersection(b).count();
    let intersection = shared as f64;
    let only_a = (a.len() - shared) as f64;
    let only_b = (b.len() - shared) as f64;
    let denominator = intersection + alpha * only_a + beta * only_b;
    if denominator == 0.0 {
        return 0.0;
    }
    intersection / denominator
}

/// Cosine of the term-frequency vectors over the union vocabulary of both
/// token sequences.
fn cosine(tokens_a: &[String], tokens_b: &[String]) -> f64 {
    let counts_a = term_counts(tokens_a);
    let counts_b = term_counts(tokens_b);

    let dot: f64 = counts_a
        .iter()
        .filter_map(|(term, &count_a)| counts_b.get(term).map(|&count_b| count_a * count_b))
        .sum();

    let norm_a: f64 = counts_a.values().map(|c| c * c).sum::<f64>().sqrt();
    let norm_b: f64 = counts_b.values().map(|c| c * c).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

fn term_counts(tokens: &[String]) -> HashMap<&str, f64> {
    let mut counts = HashMap::new();
    for token in tokens {
        *counts.entry(token.as_str()).or_insert(0.0) += 1.0;
    }
    counts
}

/// Standard Jaro similarity over the raw character sequences. Either input
/// empty is defined as 0.0, including both empty.
fn jaro(a: &str, b: &str) -> f64 {
    let s1: Vec<char> = a.chars().collect();
    let s2: Vec<char> = b.chars().collect();

    if s1.is_empty() || s2.is_empty() {
        return 0.0;
    }
    if s1 == s2 {
        return 1.0;
    }

    // Characters count as matching within half the longer length, minus one
    let window = (s1.len().max(s2.len()) / 2).saturating_sub(1);

    let mut matched1 = vec![false; s1.len()];
    let mut matched2 = vec![false; s2.len()];
    let mut matches = 0usize;

    for i in 0..s1.len() {
        let lo = i.saturating_sub(window);
        let hi = (i + window + 1).min(s2.len());
        for j in lo..hi {
            if !matched2[j] && s1[i] == s2[j] {
                matched1[i] = true;
                matched2[j] = true;
                matches += 1;
                break;
            }
        }
    }

    if matches == 0 {
        return 0.0;
    }

    let common1: Vec<char> = s1
        .iter()
        .zip(&matched1)
        .filter(|(_, &hit)| hit)
        .map(|(&c, _)| c)
        .collect();
    let common2: Vec<char> = s2
        .iter()
        .zip(&matched2)
        .filter(|(_, &hit)| hit)
        .map(|(&c, _)| c)
        .collect();

    let transpositions = common1
        .iter()
        .zip(&common2)
        .filter(|(c1, c2)| c1 != c2)
        .count()
        / 2;

    let m = matches as f64;
    (m / s1.len() as f64 + m / s2.len() as f64 + (m - transpositions as f64) / m) / 3.0
}

/// Jaro-Winkler: boosts the Jaro score for a shared prefix of up to four
/// characters with a fixed 0.1 scaling factor.
fn jaro_winkler(a: &str, b: &str) -> f64 {
    const PREFIX_SCALE: f64 = 0.1;
    const MAX_PREFIX: usize = 4;

    let jaro_score = jaro(a, b);

    let prefix = a
        .chars()
        .zip(b.chars())
        .take(MAX_PREFIX)
        .take_while(|(c1, c2)| c1 == c2)
        .count();

    jaro_score + prefix as f64 * PREFIX_SCALE * (1.0 - jaro_score)
}
