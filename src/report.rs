// WHY: Reports carry flat owned records so the JSON file round-trips without
// reference to the documents that produced the matches

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::matcher::PlagiarismMatch;
use crate::segmenter::Sentence;
use crate::similarity::Metric;

/// One match as it appears in the JSON report. Field-for-field mirror of
/// [`PlagiarismMatch`] with the sentences flattened into text plus offsets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub input_sentence: String,
    pub input_start: usize,
    pub input_end: usize,
    pub input_index: usize,
    pub reference_sentence: String,
    pub reference_start: usize,
    pub reference_end: usize,
    pub reference_index: usize,
    pub reference_document: String,
    pub similarity_score: f64,
    pub metric: String,
}

impl From<&PlagiarismMatch> for MatchRecord {
    fn from(m: &PlagiarismMatch) -> Self {
        Self {
            input_sentence: m.input().text.clone(),
            input_start: m.input().start,
            input_end: m.input().end,
            input_index: m.input().index,
            reference_sentence: m.reference().text.clone(),
            reference_start: m.reference().start,
            reference_end: m.reference().end,
            reference_index: m.reference().index,
            reference_document: m.reference_document().to_string(),
            similarity_score: m.similarity_score(),
            metric: m.metric().name().to_string(),
        }
    }
}

/// Rebuild validated matches from report records, e.g. after reloading the
/// JSON report for visualization. Tampered records (bad score, unknown
/// metric, empty fields) are rejected.
pub fn to_matches(records: &[MatchRecord]) -> Result<Vec<PlagiarismMatch>> {
    records
        .iter()
        .map(|record| {
            let metric: Metric = record.metric.parse()?;
            let input = Sentence {
                text: record.input_sentence.clone(),
                start: record.input_start,
                end: record.input_end,
                index: record.input_index,
            };
            let reference = Sentence {
                text: record.reference_sentence.clone(),
                start: record.reference_start,
                end: record.reference_end,
                index: record.reference_index,
            };
            let rebuilt = PlagiarismMatch::new(
                input,
                reference,
                record.reference_document.clone(),
                record.similarity_score,
                metric,
            )?;
            Ok(rebuilt)
        })
        .collect()
}

/// Write the pretty-printed JSON report.
pub fn write_json(records: &[MatchRecord], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    fs::write(path, json)
        .with_context(|| format!("failed to write JSON report to {}", path.display()))?;
    info!("Wrote {} match records to {}", records.len(), path.display());
    Ok(())
}

/// Load a JSON report written by [`write_json`].
pub fn read_json(path: &Path) -> Result<Vec<MatchRecord>> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read JSON report from {}", path.display()))?;
    let records: Vec<MatchRecord> = serde_json::from_str(&json)
        .with_context(|| format!("malformed JSON report in {}", path.display()))?;
    info!("Loaded {} match records from {}", records.len(), path.display());
    Ok(records)
}

/// Write the human-readable text report: one numbered block per match.
pub fn write_text(records: &[MatchRecord], path: &Path) -> Result<()> {
    let mut out = String::new();
    for (i, record) in records.iter().enumerate() {
        out.push_str(&format_text_block(record, i + 1));
        out.push('\n');
    }
    fs::write(path, out)
        .with_context(|| format!("failed to write text report to {}", path.display()))?;
    info!("Wrote {} match blocks to {}", records.len(), path.display());
    Ok(())
}

fn format_text_block(record: &MatchRecord, number: usize) -> String {
    format!(
        "Match #{number}\n\
         Input Sentence:     {}\n\
         Input Position:     {}-{}\n\
         Reference Sentence: {}\n\
         Reference Position: {}-{}\n\
         Reference Document: {}\n\
         Similarity Score:   {:.4}\n",
        record.input_sentence,
        record.input_start,
        record.input_end,
        record.reference_sentence,
        record.reference_start,
        record.reference_end,
        record.reference_document,
        record.similarity_score,
    )
}

/// Print a single match to the console as it is found.
pub fn print_match(record: &MatchRecord) {
    println!("Input Sentence:     {}", record.input_sentence);
    println!(
        "Input Position:     {}-{}",
        record.input_start, record.input_end
    );
    println!("Reference Sentence: {}", record.reference_sentence);
    println!(
        "Reference Position: {}-{}",
        record.reference_start, record.reference_end
    );
    println!("Reference Document: {}", record.reference_document);
    println!("Similarity Score:   {:.4}", record.similarity_score);
    println!();
}
