// WHY: Overlapping matches are all kept and resolved into flat segments by a
// boundary sweep; the presentation layer decides visibility, never this module

use std::collections::HashSet;

use tracing::debug;

use crate::matcher::PlagiarismMatch;
use crate::segmenter::Sentence;

/// A document region that must be wrapped in highlight markup. Derived from a
/// match's input sentence offsets; always covers an exact sentence span.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightSpan {
    pub start: usize,
    pub end: usize,
    pub reference_document: String,
    pub similarity_score: f64,
}

/// A contiguous slice of the document together with every highlight span
/// covering it. Segments with no spans are plain text.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub start: usize,
    pub end: usize,
    pub spans: Vec<HighlightSpan>,
}

/// Derive one highlight span per match whose input sentence belongs to the
/// target document, sorted by start offset ascending.
///
/// A span's offsets always equal some sentence's exact span; matches that do
/// not line up with any document sentence are skipped. Overlapping spans are
/// all returned — a sentence matched against several reference documents
/// yields one span per document, not a merged one.
pub fn build_highlight_spans(
    document_sentences: &[Sentence],
    matches: &[PlagiarismMatch],
) -> Vec<HighlightSpan> {
    let sentence_spans: HashSet<(usize, usize)> = document_sentences
        .iter()
        .map(|s| (s.start, s.end))
        .collect();

    let mut spans: Vec<HighlightSpan> = matches
        .iter()
        .filter(|m| sentence_spans.contains(&(m.input().start, m.input().end)))
        .map(|m| HighlightSpan {
            start: m.input().start,
            end: m.input().end,
            reference_document: m.reference_document().to_string(),
            similarity_score: m.similarity_score(),
        })
        .collect();

    spans.sort_by_key(|span| span.start);
    debug!("Built {} highlight spans from {} matches", spans.len(), matches.len());
    spans
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum EventKind {
    // Ends sort before starts at the same offset so a span closing exactly
    // where another opens never bleeds into the next segment
    End,
    Start,
}

/// Split the document into contiguous segments, each carrying the spans
/// active over it. Segment boundaries are exactly the span start/end offsets;
/// concatenating all segment ranges reproduces the whole document.
pub fn split_into_segments(text: &str, spans: &[HighlightSpan]) -> Vec<Segment> {
    let mut events: Vec<(usize, EventKind, usize)> = Vec::with_capacity(spans.len() * 2);
    for (idx, span) in spans.iter().enumerate() {
        events.push((span.start, EventKind::Start, idx));
        events.push((span.end, EventKind::End, idx));
    }
    events.sort_by_key(|&(offset, kind, _)| (offset, kind));

    let mut segments = Vec::new();
    let mut active: Vec<usize> = Vec::new();
    let mut current = 0;

    if let Some(&(first, _, _)) = events.first() {
        if first > 0 {
            segments.push(Segment {
                start: 0,
                end: first,
                spans: Vec::new(),
            });
            current = first;
        }
    } else if !text.is_empty() {
        return vec![Segment {
            start: 0,
            end: text.len(),
            spans: Vec::new(),
        }];
    }

    for (offset, kind, idx) in events {
        if offset > current {
            segments.push(Segment {
                start: current,
                end: offset,
                spans: active.iter().map(|&i| spans[i].clone()).collect(),
            });
        }
        match kind {
            EventKind::Start => {
                if !active.contains(&idx) {
                    active.push(idx);
                }
            }
            EventKind::End => active.retain(|&i| i != idx),
        }
        current = offset;
    }

    if current < text.len() {
        segments.push(Segment {
            start: current,
            end: text.len(),
            spans: Vec::new(),
        });
    }

    debug!("Split {} bytes into {} segments", text.len(), segments.len());
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::Metric;

    fn sentence(text: &str, start: usize, index: usize) -> Sentence {
        Sentence {
            text: text.to_string(),
            start,
            end: start + text.len(),
            index,
        }
    }

    fn span(start: usize, end: usize, doc: &str, score: f64) -> HighlightSpan {
        HighlightSpan {
            start,
            end,
            reference_document: doc.to_string(),
            similarity_score: score,
        }
    }

    fn plagiarism_match(input: Sentence, doc: &str, score: f64) -> PlagiarismMatch {
        let reference = sentence("Reference sentence text.", 0, 0);
        PlagiarismMatch::new(input, reference, doc.to_string(), score, Metric::Jaccard).unwrap()
    }

    #[test]
    fn test_two_documents_same_sentence_yield_two_spans() {
        let doc_text = "This exact sentence appears in both references.";
        let sentences = vec![sentence(doc_text, 0, 0)];
        let matches = vec![
            plagiarism_match(sentences[0].clone(), "ref1.txt", 0.95),
            plagiarism_match(sentences[0].clone(), "ref2.txt", 0.85),
        ];

        let spans = build_highlight_spans(&sentences, &matches);
        assert_eq!(spans.len(), 2);
        assert_eq!((spans[0].start, spans[0].end), (spans[1].start, spans[1].end));
        assert_eq!(spans[0].reference_document, "ref1.txt");
        assert_eq!(spans[1].reference_document, "ref2.txt");
    }

    #[test]
    fn test_spans_sorted_by_start() {
        let first = sentence("First sentence here.", 0, 0);
        let second = sentence("Second sentence here.", 30, 1);
        let sentences = vec![first.clone(), second.clone()];
        let matches = vec![
            plagiarism_match(second, "ref.txt", 0.9),
            plagiarism_match(first, "ref.txt", 0.9),
        ];

        let spans = build_highlight_spans(&sentences, &matches);
        assert_eq!(spans.len(), 2);
        assert!(spans[0].start < spans[1].start);
    }

    #[test]
    fn test_match_outside_document_sentences_is_skipped() {
        let sentences = vec![sentence("A document sentence.", 0, 0)];
        let foreign = sentence("Not aligned with any sentence.", 100, 0);
        let matches = vec![plagiarism_match(foreign, "ref.txt", 0.9)];

        let spans = build_highlight_spans(&sentences, &matches);
        assert!(spans.is_empty());
    }

    #[test]
    fn test_empty_content_no_spans() {
        assert!(split_into_segments("", &[]).is_empty());
    }

    #[test]
    fn test_content_without_spans_is_one_segment() {
        let text = "This is a test document with some plagiarized content in the middle and at the end.";
        let segments = split_into_segments(text, &[]);
        assert_eq!(segments.len(), 1);
        assert_eq!((segments[0].start, segments[0].end), (0, text.len()));
        assert!(segments[0].spans.is_empty());
    }

    #[test]
    fn test_segments_partition_the_document() {
        let text = "This is a test document with some plagiarized content in the middle and at the end.";
        let spans = vec![
            span(34, 54, "reference1.txt", 0.95),
            span(72, 83, "reference2.txt", 0.85),
        ];

        let segments = split_into_segments(text, &spans);
        assert_eq!(segments[0].start, 0);
        assert_eq!(segments.last().unwrap().end, text.len());
        for window in segments.windows(2) {
            assert_eq!(window[0].end, window[1].start);
        }

        let highlighted: Vec<&Segment> =
            segments.iter().filter(|s| !s.spans.is_empty()).collect();
        assert_eq!(highlighted.len(), 2);
        assert_eq!(&text[highlighted[0].start..highlighted[0].end], "plagiarized content ");
        assert_eq!(&text[highlighted[1].start..highlighted[1].end], "at the end.");
    }

    #[test]
    fn test_overlapping_spans_stack_in_middle_segment() {
        let text = "This is a test document with some plagiarized content in the middle.";
        let spans = vec![
            span(10, 34, "ref1.txt", 0.9),
            span(24, 46, "ref2.txt", 0.8),
        ];

        let segments = split_into_segments(text, &spans);
        let overlap = segments
            .iter()
            .find(|s| s.start == 24 && s.end == 34)
            .expect("overlap segment");
        assert_eq!(overlap.spans.len(), 2);
        assert_eq!(overlap.spans[0].reference_document, "ref1.txt");
        assert_eq!(overlap.spans[1].reference_document, "ref2.txt");
    }

    #[test]
    fn test_span_at_document_start_and_end() {
        let text = "This is a test.";
        let segments = split_into_segments(text, &[span(8, 15, "ref.txt", 0.9)]);
        assert_eq!(segments.len(), 2);
        assert!(segments[0].spans.is_empty());
        assert_eq!(segments[1].spans.len(), 1);
        assert_eq!(&text[segments[1].start..segments[1].end], "a test.");

        let segments = split_into_segments(text, &[span(0, 7, "ref.txt", 0.9)]);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].spans.len(), 1);
        assert!(segments[1].spans.is_empty());
    }

    #[test]
    fn test_identical_spans_from_two_documents_share_segment() {
        let text = "Duplicate text here";
        let spans = vec![
            span(0, 14, "ref1.txt", 0.9),
            span(0, 14, "ref2.txt", 0.85),
        ];

        let segments = split_into_segments(text, &spans);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].spans.len(), 2);
    }

    #[test]
    fn test_adjacent_spans_do_not_merge() {
        let text = "This is adjacent matches test";
        let spans = vec![
            span(0, 7, "ref1.txt", 0.9),
            span(8, 24, "ref2.txt", 0.8),
        ];

        let segments = split_into_segments(text, &spans);
        assert_eq!(segments.len(), 4);
        assert_eq!(segments[0].spans.len(), 1);
        assert!(segments[1].spans.is_empty());
        assert_eq!(segments[2].spans.len(), 1);
        assert!(segments[3].spans.is_empty());
    }
}
