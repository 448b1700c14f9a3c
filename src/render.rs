// WHY: Presentation-only concerns live here: color identity, markup assembly,
// and the self-contained report template. The highlight core stays data-only.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, info};

use crate::highlight::{split_into_segments, HighlightSpan, Segment};

/// Distinct base colors assigned to reference documents in sorted-name order,
/// cycling when there are more documents than colors.
const PALETTE: &[&str] = &[
    "#FF5733", // red-orange
    "#33A8FF", // blue
    "#33FF57", // green
    "#FF33A8", // pink
    "#A833FF", // purple
    "#FFD433", // yellow
    "#33FFD4", // teal
    "#FF8333", // orange
    "#8333FF", // indigo
    "#33FF83", // mint
];

const TEMPLATE: &str = include_str!("../templates/report.html");

/// Deterministic document -> color assignment over the reference documents
/// named by the spans, sorted by name.
pub fn document_colors(spans: &[HighlightSpan]) -> BTreeMap<String, &'static str> {
    let names: std::collections::BTreeSet<&str> =
        spans.iter().map(|s| s.reference_document.as_str()).collect();
    names
        .into_iter()
        .enumerate()
        .map(|(i, name)| (name.to_string(), PALETTE[i % PALETTE.len()]))
        .collect()
}

/// CSS class identifier for a reference document name.
fn sanitize_doc_id(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Display name for a reference document: file name without its directory.
fn doc_display_name(name: &str) -> String {
    Path::new(name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string())
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the examined document with every highlight span stacked into
/// segment markup, producing one self-contained HTML page. The filter buttons
/// and legend let the viewer control span visibility per reference document.
pub fn render_report(document_text: &str, spans: &[HighlightSpan], title: &str) -> String {
    let colors = document_colors(spans);
    let segments = split_into_segments(document_text, spans);
    debug!(
        "Rendering {} segments with {} reference documents",
        segments.len(),
        colors.len()
    );

    let content: String = segments
        .iter()
        .map(|segment| segment_markup(document_text, segment))
        .collect();

    let html = TEMPLATE
        .replace("{title}", &escape_html(title))
        .replace("{subtitle}", &escape_html(title))
        .replace("{document_styles}", &document_styles(&colors))
        .replace("{filter_buttons}", &filter_buttons(&colors))
        .replace("{legend_items}", &legend_items(&colors))
        .replace("{content}", &content);

    info!("Rendered HTML report ({} bytes)", html.len());
    html
}

fn segment_markup(document_text: &str, segment: &Segment) -> String {
    let text = escape_html(&document_text[segment.start..segment.end]);
    if segment.spans.is_empty() {
        return text;
    }

    let classes: Vec<String> = segment
        .spans
        .iter()
        .map(|s| format!("plag-doc-{}", sanitize_doc_id(&s.reference_document)))
        .collect();
    let references: Vec<String> = segment
        .spans
        .iter()
        .map(|s| doc_display_name(&s.reference_document))
        .collect();
    let avg_score: f64 = segment.spans.iter().map(|s| s.similarity_score).sum::<f64>()
        / segment.spans.len() as f64;
    // Stronger matches read as more opaque highlights
    let opacity = (0.3 + avg_score * 0.7).min(1.0);

    format!(
        "<span class=\"plagiarized {}\" style=\"opacity: {opacity:.2}\" \
         data-references=\"{}\" data-similarity=\"{avg_score:.2}\">{text}</span>",
        classes.join(" "),
        escape_html(&references.join(", ")),
    )
}

fn document_styles(colors: &BTreeMap<String, &'static str>) -> String {
    colors
        .iter()
        .map(|(name, color)| {
            format!(
                ".plag-doc-{} {{ background-color: {color}; }}",
                sanitize_doc_id(name)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn filter_buttons(colors: &BTreeMap<String, &'static str>) -> String {
    let mut buttons = String::from(
        "<button id=\"show-all-btn\" class=\"control-btn active\">Show All</button>\
         <button id=\"hide-all-btn\" class=\"control-btn\">Hide All</button>",
    );
    for name in colors.keys() {
        buttons.push_str(&format!(
            "<button class=\"filter-btn control-btn\" data-doc=\"{}\">{}</button>",
            sanitize_doc_id(name),
            escape_html(&doc_display_name(name)),
        ));
    }
    buttons
}

fn legend_items(colors: &BTreeMap<String, &'static str>) -> String {
    colors
        .iter()
        .map(|(name, color)| {
            format!(
                "<div class=\"legend-item\"><span class=\"color-box\" \
                 style=\"background-color: {color};\"></span>{}</div>",
                escape_html(&doc_display_name(name)),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(start: usize, end: usize, doc: &str, score: f64) -> HighlightSpan {
        HighlightSpan {
            start,
            end,
            reference_document: doc.to_string(),
            similarity_score: score,
        }
    }

    #[test]
    fn test_color_assignment_is_deterministic() {
        let spans = vec![
            span(0, 5, "b.txt", 0.9),
            span(6, 10, "a.txt", 0.9),
            span(11, 15, "b.txt", 0.8),
        ];
        let colors = document_colors(&spans);
        assert_eq!(colors.len(), 2);
        // Sorted by name, palette in order
        assert_eq!(colors["a.txt"], PALETTE[0]);
        assert_eq!(colors["b.txt"], PALETTE[1]);
        assert_eq!(document_colors(&spans), colors);
    }

    #[test]
    fn test_sanitize_doc_id() {
        assert_eq!(sanitize_doc_id("refs/paper v2.txt"), "refs_paper_v2_txt");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("a < b & \"c\""),
            "a &lt; b &amp; &quot;c&quot;"
        );
    }

    #[test]
    fn test_render_wraps_highlighted_segments() {
        let text = "Plain lead-in. Copied sentence here. Plain tail.";
        let spans = vec![span(15, 36, "ref.txt", 0.9)];

        let html = render_report(text, &spans, "sample");
        assert!(html.contains("Plain lead-in."));
        assert!(html.contains("class=\"plagiarized plag-doc-ref_txt\""));
        assert!(html.contains("data-references=\"ref.txt\""));
        assert!(html.contains("data-similarity=\"0.90\""));
        assert!(html.contains("<title>sample</title>"));
        // Self-contained: styling and script are inlined
        assert!(html.contains("<style>"));
        assert!(html.contains("<script>"));
        assert!(!html.contains("{content}"));
    }

    #[test]
    fn test_overlapping_segment_carries_both_classes() {
        let text = "Some shared overlapping region of text here.";
        let spans = vec![
            span(0, 30, "ref1.txt", 1.0),
            span(5, 44, "ref2.txt", 0.8),
        ];

        let html = render_report(text, &spans, "overlap");
        assert!(html.contains("plag-doc-ref1_txt plag-doc-ref2_txt"));
        // Average of 1.0 and 0.8 over the shared region
        assert!(html.contains("data-similarity=\"0.90\""));
    }

    #[test]
    fn test_document_text_is_escaped() {
        let text = "A <script> tag should never survive rendering.";
        let html = render_report(text, &[], "escaping");
        assert!(html.contains("A &lt;script&gt; tag"));
    }
}
