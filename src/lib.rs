pub mod highlight;
pub mod loader;
pub mod matcher;
pub mod render;
pub mod report;
pub mod segmenter;
pub mod similarity;

// Re-export main types for convenient access
pub use highlight::{build_highlight_spans, split_into_segments, HighlightSpan, Segment};
pub use matcher::{find_matches, InvalidMatchError, MatchConfig, PlagiarismMatch};
pub use report::MatchRecord;
pub use segmenter::{Document, Segmenter, Sentence};
pub use similarity::{Metric, MetricParams, UnknownMetricError};
