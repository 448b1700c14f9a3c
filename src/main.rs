use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use simcheck::{
    build_highlight_spans, find_matches, loader, render, report, MatchConfig, MatchRecord,
    Metric, MetricParams, Segmenter,
};

#[derive(Parser, Debug)]
#[command(name = "simcheck")]
#[command(about = "Sentence-level plagiarism checker with HTML match visualization")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compare a document against reference documents and report similar sentences
    Check {
        /// Path to the examined text file
        examined_file: PathBuf,

        /// Paths to one or more reference documents
        #[arg(required = true)]
        reference_files: Vec<PathBuf>,

        /// Similarity threshold in [0, 1]
        #[arg(long, default_value_t = 0.8)]
        threshold: f64,

        /// Minimum sentence length (chars) to enter comparison
        #[arg(long, default_value_t = 10)]
        min_length: usize,

        /// Similarity metric (jaccard_similarity, sorensen_dice_similarity,
        /// overlap_similarity, tversky_similarity, cosine_similarity,
        /// jaro_similarity, jaro_winkler_similarity)
        #[arg(long, default_value = "jaccard_similarity")]
        metric: String,

        /// Tversky alpha weight
        #[arg(long, default_value_t = 0.5)]
        alpha: f64,

        /// Tversky beta weight
        #[arg(long, default_value_t = 0.5)]
        beta: f64,

        /// JSON report output path
        #[arg(long)]
        output: Option<PathBuf>,

        /// Text report output path
        #[arg(long)]
        text_output: Option<PathBuf>,

        /// Suppress per-match console output
        #[arg(long)]
        quiet: bool,
    },
    /// Render a highlighted HTML view of a document from a JSON match report
    Render {
        /// Path to the examined text file
        input: PathBuf,

        /// Path to the JSON match report produced by `check`
        matches: PathBuf,

        /// HTML output path
        #[arg(long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    // WHY: diagnostics go to stderr so reports and match output pipe cleanly
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Check {
            examined_file,
            reference_files,
            threshold,
            min_length,
            metric,
            alpha,
            beta,
            output,
            text_output,
            quiet,
        } => run_check(
            &examined_file,
            &reference_files,
            threshold,
            min_length,
            &metric,
            alpha,
            beta,
            output.as_deref(),
            text_output.as_deref(),
            quiet,
        ),
        Command::Render {
            input,
            matches,
            output,
        } => run_render(&input, &matches, &output),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_check(
    examined_file: &std::path::Path,
    reference_files: &[PathBuf],
    threshold: f64,
    min_length: usize,
    metric_name: &str,
    alpha: f64,
    beta: f64,
    output: Option<&std::path::Path>,
    text_output: Option<&std::path::Path>,
    quiet: bool,
) -> Result<()> {
    // WHY: metric and threshold are validated before any file is segmented
    let metric: Metric = metric_name.parse()?;
    let config = MatchConfig {
        threshold,
        min_sentence_length: min_length,
        metric,
        params: MetricParams { alpha, beta },
    };
    config.validate()?;

    for path in std::iter::once(examined_file).chain(reference_files.iter().map(|p| p.as_path())) {
        if !path.exists() {
            anyhow::bail!("input file does not exist: {}", path.display());
        }
    }

    info!("Checking {} against {} reference documents", examined_file.display(), reference_files.len());

    let segmenter = Segmenter::new()?;

    let input_text = loader::load_document(examined_file)?;
    let input_sentences = segmenter.segment(&input_text, config.min_sentence_length)?;

    let mut references = Vec::with_capacity(reference_files.len());
    for path in reference_files {
        let text = loader::load_document(path)?;
        references.push(segmenter.segment_document(
            &path.display().to_string(),
            &text,
            config.min_sentence_length,
        )?);
    }

    let matches = find_matches(&input_sentences, &references, &config)?;
    let records: Vec<MatchRecord> = matches.iter().map(MatchRecord::from).collect();

    if !quiet {
        for record in &records {
            report::print_match(record);
        }
    }

    if let Some(path) = output {
        report::write_json(&records, path)?;
        println!("Results saved to JSON file: {}", path.display());
    }
    if let Some(path) = text_output {
        report::write_text(&records, path)?;
        println!("Results saved to text file: {}", path.display());
    }

    println!(
        "Found {} similar sentence pairs ({} at threshold {})",
        records.len(),
        metric,
        threshold
    );
    Ok(())
}

fn run_render(
    input: &std::path::Path,
    matches_path: &std::path::Path,
    output: &std::path::Path,
) -> Result<()> {
    let text = loader::load_document(input)?;
    let records = report::read_json(matches_path)?;
    let matches = report::to_matches(&records)?;

    // WHY: min_length 1 re-derives every sentence span; filtering at check
    // time only removed sentences, it never moved surviving offsets
    let segmenter = Segmenter::new()?;
    let sentences = segmenter.segment(&text, 1)?;
    let spans = build_highlight_spans(&sentences, &matches);

    let title = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.display().to_string());
    let html = render::render_report(&text, &spans, &title);

    std::fs::write(output, html)
        .map_err(|e| anyhow::anyhow!("failed to write HTML report to {}: {e}", output.display()))?;

    info!("Rendered {} highlight spans from {} matches", spans.len(), records.len());
    println!("Successfully saved HTML report to {}", output.display());
    Ok(())
}
