//! mathzone - Classify formula regions and score detection confidence
//!
//! A command line tool reading page observations (text lines plus the
//! upstream outputs for each candidate region) as JSON, and writing the
//! display/inline decision and confidence score of every region as JSON or
//! plain text.

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, ValueEnum};
use mathzone_core::pipeline::{Engine, EngineConfig, PageEvaluation, PageObservation};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Output type for the evaluations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
enum OutputType {
    /// One line per region (default)
    #[default]
    Text,
    /// Pretty-printed JSON report
    Json,
}

/// Classify formula regions as display or inline and score how far the
/// detection can be trusted.
#[derive(Parser, Debug)]
#[command(name = "mathzone")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// One or more page observation JSON files, or "-" for stdin
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,

    /// JSON file with classifier and scorer parameters
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of worker threads (0 = rayon default)
    #[arg(short = 'j', long, default_value = "0")]
    threads: usize,

    // === Classifier options ===
    /// Minimum whitespace above and below an isolated block, in pixels
    #[arg(long = "gap-threshold")]
    gap_threshold: Option<f64>,

    /// Centering tolerance, relative to the page width
    #[arg(long = "center-tolerance")]
    center_tolerance: Option<f64>,

    // === Scorer options ===
    /// Lowest overall confidence reported as medium
    #[arg(long = "medium-cutoff")]
    medium_cutoff: Option<f64>,

    /// Lowest overall confidence reported as high
    #[arg(long = "high-cutoff")]
    high_cutoff: Option<f64>,

    // === Output options ===
    /// Path to file where output is written, or "-" for stdout
    #[arg(short = 'o', long, default_value = "-")]
    outfile: String,

    /// Type of output to generate
    #[arg(short = 't', long = "output-type", value_enum, default_value = "text")]
    output_type: OutputType,

    /// Include the reasoning of each decision in text output
    #[arg(short = 'e', long, action = ArgAction::SetTrue)]
    explain: bool,
}

#[derive(Serialize)]
struct FileReport {
    source: String,
    pages: Vec<PageEvaluation>,
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Infer output type from file extension.
fn infer_output_type(path: &str) -> Option<OutputType> {
    let path_lower = path.to_lowercase();
    if path_lower.ends_with(".json") {
        Some(OutputType::Json)
    } else if path_lower.ends_with(".txt") {
        Some(OutputType::Text)
    } else {
        None
    }
}

/// Build the engine configuration from the config file and flag overrides.
fn build_config(args: &Args) -> Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::from_json_path(path)
            .with_context(|| format!("invalid config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    if let Some(v) = args.gap_threshold {
        config.formula.gap_threshold = v;
    }
    if let Some(v) = args.center_tolerance {
        config.formula.center_tolerance = v;
    }
    if let Some(v) = args.medium_cutoff {
        config.confidence.levels.medium = v;
    }
    if let Some(v) = args.high_cutoff {
        config.confidence.levels.high = v;
    }

    config.validate().context("invalid parameters")?;
    Ok(config)
}

/// Decodes one page or a list of pages. The shape is picked from the first
/// token so decode errors keep serde's line and column.
fn parse_pages(json: &str) -> serde_json::Result<Vec<PageObservation>> {
    if json.trim_start().starts_with('[') {
        serde_json::from_str(json)
    } else {
        serde_json::from_str(json).map(|page| vec![page])
    }
}

fn read_pages(path: &Path) -> Result<Vec<PageObservation>> {
    let mut buf = String::new();
    if path == Path::new("-") {
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
    } else {
        File::open(path)?.read_to_string(&mut buf)?;
    }
    Ok(parse_pages(&buf)?)
}

fn write_text<W: Write>(out: &mut W, report: &FileReport, explain: bool) -> io::Result<()> {
    for page in &report.pages {
        let page_label = page
            .page_number
            .map(|n| n.to_string())
            .unwrap_or_else(|| "-".to_string());
        for region in &page.regions {
            writeln!(
                out,
                "{}\t{}\t{}\t{}\t{:.3}\t{:.3}\t{}\t{}",
                report.source,
                page_label,
                region.index,
                region.formula_type.formula_type,
                region.formula_type.confidence,
                region.score.overall,
                region.score.level,
                region.review,
            )?;
            if explain {
                for reason in region.formula_type.reasoning_text() {
                    writeln!(out, "\t- {reason}")?;
                }
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    let config = build_config(&args)?;
    let engine = Engine::new(config)?;

    // Determine output type (may be inferred from output filename)
    let output_type = if args.output_type == OutputType::Text && args.outfile != "-" {
        infer_output_type(&args.outfile).unwrap_or(args.output_type)
    } else {
        args.output_type
    };

    let mut output: Box<dyn Write> = if args.outfile == "-" {
        Box::new(BufWriter::new(io::stdout()))
    } else {
        let file = File::create(&args.outfile)
            .with_context(|| format!("failed to create output file {}", args.outfile))?;
        Box::new(BufWriter::new(file))
    };

    let mut reports = Vec::with_capacity(args.files.len());
    for path in &args.files {
        if path != Path::new("-") && !path.exists() {
            bail!("file not found: {}", path.display());
        }

        let pages =
            read_pages(path).with_context(|| format!("error processing {}", path.display()))?;
        debug!(file = %path.display(), pages = pages.len(), "loaded page observations");

        let evaluations = if args.threads > 0 {
            engine.evaluate_pages_with_threads(&pages, args.threads)?
        } else {
            engine.evaluate_pages(&pages)
        };
        info!(
            file = %path.display(),
            regions = evaluations.iter().map(|p| p.regions.len()).sum::<usize>(),
            "evaluated file"
        );

        reports.push(FileReport {
            source: path.display().to_string(),
            pages: evaluations,
        });
    }

    match output_type {
        OutputType::Json => {
            serde_json::to_writer_pretty(&mut output, &reports)?;
            writeln!(output)?;
        }
        OutputType::Text => {
            for report in &reports {
                write_text(&mut output, report, args.explain)?;
            }
        }
    }

    // Ensure output is flushed
    output.flush()?;

    Ok(())
}
