//! u-timetable command line
//!
//! Reads one free-text scheduling request, compiles every classified
//! segment into a constraint envelope and appends the envelopes to the
//! configured output file.
//!
//! # Usage
//!
//! ```bash
//! # Interactive prompt, default configuration
//! u-timetable --transcript replies.json
//!
//! # One-shot
//! u-timetable --config timetable.toml --transcript replies.json \
//!   --input "初一周一第9节排体活"
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use u_timetable::accumulator::OutputAccumulator;
use u_timetable::compiler::ConstraintCompiler;
use u_timetable::config::CompilerConfig;
use u_timetable::models::DirectorySnapshot;
use u_timetable::nlu::TranscriptSource;
use u_timetable::pipeline::{SegmentOutcome, Session};

/// Compile scheduling requests into timetable solver constraints
#[derive(Parser, Debug)]
#[command(name = "u-timetable", version)]
struct Args {
    /// TOML configuration file (defaults apply when omitted)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Recorded classification/extraction replies (JSON)
    #[arg(long, short = 't')]
    transcript: PathBuf,

    /// Request text; prompts on stdin when omitted
    #[arg(long, short = 'i')]
    input: Option<String>,
}

fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            let base = path.parent().map(PathBuf::from).unwrap_or_default();
            CompilerConfig::from_file(path)?.with_base_dir(&base)
        }
        None => CompilerConfig::default(),
    };

    let directory =
        DirectorySnapshot::from_files(&config.feeds.course_classes, &config.feeds.teacher_classes)
            .with_context(|| {
                format!(
                    "loading directory feeds {} and {}",
                    config.feeds.course_classes.display(),
                    config.feeds.teacher_classes.display()
                )
            })?;
    info!(
        courses = directory.course_count(),
        classes = directory.classes().len(),
        assignments = directory.assignments().len(),
        "directory loaded"
    );

    let source = TranscriptSource::from_file(&args.transcript)
        .with_context(|| format!("loading transcript {}", args.transcript.display()))?;

    let input = match args.input {
        Some(text) => text,
        None => prompt("Please enter your input: ")?,
    };

    let session = Session::new(
        ConstraintCompiler::new(&directory, config.project),
        &source,
        OutputAccumulator::new(config.output.path.clone()),
    );
    let report = session.process(&input)?;

    for s in &report.segments {
        println!("Segment: {}", s.segment.segment);
        println!("Classification: {}", s.segment.classification);
        match &s.outcome {
            SegmentOutcome::Emitted { entries } => println!("  emitted ({entries} entries)"),
            SegmentOutcome::Absent => println!("  nothing to emit"),
            SegmentOutcome::Unrecognized => println!("  unrecognized classification"),
            SegmentOutcome::Failed(e) => println!("  failed: {e}"),
        }
    }
    println!(
        "{} emitted, {} failed, {} skipped -> {}",
        report.emitted(),
        report.failed(),
        report.skipped(),
        session.output().path().display()
    );

    Ok(())
}

fn prompt(message: &str) -> anyhow::Result<String> {
    let mut stdout = io::stdout();
    write!(stdout, "{message}")?;
    stdout.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
