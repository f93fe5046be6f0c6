//! Batch processing of one input text.
//!
//! # Flow
//!
//! 1. Classify the text into segments ([`DirectiveSource::classify`])
//! 2. For each segment, in order:
//!    - unrecognized label: skip
//!    - extract, normalize, validate and compile the directive
//!    - append the envelope, if any, to the output collection
//!
//! Lookup and validation failures abort only the current segment; they are
//! logged and recorded in the [`BatchReport`]. Any other error (I/O,
//! malformed output encoding) aborts the batch.

use tracing::{info, warn};

use crate::accumulator::OutputAccumulator;
use crate::compiler::ConstraintCompiler;
use crate::error::Result;
use crate::models::Scenario;
use crate::nlu::{ClassifiedSegment, DirectiveSource};

/// What happened to one classified segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentOutcome {
    /// An envelope with this many entries was appended.
    Emitted { entries: usize },
    /// The directive compiled to nothing.
    Absent,
    /// The classification label names no known scenario.
    Unrecognized,
    /// Compilation failed; the message of the directive-scoped error.
    Failed(String),
}

/// Outcome of one segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentReport {
    pub segment: ClassifiedSegment,
    pub outcome: SegmentOutcome,
}

/// Outcomes of every segment of a batch, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub segments: Vec<SegmentReport>,
}

impl BatchReport {
    /// Number of segments that produced an envelope.
    pub fn emitted(&self) -> usize {
        self.count(|o| matches!(o, SegmentOutcome::Emitted { .. }))
    }

    /// Number of segments whose compilation failed.
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, SegmentOutcome::Failed(_)))
    }

    /// Number of segments skipped or compiled to nothing.
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, SegmentOutcome::Absent | SegmentOutcome::Unrecognized))
    }

    fn count(&self, pred: impl Fn(&SegmentOutcome) -> bool) -> usize {
        self.segments.iter().filter(|s| pred(&s.outcome)).count()
    }
}

/// A compiler, a directive source and an output collection.
#[derive(Debug)]
pub struct Session<'a> {
    compiler: ConstraintCompiler<'a>,
    source: &'a dyn DirectiveSource,
    output: OutputAccumulator,
}

impl<'a> Session<'a> {
    pub fn new(
        compiler: ConstraintCompiler<'a>,
        source: &'a dyn DirectiveSource,
        output: OutputAccumulator,
    ) -> Self {
        Self {
            compiler,
            source,
            output,
        }
    }

    /// The output collection this session appends to.
    pub fn output(&self) -> &OutputAccumulator {
        &self.output
    }

    /// Processes one input text.
    pub fn process(&self, text: &str) -> Result<BatchReport> {
        let segments = self.source.classify(text)?;
        if segments.is_empty() {
            info!(source = self.source.name(), "no classified segments in input");
        }

        let mut report = BatchReport::default();
        for segment in segments {
            let outcome = self.process_segment(&segment)?;
            report.segments.push(SegmentReport { segment, outcome });
        }

        info!(
            emitted = report.emitted(),
            failed = report.failed(),
            skipped = report.skipped(),
            "batch complete"
        );
        Ok(report)
    }

    fn process_segment(&self, segment: &ClassifiedSegment) -> Result<SegmentOutcome> {
        info!(
            segment = %segment.segment,
            classification = %segment.classification,
            "processing segment"
        );

        let Some(scenario) = Scenario::from_label(&segment.classification) else {
            warn!(classification = %segment.classification, "unrecognized classification");
            return Ok(SegmentOutcome::Unrecognized);
        };

        let compiled = self
            .source
            .extract(segment)
            .and_then(|raw| self.compiler.compile_raw(scenario, raw));

        match compiled {
            Ok(Some(envelope)) => {
                self.output.append(&envelope)?;
                Ok(SegmentOutcome::Emitted {
                    entries: envelope.entries().len(),
                })
            }
            Ok(None) => Ok(SegmentOutcome::Absent),
            Err(e) if e.is_directive_scoped() => {
                warn!(scenario = %scenario, error = %e, "directive failed");
                Ok(SegmentOutcome::Failed(e.to_string()))
            }
            Err(e) => Err(e),
        }
    }
}
