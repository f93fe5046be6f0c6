//! Natural-language front end boundary.
//!
//! Classification and extraction are performed by an external collaborator
//! (typically a language model service). The compiler only sees its
//! results through [`DirectiveSource`].
//!
//! [`TranscriptSource`] replays recorded collaborator responses offline:
//! a JSON list of `{segment, classification, directive}` entries.

use std::fmt::Debug;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::models::RawDirective;

/// One classified span of the input text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedSegment {
    /// Text span the classification applies to.
    pub segment: String,
    /// Classification label, e.g. `"课程课时条件"`. May be unrecognized.
    pub classification: String,
}

/// Source of classified segments and their directives.
///
/// Implementations are blocking request/response boundaries; retry and
/// timeout policy belong to the implementation.
pub trait DirectiveSource: Send + Sync + Debug {
    /// Source name for logs.
    fn name(&self) -> &'static str;

    /// Splits input text into classified segments. May return none.
    fn classify(&self, text: &str) -> Result<Vec<ClassifiedSegment>>;

    /// Extracts the loosely-typed directive of one segment.
    fn extract(&self, segment: &ClassifiedSegment) -> Result<RawDirective>;
}

/// One recorded collaborator response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub segment: String,
    pub classification: String,
    #[serde(default)]
    pub directive: RawDirective,
}

/// Replays recorded classifications and extractions.
#[derive(Debug, Clone, Default)]
pub struct TranscriptSource {
    entries: Vec<TranscriptEntry>,
}

impl TranscriptSource {
    /// Creates a source from recorded entries.
    pub fn new(entries: Vec<TranscriptEntry>) -> Self {
        Self { entries }
    }

    /// Parses a transcript from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    /// Loads a transcript file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    /// Number of recorded entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the transcript is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl DirectiveSource for TranscriptSource {
    fn name(&self) -> &'static str {
        "transcript"
    }

    /// Entries whose segment occurs in `text`, in transcript order.
    fn classify(&self, text: &str) -> Result<Vec<ClassifiedSegment>> {
        let segments: Vec<ClassifiedSegment> = self
            .entries
            .iter()
            .filter(|e| !e.segment.trim().is_empty() && text.contains(e.segment.trim()))
            .map(|e| ClassifiedSegment {
                segment: e.segment.clone(),
                classification: e.classification.clone(),
            })
            .collect();
        debug!(segments = segments.len(), "classified input");
        Ok(segments)
    }

    /// The recorded directive, or an empty one if the segment was never
    /// recorded under that classification.
    fn extract(&self, segment: &ClassifiedSegment) -> Result<RawDirective> {
        Ok(self
            .entries
            .iter()
            .find(|e| e.segment == segment.segment && e.classification == segment.classification)
            .map(|e| e.directive.clone())
            .unwrap_or_default())
    }
}
