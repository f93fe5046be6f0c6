//! Persisted output collection.
//!
//! Compiled envelopes are appended to a single JSON array on disk. Every
//! append is a whole-file read-modify-write: load the array (a missing or
//! unparseable file counts as empty), push, then write the result to a
//! sibling temporary file and rename it over the original.
//!
//! There is no locking; a single writer per output file is assumed.

use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::Result;
use crate::models::ConstraintEnvelope;

/// Appends envelopes to a JSON array file.
#[derive(Debug, Clone)]
pub struct OutputAccumulator {
    path: PathBuf,
}

impl OutputAccumulator {
    /// Creates an accumulator for the given file. Nothing is read yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Output file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the current collection.
    ///
    /// A missing file or one that does not hold a JSON array yields an
    /// empty collection; other I/O errors propagate.
    pub fn load(&self) -> Result<Vec<Value>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str(&content) {
            Ok(values) => Ok(values),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "discarding unreadable output");
                Ok(Vec::new())
            }
        }
    }

    /// Appends one envelope and rewrites the file.
    ///
    /// Returns the collection length after the append.
    pub fn append(&self, envelope: &ConstraintEnvelope) -> Result<usize> {
        let mut values = self.load()?;
        values.push(serde_json::to_value(envelope)?);
        self.store(&values)?;
        info!(
            path = %self.path.display(),
            kind = %envelope.envelope_type,
            total = values.len(),
            "appended constraint"
        );
        Ok(values.len())
    }

    fn store(&self, values: &[Value]) -> Result<()> {
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        values.serialize(&mut ser)?;
        buf.push(b'\n');

        let tmp = self.temp_path();
        let written = Self::write_file(&tmp, &buf).and_then(|()| fs::rename(&tmp, &self.path));
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }

    fn write_file(path: &Path, contents: &[u8]) -> io::Result<()> {
        let mut file = fs::File::create(path)?;
        file.write_all(contents)?;
        file.sync_all()
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("output"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
