//! Deployment configuration.
//!
//! Read from a TOML file; every key has a default, so an empty file (or no
//! file at all, via [`CompilerConfig::default`]) yields a working setup.
//!
//! ```toml
//! [project]
//! project_id = 458
//! course_scenario_id = 984
//! teacher_scenario_id = 985
//!
//! [feeds]
//! course_classes = "class_info.json"
//! teacher_classes = "teacher_info.json"
//!
//! [output]
//! path = "output_data.json"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Complete compiler configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompilerConfig {
    #[serde(default)]
    pub project: ProjectSettings,
    #[serde(default)]
    pub feeds: FeedSettings,
    #[serde(default)]
    pub output: OutputSettings,
}

/// Routing identifiers stamped on every envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSettings {
    #[serde(default = "default_project_id")]
    pub project_id: i64,
    /// Scenario id for course constraints.
    #[serde(default = "default_course_scenario_id")]
    pub course_scenario_id: i64,
    /// Scenario id for teacher constraints and the odd/even week link.
    #[serde(default = "default_teacher_scenario_id")]
    pub teacher_scenario_id: i64,
}

/// Locations of the two directory feeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedSettings {
    #[serde(default = "default_course_classes")]
    pub course_classes: PathBuf,
    #[serde(default = "default_teacher_classes")]
    pub teacher_classes: PathBuf,
}

/// Where compiled envelopes are accumulated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
}

fn default_project_id() -> i64 {
    458
}

fn default_course_scenario_id() -> i64 {
    984
}

fn default_teacher_scenario_id() -> i64 {
    985
}

fn default_course_classes() -> PathBuf {
    PathBuf::from("class_info.json")
}

fn default_teacher_classes() -> PathBuf {
    PathBuf::from("teacher_info.json")
}

fn default_output_path() -> PathBuf {
    PathBuf::from("output_data.json")
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            project_id: default_project_id(),
            course_scenario_id: default_course_scenario_id(),
            teacher_scenario_id: default_teacher_scenario_id(),
        }
    }
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            course_classes: default_course_classes(),
            teacher_classes: default_teacher_classes(),
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            path: default_output_path(),
        }
    }
}

impl CompilerConfig {
    /// Parses configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::Config(format!("failed to parse config: {e}")))
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    /// [`Error::Config`] if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Resolves relative feed and output paths against `base`.
    ///
    /// Used to make paths in a config file relative to the file itself.
    pub fn with_base_dir(mut self, base: &Path) -> Self {
        for path in [
            &mut self.feeds.course_classes,
            &mut self.feeds.teacher_classes,
            &mut self.output.path,
        ] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
        self
    }
}
