//! Raw directory feeds as exported by the school information system.
//!
//! Two independent documents:
//!
//! - **Course/class feed**: `{"data": [{"courses": [...], "classes": [...]}, ...]}`,
//!   one element per grade.
//! - **Teacher/class feed**: `{"data": {"gradeTeacherClassList": [...]}}`, one
//!   element per grade with `teacherClasses` and optional `headerTeachers`.
//!
//! Parsing failures are structural: a feed that lacks a required section
//! cannot produce a partial directory.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::Ident;
use crate::error::{Error, Result};

/// Course/class catalogue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseClassFeed {
    /// Grade groups in declared order.
    pub data: Vec<CourseClassGroup>,
}

/// Courses and classes of one grade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseClassGroup {
    pub courses: Vec<FeedCourse>,
    pub classes: Vec<FeedClass>,
}

/// A course as it appears in both feeds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedCourse {
    pub name: String,
    pub uid: Ident,
    pub course_dcode: Ident,
}

/// A class row of the course/class catalogue.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedClass {
    pub grade_name: String,
    /// Class name within the grade, e.g. `"01班"`.
    pub name: String,
    pub uid: Ident,
    #[serde(rename = "type")]
    pub class_type: Ident,
}

/// Teacher-assignment catalogue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeacherClassFeed {
    pub data: TeacherClassData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeacherClassData {
    #[serde(rename = "gradeTeacherClassList")]
    pub grades: Vec<TeacherClassGroup>,
}

/// Teacher assignments and head teachers of one grade.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherClassGroup {
    /// Grade code shared by every class in this group.
    #[serde(default, rename = "gradeDecode")]
    pub grade_dcode: Option<Ident>,
    pub teacher_classes: Vec<FeedTeacherClass>,
    #[serde(default)]
    pub header_teachers: Option<Vec<FeedHeaderTeacher>>,
}

/// `{name, uid}` reference used for teachers and classes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedRef {
    pub name: String,
    pub uid: Ident,
}

/// One teacher teaching one course to one class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedTeacherClass {
    pub teacher: FeedRef,
    /// Class with its full name, e.g. `"初一01班"`.
    pub clazz: FeedRef,
    pub course: FeedCourse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedHeaderTeacher {
    pub teacher_id: Ident,
    pub teacher_name: String,
    pub grade_dcode: Ident,
    pub project_school_class_id: Ident,
}

impl CourseClassFeed {
    /// Parses the feed from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::Structural(format!("course/class feed: {e}")))
    }

    /// Reads and parses the feed from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }
}

impl TeacherClassFeed {
    /// Parses the feed from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::Structural(format!("teacher/class feed: {e}")))
    }

    /// Reads and parses the feed from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }
}
