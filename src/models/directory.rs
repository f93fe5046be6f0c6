//! School entity directory.
//!
//! A [`DirectorySnapshot`] is built once from the two raw feeds and is
//! read-only afterwards. Builders receive it by reference; nothing in the
//! crate mutates it after construction, so it can be shared across threads
//! without synchronization.
//!
//! # Indexes
//!
//! | Index | Key | Source |
//! |-------|-----|--------|
//! | courses | course name (last write wins) | course/class feed |
//! | classes | (grade name, class name), declared order | course/class feed |
//! | assignments | declared order | teacher/class feed |
//! | header teachers | declared order | teacher/class feed |
//! | grade of class | class uid → grade name | course/class feed |
//! | grade code of class | full class name → gradeDcode | teacher/class feed |
//! | grade code of head-taught class | class uid → gradeDcode | head-teacher records |

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::feed::{CourseClassFeed, TeacherClassFeed};
use super::Ident;
use crate::error::Result;

/// A course of the catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRecord {
    pub name: String,
    pub uid: Ident,
    pub course_dcode: Ident,
}

impl CourseRecord {
    /// Creates a course record.
    pub fn new(name: impl Into<String>, uid: impl Into<Ident>, course_dcode: impl Into<Ident>) -> Self {
        Self {
            name: name.into(),
            uid: uid.into(),
            course_dcode: course_dcode.into(),
        }
    }

    /// Synthetic record for a subject missing from the catalogue.
    ///
    /// Carries the requested name with empty identifiers.
    pub fn placeholder(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uid: Ident::empty(),
            course_dcode: Ident::empty(),
        }
    }

    /// Whether this record was synthesized by [`CourseRecord::placeholder`].
    pub fn is_placeholder(&self) -> bool {
        self.uid.is_empty() && self.course_dcode.is_empty()
    }
}

/// A class of one grade. Keyed by `(grade_name, name)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassRecord {
    pub grade_name: String,
    /// Name within the grade, e.g. `"01班"`.
    pub name: String,
    pub uid: Ident,
    #[serde(rename = "type")]
    pub class_type: Ident,
}

impl ClassRecord {
    /// Grade-qualified display name, e.g. `"初一01班"`.
    pub fn full_name(&self) -> String {
        format!("{}{}", self.grade_name, self.name)
    }
}

/// One teacher teaching one course to one class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherAssignmentRecord {
    pub teacher_name: String,
    pub teacher_uid: Ident,
    /// Full class name, e.g. `"初一01班"`.
    pub class_name: String,
    pub class_uid: Ident,
    pub course_name: String,
    pub course_uid: Ident,
    pub course_dcode: Ident,
}

/// Head-teacher-of-class relation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderTeacherRecord {
    pub teacher_id: Ident,
    pub teacher_name: String,
    pub grade_dcode: Ident,
    pub class_id: Ident,
}

/// Immutable index of courses, classes, teacher assignments and head teachers.
#[derive(Debug, Clone, Default)]
pub struct DirectorySnapshot {
    courses: HashMap<String, CourseRecord>,
    classes: Vec<ClassRecord>,
    assignments: Vec<TeacherAssignmentRecord>,
    header_teachers: Vec<HeaderTeacherRecord>,
    grade_by_class_uid: HashMap<Ident, String>,
    grade_code_by_class_name: HashMap<String, Ident>,
    grade_code_by_class_uid: HashMap<Ident, Ident>,
}

impl DirectorySnapshot {
    /// Builds the snapshot from two parsed feeds.
    ///
    /// Iterates every grade group in order. Duplicate course names
    /// overwrite earlier entries; classes, assignments and head teachers
    /// keep their declared order.
    pub fn build(course_feed: &CourseClassFeed, teacher_feed: &TeacherClassFeed) -> Self {
        let mut snapshot = Self::default();

        for group in &course_feed.data {
            for course in &group.courses {
                snapshot.courses.insert(
                    course.name.clone(),
                    CourseRecord::new(
                        course.name.clone(),
                        course.uid.clone(),
                        course.course_dcode.clone(),
                    ),
                );
            }
            for clazz in &group.classes {
                snapshot
                    .grade_by_class_uid
                    .insert(clazz.uid.clone(), clazz.grade_name.clone());
                snapshot.classes.push(ClassRecord {
                    grade_name: clazz.grade_name.clone(),
                    name: clazz.name.clone(),
                    uid: clazz.uid.clone(),
                    class_type: clazz.class_type.clone(),
                });
            }
        }

        for group in &teacher_feed.data.grades {
            for tc in &group.teacher_classes {
                if let Some(code) = &group.grade_dcode {
                    snapshot
                        .grade_code_by_class_name
                        .insert(tc.clazz.name.clone(), code.clone());
                }
                snapshot.assignments.push(TeacherAssignmentRecord {
                    teacher_name: tc.teacher.name.clone(),
                    teacher_uid: tc.teacher.uid.clone(),
                    class_name: tc.clazz.name.clone(),
                    class_uid: tc.clazz.uid.clone(),
                    course_name: tc.course.name.clone(),
                    course_uid: tc.course.uid.clone(),
                    course_dcode: tc.course.course_dcode.clone(),
                });
            }
            for ht in group.header_teachers.iter().flatten() {
                snapshot
                    .grade_code_by_class_uid
                    .insert(ht.project_school_class_id.clone(), ht.grade_dcode.clone());
                snapshot.header_teachers.push(HeaderTeacherRecord {
                    teacher_id: ht.teacher_id.clone(),
                    teacher_name: ht.teacher_name.clone(),
                    grade_dcode: ht.grade_dcode.clone(),
                    class_id: ht.project_school_class_id.clone(),
                });
            }
        }

        debug!(
            courses = snapshot.courses.len(),
            classes = snapshot.classes.len(),
            assignments = snapshot.assignments.len(),
            header_teachers = snapshot.header_teachers.len(),
            "directory snapshot built"
        );
        snapshot
    }

    /// Parses both feeds from JSON text and builds the snapshot.
    pub fn from_json(course_feed: &str, teacher_feed: &str) -> Result<Self> {
        let courses = CourseClassFeed::from_json_str(course_feed)?;
        let teachers = TeacherClassFeed::from_json_str(teacher_feed)?;
        Ok(Self::build(&courses, &teachers))
    }

    /// Reads both feeds from disk and builds the snapshot.
    pub fn from_files(course_feed: impl AsRef<Path>, teacher_feed: impl AsRef<Path>) -> Result<Self> {
        let courses = CourseClassFeed::from_file(course_feed)?;
        let teachers = TeacherClassFeed::from_file(teacher_feed)?;
        Ok(Self::build(&courses, &teachers))
    }

    /// Course by exact name.
    pub fn course(&self, name: &str) -> Option<&CourseRecord> {
        self.courses.get(name)
    }

    /// Number of distinct course names.
    pub fn course_count(&self) -> usize {
        self.courses.len()
    }

    /// All classes in declared order.
    pub fn classes(&self) -> &[ClassRecord] {
        &self.classes
    }

    /// All teacher assignments in declared order.
    pub fn assignments(&self) -> &[TeacherAssignmentRecord] {
        &self.assignments
    }

    /// All head-teacher records in declared order.
    pub fn header_teachers(&self) -> &[HeaderTeacherRecord] {
        &self.header_teachers
    }

    /// Grade name of the class with the given uid.
    pub fn grade_of_class(&self, class_uid: &Ident) -> Option<&str> {
        self.grade_by_class_uid.get(class_uid).map(String::as_str)
    }

    /// Grade code of a class.
    ///
    /// Prefers the grade group's code from the teacher feed (keyed by full
    /// class name), then the head-teacher record of the class uid.
    pub fn grade_code_of_class(&self, class_name: &str, class_uid: &Ident) -> Option<&Ident> {
        self.grade_code_by_class_name
            .get(class_name)
            .or_else(|| self.grade_code_by_class_uid.get(class_uid))
    }
}
