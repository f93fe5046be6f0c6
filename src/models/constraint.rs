//! Constraint records consumed by the timetable solver.
//!
//! Every compiled directive becomes one [`ConstraintEnvelope`]: a routing
//! header, a `type` discriminator, and a payload whose shape depends on the
//! scenario. List-shaped scenarios carry `constraintJsons`; single-entry
//! scenarios carry `constraintJson`.
//!
//! Field names and fixed values mirror the solver's import format, so
//! several keys deviate from camelCase (`maxlimits`, `acourse`,
//! `perioddayType`, `ateacher`).

use serde::{Deserialize, Serialize};

use super::calendar::PeriodDay;
use super::directory::{ClassRecord, CourseRecord};
use super::scenario::Scenario;
use super::Ident;

/// How the solver treats the listed slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConstraintType {
    MustAssign,
    MustAvoid,
    MinMaxAssign,
    MaxAssign,
}

/// Which week of an odd/even pair the first course takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WeekParity {
    Odd,
    Even,
}

/// Full class entry used by course scenarios.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassEntry {
    pub grade_name: String,
    /// Grade-qualified name, e.g. `"初一01班"`.
    pub name: String,
    pub alias: String,
    pub uid: Ident,
    #[serde(rename = "type")]
    pub class_type: Ident,
}

impl From<&ClassRecord> for ClassEntry {
    fn from(c: &ClassRecord) -> Self {
        Self {
            grade_name: c.grade_name.clone(),
            name: c.full_name(),
            alias: String::new(),
            uid: c.uid.clone(),
            class_type: c.class_type.clone(),
        }
    }
}

/// Short class reference: `{uid, name}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassRef {
    pub uid: Ident,
    pub name: String,
}

impl From<&ClassRecord> for ClassRef {
    fn from(c: &ClassRecord) -> Self {
        Self {
            uid: c.uid.clone(),
            name: c.full_name(),
        }
    }
}

/// Short course reference: `{name, uid}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseRef {
    pub name: String,
    pub uid: Ident,
}

/// Teacher reference: `{uid, name}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeacherRef {
    pub uid: Ident,
    pub name: String,
}

impl TeacherRef {
    pub fn new(uid: Ident, name: impl Into<String>) -> Self {
        Self {
            uid,
            name: name.into(),
        }
    }
}

/// Slot constraint on courses for a set of classes.
///
/// Shared by lesson-time, course-day-limit and course-period-limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSlotConstraint {
    pub classes: Vec<ClassEntry>,
    pub courses: Vec<CourseRecord>,
    pub period_days: Vec<PeriodDay>,
    pub constraint_type: ConstraintType,
    pub limits: i64,
    #[serde(rename = "maxlimits")]
    pub max_limits: i64,
}

impl CourseSlotConstraint {
    /// Creates a slot constraint with the default limits (`1`, `-1`).
    pub fn new(
        classes: Vec<ClassEntry>,
        courses: Vec<CourseRecord>,
        period_days: Vec<PeriodDay>,
        constraint_type: ConstraintType,
    ) -> Self {
        Self {
            classes,
            courses,
            period_days,
            constraint_type,
            limits: 1,
            max_limits: -1,
        }
    }
}

/// Fixed double period of one course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsecutiveConstraint {
    pub gap: i64,
    pub limit: i64,
    pub constraint_type: ConstraintType,
    pub classes: Vec<ClassEntry>,
    pub period_day_clusters: Vec<Vec<PeriodDay>>,
    pub consecutive_type: String,
    #[serde(rename = "acourse")]
    pub a_course: CourseRecord,
    #[serde(rename = "bcourse")]
    pub b_course: CourseRecord,
    #[serde(rename = "perioddayType")]
    pub period_day_type: String,
    pub limit_type: String,
}

/// Two courses kept apart by `gap`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseToCourseConstraint {
    pub classes: Vec<ClassEntry>,
    pub courses: Vec<CourseRecord>,
    pub period_days: Vec<PeriodDay>,
    pub constraint_type: ConstraintType,
    pub prev_course: CourseRecord,
    pub next_course: CourseRecord,
    pub gap: i64,
    pub frequency: i64,
}

/// Cap on classes taking any of `courses` in the same period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaxSameTimeConstraint {
    #[serde(rename = "type")]
    pub kind: String,
    pub constraint_type: ConstraintType,
    pub limits: i64,
    pub classes: Vec<ClassEntry>,
    pub courses: Vec<CourseRecord>,
}

/// Classes merged under one teacher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeClassConstraint {
    #[serde(rename = "type")]
    pub kind: String,
    pub constraint_type: ConstraintType,
    pub classes: Vec<ClassRef>,
    pub courses: Vec<CourseRecord>,
    pub teacher: TeacherRef,
}

/// One side of an elective link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveCourseDetail {
    pub classes: Vec<ClassRef>,
    pub courses: CourseRef,
}

/// Elective ("走班") linkage across classes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveCourseConstraint {
    #[serde(rename = "type")]
    pub kind: String,
    pub move_course_details: Vec<MoveCourseDetail>,
}

/// Two courses alternating by week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvenOddLinkConstraint {
    #[serde(rename = "type")]
    pub kind: String,
    pub constraint_type: ConstraintType,
    pub classes: Vec<ClassEntry>,
    pub courses: Vec<CourseRecord>,
    #[serde(rename = "courseA")]
    pub course_a: CourseRef,
    #[serde(rename = "courseB")]
    pub course_b: CourseRef,
    #[serde(rename = "courseAOption")]
    pub course_a_option: WeekParity,
}

/// Teachers fixed to slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherSlotConstraint {
    pub teachers: Vec<TeacherRef>,
    pub period_days: Vec<PeriodDay>,
    pub constraint_type: ConstraintType,
    pub teacher_type: String,
}

/// Teacher load limits over slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherLimitConstraint {
    pub teachers: Vec<TeacherRef>,
    pub period_days: Vec<PeriodDay>,
    pub constraint_type: ConstraintType,
    pub limits: i64,
    #[serde(rename = "maxlimits")]
    pub max_limits: i64,
}

/// A course a teacher teaches, tagged with the grade short code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherCourse {
    pub name: String,
    pub uid: Ident,
    pub course_dcode: Ident,
    pub grade: String,
}

/// Two teachers never teaching in the same period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherMutexConstraint {
    pub mutex_type: String,
    #[serde(rename = "ateacher")]
    pub a_teacher: TeacherRef,
    pub a_courses: Vec<TeacherCourse>,
    #[serde(rename = "bteacher")]
    pub b_teacher: TeacherRef,
    pub b_courses: Vec<TeacherCourse>,
    pub error: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterCourse {
    pub name: String,
    pub uid: Ident,
    pub course_dcode: Ident,
    pub grade_dcode: Ident,
    pub checked: bool,
}

/// Consecutive-period cluster of one teacher in one class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherTimeCluster {
    pub courses: Vec<ClusterCourse>,
    pub teacher: TeacherRef,
    pub min_consecutive: i64,
    pub max_consecutive: i64,
    pub min_cluster_size: i64,
    pub max_cluster_size: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherClusterConstraint {
    pub teacher_time_clusters: Vec<TeacherTimeCluster>,
}

/// One constraint entry. Serialized without a variant tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConstraintJson {
    CourseSlot(CourseSlotConstraint),
    Consecutive(ConsecutiveConstraint),
    CourseToCourse(CourseToCourseConstraint),
    MaxSameTime(MaxSameTimeConstraint),
    MergeClass(MergeClassConstraint),
    MoveCourse(MoveCourseConstraint),
    EvenOddLink(EvenOddLinkConstraint),
    TeacherSlot(TeacherSlotConstraint),
    TeacherLimit(TeacherLimitConstraint),
    TeacherMutex(TeacherMutexConstraint),
    TeacherCluster(TeacherClusterConstraint),
}

/// Payload of an envelope: a list of entries or a single entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Payload {
    #[serde(rename = "constraintJsons")]
    Many(Vec<ConstraintJson>),
    #[serde(rename = "constraintJson")]
    One(ConstraintJson),
}

/// Routing identifiers shared by every envelope of a deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvelopeHeader {
    pub project_id: i64,
    pub project_scenario_id: i64,
}

/// One compiled output record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintEnvelope {
    pub project_id: i64,
    pub project_scenario_id: i64,
    #[serde(rename = "type")]
    pub envelope_type: String,
    #[serde(flatten)]
    pub payload: Payload,
}

impl ConstraintEnvelope {
    /// Creates a list-shaped envelope.
    pub fn many(header: EnvelopeHeader, scenario: Scenario, entries: Vec<ConstraintJson>) -> Self {
        Self::with_payload(header, scenario, Payload::Many(entries))
    }

    /// Creates a single-entry envelope.
    pub fn one(header: EnvelopeHeader, scenario: Scenario, entry: ConstraintJson) -> Self {
        Self::with_payload(header, scenario, Payload::One(entry))
    }

    fn with_payload(header: EnvelopeHeader, scenario: Scenario, payload: Payload) -> Self {
        Self {
            project_id: header.project_id,
            project_scenario_id: header.project_scenario_id,
            envelope_type: scenario.envelope_type().to_string(),
            payload,
        }
    }

    /// Entries of the payload, regardless of shape.
    pub fn entries(&self) -> &[ConstraintJson] {
        match &self.payload {
            Payload::Many(entries) => entries,
            Payload::One(entry) => std::slice::from_ref(entry),
        }
    }

    /// Whether the payload is list-shaped.
    pub fn is_list(&self) -> bool {
        matches!(self.payload, Payload::Many(_))
    }
}
