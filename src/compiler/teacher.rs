//! Teacher scenario builders.
//!
//! Teacher sets are matched by substring on class and course names (see
//! [`resolver::teachers_of_grade_and_subject`]) and deduplicated by uid,
//! keeping first-seen order.

use std::collections::HashSet;

use tracing::warn;

use crate::error::{Error, LookupKind, Result};
use crate::models::{
    ClusterCourse, ConstraintEnvelope, ConstraintJson, ConstraintType, Directive,
    DirectorySnapshot, EnvelopeHeader, PeriodDay, Scenario, TeacherAssignmentRecord,
    TeacherClusterConstraint, TeacherCourse, TeacherLimitConstraint, TeacherMutexConstraint,
    TeacherRef, TeacherSlotConstraint, TeacherTimeCluster,
};
use crate::resolver;

/// Consecutive length and cluster size of every teacher cluster.
const CLUSTER_SIZE: i64 = 2;

fn teacher_refs<'a>(
    assignments: impl IntoIterator<Item = &'a TeacherAssignmentRecord>,
) -> Vec<TeacherRef> {
    let mut seen = HashSet::new();
    assignments
        .into_iter()
        .filter(|a| seen.insert(a.teacher_uid.clone()))
        .map(|a| TeacherRef::new(a.teacher_uid.clone(), a.teacher_name.trim()))
        .collect()
}

/// Teachers of a subject fixed to one slot.
///
/// Returns `None` when no assignment matches the grade and subject.
pub(super) fn lesson_time(
    directory: &DirectorySnapshot,
    header: EnvelopeHeader,
    directive: &Directive,
) -> Result<Option<ConstraintEnvelope>> {
    let d = directive.primary()?;
    let (grade, subject) = (&d.grade[0], &d.teacher[0]);

    let teachers = teacher_refs(resolver::teachers_of_grade_and_subject(directory, grade, subject));
    if teachers.is_empty() {
        warn!(grade = %grade, subject = %subject, "no teachers found");
        return Ok(None);
    }

    let entry = TeacherSlotConstraint {
        teachers,
        period_days: vec![PeriodDay::new(d.period[0] as i32, d.day[0] as i32)],
        constraint_type: ConstraintType::MustAssign,
        teacher_type: "TEACHER".to_string(),
    };

    Ok(Some(ConstraintEnvelope::one(
        header,
        Scenario::TeacherLessonTime,
        ConstraintJson::TeacherSlot(entry),
    )))
}

/// Per-day load of a subject's teachers over some periods of one day.
///
/// A minimum of zero keeps the slots free (`MUST_AVOID`, no upper bound);
/// otherwise the minimum doubles as the upper bound.
pub(super) fn day_limit(
    directory: &DirectorySnapshot,
    header: EnvelopeHeader,
    directive: &Directive,
) -> Result<Option<ConstraintEnvelope>> {
    let d = directive.primary()?;
    let (grade, subject) = (&d.grade[0], &d.teacher[0]);
    let min_classes = d
        .min_classes
        .ok_or_else(|| Error::validation("min_classes is required"))?;

    let teachers = teacher_refs(resolver::teachers_of_grade_and_subject(directory, grade, subject));
    if teachers.is_empty() {
        warn!(grade = %grade, subject = %subject, "no teachers found");
        return Ok(None);
    }

    let (constraint_type, max_limits) = if min_classes == 0 {
        (ConstraintType::MustAvoid, -1)
    } else {
        (ConstraintType::MustAssign, min_classes)
    };

    let entry = TeacherLimitConstraint {
        teachers,
        period_days: PeriodDay::on_day(d.day[0] as i32, &d.period),
        constraint_type,
        limits: 1,
        max_limits,
    };

    Ok(Some(ConstraintEnvelope::one(
        header,
        Scenario::TeacherDayLimit,
        ConstraintJson::TeacherLimit(entry),
    )))
}

/// Cap on how often any teacher teaches a period across the week.
///
/// Applies to every teacher in the directory. A non-positive cap means
/// unlimited.
pub(super) fn period_limit(
    directory: &DirectorySnapshot,
    header: EnvelopeHeader,
    directive: &Directive,
) -> Result<Option<ConstraintEnvelope>> {
    let d = directive.primary()?;
    let max_classes = d
        .max_classes
        .ok_or_else(|| Error::validation("max_classes is required"))?;

    let entry = TeacherLimitConstraint {
        teachers: teacher_refs(directory.assignments()),
        period_days: vec![PeriodDay::every_day(d.period[0] as i32)],
        constraint_type: ConstraintType::MinMaxAssign,
        limits: -1,
        max_limits: if max_classes > 0 { max_classes } else { -1 },
    };

    Ok(Some(ConstraintEnvelope::one(
        header,
        Scenario::TeacherPeriodLimit,
        ConstraintJson::TeacherLimit(entry),
    )))
}

fn course_load(directory: &DirectorySnapshot, name: &str) -> Vec<TeacherCourse> {
    resolver::assignments_of_teacher(directory, name)
        .into_iter()
        .map(|a| TeacherCourse {
            name: a.course_name.clone(),
            uid: a.course_uid.clone(),
            course_dcode: a.course_dcode.clone(),
            grade: directory
                .grade_of_class(&a.class_uid)
                .map(resolver::grade_short_code)
                .unwrap_or_default()
                .to_string(),
        })
        .collect()
}

/// Two teachers never teaching in the same period.
///
/// Both teachers must exist; each side lists the teacher's full course
/// load with grade short codes.
pub(super) fn mutex(
    directory: &DirectorySnapshot,
    header: EnvelopeHeader,
    directive: &Directive,
) -> Result<Option<ConstraintEnvelope>> {
    let d = directive.primary()?;
    let [a_name, b_name] = d.teacher.as_slice() else {
        return Err(Error::validation("exactly two teacher names must be provided"));
    };

    let a = resolver::require_teacher(directory, a_name)?;
    let b = resolver::require_teacher(directory, b_name)?;

    let entry = TeacherMutexConstraint {
        mutex_type: "ALL".to_string(),
        a_teacher: TeacherRef::new(a.teacher_uid.clone(), a_name.as_str()),
        a_courses: course_load(directory, a_name),
        b_teacher: TeacherRef::new(b.teacher_uid.clone(), b_name.as_str()),
        b_courses: course_load(directory, b_name),
        error: false,
    };

    Ok(Some(ConstraintEnvelope::many(
        header,
        Scenario::TeacherMutex,
        vec![ConstraintJson::TeacherMutex(entry)],
    )))
}

/// Grade prefix of a full class name: `"初二01班"` → `"初二"`.
fn grade_prefix(class_name: &str) -> String {
    class_name.chars().take(2).collect()
}

/// Same teacher teaching different classes back to back.
///
/// Reads every detail block. Each assignment whose grade is listed and
/// whose course equals one of the subject tokens (teacher suffix
/// stripped) yields one cluster. Returns `None` when nothing matches.
pub(super) fn cluster(
    directory: &DirectorySnapshot,
    header: EnvelopeHeader,
    directive: &Directive,
) -> Result<Option<ConstraintEnvelope>> {
    let mut clusters = Vec::new();

    for detail in &directive.details {
        let subjects: Vec<&str> = detail
            .teacher
            .iter()
            .map(|t| resolver::strip_teacher_suffix(t))
            .collect();

        for a in directory.assignments() {
            let grade = grade_prefix(&a.class_name);
            if !detail.grade.contains(&grade) || !subjects.contains(&a.course_name.as_str()) {
                continue;
            }
            let grade_dcode = directory
                .grade_code_of_class(&a.class_name, &a.class_uid)
                .ok_or_else(|| Error::lookup(LookupKind::GradeCode, a.class_name.as_str()))?;

            clusters.push(TeacherTimeCluster {
                courses: vec![ClusterCourse {
                    name: a.course_name.clone(),
                    uid: a.course_uid.clone(),
                    course_dcode: a.course_dcode.clone(),
                    grade_dcode: grade_dcode.clone(),
                    checked: true,
                }],
                teacher: TeacherRef::new(a.teacher_uid.clone(), a.teacher_name.trim()),
                min_consecutive: CLUSTER_SIZE,
                max_consecutive: CLUSTER_SIZE,
                min_cluster_size: CLUSTER_SIZE,
                max_cluster_size: CLUSTER_SIZE,
            });
        }
    }

    if clusters.is_empty() {
        warn!("no teacher assignments match the requested grades and subjects");
        return Ok(None);
    }

    Ok(Some(ConstraintEnvelope::one(
        header,
        Scenario::TeacherCluster,
        ConstraintJson::TeacherCluster(TeacherClusterConstraint {
            teacher_time_clusters: clusters,
        }),
    )))
}
