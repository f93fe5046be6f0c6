//! Directive validation.
//!
//! Checks a normalized directive against its scenario's field requirements
//! before any builder runs. Detects:
//! - Directives without detail blocks
//! - Missing required fields
//! - Wrong element counts for fixed-arity scenarios
//! - Grade lists that cannot be paired with class numbers
//!
//! Only the first detail block is checked; the teacher-cluster scenario,
//! which reads every block, has no required fields.

use std::collections::BTreeSet;

use crate::error::Error;
use crate::models::{Directive, DirectiveDetail, Scenario};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationIssue>>;

/// A validation issue.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    /// Issue category.
    pub kind: ValidationIssueKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation issues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssueKind {
    /// The directive has no detail blocks.
    NoDetails,
    /// A field the scenario reads is absent or empty.
    MissingField,
    /// A field has the wrong number of elements.
    ArityMismatch,
    /// Grades and class numbers cannot be paired.
    UnpairedClasses,
}

impl ValidationIssue {
    fn new(kind: ValidationIssueKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Directive fields a scenario may require.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Grade,
    Subject,
    Day,
    Period,
    Teacher,
    Class,
    MinClasses,
    MaxClasses,
}

impl Field {
    /// Field name as it appears in a raw directive.
    pub fn name(&self) -> &'static str {
        match self {
            Field::Grade => "grade",
            Field::Subject => "subject",
            Field::Day => "day",
            Field::Period => "period",
            Field::Teacher => "teacher",
            Field::Class => "class",
            Field::MinClasses => "min_classes",
            Field::MaxClasses => "max_classes",
        }
    }

    fn is_present(&self, d: &DirectiveDetail) -> bool {
        match self {
            Field::Grade => !d.grade.is_empty(),
            Field::Subject => !d.subject.is_empty(),
            Field::Day => !d.day.is_empty(),
            Field::Period => !d.period.is_empty(),
            Field::Teacher => !d.teacher.is_empty(),
            Field::Class => !d.class.is_empty(),
            Field::MinClasses => d.min_classes.is_some(),
            Field::MaxClasses => d.max_classes.is_some(),
        }
    }
}

/// Fields the scenario reads from its first detail block.
pub fn required_fields(scenario: Scenario) -> &'static [Field] {
    use Field::*;
    match scenario {
        Scenario::LessonTime => &[Grade, Subject, Day, Period],
        Scenario::CourseDayLimit => &[Grade, Subject, Day],
        Scenario::CoursePeriodLimit => &[Grade, Subject, Period],
        Scenario::ConsecutiveCourse => &[Grade, Subject, Period],
        Scenario::CourseNotSameDay => &[Grade, Subject],
        Scenario::MaxSamePeriod => &[Grade, Subject, MaxClasses],
        Scenario::MergedClass => &[Grade, Class, Subject, Teacher],
        Scenario::CrossClassLink => &[Grade, Class, Subject],
        Scenario::OddEvenWeek => &[Grade, Subject],
        Scenario::TeacherLessonTime => &[Grade, Teacher, Day, Period],
        Scenario::TeacherDayLimit => &[Grade, Teacher, Day, Period, MinClasses],
        Scenario::TeacherPeriodLimit => &[Period, MaxClasses],
        Scenario::TeacherMutex => &[Teacher],
        Scenario::TeacherCluster => &[],
    }
}

/// Validates a directive for a scenario.
///
/// Checks:
/// 1. At least one detail block (except teacher-cluster, which may be empty)
/// 2. Every field in [`required_fields`] is present
/// 3. Odd/even week: at least two subjects
/// 4. Merged class: exactly one teacher; one grade or one grade per class
/// 5. Teacher mutex: exactly two teachers
/// 6. Teacher lesson-time and day-limit: one distinct day
/// 7. Teacher lesson-time and period-limit: one distinct period
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(issues)` with all detected issues.
pub fn validate_directive(scenario: Scenario, directive: &Directive) -> ValidationResult {
    let detail = match directive.details.first() {
        Some(d) => d,
        None if scenario == Scenario::TeacherCluster => return Ok(()),
        None => {
            return Err(vec![ValidationIssue::new(
                ValidationIssueKind::NoDetails,
                "directive has no details",
            )])
        }
    };

    let mut issues = Vec::new();

    for field in required_fields(scenario) {
        if !field.is_present(detail) {
            issues.push(ValidationIssue::new(
                ValidationIssueKind::MissingField,
                format!("{} requires '{}'", scenario.envelope_type(), field.name()),
            ));
        }
    }

    match scenario {
        Scenario::OddEvenWeek if detail.subject.len() < 2 => {
            issues.push(ValidationIssue::new(
                ValidationIssueKind::ArityMismatch,
                "need at least two subjects",
            ));
        }
        Scenario::MergedClass => {
            if detail.teacher.len() != 1 {
                issues.push(ValidationIssue::new(
                    ValidationIssueKind::ArityMismatch,
                    format!("exactly one teacher required, got {}", detail.teacher.len()),
                ));
            }
            let (grades, classes) = (detail.grade.len(), detail.class.len());
            if grades > 1 && grades != classes {
                issues.push(ValidationIssue::new(
                    ValidationIssueKind::UnpairedClasses,
                    format!("{grades} grades cannot be paired with {classes} class numbers"),
                ));
            }
        }
        Scenario::TeacherMutex if detail.teacher.len() != 2 => {
            issues.push(ValidationIssue::new(
                ValidationIssueKind::ArityMismatch,
                "exactly two teacher names must be provided",
            ));
        }
        _ => {}
    }

    if matches!(
        scenario,
        Scenario::TeacherLessonTime | Scenario::TeacherDayLimit
    ) && distinct(&detail.day) > 1
    {
        issues.push(ValidationIssue::new(
            ValidationIssueKind::ArityMismatch,
            format!("exactly one day required, got {}", distinct(&detail.day)),
        ));
    }
    if matches!(
        scenario,
        Scenario::TeacherLessonTime | Scenario::TeacherPeriodLimit
    ) && distinct(&detail.period) > 1
    {
        issues.push(ValidationIssue::new(
            ValidationIssueKind::ArityMismatch,
            format!("exactly one period required, got {}", distinct(&detail.period)),
        ));
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

fn distinct<T: Ord>(values: &[T]) -> usize {
    values.iter().collect::<BTreeSet<_>>().len()
}

/// Validates and folds any issues into a single [`Error::Validation`].
pub fn ensure_valid(scenario: Scenario, directive: &Directive) -> crate::error::Result<()> {
    validate_directive(scenario, directive).map_err(|issues| {
        Error::validation(
            issues
                .iter()
                .map(|i| i.message.as_str())
                .collect::<Vec<_>>()
                .join("; "),
        )
    })
}
