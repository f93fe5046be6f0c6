//! Course scenario builders.
//!
//! Each builder reads the first detail block of a validated directive.
//! Unknown subjects become placeholder courses in the slot, day-limit,
//! period-limit, not-same-day and max-same-period scenarios; the
//! consecutive, merged-class, cross-class and odd/even scenarios require
//! every course to resolve.

use tracing::warn;

use super::{zip3_truncating, zip_truncating};
use crate::error::{Error, Result};
use crate::models::{
    ClassEntry, ClassRef, ConsecutiveConstraint, ConstraintEnvelope, ConstraintJson,
    ConstraintType, CourseRef, CourseSlotConstraint, CourseToCourseConstraint, Directive,
    DirectorySnapshot, EnvelopeHeader, EvenOddLinkConstraint, MaxSameTimeConstraint,
    MergeClassConstraint, MoveCourseConstraint, MoveCourseDetail, PeriodDay, Scenario,
    TeacherRef, WeekParity, EVERY_DAY,
};
use crate::resolver;

/// Subject word that marks a slot to keep free.
pub const AVOID_KEYWORD: &str = "不排";

/// Minimum days between two courses that must not share a day.
const NOT_SAME_DAY_GAP: i64 = 9;

fn class_entries(directory: &DirectorySnapshot, grade: &str) -> Vec<ClassEntry> {
    let classes = resolver::classes_of_grade(directory, grade);
    if classes.is_empty() {
        warn!(grade, "grade has no classes in directory");
    }
    classes.into_iter().map(ClassEntry::from).collect()
}

fn class_entries_of_grades(directory: &DirectorySnapshot, grades: &[String]) -> Vec<ClassEntry> {
    grades
        .iter()
        .flat_map(|g| class_entries(directory, g))
        .collect()
}

/// Course at (day, period) per parallel subject/day/period triple.
///
/// Emits `|grade| × min(|subject|, |day|, |period|)` entries.
pub(super) fn lesson_time(
    directory: &DirectorySnapshot,
    header: EnvelopeHeader,
    directive: &Directive,
) -> Result<Option<ConstraintEnvelope>> {
    let d = directive.primary()?;
    let triples = zip3_truncating(&d.subject, &d.day, &d.period).logged(Scenario::LessonTime);

    let mut entries = Vec::new();
    for grade in &d.grade {
        let classes = class_entries(directory, grade);
        for &(subject, &day, &period) in &triples {
            let constraint_type = if subject == AVOID_KEYWORD {
                ConstraintType::MustAvoid
            } else {
                ConstraintType::MustAssign
            };
            entries.push(ConstraintJson::CourseSlot(CourseSlotConstraint::new(
                classes.clone(),
                vec![resolver::course_or_placeholder(directory, subject)],
                vec![PeriodDay::new(period as i32, day as i32)],
                constraint_type,
            )));
        }
    }

    Ok(Some(ConstraintEnvelope::many(header, Scenario::LessonTime, entries)))
}

/// At least one lesson per listed day, one entry per subject.
///
/// Applies to the classes of the first grade.
pub(super) fn course_day_limit(
    directory: &DirectorySnapshot,
    header: EnvelopeHeader,
    directive: &Directive,
) -> Result<Option<ConstraintEnvelope>> {
    let d = directive.primary()?;
    let classes = class_entries(directory, &d.grade[0]);
    let period_days: Vec<PeriodDay> = d
        .day
        .iter()
        .map(|&day| PeriodDay::whole_day(day as i32))
        .collect();

    let entries = d
        .subject
        .iter()
        .map(|subject| {
            ConstraintJson::CourseSlot(CourseSlotConstraint::new(
                classes.clone(),
                vec![resolver::course_or_placeholder(directory, subject)],
                period_days.clone(),
                ConstraintType::MinMaxAssign,
            ))
        })
        .collect();

    Ok(Some(ConstraintEnvelope::many(header, Scenario::CourseDayLimit, entries)))
}

/// Course fixed at a period on given days.
///
/// One entry per (grade, subject, paired period/day).
pub(super) fn course_period_limit(
    directory: &DirectorySnapshot,
    header: EnvelopeHeader,
    directive: &Directive,
) -> Result<Option<ConstraintEnvelope>> {
    let d = directive.primary()?;
    let pairs = zip_truncating(&d.period, &d.day).logged(Scenario::CoursePeriodLimit);

    let mut entries = Vec::new();
    for grade in &d.grade {
        let classes = class_entries(directory, grade);
        for subject in &d.subject {
            let course = resolver::course_or_placeholder(directory, subject);
            for &(&period, &day) in &pairs {
                entries.push(ConstraintJson::CourseSlot(CourseSlotConstraint::new(
                    classes.clone(),
                    vec![course.clone()],
                    vec![PeriodDay::new(period as i32, day as i32)],
                    ConstraintType::MustAssign,
                )));
            }
        }
    }

    Ok(Some(ConstraintEnvelope::many(header, Scenario::CoursePeriodLimit, entries)))
}

/// Fixed double period on one day, one entry per subject.
///
/// All periods form a single cluster on the first listed day, or on every
/// day if none is listed.
pub(super) fn consecutive_course(
    directory: &DirectorySnapshot,
    header: EnvelopeHeader,
    directive: &Directive,
) -> Result<Option<ConstraintEnvelope>> {
    let d = directive.primary()?;
    let classes = class_entries(directory, &d.grade[0]);
    let day = d.day.first().map_or(EVERY_DAY, |&day| day as i32);
    let cluster = PeriodDay::on_day(day, &d.period);

    let mut entries = Vec::with_capacity(d.subject.len());
    for subject in &d.subject {
        let course = resolver::require_course(directory, subject)?;
        entries.push(ConstraintJson::Consecutive(ConsecutiveConstraint {
            gap: 0,
            limit: 1,
            constraint_type: ConstraintType::MustAssign,
            classes: classes.clone(),
            period_day_clusters: vec![cluster.clone()],
            consecutive_type: "FIXED".to_string(),
            a_course: course.clone(),
            b_course: course,
            period_day_type: "DAY".to_string(),
            limit_type: "EXACT".to_string(),
        }));
    }

    Ok(Some(ConstraintEnvelope::many(header, Scenario::ConsecutiveCourse, entries)))
}

/// Two courses never on the same day.
///
/// Returns `None` when fewer than two subjects are given. Unknown
/// subjects fall back to placeholders.
pub(super) fn course_not_same_day(
    directory: &DirectorySnapshot,
    header: EnvelopeHeader,
    directive: &Directive,
) -> Result<Option<ConstraintEnvelope>> {
    let d = directive.primary()?;
    let [prev, next, ..] = d.subject.as_slice() else {
        warn!(
            subjects = d.subject.len(),
            "need at least two subjects for this constraint"
        );
        return Ok(None);
    };

    let entry = CourseToCourseConstraint {
        classes: class_entries(directory, &d.grade[0]),
        courses: Vec::new(),
        period_days: Vec::new(),
        constraint_type: ConstraintType::MustAssign,
        prev_course: resolver::course_or_placeholder(directory, prev),
        next_course: resolver::course_or_placeholder(directory, next),
        gap: NOT_SAME_DAY_GAP,
        frequency: 0,
    };

    Ok(Some(ConstraintEnvelope::many(
        header,
        Scenario::CourseNotSameDay,
        vec![ConstraintJson::CourseToCourse(entry)],
    )))
}

/// Cap on concurrent classes, aggregated over all grades and subjects.
pub(super) fn max_same_period(
    directory: &DirectorySnapshot,
    header: EnvelopeHeader,
    directive: &Directive,
) -> Result<Option<ConstraintEnvelope>> {
    let d = directive.primary()?;
    let limits = d
        .max_classes
        .ok_or_else(|| Error::validation("max_classes is required"))?;

    let entry = MaxSameTimeConstraint {
        kind: "MAX_SAME_TIME".to_string(),
        constraint_type: ConstraintType::MaxAssign,
        limits,
        classes: class_entries_of_grades(directory, &d.grade),
        courses: d
            .subject
            .iter()
            .map(|s| resolver::course_or_placeholder(directory, s))
            .collect(),
    };

    Ok(Some(ConstraintEnvelope::one(
        header,
        Scenario::MaxSamePeriod,
        ConstraintJson::MaxSameTime(entry),
    )))
}

/// Several classes taught together by one teacher.
///
/// Classes are resolved per (grade, class number) pair; a single grade
/// applies to every class number. Every class, course and the teacher
/// must resolve.
pub(super) fn merged_class(
    directory: &DirectorySnapshot,
    header: EnvelopeHeader,
    directive: &Directive,
) -> Result<Option<ConstraintEnvelope>> {
    let d = directive.primary()?;

    let mut classes = Vec::with_capacity(d.class.len());
    for (i, number) in d.class.iter().enumerate() {
        let grade = if d.grade.len() == 1 {
            &d.grade[0]
        } else {
            &d.grade[i]
        };
        classes.push(ClassRef::from(resolver::require_class(directory, grade, number)?));
    }

    let courses = d
        .subject
        .iter()
        .map(|s| resolver::require_course(directory, s))
        .collect::<Result<Vec<_>>>()?;

    let teacher = resolver::require_teacher(directory, &d.teacher[0])?;

    let entry = MergeClassConstraint {
        kind: "MERGE_CLASS".to_string(),
        constraint_type: ConstraintType::MustAssign,
        classes,
        courses,
        teacher: TeacherRef::new(teacher.teacher_uid.clone(), teacher.teacher_name.trim()),
    };

    Ok(Some(ConstraintEnvelope::one(
        header,
        Scenario::MergedClass,
        ConstraintJson::MergeClass(entry),
    )))
}

/// Elective linkage, one detail per parallel (grade, class, subject) triple.
pub(super) fn cross_class_link(
    directory: &DirectorySnapshot,
    header: EnvelopeHeader,
    directive: &Directive,
) -> Result<Option<ConstraintEnvelope>> {
    let d = directive.primary()?;
    let triples = zip3_truncating(&d.grade, &d.class, &d.subject).logged(Scenario::CrossClassLink);

    let mut details = Vec::with_capacity(triples.len());
    for (grade, number, subject) in triples {
        let class = resolver::require_class(directory, grade, number)?;
        let course = resolver::require_course(directory, subject)?;
        details.push(MoveCourseDetail {
            classes: vec![ClassRef::from(class)],
            courses: CourseRef {
                name: subject.clone(),
                uid: course.uid,
            },
        });
    }

    let entry = MoveCourseConstraint {
        kind: "MOVECOURSE".to_string(),
        move_course_details: details,
    };

    Ok(Some(ConstraintEnvelope::one(
        header,
        Scenario::CrossClassLink,
        ConstraintJson::MoveCourse(entry),
    )))
}

/// Two courses alternating weekly; the first listed takes odd weeks.
pub(super) fn odd_even_week(
    directory: &DirectorySnapshot,
    header: EnvelopeHeader,
    directive: &Directive,
) -> Result<Option<ConstraintEnvelope>> {
    let d = directive.primary()?;
    let [first, second, ..] = d.subject.as_slice() else {
        return Err(Error::validation("need at least two subjects"));
    };

    let course_a = resolver::require_course(directory, first)?;
    let course_b = resolver::require_course(directory, second)?;

    let entry = EvenOddLinkConstraint {
        kind: "EVENODDLINK".to_string(),
        constraint_type: ConstraintType::MaxAssign,
        classes: class_entries_of_grades(directory, &d.grade),
        courses: Vec::new(),
        course_a: CourseRef {
            name: first.clone(),
            uid: course_a.uid,
        },
        course_b: CourseRef {
            name: second.clone(),
            uid: course_b.uid,
        },
        course_a_option: WeekParity::Odd,
    };

    Ok(Some(ConstraintEnvelope::one(
        header,
        Scenario::OddEvenWeek,
        ConstraintJson::EvenOddLink(entry),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LookupKind;
    use crate::models::{CourseRecord, DirectiveDetail, Ident};
    use crate::testing;

    const HEADER: EnvelopeHeader = EnvelopeHeader {
        project_id: 458,
        project_scenario_id: 984,
    };

    fn directive(detail: DirectiveDetail) -> Directive {
        Directive::new(vec![detail])
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn slots(env: &ConstraintEnvelope) -> Vec<&CourseSlotConstraint> {
        env.entries()
            .iter()
            .map(|e| match e {
                ConstraintJson::CourseSlot(s) => s,
                other => panic!("unexpected entry {other:?}"),
            })
            .collect()
    }

    #[test]
    fn test_lesson_time_assign_and_avoid() {
        let dir = testing::directory();
        let d = directive(DirectiveDetail {
            grade: strings(&["初一"]),
            subject: strings(&["体活", "不排"]),
            day: vec![1, 2],
            period: vec![9, 9],
            ..Default::default()
        });
        let env = lesson_time(&dir, HEADER, &d).unwrap().unwrap();
        assert_eq!(env.envelope_type, "COURSETIME");
        let s = slots(&env);
        assert_eq!(s.len(), 2);

        assert_eq!(s[0].period_days, vec![PeriodDay::new(9, 1)]);
        assert_eq!(s[0].constraint_type, ConstraintType::MustAssign);
        assert_eq!(s[0].courses[0].name, "体活");

        assert_eq!(s[1].period_days, vec![PeriodDay::new(9, 2)]);
        assert_eq!(s[1].constraint_type, ConstraintType::MustAvoid);
        assert_eq!(s[1].courses[0], CourseRecord::placeholder("不排"));

        assert_eq!(s[0].classes.len(), 4);
        assert_eq!(s[0].classes[0].name, "初一01班");
        assert_eq!((s[0].limits, s[0].max_limits), (1, -1));
    }

    #[test]
    fn test_lesson_time_entry_count() {
        let dir = testing::directory();
        let d = directive(DirectiveDetail {
            grade: strings(&["初一", "初二"]),
            subject: strings(&["英语", "语文", "数学"]),
            day: vec![3, 3],
            period: vec![5, 6, 7],
            ..Default::default()
        });
        let env = lesson_time(&dir, HEADER, &d).unwrap().unwrap();
        // 2 grades × min(3, 2, 3)
        assert_eq!(env.entries().len(), 4);
    }

    #[test]
    fn test_course_day_limit() {
        let dir = testing::directory();
        let d = directive(DirectiveDetail {
            grade: strings(&["初一"]),
            subject: strings(&["语文"]),
            day: vec![1, 2, 3, 4, 5],
            max_classes: Some(1),
            ..Default::default()
        });
        let env = course_day_limit(&dir, HEADER, &d).unwrap().unwrap();
        let s = slots(&env);
        assert_eq!(s.len(), 1);
        assert_eq!(s[0].constraint_type, ConstraintType::MinMaxAssign);
        assert_eq!(s[0].period_days.len(), 5);
        assert!(s[0].period_days.iter().all(|pd| pd.period == -1));
        assert_eq!(s[0].period_days[4].day_of_week, 5);
    }

    #[test]
    fn test_course_period_limit_skips_unpaired() {
        let dir = testing::directory();
        let d = directive(DirectiveDetail {
            grade: strings(&["初一", "初二"]),
            subject: strings(&["数学"]),
            day: vec![1, 2, 3, 4, 5],
            period: vec![1],
            min_classes: Some(1),
            ..Default::default()
        });
        let env = course_period_limit(&dir, HEADER, &d).unwrap().unwrap();
        let s = slots(&env);
        assert_eq!(s.len(), 2);
        assert_eq!(s[0].period_days, vec![PeriodDay::new(1, 1)]);
        assert_eq!(s[1].classes[0].grade_name, "初二");
        assert!(s.iter().all(|e| e.constraint_type == ConstraintType::MustAssign));
    }

    #[test]
    fn test_consecutive_course_clusters_periods() {
        let dir = testing::directory();
        let d = directive(DirectiveDetail {
            grade: strings(&["初一"]),
            subject: strings(&["语文"]),
            day: vec![3],
            period: vec![6, 7, 8, 9],
            ..Default::default()
        });
        let env = consecutive_course(&dir, HEADER, &d).unwrap().unwrap();
        let ConstraintJson::Consecutive(c) = &env.entries()[0] else {
            panic!("wrong variant");
        };
        assert_eq!(c.period_day_clusters.len(), 1);
        assert_eq!(c.period_day_clusters[0], PeriodDay::on_day(3, &[6, 7, 8, 9]));
        assert_eq!(c.a_course, c.b_course);
        assert_eq!(c.a_course.uid, Ident::Int(11));
        assert_eq!(c.consecutive_type, "FIXED");
        assert_eq!(c.limit_type, "EXACT");
    }

    #[test]
    fn test_consecutive_course_without_day_and_unknown_course() {
        let dir = testing::directory();
        let d = directive(DirectiveDetail {
            grade: strings(&["初一"]),
            subject: strings(&["语文"]),
            period: vec![1, 2],
            ..Default::default()
        });
        let env = consecutive_course(&dir, HEADER, &d).unwrap().unwrap();
        let ConstraintJson::Consecutive(c) = &env.entries()[0] else {
            panic!("wrong variant");
        };
        assert!(c.period_day_clusters[0].iter().all(|pd| pd.day_of_week == -1));

        let unknown = directive(DirectiveDetail {
            subject: strings(&["书法"]),
            ..d.details[0].clone()
        });
        let err = consecutive_course(&dir, HEADER, &unknown).unwrap_err();
        assert!(matches!(err, Error::Lookup { kind: LookupKind::Course, .. }));
    }

    #[test]
    fn test_course_not_same_day() {
        let dir = testing::directory();
        let d = directive(DirectiveDetail {
            grade: strings(&["初一"]),
            subject: strings(&["综合实践1", "综合实践2"]),
            ..Default::default()
        });
        let env = course_not_same_day(&dir, HEADER, &d).unwrap().unwrap();
        let ConstraintJson::CourseToCourse(c) = &env.entries()[0] else {
            panic!("wrong variant");
        };
        assert_eq!(c.prev_course.name, "综合实践1");
        assert_eq!(c.prev_course.uid, Ident::Int(18));
        assert_eq!(c.next_course, CourseRecord::placeholder("综合实践2"));
        assert_eq!(c.gap, 9);
        assert_eq!(c.frequency, 0);
        assert!(c.courses.is_empty() && c.period_days.is_empty());
    }

    #[test]
    fn test_course_not_same_day_single_subject_is_absent() {
        let dir = testing::directory();
        let d = directive(DirectiveDetail {
            grade: strings(&["初一"]),
            subject: strings(&["综合实践1"]),
            ..Default::default()
        });
        assert!(course_not_same_day(&dir, HEADER, &d).unwrap().is_none());
    }

    #[test]
    fn test_max_same_period_aggregates() {
        let dir = testing::directory();
        let d = directive(DirectiveDetail {
            grade: strings(&["初一", "初二"]),
            subject: strings(&["信息技术", "体育"]),
            max_classes: Some(2),
            ..Default::default()
        });
        let env = max_same_period(&dir, HEADER, &d).unwrap().unwrap();
        assert!(!env.is_list());
        assert_eq!(env.entries().len(), 1);
        let ConstraintJson::MaxSameTime(c) = &env.entries()[0] else {
            panic!("wrong variant");
        };
        assert_eq!(c.classes.len(), 6);
        assert_eq!(c.courses.len(), 2);
        assert!(c.courses[0].is_placeholder());
        assert_eq!(c.limits, 2);
        assert_eq!(c.constraint_type, ConstraintType::MaxAssign);
    }

    #[test]
    fn test_merged_class() {
        let dir = testing::directory();
        let d = directive(DirectiveDetail {
            grade: strings(&["初一", "初一"]),
            class: strings(&["6", "7"]),
            subject: strings(&["体育"]),
            teacher: strings(&["张佳辉"]),
            ..Default::default()
        });
        let env = merged_class(&dir, HEADER, &d).unwrap().unwrap();
        let ConstraintJson::MergeClass(c) = &env.entries()[0] else {
            panic!("wrong variant");
        };
        let names: Vec<&str> = c.classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["初一06班", "初一07班"]);
        assert_eq!(c.teacher, TeacherRef::new(Ident::from("t1"), "张佳辉"));
        assert_eq!(c.courses[0].uid, Ident::Int(115));
    }

    #[test]
    fn test_merged_class_unknown_class_number_fails() {
        let dir = testing::directory();
        let d = directive(DirectiveDetail {
            grade: strings(&["初一"]),
            class: strings(&["6", "9"]),
            subject: strings(&["体育"]),
            teacher: strings(&["张佳辉"]),
            ..Default::default()
        });
        let err = merged_class(&dir, HEADER, &d).unwrap_err();
        assert!(matches!(err, Error::Lookup { kind: LookupKind::Class, .. }));
    }

    #[test]
    fn test_merged_class_unknown_teacher_fails() {
        let dir = testing::directory();
        let d = directive(DirectiveDetail {
            grade: strings(&["初一"]),
            class: strings(&["6"]),
            subject: strings(&["体育"]),
            teacher: strings(&["王五"]),
            ..Default::default()
        });
        let err = merged_class(&dir, HEADER, &d).unwrap_err();
        assert!(matches!(err, Error::Lookup { kind: LookupKind::Teacher, .. }));
    }

    #[test]
    fn test_cross_class_link() {
        let dir = testing::directory();
        let d = directive(DirectiveDetail {
            grade: strings(&["初一", "初一"]),
            class: strings(&["1", "3"]),
            subject: strings(&["生物", "地理", "历史"]),
            ..Default::default()
        });
        let env = cross_class_link(&dir, HEADER, &d).unwrap().unwrap();
        let ConstraintJson::MoveCourse(c) = &env.entries()[0] else {
            panic!("wrong variant");
        };
        assert_eq!(c.move_course_details.len(), 2);
        assert_eq!(c.move_course_details[0].classes[0].name, "初一01班");
        assert_eq!(c.move_course_details[1].courses.name, "地理");
        assert_eq!(c.move_course_details[1].courses.uid, Ident::Int(17));
    }

    #[test]
    fn test_cross_class_link_unknown_course_fails() {
        let dir = testing::directory();
        let d = directive(DirectiveDetail {
            grade: strings(&["初一"]),
            class: strings(&["1"]),
            subject: strings(&["历史"]),
            ..Default::default()
        });
        let err = cross_class_link(&dir, HEADER, &d).unwrap_err();
        assert!(matches!(err, Error::Lookup { kind: LookupKind::Course, .. }));
    }

    #[test]
    fn test_odd_even_week() {
        let dir = testing::directory();
        let d = directive(DirectiveDetail {
            grade: strings(&["初二"]),
            subject: strings(&["美术", "音乐"]),
            ..Default::default()
        });
        let env = odd_even_week(&dir, HEADER, &d).unwrap().unwrap();
        let ConstraintJson::EvenOddLink(c) = &env.entries()[0] else {
            panic!("wrong variant");
        };
        assert_eq!(c.course_a.name, "美术");
        assert_eq!(c.course_b.uid, Ident::Int(22));
        assert_eq!(c.course_a_option, WeekParity::Odd);
        assert_eq!(c.classes.len(), 2);
    }

    #[test]
    fn test_odd_even_week_requires_known_courses() {
        let dir = testing::directory();
        let d = directive(DirectiveDetail {
            grade: strings(&["初二"]),
            subject: strings(&["美术", "书法"]),
            ..Default::default()
        });
        assert!(matches!(
            odd_even_week(&dir, HEADER, &d),
            Err(Error::Lookup { kind: LookupKind::Course, .. })
        ));

        let single = directive(DirectiveDetail {
            grade: strings(&["初二"]),
            subject: strings(&["美术"]),
            ..Default::default()
        });
        assert!(matches!(
            odd_even_week(&dir, HEADER, &single),
            Err(Error::Validation(_))
        ));
    }
}
