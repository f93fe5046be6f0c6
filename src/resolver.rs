//! Entity resolution against the directory.
//!
//! Resolves the free-text names carried by a directive (grades, class
//! numbers, subjects, teachers) to directory records.
//!
//! # Matching Rules
//!
//! | Lookup | Match |
//! |--------|-------|
//! | classes of a grade | exact grade name |
//! | class by number | exact grade + `NN班` |
//! | course | exact name; placeholder or error on miss |
//! | teacher by name | exact after trimming |
//! | teachers of grade and subject | substring on class and course names |
//!
//! The substring rule for teacher sets tolerates partial grade/class names
//! coming from upstream text (`"初一"` matches class `"初一01班"`).

use crate::error::{Error, LookupKind, Result};
use crate::models::{ClassRecord, CourseRecord, DirectorySnapshot, TeacherAssignmentRecord};

/// Unit word appended to class numbers.
pub const CLASS_UNIT: &str = "班";

/// Suffix stripped from role tokens such as `"数学老师"`.
pub const TEACHER_SUFFIX: &str = "老师";

/// All classes of a grade, in directory order.
pub fn classes_of_grade<'a>(directory: &'a DirectorySnapshot, grade: &str) -> Vec<&'a ClassRecord> {
    directory
        .classes()
        .iter()
        .filter(|c| c.grade_name == grade)
        .collect()
}

/// Formats a class number as its in-grade name: `"6"` → `"06班"`.
///
/// Fails with a validation error if the number is not an integer.
pub fn format_class_number(number: &str) -> Result<String> {
    let n: u32 = number
        .trim()
        .parse()
        .map_err(|_| Error::validation(format!("class number '{number}' is not an integer")))?;
    Ok(format!("{n:02}{CLASS_UNIT}"))
}

/// The class with the given grade and class number, if any.
pub fn class_by_grade_and_number<'a>(
    directory: &'a DirectorySnapshot,
    grade: &str,
    number: &str,
) -> Result<Option<&'a ClassRecord>> {
    let name = format_class_number(number)?;
    Ok(directory
        .classes()
        .iter()
        .find(|c| c.grade_name == grade && c.name == name))
}

/// Like [`class_by_grade_and_number`], failing with a lookup error on miss.
pub fn require_class<'a>(
    directory: &'a DirectorySnapshot,
    grade: &str,
    number: &str,
) -> Result<&'a ClassRecord> {
    class_by_grade_and_number(directory, grade, number)?
        .ok_or_else(|| Error::lookup(LookupKind::Class, format!("{grade}{number}")))
}

/// Course by subject name, or a placeholder with empty identifiers.
///
/// The returned record always carries the requested subject name.
pub fn course_or_placeholder(directory: &DirectorySnapshot, subject: &str) -> CourseRecord {
    match directory.course(subject) {
        Some(c) => CourseRecord {
            name: subject.to_string(),
            ..c.clone()
        },
        None => CourseRecord::placeholder(subject),
    }
}

/// Course by subject name, failing with a lookup error on miss.
pub fn require_course(directory: &DirectorySnapshot, subject: &str) -> Result<CourseRecord> {
    directory
        .course(subject)
        .cloned()
        .ok_or_else(|| Error::lookup(LookupKind::Course, subject))
}

/// First assignment of the teacher with the given name.
///
/// Used for identity fields only; the returned record's class and course
/// are incidental.
pub fn teacher_by_name<'a>(
    directory: &'a DirectorySnapshot,
    name: &str,
) -> Option<&'a TeacherAssignmentRecord> {
    let name = name.trim();
    directory
        .assignments()
        .iter()
        .find(|a| a.teacher_name.trim() == name)
}

/// Like [`teacher_by_name`], failing with a lookup error on miss.
pub fn require_teacher<'a>(
    directory: &'a DirectorySnapshot,
    name: &str,
) -> Result<&'a TeacherAssignmentRecord> {
    teacher_by_name(directory, name).ok_or_else(|| Error::lookup(LookupKind::Teacher, name.trim()))
}

/// Every assignment taught by the named teacher, in directory order.
pub fn assignments_of_teacher<'a>(
    directory: &'a DirectorySnapshot,
    name: &str,
) -> Vec<&'a TeacherAssignmentRecord> {
    let name = name.trim();
    directory
        .assignments()
        .iter()
        .filter(|a| a.teacher_name.trim() == name)
        .collect()
}

/// Strips a trailing [`TEACHER_SUFFIX`] from a role token.
pub fn strip_teacher_suffix(token: &str) -> &str {
    let token = token.trim();
    token.strip_suffix(TEACHER_SUFFIX).unwrap_or(token)
}

/// Short code of a grade name: `"初一"` → `"J1"`.
///
/// Names outside the junior-high range pass through unchanged.
pub fn grade_short_code(grade: &str) -> &str {
    match grade {
        "初一" => "J1",
        "初二" => "J2",
        "初三" => "J3",
        other => other,
    }
}

/// Assignments whose class name contains `grade` and whose course name
/// contains the subject (after stripping the teacher suffix).
pub fn teachers_of_grade_and_subject<'a>(
    directory: &'a DirectorySnapshot,
    grade: &str,
    subject: &str,
) -> Vec<&'a TeacherAssignmentRecord> {
    let subject = strip_teacher_suffix(subject);
    directory
        .assignments()
        .iter()
        .filter(|a| a.class_name.contains(grade) && a.course_name.contains(subject))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Ident;
    use crate::testing;

    #[test]
    fn test_classes_of_grade() {
        let dir = testing::directory();
        let names: Vec<String> = classes_of_grade(&dir, "初二")
            .iter()
            .map(|c| c.full_name())
            .collect();
        assert_eq!(names, vec!["初二01班", "初二02班"]);
        assert!(classes_of_grade(&dir, "初三").is_empty());
    }

    #[test]
    fn test_format_class_number() {
        assert_eq!(format_class_number("6").unwrap(), "06班");
        assert_eq!(format_class_number("12").unwrap(), "12班");
        assert!(matches!(format_class_number("六"), Err(Error::Validation(_))));
    }

    #[test]
    fn test_class_by_grade_and_number() {
        let dir = testing::directory();
        let c = class_by_grade_and_number(&dir, "初一", "7").unwrap().unwrap();
        assert_eq!(c.uid, Ident::Int(107));
        // Same class number exists in grade two, but not 07.
        assert!(class_by_grade_and_number(&dir, "初二", "7").unwrap().is_none());
        assert!(matches!(
            require_class(&dir, "初二", "7"),
            Err(Error::Lookup { kind: LookupKind::Class, .. })
        ));
    }

    #[test]
    fn test_course_or_placeholder() {
        let dir = testing::directory();
        let known = course_or_placeholder(&dir, "语文");
        assert_eq!(known.uid, Ident::Int(11));
        let unknown = course_or_placeholder(&dir, "体活");
        assert_eq!(unknown, CourseRecord::placeholder("体活"));
    }

    #[test]
    fn test_require_course() {
        let dir = testing::directory();
        assert_eq!(require_course(&dir, "美术").unwrap().uid, Ident::Int(21));
        let err = require_course(&dir, "书法").unwrap_err();
        assert_eq!(err.to_string(), "course '书法' not found");
    }

    #[test]
    fn test_teacher_by_name_trims() {
        let dir = testing::directory();
        // The directory spells this teacher with a trailing space.
        let t = teacher_by_name(&dir, " 张慧").unwrap();
        assert_eq!(t.teacher_uid, Ident::from("t3"));
        assert!(teacher_by_name(&dir, "张").is_none());
        assert_eq!(assignments_of_teacher(&dir, "张慧").len(), 2);
    }

    #[test]
    fn test_strip_teacher_suffix() {
        assert_eq!(strip_teacher_suffix("数学老师"), "数学");
        assert_eq!(strip_teacher_suffix("数学"), "数学");
        assert_eq!(strip_teacher_suffix("老师好老师"), "老师好");
    }

    #[test]
    fn test_grade_short_code() {
        assert_eq!(grade_short_code("初一"), "J1");
        assert_eq!(grade_short_code("初三"), "J3");
        assert_eq!(grade_short_code("高一"), "高一");
        assert_eq!(grade_short_code(""), "");
    }

    #[test]
    fn test_teachers_of_grade_and_subject_is_substring() {
        let dir = testing::directory();
        let found = teachers_of_grade_and_subject(&dir, "初一", "语文老师");
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|a| a.teacher_name == "钟敏"));

        let math = teachers_of_grade_and_subject(&dir, "初二", "数学");
        assert_eq!(math.len(), 2);
        assert!(teachers_of_grade_and_subject(&dir, "初三", "数学").is_empty());
    }
}
