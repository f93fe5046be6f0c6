//! The fourteen scheduling scenarios.
//!
//! Each scenario has a classification label (as produced by the NLU
//! collaborator) and an envelope type code (as consumed by the solver).
//!
//! | Scenario | Label | Envelope type |
//! |----------|-------|---------------|
//! | `LessonTime` | 课程课时条件 | COURSETIME |
//! | `CourseDayLimit` | 课程各天条件 | COURSEDAYLIMIT |
//! | `CoursePeriodLimit` | 课程时段条件 | COURSEPERIODLIMIT |
//! | `ConsecutiveCourse` | 课程连堂条件 | CONSECUTIVECOURSE |
//! | `CourseNotSameDay` | 课程不排同一天条件 | COURSE2COURSE |
//! | `MaxSamePeriod` | 课程同一节课最多条件 | MAXSAMETIME |
//! | `MergedClass` | 课程合班条件 | COURSESAMETIMELIMIT |
//! | `CrossClassLink` | 课程走班关联条件 | MOVECOURSE |
//! | `OddEvenWeek` | 课程单双周条件 | EVENODDLINK |
//! | `TeacherLessonTime` | 教师课时条件 | TEACHERTIME |
//! | `TeacherDayLimit` | 教师各天条件 | TEACHERDAYLIMIT |
//! | `TeacherPeriodLimit` | 教师时段条件 | TEACHERPERIODLIMIT |
//! | `TeacherMutex` | 教师不排同时上课条件 | TEACHERTIMEMUTEX |
//! | `TeacherCluster` | 教师多班连上条件 | TEACHERTIMECLUSTER |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A scheduling-constraint category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scenario {
    /// A course at a given (day, period), or a slot kept free.
    LessonTime,
    /// A course at least once per day over a range of days.
    CourseDayLimit,
    /// A course at a fixed period across days.
    CoursePeriodLimit,
    /// A double period within one day.
    ConsecutiveCourse,
    /// Two courses never on the same day.
    CourseNotSameDay,
    /// Cap on classes taking a course in the same period.
    MaxSamePeriod,
    /// One teacher teaching several classes together.
    MergedClass,
    /// Elective pairing across classes.
    CrossClassLink,
    /// Two courses alternating by odd/even week.
    OddEvenWeek,
    /// Teachers fixed to one slot.
    TeacherLessonTime,
    /// Teachers' load on one day.
    TeacherDayLimit,
    /// Load of every teacher in one period.
    TeacherPeriodLimit,
    /// Two teachers never in the same period.
    TeacherMutex,
    /// Same teacher, consecutive periods in different classes.
    TeacherCluster,
}

/// Which scenario id an envelope is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioGroup {
    Course,
    Teacher,
}

impl Scenario {
    /// All scenarios in label order.
    pub const ALL: [Scenario; 14] = [
        Scenario::LessonTime,
        Scenario::CourseDayLimit,
        Scenario::CoursePeriodLimit,
        Scenario::ConsecutiveCourse,
        Scenario::CourseNotSameDay,
        Scenario::MaxSamePeriod,
        Scenario::MergedClass,
        Scenario::CrossClassLink,
        Scenario::OddEvenWeek,
        Scenario::TeacherLessonTime,
        Scenario::TeacherDayLimit,
        Scenario::TeacherPeriodLimit,
        Scenario::TeacherMutex,
        Scenario::TeacherCluster,
    ];

    /// Classification label emitted by the NLU collaborator.
    pub fn label(&self) -> &'static str {
        match self {
            Scenario::LessonTime => "课程课时条件",
            Scenario::CourseDayLimit => "课程各天条件",
            Scenario::CoursePeriodLimit => "课程时段条件",
            Scenario::ConsecutiveCourse => "课程连堂条件",
            Scenario::CourseNotSameDay => "课程不排同一天条件",
            Scenario::MaxSamePeriod => "课程同一节课最多条件",
            Scenario::MergedClass => "课程合班条件",
            Scenario::CrossClassLink => "课程走班关联条件",
            Scenario::OddEvenWeek => "课程单双周条件",
            Scenario::TeacherLessonTime => "教师课时条件",
            Scenario::TeacherDayLimit => "教师各天条件",
            Scenario::TeacherPeriodLimit => "教师时段条件",
            Scenario::TeacherMutex => "教师不排同时上课条件",
            Scenario::TeacherCluster => "教师多班连上条件",
        }
    }

    /// Envelope `type` discriminator read by the solver.
    pub fn envelope_type(&self) -> &'static str {
        match self {
            Scenario::LessonTime => "COURSETIME",
            Scenario::CourseDayLimit => "COURSEDAYLIMIT",
            Scenario::CoursePeriodLimit => "COURSEPERIODLIMIT",
            Scenario::ConsecutiveCourse => "CONSECUTIVECOURSE",
            Scenario::CourseNotSameDay => "COURSE2COURSE",
            Scenario::MaxSamePeriod => "MAXSAMETIME",
            Scenario::MergedClass => "COURSESAMETIMELIMIT",
            Scenario::CrossClassLink => "MOVECOURSE",
            Scenario::OddEvenWeek => "EVENODDLINK",
            Scenario::TeacherLessonTime => "TEACHERTIME",
            Scenario::TeacherDayLimit => "TEACHERDAYLIMIT",
            Scenario::TeacherPeriodLimit => "TEACHERPERIODLIMIT",
            Scenario::TeacherMutex => "TEACHERTIMEMUTEX",
            Scenario::TeacherCluster => "TEACHERTIMECLUSTER",
        }
    }

    /// Scenario id group. The odd/even-week link is routed with the
    /// teacher scenarios.
    pub fn group(&self) -> ScenarioGroup {
        match self {
            Scenario::LessonTime
            | Scenario::CourseDayLimit
            | Scenario::CoursePeriodLimit
            | Scenario::ConsecutiveCourse
            | Scenario::CourseNotSameDay
            | Scenario::MaxSamePeriod
            | Scenario::MergedClass
            | Scenario::CrossClassLink => ScenarioGroup::Course,
            Scenario::OddEvenWeek
            | Scenario::TeacherLessonTime
            | Scenario::TeacherDayLimit
            | Scenario::TeacherPeriodLimit
            | Scenario::TeacherMutex
            | Scenario::TeacherCluster => ScenarioGroup::Teacher,
        }
    }

    /// Resolves a classification label. Unknown labels yield `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|s| s.label() == label)
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Scenario {
    type Err = String;

    /// Accepts a classification label or an envelope type code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::from_label(s)
            .or_else(|| Self::ALL.into_iter().find(|sc| sc.envelope_type() == s))
            .ok_or_else(|| format!("unrecognized scenario '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_labels_and_types_are_distinct() {
        let labels: HashSet<_> = Scenario::ALL.iter().map(|s| s.label()).collect();
        let types: HashSet<_> = Scenario::ALL.iter().map(|s| s.envelope_type()).collect();
        assert_eq!(labels.len(), 14);
        assert_eq!(types.len(), 14);
    }

    #[test]
    fn test_from_label() {
        assert_eq!(Scenario::from_label("课程合班条件"), Some(Scenario::MergedClass));
        assert_eq!(Scenario::from_label(" 教师多班连上条件 "), Some(Scenario::TeacherCluster));
        assert_eq!(Scenario::from_label("明天是晴天"), None);
    }

    #[test]
    fn test_from_str_accepts_type_code() {
        assert_eq!("EVENODDLINK".parse::<Scenario>(), Ok(Scenario::OddEvenWeek));
        assert_eq!("课程课时条件".parse::<Scenario>(), Ok(Scenario::LessonTime));
        assert!("NOPE".parse::<Scenario>().is_err());
    }

    #[test]
    fn test_groups() {
        assert_eq!(Scenario::CrossClassLink.group(), ScenarioGroup::Course);
        assert_eq!(Scenario::OddEvenWeek.group(), ScenarioGroup::Teacher);
        assert_eq!(Scenario::TeacherMutex.group(), ScenarioGroup::Teacher);
    }
}
