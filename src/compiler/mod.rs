//! Directive-to-constraint compiler.
//!
//! Dispatches a normalized [`Directive`] to the builder of its
//! [`Scenario`] and returns the resulting [`ConstraintEnvelope`].
//!
//! # Outcomes
//!
//! | Result | Meaning |
//! |--------|---------|
//! | `Ok(Some(envelope))` | compiled |
//! | `Ok(None)` | structural precondition unmet; logged, nothing to emit |
//! | `Err(Lookup)` | a required entity or token could not be resolved |
//! | `Err(Validation)` | fields missing or wrong element count |
//!
//! No builder emits a partial envelope: any error discards the whole
//! directive.
//!
//! # Usage
//!
//! ```no_run
//! use u_timetable::compiler::ConstraintCompiler;
//! use u_timetable::config::ProjectSettings;
//! use u_timetable::models::{DirectorySnapshot, RawDirective, Scenario};
//!
//! # fn run(directory: DirectorySnapshot, raw: RawDirective) -> u_timetable::Result<()> {
//! let compiler = ConstraintCompiler::new(&directory, ProjectSettings::default());
//! if let Some(envelope) = compiler.compile_raw(Scenario::LessonTime, raw)? {
//!     println!("{}", serde_json::to_string(&envelope)?);
//! }
//! # Ok(())
//! # }
//! ```

mod course;
mod teacher;

use tracing::{debug, warn};

use crate::config::ProjectSettings;
use crate::error::Result;
use crate::models::{
    ConstraintEnvelope, Directive, DirectorySnapshot, EnvelopeHeader, RawDirective, Scenario,
    ScenarioGroup,
};
use crate::temporal;
use crate::validation;

/// Elements produced by a truncating zip, with the count of dropped ones.
#[derive(Debug, Clone, PartialEq)]
pub struct Zipped<T> {
    /// Aligned elements, up to the shortest input.
    pub items: Vec<T>,
    /// Positions of longer inputs that found no partner.
    pub skipped: usize,
}

/// Pairs two parallel lists, stopping at the shorter one.
pub fn zip_truncating<'a, A, B>(a: &'a [A], b: &'a [B]) -> Zipped<(&'a A, &'a B)> {
    let longest = a.len().max(b.len());
    let items: Vec<_> = a.iter().zip(b).collect();
    Zipped {
        skipped: longest - items.len(),
        items,
    }
}

/// Aligns three parallel lists, stopping at the shortest one.
pub fn zip3_truncating<'a, A, B, C>(
    a: &'a [A],
    b: &'a [B],
    c: &'a [C],
) -> Zipped<(&'a A, &'a B, &'a C)> {
    let longest = a.len().max(b.len()).max(c.len());
    let items: Vec<_> = a
        .iter()
        .zip(b)
        .zip(c)
        .map(|((x, y), z)| (x, y, z))
        .collect();
    Zipped {
        skipped: longest - items.len(),
        items,
    }
}

impl<T> Zipped<T> {
    /// Logs dropped combinations, if any, and yields the aligned items.
    pub(crate) fn logged(self, scenario: Scenario) -> Vec<T> {
        if self.skipped > 0 {
            warn!(
                scenario = scenario.envelope_type(),
                skipped = self.skipped,
                "skipping combinations with missing elements"
            );
        }
        self.items
    }
}

/// Compiles directives against a fixed directory and deployment.
#[derive(Debug, Clone)]
pub struct ConstraintCompiler<'a> {
    directory: &'a DirectorySnapshot,
    project: ProjectSettings,
}

impl<'a> ConstraintCompiler<'a> {
    /// Creates a compiler over a directory.
    pub fn new(directory: &'a DirectorySnapshot, project: ProjectSettings) -> Self {
        Self { directory, project }
    }

    /// The directory this compiler resolves against.
    pub fn directory(&self) -> &'a DirectorySnapshot {
        self.directory
    }

    /// Routing header for a scenario's envelopes.
    pub fn header(&self, scenario: Scenario) -> EnvelopeHeader {
        let project_scenario_id = match scenario.group() {
            ScenarioGroup::Course => self.project.course_scenario_id,
            ScenarioGroup::Teacher => self.project.teacher_scenario_id,
        };
        EnvelopeHeader {
            project_id: self.project.project_id,
            project_scenario_id,
        }
    }

    /// Normalizes, validates and compiles a raw directive.
    pub fn compile_raw(
        &self,
        scenario: Scenario,
        mut raw: RawDirective,
    ) -> Result<Option<ConstraintEnvelope>> {
        temporal::normalize_directive(&mut raw)?;
        let directive = Directive::from_normalized(&raw)?;
        self.compile(scenario, &directive)
    }

    /// Validates and compiles a normalized directive.
    pub fn compile(
        &self,
        scenario: Scenario,
        directive: &Directive,
    ) -> Result<Option<ConstraintEnvelope>> {
        validation::ensure_valid(scenario, directive)?;

        let dir = self.directory;
        let header = self.header(scenario);
        let envelope = match scenario {
            Scenario::LessonTime => course::lesson_time(dir, header, directive)?,
            Scenario::CourseDayLimit => course::course_day_limit(dir, header, directive)?,
            Scenario::CoursePeriodLimit => course::course_period_limit(dir, header, directive)?,
            Scenario::ConsecutiveCourse => course::consecutive_course(dir, header, directive)?,
            Scenario::CourseNotSameDay => course::course_not_same_day(dir, header, directive)?,
            Scenario::MaxSamePeriod => course::max_same_period(dir, header, directive)?,
            Scenario::MergedClass => course::merged_class(dir, header, directive)?,
            Scenario::CrossClassLink => course::cross_class_link(dir, header, directive)?,
            Scenario::OddEvenWeek => course::odd_even_week(dir, header, directive)?,
            Scenario::TeacherLessonTime => teacher::lesson_time(dir, header, directive)?,
            Scenario::TeacherDayLimit => teacher::day_limit(dir, header, directive)?,
            Scenario::TeacherPeriodLimit => teacher::period_limit(dir, header, directive)?,
            Scenario::TeacherMutex => teacher::mutex(dir, header, directive)?,
            Scenario::TeacherCluster => teacher::cluster(dir, header, directive)?,
        };

        match &envelope {
            Some(env) => debug!(
                scenario = scenario.envelope_type(),
                entries = env.entries().len(),
                "compiled directive"
            ),
            None => warn!(
                scenario = scenario.envelope_type(),
                "directive produced no constraint"
            ),
        }
        Ok(envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::testing;
    use serde_json::json;

    #[test]
    fn test_zip_truncating_counts_skips() {
        let z = zip_truncating(&[1, 2, 3], &["a"]);
        assert_eq!(z.items, vec![(&1, &"a")]);
        assert_eq!(z.skipped, 2);

        let even = zip_truncating(&[1, 2], &[3, 4]);
        assert_eq!(even.skipped, 0);
    }

    #[test]
    fn test_zip3_truncating() {
        let z = zip3_truncating(&["体活", "不排"], &[1, 2], &[9]);
        assert_eq!(z.items, vec![(&"体活", &1, &9)]);
        assert_eq!(z.skipped, 1);

        let empty: [u8; 0] = [];
        let z = zip3_truncating(&empty, &[1], &[2, 3]);
        assert!(z.items.is_empty());
        assert_eq!(z.skipped, 2);
    }

    #[test]
    fn test_header_routing() {
        let dir = testing::directory();
        let compiler = ConstraintCompiler::new(&dir, ProjectSettings::default());
        assert_eq!(compiler.header(Scenario::LessonTime).project_scenario_id, 984);
        assert_eq!(compiler.header(Scenario::OddEvenWeek).project_scenario_id, 985);
        assert_eq!(compiler.header(Scenario::TeacherMutex).project_id, 458);
    }

    #[test]
    fn test_compile_raw_normalizes_first() {
        let dir = testing::directory();
        let compiler = ConstraintCompiler::new(&dir, ProjectSettings::default());
        let raw = testing::raw(json!({
            "details": [{
                "grade": ["初一"],
                "day": ["周三"],
                "time_period": ["下午"],
                "subject": ["语文"]
            }]
        }));
        let env = compiler
            .compile_raw(Scenario::ConsecutiveCourse, raw)
            .unwrap()
            .unwrap();
        assert_eq!(env.envelope_type, "CONSECUTIVECOURSE");
        assert_eq!(env.entries().len(), 1);
    }

    #[test]
    fn test_compile_rejects_invalid_directive() {
        let dir = testing::directory();
        let compiler = ConstraintCompiler::new(&dir, ProjectSettings::default());
        let err = compiler
            .compile(Scenario::LessonTime, &Directive::default())
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_teacher_period_limit_rejects_day_part() {
        let dir = testing::directory();
        let compiler = ConstraintCompiler::new(&dir, ProjectSettings::default());
        let raw = testing::raw(json!({
            "details": [{"teacher": ["张老师"], "day": ["周五"], "period": ["下午"], "max_classes": 0}]
        }));
        let err = compiler
            .compile_raw(Scenario::TeacherPeriodLimit, raw)
            .unwrap_err();
        assert!(matches!(err, Error::Validation(m) if m.contains("exactly one period")));

        let repeated = testing::raw(json!({
            "details": [{"period": ["5", "5", "5", "5", "5"], "max_classes": 3}]
        }));
        let env = compiler
            .compile_raw(Scenario::TeacherPeriodLimit, repeated)
            .unwrap()
            .unwrap();
        let v = serde_json::to_value(&env).unwrap();
        assert_eq!(v["constraintJson"]["periodDays"], json!([{"period": 5, "dayOfWeek": -1}]));
    }

    #[test]
    fn test_huge_period_never_becomes_wildcard() {
        let dir = testing::directory();
        let compiler = ConstraintCompiler::new(&dir, ProjectSettings::default());
        let raw = testing::raw(json!({
            "details": [{"period": [4_294_967_295_i64], "max_classes": 3}]
        }));
        let err = compiler
            .compile_raw(Scenario::TeacherPeriodLimit, raw)
            .unwrap_err();
        assert!(matches!(err, Error::Lookup { .. }));
    }

    #[test]
    fn test_every_scenario_dispatches() {
        let dir = testing::directory();
        let compiler = ConstraintCompiler::new(&dir, ProjectSettings::default());
        let raw = testing::raw(json!({
            "details": [{
                "grade": ["初二"],
                "subject": ["美术", "音乐"],
                "teacher": ["李强", "张慧"],
                "class": ["1", "2"],
                "day": [1],
                "period": [1],
                "min_classes": 1,
                "max_classes": 1
            }]
        }));
        for scenario in Scenario::ALL {
            match compiler.compile_raw(scenario, raw.clone()) {
                Ok(Some(env)) => assert_eq!(env.envelope_type, scenario.envelope_type()),
                Ok(None) => {}
                Err(e) => assert!(e.is_directive_scoped(), "{scenario}: {e}"),
            }
        }
    }
}
