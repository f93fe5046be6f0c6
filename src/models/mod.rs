//! Timetable domain models.
//!
//! Provides the data types that flow through the compiler: raw feeds in,
//! an immutable directory, directives, and the constraint envelopes that
//! come out.
//!
//! # Data Flow
//!
//! | Stage | Type |
//! |-------|------|
//! | Directory input | `CourseClassFeed`, `TeacherClassFeed` |
//! | Directory index | `DirectorySnapshot` |
//! | NLU output | `RawDirective` |
//! | Compiler input | `Directive` + `Scenario` |
//! | Compiler output | `ConstraintEnvelope` |

mod calendar;
mod constraint;
mod directive;
mod directory;
pub mod feed;
mod ident;
mod scenario;

pub use calendar::{PeriodDay, ANY_PERIOD, EVERY_DAY};
pub use constraint::{
    ClassEntry, ClassRef, ClusterCourse, ConsecutiveConstraint, ConstraintEnvelope,
    ConstraintJson, ConstraintType, CourseRef, CourseSlotConstraint, CourseToCourseConstraint,
    EnvelopeHeader, EvenOddLinkConstraint, MaxSameTimeConstraint, MergeClassConstraint,
    MoveCourseConstraint, MoveCourseDetail, Payload, TeacherClusterConstraint, TeacherCourse,
    TeacherLimitConstraint, TeacherMutexConstraint, TeacherRef, TeacherSlotConstraint,
    TeacherTimeCluster, WeekParity,
};
pub use directive::{Directive, DirectiveDetail, RawDetail, RawDirective, Token};
pub use directory::{
    ClassRecord, CourseRecord, DirectorySnapshot, HeaderTeacherRecord, TeacherAssignmentRecord,
};
pub use feed::{CourseClassFeed, TeacherClassFeed};
pub use ident::Ident;
pub use scenario::{Scenario, ScenarioGroup};
