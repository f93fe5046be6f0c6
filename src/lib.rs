//! School timetable directive compiler.
//!
//! Turns classified free-text scheduling requests into the constraint
//! records a timetable solver imports. Classification and field
//! extraction are done by an external language front end; this crate
//! normalizes what it returns, resolves names against a school directory,
//! and builds one strongly-shaped constraint envelope per request.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `DirectorySnapshot`, `RawDirective`,
//!   `Directive`, `Scenario`, `ConstraintEnvelope`, `PeriodDay`
//! - **`temporal`**: Day and day-part vocabulary normalization
//! - **`resolver`**: Name resolution against the directory
//! - **`validation`**: Per-scenario field and arity checks
//! - **`compiler`**: Scenario dispatch and the fourteen constraint builders
//! - **`nlu`**: Boundary to the classification/extraction front end
//! - **`accumulator`**: Persisted output collection
//! - **`pipeline`**: One input text through classify → compile → append
//! - **`config`**: TOML deployment configuration
//!
//! # Architecture
//!
//! The directory is built once and passed by reference into every builder;
//! nothing mutates it afterwards. Scenario dispatch is an exhaustive match
//! over a closed enum. Compilation is synchronous and single-writer.

pub mod accumulator;
pub mod compiler;
pub mod config;
pub mod error;
pub mod models;
pub mod nlu;
pub mod pipeline;
pub mod resolver;
pub mod temporal;
pub mod validation;

#[cfg(test)]
mod testing;

pub use error::{Error, Result};
