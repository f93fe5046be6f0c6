//! Timetable slots.
//!
//! A school week is addressed by `(period, dayOfWeek)` pairs. Days are
//! numbered 1 (Monday) through 7 (Sunday); periods are numbered from 1 in
//! the order they occur during the day.
//!
//! # Sentinels
//! The solver reads `-1` in either position as a wildcard:
//! [`ANY_PERIOD`] means "any period of that day" and [`EVERY_DAY`] means
//! "that period on every day".

use serde::{Deserialize, Serialize};

/// Wildcard period: any period of the day.
pub const ANY_PERIOD: i32 = -1;

/// Wildcard day: every day of the week.
pub const EVERY_DAY: i32 = -1;

/// One timetable slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodDay {
    pub period: i32,
    pub day_of_week: i32,
}

impl PeriodDay {
    /// Creates a slot.
    pub fn new(period: i32, day_of_week: i32) -> Self {
        Self {
            period,
            day_of_week,
        }
    }

    /// Any period on the given day.
    pub fn whole_day(day_of_week: i32) -> Self {
        Self::new(ANY_PERIOD, day_of_week)
    }

    /// The given period on every day.
    pub fn every_day(period: i32) -> Self {
        Self::new(period, EVERY_DAY)
    }

    /// Slots for several periods of one day, in the given period order.
    pub fn on_day(day_of_week: i32, periods: &[u32]) -> Vec<Self> {
        periods
            .iter()
            .map(|&p| Self::new(p as i32, day_of_week))
            .collect()
    }
}
