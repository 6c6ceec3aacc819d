//! Pay period model.
//!
//! This module contains the [`PayPeriod`] type that bounds every payroll range
//! query and identifies a payslip together with the employee id.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A pay period, inclusive of both its start and end dates.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PayPeriod;
/// use chrono::NaiveDate;
///
/// let period = PayPeriod::new(
///     NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
/// )
/// .unwrap();
///
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()));
/// assert_eq!(period.days(), 31);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PayPeriod {
    /// The start date of the pay period (inclusive).
    pub start_date: NaiveDate,
    /// The end date of the pay period (inclusive).
    pub end_date: NaiveDate,
}

impl PayPeriod {
    /// Creates a pay period, rejecting an end date before the start date.
    ///
    /// A single-day period (`start == end`) is valid.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> EngineResult<Self> {
        if end_date < start_date {
            return Err(EngineError::InvalidPeriod {
                start: start_date,
                end: end_date,
            });
        }
        Ok(Self {
            start_date,
            end_date,
        })
    }

    /// Checks if a given date falls within this pay period.
    ///
    /// The check is inclusive of both start and end dates.
    ///
    /// ```
    /// use payroll_engine::models::PayPeriod;
    /// use chrono::NaiveDate;
    ///
    /// let period = PayPeriod::new(
    ///     NaiveDate::from_ymd_opt(2026, 1, 13).unwrap(),
    ///     NaiveDate::from_ymd_opt(2026, 1, 26).unwrap(),
    /// )
    /// .unwrap();
    ///
    /// assert!(period.contains_date(NaiveDate::from_ymd_opt(2026, 1, 13).unwrap())); // start date
    /// assert!(period.contains_date(NaiveDate::from_ymd_opt(2026, 1, 26).unwrap())); // end date
    /// assert!(!period.contains_date(NaiveDate::from_ymd_opt(2026, 1, 12).unwrap())); // before
    /// assert!(!period.contains_date(NaiveDate::from_ymd_opt(2026, 1, 27).unwrap())); // after
    /// ```
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Number of calendar days in the period.
    pub fn days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn january() -> PayPeriod {
        PayPeriod::new(date(2026, 1, 1), date(2026, 1, 31)).unwrap()
    }

    #[test]
    fn test_contains_date_within_period() {
        assert!(january().contains_date(date(2026, 1, 15)));
    }

    #[test]
    fn test_contains_date_on_boundaries() {
        let period = january();
        assert!(period.contains_date(period.start_date));
        assert!(period.contains_date(period.end_date));
    }

    #[test]
    fn test_contains_date_outside_period() {
        assert!(!january().contains_date(date(2026, 2, 1)));
        assert!(!january().contains_date(date(2025, 12, 31)));
    }

    #[test]
    fn test_single_day_period_is_valid() {
        let period = PayPeriod::new(date(2026, 1, 1), date(2026, 1, 1)).unwrap();
        assert_eq!(period.days(), 1);
    }

    #[test]
    fn test_end_before_start_is_rejected() {
        let result = PayPeriod::new(date(2026, 1, 31), date(2026, 1, 1));
        match result {
            Err(EngineError::InvalidPeriod { start, end }) => {
                assert_eq!(start, date(2026, 1, 31));
                assert_eq!(end, date(2026, 1, 1));
            }
            other => panic!("Expected InvalidPeriod, got {:?}", other),
        }
    }

    #[test]
    fn test_serialize_pay_period() {
        let json = serde_json::to_string(&january()).unwrap();
        assert!(json.contains("\"start_date\":\"2026-01-01\""));
        assert!(json.contains("\"end_date\":\"2026-01-31\""));
    }
}
