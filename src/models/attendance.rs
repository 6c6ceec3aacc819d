//! Attendance records.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::AuditStamp;
use crate::audit::Auditable;
use crate::store::Entity;

/// Attendance classification for a calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    /// The employee checked in.
    Present,
    /// The employee did not show up.
    Absent,
    /// The employee was on approved leave.
    Leave,
    /// The day was a holiday.
    Holiday,
}

/// One employee's attendance on one date.
///
/// `hours_worked` is derived from the check-in and check-out timestamps and is
/// never taken from input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// Unique identifier.
    #[serde(default)]
    pub id: u64,
    /// The employee this record belongs to.
    pub employee_id: u64,
    /// The calendar date.
    pub date: NaiveDate,
    /// When the employee checked in.
    pub check_in: DateTime<Utc>,
    /// When the employee checked out, if they have.
    #[serde(default)]
    pub check_out: Option<DateTime<Utc>>,
    /// Hours between check-in and check-out, zero while still checked in.
    #[serde(default)]
    pub hours_worked: Decimal,
    /// Attendance classification.
    pub status: AttendanceStatus,
    /// Audit attribution.
    #[serde(flatten)]
    pub stamp: AuditStamp,
}

impl AttendanceRecord {
    /// Creates a `present` record for a check-in at `at`.
    pub fn checked_in(employee_id: u64, at: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            employee_id,
            date: at.date_naive(),
            check_in: at,
            check_out: None,
            hours_worked: Decimal::ZERO,
            status: AttendanceStatus::Present,
            stamp: AuditStamp::default(),
        }
    }

    /// Records the check-out and re-derives `hours_worked`.
    pub fn check_out_at(&mut self, at: DateTime<Utc>) {
        self.check_out = Some(at);
        self.hours_worked = derive_hours(self.check_in, at);
    }
}

/// Hours between two timestamps, rounded to two decimal places.
///
/// A check-out before the check-in yields zero rather than negative hours.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use payroll_engine::models::derive_hours;
/// use rust_decimal::Decimal;
///
/// let check_in = Utc.with_ymd_and_hms(2026, 1, 5, 8, 0, 0).unwrap();
/// let check_out = Utc.with_ymd_and_hms(2026, 1, 5, 16, 30, 0).unwrap();
/// assert_eq!(derive_hours(check_in, check_out), Decimal::new(850, 2));
/// ```
pub fn derive_hours(check_in: DateTime<Utc>, check_out: DateTime<Utc>) -> Decimal {
    let seconds = (check_out - check_in).num_seconds();
    if seconds <= 0 {
        return Decimal::ZERO;
    }
    (Decimal::from(seconds) / Decimal::from(3600)).round_dp(2)
}

impl Auditable for AttendanceRecord {
    fn audit_stamp(&self) -> Option<&AuditStamp> {
        Some(&self.stamp)
    }

    fn audit_stamp_mut(&mut self) -> Option<&mut AuditStamp> {
        Some(&mut self.stamp)
    }
}

impl Entity for AttendanceRecord {
    const KIND: &'static str = "attendance";

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }
}
