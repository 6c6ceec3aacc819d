//! Payslip model.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AuditStamp, PayPeriod};
use crate::audit::Auditable;
use crate::store::Entity;

/// Payment state of a payslip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayslipStatus {
    /// Computed and stored, not yet paid out.
    Processed,
    /// Paid out.
    Paid,
}

/// The computed pay of one employee for one period.
///
/// A payslip is a snapshot: once created only its status changes.
/// `total_amount` always equals `basic_salary + overtime_amount + reimbursement_amount`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payslip {
    /// Unique identifier.
    #[serde(default)]
    pub id: u64,
    /// The employee paid by this payslip.
    pub employee_id: u64,
    /// First day of the period (inclusive).
    pub period_start: NaiveDate,
    /// Last day of the period (inclusive).
    pub period_end: NaiveDate,
    /// Basic salary for the period.
    pub basic_salary: Decimal,
    /// Sum of approved overtime hours in the period.
    pub overtime_hours: Decimal,
    /// `overtime_hours * overtime_rate`.
    pub overtime_amount: Decimal,
    /// Sum of approved reimbursements in the period.
    pub reimbursement_amount: Decimal,
    /// Grand total.
    pub total_amount: Decimal,
    /// Number of attendance records in the period.
    pub attendance_days: u32,
    /// When the payslip was computed.
    pub processed_at: DateTime<Utc>,
    /// Payment state.
    pub status: PayslipStatus,
    /// Audit attribution.
    #[serde(flatten)]
    pub stamp: AuditStamp,
}

impl Payslip {
    /// The pay period this payslip covers.
    pub fn period(&self) -> PayPeriod {
        PayPeriod {
            start_date: self.period_start,
            end_date: self.period_end,
        }
    }

    /// Returns true if this payslip covers exactly `employee_id` and `period`.
    pub fn covers(&self, employee_id: u64, period: &PayPeriod) -> bool {
        self.employee_id == employee_id
            && self.period_start == period.start_date
            && self.period_end == period.end_date
    }
}

impl Auditable for Payslip {
    fn audit_stamp(&self) -> Option<&AuditStamp> {
        Some(&self.stamp)
    }

    fn audit_stamp_mut(&mut self) -> Option<&mut AuditStamp> {
        Some(&mut self.stamp)
    }
}

impl Entity for Payslip {
    const KIND: &'static str = "payslip";

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn create_test_payslip() -> Payslip {
        Payslip {
            id: 1,
            employee_id: 7,
            period_start: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            period_end: NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
            basic_salary: Decimal::new(500000, 2),
            overtime_hours: Decimal::new(5, 0),
            overtime_amount: Decimal::new(25000, 2),
            reimbursement_amount: Decimal::new(35125, 2),
            total_amount: Decimal::new(560125, 2),
            attendance_days: 20,
            processed_at: Utc.with_ymd_and_hms(2026, 2, 1, 9, 0, 0).unwrap(),
            status: PayslipStatus::Processed,
            stamp: AuditStamp::default(),
        }
    }

    #[test]
    fn test_period_reconstructs_bounds() {
        let payslip = create_test_payslip();
        let period = payslip.period();
        assert_eq!(period.start_date, payslip.period_start);
        assert_eq!(period.end_date, payslip.period_end);
    }

    #[test]
    fn test_covers_matches_employee_and_exact_period() {
        let payslip = create_test_payslip();
        let period = payslip.period();
        assert!(payslip.covers(7, &period));
        assert!(!payslip.covers(8, &period));

        let shorter = PayPeriod::new(
            period.start_date,
            NaiveDate::from_ymd_opt(2026, 1, 30).unwrap(),
        )
        .unwrap();
        assert!(!payslip.covers(7, &shorter));
    }

    #[test]
    fn test_serialize_payslip_amounts_as_strings() {
        let value = serde_json::to_value(create_test_payslip()).unwrap();
        assert_eq!(value["total_amount"], "5601.25");
        assert_eq!(value["status"], "processed");
        assert_eq!(value["attendance_days"], 20);
    }
}
