//! Payslip arithmetic.
//!
//! This module turns one employee's attendance, overtime and reimbursement
//! records into the amounts printed on a payslip. It performs no I/O, so the
//! processor and the tests share the exact same arithmetic.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{
    AttendanceRecord, AuditStamp, OvertimeRequest, PayPeriod, Payslip, PayslipStatus,
    ReimbursementRequest,
};

/// The rates a payroll run applies to every employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayRates {
    /// Basic salary paid for the period.
    pub basic_salary: Decimal,
    /// Amount paid per approved overtime hour.
    pub overtime_rate: Decimal,
}

/// The computed amounts of a payslip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayComponents {
    /// Basic salary, copied from the rates.
    pub basic_salary: Decimal,
    /// Number of attendance records in the period.
    pub attendance_days: u32,
    /// Sum of approved overtime hours in the period.
    pub overtime_hours: Decimal,
    /// `overtime_hours * overtime_rate`.
    pub overtime_amount: Decimal,
    /// Sum of approved reimbursements in the period.
    pub reimbursement_amount: Decimal,
    /// `basic_salary + overtime_amount + reimbursement_amount`.
    pub total_amount: Decimal,
}

impl PayComponents {
    /// Builds the `processed` payslip for these amounts.
    pub fn into_payslip(
        self,
        employee_id: u64,
        period: &PayPeriod,
        processed_at: DateTime<Utc>,
    ) -> Payslip {
        Payslip {
            id: 0,
            employee_id,
            period_start: period.start_date,
            period_end: period.end_date,
            basic_salary: self.basic_salary,
            overtime_hours: self.overtime_hours,
            overtime_amount: self.overtime_amount,
            reimbursement_amount: self.reimbursement_amount,
            total_amount: self.total_amount,
            attendance_days: self.attendance_days,
            processed_at,
            status: PayslipStatus::Processed,
            stamp: AuditStamp::default(),
        }
    }
}

/// Aggregates one employee's records over `period`.
///
/// Records dated outside the period are ignored, as are overtime and
/// reimbursement requests that are not approved. Zero rates are valid and
/// simply produce zero amounts; negative rates are not re-validated here.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use payroll_engine::models::{OvertimeRequest, OvertimeStatus, PayPeriod};
/// use payroll_engine::payroll::{PayRates, aggregate};
/// use rust_decimal::Decimal;
///
/// let period = PayPeriod::new(
///     NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
/// )
/// .unwrap();
/// let mut overtime = OvertimeRequest::pending(
///     1,
///     NaiveDate::from_ymd_opt(2026, 1, 9).unwrap(),
///     Decimal::new(3, 0),
///     "month-end close",
/// );
/// overtime.status = OvertimeStatus::Approved;
///
/// let rates = PayRates {
///     basic_salary: Decimal::new(4000, 0),
///     overtime_rate: Decimal::new(25, 0),
/// };
/// let components = aggregate(&period, &rates, &[], &[overtime], &[]);
///
/// assert_eq!(components.overtime_amount, Decimal::new(75, 0));
/// assert_eq!(components.total_amount, Decimal::new(4075, 0));
/// ```
pub fn aggregate(
    period: &PayPeriod,
    rates: &PayRates,
    attendance: &[AttendanceRecord],
    overtime: &[OvertimeRequest],
    reimbursements: &[ReimbursementRequest],
) -> PayComponents {
    let attendance_days = attendance
        .iter()
        .filter(|record| period.contains_date(record.date))
        .count();

    let overtime_hours: Decimal = overtime
        .iter()
        .filter(|request| request.is_payable() && period.contains_date(request.date))
        .map(|request| request.hours)
        .sum();
    let overtime_amount = overtime_hours * rates.overtime_rate;

    let reimbursement_amount: Decimal = reimbursements
        .iter()
        .filter(|request| request.is_payable() && period.contains_date(request.date))
        .map(|request| request.amount)
        .sum();

    PayComponents {
        basic_salary: rates.basic_salary,
        attendance_days: u32::try_from(attendance_days).unwrap_or(u32::MAX),
        overtime_hours,
        overtime_amount,
        reimbursement_amount,
        total_amount: rates.basic_salary + overtime_amount + reimbursement_amount,
    }
}
