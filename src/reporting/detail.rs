//! Line-itemized payslip view.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::UNKNOWN_EMPLOYEE;
use crate::models::{
    AttendanceRecord, AttendanceStatus, Employee, OvertimeRequest, PayslipStatus, Payslip,
    ReimbursementRequest, ReimbursementStatus, Role,
};

/// Who the payslip belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeInfo {
    /// Employee id.
    pub id: u64,
    /// Display name, `"Unknown Employee"` for deleted employees.
    pub name: String,
    /// Account role, unset when the employee is gone.
    pub role: Option<Role>,
}

/// The stored totals of the payslip, echoed unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PayslipTotals {
    /// Basic salary for the period.
    pub basic_salary: Decimal,
    /// Attendance records counted when the payslip was processed.
    pub attendance_days: u32,
    /// Approved overtime hours paid.
    pub overtime_hours: Decimal,
    /// Overtime pay.
    pub overtime_amount: Decimal,
    /// Reimbursements paid out with this payslip.
    pub reimbursement_amount: Decimal,
    /// Grand total.
    pub total_amount: Decimal,
}

/// One attendance day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendanceLine {
    /// The calendar date.
    pub date: NaiveDate,
    /// Check-in time.
    pub check_in: DateTime<Utc>,
    /// Check-out time, unset while still checked in.
    pub check_out: Option<DateTime<Utc>>,
    /// Hours between check-in and check-out.
    pub hours_worked: Decimal,
    /// Attendance classification.
    pub status: AttendanceStatus,
}

/// One overtime request priced at the payslip's effective rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OvertimeLine {
    /// Date the overtime was worked.
    pub date: NaiveDate,
    /// Requested hours.
    pub hours: Decimal,
    /// Effective rate of the payslip.
    pub rate: Decimal,
    /// `hours * rate`.
    pub amount: Decimal,
    /// Reason given by the employee.
    pub reason: String,
}

/// One reimbursed expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReimbursementLine {
    /// Date of the expense.
    pub date: NaiveDate,
    /// Expense category.
    pub category: String,
    /// Amount reimbursed.
    pub amount: Decimal,
    /// Reason given by the employee.
    pub reason: String,
    /// `approved`, or `paid` once settled.
    pub status: ReimbursementStatus,
}

/// A payslip with the records behind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailedPayslip {
    /// Id of the stored payslip.
    pub payslip_id: u64,
    /// Owner of the payslip.
    pub employee: EmployeeInfo,
    /// First day of the period.
    pub period_start: NaiveDate,
    /// Last day of the period.
    pub period_end: NaiveDate,
    /// Payment state.
    pub status: PayslipStatus,
    /// When the payslip was computed.
    pub processed_at: DateTime<Utc>,
    /// Stored totals.
    pub summary: PayslipTotals,
    /// Attendance days in the period.
    pub attendance: Vec<AttendanceLine>,
    /// Approved overtime in the period.
    pub overtime: Vec<OvertimeLine>,
    /// Approved and paid reimbursements in the period.
    pub reimbursements: Vec<ReimbursementLine>,
}

/// The per-hour overtime rate implied by a stored payslip, `0` when it has
/// no overtime hours.
///
/// Lines priced with it can drift from the stored `overtime_amount` if the
/// underlying requests were edited after the payslip was processed.
pub fn effective_overtime_rate(payslip: &Payslip) -> Decimal {
    payslip
        .overtime_amount
        .checked_div(payslip.overtime_hours)
        .unwrap_or(Decimal::ZERO)
}

/// Builds the detailed view of `payslip` from records fetched for its period.
///
/// No totals are recomputed. A missing employee is shown as
/// `"Unknown Employee"`.
pub fn build_detailed_payslip(
    payslip: &Payslip,
    employee: Option<&Employee>,
    attendance: &[AttendanceRecord],
    overtime: &[OvertimeRequest],
    reimbursements: &[ReimbursementRequest],
) -> DetailedPayslip {
    let rate = effective_overtime_rate(payslip);

    DetailedPayslip {
        payslip_id: payslip.id,
        employee: EmployeeInfo {
            id: payslip.employee_id,
            name: employee.map_or_else(|| UNKNOWN_EMPLOYEE.to_string(), |e| e.name.clone()),
            role: employee.map(|e| e.role),
        },
        period_start: payslip.period_start,
        period_end: payslip.period_end,
        status: payslip.status,
        processed_at: payslip.processed_at,
        summary: PayslipTotals {
            basic_salary: payslip.basic_salary,
            attendance_days: payslip.attendance_days,
            overtime_hours: payslip.overtime_hours,
            overtime_amount: payslip.overtime_amount,
            reimbursement_amount: payslip.reimbursement_amount,
            total_amount: payslip.total_amount,
        },
        attendance: attendance
            .iter()
            .map(|record| AttendanceLine {
                date: record.date,
                check_in: record.check_in,
                check_out: record.check_out,
                hours_worked: record.hours_worked,
                status: record.status,
            })
            .collect(),
        overtime: overtime
            .iter()
            .map(|request| OvertimeLine {
                date: request.date,
                hours: request.hours,
                rate,
                amount: request.hours * rate,
                reason: request.reason.clone(),
            })
            .collect(),
        reimbursements: reimbursements
            .iter()
            .map(|request| ReimbursementLine {
                date: request.date,
                category: request.category.clone(),
                amount: request.amount,
                reason: request.reason.clone(),
                status: request.status,
            })
            .collect(),
    }
}
