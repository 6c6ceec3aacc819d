//! Cross-employee payroll summary.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use super::UNKNOWN_EMPLOYEE;
use crate::models::Payslip;

/// Sums over one employee's payslips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeSubtotal {
    /// The employee.
    pub employee_id: u64,
    /// Display name, `"Unknown Employee"` when it could not be resolved.
    pub employee_name: String,
    /// Number of payslips summed.
    pub payslip_count: usize,
    /// Sum of basic salaries.
    pub basic_salary: Decimal,
    /// Sum of overtime hours.
    pub overtime_hours: Decimal,
    /// Sum of overtime pay.
    pub overtime_amount: Decimal,
    /// Sum of reimbursements.
    pub reimbursement_amount: Decimal,
    /// Sum of attendance days.
    pub attendance_days: u64,
    /// Sum of payslip totals.
    pub total_amount: Decimal,
}

impl EmployeeSubtotal {
    fn new(employee_id: u64, employee_name: String) -> Self {
        Self {
            employee_id,
            employee_name,
            payslip_count: 0,
            basic_salary: Decimal::ZERO,
            overtime_hours: Decimal::ZERO,
            overtime_amount: Decimal::ZERO,
            reimbursement_amount: Decimal::ZERO,
            attendance_days: 0,
            total_amount: Decimal::ZERO,
        }
    }

    fn add(&mut self, payslip: &Payslip) {
        self.payslip_count += 1;
        self.basic_salary += payslip.basic_salary;
        self.overtime_hours += payslip.overtime_hours;
        self.overtime_amount += payslip.overtime_amount;
        self.reimbursement_amount += payslip.reimbursement_amount;
        self.attendance_days += u64::from(payslip.attendance_days);
        self.total_amount += payslip.total_amount;
    }
}

/// Totals across every payslip in the summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SummaryTotals {
    /// Sum of basic salaries.
    pub basic_salary: Decimal,
    /// Sum of overtime hours.
    pub overtime_hours: Decimal,
    /// Sum of overtime pay.
    pub overtime_amount: Decimal,
    /// Sum of reimbursements.
    pub reimbursement_amount: Decimal,
    /// Sum of attendance days.
    pub attendance_days: u64,
    /// Sum of payslip totals.
    pub total_amount: Decimal,
}

/// Per-employee means, rounded to two decimal places.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SummaryAverages {
    /// Mean payslip total per employee.
    pub total_amount: Decimal,
    /// Mean basic salary per employee.
    pub basic_salary: Decimal,
    /// Mean overtime pay per employee.
    pub overtime_amount: Decimal,
    /// Mean reimbursement per employee.
    pub reimbursement_amount: Decimal,
    /// Mean attendance days per employee.
    pub attendance_days: Decimal,
    /// Mean overtime hours per employee.
    pub overtime_hours: Decimal,
}

/// Payroll summary over a set of payslips.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PayrollSummary {
    /// Number of distinct employees.
    pub employee_count: usize,
    /// Number of payslips summed.
    pub payslip_count: usize,
    /// Cross-employee totals.
    pub totals: SummaryTotals,
    /// Totals divided by `employee_count`, all zero when it is zero.
    pub averages: SummaryAverages,
    /// Subtotals ordered by employee id.
    pub employees: Vec<EmployeeSubtotal>,
}

/// Groups `payslips` by employee and computes totals and averages.
///
/// `employee_name` is asked once per distinct employee id; a `None` answer
/// labels the employee `"Unknown Employee"` instead of failing.
///
/// # Example
///
/// ```
/// use payroll_engine::reporting::build_payroll_summary;
/// use rust_decimal::Decimal;
///
/// let summary = build_payroll_summary(&[], |_| None);
/// assert_eq!(summary.employee_count, 0);
/// assert_eq!(summary.averages.total_amount, Decimal::ZERO);
/// ```
pub fn build_payroll_summary(
    payslips: &[Payslip],
    employee_name: impl Fn(u64) -> Option<String>,
) -> PayrollSummary {
    let mut grouped: BTreeMap<u64, EmployeeSubtotal> = BTreeMap::new();
    for payslip in payslips {
        grouped
            .entry(payslip.employee_id)
            .or_insert_with(|| {
                let name = employee_name(payslip.employee_id)
                    .unwrap_or_else(|| UNKNOWN_EMPLOYEE.to_string());
                EmployeeSubtotal::new(payslip.employee_id, name)
            })
            .add(payslip);
    }

    let mut totals = SummaryTotals::default();
    for subtotal in grouped.values() {
        totals.basic_salary += subtotal.basic_salary;
        totals.overtime_hours += subtotal.overtime_hours;
        totals.overtime_amount += subtotal.overtime_amount;
        totals.reimbursement_amount += subtotal.reimbursement_amount;
        totals.attendance_days += subtotal.attendance_days;
        totals.total_amount += subtotal.total_amount;
    }

    let employee_count = grouped.len();
    let averages = SummaryAverages {
        total_amount: mean(totals.total_amount, employee_count),
        basic_salary: mean(totals.basic_salary, employee_count),
        overtime_amount: mean(totals.overtime_amount, employee_count),
        reimbursement_amount: mean(totals.reimbursement_amount, employee_count),
        attendance_days: mean(Decimal::from(totals.attendance_days), employee_count),
        overtime_hours: mean(totals.overtime_hours, employee_count),
    };

    PayrollSummary {
        employee_count,
        payslip_count: payslips.len(),
        totals,
        averages,
        employees: grouped.into_values().collect(),
    }
}

fn mean(sum: Decimal, count: usize) -> Decimal {
    if count == 0 {
        return Decimal::ZERO;
    }
    sum.checked_div(Decimal::from(count))
        .map_or(Decimal::ZERO, |avg| avg.round_dp(2))
}
