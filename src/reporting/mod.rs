//! Read-only views over persisted payslips.
//!
//! The builders in [`detail`] and [`summary`] are pure; the functions here
//! fetch what they need from a [`RecordStore`] and apply the access guard
//! before any employee-scoped data is read.

mod detail;
mod summary;

use tracing::warn;

use crate::access::{ensure_access, ensure_admin};
use crate::error::{EngineError, EngineResult};
use crate::models::{Actor, PayPeriod, Payslip};
use crate::store::{RecordStore, StoreError};

pub use detail::{
    AttendanceLine, DetailedPayslip, EmployeeInfo, OvertimeLine, PayslipTotals,
    ReimbursementLine, build_detailed_payslip, effective_overtime_rate,
};
pub use summary::{
    EmployeeSubtotal, PayrollSummary, SummaryAverages, SummaryTotals, build_payroll_summary,
};

/// Label used when an employee id cannot be resolved to a name.
pub const UNKNOWN_EMPLOYEE: &str = "Unknown Employee";

/// Lists an employee's payslips, most recent first.
pub fn employee_payslips<S>(store: &S, actor: &Actor, employee_id: u64) -> EngineResult<Vec<Payslip>>
where
    S: RecordStore + ?Sized,
{
    ensure_access(actor, employee_id)?;
    store
        .payslips_by_employee(employee_id)
        .map_err(fetch_failed("payslips"))
}

/// Loads a payslip with its attendance, overtime and reimbursement lines.
///
/// The payslip is read first to learn its owner; the guard runs before any
/// of the owner's records are fetched.
pub fn payslip_detail<S>(store: &S, actor: &Actor, payslip_id: u64) -> EngineResult<DetailedPayslip>
where
    S: RecordStore + ?Sized,
{
    let payslip = store.payslip_by_id(payslip_id).map_err(|err| match err {
        StoreError::NotFound { .. } => EngineError::NotFound {
            entity: "payslip",
            id: payslip_id,
        },
        other => fetch_failed("payslip")(other),
    })?;
    ensure_access(actor, payslip.employee_id)?;

    let period = payslip.period();
    let employee_id = payslip.employee_id;
    let employee = match store.employee_by_id(employee_id) {
        Ok(employee) => Some(employee),
        Err(StoreError::NotFound { .. }) => None,
        Err(other) => return Err(fetch_failed("employee")(other)),
    };
    let attendance = store
        .attendance_in_range(employee_id, &period)
        .map_err(fetch_failed("attendance records"))?;
    let overtime = store
        .approved_overtime_in_range(employee_id, &period)
        .map_err(fetch_failed("overtime requests"))?;
    let reimbursements = store
        .displayable_reimbursements_in_range(employee_id, &period)
        .map_err(fetch_failed("reimbursement requests"))?;

    Ok(build_detailed_payslip(
        &payslip,
        employee.as_ref(),
        &attendance,
        &overtime,
        &reimbursements,
    ))
}

/// Summarizes every payslip whose period lies within `period`. Admin only.
pub fn payroll_summary<S>(store: &S, actor: &Actor, period: &PayPeriod) -> EngineResult<PayrollSummary>
where
    S: RecordStore + ?Sized,
{
    ensure_admin(actor)?;
    let payslips = store
        .payslips_by_period(period)
        .map_err(fetch_failed("payslips"))?;
    // Name lookups are best effort; any failure falls back to the unknown label.
    Ok(build_payroll_summary(&payslips, |id| {
        store.employee_by_id(id).ok().map(|employee| employee.name)
    }))
}

fn fetch_failed(what: &'static str) -> impl Fn(StoreError) -> EngineError {
    move |source| {
        warn!(what, error = %source, "Report fetch failed");
        EngineError::FetchFailed { what, source }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;
    use std::sync::Arc;

    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use super::*;
    use crate::audit::AuditedStore;
    use serde_json::json;

    use crate::models::{
        ActorId, Employee, OvertimeRequest, OvertimeStatus, ReimbursementRequest,
        ReimbursementStatus, Role,
    };
    use crate::payroll::{PayRates, PayrollProcessor, RunContext};
    use crate::store::{FieldMap, MemoryStore};

    fn january() -> PayPeriod {
        PayPeriod::new(
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
        )
        .unwrap()
    }

    fn processed_store() -> (Arc<MemoryStore>, Payslip) {
        let store = Arc::new(MemoryStore::new());
        let audited = AuditedStore::new(&*store, ActorId::SYSTEM);
        let employee = audited
            .create(Employee::new("Wulan", Role::Employee))
            .unwrap();
        audited
            .create(Employee::new("Yoga", Role::Employee))
            .unwrap();
        let mut overtime = OvertimeRequest::pending(
            employee.id,
            NaiveDate::from_ymd_opt(2026, 1, 12).unwrap(),
            Decimal::new(3, 0),
            "inventory",
        );
        overtime.status = OvertimeStatus::Approved;
        audited.create(overtime).unwrap();

        let processor = PayrollProcessor::new(Arc::clone(&store));
        let rates = PayRates {
            basic_salary: Decimal::from_str("2500.00").unwrap(),
            overtime_rate: Decimal::from_str("12.50").unwrap(),
        };
        let payslip = processor
            .process_employee(&RunContext::new(), employee.id, &january(), &rates, ActorId(99))
            .unwrap();
        (store, payslip)
    }

    #[test]
    fn test_employee_may_list_own_payslips_only() {
        let (store, payslip) = processed_store();

        let own = employee_payslips(&*store, &Actor::employee(1), 1).unwrap();
        assert_eq!(own, vec![payslip]);

        let other = employee_payslips(&*store, &Actor::employee(2), 1);
        assert!(matches!(other, Err(EngineError::Forbidden { .. })));
    }

    #[test]
    fn test_detail_is_guarded_by_owner() {
        let (store, payslip) = processed_store();

        let result = payslip_detail(&*store, &Actor::employee(2), payslip.id);
        assert!(matches!(
            result,
            Err(EngineError::Forbidden {
                actor_id: 2,
                employee_id: 1
            })
        ));

        let view = payslip_detail(&*store, &Actor::admin(99), payslip.id).unwrap();
        assert_eq!(view.employee.name, "Wulan");
        assert_eq!(view.overtime.len(), 1);
        assert_eq!(view.overtime[0].rate, Decimal::from_str("12.5").unwrap());
        assert_eq!(view.summary.total_amount, payslip.total_amount);
    }

    #[test]
    fn test_detail_keeps_reimbursements_paid_after_processing() {
        let store = Arc::new(MemoryStore::new());
        let audited = AuditedStore::new(&*store, ActorId(1));
        let employee = audited
            .create(Employee::new("Wulan", Role::Employee))
            .unwrap();
        let mut reimbursement = ReimbursementRequest::pending(
            employee.id,
            NaiveDate::from_ymd_opt(2026, 1, 20).unwrap(),
            Decimal::new(100, 0),
            "transport",
            "airport taxi",
        );
        reimbursement.status = ReimbursementStatus::Approved;
        let reimbursement = audited.create(reimbursement).unwrap();
        let payslip = PayrollProcessor::new(Arc::clone(&store))
            .process_employee(
                &RunContext::new(),
                employee.id,
                &january(),
                &PayRates {
                    basic_salary: Decimal::new(2500, 0),
                    overtime_rate: Decimal::ZERO,
                },
                ActorId(1),
            )
            .unwrap();

        let mut values = FieldMap::new();
        values.insert("status".to_string(), json!("paid"));
        audited.update(&reimbursement, values).unwrap();

        let view = payslip_detail(&*store, &Actor::admin(1), payslip.id).unwrap();
        assert_eq!(view.summary.reimbursement_amount, Decimal::new(100, 0));
        assert_eq!(view.reimbursements.len(), 1);
        assert_eq!(view.reimbursements[0].status, ReimbursementStatus::Paid);
        assert_eq!(view.reimbursements[0].amount, Decimal::new(100, 0));
    }

    #[test]
    fn test_missing_payslip_is_not_found() {
        let store = MemoryStore::new();
        let result = payslip_detail(&store, &Actor::admin(1), 404);
        assert!(matches!(
            result,
            Err(EngineError::NotFound {
                entity: "payslip",
                id: 404
            })
        ));
    }

    #[test]
    fn test_summary_requires_admin() {
        let (store, _) = processed_store();

        let denied = payroll_summary(&*store, &Actor::employee(1), &january());
        assert!(matches!(denied, Err(EngineError::AdminRequired { .. })));

        let summary = payroll_summary(&*store, &Actor::admin(99), &january()).unwrap();
        assert_eq!(summary.employee_count, 1);
        assert_eq!(summary.employees[0].employee_name, "Wulan");
        assert_eq!(summary.totals.total_amount, Decimal::from_str("2537.50").unwrap());
    }
}
