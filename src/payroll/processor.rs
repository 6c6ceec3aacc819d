//! Single-employee payroll processing.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::aggregate::{PayRates, aggregate};
use super::context::RunContext;
use super::locks::{PeriodKey, PeriodLocks};
use crate::audit::AuditedStore;
use crate::error::{EngineError, EngineResult};
use crate::models::{ActorId, Employee, PayPeriod, Payslip};
use crate::store::{EntityStore, RecordStore, StoreError, StoreResult};

/// Computes and persists payslips against a record store.
///
/// The processor is shared between requests; it owns the lock registry that
/// serializes runs for the same employee and period.
pub struct PayrollProcessor<S: ?Sized> {
    store: Arc<S>,
    locks: PeriodLocks,
}

impl<S> PayrollProcessor<S>
where
    S: RecordStore + EntityStore<Payslip> + ?Sized,
{
    /// Creates a processor over `store`.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            locks: PeriodLocks::new(),
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Computes and persists the payslip of one employee for `period`.
    ///
    /// Fails with [`EngineError::NotFound`] for unknown or deleted employees
    /// and with [`EngineError::AlreadyProcessed`] when a payslip for exactly
    /// this period already exists; in both cases nothing is written.
    pub fn process_employee(
        &self,
        ctx: &RunContext,
        employee_id: u64,
        period: &PayPeriod,
        rates: &PayRates,
        actor: ActorId,
    ) -> EngineResult<Payslip> {
        ctx.ensure_active()?;
        let employee = self
            .store
            .employee_by_id(employee_id)
            .map_err(|err| match err {
                StoreError::NotFound { .. } => EngineError::NotFound {
                    entity: "employee",
                    id: employee_id,
                },
                other => EngineError::FetchFailed {
                    what: "employee",
                    source: other,
                },
            })?;
        self.process_known(ctx, &employee, period, rates, actor)
    }

    /// Like [`process_employee`](Self::process_employee) for an employee that
    /// was already resolved, e.g. by a batch listing.
    pub(crate) fn process_known(
        &self,
        ctx: &RunContext,
        employee: &Employee,
        period: &PayPeriod,
        rates: &PayRates,
        actor: ActorId,
    ) -> EngineResult<Payslip> {
        let employee_id = employee.id;
        let _guard = self.locks.acquire(PeriodKey::new(employee_id, period));

        if self.fetch(ctx, "existing payslips", employee_id, || {
            self.store.payslip_exists(employee_id, period)
        })? {
            info!(
                employee_id,
                period_start = %period.start_date,
                period_end = %period.end_date,
                "Payslip already processed"
            );
            return Err(already_processed(employee_id, period));
        }

        let attendance = self.fetch(ctx, "attendance records", employee_id, || {
            self.store.attendance_in_range(employee_id, period)
        })?;
        let overtime = self.fetch(ctx, "overtime requests", employee_id, || {
            self.store.approved_overtime_in_range(employee_id, period)
        })?;
        let reimbursements = self.fetch(ctx, "reimbursement requests", employee_id, || {
            self.store.approved_reimbursements_in_range(employee_id, period)
        })?;

        let payslip = aggregate(period, rates, &attendance, &overtime, &reimbursements)
            .into_payslip(employee_id, period, Utc::now());

        ctx.ensure_active()?;
        let created = AuditedStore::new(&*self.store, actor)
            .create(payslip)
            .map_err(|err| match err {
                StoreError::Conflict(_) => already_processed(employee_id, period),
                other => EngineError::PersistFailed {
                    what: "payslip",
                    source: other,
                },
            })?;

        info!(
            employee_id,
            payslip_id = created.id,
            period_start = %period.start_date,
            period_end = %period.end_date,
            attendance_days = created.attendance_days,
            total_amount = %created.total_amount,
            "Payslip created"
        );
        Ok(created)
    }

    fn fetch<T>(
        &self,
        ctx: &RunContext,
        what: &'static str,
        employee_id: u64,
        read: impl FnOnce() -> StoreResult<T>,
    ) -> EngineResult<T> {
        ctx.ensure_active()?;
        read().map_err(|source| {
            warn!(employee_id, what, error = %source, "Record fetch failed");
            EngineError::FetchFailed { what, source }
        })
    }
}

fn already_processed(employee_id: u64, period: &PayPeriod) -> EngineError {
    EngineError::AlreadyProcessed {
        employee_id,
        period_start: period.start_date,
        period_end: period.end_date,
    }
}
