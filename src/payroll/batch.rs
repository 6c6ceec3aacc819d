//! Batch payroll runs across all active employees.

use std::time::Instant;

use serde::Serialize;
use tracing::{info, warn};

use super::aggregate::PayRates;
use super::context::RunContext;
use super::processor::PayrollProcessor;
use crate::error::{EngineError, EngineResult};
use crate::models::{ActorId, PayPeriod, Payslip};
use crate::store::{EntityStore, RecordStore};

/// Why one employee's payslip was not produced.
#[derive(Debug)]
pub struct EmployeeFailure {
    /// The employee that failed.
    pub employee_id: u64,
    /// What went wrong.
    pub error: EngineError,
}

impl EmployeeFailure {
    /// The `"Employee <id>: <error>"` line shown to API clients.
    pub fn message(&self) -> String {
        format!("Employee {}: {}", self.employee_id, self.error)
    }
}

/// Result of a batch run.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Payslips created by this run, in listing order.
    pub payslips: Vec<Payslip>,
    /// Per-employee failures, in listing order.
    pub failures: Vec<EmployeeFailure>,
    /// Set when the run stopped early because it was cancelled.
    pub cancelled: bool,
}

impl BatchOutcome {
    /// Failure messages, one per failed employee.
    pub fn error_messages(&self) -> Vec<String> {
        self.failures.iter().map(EmployeeFailure::message).collect()
    }

    /// The presentation form `{processed, errors}`.
    pub fn summary(&self) -> BatchSummary {
        BatchSummary {
            processed: self.payslips.len(),
            errors: self.error_messages(),
        }
    }
}

/// Serializable view of a [`BatchOutcome`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    /// Number of payslips created.
    pub processed: usize,
    /// One message per failed employee.
    pub errors: Vec<String>,
}

impl<S> PayrollProcessor<S>
where
    S: RecordStore + EntityStore<Payslip> + ?Sized,
{
    /// Processes every active employee for `period`, one after another.
    ///
    /// A failure for one employee never stops the others. Only a failure to
    /// list the employees fails the run as a whole. Once `ctx` is cancelled no
    /// further employees are processed; payslips written before that stay.
    pub fn process_all(
        &self,
        ctx: &RunContext,
        period: &PayPeriod,
        rates: &PayRates,
        actor: ActorId,
    ) -> EngineResult<BatchOutcome> {
        let started = Instant::now();
        ctx.ensure_active()?;
        let employees = self.store().active_employees().map_err(|source| {
            warn!(error = %source, "Listing active employees failed");
            EngineError::FetchFailed {
                what: "active employees",
                source,
            }
        })?;

        let mut outcome = BatchOutcome::default();
        for employee in &employees {
            if ctx.is_cancelled() {
                outcome.cancelled = true;
                break;
            }
            match self.process_known(ctx, employee, period, rates, actor) {
                Ok(payslip) => outcome.payslips.push(payslip),
                Err(EngineError::Cancelled) => {
                    outcome.cancelled = true;
                    break;
                }
                Err(error) => outcome.failures.push(EmployeeFailure {
                    employee_id: employee.id,
                    error,
                }),
            }
        }

        info!(
            period_start = %period.start_date,
            period_end = %period.end_date,
            employees = employees.len(),
            processed = outcome.payslips.len(),
            failed = outcome.failures.len(),
            cancelled = outcome.cancelled,
            duration_ms = started.elapsed().as_millis(),
            "Payroll batch finished"
        );
        Ok(outcome)
    }
}
