//! Attendance tracking and self-service requests.
//!
//! Employees check in and out, and submit overtime and reimbursement
//! requests for later approval. Every write is access-checked against the
//! target employee, requires that employee to exist, and is attributed
//! through [`AuditedStore`].

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::info;

use crate::access::ensure_access;
use crate::audit::AuditedStore;
use crate::config::OvertimeLimits;
use crate::error::{EngineError, EngineResult};
use crate::models::{Actor, AttendanceRecord, Employee, OvertimeRequest, ReimbursementRequest};
use crate::store::{EntityStore, RecordStore, StoreError};

/// Records the check-in of `employee_id` at `at`.
///
/// Only one attendance record exists per employee and date; a second
/// check-in on the same date is rejected.
pub fn check_in<S>(
    store: &S,
    actor: &Actor,
    employee_id: u64,
    at: DateTime<Utc>,
) -> EngineResult<AttendanceRecord>
where
    S: RecordStore + EntityStore<AttendanceRecord> + ?Sized,
{
    ensure_access(actor, employee_id)?;
    find_employee(store, employee_id)?;
    let date = at.date_naive();
    if todays_record(store, employee_id, date)?.is_some() {
        return Err(EngineError::validation(
            "check_in",
            format!("already checked in on {date}"),
        ));
    }

    let record = AuditedStore::new(store, actor.id)
        .create(AttendanceRecord::checked_in(employee_id, at))
        .map_err(|err| match err {
            StoreError::Conflict(_) => {
                EngineError::validation("check_in", format!("already checked in on {date}"))
            }
            other => persist_failed("attendance record", other),
        })?;
    info!(employee_id, date = %date, "Checked in");
    Ok(record)
}

/// Records the check-out of `employee_id` at `at` and derives the hours
/// worked that day.
pub fn check_out<S>(
    store: &S,
    actor: &Actor,
    employee_id: u64,
    at: DateTime<Utc>,
) -> EngineResult<AttendanceRecord>
where
    S: RecordStore + EntityStore<AttendanceRecord> + ?Sized,
{
    ensure_access(actor, employee_id)?;
    find_employee(store, employee_id)?;
    let date = at.date_naive();
    let mut record = todays_record(store, employee_id, date)?.ok_or_else(|| {
        EngineError::validation("check_out", format!("no check-in on {date}"))
    })?;
    if record.check_out.is_some() {
        return Err(EngineError::validation(
            "check_out",
            format!("already checked out on {date}"),
        ));
    }
    if at < record.check_in {
        return Err(EngineError::validation(
            "check_out",
            "must not be earlier than check-in",
        ));
    }

    record.check_out_at(at);
    let saved = AuditedStore::new(store, actor.id)
        .save(record)
        .map_err(|err| persist_failed("attendance record", err))?;
    info!(employee_id, date = %date, hours_worked = %saved.hours_worked, "Checked out");
    Ok(saved)
}

/// Files a pending overtime request.
///
/// `hours` must lie within `limits`; the reason must not be blank.
pub fn submit_overtime<S>(
    store: &S,
    actor: &Actor,
    limits: &OvertimeLimits,
    employee_id: u64,
    date: NaiveDate,
    hours: Decimal,
    reason: &str,
) -> EngineResult<OvertimeRequest>
where
    S: RecordStore + EntityStore<OvertimeRequest> + ?Sized,
{
    ensure_access(actor, employee_id)?;
    find_employee(store, employee_id)?;
    if !limits.allows(hours) {
        return Err(EngineError::validation(
            "hours",
            format!(
                "must be between {} and {}",
                limits.min_hours, limits.max_hours
            ),
        ));
    }
    if reason.trim().is_empty() {
        return Err(EngineError::validation("reason", "must not be empty"));
    }

    let request = AuditedStore::new(store, actor.id)
        .create(OvertimeRequest::pending(employee_id, date, hours, reason.trim()))
        .map_err(|err| persist_failed("overtime request", err))?;
    info!(employee_id, request_id = request.id, hours = %hours, "Overtime submitted");
    Ok(request)
}

/// Files a pending reimbursement request. `amount` must be positive.
pub fn submit_reimbursement<S>(
    store: &S,
    actor: &Actor,
    employee_id: u64,
    date: NaiveDate,
    amount: Decimal,
    category: &str,
    reason: &str,
) -> EngineResult<ReimbursementRequest>
where
    S: RecordStore + EntityStore<ReimbursementRequest> + ?Sized,
{
    ensure_access(actor, employee_id)?;
    find_employee(store, employee_id)?;
    if amount <= Decimal::ZERO {
        return Err(EngineError::validation("amount", "must be greater than zero"));
    }
    if category.trim().is_empty() {
        return Err(EngineError::validation("category", "must not be empty"));
    }

    let request = AuditedStore::new(store, actor.id)
        .create(ReimbursementRequest::pending(
            employee_id,
            date,
            amount,
            category.trim(),
            reason.trim(),
        ))
        .map_err(|err| persist_failed("reimbursement request", err))?;
    info!(employee_id, request_id = request.id, amount = %amount, "Reimbursement submitted");
    Ok(request)
}

/// Looks up an employee, mapping a missing or soft-deleted one to
/// [`EngineError::NotFound`].
pub(crate) fn find_employee<S>(store: &S, employee_id: u64) -> EngineResult<Employee>
where
    S: RecordStore + ?Sized,
{
    store.employee_by_id(employee_id).map_err(|err| match err {
        StoreError::NotFound { .. } => EngineError::NotFound {
            entity: "employee",
            id: employee_id,
        },
        source => EngineError::FetchFailed {
            what: "employee",
            source,
        },
    })
}

fn todays_record<S>(
    store: &S,
    employee_id: u64,
    date: NaiveDate,
) -> EngineResult<Option<AttendanceRecord>>
where
    S: RecordStore + ?Sized,
{
    store
        .attendance_on(employee_id, date)
        .map_err(|source| EngineError::FetchFailed {
            what: "attendance records",
            source,
        })
}

fn persist_failed(what: &'static str, source: StoreError) -> EngineError {
    EngineError::PersistFailed { what, source }
}
