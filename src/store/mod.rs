//! Record store interfaces.
//!
//! The payroll core treats persistence as an external collaborator with
//! simple synchronous operations. [`RecordStore`] covers the range queries
//! payroll needs, [`EntityStore`] the generic writes that
//! [`AuditedStore`](crate::audit::AuditedStore) wraps. [`MemoryStore`] is the
//! in-process implementation used by the server binary and the tests.

mod memory;

use chrono::NaiveDate;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::audit::Auditable;
use crate::models::{
    AttendanceRecord, Employee, OvertimeRequest, PayPeriod, Payslip, ReimbursementRequest,
};

pub use memory::MemoryStore;

/// Field name to new value, used for partial updates.
pub type FieldMap = Map<String, Value>;

/// Errors reported by a record store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No live row with the given id.
    #[error("{kind} {id} not found")]
    NotFound {
        /// The entity kind.
        kind: &'static str,
        /// The missing id.
        id: u64,
    },

    /// The write would violate a uniqueness rule.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Any other backend failure.
    #[error("store backend error: {0}")]
    Backend(String),
}

/// A type alias for Results that return StoreError.
pub type StoreResult<T> = Result<T, StoreError>;

/// A persistable row type.
pub trait Entity: Auditable + Clone + Send + Sync + 'static {
    /// Short name used in logs and errors.
    const KIND: &'static str;

    /// The row id, `0` before the first insert.
    fn id(&self) -> u64;

    /// Assigns the row id on insert.
    fn set_id(&mut self, id: u64);
}

/// Generic writes over one entity type.
pub trait EntityStore<E: Entity>: Send + Sync {
    /// Inserts a new row, returning it with its assigned id.
    fn insert(&self, entity: E) -> StoreResult<E>;

    /// Replaces an existing row.
    fn save(&self, entity: E) -> StoreResult<E>;

    /// Applies a partial update to the row with `id`.
    fn update_fields(&self, id: u64, values: FieldMap) -> StoreResult<()>;

    /// Marks the row with `id` as deleted.
    fn soft_delete(&self, id: u64) -> StoreResult<()>;
}

/// The read side consumed by payroll aggregation and reporting.
///
/// All range queries are inclusive of both period bounds and never return
/// soft-deleted rows.
pub trait RecordStore: Send + Sync {
    /// Looks up an employee by id.
    fn employee_by_id(&self, id: u64) -> StoreResult<Employee>;

    /// All active employees, ordered by id.
    fn active_employees(&self) -> StoreResult<Vec<Employee>>;

    /// Attendance records of an employee within the period.
    fn attendance_in_range(
        &self,
        employee_id: u64,
        period: &PayPeriod,
    ) -> StoreResult<Vec<AttendanceRecord>>;

    /// The attendance record of an employee on one date, if any.
    fn attendance_on(&self, employee_id: u64, date: NaiveDate)
    -> StoreResult<Option<AttendanceRecord>>;

    /// Approved overtime requests of an employee within the period.
    fn approved_overtime_in_range(
        &self,
        employee_id: u64,
        period: &PayPeriod,
    ) -> StoreResult<Vec<OvertimeRequest>>;

    /// Approved reimbursement requests of an employee within the period.
    fn approved_reimbursements_in_range(
        &self,
        employee_id: u64,
        period: &PayPeriod,
    ) -> StoreResult<Vec<ReimbursementRequest>>;

    /// Approved and paid reimbursement requests of an employee within the
    /// period, as listed on a payslip.
    fn displayable_reimbursements_in_range(
        &self,
        employee_id: u64,
        period: &PayPeriod,
    ) -> StoreResult<Vec<ReimbursementRequest>>;

    /// Whether a payslip exists for exactly this employee and period.
    fn payslip_exists(&self, employee_id: u64, period: &PayPeriod) -> StoreResult<bool>;

    /// Looks up a payslip by id.
    fn payslip_by_id(&self, id: u64) -> StoreResult<Payslip>;

    /// All payslips of an employee, most recent period first.
    fn payslips_by_employee(&self, employee_id: u64) -> StoreResult<Vec<Payslip>>;

    /// All payslips whose period lies within `period`, ordered by employee id.
    fn payslips_by_period(&self, period: &PayPeriod) -> StoreResult<Vec<Payslip>>;
}

/// Everything the HTTP layer needs from a store, as one object-safe trait.
pub trait PayrollStore:
    RecordStore
    + EntityStore<Employee>
    + EntityStore<AttendanceRecord>
    + EntityStore<OvertimeRequest>
    + EntityStore<ReimbursementRequest>
    + EntityStore<Payslip>
{
}

impl<T> PayrollStore for T where
    T: RecordStore
        + EntityStore<Employee>
        + EntityStore<AttendanceRecord>
        + EntityStore<OvertimeRequest>
        + EntityStore<ReimbursementRequest>
        + EntityStore<Payslip>
{
}
