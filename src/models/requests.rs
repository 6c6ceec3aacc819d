//! Overtime and reimbursement requests filed by employees.
//!
//! Approval is handled by a separate workflow; payroll only consumes the
//! resulting status.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ActorId, AuditStamp};
use crate::audit::Auditable;
use crate::store::Entity;

/// Approval state of an overtime request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OvertimeStatus {
    /// Awaiting review.
    Pending,
    /// Approved; counts towards payroll.
    Approved,
    /// Rejected.
    Rejected,
}

/// Lifecycle state of a reimbursement request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReimbursementStatus {
    /// Awaiting review.
    Pending,
    /// Approved; counts towards payroll.
    Approved,
    /// Rejected.
    Rejected,
    /// Already paid out.
    Paid,
}

/// A request for overtime hours on a given date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OvertimeRequest {
    /// Unique identifier.
    #[serde(default)]
    pub id: u64,
    /// The requesting employee.
    pub employee_id: u64,
    /// Date the overtime was worked (`YYYY-MM-DD`).
    pub date: NaiveDate,
    /// Hours of overtime.
    pub hours: Decimal,
    /// Free-text reason.
    pub reason: String,
    /// Approval state.
    pub status: OvertimeStatus,
    /// Who approved or rejected the request.
    #[serde(default)]
    pub approved_by: Option<ActorId>,
    /// When the request was approved or rejected.
    #[serde(default)]
    pub approved_at: Option<DateTime<Utc>>,
    /// Audit attribution.
    #[serde(flatten)]
    pub stamp: AuditStamp,
}

impl OvertimeRequest {
    /// Creates a pending request.
    pub fn pending(
        employee_id: u64,
        date: NaiveDate,
        hours: Decimal,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            employee_id,
            date,
            hours,
            reason: reason.into(),
            status: OvertimeStatus::Pending,
            approved_by: None,
            approved_at: None,
            stamp: AuditStamp::default(),
        }
    }

    /// Returns true if the request counts towards payroll.
    pub fn is_payable(&self) -> bool {
        self.status == OvertimeStatus::Approved
    }
}

/// A request to be reimbursed for an expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReimbursementRequest {
    /// Unique identifier.
    #[serde(default)]
    pub id: u64,
    /// The requesting employee.
    pub employee_id: u64,
    /// Date of the expense.
    pub date: NaiveDate,
    /// Amount to reimburse, always positive.
    pub amount: Decimal,
    /// Expense category (e.g. "transport", "meals").
    pub category: String,
    /// Free-text reason.
    pub reason: String,
    /// Lifecycle state.
    pub status: ReimbursementStatus,
    /// Audit attribution.
    #[serde(flatten)]
    pub stamp: AuditStamp,
}

impl ReimbursementRequest {
    /// Creates a pending request.
    pub fn pending(
        employee_id: u64,
        date: NaiveDate,
        amount: Decimal,
        category: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            employee_id,
            date,
            amount,
            category: category.into(),
            reason: reason.into(),
            status: ReimbursementStatus::Pending,
            stamp: AuditStamp::default(),
        }
    }

    /// Returns true if the request counts towards payroll.
    ///
    /// Paid requests are shown on payslips but were settled already, so only
    /// approved ones are summed.
    pub fn is_payable(&self) -> bool {
        self.status == ReimbursementStatus::Approved
    }

    /// Returns true if the request is listed on payslips: approved or paid.
    pub fn is_displayable(&self) -> bool {
        matches!(
            self.status,
            ReimbursementStatus::Approved | ReimbursementStatus::Paid
        )
    }
}

impl Auditable for OvertimeRequest {
    fn audit_stamp(&self) -> Option<&AuditStamp> {
        Some(&self.stamp)
    }

    fn audit_stamp_mut(&mut self) -> Option<&mut AuditStamp> {
        Some(&mut self.stamp)
    }
}

impl Entity for OvertimeRequest {
    const KIND: &'static str = "overtime";

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }
}

impl Auditable for ReimbursementRequest {
    fn audit_stamp(&self) -> Option<&AuditStamp> {
        Some(&self.stamp)
    }

    fn audit_stamp_mut(&mut self) -> Option<&mut AuditStamp> {
        Some(&mut self.stamp)
    }
}

impl Entity for ReimbursementRequest {
    const KIND: &'static str = "reimbursement";

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }
}
