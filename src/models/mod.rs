//! Core data models for the payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod attendance;
mod employee;
mod identity;
mod pay_period;
mod payslip;
mod requests;
mod stamp;

pub use attendance::{AttendanceRecord, AttendanceStatus, derive_hours};
pub use employee::Employee;
pub use identity::{Actor, ActorId, Role};
pub use pay_period::PayPeriod;
pub use payslip::{Payslip, PayslipStatus};
pub use requests::{OvertimeRequest, OvertimeStatus, ReimbursementRequest, ReimbursementStatus};
pub use stamp::AuditStamp;
