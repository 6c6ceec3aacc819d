//! Payroll engine for an HR attendance backend.
//!
//! This crate aggregates attendance, approved overtime and approved
//! reimbursements into per-period payslips, attributes every write to the
//! acting user, guards employee-scoped reads, and reports on processed
//! payslips.

#![warn(missing_docs)]

pub mod access;
pub mod api;
pub mod attendance;
pub mod audit;
pub mod config;
pub mod error;
pub mod models;
pub mod payroll;
pub mod reporting;
pub mod store;
