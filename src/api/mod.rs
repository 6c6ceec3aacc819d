//! HTTP API module for the payroll engine.
//!
//! This module provides the REST endpoints for running payroll, reading
//! payslips and summaries, and recording attendance and requests. The acting
//! identity is read from the `X-Actor-Id` and `X-Actor-Role` headers set by
//! the upstream authentication layer.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    ACTOR_ID_HEADER, ACTOR_ROLE_HEADER, AttendanceRequest, CurrentActor, OvertimeSubmission,
    ProcessPayrollRequest, ReimbursementSubmission, SummaryQuery,
};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
