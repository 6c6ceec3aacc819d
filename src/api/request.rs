//! Request types for the payroll API.
//!
//! This module defines the JSON request bodies, the query string of the
//! summary endpoint, and the extractor for the acting identity.

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::request::Parts;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{Actor, ActorId, PayPeriod, Role};

use super::response::{ApiError, ApiErrorResponse};

/// Header carrying the authenticated user's id.
pub const ACTOR_ID_HEADER: &str = "x-actor-id";

/// Header carrying the authenticated user's role.
pub const ACTOR_ROLE_HEADER: &str = "x-actor-role";

/// The acting identity, as established by the upstream authentication layer.
///
/// A missing id header yields [`ActorId::SYSTEM`]; a missing or unknown role
/// yields no role. Both are denied by the access guard rather than rejected
/// here. Only an id that is not a number is a bad request.
#[derive(Debug, Clone, Copy)]
pub struct CurrentActor(pub Actor);

impl CurrentActor {
    fn from_headers(headers: &HeaderMap) -> Result<Self, ApiErrorResponse> {
        let id = match headers.get(ACTOR_ID_HEADER) {
            None => ActorId::SYSTEM,
            Some(value) => value
                .to_str()
                .ok()
                .and_then(|raw| raw.trim().parse::<u64>().ok())
                .map(ActorId)
                .ok_or_else(|| {
                    ApiErrorResponse::bad_request(ApiError::validation_error(
                        "X-Actor-Id must be a non-negative integer",
                    ))
                })?,
        };
        let role = headers
            .get(ACTOR_ROLE_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|raw| Role::from_name(raw.trim()));
        Ok(Self(Actor::new(id, role)))
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentActor
where
    S: Send + Sync,
{
    type Rejection = ApiErrorResponse;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Self::from_headers(&parts.headers)
    }
}

/// Request body for `POST /payroll/process` and
/// `POST /payroll/process/:employee_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessPayrollRequest {
    /// First day of the period (inclusive).
    pub period_start: NaiveDate,
    /// Last day of the period (inclusive).
    pub period_end: NaiveDate,
    /// Basic salary; the configured default when omitted.
    #[serde(default)]
    pub basic_salary: Option<Decimal>,
    /// Overtime rate per hour; the configured default when omitted.
    #[serde(default)]
    pub overtime_rate: Option<Decimal>,
}

impl ProcessPayrollRequest {
    /// Validates the period and the rates that were given.
    pub fn validate(&self) -> EngineResult<PayPeriod> {
        for (field, value) in [
            ("basic_salary", self.basic_salary),
            ("overtime_rate", self.overtime_rate),
        ] {
            if value.is_some_and(|v| v < Decimal::ZERO) {
                return Err(EngineError::validation(field, "must not be negative"));
            }
        }
        PayPeriod::new(self.period_start, self.period_end)
    }
}

/// Query string of `GET /payroll/summary`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryQuery {
    /// First day of the range (inclusive).
    pub start: NaiveDate,
    /// Last day of the range (inclusive).
    pub end: NaiveDate,
}

/// Request body for check-in and check-out.
///
/// Both fields are optional: the employee defaults to the actor, the time
/// to now.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttendanceRequest {
    /// Whose attendance to record.
    #[serde(default)]
    pub employee_id: Option<u64>,
    /// Check-in or check-out time.
    #[serde(default)]
    pub at: Option<DateTime<Utc>>,
}

/// Request body for `POST /overtime`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OvertimeSubmission {
    /// Defaults to the actor.
    #[serde(default)]
    pub employee_id: Option<u64>,
    /// Date the overtime is for.
    pub date: NaiveDate,
    /// Hours requested.
    pub hours: Decimal,
    /// Why the overtime is needed.
    pub reason: String,
}

/// Request body for `POST /reimbursements`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReimbursementSubmission {
    /// Defaults to the actor.
    #[serde(default)]
    pub employee_id: Option<u64>,
    /// Date of the expense.
    pub date: NaiveDate,
    /// Amount to reimburse.
    pub amount: Decimal,
    /// Expense category.
    pub category: String,
    /// Optional free-text reason.
    #[serde(default)]
    pub reason: String,
}
