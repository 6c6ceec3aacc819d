//! HTTP request handlers for the payroll API.
//!
//! This module contains the handler functions for all API endpoints. The
//! handlers are thin: they resolve the actor, parse the input, and delegate
//! to the payroll, reporting and attendance modules.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use chrono::Utc;
use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::access::ensure_admin;
use crate::attendance;
use crate::audit::AuditedStore;
use crate::error::{EngineError, EngineResult};
use crate::models::PayPeriod;
use crate::reporting;

use super::request::{
    AttendanceRequest, CurrentActor, OvertimeSubmission, ProcessPayrollRequest,
    ReimbursementSubmission, SummaryQuery,
};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/payroll/process", post(process_all_handler))
        .route("/payroll/process/:employee_id", post(process_employee_handler))
        .route("/payroll/summary", get(summary_handler))
        .route("/employees/:id", delete(delete_employee_handler))
        .route("/employees/:id/payslips", get(employee_payslips_handler))
        .route("/payslips/:id", get(payslip_detail_handler))
        .route("/attendance/check-in", post(check_in_handler))
        .route("/attendance/check-out", post(check_out_handler))
        .route("/overtime", post(overtime_handler))
        .route("/reimbursements", post(reimbursement_handler))
        .with_state(state)
}

/// Handler for POST /payroll/process.
///
/// Runs payroll for every active employee. Per-employee failures are
/// reported in `errors` and do not fail the request.
async fn process_all_handler(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    payload: Result<Json<ProcessPayrollRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, actor_id = %actor.id, "Processing payroll batch");

    let request = match parse_json(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let period = match ensure_admin(&actor).and_then(|()| request.validate()) {
        Ok(period) => period,
        Err(err) => return error_response(correlation_id, err),
    };
    let rates = state
        .config()
        .rates_or_default(request.basic_salary, request.overtime_rate);

    let start_time = Instant::now();
    let processor = state.processor().clone();
    let ctx = state.run_context();
    let outcome = match tokio::task::spawn_blocking(move || {
        processor.process_all(&ctx, &period, &rates, actor.id)
    })
    .await
    {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(err)) => return error_response(correlation_id, err),
        Err(join_error) => return internal_error(correlation_id, join_error),
    };

    info!(
        correlation_id = %correlation_id,
        processed = outcome.payslips.len(),
        failed = outcome.failures.len(),
        duration_us = start_time.elapsed().as_micros(),
        "Payroll batch completed"
    );
    json_response(StatusCode::OK, outcome.summary())
}

/// Handler for POST /payroll/process/:employee_id.
async fn process_employee_handler(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(employee_id): Path<u64>,
    payload: Result<Json<ProcessPayrollRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, employee_id, "Processing employee payroll");

    let request = match parse_json(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let period = match ensure_admin(&actor).and_then(|()| request.validate()) {
        Ok(period) => period,
        Err(err) => return error_response(correlation_id, err),
    };
    let rates = state
        .config()
        .rates_or_default(request.basic_salary, request.overtime_rate);

    let processor = state.processor().clone();
    let ctx = state.run_context();
    match tokio::task::spawn_blocking(move || {
        processor.process_employee(&ctx, employee_id, &period, &rates, actor.id)
    })
    .await
    {
        Ok(result) => respond(correlation_id, StatusCode::CREATED, result),
        Err(join_error) => internal_error(correlation_id, join_error),
    }
}

/// Handler for GET /payroll/summary?start=&end=.
async fn summary_handler(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    query: Result<Query<SummaryQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            warn!(correlation_id = %correlation_id, error = %rejection, "Invalid query string");
            return ApiErrorResponse::bad_request(ApiError::validation_error(rejection.body_text()))
                .into_response();
        }
    };

    let result = PayPeriod::new(query.start, query.end)
        .and_then(|period| reporting::payroll_summary(state.store(), &actor, &period));
    respond(correlation_id, StatusCode::OK, result)
}

/// Handler for GET /employees/:id/payslips.
async fn employee_payslips_handler(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(employee_id): Path<u64>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = reporting::employee_payslips(state.store(), &actor, employee_id);
    respond(correlation_id, StatusCode::OK, result)
}

/// Handler for GET /payslips/:id.
async fn payslip_detail_handler(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(payslip_id): Path<u64>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = reporting::payslip_detail(state.store(), &actor, payslip_id);
    respond(correlation_id, StatusCode::OK, result)
}

/// Handler for DELETE /employees/:id.
async fn delete_employee_handler(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(employee_id): Path<u64>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = ensure_admin(&actor)
        .and_then(|()| attendance::find_employee(state.store(), employee_id))
        .and_then(|employee| {
            AuditedStore::new(state.store(), actor.id)
                .delete(&employee)
                .map_err(|source| EngineError::PersistFailed {
                    what: "employee",
                    source,
                })
        });
    match result {
        Ok(()) => {
            info!(correlation_id = %correlation_id, employee_id, actor_id = %actor.id, "Employee deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /attendance/check-in.
async fn check_in_handler(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    payload: Result<Json<AttendanceRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_json(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let employee_id = request.employee_id.unwrap_or(actor.id.0);
    let at = request.at.unwrap_or_else(Utc::now);
    let result = attendance::check_in(state.store(), &actor, employee_id, at);
    respond(correlation_id, StatusCode::CREATED, result)
}

/// Handler for POST /attendance/check-out.
async fn check_out_handler(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    payload: Result<Json<AttendanceRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_json(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let employee_id = request.employee_id.unwrap_or(actor.id.0);
    let at = request.at.unwrap_or_else(Utc::now);
    let result = attendance::check_out(state.store(), &actor, employee_id, at);
    respond(correlation_id, StatusCode::OK, result)
}

/// Handler for POST /overtime.
async fn overtime_handler(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    payload: Result<Json<OvertimeSubmission>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_json(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let result = attendance::submit_overtime(
        state.store(),
        &actor,
        &state.config().overtime_limits(),
        request.employee_id.unwrap_or(actor.id.0),
        request.date,
        request.hours,
        &request.reason,
    );
    respond(correlation_id, StatusCode::CREATED, result)
}

/// Handler for POST /reimbursements.
async fn reimbursement_handler(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    payload: Result<Json<ReimbursementSubmission>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_json(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let result = attendance::submit_reimbursement(
        state.store(),
        &actor,
        request.employee_id.unwrap_or(actor.id.0),
        request.date,
        request.amount,
        &request.category,
        &request.reason,
    );
    respond(correlation_id, StatusCode::CREATED, result)
}

/// Unwraps a JSON body, turning extractor rejections into `400` responses.
fn parse_json<T>(
    correlation_id: Uuid,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, Response> {
    let rejection = match payload {
        Ok(Json(request)) => return Ok(request),
        Err(rejection) => rejection,
    };

    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's detailed message.
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    Err(ApiErrorResponse::bad_request(error).into_response())
}

fn respond<T: Serialize>(correlation_id: Uuid, status: StatusCode, result: EngineResult<T>) -> Response {
    match result {
        Ok(body) => {
            info!(correlation_id = %correlation_id, status = status.as_u16(), "Request completed");
            json_response(status, body)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(correlation_id: Uuid, err: EngineError) -> Response {
    let api_error = ApiErrorResponse::from(err);
    if api_error.status.is_server_error() {
        error!(
            correlation_id = %correlation_id,
            error = %api_error.error.message,
            details = api_error.error.details.as_deref().unwrap_or(""),
            "Request failed"
        );
    } else {
        warn!(
            correlation_id = %correlation_id,
            status = api_error.status.as_u16(),
            error = %api_error.error.message,
            "Request rejected"
        );
    }
    api_error.into_response()
}

fn internal_error(correlation_id: Uuid, join_error: tokio::task::JoinError) -> Response {
    error!(correlation_id = %correlation_id, error = %join_error, "Payroll task failed");
    ApiErrorResponse {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        error: ApiError::internal("payroll task did not complete"),
    }
    .into_response()
}
