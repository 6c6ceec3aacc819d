//! Performance benchmarks for the payroll engine.
//!
//! This benchmark suite covers:
//! - Aggregation of a period's records for one employee
//! - Batch payroll runs over 100 and 1000 employees
//! - Payroll summary over the HTTP API
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use std::hint::black_box;
use std::sync::Arc;

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rust_decimal::Decimal;

use payroll_engine::api::{AppState, create_router};
use payroll_engine::audit::AuditedStore;
use payroll_engine::config::ConfigLoader;
use payroll_engine::models::{
    ActorId, AttendanceRecord, Employee, OvertimeRequest, OvertimeStatus, PayPeriod,
    ReimbursementRequest, ReimbursementStatus, Role,
};
use payroll_engine::payroll::{PayRates, PayrollProcessor, RunContext, aggregate};
use payroll_engine::store::{EntityStore, MemoryStore};

use axum::{body::Body, http::Request};
use tower::ServiceExt;

const ADMIN: ActorId = ActorId(1);

fn january() -> PayPeriod {
    PayPeriod::new(
        NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
    )
    .unwrap()
}

fn rates() -> PayRates {
    PayRates {
        basic_salary: Decimal::new(500_000_000, 2),
        overtime_rate: Decimal::new(5_000_000, 2),
    }
}

/// A month of attendance plus weekly overtime and one reimbursement.
fn records_for(
    employee_id: u64,
    days: u32,
) -> (
    Vec<AttendanceRecord>,
    Vec<OvertimeRequest>,
    Vec<ReimbursementRequest>,
) {
    let first = Utc.with_ymd_and_hms(2026, 1, 1, 8, 0, 0).unwrap();
    let attendance = (0..days)
        .map(|day| {
            let check_in = first + Duration::days(i64::from(day));
            let mut record = AttendanceRecord::checked_in(employee_id, check_in);
            record.check_out_at(check_in + Duration::hours(8));
            record
        })
        .collect();
    let overtime = (0..days)
        .step_by(7)
        .map(|day| {
            let date = first.date_naive() + Duration::days(i64::from(day));
            let mut request = OvertimeRequest::pending(employee_id, date, Decimal::new(2, 0), "release");
            request.status = OvertimeStatus::Approved;
            request
        })
        .collect();
    let mut reimbursement = ReimbursementRequest::pending(
        employee_id,
        first.date_naive(),
        Decimal::new(15_000_050, 2),
        "transport",
        "client visit",
    );
    reimbursement.status = ReimbursementStatus::Approved;
    (attendance, overtime, vec![reimbursement])
}

/// Store with an administrator and `count` employees holding a month of records.
fn seeded_store(count: u64) -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    let audited = AuditedStore::new(&*store, ActorId::SYSTEM);
    audited
        .create(Employee::new("Administrator", Role::Admin))
        .unwrap();
    for i in 0..count {
        let employee = audited
            .create(Employee::new(format!("Employee {i:04}"), Role::Employee))
            .unwrap();
        let (attendance, overtime, reimbursements) = records_for(employee.id, 22);
        for record in attendance {
            EntityStore::insert(&*store, record).unwrap();
        }
        for request in overtime {
            EntityStore::insert(&*store, request).unwrap();
        }
        for request in reimbursements {
            EntityStore::insert(&*store, request).unwrap();
        }
    }
    store
}

/// Benchmark: Aggregating one employee's period at various record counts.
fn bench_aggregate(c: &mut Criterion) {
    let period = january();
    let rates = rates();
    let mut group = c.benchmark_group("aggregate");

    for days in [1u32, 7, 22, 31] {
        let (attendance, overtime, reimbursements) = records_for(1, days);
        group.throughput(Throughput::Elements(u64::from(days)));
        group.bench_with_input(BenchmarkId::new("days", days), &days, |b, _| {
            b.iter(|| {
                black_box(aggregate(
                    black_box(&period),
                    &rates,
                    &attendance,
                    &overtime,
                    &reimbursements,
                ))
            })
        });
    }

    group.finish();
}

/// Benchmark: Batch runs over a freshly seeded store.
fn bench_batch(c: &mut Criterion) {
    let period = january();
    let rates = rates();
    let mut group = c.benchmark_group("batch_processing");

    for count in [100u64, 1000] {
        group.throughput(Throughput::Elements(count));
        if count >= 1000 {
            group.sample_size(10);
        }
        group.bench_with_input(BenchmarkId::new("employees", count), &count, |b, &count| {
            b.iter_batched(
                || PayrollProcessor::new(seeded_store(count)),
                |processor| {
                    let outcome = processor
                        .process_all(&RunContext::new(), &period, &rates, ADMIN)
                        .unwrap();
                    black_box(outcome)
                },
                BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

/// Benchmark: Payroll summary over the HTTP API after a processed batch.
fn bench_summary_endpoint(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let store = seeded_store(100);
    PayrollProcessor::new(store.clone())
        .process_all(&RunContext::new(), &january(), &rates(), ADMIN)
        .unwrap();
    let config = ConfigLoader::load("./config").expect("Failed to load config");
    let router = create_router(AppState::new(config, store));

    c.bench_function("summary_100_employees", |b| {
        b.to_async(&rt).iter(|| async {
            let router = router.clone();
            let response = router
                .oneshot(
                    Request::builder()
                        .method("GET")
                        .uri("/payroll/summary?start=2026-01-01&end=2026-01-31")
                        .header("X-Actor-Id", "1")
                        .header("X-Actor-Role", "admin")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            black_box(response)
        })
    });
}

criterion_group!(benches, bench_aggregate, bench_batch, bench_summary_endpoint);
criterion_main!(benches);
