//! Payroll aggregation and batch processing.
//!
//! [`aggregate`] holds the pure arithmetic, [`PayrollProcessor`] wires it to a
//! record store for one employee or for every active employee at once.

mod aggregate;
mod batch;
mod context;
mod locks;
mod processor;

pub use aggregate::{PayComponents, PayRates, aggregate};
pub use batch::{BatchOutcome, BatchSummary, EmployeeFailure};
pub use context::RunContext;
pub use locks::{PeriodGuard, PeriodKey, PeriodLocks};
pub use processor::PayrollProcessor;
