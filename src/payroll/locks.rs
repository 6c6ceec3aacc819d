//! Per employee and period serialization of payroll runs.
//!
//! The existence check and the payslip insert are two separate store calls.
//! Holding a [`PeriodGuard`] across both keeps two runs in this process from
//! creating duplicate payslips for the same employee and period.

use std::collections::HashSet;
use std::sync::{Condvar, Mutex, PoisonError};

use tracing::debug;

use crate::models::PayPeriod;

/// Identifies one payslip slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PeriodKey {
    employee_id: u64,
    period: PayPeriod,
}

impl PeriodKey {
    /// Key for `employee_id` over `period`.
    pub fn new(employee_id: u64, period: &PayPeriod) -> Self {
        Self {
            employee_id,
            period: *period,
        }
    }
}

/// Registry of the slots currently being processed.
#[derive(Debug, Default)]
pub struct PeriodLocks {
    in_flight: Mutex<HashSet<PeriodKey>>,
    released: Condvar,
}

impl PeriodLocks {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks until no other run holds `key`, then claims it.
    pub fn acquire(&self, key: PeriodKey) -> PeriodGuard<'_> {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        while in_flight.contains(&key) {
            debug!(employee_id = key.employee_id, "Waiting for concurrent payroll run");
            in_flight = self
                .released
                .wait(in_flight)
                .unwrap_or_else(PoisonError::into_inner);
        }
        in_flight.insert(key);
        PeriodGuard { locks: self, key }
    }

    /// Number of slots currently claimed.
    pub fn in_flight(&self) -> usize {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Releases its slot when dropped.
#[derive(Debug)]
pub struct PeriodGuard<'a> {
    locks: &'a PeriodLocks,
    key: PeriodKey,
}

impl Drop for PeriodGuard<'_> {
    fn drop(&mut self) {
        let mut in_flight = self
            .locks
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        in_flight.remove(&self.key);
        self.locks.released.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;
    use std::time::Duration;

    use chrono::NaiveDate;

    use super::*;

    fn january() -> PayPeriod {
        PayPeriod::new(
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_guard_releases_on_drop() {
        let locks = PeriodLocks::new();
        {
            let _guard = locks.acquire(PeriodKey::new(1, &january()));
            assert_eq!(locks.in_flight(), 1);
        }
        assert_eq!(locks.in_flight(), 0);
    }

    #[test]
    fn test_distinct_keys_do_not_block() {
        let locks = PeriodLocks::new();
        let _a = locks.acquire(PeriodKey::new(1, &january()));
        let _b = locks.acquire(PeriodKey::new(2, &january()));
        assert_eq!(locks.in_flight(), 2);
    }

    #[test]
    fn test_same_key_waits_for_release() {
        let locks = Arc::new(PeriodLocks::new());
        let released = Arc::new(AtomicBool::new(false));

        let guard = locks.acquire(PeriodKey::new(1, &january()));

        let waiter = {
            let locks = Arc::clone(&locks);
            let released = Arc::clone(&released);
            thread::spawn(move || {
                let _guard = locks.acquire(PeriodKey::new(1, &january()));
                released.load(Ordering::SeqCst)
            })
        };

        thread::sleep(Duration::from_millis(50));
        released.store(true, Ordering::SeqCst);
        drop(guard);

        assert!(waiter.join().unwrap(), "second run acquired before release");
    }
}
