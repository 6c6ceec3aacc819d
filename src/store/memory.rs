//! In-memory record store.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{Entity, EntityStore, FieldMap, RecordStore, StoreError, StoreResult};
use crate::models::{
    AttendanceRecord, Employee, OvertimeRequest, PayPeriod, Payslip, ReimbursementRequest,
};

/// Rows of one entity type, keyed by id.
struct Table<E> {
    rows: BTreeMap<u64, E>,
    next_id: u64,
}

impl<E> Default for Table<E> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<E: Entity + Serialize + DeserializeOwned> Table<E> {
    fn live(&self) -> impl Iterator<Item = &E> {
        self.rows.values().filter(|row| !row.is_deleted())
    }

    fn get(&self, id: u64) -> StoreResult<&E> {
        self.rows
            .get(&id)
            .filter(|row| !row.is_deleted())
            .ok_or(StoreError::NotFound { kind: E::KIND, id })
    }

    fn get_mut(&mut self, id: u64) -> StoreResult<&mut E> {
        self.rows
            .get_mut(&id)
            .filter(|row| !row.is_deleted())
            .ok_or(StoreError::NotFound { kind: E::KIND, id })
    }

    fn insert(&mut self, mut entity: E, now: DateTime<Utc>) -> E {
        let id = self.next_id;
        self.next_id += 1;
        entity.set_id(id);
        if let Some(stamp) = entity.audit_stamp_mut() {
            stamp.created_at = Some(now);
            stamp.updated_at = Some(now);
        }
        self.rows.insert(id, entity.clone());
        entity
    }

    fn save(&mut self, mut entity: E, now: DateTime<Utc>) -> StoreResult<E> {
        let existing = self.get_mut(entity.id())?;
        // Creation attribution belongs to the stored row, not the caller's copy.
        if let (Some(old), Some(new)) = (existing.audit_stamp(), entity.audit_stamp_mut()) {
            new.created_by = old.created_by;
            new.created_at = old.created_at;
            new.updated_at = Some(now);
        }
        *existing = entity.clone();
        Ok(entity)
    }

    fn update_fields(&mut self, id: u64, mut values: FieldMap, now: DateTime<Utc>) -> StoreResult<()> {
        let existing = self.get_mut(id)?;
        let mut merged = match serde_json::to_value(&*existing) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                return Err(StoreError::Backend(format!(
                    "{} rows do not serialize to objects",
                    E::KIND
                )));
            }
            Err(err) => return Err(StoreError::Backend(err.to_string())),
        };
        values.remove("id");
        merged.extend(values);

        let mut updated: E = serde_json::from_value(Value::Object(merged))
            .map_err(|err| StoreError::Backend(format!("invalid {} update: {}", E::KIND, err)))?;
        updated.set_id(id);
        if let Some(stamp) = updated.audit_stamp_mut() {
            stamp.updated_at = Some(now);
        }
        *existing = updated;
        Ok(())
    }

    fn soft_delete(&mut self, id: u64, now: DateTime<Utc>) -> StoreResult<()> {
        let existing = self.get_mut(id)?;
        if let Some(stamp) = existing.audit_stamp_mut() {
            stamp.deleted_at = Some(now);
            return Ok(());
        }
        // Rows without a stamp have nowhere to keep the marker.
        self.rows.remove(&id);
        Ok(())
    }
}

#[derive(Default)]
struct Tables {
    employees: Table<Employee>,
    attendance: Table<AttendanceRecord>,
    overtime: Table<OvertimeRequest>,
    reimbursements: Table<ReimbursementRequest>,
    payslips: Table<Payslip>,
}

/// A thread-safe, in-process record store.
///
/// Besides the plain CRUD it enforces the two uniqueness rules of the data
/// model: one attendance record per employee and date, and one payslip per
/// employee and period.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }

    #[cfg(test)]
    pub(crate) fn employee_including_deleted(&self, id: u64) -> Option<Employee> {
        self.read().employees.rows.get(&id).cloned()
    }
}

/// Implements [`EntityStore`] for one table, rejecting inserts for which
/// `$conflict(existing, new)` returns a reason.
macro_rules! entity_table {
    ($entity:ty, $table:ident, $conflict:expr) => {
        impl EntityStore<$entity> for MemoryStore {
            fn insert(&self, entity: $entity) -> StoreResult<$entity> {
                let conflict: fn(&$entity, &$entity) -> Option<String> = $conflict;
                let mut tables = self.write();
                if let Some(reason) = tables
                    .$table
                    .live()
                    .find_map(|existing| conflict(existing, &entity))
                {
                    return Err(StoreError::Conflict(reason));
                }
                Ok(tables.$table.insert(entity, Utc::now()))
            }

            fn save(&self, entity: $entity) -> StoreResult<$entity> {
                self.write().$table.save(entity, Utc::now())
            }

            fn update_fields(&self, id: u64, values: FieldMap) -> StoreResult<()> {
                self.write().$table.update_fields(id, values, Utc::now())
            }

            fn soft_delete(&self, id: u64) -> StoreResult<()> {
                self.write().$table.soft_delete(id, Utc::now())
            }
        }
    };
}

entity_table!(Employee, employees, |_, _| None);
entity_table!(OvertimeRequest, overtime, |_, _| None);
entity_table!(ReimbursementRequest, reimbursements, |_, _| None);
entity_table!(AttendanceRecord, attendance, |existing, new| {
    (existing.employee_id == new.employee_id && existing.date == new.date).then(|| {
        format!(
            "employee {} already has attendance on {}",
            new.employee_id, new.date
        )
    })
});
entity_table!(Payslip, payslips, |existing, new| {
    existing.covers(new.employee_id, &new.period()).then(|| {
        format!(
            "payslip {} already covers employee {} for {} to {}",
            existing.id, new.employee_id, new.period_start, new.period_end
        )
    })
});

impl RecordStore for MemoryStore {
    fn employee_by_id(&self, id: u64) -> StoreResult<Employee> {
        self.read().employees.get(id).cloned()
    }

    fn active_employees(&self) -> StoreResult<Vec<Employee>> {
        Ok(self
            .read()
            .employees
            .live()
            .filter(|employee| employee.active)
            .cloned()
            .collect())
    }

    fn attendance_in_range(
        &self,
        employee_id: u64,
        period: &PayPeriod,
    ) -> StoreResult<Vec<AttendanceRecord>> {
        Ok(self
            .read()
            .attendance
            .live()
            .filter(|record| record.employee_id == employee_id && period.contains_date(record.date))
            .cloned()
            .collect())
    }

    fn attendance_on(
        &self,
        employee_id: u64,
        date: NaiveDate,
    ) -> StoreResult<Option<AttendanceRecord>> {
        Ok(self
            .read()
            .attendance
            .live()
            .find(|record| record.employee_id == employee_id && record.date == date)
            .cloned())
    }

    fn approved_overtime_in_range(
        &self,
        employee_id: u64,
        period: &PayPeriod,
    ) -> StoreResult<Vec<OvertimeRequest>> {
        Ok(self
            .read()
            .overtime
            .live()
            .filter(|request| {
                request.employee_id == employee_id
                    && request.is_payable()
                    && period.contains_date(request.date)
            })
            .cloned()
            .collect())
    }

    fn approved_reimbursements_in_range(
        &self,
        employee_id: u64,
        period: &PayPeriod,
    ) -> StoreResult<Vec<ReimbursementRequest>> {
        Ok(self
            .read()
            .reimbursements
            .live()
            .filter(|request| {
                request.employee_id == employee_id
                    && request.is_payable()
                    && period.contains_date(request.date)
            })
            .cloned()
            .collect())
    }

    fn displayable_reimbursements_in_range(
        &self,
        employee_id: u64,
        period: &PayPeriod,
    ) -> StoreResult<Vec<ReimbursementRequest>> {
        Ok(self
            .read()
            .reimbursements
            .live()
            .filter(|request| {
                request.employee_id == employee_id
                    && request.is_displayable()
                    && period.contains_date(request.date)
            })
            .cloned()
            .collect())
    }

    fn payslip_exists(&self, employee_id: u64, period: &PayPeriod) -> StoreResult<bool> {
        Ok(self
            .read()
            .payslips
            .live()
            .any(|payslip| payslip.covers(employee_id, period)))
    }

    fn payslip_by_id(&self, id: u64) -> StoreResult<Payslip> {
        self.read().payslips.get(id).cloned()
    }

    fn payslips_by_employee(&self, employee_id: u64) -> StoreResult<Vec<Payslip>> {
        let mut payslips: Vec<Payslip> = self
            .read()
            .payslips
            .live()
            .filter(|payslip| payslip.employee_id == employee_id)
            .cloned()
            .collect();
        payslips.sort_by(|a, b| b.period_start.cmp(&a.period_start));
        Ok(payslips)
    }

    fn payslips_by_period(&self, period: &PayPeriod) -> StoreResult<Vec<Payslip>> {
        let mut payslips: Vec<Payslip> = self
            .read()
            .payslips
            .live()
            .filter(|payslip| {
                period.contains_date(payslip.period_start) && period.contains_date(payslip.period_end)
            })
            .cloned()
            .collect();
        payslips.sort_by_key(|payslip| (payslip.employee_id, payslip.period_start));
        Ok(payslips)
    }
}
