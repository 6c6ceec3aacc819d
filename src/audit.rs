//! Audited writes.
//!
//! Every create, update and soft delete that goes through [`AuditedStore`]
//! is attributed to the acting user before it reaches the record store.
//! Entities opt in by exposing their [`AuditStamp`] via [`Auditable`]; for
//! types that do not, stamping is a no-op and the write proceeds unchanged.

use serde_json::Value;
use tracing::debug;

use crate::models::{ActorId, AuditStamp};
use crate::store::{Entity, EntityStore, FieldMap, StoreResult};

/// Capability of carrying `created_by` / `updated_by` / `deleted_by` stamps.
///
/// Only the two accessors need implementing; the setters degrade to no-ops
/// when the accessors return `None`.
pub trait Auditable {
    /// The entity's audit stamp, if it has one.
    fn audit_stamp(&self) -> Option<&AuditStamp> {
        None
    }

    /// Mutable access to the entity's audit stamp, if it has one.
    fn audit_stamp_mut(&mut self) -> Option<&mut AuditStamp> {
        None
    }

    /// Records who created the entity.
    fn set_created_by(&mut self, actor: ActorId) {
        if let Some(stamp) = self.audit_stamp_mut() {
            stamp.created_by = Some(actor);
        }
    }

    /// Records who last updated the entity.
    fn set_updated_by(&mut self, actor: ActorId) {
        if let Some(stamp) = self.audit_stamp_mut() {
            stamp.updated_by = Some(actor);
        }
    }

    /// Records who deleted the entity.
    fn set_deleted_by(&mut self, actor: ActorId) {
        if let Some(stamp) = self.audit_stamp_mut() {
            stamp.deleted_by = Some(actor);
        }
    }

    /// Returns true once the entity has been soft-deleted.
    fn is_deleted(&self) -> bool {
        self.audit_stamp().is_some_and(AuditStamp::is_deleted)
    }
}

/// A record store wrapper that stamps every write with the acting user.
///
/// The wrapper holds no state besides the actor; build one per request.
///
/// # Example
///
/// ```
/// use payroll_engine::audit::AuditedStore;
/// use payroll_engine::models::{ActorId, Employee, Role};
/// use payroll_engine::store::MemoryStore;
///
/// let store = MemoryStore::new();
/// let audited = AuditedStore::new(&store, ActorId(7));
///
/// let employee = audited.create(Employee::new("Dewi Lestari", Role::Employee)).unwrap();
/// assert_eq!(employee.stamp.created_by, Some(ActorId(7)));
/// ```
pub struct AuditedStore<'a, S: ?Sized> {
    store: &'a S,
    actor: ActorId,
}

impl<'a, S: ?Sized> AuditedStore<'a, S> {
    /// Wraps `store`, attributing writes to `actor`.
    ///
    /// [`ActorId::SYSTEM`] is accepted and recorded like any other id.
    pub fn new(store: &'a S, actor: ActorId) -> Self {
        Self { store, actor }
    }

    /// The actor writes are attributed to.
    pub fn actor(&self) -> ActorId {
        self.actor
    }

    /// Stamps `created_by` and inserts the entity.
    pub fn create<E>(&self, mut entity: E) -> StoreResult<E>
    where
        E: Entity,
        S: EntityStore<E>,
    {
        entity.set_created_by(self.actor);
        let created = self.store.insert(entity)?;
        debug!(kind = E::KIND, id = created.id(), actor = %self.actor, "Audited create");
        Ok(created)
    }

    /// Stamps `updated_by` and replaces the stored entity.
    pub fn save<E>(&self, mut entity: E) -> StoreResult<E>
    where
        E: Entity,
        S: EntityStore<E>,
    {
        entity.set_updated_by(self.actor);
        let saved = self.store.save(entity)?;
        debug!(kind = E::KIND, id = saved.id(), actor = %self.actor, "Audited save");
        Ok(saved)
    }

    /// Applies a partial update, adding `updated_by` to the changed fields.
    ///
    /// The field is only injected for entities that carry an audit stamp.
    pub fn update<E>(&self, entity: &E, mut values: FieldMap) -> StoreResult<()>
    where
        E: Entity,
        S: EntityStore<E>,
    {
        if entity.audit_stamp().is_some() {
            values.insert("updated_by".to_string(), Value::from(self.actor.0));
        }
        self.store.update_fields(entity.id(), values)?;
        debug!(kind = E::KIND, id = entity.id(), actor = %self.actor, "Audited update");
        Ok(())
    }

    /// Records `deleted_by` on the stored row, then soft-deletes it.
    ///
    /// The two writes are not atomic: if the delete fails, the row keeps its
    /// `deleted_by` stamp but stays live.
    pub fn delete<E>(&self, entity: &E) -> StoreResult<()>
    where
        E: Entity,
        S: EntityStore<E>,
    {
        if entity.audit_stamp().is_some() {
            let mut values = FieldMap::new();
            values.insert("deleted_by".to_string(), Value::from(self.actor.0));
            self.store.update_fields(entity.id(), values)?;
        }
        self.store.soft_delete(entity.id())?;
        debug!(kind = E::KIND, id = entity.id(), actor = %self.actor, "Audited delete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::models::{Employee, Role};
    use crate::store::{MemoryStore, RecordStore, StoreError};

    /// A row type without audit fields.
    #[derive(Debug, Clone, PartialEq)]
    struct Holiday {
        id: u64,
        name: String,
    }

    impl Auditable for Holiday {}

    impl Entity for Holiday {
        const KIND: &'static str = "holiday";

        fn id(&self) -> u64 {
            self.id
        }

        fn set_id(&mut self, id: u64) {
            self.id = id;
        }
    }

    #[derive(Default)]
    struct HolidayStore {
        rows: Mutex<Vec<Holiday>>,
        updates: Mutex<Vec<(u64, FieldMap)>>,
        deleted: Mutex<Vec<u64>>,
    }

    impl EntityStore<Holiday> for HolidayStore {
        fn insert(&self, mut entity: Holiday) -> StoreResult<Holiday> {
            let mut rows = self.rows.lock().unwrap();
            entity.set_id(rows.len() as u64 + 1);
            rows.push(entity.clone());
            Ok(entity)
        }

        fn save(&self, entity: Holiday) -> StoreResult<Holiday> {
            let mut rows = self.rows.lock().unwrap();
            match rows.iter_mut().find(|row| row.id == entity.id) {
                Some(row) => {
                    *row = entity.clone();
                    Ok(entity)
                }
                None => Err(StoreError::NotFound {
                    kind: Holiday::KIND,
                    id: entity.id,
                }),
            }
        }

        fn update_fields(&self, id: u64, values: FieldMap) -> StoreResult<()> {
            self.updates.lock().unwrap().push((id, values));
            Ok(())
        }

        fn soft_delete(&self, id: u64) -> StoreResult<()> {
            self.deleted.lock().unwrap().push(id);
            Ok(())
        }
    }

    #[test]
    fn test_create_stamps_created_by() {
        let store = MemoryStore::new();
        let audited = AuditedStore::new(&store, ActorId(7));

        let created = audited
            .create(Employee::new("Ayu Pratiwi", Role::Employee))
            .unwrap();

        let persisted = store.employee_by_id(created.id).unwrap();
        assert_eq!(persisted.stamp.created_by, Some(ActorId(7)));
        assert_eq!(persisted.stamp.updated_by, None);
    }

    #[test]
    fn test_save_stamps_updated_by() {
        let store = MemoryStore::new();
        let created = AuditedStore::new(&store, ActorId(7))
            .create(Employee::new("Ayu Pratiwi", Role::Employee))
            .unwrap();

        let mut renamed = created.clone();
        renamed.name = "Ayu P.".to_string();
        AuditedStore::new(&store, ActorId(9)).save(renamed).unwrap();

        let persisted = store.employee_by_id(created.id).unwrap();
        assert_eq!(persisted.name, "Ayu P.");
        assert_eq!(persisted.stamp.updated_by, Some(ActorId(9)));
        assert_eq!(persisted.stamp.created_by, Some(ActorId(7)));
    }

    #[test]
    fn test_update_injects_updated_by_into_fields() {
        let store = MemoryStore::new();
        let created = AuditedStore::new(&store, ActorId(1))
            .create(Employee::new("Rizky", Role::Employee))
            .unwrap();

        let mut values = FieldMap::new();
        values.insert("active".to_string(), Value::Bool(false));
        AuditedStore::new(&store, ActorId(4))
            .update(&created, values)
            .unwrap();

        // Inactive employees are still readable by id.
        let persisted = store.employee_by_id(created.id).unwrap();
        assert!(!persisted.active);
        assert_eq!(persisted.stamp.updated_by, Some(ActorId(4)));
    }

    #[test]
    fn test_delete_records_deleted_by_before_soft_delete() {
        let store = MemoryStore::new();
        let created = AuditedStore::new(&store, ActorId(1))
            .create(Employee::new("Rizky", Role::Employee))
            .unwrap();

        AuditedStore::new(&store, ActorId(3))
            .delete(&created)
            .unwrap();

        assert!(matches!(
            store.employee_by_id(created.id),
            Err(StoreError::NotFound { .. })
        ));
        let row = store.employee_including_deleted(created.id).unwrap();
        assert_eq!(row.stamp.deleted_by, Some(ActorId(3)));
        assert!(row.stamp.deleted_at.is_some());
    }

    #[test]
    fn test_system_actor_is_recorded_not_rejected() {
        let store = MemoryStore::new();
        let created = AuditedStore::new(&store, ActorId::SYSTEM)
            .create(Employee::new("Seed Admin", Role::Admin))
            .unwrap();
        assert_eq!(created.stamp.created_by, Some(ActorId::SYSTEM));
    }

    #[test]
    fn test_entity_without_audit_fields_is_written_unchanged() {
        let store = HolidayStore::default();
        let audited = AuditedStore::new(&store, ActorId(7));

        let created = audited
            .create(Holiday {
                id: 0,
                name: "Founders Day".to_string(),
            })
            .unwrap();
        assert_eq!(created.id, 1);

        let mut renamed = created.clone();
        renamed.name = "Founders' Day".to_string();
        let saved = audited.save(renamed).unwrap();
        assert_eq!(saved.name, "Founders' Day");

        let mut values = FieldMap::new();
        values.insert("name".to_string(), Value::from("Company Day"));
        audited.update(&saved, values).unwrap();
        audited.delete(&saved).unwrap();

        let updates = store.updates.lock().unwrap();
        assert_eq!(updates.len(), 1, "no deleted_by pre-update for unaudited rows");
        assert!(!updates[0].1.contains_key("updated_by"));
        assert_eq!(*store.deleted.lock().unwrap(), vec![1]);
    }

    #[test]
    fn test_store_errors_propagate_unchanged() {
        let store = MemoryStore::new();
        let mut ghost = Employee::new("Ghost", Role::Employee);
        ghost.id = 99;

        let result = AuditedStore::new(&store, ActorId(1)).save(ghost);
        assert_eq!(
            result,
            Err(StoreError::NotFound {
                kind: "employee",
                id: 99
            })
        );
    }
}
