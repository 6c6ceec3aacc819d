//! Employee model.

use serde::{Deserialize, Serialize};

use super::{AuditStamp, Role};
use crate::audit::Auditable;
use crate::store::Entity;

/// Represents a person on the payroll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    #[serde(default)]
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Role of the employee's account.
    pub role: Role,
    /// Inactive employees are skipped by batch payroll runs.
    pub active: bool,
    /// Opaque login credential (hashing and verification happen elsewhere).
    #[serde(default)]
    pub credential_hash: String,
    /// Audit attribution.
    #[serde(flatten)]
    pub stamp: AuditStamp,
}

impl Employee {
    /// Creates an active employee that has not been persisted yet.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::{Employee, Role};
    ///
    /// let employee = Employee::new("Siti Rahma", Role::Employee);
    /// assert!(employee.active);
    /// assert_eq!(employee.id, 0);
    /// ```
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            id: 0,
            name: name.into(),
            role,
            active: true,
            credential_hash: String::new(),
            stamp: AuditStamp::default(),
        }
    }
}

impl Auditable for Employee {
    fn audit_stamp(&self) -> Option<&AuditStamp> {
        Some(&self.stamp)
    }

    fn audit_stamp_mut(&mut self) -> Option<&mut AuditStamp> {
        Some(&mut self.stamp)
    }
}

impl Entity for Employee {
    const KIND: &'static str = "employee";

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ActorId;

    #[test]
    fn test_deserialize_employee_with_flattened_stamp() {
        let json = r#"{
            "id": 3,
            "name": "Budi Santoso",
            "role": "employee",
            "active": true,
            "created_by": 1
        }"#;

        let employee: Employee = serde_json::from_str(json).unwrap();
        assert_eq!(employee.id, 3);
        assert_eq!(employee.role, Role::Employee);
        assert_eq!(employee.stamp.created_by, Some(ActorId(1)));
        assert_eq!(employee.stamp.updated_by, None);
        assert!(employee.credential_hash.is_empty());
    }

    #[test]
    fn test_serialize_employee_keeps_audit_fields_top_level() {
        let mut employee = Employee::new("Budi Santoso", Role::Admin);
        employee.stamp.updated_by = Some(ActorId(9));

        let value = serde_json::to_value(&employee).unwrap();
        assert_eq!(value["role"], "admin");
        assert_eq!(value["updated_by"], 9);
        assert!(value.get("stamp").is_none());
    }
}
