//! Acting identities and roles.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The identifier of the user performing an operation.
///
/// `ActorId::SYSTEM` (0) stands for the system or an unauthenticated caller.
/// It is recorded in audit stamps like any other id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(pub u64);

impl ActorId {
    /// The system / unauthenticated actor.
    pub const SYSTEM: ActorId = ActorId(0);

    /// Returns true for the system actor.
    pub fn is_system(self) -> bool {
        self == Self::SYSTEM
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// May read and write every employee's records.
    Admin,
    /// May only read and write their own records.
    Employee,
}

impl Role {
    /// Parses a role name as carried in headers and tokens.
    ///
    /// Unknown names yield `None` rather than an error; an unresolvable role
    /// is denied by the access guard.
    ///
    /// ```
    /// use payroll_engine::models::Role;
    ///
    /// assert_eq!(Role::from_name("admin"), Some(Role::Admin));
    /// assert_eq!(Role::from_name("manager"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Role> {
        match name {
            "admin" => Some(Role::Admin),
            "employee" => Some(Role::Employee),
            _ => None,
        }
    }

    /// The canonical lowercase name of the role.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Employee => "employee",
        }
    }
}

/// An authenticated caller: who is acting and with which role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    /// The acting user.
    pub id: ActorId,
    /// The caller's role, `None` when it could not be resolved.
    pub role: Option<Role>,
}

impl Actor {
    /// Creates an actor from an id and role.
    pub fn new(id: impl Into<ActorId>, role: Option<Role>) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }

    /// Convenience constructor for an administrator.
    pub fn admin(id: u64) -> Self {
        Self::new(ActorId(id), Some(Role::Admin))
    }

    /// Convenience constructor for an employee acting on their own behalf.
    pub fn employee(id: u64) -> Self {
        Self::new(ActorId(id), Some(Role::Employee))
    }

    /// Returns true if the actor holds the admin role.
    pub fn is_admin(&self) -> bool {
        self.role == Some(Role::Admin)
    }
}

impl From<u64> for ActorId {
    fn from(id: u64) -> Self {
        ActorId(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(
            serde_json::to_string(&Role::Employee).unwrap(),
            "\"employee\""
        );
    }

    #[test]
    fn test_role_from_name_is_exact() {
        assert_eq!(Role::from_name("employee"), Some(Role::Employee));
        assert_eq!(Role::from_name("Admin"), None);
        assert_eq!(Role::from_name(""), None);
    }

    #[test]
    fn test_role_name_round_trips() {
        for role in [Role::Admin, Role::Employee] {
            assert_eq!(Role::from_name(role.as_str()), Some(role));
        }
    }

    #[test]
    fn test_actor_id_serializes_as_number() {
        assert_eq!(serde_json::to_string(&ActorId(7)).unwrap(), "7");
        assert!(ActorId::SYSTEM.is_system());
        assert!(!ActorId(7).is_system());
    }

    #[test]
    fn test_actor_is_admin() {
        assert!(Actor::admin(1).is_admin());
        assert!(!Actor::employee(1).is_admin());
        assert!(!Actor::new(ActorId(1), None).is_admin());
    }
}
