//! Role-scoped access to employee records.
//!
//! Administrators may access everyone's payroll data, employees only their
//! own. Anything else, including an unresolved role or an unauthenticated
//! actor, is denied.

use tracing::warn;

use crate::error::{EngineError, EngineResult};
use crate::models::{Actor, ActorId, Role};

/// Decides whether an actor may read or write a target employee's records.
///
/// # Examples
///
/// ```
/// use payroll_engine::access::can_access;
/// use payroll_engine::models::{ActorId, Role};
///
/// assert!(can_access(Some(Role::Admin), ActorId(1), 42));
/// assert!(can_access(Some(Role::Employee), ActorId(5), 5));
/// assert!(!can_access(Some(Role::Employee), ActorId(5), 6));
/// assert!(!can_access(None, ActorId(0), 5));
/// ```
pub fn can_access(role: Option<Role>, actor_id: ActorId, target_employee_id: u64) -> bool {
    match role {
        Some(Role::Admin) => true,
        Some(Role::Employee) => !actor_id.is_system() && actor_id.0 == target_employee_id,
        None => false,
    }
}

/// Like [`can_access`], but returns [`EngineError::Forbidden`] on denial so
/// callers can tell it apart from missing data.
pub fn ensure_access(actor: &Actor, target_employee_id: u64) -> EngineResult<()> {
    if can_access(actor.role, actor.id, target_employee_id) {
        return Ok(());
    }
    warn!(
        actor_id = %actor.id,
        role = actor.role.map(Role::as_str).unwrap_or("unknown"),
        employee_id = target_employee_id,
        "Access denied"
    );
    Err(EngineError::Forbidden {
        actor_id: actor.id.0,
        employee_id: target_employee_id,
    })
}

/// Requires the admin role, for operations that span all employees.
pub fn ensure_admin(actor: &Actor) -> EngineResult<()> {
    if actor.is_admin() {
        return Ok(());
    }
    warn!(actor_id = %actor.id, "Admin access denied");
    Err(EngineError::AdminRequired {
        actor_id: actor.id.0,
    })
}
