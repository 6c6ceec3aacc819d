//! Audit stamp carried by every mutable entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ActorId;

/// Attribution and lifecycle timestamps of a persisted row.
///
/// The `*_by` fields are written by [`AuditedStore`](crate::audit::AuditedStore)
/// and the timestamps by the record store. Callers never set them directly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStamp {
    /// Who created the row.
    #[serde(default)]
    pub created_by: Option<ActorId>,
    /// Who last updated the row.
    #[serde(default)]
    pub updated_by: Option<ActorId>,
    /// Who soft-deleted the row.
    #[serde(default)]
    pub deleted_by: Option<ActorId>,
    /// When the row was first persisted.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// When the row was last written.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Soft-delete marker.
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl AuditStamp {
    /// Returns true once the row has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}
