use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entity::{EntityId, EntityType, OrgId};
use crate::domain::patch::EntityPatch;
use crate::domain::session::UserId;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EditRequestId(pub String);

impl EditRequestId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditRequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl EditRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditRequestStatus::Pending => "pending",
            EditRequestStatus::Approved => "approved",
            EditRequestStatus::Rejected => "rejected",
        }
    }

    /// Approved and rejected requests accept no further review.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, EditRequestStatus::Pending)
    }
}

/// A proposed change to one business record, waiting for a reviewer.
///
/// `original` and `proposed` are typed snapshots of the record before and
/// after the change; `proposed` is what gets applied on approval.
/// `approved_by` / `approved_at` are set together on any terminal
/// transition, including rejection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditRequest {
    pub id: EditRequestId,
    pub entity_type: EntityType,
    pub entity_id: EntityId,
    pub org_id: OrgId,
    pub reason: String,
    pub original: EntityPatch,
    pub proposed: EntityPatch,
    pub status: EditRequestStatus,
    pub requested_by: UserId,
    pub approved_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
}

impl EditRequest {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        entity_type: EntityType,
        entity_id: EntityId,
        org_id: OrgId,
        reason: impl Into<String>,
        original: EntityPatch,
        proposed: EntityPatch,
        requested_by: UserId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: EditRequestId::generate(),
            entity_type,
            entity_id,
            org_id,
            reason: reason.into(),
            original,
            proposed,
            status: EditRequestStatus::Pending,
            requested_by,
            approved_by: None,
            created_at,
            approved_at: None,
            rejection_reason: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == EditRequestStatus::Pending
    }
}
