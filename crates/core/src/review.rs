use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::edit_request::{EditRequest, EditRequestStatus};
use crate::domain::session::UserId;

/// Reviewer decision on a pending edit request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReviewEvent {
    Approve,
    Reject { reason: Option<String> },
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ReviewError {
    #[error("request was already reviewed (status: {})", status.as_str())]
    AlreadyReviewed { status: EditRequestStatus },
}

/// The whole state machine: `pending` is the sole initial state, and both
/// terminal states refuse further events.
pub fn transition(
    current: &EditRequestStatus,
    event: &ReviewEvent,
) -> Result<EditRequestStatus, ReviewError> {
    match (current, event) {
        (EditRequestStatus::Pending, ReviewEvent::Approve) => Ok(EditRequestStatus::Approved),
        (EditRequestStatus::Pending, ReviewEvent::Reject { .. }) => Ok(EditRequestStatus::Rejected),
        (status, _) => Err(ReviewError::AlreadyReviewed { status: *status }),
    }
}

impl EditRequest {
    /// Consumes a reviewer decision, stamping the terminal fields.
    /// `approved_by` and `approved_at` are set together on approval and
    /// rejection alike; `rejection_reason` only on rejection.
    pub fn review(
        mut self,
        event: ReviewEvent,
        reviewer: &UserId,
        now: DateTime<Utc>,
    ) -> Result<EditRequest, ReviewError> {
        self.status = transition(&self.status, &event)?;
        self.approved_by = Some(reviewer.clone());
        self.approved_at = Some(now);
        if let ReviewEvent::Reject { reason } = event {
            self.rejection_reason = reason;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use crate::domain::edit_request::{EditRequest, EditRequestStatus};
    use crate::domain::entity::{EntityId, EntityType, OrgId};
    use crate::domain::patch::EntityPatch;
    use crate::domain::session::UserId;
    use crate::domain::truck::{TruckPatch, TruckStatus};

    use super::{transition, ReviewError, ReviewEvent};

    fn pending_request() -> EditRequest {
        EditRequest::new(
            EntityType::Truck,
            EntityId("T1".to_string()),
            OrgId("org-1".to_string()),
            "bring unit back into service",
            EntityPatch::Truck(TruckPatch {
                status: Some(TruckStatus::Maintenance),
                ..TruckPatch::default()
            }),
            EntityPatch::Truck(TruckPatch {
                status: Some(TruckStatus::InService),
                ..TruckPatch::default()
            }),
            UserId("u-dispatcher".to_string()),
            Utc::now(),
        )
    }

    #[test]
    fn pending_can_be_approved() {
        let reviewed = pending_request()
            .review(ReviewEvent::Approve, &UserId("u-admin".to_string()), Utc::now())
            .expect("pending -> approved");

        assert_eq!(reviewed.status, EditRequestStatus::Approved);
        assert_eq!(reviewed.approved_by, Some(UserId("u-admin".to_string())));
        assert!(reviewed.approved_at.is_some());
        assert!(reviewed.rejection_reason.is_none());
    }

    #[test]
    fn pending_can_be_rejected_with_reason() {
        let reviewed = pending_request()
            .review(
                ReviewEvent::Reject { reason: Some("insufficient justification".to_string()) },
                &UserId("u-supervisor".to_string()),
                Utc::now(),
            )
            .expect("pending -> rejected");

        assert_eq!(reviewed.status, EditRequestStatus::Rejected);
        assert_eq!(reviewed.approved_by, Some(UserId("u-supervisor".to_string())));
        assert!(reviewed.approved_at.is_some());
        assert_eq!(reviewed.rejection_reason.as_deref(), Some("insufficient justification"));
    }

    #[test]
    fn rejection_reason_may_be_absent() {
        let reviewed = pending_request()
            .review(
                ReviewEvent::Reject { reason: None },
                &UserId("u-admin".to_string()),
                Utc::now(),
            )
            .expect("pending -> rejected");

        assert_eq!(reviewed.status, EditRequestStatus::Rejected);
        assert!(reviewed.rejection_reason.is_none());
    }

    #[test]
    fn terminal_states_refuse_further_review() {
        let approved = pending_request()
            .review(ReviewEvent::Approve, &UserId("u-admin".to_string()), Utc::now())
            .expect("pending -> approved");

        let error = approved
            .clone()
            .review(ReviewEvent::Approve, &UserId("u-other".to_string()), Utc::now())
            .expect_err("approved is terminal");
        assert_eq!(error, ReviewError::AlreadyReviewed { status: EditRequestStatus::Approved });

        let error = approved
            .review(
                ReviewEvent::Reject { reason: None },
                &UserId("u-other".to_string()),
                Utc::now(),
            )
            .expect_err("approved cannot flip to rejected");
        assert_eq!(error, ReviewError::AlreadyReviewed { status: EditRequestStatus::Approved });
    }

    #[test]
    fn transition_table_is_exhaustive_over_terminal_states() {
        for status in [EditRequestStatus::Approved, EditRequestStatus::Rejected] {
            assert!(transition(&status, &ReviewEvent::Approve).is_err());
            assert!(transition(&status, &ReviewEvent::Reject { reason: None }).is_err());
        }
    }
}
