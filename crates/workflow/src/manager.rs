use chrono::Utc;
use tracing::info;

use fleetdesk_core::audit::{AuditCategory, AuditEvent, AuditOutcome, AuditSink};
use fleetdesk_core::domain::edit_request::{EditRequest, EditRequestId, EditRequestStatus};
use fleetdesk_core::domain::entity::{EntityId, EntityType};
use fleetdesk_core::domain::patch::EntityPatch;
use fleetdesk_core::domain::session::Session;
use fleetdesk_core::errors::WorkflowError;
use fleetdesk_core::review::{ReviewError, ReviewEvent};
use fleetdesk_db::repositories::{
    EditRequestRepository, EntityApplyError, RepositoryError, ReviewCommitError,
};
use fleetdesk_notify::{Dispatcher, NotificationKind, ReviewNotification};

/// Input of `create`: which record, why, and the before/after snapshots.
/// The caller is responsible for `entity_id` pointing at a live record;
/// staleness surfaces at approval time, not here.
#[derive(Clone, Debug)]
pub struct NewEditRequest {
    pub entity_type: EntityType,
    pub entity_id: EntityId,
    pub reason: String,
    pub original: EntityPatch,
    pub proposed: EntityPatch,
}

/// The review workflow: propose a change, route it to reviewers, apply it
/// on approval. Generic over its collaborators the same way the storage
/// side is; production wires the SQL repository, tests wire the in-memory
/// doubles.
pub struct EditRequestManager<R, A> {
    requests: R,
    dispatcher: Dispatcher,
    audit: A,
}

fn persistence(error: RepositoryError) -> WorkflowError {
    WorkflowError::Persistence(error.to_string())
}

fn commit_failure(error: ReviewCommitError) -> WorkflowError {
    match error {
        ReviewCommitError::Apply(EntityApplyError::UnknownEntityType(tag)) => {
            WorkflowError::UnknownEntityType(tag)
        }
        ReviewCommitError::Apply(EntityApplyError::EntityMissing { entity_type, entity_id }) => {
            WorkflowError::EntityMissing { entity_type, entity_id }
        }
        ReviewCommitError::Apply(
            error @ (EntityApplyError::PatchMismatch { .. } | EntityApplyError::EmptyPatch),
        ) => WorkflowError::InvalidPatch(error.to_string()),
        ReviewCommitError::Apply(EntityApplyError::Database(error)) => {
            WorkflowError::Persistence(error.to_string())
        }
        ReviewCommitError::Repository(error) => WorkflowError::Persistence(error.to_string()),
    }
}

impl<R, A> EditRequestManager<R, A>
where
    R: EditRequestRepository,
    A: AuditSink,
{
    pub fn new(requests: R, dispatcher: Dispatcher, audit: A) -> Self {
        Self { requests, dispatcher, audit }
    }

    pub async fn create(
        &self,
        input: NewEditRequest,
        session: &Session,
    ) -> Result<EditRequest, WorkflowError> {
        if input.original.entity_type() != input.entity_type {
            return Err(WorkflowError::InvalidPatch(format!(
                "original snapshot is tagged `{}` but the request targets `{}`",
                input.original.entity_type(),
                input.entity_type
            )));
        }
        if input.proposed.entity_type() != input.entity_type {
            return Err(WorkflowError::InvalidPatch(format!(
                "proposed patch is tagged `{}` but the request targets `{}`",
                input.proposed.entity_type(),
                input.entity_type
            )));
        }
        if input.proposed.is_empty() {
            return Err(WorkflowError::InvalidPatch(
                "proposed patch has no fields to apply".to_string(),
            ));
        }

        let request = EditRequest::new(
            input.entity_type,
            input.entity_id,
            session.org_id.clone(),
            input.reason,
            input.original,
            input.proposed,
            session.user_id.clone(),
            Utc::now(),
        );

        self.requests.create(&request).await.map_err(persistence)?;

        info!(
            event_name = "review.request_created",
            request_id = %request.id.0,
            entity_type = %request.entity_type,
            entity_id = %request.entity_id.0,
            "edit request recorded"
        );
        self.audit.emit(self.event(
            &request,
            session,
            "review.request_created",
            AuditOutcome::Success,
        ));
        self.notify(&request, session, NotificationKind::RequestCreated);

        Ok(request)
    }

    pub async fn approve(
        &self,
        id: &EditRequestId,
        session: &Session,
        review_notes: Option<String>,
    ) -> Result<EditRequest, WorkflowError> {
        let request = self.reviewable(id, session).await?;

        let reviewed =
            request.review(ReviewEvent::Approve, &session.user_id, Utc::now())?;

        let committed = self
            .requests
            .commit_approval(&reviewed, &reviewed.proposed)
            .await
            .map_err(commit_failure)?;
        if !committed {
            return Err(self.lost_race(id).await.into());
        }

        info!(
            event_name = "review.request_approved",
            request_id = %reviewed.id.0,
            entity_type = %reviewed.entity_type,
            entity_id = %reviewed.entity_id.0,
            reviewer = %session.user_id.0,
            "edit request approved and applied"
        );
        let mut event =
            self.event(&reviewed, session, "review.request_approved", AuditOutcome::Success);
        if let Some(notes) = review_notes {
            event = event.with_metadata("review_notes", notes);
        }
        self.audit.emit(event);
        self.notify(&reviewed, session, NotificationKind::RequestApproved);

        Ok(reviewed)
    }

    pub async fn reject(
        &self,
        id: &EditRequestId,
        session: &Session,
        rejection_reason: Option<String>,
    ) -> Result<EditRequest, WorkflowError> {
        let request = self.reviewable(id, session).await?;

        let reviewed = request.review(
            ReviewEvent::Reject { reason: rejection_reason },
            &session.user_id,
            Utc::now(),
        )?;

        let committed =
            self.requests.commit_rejection(&reviewed).await.map_err(persistence)?;
        if !committed {
            return Err(self.lost_race(id).await.into());
        }

        info!(
            event_name = "review.request_rejected",
            request_id = %reviewed.id.0,
            entity_type = %reviewed.entity_type,
            entity_id = %reviewed.entity_id.0,
            reviewer = %session.user_id.0,
            "edit request rejected, target record untouched"
        );
        self.audit.emit(self.event(
            &reviewed,
            session,
            "review.request_rejected",
            AuditOutcome::Rejected,
        ));
        self.notify(&reviewed, session, NotificationKind::RequestRejected);

        Ok(reviewed)
    }

    pub async fn get(
        &self,
        id: &EditRequestId,
        session: &Session,
    ) -> Result<EditRequest, WorkflowError> {
        let request = self
            .requests
            .find_by_id(id)
            .await
            .map_err(persistence)?
            .ok_or_else(|| WorkflowError::RequestNotFound(id.0.clone()))?;

        // Requests of other organizations do not exist as far as this
        // caller is concerned.
        if request.org_id != session.org_id {
            return Err(WorkflowError::RequestNotFound(id.0.clone()));
        }
        Ok(request)
    }

    pub async fn list_pending(
        &self,
        session: &Session,
        limit: u32,
    ) -> Result<Vec<EditRequest>, WorkflowError> {
        self.requests.list_pending(&session.org_id, limit).await.map_err(persistence)
    }

    async fn reviewable(
        &self,
        id: &EditRequestId,
        session: &Session,
    ) -> Result<EditRequest, WorkflowError> {
        if !session.can_review() {
            return Err(WorkflowError::Forbidden);
        }

        let request = self.get(id, session).await?;
        if !request.is_pending() {
            return Err(ReviewError::AlreadyReviewed { status: request.status }.into());
        }
        Ok(request)
    }

    /// The conditional commit found the row already out of `pending`: some
    /// other reviewer won. Report the status they left behind.
    async fn lost_race(&self, id: &EditRequestId) -> ReviewError {
        let status = match self.requests.find_by_id(id).await {
            Ok(Some(current)) => current.status,
            _ => EditRequestStatus::Approved,
        };
        ReviewError::AlreadyReviewed { status }
    }

    fn event(
        &self,
        request: &EditRequest,
        session: &Session,
        event_type: &str,
        outcome: AuditOutcome,
    ) -> AuditEvent {
        AuditEvent::new(
            Some(request.id.clone()),
            Some(request.entity_id.clone()),
            Some(request.org_id.clone()),
            request.id.0.clone(),
            event_type,
            AuditCategory::Review,
            session.user_id.0.clone(),
            outcome,
        )
        .with_metadata("entity_type", request.entity_type.as_str())
        .with_metadata("status", request.status.as_str())
    }

    fn notify(&self, request: &EditRequest, session: &Session, kind: NotificationKind) {
        let verb = match kind {
            NotificationKind::RequestCreated => "requested",
            NotificationKind::RequestApproved => "approved",
            NotificationKind::RequestRejected => "rejected",
        };
        // Fire-and-forget; the handle is intentionally dropped.
        let _ = self.dispatcher.dispatch(ReviewNotification {
            kind,
            request_id: request.id.clone(),
            entity_type: request.entity_type,
            entity_id: request.entity_id.clone(),
            org_id: request.org_id.clone(),
            actor: session.user_id.clone(),
            summary: format!("{} `{}` edit {verb}", request.entity_type, request.entity_id.0),
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use fleetdesk_core::audit::InMemoryAuditSink;
    use fleetdesk_core::domain::edit_request::EditRequestStatus;
    use fleetdesk_core::domain::entity::{EntityId, EntityType};
    use fleetdesk_core::domain::patch::EntityPatch;
    use fleetdesk_core::domain::session::{Role, Session};
    use fleetdesk_core::domain::truck::{TruckPatch, TruckStatus};
    use fleetdesk_core::errors::WorkflowError;
    use fleetdesk_core::review::ReviewError;
    use fleetdesk_db::repositories::InMemoryEditRequestRepository;
    use fleetdesk_notify::{Dispatcher, InMemoryNotifier, NotificationKind};

    use super::{EditRequestManager, NewEditRequest};

    fn manager_with(
        repo: InMemoryEditRequestRepository,
        notifier: InMemoryNotifier,
    ) -> EditRequestManager<InMemoryEditRequestRepository, InMemoryAuditSink> {
        EditRequestManager::new(repo, Dispatcher::new(Arc::new(notifier)), InMemoryAuditSink::default())
    }

    fn dispatcher_session() -> Session {
        Session::new("u-dispatcher", "org-1", Role::Dispatcher)
    }

    fn admin_session() -> Session {
        Session::new("u-admin", "org-1", Role::Admin)
    }

    fn truck_edit(entity_id: &str) -> NewEditRequest {
        NewEditRequest {
            entity_type: EntityType::Truck,
            entity_id: EntityId(entity_id.to_string()),
            reason: "unit back from the workshop".to_string(),
            original: EntityPatch::Truck(TruckPatch {
                status: Some(TruckStatus::Maintenance),
                ..TruckPatch::default()
            }),
            proposed: EntityPatch::Truck(TruckPatch {
                status: Some(TruckStatus::InService),
                ..TruckPatch::default()
            }),
        }
    }

    /// Lets detached notification tasks run on the test runtime.
    async fn settle() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn create_persists_a_pending_request_and_notifies_reviewers() {
        let notifier = InMemoryNotifier::new();
        let manager = manager_with(InMemoryEditRequestRepository::new(), notifier.clone());

        let request = manager
            .create(truck_edit("T1"), &dispatcher_session())
            .await
            .expect("create succeeds");

        assert_eq!(request.status, EditRequestStatus::Pending);
        assert!(request.approved_by.is_none());
        assert!(request.approved_at.is_none());
        assert_eq!(request.requested_by.0, "u-dispatcher");

        settle().await;
        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].kind, NotificationKind::RequestCreated);
        assert_eq!(sent[0].org_id.0, "org-1");
    }

    #[tokio::test]
    async fn create_rejects_patch_tagged_for_another_entity_type() {
        let manager =
            manager_with(InMemoryEditRequestRepository::new(), InMemoryNotifier::new());

        let mut input = truck_edit("T1");
        input.entity_type = EntityType::Driver;

        let error = manager
            .create(input, &dispatcher_session())
            .await
            .expect_err("mismatched tag must be rejected");
        assert!(matches!(error, WorkflowError::InvalidPatch(_)));
    }

    #[tokio::test]
    async fn create_rejects_an_empty_proposed_patch() {
        let manager =
            manager_with(InMemoryEditRequestRepository::new(), InMemoryNotifier::new());

        let mut input = truck_edit("T1");
        input.proposed = EntityPatch::Truck(TruckPatch::default());

        let error = manager
            .create(input, &dispatcher_session())
            .await
            .expect_err("empty patch must be rejected");
        assert!(matches!(error, WorkflowError::InvalidPatch(_)));
    }

    #[tokio::test]
    async fn approving_a_truck_edit_applies_only_the_proposed_fields() {
        let repo = InMemoryEditRequestRepository::new();
        repo.insert_entity(
            EntityType::Truck,
            "T1",
            &[("status", "maintenance"), ("plate_number", "WP-4821")],
        )
        .await;
        let notifier = InMemoryNotifier::new();
        let manager = manager_with(repo, notifier.clone());

        let request =
            manager.create(truck_edit("T1"), &dispatcher_session()).await.expect("create");
        let approved = manager
            .approve(&request.id, &admin_session(), Some("checked the workshop report".to_string()))
            .await
            .expect("approve succeeds");

        assert_eq!(approved.status, EditRequestStatus::Approved);
        assert_eq!(approved.approved_by.as_ref().map(|user| user.0.as_str()), Some("u-admin"));
        assert!(approved.approved_at.is_some());

        assert_eq!(
            manager.requests.entity_column(EntityType::Truck, "T1", "status").await.as_deref(),
            Some("in_service")
        );
        assert_eq!(
            manager
                .requests
                .entity_column(EntityType::Truck, "T1", "plate_number")
                .await
                .as_deref(),
            Some("WP-4821"),
            "fields absent from the proposed patch must stay untouched"
        );

        settle().await;
        let kinds: Vec<_> = notifier.sent().iter().map(|n| n.kind).collect();
        assert_eq!(kinds, vec![NotificationKind::RequestCreated, NotificationKind::RequestApproved]);
    }

    #[tokio::test]
    async fn non_reviewers_cannot_approve() {
        let repo = InMemoryEditRequestRepository::new();
        repo.insert_entity(EntityType::Truck, "T1", &[("status", "maintenance")]).await;
        let manager = manager_with(repo, InMemoryNotifier::new());

        let request =
            manager.create(truck_edit("T1"), &dispatcher_session()).await.expect("create");
        let error = manager
            .approve(&request.id, &dispatcher_session(), None)
            .await
            .expect_err("dispatchers may not review");

        assert_eq!(error, WorkflowError::Forbidden);
        assert_eq!(
            manager.requests.entity_column(EntityType::Truck, "T1", "status").await.as_deref(),
            Some("maintenance")
        );
    }

    #[tokio::test]
    async fn approving_an_unknown_request_reports_not_found() {
        let manager =
            manager_with(InMemoryEditRequestRepository::new(), InMemoryNotifier::new());

        let error = manager
            .approve(
                &fleetdesk_core::domain::edit_request::EditRequestId("er-ghost".to_string()),
                &admin_session(),
                None,
            )
            .await
            .expect_err("unknown id");
        assert!(matches!(error, WorkflowError::RequestNotFound(id) if id == "er-ghost"));
    }

    #[tokio::test]
    async fn second_approval_fails_with_already_reviewed_and_applies_nothing_extra() {
        let repo = InMemoryEditRequestRepository::new();
        repo.insert_entity(EntityType::Truck, "T1", &[("status", "maintenance")]).await;
        let manager = manager_with(repo, InMemoryNotifier::new());

        let request =
            manager.create(truck_edit("T1"), &dispatcher_session()).await.expect("create");
        manager.approve(&request.id, &admin_session(), None).await.expect("first approval");

        let supervisor = Session::new("u-supervisor", "org-1", Role::Supervisor);
        let error = manager
            .approve(&request.id, &supervisor, None)
            .await
            .expect_err("second approval must fail");
        assert_eq!(
            error,
            WorkflowError::Review(ReviewError::AlreadyReviewed {
                status: EditRequestStatus::Approved
            })
        );

        let stored = manager.get(&request.id, &admin_session()).await.expect("get");
        assert_eq!(stored.approved_by.as_ref().map(|user| user.0.as_str()), Some("u-admin"));
    }

    #[tokio::test]
    async fn rejecting_keeps_the_entity_untouched_and_stores_the_reason() {
        let repo = InMemoryEditRequestRepository::new();
        repo.insert_entity(EntityType::Truck, "T1", &[("status", "maintenance")]).await;
        let notifier = InMemoryNotifier::new();
        let manager = manager_with(repo, notifier.clone());

        let request =
            manager.create(truck_edit("T1"), &dispatcher_session()).await.expect("create");
        let rejected = manager
            .reject(
                &request.id,
                &admin_session(),
                Some("insufficient justification".to_string()),
            )
            .await
            .expect("reject succeeds");

        assert_eq!(rejected.status, EditRequestStatus::Rejected);
        assert_eq!(rejected.rejection_reason.as_deref(), Some("insufficient justification"));
        assert!(rejected.approved_at.is_some());
        assert_eq!(
            manager.requests.entity_column(EntityType::Truck, "T1", "status").await.as_deref(),
            Some("maintenance"),
            "rejection must not mutate the target record"
        );

        let error = manager
            .approve(&request.id, &admin_session(), None)
            .await
            .expect_err("rejected is terminal");
        assert_eq!(
            error,
            WorkflowError::Review(ReviewError::AlreadyReviewed {
                status: EditRequestStatus::Rejected
            })
        );

        settle().await;
        let kinds: Vec<_> = notifier.sent().iter().map(|n| n.kind).collect();
        assert_eq!(kinds, vec![NotificationKind::RequestCreated, NotificationKind::RequestRejected]);
    }

    #[tokio::test]
    async fn unknown_entity_type_fails_the_approval_and_leaves_it_pending() {
        let repo = InMemoryEditRequestRepository::with_registered_types([EntityType::Driver]);
        repo.insert_entity(EntityType::Truck, "T1", &[("status", "maintenance")]).await;
        let manager = manager_with(repo, InMemoryNotifier::new());

        let request =
            manager.create(truck_edit("T1"), &dispatcher_session()).await.expect("create");
        let error = manager
            .approve(&request.id, &admin_session(), None)
            .await
            .expect_err("truck handler is not registered");
        assert!(matches!(error, WorkflowError::UnknownEntityType(tag) if tag == "truck"));

        let stored = manager.get(&request.id, &admin_session()).await.expect("get");
        assert_eq!(stored.status, EditRequestStatus::Pending);
    }

    #[tokio::test]
    async fn requests_of_other_organizations_are_invisible() {
        let repo = InMemoryEditRequestRepository::new();
        repo.insert_entity(EntityType::Truck, "T1", &[("status", "maintenance")]).await;
        let manager = manager_with(repo, InMemoryNotifier::new());

        let request =
            manager.create(truck_edit("T1"), &dispatcher_session()).await.expect("create");

        let foreign_admin = Session::new("u-other", "org-2", Role::Admin);
        let error = manager
            .approve(&request.id, &foreign_admin, None)
            .await
            .expect_err("cross-org review must not resolve");
        assert!(matches!(error, WorkflowError::RequestNotFound(_)));
    }

    #[tokio::test]
    async fn notification_failure_never_fails_the_operation() {
        let repo = InMemoryEditRequestRepository::new();
        repo.insert_entity(EntityType::Truck, "T1", &[("status", "maintenance")]).await;
        let manager = manager_with(repo, InMemoryNotifier::failing("endpoint down"));

        let request =
            manager.create(truck_edit("T1"), &dispatcher_session()).await.expect("create");
        let approved = manager
            .approve(&request.id, &admin_session(), None)
            .await
            .expect("approve succeeds despite dead notifier");

        assert_eq!(approved.status, EditRequestStatus::Approved);
        settle().await;
    }

    #[tokio::test]
    async fn list_pending_is_scoped_to_the_caller_org() {
        let repo = InMemoryEditRequestRepository::new();
        let manager = manager_with(repo, InMemoryNotifier::new());

        manager.create(truck_edit("T1"), &dispatcher_session()).await.expect("create one");
        manager
            .create(truck_edit("T2"), &Session::new("u-x", "org-2", Role::Dispatcher))
            .await
            .expect("create foreign");

        let pending = manager.list_pending(&admin_session(), 10).await.expect("list");
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].entity_id.0, "T1");
    }

    #[tokio::test]
    async fn review_actions_leave_an_audit_trail() {
        let repo = InMemoryEditRequestRepository::new();
        repo.insert_entity(EntityType::Truck, "T1", &[("status", "maintenance")]).await;
        let manager = manager_with(repo, InMemoryNotifier::new());

        let request =
            manager.create(truck_edit("T1"), &dispatcher_session()).await.expect("create");
        manager
            .approve(&request.id, &admin_session(), Some("ok after inspection".to_string()))
            .await
            .expect("approve");

        let events = manager.audit.events();
        let types: Vec<_> = events.iter().map(|event| event.event_type.as_str()).collect();
        assert_eq!(types, vec!["review.request_created", "review.request_approved"]);
        assert_eq!(events[1].actor, "u-admin");
        assert_eq!(
            events[1].metadata.get("review_notes").map(String::as_str),
            Some("ok after inspection")
        );
    }
}
