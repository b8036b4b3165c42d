use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use fleetdesk_core::domain::edit_request::EditRequestId;
use fleetdesk_core::domain::entity::{EntityId, EntityType, OrgId};
use fleetdesk_core::domain::session::UserId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    RequestCreated,
    RequestApproved,
    RequestRejected,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::RequestCreated => "request_created",
            NotificationKind::RequestApproved => "request_approved",
            NotificationKind::RequestRejected => "request_rejected",
        }
    }
}

/// What reviewers get told: the event kind, which record is affected, the
/// organization scope, and who acted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewNotification {
    pub kind: NotificationKind,
    pub request_id: EditRequestId,
    pub entity_type: EntityType,
    pub entity_id: EntityId,
    pub org_id: OrgId,
    pub actor: UserId,
    pub summary: String,
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("http delivery failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("notification endpoint rejected the payload: {0}")]
    Rejected(String),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: &ReviewNotification) -> Result<(), NotifyError>;
}

/// Used when notifications are disabled in config.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn send(&self, _notification: &ReviewNotification) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Records notifications for tests; can be told to fail every delivery.
#[derive(Clone, Default)]
pub struct InMemoryNotifier {
    sent: Arc<Mutex<Vec<ReviewNotification>>>,
    fail_with: Option<String>,
}

impl InMemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self { sent: Arc::default(), fail_with: Some(message.into()) }
    }

    pub fn sent(&self) -> Vec<ReviewNotification> {
        match self.sent.lock() {
            Ok(sent) => sent.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl Notifier for InMemoryNotifier {
    async fn send(&self, notification: &ReviewNotification) -> Result<(), NotifyError> {
        if let Some(message) = &self.fail_with {
            return Err(NotifyError::Rejected(message.clone()));
        }
        match self.sent.lock() {
            Ok(mut sent) => sent.push(notification.clone()),
            Err(poisoned) => poisoned.into_inner().push(notification.clone()),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use fleetdesk_core::domain::edit_request::EditRequestId;
    use fleetdesk_core::domain::entity::{EntityId, EntityType, OrgId};
    use fleetdesk_core::domain::session::UserId;

    use super::{InMemoryNotifier, NotificationKind, Notifier, NotifyError, ReviewNotification};

    fn notification() -> ReviewNotification {
        ReviewNotification {
            kind: NotificationKind::RequestApproved,
            request_id: EditRequestId("er-42".to_string()),
            entity_type: EntityType::Truck,
            entity_id: EntityId("T1".to_string()),
            org_id: OrgId("org-1".to_string()),
            actor: UserId("u-admin".to_string()),
            summary: "truck T1 edit approved".to_string(),
        }
    }

    #[test]
    fn payload_serializes_with_stable_tags() {
        let json = serde_json::to_value(notification()).expect("serialize notification");
        assert_eq!(json["kind"], "request_approved");
        assert_eq!(json["entity_type"], "truck");
        assert_eq!(json["request_id"], "er-42");
        assert_eq!(json["actor"], "u-admin");
    }

    #[tokio::test]
    async fn in_memory_notifier_records_and_fails_on_demand() {
        let notifier = InMemoryNotifier::new();
        notifier.send(&notification()).await.expect("delivery succeeds");
        assert_eq!(notifier.sent().len(), 1);

        let failing = InMemoryNotifier::failing("endpoint down");
        let error = failing.send(&notification()).await.expect_err("delivery fails");
        assert!(matches!(error, NotifyError::Rejected(message) if message == "endpoint down"));
        assert!(failing.sent().is_empty());
    }
}
