//! Reviewer notifications - fire-and-forget fan-out after workflow events
//!
//! This crate is the notification collaborator of the review workflow:
//! - **Notifier** (`notifier`) - the delivery trait plus noop/in-memory doubles
//! - **Webhook** (`webhook`) - JSON POST delivery to a configured endpoint
//! - **Dispatcher** (`dispatch`) - detached delivery; failures are logged,
//!   never surfaced to the operation that triggered them
//!
//! The workflow never awaits delivery. A lost notification costs a reviewer
//! a nudge, not a request.

pub mod dispatch;
pub mod notifier;
pub mod webhook;

pub use dispatch::Dispatcher;
pub use notifier::{
    InMemoryNotifier, NoopNotifier, NotificationKind, Notifier, NotifyError, ReviewNotification,
};
pub use webhook::WebhookNotifier;
