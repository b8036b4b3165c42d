use std::sync::Arc;

use tracing::warn;

use crate::notifier::{Notifier, ReviewNotification};

/// Detached delivery. The triggering operation has already returned by the
/// time a notification fails; the failure is logged and goes nowhere else.
#[derive(Clone)]
pub struct Dispatcher {
    notifier: Arc<dyn Notifier>,
}

impl Dispatcher {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    /// The returned handle exists so tests can await delivery; production
    /// callers drop it.
    pub fn dispatch(&self, notification: ReviewNotification) -> tokio::task::JoinHandle<()> {
        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(async move {
            if let Err(error) = notifier.send(&notification).await {
                warn!(
                    event_name = "notify.dispatch_failed",
                    kind = notification.kind.as_str(),
                    request_id = %notification.request_id.0,
                    org_id = %notification.org_id.0,
                    error = %error,
                    "review notification was not delivered"
                );
            }
        })
    }
}
