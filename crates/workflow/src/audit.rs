use tracing::info;

use fleetdesk_core::audit::{AuditEvent, AuditSink};

/// Forwards audit events to the tracing pipeline; the server wires this in
/// so review activity lands in the same sink as the rest of the logs.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn emit(&self, event: AuditEvent) {
        info!(
            event_name = "audit.event",
            event_type = %event.event_type,
            request_id = event.request_id.as_ref().map(|id| id.0.as_str()).unwrap_or("unknown"),
            entity_id = event.entity_id.as_ref().map(|id| id.0.as_str()).unwrap_or("unknown"),
            org_id = event.org_id.as_ref().map(|id| id.0.as_str()).unwrap_or("unknown"),
            correlation_id = %event.correlation_id,
            actor = %event.actor,
            outcome = ?event.outcome,
            "audit event recorded"
        );
    }
}
