// crates/command-gate-http/src/audit.rs
// ============================================================================
// Module: Invocation Audit
// Description: Audit events and sinks for invocation decisions.
// Purpose: Surface deterministic allow/deny records for every invocation.
// Dependencies: command-gate-core, serde
// ============================================================================

//! ## Overview
//! Every routed invocation emits one [`InvocationAuditEvent`] describing the
//! decision. Sinks are pluggable; the default emits JSON lines to stderr and
//! tests use the no-op sink.
//!
//! ## Invariants
//! - Audit recording never influences the decision and never fails the
//!   request.

// ============================================================================
// SECTION: Imports
// ============================================================================

use command_gate_core::RequestContext;
use serde::Serialize;

use crate::router::InvocationError;

// ============================================================================
// SECTION: Audit Events
// ============================================================================

/// Invocation audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct InvocationAuditEvent {
    /// Event identifier.
    event: &'static str,
    /// Decision outcome.
    decision: &'static str,
    /// Operation label (`Type+Method`).
    operation: String,
    /// Caller subject or session label.
    subject: Option<String>,
    /// Caller IP address (if available).
    peer_ip: Option<String>,
    /// Failure reason (for deny events).
    reason: Option<String>,
    /// Request identifier (if provided).
    request_id: Option<String>,
}

impl InvocationAuditEvent {
    /// Builds an allow event.
    #[must_use]
    pub fn allowed(ctx: &RequestContext) -> Self {
        Self {
            event: "command_invocation",
            decision: "allow",
            operation: ctx.command.to_string(),
            subject: ctx.subject.clone(),
            peer_ip: ctx.peer_ip.map(|ip| ip.to_string()),
            reason: None,
            request_id: ctx.request_id.clone(),
        }
    }

    /// Builds a deny event.
    #[must_use]
    pub fn denied(ctx: &RequestContext, error: &InvocationError) -> Self {
        Self {
            event: "command_invocation",
            decision: "deny",
            operation: ctx.command.to_string(),
            subject: ctx.subject.clone(),
            peer_ip: ctx.peer_ip.map(|ip| ip.to_string()),
            reason: Some(error.to_string()),
            request_id: ctx.request_id.clone(),
        }
    }

    /// Builds a deny event for requests rejected before a command resolved.
    #[must_use]
    pub fn rejected(operation: &str, error: &InvocationError) -> Self {
        Self {
            event: "command_invocation",
            decision: "deny",
            operation: operation.to_string(),
            subject: None,
            peer_ip: None,
            reason: Some(error.to_string()),
            request_id: None,
        }
    }

    /// Returns the decision label for this event.
    #[must_use]
    pub const fn decision(&self) -> &'static str {
        self.decision
    }

    /// Returns the operation label for this event.
    #[must_use]
    pub fn operation(&self) -> &str {
        &self.operation
    }
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink for invocation decisions.
pub trait AuditSink: Send + Sync {
    /// Records an invocation audit event.
    fn record(&self, event: &InvocationAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl AuditSink for StderrAuditSink {
    #[allow(clippy::print_stderr, reason = "Stderr is this sink's output channel.")]
    fn record(&self, event: &InvocationAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            eprintln!("{payload}");
        }
    }
}

/// No-op audit sink for tests.
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record(&self, _event: &InvocationAuditEvent) {}
}
