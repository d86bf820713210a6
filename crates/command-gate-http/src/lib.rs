// crates/command-gate-http/src/lib.rs
// ============================================================================
// Module: Command Gate HTTP
// Description: Invocation router, registration service, and HTTP transport.
// Purpose: Expose the authorization calculus over the network boundary.
// Dependencies: command-gate-core, command-gate-config, axum, tokio
// ============================================================================

//! ## Overview
//! `command-gate-http` hosts the generic invocation router and the
//! registration service behind an axum HTTP server. Every inbound request
//! flows through the fail-closed pipeline in [`router::InvocationRouter`]:
//! identifier parsing, whitelist, static dispatch table, authorization,
//! encryption gate, argument binding, and finally the handler. Inputs are
//! untrusted and every failure maps to a stable, coarse error kind.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod router;
pub mod server;
pub mod service;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::AuditSink;
pub use audit::InvocationAuditEvent;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use router::CallerContext;
pub use router::InvocationArgument;
pub use router::InvocationError;
pub use router::InvocationRequest;
pub use router::InvocationRouter;
pub use server::HttpServer;
pub use server::ServerError;
pub use service::RegistrationService;
pub use service::ServiceMethod;
