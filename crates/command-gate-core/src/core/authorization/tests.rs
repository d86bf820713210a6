// crates/command-gate-core/src/core/authorization/tests.rs
// ============================================================================
// Module: Authorization Calculator Unit Tests
// Description: Unit tests for per-request authorization decisions.
// Purpose: Validate anonymous bypass and level comparison outcomes.
// Dependencies: command-gate-core
// ============================================================================

//! ## Overview
//! Exercises the calculator: anonymous commands grant without consulting
//! the provider, non-anonymous commands compare levels, and undeclared
//! commands deny every caller.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::panic,
    reason = "Test-only assertions favor direct unwrap/expect for clarity."
)]

use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use async_trait::async_trait;

use super::*;
use crate::core::access::AccessLevel;
use crate::core::access::FixedAccessLevelProvider;
use crate::core::metadata::SecurityRegistry;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Provider that counts how often it is consulted.
struct CountingProvider {
    /// Level reported to callers.
    level: AccessLevel,
    /// Number of consultations.
    calls: AtomicUsize,
}

impl CountingProvider {
    /// Builds a counting provider reporting `level`.
    fn new(level: AccessLevel) -> Self {
        Self {
            level,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl AccessLevelProvider for CountingProvider {
    async fn access_level(&self, _ctx: &RequestContext) -> AccessLevel {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.level
    }
}

/// Builds the reference resolver for the registration service.
fn sample_resolver() -> Arc<SecurityMetadataResolver> {
    let registry = SecurityRegistry::new()
        .declare_type("RegistrationService", AccessLevel::Execute)
        .declare_anonymous(CommandDescriptor::new("RegistrationService", "RegisterPerson"), true)
        .declare_anonymous(CommandDescriptor::new("RegistrationService", "GetProfile"), false);
    Arc::new(SecurityMetadataResolver::new(registry))
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[tokio::test]
async fn anonymous_command_grants_without_consulting_provider() {
    let provider = Arc::new(CountingProvider::new(AccessLevel::Denied));
    let calculator = AuthorizationCalculator::new(sample_resolver(), provider.clone());
    for method in ["RegisterPerson", "GetProfile"] {
        let ctx = RequestContext::for_command(CommandDescriptor::new(
            "RegistrationService",
            method,
        ));
        let result = calculator.calculate_authorization(&ctx).await;
        assert_eq!(result.access, AccessLevel::Execute, "{method} should grant");
    }
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn non_anonymous_command_compares_levels() {
    let resolver = sample_resolver();
    let ctx = RequestContext::for_command(CommandDescriptor::new(
        "RegistrationService",
        "AuditAccounts",
    ));

    let denied = AuthorizationCalculator::new(
        resolver.clone(),
        Arc::new(FixedAccessLevelProvider::new(AccessLevel::Denied)),
    );
    assert_eq!(denied.calculate_authorization(&ctx).await.access, AccessLevel::Denied);

    let reader = AuthorizationCalculator::new(
        resolver.clone(),
        Arc::new(FixedAccessLevelProvider::new(AccessLevel::Read)),
    );
    assert_eq!(reader.calculate_authorization(&ctx).await.access, AccessLevel::Denied);

    let executor = AuthorizationCalculator::new(
        resolver,
        Arc::new(FixedAccessLevelProvider::new(AccessLevel::Execute)),
    );
    assert_eq!(executor.calculate_authorization(&ctx).await.access, AccessLevel::Execute);
}

#[tokio::test]
async fn undeclared_command_denies_every_caller() {
    let calculator = AuthorizationCalculator::new(
        sample_resolver(),
        Arc::new(FixedAccessLevelProvider::new(AccessLevel::Execute)),
    );
    let ctx = RequestContext::for_command(CommandDescriptor::new("UnknownService", "Anything"));
    assert_eq!(calculator.calculate_authorization(&ctx).await.access, AccessLevel::Denied);
}

#[test]
fn context_builders_set_fields() {
    let ctx = RequestContext::for_command(CommandDescriptor::new("Svc", "Op"))
        .with_encrypted_transport(true)
        .with_subject("session-1")
        .with_request_id("req-9");
    assert!(ctx.transport_encrypted);
    assert_eq!(ctx.subject.as_deref(), Some("session-1"));
    assert_eq!(ctx.request_id.as_deref(), Some("req-9"));
}
