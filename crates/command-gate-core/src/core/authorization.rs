// crates/command-gate-core/src/core/authorization.rs
// ============================================================================
// Module: Authorization Calculator
// Description: Per-request authorization decisions for Command Gate.
// Purpose: Combine security metadata with the caller's access level.
// Dependencies: async-trait
// ============================================================================

//! ## Overview
//! The [`AuthorizationCalculator`] produces one [`AuthorizationResult`] per
//! request. Anonymous commands are granted immediately without consulting
//! the access-level provider, so anonymous endpoints remain reachable even
//! when no caller identity exists. Everything else compares the provider's
//! reported level against the resolved requirement.
//!
//! Encryption is deliberately not part of this decision: it is a transport
//! precondition evaluated separately by the router, with a different
//! remediation path than an access denial.
//!
//! ## Invariants
//! - No side effects beyond the provider call.
//! - The provider is never consulted for anonymous commands.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::IpAddr;
use std::sync::Arc;

use crate::core::access::AccessLevel;
use crate::core::access::AccessLevelProvider;
use crate::core::access::AuthorizationResult;
use crate::core::command::CommandDescriptor;
use crate::core::metadata::SecurityMetadataResolver;

// ============================================================================
// SECTION: Request Context
// ============================================================================

/// Per-request caller context consumed by the calculus.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Command being invoked.
    pub command: CommandDescriptor,
    /// Caller subject or session identifier, when one exists.
    pub subject: Option<String>,
    /// Whether the caller's transport is confirmed encrypted.
    pub transport_encrypted: bool,
    /// Peer IP address when available, for auditing.
    pub peer_ip: Option<IpAddr>,
    /// Optional request identifier for auditing.
    pub request_id: Option<String>,
}

impl RequestContext {
    /// Builds a minimal context for the given command.
    #[must_use]
    pub const fn for_command(command: CommandDescriptor) -> Self {
        Self {
            command,
            subject: None,
            transport_encrypted: false,
            peer_ip: None,
            request_id: None,
        }
    }

    /// Returns a copy with the transport-encrypted flag set.
    #[must_use]
    pub const fn with_encrypted_transport(mut self, encrypted: bool) -> Self {
        self.transport_encrypted = encrypted;
        self
    }

    /// Returns a copy with the caller subject set.
    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Returns a copy with the request identifier set.
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}

// ============================================================================
// SECTION: Calculator
// ============================================================================

/// Combines metadata resolution with the access-level provider.
pub struct AuthorizationCalculator {
    /// Declarative metadata resolver.
    resolver: Arc<SecurityMetadataResolver>,
    /// Caller access-level provider; may perform I/O.
    provider: Arc<dyn AccessLevelProvider>,
}

impl AuthorizationCalculator {
    /// Builds a calculator from explicit dependencies.
    #[must_use]
    pub fn new(
        resolver: Arc<SecurityMetadataResolver>,
        provider: Arc<dyn AccessLevelProvider>,
    ) -> Self {
        Self {
            resolver,
            provider,
        }
    }

    /// Returns the metadata resolver shared by this calculator.
    #[must_use]
    pub fn resolver(&self) -> &SecurityMetadataResolver {
        &self.resolver
    }

    /// Calculates the effective access for one request.
    ///
    /// Anonymous commands grant immediately; otherwise the caller's level
    /// must meet the resolved requirement.
    pub async fn calculate_authorization(&self, ctx: &RequestContext) -> AuthorizationResult {
        if self.resolver.is_anonymous_access_allowed(&ctx.command) {
            return AuthorizationResult::granted();
        }
        let required = self.resolver.required_access_level(&ctx.command);
        if required == AccessLevel::Denied {
            // A Denied requirement marks an undeclared command; no caller
            // level satisfies it.
            return AuthorizationResult::denied();
        }
        let actual = self.provider.access_level(ctx).await;
        if actual.meets(required) {
            AuthorizationResult::granted()
        } else {
            AuthorizationResult::denied()
        }
    }
}

#[cfg(test)]
mod tests;
