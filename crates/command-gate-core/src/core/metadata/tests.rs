// crates/command-gate-core/src/core/metadata/tests.rs
// ============================================================================
// Module: Security Metadata Unit Tests
// Description: Unit tests for declarative metadata resolution.
// Purpose: Validate fail-closed defaults, markers, and override precedence.
// Dependencies: command-gate-core
// ============================================================================

//! ## Overview
//! Exercises the resolver contract: undeclared commands resolve to the
//! fail-closed defaults, anonymous markers carry their encryption flag, and
//! method-level access overrides win over type-level defaults.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::panic,
    reason = "Test-only assertions favor direct unwrap/expect for clarity."
)]

use super::*;

/// Builds the reference registry used across these tests.
fn sample_resolver() -> SecurityMetadataResolver {
    let registry = SecurityRegistry::new()
        .declare_type("RegistrationService", AccessLevel::Execute)
        .declare_anonymous(CommandDescriptor::new("RegistrationService", "RegisterPerson"), true)
        .declare_anonymous(CommandDescriptor::new("RegistrationService", "GetProfile"), false);
    SecurityMetadataResolver::new(registry)
}

#[test]
fn undeclared_command_fails_closed() {
    let resolver = sample_resolver();
    let cmd = CommandDescriptor::new("UnknownService", "Anything");
    assert!(!resolver.is_anonymous_access_allowed(&cmd));
    assert!(!resolver.is_encryption_required(&cmd));
    assert_eq!(resolver.required_access_level(&cmd), AccessLevel::Denied);
}

#[test]
fn undeclared_method_on_known_type_is_not_anonymous() {
    let resolver = sample_resolver();
    let cmd = CommandDescriptor::new("RegistrationService", "DeleteEverything");
    assert!(!resolver.is_anonymous_access_allowed(&cmd));
    assert!(!resolver.is_encryption_required(&cmd));
    // The type-level declaration still governs the required level.
    assert_eq!(resolver.required_access_level(&cmd), AccessLevel::Execute);
}

#[test]
fn register_person_is_anonymous_and_encrypted() {
    let resolver = sample_resolver();
    let cmd = CommandDescriptor::new("RegistrationService", "RegisterPerson");
    assert!(resolver.is_anonymous_access_allowed(&cmd));
    assert!(resolver.is_encryption_required(&cmd));
}

#[test]
fn get_profile_is_anonymous_without_encryption() {
    let resolver = sample_resolver();
    let cmd = CommandDescriptor::new("RegistrationService", "GetProfile");
    assert!(resolver.is_anonymous_access_allowed(&cmd));
    assert!(!resolver.is_encryption_required(&cmd));
}

#[test]
fn method_override_wins_over_type_default() {
    let cmd = CommandDescriptor::new("ReportService", "ReadSummary");
    let registry = SecurityRegistry::new()
        .declare_type("ReportService", AccessLevel::Execute)
        .declare_method_access(cmd.clone(), AccessLevel::Read);
    let resolver = SecurityMetadataResolver::new(registry);
    assert_eq!(resolver.required_access_level(&cmd), AccessLevel::Read);
    let sibling = CommandDescriptor::new("ReportService", "Rebuild");
    assert_eq!(resolver.required_access_level(&sibling), AccessLevel::Execute);
}

#[test]
fn resolution_is_stable_across_cache_hits() {
    let resolver = sample_resolver();
    let cmd = CommandDescriptor::new("RegistrationService", "RegisterPerson");
    let first = resolver.metadata(&cmd);
    let second = resolver.metadata(&cmd);
    assert_eq!(first, second);
}

#[test]
fn fail_closed_defaults_shape() {
    let defaults = SecurityMetadata::fail_closed();
    assert!(!defaults.anonymous_access_allowed);
    assert!(!defaults.encryption_required);
    assert_eq!(defaults.required_access_level, AccessLevel::Denied);
}
