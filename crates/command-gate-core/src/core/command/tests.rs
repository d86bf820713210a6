// crates/command-gate-core/src/core/command/tests.rs
// ============================================================================
// Module: Command Descriptor Unit Tests
// Description: Unit tests for descriptor identity and identifier parsing.
// Purpose: Validate separator handling and malformed-identifier rejection.
// Dependencies: command-gate-core
// ============================================================================

//! ## Overview
//! Exercises wire operation identifier parsing: both separators, trimming,
//! extra segments, and the malformed shapes that must be rejected.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::panic,
    reason = "Test-only assertions favor direct unwrap/expect for clarity."
)]

use super::*;

#[test]
fn parses_plus_separator() {
    let cmd = CommandDescriptor::parse_operation("RegistrationService+GetProfile")
        .expect("plus separator parses");
    assert_eq!(cmd.declaring_type(), "RegistrationService");
    assert_eq!(cmd.method(), "GetProfile");
}

#[test]
fn parses_comma_separator() {
    let cmd = CommandDescriptor::parse_operation("RegistrationService,RegisterPerson")
        .expect("comma separator parses");
    assert_eq!(cmd.declaring_type(), "RegistrationService");
    assert_eq!(cmd.method(), "RegisterPerson");
}

#[test]
fn trims_segments_and_ignores_extras() {
    let cmd = CommandDescriptor::parse_operation(" Foo.Bar + Baz + ignored , also-ignored ")
        .expect("extra segments are ignored");
    assert_eq!(cmd.declaring_type(), "Foo.Bar");
    assert_eq!(cmd.method(), "Baz");
}

#[test]
fn skips_empty_segments() {
    let cmd = CommandDescriptor::parse_operation("++Svc,,Op").expect("empty segments skipped");
    assert_eq!(cmd.declaring_type(), "Svc");
    assert_eq!(cmd.method(), "Op");
}

#[test]
fn rejects_empty_identifier() {
    assert_eq!(
        CommandDescriptor::parse_operation("   "),
        Err(OperationIdentifierError::Empty)
    );
}

#[test]
fn rejects_single_segment() {
    assert_eq!(
        CommandDescriptor::parse_operation("RegistrationService"),
        Err(OperationIdentifierError::MissingSegments)
    );
    assert_eq!(
        CommandDescriptor::parse_operation("RegistrationService+"),
        Err(OperationIdentifierError::MissingSegments)
    );
}

#[test]
fn identity_is_structural() {
    let left = CommandDescriptor::new("Svc", "Op");
    let right = CommandDescriptor::parse_operation("Svc+Op").expect("parses");
    assert_eq!(left, right);
    assert_ne!(left, CommandDescriptor::new("Svc", "Other"));
}

#[test]
fn display_uses_plus_form() {
    let cmd = CommandDescriptor::new("Svc", "Op");
    assert_eq!(cmd.to_string(), "Svc+Op");
}
