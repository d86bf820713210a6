// crates/command-gate-core/src/interfaces/tests.rs
// ============================================================================
// Module: Collaborator Interface Unit Tests
// Description: Unit tests for the in-memory account/profile directory.
// Purpose: Validate handle issuance, duplicate rejection, and lookups.
// Dependencies: command-gate-core
// ============================================================================

//! ## Overview
//! Exercises the in-memory directory through the manager traits: generated
//! and requested handles, the register-then-lookup round trip, duplicate
//! rejection, and miss behavior.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::panic,
    reason = "Test-only assertions favor direct unwrap/expect for clarity."
)]

use super::*;

/// Builds a registration record with empty optional fields.
fn registration(first: &str, last: &str, handle: &str) -> PersonRegistrationData {
    PersonRegistrationData {
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: String::new(),
        phone: String::new(),
        handle: handle.to_string(),
    }
}

#[tokio::test]
async fn register_then_lookup_round_trip() {
    let directory = InMemoryDirectory::new("command-gate");
    let account = directory
        .register_account(registration("Ada", "Lovelace", ""))
        .await
        .expect("registration succeeds");
    assert!(!account.person_handle.is_empty());

    let profile = directory
        .find_profile_by_handle(&account.person_handle)
        .await
        .expect("profile exists after registration");
    assert_eq!(profile.person_handle, account.person_handle);
    assert_eq!(profile.profile_handle, account.profile_handle);
    assert_eq!(profile.name, "Ada Lovelace");
    assert_eq!(profile.device_handle, "command-gate-device");
}

#[tokio::test]
async fn requested_handle_is_honored() {
    let directory = InMemoryDirectory::new("command-gate");
    let account = directory
        .register_account(registration("Grace", "Hopper", " grace "))
        .await
        .expect("registration succeeds");
    assert_eq!(account.person_handle, "grace");
}

#[tokio::test]
async fn duplicate_handle_is_rejected() {
    let directory = InMemoryDirectory::new("command-gate");
    directory
        .register_account(registration("Grace", "Hopper", "grace"))
        .await
        .expect("first registration succeeds");
    let error = directory
        .register_account(registration("Grace", "Murray", "grace"))
        .await
        .expect_err("duplicate handle fails");
    assert_eq!(error, RegistrationError::DuplicateHandle("grace".to_string()));
}

#[tokio::test]
async fn unknown_handle_lookup_is_none() {
    let directory = InMemoryDirectory::new("command-gate");
    assert!(directory.find_profile_by_handle("never-registered").await.is_none());
}

#[test]
fn profile_view_copies_all_fields() {
    let profile = Profile {
        profile_handle: "profile-1".to_string(),
        person_handle: "person-1".to_string(),
        name: "Ada Lovelace".to_string(),
        device_handle: "command-gate-device".to_string(),
    };
    let view = ProfileView::from(&profile);
    assert_eq!(view.profile_handle, profile.profile_handle);
    assert_eq!(view.person_handle, profile.person_handle);
    assert_eq!(view.name, profile.name);
    assert_eq!(view.device_handle, profile.device_handle);
}
