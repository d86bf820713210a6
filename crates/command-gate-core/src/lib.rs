// crates/command-gate-core/src/lib.rs
// ============================================================================
// Module: Command Gate Core
// Description: Authorization calculus and collaborator interfaces for Command Gate.
// Purpose: Provide the access-level, metadata, and authorization decision engine.
// Dependencies: serde, thiserror, async-trait
// ============================================================================

//! ## Overview
//! Command Gate Core defines the command authorization calculus: ordered
//! access levels, command descriptors, declarative security metadata with a
//! fail-closed resolver, and the authorization calculator that combines the
//! resolver with a caller-supplied access-level provider. The external
//! collaborators (account and profile managers) are consumed through the
//! traits in [`interfaces`].
//!
//! All components are stateless or read-only-cached after construction and
//! are safe to share across concurrent requests.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::access::AccessLevel;
pub use core::access::AccessLevelProvider;
pub use core::access::AuthorizationResult;
pub use core::access::FixedAccessLevelProvider;
pub use core::authorization::AuthorizationCalculator;
pub use core::authorization::RequestContext;
pub use core::command::CommandDescriptor;
pub use core::command::OperationIdentifierError;
pub use core::metadata::SecurityMetadata;
pub use core::metadata::SecurityMetadataResolver;
pub use core::metadata::SecurityRegistry;
pub use interfaces::AccountData;
pub use interfaces::AccountManager;
pub use interfaces::InMemoryDirectory;
pub use interfaces::PersonRegistrationData;
pub use interfaces::Profile;
pub use interfaces::ProfileManager;
pub use interfaces::ProfileView;
pub use interfaces::RegistrationError;
