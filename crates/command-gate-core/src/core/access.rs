// crates/command-gate-core/src/core/access.rs
// ============================================================================
// Module: Access Levels
// Description: Ordered privilege levels and the access-level provider seam.
// Purpose: Provide the common currency of authorization decisions.
// Dependencies: serde, async-trait
// ============================================================================

//! ## Overview
//! [`AccessLevel`] is the totally ordered privilege enumeration used by every
//! authorization decision. "Meets requirement" always means caller level
//! greater than or equal to the required level, using the declared order
//! `Denied < Read < Execute`.
//!
//! ## Invariants
//! - Comparisons use the declared variant order only.
//! - Providers must not fail for a well-formed context; absence of a caller
//!   identity is reported as [`AccessLevel::Denied`], not as an error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;

use crate::core::authorization::RequestContext;

// ============================================================================
// SECTION: Access Level
// ============================================================================

/// Ordered privilege level gating command execution.
///
/// # Invariants
/// - Variant order is the authorization order: `Denied < Read < Execute`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    /// No access; the fail-closed default everywhere.
    #[default]
    Denied,
    /// Read-only access.
    Read,
    /// Full execute access.
    Execute,
}

impl AccessLevel {
    /// Returns true when this level satisfies the given requirement.
    #[must_use]
    pub fn meets(self, required: Self) -> bool {
        self >= required
    }

    /// Returns the stable wire label for this level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Denied => "denied",
            Self::Read => "read",
            Self::Execute => "execute",
        }
    }
}

// ============================================================================
// SECTION: Authorization Result
// ============================================================================

/// Effective access granted for a single request.
///
/// # Invariants
/// - Created fresh per request; never persisted or cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AuthorizationResult {
    /// Access granted to the caller for this request.
    pub access: AccessLevel,
}

impl AuthorizationResult {
    /// Builds a granted result carrying [`AccessLevel::Execute`].
    #[must_use]
    pub const fn granted() -> Self {
        Self {
            access: AccessLevel::Execute,
        }
    }

    /// Builds a denied result.
    #[must_use]
    pub const fn denied() -> Self {
        Self {
            access: AccessLevel::Denied,
        }
    }

    /// Returns true when the result grants execution.
    #[must_use]
    pub fn is_granted(self) -> bool {
        self.access.meets(AccessLevel::Execute)
    }
}

// ============================================================================
// SECTION: Provider Seam
// ============================================================================

/// Resolves the caller's current access level from the request context.
///
/// Consulted only for non-anonymous commands. Implementations may perform
/// I/O (session or database lookups) and must therefore never be called
/// while a lock is held.
#[async_trait]
pub trait AccessLevelProvider: Send + Sync {
    /// Returns the caller's current access level.
    async fn access_level(&self, ctx: &RequestContext) -> AccessLevel;
}

/// Provider returning a fixed access level for every caller.
///
/// Used when no session layer is wired in (anonymous-only deployments) and
/// as a test double.
#[derive(Debug, Clone, Copy)]
pub struct FixedAccessLevelProvider {
    /// Level reported for every request.
    level: AccessLevel,
}

impl FixedAccessLevelProvider {
    /// Builds a provider that always reports `level`.
    #[must_use]
    pub const fn new(level: AccessLevel) -> Self {
        Self {
            level,
        }
    }
}

#[async_trait]
impl AccessLevelProvider for FixedAccessLevelProvider {
    async fn access_level(&self, _ctx: &RequestContext) -> AccessLevel {
        self.level
    }
}
