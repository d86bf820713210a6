// crates/command-gate-core/src/core/metadata.rs
// ============================================================================
// Module: Security Metadata
// Description: Declarative per-command security metadata and its resolver.
// Purpose: Resolve anonymous-access, encryption, and required-level markers.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Security metadata is declared per method (with a type-level default for
//! the required access level) through [`SecurityRegistry`], an explicit
//! builder standing in for the source language's method attributes. The
//! [`SecurityMetadataResolver`] answers the three questions of the calculus
//! and caches resolved metadata per descriptor for the process lifetime.
//!
//! ## Invariants
//! - Resolution never fails and never panics; unknown types and methods
//!   resolve to the fail-closed defaults so callers cannot probe for
//!   existence through failure shapes.
//! - Declarations are immutable once the registry is built; cache entries
//!   are never invalidated or evicted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::RwLock;

use serde::Serialize;

use crate::core::access::AccessLevel;
use crate::core::command::CommandDescriptor;

// ============================================================================
// SECTION: Security Metadata
// ============================================================================

/// Resolved security metadata for one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SecurityMetadata {
    /// Whether the command is callable without caller-identity authorization.
    pub anonymous_access_allowed: bool,
    /// Whether the transport must be confirmed encrypted.
    pub encryption_required: bool,
    /// Minimum access level required when not anonymous.
    pub required_access_level: AccessLevel,
}

impl SecurityMetadata {
    /// Fail-closed defaults for undeclared commands.
    #[must_use]
    pub const fn fail_closed() -> Self {
        Self {
            anonymous_access_allowed: false,
            encryption_required: false,
            required_access_level: AccessLevel::Denied,
        }
    }
}

// ============================================================================
// SECTION: Declarations
// ============================================================================

/// Method-level security declaration.
#[derive(Debug, Clone, Copy, Default)]
struct MethodDeclaration {
    /// Anonymous-access marker present on the method.
    anonymous: bool,
    /// Encryption flag carried by the marker.
    encryption_required: bool,
    /// Method-level required access override, when declared.
    required_access: Option<AccessLevel>,
}

/// Registry of declarative security metadata, built once at process start.
///
/// The builder API replaces the originating system's method attributes with
/// an explicit, auditable table keyed by [`CommandDescriptor`].
#[derive(Debug, Default)]
pub struct SecurityRegistry {
    /// Type-level required access declarations.
    type_access: BTreeMap<String, AccessLevel>,
    /// Method-level declarations keyed by descriptor.
    methods: BTreeMap<CommandDescriptor, MethodDeclaration>,
}

impl SecurityRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares the type-level required access level for every method of
    /// `declaring_type` that lacks a method-level override.
    #[must_use]
    pub fn declare_type(mut self, declaring_type: impl Into<String>, level: AccessLevel) -> Self {
        self.type_access.insert(declaring_type.into(), level);
        self
    }

    /// Declares an anonymous-access marker on a method.
    #[must_use]
    pub fn declare_anonymous(mut self, cmd: CommandDescriptor, encryption_required: bool) -> Self {
        let entry = self.methods.entry(cmd).or_default();
        entry.anonymous = true;
        entry.encryption_required = encryption_required;
        self
    }

    /// Declares a method-level required access override.
    #[must_use]
    pub fn declare_method_access(mut self, cmd: CommandDescriptor, level: AccessLevel) -> Self {
        self.methods.entry(cmd).or_default().required_access = Some(level);
        self
    }

    /// Resolves the metadata for one descriptor from the raw declarations.
    fn resolve(&self, cmd: &CommandDescriptor) -> SecurityMetadata {
        let method = self.methods.get(cmd);
        let type_level = self.type_access.get(cmd.declaring_type()).copied();
        // Method-level override wins; a type-level declaration alone covers
        // every method of the type; no declaration at all denies.
        let required_access_level = method
            .and_then(|decl| decl.required_access)
            .or(type_level)
            .unwrap_or(AccessLevel::Denied);
        SecurityMetadata {
            anonymous_access_allowed: method.is_some_and(|decl| decl.anonymous),
            encryption_required: method.is_some_and(|decl| decl.encryption_required),
            required_access_level,
        }
    }
}

// ============================================================================
// SECTION: Resolver
// ============================================================================

/// Fail-closed resolver over a [`SecurityRegistry`] with a process-wide cache.
#[derive(Debug)]
pub struct SecurityMetadataResolver {
    /// Immutable declarations.
    registry: SecurityRegistry,
    /// Lazily populated resolution cache; entries are never evicted.
    cache: RwLock<BTreeMap<CommandDescriptor, SecurityMetadata>>,
}

impl SecurityMetadataResolver {
    /// Builds a resolver over the given registry.
    #[must_use]
    pub fn new(registry: SecurityRegistry) -> Self {
        Self {
            registry,
            cache: RwLock::new(BTreeMap::new()),
        }
    }

    /// Returns the resolved metadata for a command, consulting the cache.
    #[must_use]
    pub fn metadata(&self, cmd: &CommandDescriptor) -> SecurityMetadata {
        if let Ok(cache) = self.cache.read() {
            if let Some(found) = cache.get(cmd) {
                return *found;
            }
        }
        let resolved = self.registry.resolve(cmd);
        if let Ok(mut cache) = self.cache.write() {
            cache.insert(cmd.clone(), resolved);
        }
        resolved
    }

    /// Returns true iff the method declares an anonymous-access marker.
    #[must_use]
    pub fn is_anonymous_access_allowed(&self, cmd: &CommandDescriptor) -> bool {
        self.metadata(cmd).anonymous_access_allowed
    }

    /// Returns true iff the method's marker requires transport encryption.
    #[must_use]
    pub fn is_encryption_required(&self, cmd: &CommandDescriptor) -> bool {
        self.metadata(cmd).encryption_required
    }

    /// Returns the required access level for a non-anonymous call.
    #[must_use]
    pub fn required_access_level(&self, cmd: &CommandDescriptor) -> AccessLevel {
        self.metadata(cmd).required_access_level
    }
}

#[cfg(test)]
mod tests;
