// crates/command-gate-core/src/interfaces/mod.rs
// ============================================================================
// Module: Collaborator Interfaces
// Description: External account/profile manager seams and their records.
// Purpose: Consume persistent storage through narrow, mockable traits.
// Dependencies: async-trait, serde, thiserror
// ============================================================================

//! ## Overview
//! Account and profile persistence live outside this system; Command Gate
//! consumes them through the [`AccountManager`] and [`ProfileManager`]
//! traits. [`InMemoryDirectory`] implements both for local serving and
//! tests, the way in-memory stores ship alongside store interfaces
//! elsewhere in this workspace.
//!
//! ## Invariants
//! - Managers may perform I/O; callers must not hold locks across calls.
//! - Lookup misses are `None`, never errors.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Records
// ============================================================================

/// Registration input for a new person account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRegistrationData {
    /// Given name (required).
    pub first_name: String,
    /// Family name (required).
    pub last_name: String,
    /// Contact email; empty when not supplied.
    #[serde(default)]
    pub email: String,
    /// Contact phone; empty when not supplied.
    #[serde(default)]
    pub phone: String,
    /// Requested person handle; empty requests a generated handle.
    #[serde(default)]
    pub handle: String,
}

/// Account data issued by the account manager on registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountData {
    /// Issued person handle.
    #[serde(rename = "personHandle")]
    pub person_handle: String,
    /// Handle of the profile created for the person.
    #[serde(rename = "profileHandle")]
    pub profile_handle: String,
}

/// Stored profile record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    /// Profile handle.
    pub profile_handle: String,
    /// Owning person handle.
    pub person_handle: String,
    /// Display name.
    pub name: String,
    /// Handle of the device the profile was created on.
    pub device_handle: String,
}

/// Wire-facing profile record returned by profile lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileView {
    /// Profile handle.
    #[serde(rename = "profileHandle")]
    pub profile_handle: String,
    /// Owning person handle.
    #[serde(rename = "personHandle")]
    pub person_handle: String,
    /// Display name.
    pub name: String,
    /// Handle of the device the profile was created on.
    #[serde(rename = "deviceHandle")]
    pub device_handle: String,
}

impl From<&Profile> for ProfileView {
    fn from(profile: &Profile) -> Self {
        Self {
            profile_handle: profile.profile_handle.clone(),
            person_handle: profile.person_handle.clone(),
            name: profile.name.clone(),
            device_handle: profile.device_handle.clone(),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Domain failures surfaced by the account manager.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// The requested handle is already registered.
    #[error("handle already registered: {0}")]
    DuplicateHandle(String),
    /// The backing store failed.
    #[error("account storage failure: {0}")]
    Storage(String),
}

// ============================================================================
// SECTION: Traits
// ============================================================================

/// External account registration seam.
#[async_trait]
pub trait AccountManager: Send + Sync {
    /// Registers a person account and returns the issued account data.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError`] on domain failures such as a duplicate
    /// handle.
    async fn register_account(
        &self,
        registration: PersonRegistrationData,
    ) -> Result<AccountData, RegistrationError>;
}

/// External profile lookup seam.
#[async_trait]
pub trait ProfileManager: Send + Sync {
    /// Finds a profile by person handle; `None` when absent.
    async fn find_profile_by_handle(&self, handle: &str) -> Option<Profile>;
}

// ============================================================================
// SECTION: In-Memory Directory
// ============================================================================

/// In-memory account and profile directory.
///
/// # Invariants
/// - Person handles are unique; a duplicate registration fails without
///   mutating the directory.
#[derive(Debug)]
pub struct InMemoryDirectory {
    /// Service name used for issued device handles.
    service_name: String,
    /// Profiles keyed by person handle.
    profiles: Mutex<BTreeMap<String, Profile>>,
    /// Monotonic counter for generated handles.
    next_id: AtomicU64,
}

impl InMemoryDirectory {
    /// Creates an empty directory for the named service.
    #[must_use]
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            profiles: Mutex::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Issues the next identifier.
    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }
}

#[async_trait]
impl AccountManager for InMemoryDirectory {
    async fn register_account(
        &self,
        registration: PersonRegistrationData,
    ) -> Result<AccountData, RegistrationError> {
        let id = self.next_id();
        let person_handle = if registration.handle.trim().is_empty() {
            format!("person-{id}")
        } else {
            registration.handle.trim().to_string()
        };
        let profile = Profile {
            profile_handle: format!("profile-{id}"),
            person_handle: person_handle.clone(),
            name: format!("{} {}", registration.first_name, registration.last_name),
            device_handle: format!("{}-device", self.service_name),
        };
        let mut profiles = self
            .profiles
            .lock()
            .map_err(|_| RegistrationError::Storage("directory lock poisoned".to_string()))?;
        if profiles.contains_key(&person_handle) {
            return Err(RegistrationError::DuplicateHandle(person_handle));
        }
        let account = AccountData {
            person_handle: person_handle.clone(),
            profile_handle: profile.profile_handle.clone(),
        };
        profiles.insert(person_handle, profile);
        Ok(account)
    }
}

#[async_trait]
impl ProfileManager for InMemoryDirectory {
    async fn find_profile_by_handle(&self, handle: &str) -> Option<Profile> {
        self.profiles.lock().ok()?.get(handle).cloned()
    }
}

#[cfg(test)]
mod tests;
