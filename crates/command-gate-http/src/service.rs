// crates/command-gate-http/src/service.rs
// ============================================================================
// Module: Registration Service
// Description: Application service methods exposed through the router.
// Purpose: Provide the registration and profile-lookup command handlers.
// Dependencies: command-gate-core, serde_json
// ============================================================================

//! ## Overview
//! The registration service is the one declaring type wired into the
//! dispatch table. Its handlers are thin wrappers over the external
//! [`AccountManager`] and [`ProfileManager`] collaborators; all policy
//! lives in the security declarations returned by
//! [`RegistrationService::security_registry`].
//!
//! ## Invariants
//! - `RegisterPerson` is anonymous and requires an encrypted transport.
//! - `GetProfile` is anonymous and carries no encryption requirement.
//! - A profile lookup miss returns JSON `null`, never an error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use command_gate_core::AccessLevel;
use command_gate_core::AccountManager;
use command_gate_core::CommandDescriptor;
use command_gate_core::PersonRegistrationData;
use command_gate_core::ProfileManager;
use command_gate_core::ProfileView;
use command_gate_core::RegistrationError;
use command_gate_core::SecurityRegistry;
use serde_json::Value;

// ============================================================================
// SECTION: Service Methods
// ============================================================================

/// Finite set of operations the router can dispatch for the registration
/// service. This is the static dispatch table, not reflection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceMethod {
    /// Registers a person account.
    RegisterPerson,
    /// Looks up a profile by person handle.
    GetProfile,
}

impl ServiceMethod {
    /// Parses a wire method name; `None` for unknown operations.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "RegisterPerson" => Some(Self::RegisterPerson),
            "GetProfile" => Some(Self::GetProfile),
            _ => None,
        }
    }

    /// Returns the wire method name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RegisterPerson => "RegisterPerson",
            Self::GetProfile => "GetProfile",
        }
    }
}

// ============================================================================
// SECTION: Registration Service
// ============================================================================

/// Application service for person registration and profile lookup.
#[derive(Clone)]
pub struct RegistrationService {
    /// External account registration collaborator.
    account_manager: Arc<dyn AccountManager>,
    /// External profile lookup collaborator.
    profile_manager: Arc<dyn ProfileManager>,
}

impl RegistrationService {
    /// Declaring type name used for metadata lookup and whitelisting.
    pub const TYPE_NAME: &'static str = "RegistrationService";

    /// Builds the service from its external collaborators.
    #[must_use]
    pub fn new(
        account_manager: Arc<dyn AccountManager>,
        profile_manager: Arc<dyn ProfileManager>,
    ) -> Self {
        Self {
            account_manager,
            profile_manager,
        }
    }

    /// Returns the declarative security registry for this service.
    ///
    /// Stands in for the originating system's method attributes: the type
    /// declares `Execute` as its required level, and both methods carry an
    /// anonymous-access marker (registration additionally requires an
    /// encrypted transport).
    #[must_use]
    pub fn security_registry() -> SecurityRegistry {
        SecurityRegistry::new()
            .declare_type(Self::TYPE_NAME, AccessLevel::Execute)
            .declare_anonymous(Self::descriptor(ServiceMethod::RegisterPerson), true)
            .declare_anonymous(Self::descriptor(ServiceMethod::GetProfile), false)
    }

    /// Returns the command descriptor for one of this service's methods.
    #[must_use]
    pub fn descriptor(method: ServiceMethod) -> CommandDescriptor {
        CommandDescriptor::new(Self::TYPE_NAME, method.as_str())
    }

    /// Registers a person account and returns the issued account data.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError`] when the account manager rejects the
    /// registration (for example, a duplicate handle).
    pub async fn register_person(
        &self,
        first_name: String,
        last_name: String,
        email: String,
        phone: String,
        handle: String,
    ) -> Result<Value, RegistrationError> {
        let registration = PersonRegistrationData {
            first_name,
            last_name,
            email,
            phone,
            handle,
        };
        let account = self.account_manager.register_account(registration).await?;
        serde_json::to_value(account)
            .map_err(|err| RegistrationError::Storage(err.to_string()))
    }

    /// Looks up a profile by person handle; JSON `null` when absent.
    pub async fn get_profile(&self, handle: &str) -> Value {
        match self.profile_manager.find_profile_by_handle(handle).await {
            Some(profile) => {
                serde_json::to_value(ProfileView::from(&profile)).unwrap_or(Value::Null)
            }
            None => Value::Null,
        }
    }
}
