// crates/command-gate-config/src/config.rs
// ============================================================================
// Module: Command Gate Configuration
// Description: Configuration loading and validation for Command Gate.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: command-gate-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path
//! limits. Missing or invalid configuration fails closed: the defaults bind
//! to loopback, whitelist only the registration service, and report
//! [`AccessLevel::Denied`] for unauthenticated callers.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;

use command_gate_core::AccessLevel;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "command-gate.toml";
/// Environment variable used to override the config path.
pub(crate) const CONFIG_ENV_VAR: &str = "COMMAND_GATE_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum number of whitelist entries.
pub(crate) const MAX_WHITELIST_ENTRIES: usize = 64;
/// Maximum length of a whitelisted type name.
pub(crate) const MAX_TYPE_NAME_LENGTH: usize = 256;
/// Default bind address (loopback only).
const DEFAULT_BIND: &str = "127.0.0.1:8080";
/// Default maximum request body size in bytes.
const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;
/// Default service name used for issued device handles.
const DEFAULT_SERVICE_NAME: &str = "command-gate";
/// Default whitelisted declaring type.
const DEFAULT_WHITELIST_TYPE: &str = "RegistrationService";

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Command Gate configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommandGateConfig {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Service identity configuration.
    #[serde(default)]
    pub service: ServiceConfig,
    /// Authorization surface configuration.
    #[serde(default)]
    pub security: SecurityConfig,
}

impl CommandGateConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// Resolution order: explicit `path`, the `COMMAND_GATE_CONFIG`
    /// environment variable, then `command-gate.toml` in the working
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.service.validate()?;
        self.security.validate()?;
        Ok(())
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Socket address to bind.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Maximum allowed request body size in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    /// Treat every request as transport-encrypted (TLS terminated upstream).
    ///
    /// When false, encryption is inferred per request from the
    /// `x-forwarded-proto` header set by a trusted proxy.
    #[serde(default)]
    pub assume_encrypted: bool,
}

impl ServerConfig {
    /// Validates server settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.bind.trim().is_empty() {
            return Err(ConfigError::Invalid("server.bind must be non-empty".to_string()));
        }
        self.bind
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::Invalid("server.bind must be a socket address".to_string()))?;
        if self.max_body_bytes == 0 {
            return Err(ConfigError::Invalid("server.max_body_bytes must be > 0".to_string()));
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_body_bytes: default_max_body_bytes(),
            assume_encrypted: false,
        }
    }
}

/// Service identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Service name, used for issued device handles and audit labels.
    #[serde(default = "default_service_name")]
    pub name: String,
}

impl ServiceConfig {
    /// Validates service settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Invalid("service.name must be non-empty".to_string()));
        }
        Ok(())
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
        }
    }
}

/// Authorization surface configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    /// Declaring type names eligible for generic invocation.
    #[serde(default = "default_whitelist")]
    pub whitelist: Vec<String>,
    /// Access level reported for callers with no session identity.
    #[serde(default)]
    pub anonymous_caller_level: AccessLevel,
}

impl SecurityConfig {
    /// Validates the invocation whitelist.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.whitelist.len() > MAX_WHITELIST_ENTRIES {
            return Err(ConfigError::Invalid("security.whitelist has too many entries".to_string()));
        }
        for entry in &self.whitelist {
            let trimmed = entry.trim();
            if trimmed.is_empty() {
                return Err(ConfigError::Invalid(
                    "security.whitelist entries must be non-empty".to_string(),
                ));
            }
            if trimmed.len() > MAX_TYPE_NAME_LENGTH {
                return Err(ConfigError::Invalid(
                    "security.whitelist entry exceeds max length".to_string(),
                ));
            }
        }
        Ok(())
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            whitelist: default_whitelist(),
            anonymous_caller_level: AccessLevel::Denied,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Default bind address.
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

/// Default maximum body size.
const fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

/// Default service name.
fn default_service_name() -> String {
    DEFAULT_SERVICE_NAME.to_string()
}

/// Default invocation whitelist.
fn default_whitelist() -> Vec<String> {
    vec![DEFAULT_WHITELIST_TYPE.to_string()]
}
