// crates/command-gate-core/src/core/command.rs
// ============================================================================
// Module: Command Descriptors
// Description: (type, method) command identity and wire identifier parsing.
// Purpose: Provide the lookup key for security metadata and dispatch.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! A [`CommandDescriptor`] names a target operation by declaring-type name
//! and method name. It is the key under which security metadata is declared
//! and the parsed form of a wire operation identifier
//! `"<type><sep><method>"`, where the separator is `+` or `,`.
//!
//! ## Invariants
//! - Identity is structural equality on both fields.
//! - Parsing takes the first two non-empty trimmed segments; extra segments
//!   are ignored.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Command Descriptor
// ============================================================================

/// Identity of a dispatchable operation: declaring type plus method.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CommandDescriptor {
    /// Declaring type name (whitelist unit).
    declaring_type: String,
    /// Method name within the declaring type.
    method: String,
}

impl CommandDescriptor {
    /// Builds a descriptor from a declaring type and method name.
    #[must_use]
    pub fn new(declaring_type: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            declaring_type: declaring_type.into(),
            method: method.into(),
        }
    }

    /// Parses a wire operation identifier.
    ///
    /// The identifier splits on `+` or `,`; the first two non-empty trimmed
    /// segments become the declaring type and method. Extra segments are
    /// ignored for forward compatibility with richer addresses.
    ///
    /// # Errors
    ///
    /// Returns [`OperationIdentifierError`] when the identifier is empty or
    /// yields fewer than two non-empty segments.
    pub fn parse_operation(identifier: &str) -> Result<Self, OperationIdentifierError> {
        if identifier.trim().is_empty() {
            return Err(OperationIdentifierError::Empty);
        }
        let mut segments = identifier
            .split(['+', ','])
            .map(str::trim)
            .filter(|segment| !segment.is_empty());
        let declaring_type = segments.next().ok_or(OperationIdentifierError::MissingSegments)?;
        let method = segments.next().ok_or(OperationIdentifierError::MissingSegments)?;
        Ok(Self::new(declaring_type, method))
    }

    /// Returns the declaring type name.
    #[must_use]
    pub fn declaring_type(&self) -> &str {
        &self.declaring_type
    }

    /// Returns the method name.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }
}

impl fmt::Display for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}", self.declaring_type, self.method)
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Wire operation identifier parse failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OperationIdentifierError {
    /// Identifier was empty or whitespace.
    #[error("operation identifier is empty")]
    Empty,
    /// Identifier yielded fewer than two non-empty segments.
    #[error("operation identifier must contain a type and a method")]
    MissingSegments,
}

#[cfg(test)]
mod tests;
