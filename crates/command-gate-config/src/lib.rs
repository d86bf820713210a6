// crates/command-gate-config/src/lib.rs
// ============================================================================
// Module: Command Gate Config Library
// Description: Canonical config model and validation for Command Gate.
// Purpose: Single source of truth for command-gate.toml semantics.
// Dependencies: command-gate-core, serde, toml
// ============================================================================

//! ## Overview
//! `command-gate-config` defines the configuration model for Command Gate
//! with strict, fail-closed validation. Configuration inputs are untrusted;
//! loading enforces size and encoding limits before parsing, and defaults
//! always describe a loopback-only, fail-closed server.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
