// crates/command-gate-core/src/core/mod.rs
// ============================================================================
// Module: Core Calculus
// Description: Access levels, command descriptors, metadata, and authorization.
// Purpose: Group the pure decision-logic modules of Command Gate.
// Dependencies: serde, async-trait
// ============================================================================

//! ## Overview
//! The core calculus modules. Everything here is deterministic for identical
//! inputs; the only external call is the access-level provider consulted by
//! [`authorization::AuthorizationCalculator`].

pub mod access;
pub mod authorization;
pub mod command;
pub mod metadata;
