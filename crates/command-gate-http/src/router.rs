// crates/command-gate-http/src/router.rs
// ============================================================================
// Module: Invocation Router
// Description: String-addressed command dispatch with argument binding.
// Purpose: Resolve wire operation identifiers to whitelisted handlers.
// Dependencies: command-gate-core, serde, serde_json
// ============================================================================

//! ## Overview
//! The invocation router turns a wire-level [`InvocationRequest`] into a
//! handler call. The pipeline is strictly ordered and fail-closed:
//! identifier parsing, whitelist membership, static dispatch-table lookup,
//! authorization, encryption gate, argument binding, handler invocation.
//! The first failing check terminates the request; nothing is retried.
//!
//! ## Layer Responsibilities
//! - Bound the invocation surface with a hard type whitelist, independent of
//!   the authorization calculus.
//! - Bind named arguments case-insensitively with coarse, stable errors.
//! - Downgrade every handler fault to [`InvocationError::HandlerFailure`] so
//!   no internal detail crosses the transport boundary.
//!
//! ## Invariants
//! - Malformed-identifier and whitelist checks run before any authorization
//!   work.
//! - No lock is held across the provider call or the handler invocation.
//! - Once the handler has been invoked it is awaited to completion.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::net::IpAddr;
use std::sync::Arc;

use command_gate_core::AuthorizationCalculator;
use command_gate_core::CommandDescriptor;
use command_gate_core::RequestContext;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::audit::AuditSink;
use crate::audit::InvocationAuditEvent;
use crate::service::RegistrationService;
use crate::service::ServiceMethod;

// ============================================================================
// SECTION: Wire Shapes
// ============================================================================

/// One named argument carried by an invocation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvocationArgument {
    /// Parameter name; matched case-insensitively.
    pub name: String,
    /// Opaque scalar value already decoded from the wire format.
    #[serde(default)]
    pub value: Value,
}

/// Wire-level invocation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvocationRequest {
    /// Operation identifier, `"<type><sep><method>"` with `+` or `,`.
    #[serde(default)]
    pub operation: String,
    /// Named arguments in the caller's original order.
    #[serde(default)]
    pub arguments: Vec<InvocationArgument>,
}

/// Transport-level caller attributes accompanying an invocation.
#[derive(Debug, Clone, Default)]
pub struct CallerContext {
    /// Caller subject or session identifier, when one exists.
    pub subject: Option<String>,
    /// Whether the caller's transport is confirmed encrypted.
    pub transport_encrypted: bool,
    /// Peer IP address when available.
    pub peer_ip: Option<IpAddr>,
    /// Optional request identifier for auditing.
    pub request_id: Option<String>,
}

impl CallerContext {
    /// Builds an anonymous caller context over an unencrypted transport.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Returns a copy with the transport-encrypted flag set.
    #[must_use]
    pub const fn with_encrypted_transport(mut self, encrypted: bool) -> Self {
        self.transport_encrypted = encrypted;
        self
    }

    /// Returns a copy with the peer address set.
    #[must_use]
    pub const fn with_peer_ip(mut self, peer_ip: IpAddr) -> Self {
        self.peer_ip = Some(peer_ip);
        self
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Invocation routing errors.
///
/// Kinds are intentionally coarse so callers cannot distinguish more about
/// the dispatch surface than each kind already reveals.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvocationError {
    /// Operation identifier was empty or had fewer than two segments.
    #[error("malformed operation identifier: {0}")]
    MalformedIdentifier(String),
    /// Declaring type is not whitelisted for invocation.
    #[error("type not invocable: {0}")]
    Forbidden(String),
    /// Method is not in the dispatch table for the type.
    #[error("unknown operation: {0}")]
    UnknownOperation(String),
    /// Caller's access level does not meet the requirement.
    #[error("access denied: {0}")]
    Unauthorized(String),
    /// Operation requires an encrypted transport.
    #[error("encrypted transport required: {0}")]
    EncryptionRequired(String),
    /// A required argument was not supplied.
    #[error("missing argument: {0}")]
    MissingArgument(String),
    /// An argument was present but not the expected scalar shape.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The handler itself failed; carries the downstream message only.
    #[error("handler failure: {0}")]
    HandlerFailure(String),
}

// ============================================================================
// SECTION: Argument Binding
// ============================================================================

/// Case-insensitive view over the request arguments.
struct ArgumentSet<'a> {
    /// Arguments in the caller's original wire order.
    arguments: &'a [InvocationArgument],
}

impl<'a> ArgumentSet<'a> {
    /// Wraps the request arguments.
    const fn new(arguments: &'a [InvocationArgument]) -> Self {
        Self {
            arguments,
        }
    }

    /// Finds the first argument matching `name` case-insensitively.
    fn find(&self, name: &str) -> Option<&'a Value> {
        self.arguments
            .iter()
            .find(|argument| argument.name.eq_ignore_ascii_case(name))
            .map(|argument| &argument.value)
    }

    /// Binds a required string parameter.
    fn required(&self, name: &str) -> Result<String, InvocationError> {
        match self.find(name) {
            None | Some(Value::Null) => Err(InvocationError::MissingArgument(name.to_string())),
            Some(Value::String(text)) => Ok(text.clone()),
            Some(_) => Err(InvocationError::InvalidArgument(name.to_string())),
        }
    }

    /// Binds an optional string parameter; absent values default to empty.
    fn optional(&self, name: &str) -> Result<String, InvocationError> {
        match self.find(name) {
            None | Some(Value::Null) => Ok(String::new()),
            Some(Value::String(text)) => Ok(text.clone()),
            Some(_) => Err(InvocationError::InvalidArgument(name.to_string())),
        }
    }
}

// ============================================================================
// SECTION: Invocation Router
// ============================================================================

/// Router from wire operation identifiers to whitelisted handlers.
#[derive(Clone)]
pub struct InvocationRouter {
    /// Authorization decision engine.
    calculator: Arc<AuthorizationCalculator>,
    /// Registration service handlers.
    service: RegistrationService,
    /// Declaring type names eligible for invocation.
    whitelist: BTreeSet<String>,
    /// Audit sink for allow/deny decisions.
    audit: Arc<dyn AuditSink>,
}

impl InvocationRouter {
    /// Builds a router from explicit dependencies.
    #[must_use]
    pub fn new(
        calculator: Arc<AuthorizationCalculator>,
        service: RegistrationService,
        whitelist: BTreeSet<String>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            calculator,
            service,
            whitelist,
            audit,
        }
    }

    /// Routes one invocation request through the full pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`InvocationError`] with the first failing check; see the
    /// module overview for the check order.
    pub async fn invoke(
        &self,
        caller: &CallerContext,
        request: &InvocationRequest,
    ) -> Result<Value, InvocationError> {
        let command = match CommandDescriptor::parse_operation(&request.operation) {
            Ok(command) => command,
            Err(err) => {
                let error = InvocationError::MalformedIdentifier(err.to_string());
                self.audit.record(&InvocationAuditEvent::rejected(&request.operation, &error));
                return Err(error);
            }
        };

        let ctx = self.request_context(caller, command);
        let outcome = self.route(&ctx, request).await;
        match &outcome {
            Ok(_) => self.audit.record(&InvocationAuditEvent::allowed(&ctx)),
            Err(error) => self.audit.record(&InvocationAuditEvent::denied(&ctx, error)),
        }
        outcome
    }

    /// Runs the checks that follow identifier parsing.
    async fn route(
        &self,
        ctx: &RequestContext,
        request: &InvocationRequest,
    ) -> Result<Value, InvocationError> {
        let command = &ctx.command;
        if !self.whitelist.contains(command.declaring_type()) {
            return Err(InvocationError::Forbidden(command.declaring_type().to_string()));
        }
        // The dispatch table is per declaring type; a whitelisted type with
        // no registered handlers has no invocable operations.
        let method = (command.declaring_type() == RegistrationService::TYPE_NAME)
            .then(|| ServiceMethod::parse(command.method()))
            .flatten()
            .ok_or_else(|| InvocationError::UnknownOperation(command.to_string()))?;

        let authorization = self.calculator.calculate_authorization(ctx).await;
        if !authorization.is_granted() {
            return Err(InvocationError::Unauthorized(command.to_string()));
        }
        if self.calculator.resolver().is_encryption_required(command) && !ctx.transport_encrypted {
            return Err(InvocationError::EncryptionRequired(command.to_string()));
        }

        self.dispatch(method, &ArgumentSet::new(&request.arguments)).await
    }

    /// Binds arguments and invokes the resolved handler.
    async fn dispatch(
        &self,
        method: ServiceMethod,
        arguments: &ArgumentSet<'_>,
    ) -> Result<Value, InvocationError> {
        match method {
            ServiceMethod::RegisterPerson => {
                let first_name = arguments.required("firstName")?;
                let last_name = arguments.required("lastName")?;
                let email = arguments.optional("email")?;
                let phone = arguments.optional("phone")?;
                let handle = arguments.optional("handle")?;
                self.service
                    .register_person(first_name, last_name, email, phone, handle)
                    .await
                    .map_err(|err| InvocationError::HandlerFailure(err.to_string()))
            }
            ServiceMethod::GetProfile => {
                let handle = arguments.required("handle")?;
                Ok(self.service.get_profile(&handle).await)
            }
        }
    }

    /// Builds the calculus request context for a resolved command.
    fn request_context(&self, caller: &CallerContext, command: CommandDescriptor) -> RequestContext {
        let mut ctx = RequestContext::for_command(command)
            .with_encrypted_transport(caller.transport_encrypted);
        if let Some(subject) = &caller.subject {
            ctx = ctx.with_subject(subject.clone());
        }
        if let Some(request_id) = &caller.request_id {
            ctx = ctx.with_request_id(request_id.clone());
        }
        ctx.peer_ip = caller.peer_ip;
        ctx
    }
}
