// crates/command-gate-http/src/server.rs
// ============================================================================
// Module: HTTP Server
// Description: axum HTTP transport for registration and generic invocation.
// Purpose: Expose the wire contracts and map errors to transport results.
// Dependencies: command-gate-core, command-gate-config, axum, tokio
// ============================================================================

//! ## Overview
//! The HTTP server exposes three endpoints: `POST /api/register`,
//! `GET /api/profile/{handle}`, and the generic invocation endpoint
//! `POST /api/invoke` which routes through
//! [`crate::router::InvocationRouter`]. Request bodies are size-limited
//! before parsing and every failure is returned as `{"error": message}`
//! with a coarse status classification.
//!
//! ## Invariants
//! - Registration validation rejects blank names before the account manager
//!   is consulted.
//! - Transport encryption status comes from configuration or the
//!   `x-forwarded-proto` header set by a trusted proxy; it is never inferred
//!   from anything the untrusted caller controls alone.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::ConnectInfo;
use axum::extract::Path;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::routing::post;
use command_gate_config::CommandGateConfig;
use command_gate_core::AccessLevelProvider;
use command_gate_core::AccountManager;
use command_gate_core::AuthorizationCalculator;
use command_gate_core::PersonRegistrationData;
use command_gate_core::ProfileManager;
use command_gate_core::ProfileView;
use command_gate_core::SecurityMetadataResolver;
use serde::Deserialize;
use serde_json::Value;
use serde_json::json;
use thiserror::Error;

use crate::audit::AuditSink;
use crate::router::CallerContext;
use crate::router::InvocationError;
use crate::router::InvocationRequest;
use crate::router::InvocationRouter;
use crate::service::RegistrationService;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Validation message for missing registration names.
const NAMES_REQUIRED: &str = "FirstName and LastName are required";
/// Not-found message for profile lookups.
const PROFILE_NOT_FOUND: &str = "Profile not found";

// ============================================================================
// SECTION: HTTP Server
// ============================================================================

/// HTTP server instance.
pub struct HttpServer {
    /// Validated server configuration.
    config: CommandGateConfig,
    /// Shared handler state.
    state: Arc<ServerState>,
}

impl HttpServer {
    /// Builds a server from configuration and explicit collaborators.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when the configuration is invalid.
    pub fn from_config(
        config: CommandGateConfig,
        account_manager: Arc<dyn AccountManager>,
        profile_manager: Arc<dyn ProfileManager>,
        access_provider: Arc<dyn AccessLevelProvider>,
        audit: Arc<dyn AuditSink>,
    ) -> Result<Self, ServerError> {
        config.validate().map_err(|err| ServerError::Config(err.to_string()))?;
        let resolver = Arc::new(SecurityMetadataResolver::new(
            RegistrationService::security_registry(),
        ));
        let calculator = Arc::new(AuthorizationCalculator::new(resolver, access_provider));
        let service =
            RegistrationService::new(account_manager.clone(), profile_manager.clone());
        let whitelist =
            config.security.whitelist.iter().map(|entry| entry.trim().to_string()).collect();
        let router = InvocationRouter::new(calculator, service, whitelist, audit);
        let state = Arc::new(ServerState {
            router,
            account_manager,
            profile_manager,
            max_body_bytes: config.server.max_body_bytes,
            assume_encrypted: config.server.assume_encrypted,
        });
        Ok(Self {
            config,
            state,
        })
    }

    /// Returns the invocation router backing `/api/invoke`.
    #[must_use]
    pub fn invocation_router(&self) -> &InvocationRouter {
        &self.state.router
    }

    /// Serves requests until the process is stopped.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when binding or serving fails.
    pub async fn serve(self) -> Result<(), ServerError> {
        self.serve_with_shutdown(std::future::pending()).await
    }

    /// Serves requests until `shutdown` resolves, then drains in-flight
    /// handlers to completion.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when binding or serving fails.
    pub async fn serve_with_shutdown(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), ServerError> {
        let addr: SocketAddr = self
            .config
            .server
            .bind
            .parse()
            .map_err(|_| ServerError::Config("invalid bind address".to_string()))?;
        let app = build_app(self.state);
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|_| ServerError::Transport("http bind failed".to_string()))?;
        axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|_| ServerError::Transport("http server failed".to_string()))
    }
}

/// Shared handler state.
struct ServerState {
    /// Invocation router for the generic endpoint.
    router: InvocationRouter,
    /// Account registration collaborator for the direct endpoint.
    account_manager: Arc<dyn AccountManager>,
    /// Profile lookup collaborator for the direct endpoint.
    profile_manager: Arc<dyn ProfileManager>,
    /// Maximum allowed request body size.
    max_body_bytes: usize,
    /// Treat every request as transport-encrypted.
    assume_encrypted: bool,
}

/// Builds the axum application router.
fn build_app(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/api/register", post(handle_register))
        .route("/api/profile/{handle}", get(handle_profile))
        .route("/api/invoke", post(handle_invoke))
        .with_state(state)
}

// ============================================================================
// SECTION: Wire Shapes
// ============================================================================

/// Registration request body.
#[derive(Debug, Deserialize)]
struct PersonRegistrationRequest {
    /// Given name (required).
    #[serde(rename = "firstName", default)]
    first_name: String,
    /// Family name (required).
    #[serde(rename = "lastName", default)]
    last_name: String,
    /// Contact email.
    #[serde(default)]
    email: String,
    /// Contact phone.
    #[serde(default)]
    phone: String,
    /// Requested person handle.
    #[serde(default)]
    handle: String,
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Handles `POST /api/register`.
async fn handle_register(
    State(state): State<Arc<ServerState>>,
    bytes: Bytes,
) -> impl IntoResponse {
    if bytes.len() > state.max_body_bytes {
        return error_response(StatusCode::PAYLOAD_TOO_LARGE, "request body too large");
    }
    let Ok(request) = serde_json::from_slice::<PersonRegistrationRequest>(&bytes) else {
        return error_response(StatusCode::BAD_REQUEST, NAMES_REQUIRED);
    };
    if request.first_name.trim().is_empty() || request.last_name.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, NAMES_REQUIRED);
    }
    let registration = PersonRegistrationData {
        first_name: request.first_name,
        last_name: request.last_name,
        email: request.email,
        phone: request.phone,
        handle: request.handle,
    };
    match state.account_manager.register_account(registration).await {
        Ok(account) => (
            StatusCode::OK,
            axum::Json(json!({
                "personHandle": account.person_handle,
            })),
        ),
        Err(err) => error_response(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string()),
    }
}

/// Handles `GET /api/profile/{handle}`.
async fn handle_profile(
    State(state): State<Arc<ServerState>>,
    Path(handle): Path<String>,
) -> impl IntoResponse {
    match state.profile_manager.find_profile_by_handle(&handle).await {
        Some(profile) => (StatusCode::OK, axum::Json(json!(ProfileView::from(&profile)))),
        None => error_response(StatusCode::NOT_FOUND, PROFILE_NOT_FOUND),
    }
}

/// Handles `POST /api/invoke`.
async fn handle_invoke(
    State(state): State<Arc<ServerState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    bytes: Bytes,
) -> impl IntoResponse {
    if bytes.len() > state.max_body_bytes {
        return error_response(StatusCode::PAYLOAD_TOO_LARGE, "request body too large");
    }
    let Ok(request) = serde_json::from_slice::<InvocationRequest>(&bytes) else {
        return error_response(StatusCode::BAD_REQUEST, "invalid invocation request");
    };
    let caller = CallerContext::anonymous()
        .with_encrypted_transport(transport_encrypted(state.assume_encrypted, &headers))
        .with_peer_ip(peer.ip());
    match state.router.invoke(&caller, &request).await {
        Ok(value) => (StatusCode::OK, axum::Json(value)),
        Err(err) => error_response(error_status(&err), &err.to_string()),
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds a JSON error response body.
fn error_response(status: StatusCode, message: &str) -> (StatusCode, axum::Json<Value>) {
    (
        status,
        axum::Json(json!({
            "error": message,
        })),
    )
}

/// Maps invocation errors to the coarse wire status classification.
pub(crate) const fn error_status(error: &InvocationError) -> StatusCode {
    match error {
        InvocationError::MalformedIdentifier(_)
        | InvocationError::MissingArgument(_)
        | InvocationError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
        InvocationError::Forbidden(_)
        | InvocationError::Unauthorized(_)
        | InvocationError::EncryptionRequired(_) => StatusCode::FORBIDDEN,
        InvocationError::UnknownOperation(_) | InvocationError::HandlerFailure(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Determines whether the caller's transport counts as encrypted.
pub(crate) fn transport_encrypted(assume_encrypted: bool, headers: &HeaderMap) -> bool {
    if assume_encrypted {
        return true;
    }
    headers
        .get("x-forwarded-proto")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.eq_ignore_ascii_case("https"))
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Invalid server configuration.
    #[error("server config error: {0}")]
    Config(String),
    /// Transport-level failure while binding or serving.
    #[error("server transport error: {0}")]
    Transport(String),
}
