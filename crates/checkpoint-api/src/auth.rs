//! # Authentication & Authorization
//!
//! Bearer token middleware with role-based access control.
//!
//! ## Token Format
//!
//! ```text
//! Bearer {role}:{user_id}:{secret}   role-scoped caller, user_id may be empty
//! Bearer {secret}                    legacy format, granted every role
//! ```
//!
//! Roles are `customs_officer` and `administrator`. They are disjoint: an
//! administrator cannot act as a customs officer.
//!
//! ## Anonymous Requests
//!
//! A request without an `Authorization` header proceeds with no
//! [`CallerIdentity`]. Open endpoints serve it; role-gated handlers extract
//! `CallerIdentity` and reject it with 401. A header that is present but
//! invalid is rejected with 401 before any handler runs.

use axum::extract::Request;
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use checkpoint_core::UserId;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{AppError, ErrorBody, ErrorDetail};

// ── Role ────────────────────────────────────────────────────────────────────

/// Roles a caller can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Registers crossings, scans documents, authorizes exit.
    CustomsOfficer,
    /// Administers reported anomalies and toll offices.
    Administrator,
}

impl Role {
    /// Every role, for callers granted full access.
    pub const ALL: [Role; 2] = [Role::CustomsOfficer, Role::Administrator];

    /// Return the string representation of this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CustomsOfficer => "customs_officer",
            Self::Administrator => "administrator",
        }
    }

    /// Parse the token representation of a role.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "customs_officer" => Some(Self::CustomsOfficer),
            "administrator" => Some(Self::Administrator),
            _ => None,
        }
    }
}

// ── CallerIdentity ──────────────────────────────────────────────────────────

/// Identity of the authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    /// Roles held by the caller.
    pub roles: Vec<Role>,
    /// The caller's user id, when the token names one.
    pub user_id: Option<UserId>,
}

impl CallerIdentity {
    /// A caller holding every role.
    pub fn superuser() -> Self {
        Self {
            roles: Role::ALL.to_vec(),
            user_id: None,
        }
    }

    /// Whether the caller holds `role`.
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// Extracts the identity the auth middleware injected.
///
/// Returns 401 if no identity is present (anonymous request).
#[axum::async_trait]
impl<S: Send + Sync> axum::extract::FromRequestParts<S> for CallerIdentity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CallerIdentity>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("authentication required".into()))
    }
}

/// Check that the caller holds `role`. Returns 403 Forbidden otherwise.
pub fn require_role(caller: &CallerIdentity, role: Role) -> Result<(), AppError> {
    if caller.has_role(role) {
        return Ok(());
    }
    let held: Vec<&str> = caller.roles.iter().map(Role::as_str).collect();
    Err(AppError::Forbidden(format!(
        "role '{}' required, caller has [{}]",
        role.as_str(),
        held.join(", ")
    )))
}

// ── Auth Configuration ──────────────────────────────────────────────────────

/// Auth configuration injected into request extensions.
///
/// Custom `Debug` redacts the token value.
#[derive(Clone)]
pub struct AuthConfig {
    pub token: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

// ── Token Validation ────────────────────────────────────────────────────────

/// Constant-time comparison of bearer secrets.
///
/// When lengths differ, performs a dummy comparison so the mismatch path
/// costs about the same as the match path.
fn constant_time_token_eq(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();
    if provided.len() != expected.len() {
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}

/// Parse a bearer token in format `{role}:{user_id}:{secret}` or `{secret}`.
pub fn parse_bearer_token(provided: &str, expected_secret: &str) -> Result<CallerIdentity, String> {
    let parts: Vec<&str> = provided.splitn(3, ':').collect();

    match parts.as_slice() {
        [secret] => {
            if constant_time_token_eq(secret, expected_secret) {
                Ok(CallerIdentity::superuser())
            } else {
                Err("invalid bearer token".into())
            }
        }
        [role, user, secret] => {
            if !constant_time_token_eq(secret, expected_secret) {
                return Err("invalid bearer token".into());
            }
            let role = Role::parse(role).ok_or_else(|| format!("unknown role: {role}"))?;
            let user_id = if user.is_empty() {
                None
            } else {
                Some(UserId::from_uuid(
                    user.parse::<Uuid>()
                        .map_err(|e| format!("invalid user_id: {e}"))?,
                ))
            };
            Ok(CallerIdentity {
                roles: vec![role],
                user_id,
            })
        }
        _ => Err("invalid token format, expected {role}:{user_id}:{secret} or {secret}".into()),
    }
}

// ── Middleware ───────────────────────────────────────────────────────────────

/// Validate the bearer token, if any, and inject the [`CallerIdentity`].
///
/// When `AuthConfig.token` is `None`, every request gets full access
/// (auth disabled / development mode).
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let expected_token = request.extensions().get::<AuthConfig>().cloned();

    let Some(AuthConfig {
        token: Some(expected),
    }) = expected_token
    else {
        request.extensions_mut().insert(CallerIdentity::superuser());
        return next.run(request).await;
    };

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .map(|v| v.to_str().unwrap_or_default().to_owned());

    match auth_header.as_deref() {
        None => next.run(request).await,
        Some(value) => match value.strip_prefix("Bearer ") {
            Some(provided) => match parse_bearer_token(provided, &expected) {
                Ok(identity) => {
                    tracing::debug!(roles = ?identity.roles, user_id = ?identity.user_id, "caller authenticated");
                    request.extensions_mut().insert(identity);
                    next.run(request).await
                }
                Err(msg) => {
                    tracing::warn!(reason = %msg, "authentication failed: invalid bearer token");
                    unauthorized_response(&msg)
                }
            },
            None => {
                tracing::warn!("authentication failed: non-Bearer authorization scheme");
                unauthorized_response("authorization header must use Bearer scheme")
            }
        },
    }
}

fn unauthorized_response(message: &str) -> Response {
    let body = ErrorBody {
        error: ErrorDetail {
            code: "UNAUTHORIZED".to_string(),
            message: message.to_string(),
            details: None,
        },
    };
    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}
