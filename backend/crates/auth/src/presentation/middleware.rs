//! Auth Middleware
//!
//! Bearer-token gate for protected routes.

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Request};
use axum::middleware::Next;
use axum::response::Response;
use platform::bearer::extract_bearer;
use std::sync::Arc;

use crate::application::token::TokenService;
use crate::domain::claims::AdminClaims;
use crate::error::{AuthError, AuthResult};

/// Middleware state
#[derive(Clone)]
pub struct AuthGate {
    tokens: Arc<TokenService>,
}

impl AuthGate {
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self { tokens }
    }

    /// Verify the `Authorization: Bearer` header
    pub fn authorize(&self, headers: &HeaderMap) -> AuthResult<AdminClaims> {
        let token = extract_bearer(headers)?;
        self.tokens.verify(token)
    }
}

/// Middleware that requires a valid session token
///
/// Rejects with 401 before the handler runs; on success the verified
/// [`AdminClaims`] are available as an `Extension`.
pub async fn require_admin(
    State(gate): State<AuthGate>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let claims = gate.authorize(req.headers())?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
