//! HTTP Handlers

use axum::extract::State;
use axum::{Extension, Json};
use kernel::extract::ApiJson;
use platform::password::ClearTextPassword;
use std::sync::Arc;

use crate::application::{LoginInput, LoginUseCase, TokenService};
use crate::domain::claims::AdminClaims;
use crate::domain::repository::AdminUserRepository;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{AdminUserView, LoginRequest, LoginResponse, VerifyResponse};

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: AdminUserRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub tokens: Arc<TokenService>,
}

/// POST /api/auth/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> AuthResult<Json<LoginResponse>>
where
    R: AdminUserRepository + Clone + Send + Sync + 'static,
{
    let (username, password) = req.validate().map_err(AuthError::Validation)?;

    let use_case = LoginUseCase::new(state.repo.clone(), state.tokens.clone());

    let output = use_case
        .execute(LoginInput {
            username,
            password: ClearTextPassword::new(password),
        })
        .await?;

    Ok(Json(LoginResponse {
        success: true,
        message: "Login successful",
        token: output.token,
        user: AdminUserView::from(&output.user),
    }))
}

/// GET /api/auth/verify
///
/// Mounted behind [`require_admin`](crate::presentation::middleware::require_admin),
/// which has already checked the bearer token.
pub async fn verify(Extension(claims): Extension<AdminClaims>) -> Json<VerifyResponse> {
    Json(VerifyResponse {
        success: true,
        user: claims,
    })
}
