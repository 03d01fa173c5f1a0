//! Auth Router

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::token::TokenService;
use crate::domain::repository::AdminUserRepository;
use crate::infra::postgres::PgAdminRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{AuthGate, require_admin};

/// Create the Auth router with PostgreSQL repository
pub fn auth_router(repo: PgAdminRepository, tokens: Arc<TokenService>) -> Router {
    auth_router_generic(repo, tokens)
}

/// Create a generic Auth router for any repository implementation
pub fn auth_router_generic<R>(repo: R, tokens: Arc<TokenService>) -> Router
where
    R: AdminUserRepository + Clone + Send + Sync + 'static,
{
    let gate = AuthGate::new(tokens.clone());
    let state = AuthAppState {
        repo: Arc::new(repo),
        tokens,
    };

    Router::new()
        .route("/login", post(handlers::login::<R>))
        .route(
            "/verify",
            get(handlers::verify).route_layer(from_fn_with_state(gate, require_admin)),
        )
        .with_state(state)
}
