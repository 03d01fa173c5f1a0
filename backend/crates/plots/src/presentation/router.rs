//! Plots Router

use crate::domain::repository::PlotRepository;
use crate::infra::postgres::PgPlotRepository;
use crate::presentation::handlers::{self, PlotsAppState};
use auth::{AuthGate, require_admin};
use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
};
use std::sync::Arc;

/// Create the Plots router with PostgreSQL repository
pub fn plots_router(repo: PgPlotRepository, gate: AuthGate) -> Router {
    plots_router_generic(repo, gate)
}

/// Create a generic Plots router for any repository implementation
///
/// Reads are public; writes pass through the bearer-token gate.
pub fn plots_router_generic<R>(repo: R, gate: AuthGate) -> Router
where
    R: PlotRepository + Clone + Send + Sync + 'static,
{
    let state = PlotsAppState {
        repo: Arc::new(repo),
    };
    let admin_only = from_fn_with_state(gate, require_admin);

    Router::new()
        .route(
            "/",
            get(handlers::list_plots::<R>)
                .merge(post(handlers::create_plot::<R>).route_layer(admin_only.clone())),
        )
        .route(
            "/{id}",
            get(handlers::get_plot::<R>)
                .merge(put(handlers::update_plot::<R>).route_layer(admin_only.clone()))
                .merge(delete(handlers::delete_plot::<R>).route_layer(admin_only)),
        )
        .with_state(state)
}
