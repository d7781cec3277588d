//! Auth Router

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::domain::repository::{AccountRepository, LoginSessionRepository, RosterRepository};
use crate::domain::value_object::account_role::AccountRole;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::require_role;

/// Login, logout and registration routes (mount at `/api/auth`)
pub fn auth_router<R, S>(state: AuthAppState<R, S>) -> Router
where
    R: AccountRepository + RosterRepository + Send + Sync + 'static,
    S: LoginSessionRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/identify", post(handlers::identify::<R, S>))
        .route("/login", post(handlers::login::<R, S>))
        .route("/status", get(handlers::status::<R, S>))
        .route("/logout", post(handlers::logout::<R, S>))
        .route("/register", post(handlers::register::<R, S>))
        .with_state(state)
}

/// Area reserved for `role` (mount at the role's home path under `/api`)
pub fn role_router<R, S>(state: &AuthAppState<R, S>, role: AccountRole) -> Router
where
    R: AccountRepository + RosterRepository + Send + Sync + 'static,
    S: LoginSessionRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/home", get(handlers::role_home))
        .layer(middleware::from_fn_with_state(
            state.role_gate(role),
            require_role::<S>,
        ))
}

/// Everything under `/api`: login flow plus one area per role
pub fn api_router<R, S>(state: AuthAppState<R, S>) -> Router
where
    R: AccountRepository + RosterRepository + Send + Sync + 'static,
    S: LoginSessionRepository + Send + Sync + 'static,
{
    Router::new()
        .nest("/api/qualifier", role_router(&state, AccountRole::Qualifier))
        .nest("/api/team-lead", role_router(&state, AccountRole::TeamLead))
        .nest("/api/auth", auth_router(state))
}
