//! Auth Middleware
//!
//! Role gate for the areas each account role lands on after login.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::LoginSessionRepository;
use crate::domain::value_object::account_role::AccountRole;
use crate::error::AuthError;
use crate::presentation::session_cookie::session_id_from_headers;

/// Middleware state
pub struct RoleGate<S>
where
    S: LoginSessionRepository + Send + Sync + 'static,
{
    pub sessions: Arc<S>,
    pub config: Arc<AuthConfig>,
    pub role: AccountRole,
}

impl<S> Clone for RoleGate<S>
where
    S: LoginSessionRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            sessions: self.sessions.clone(),
            config: self.config.clone(),
            role: self.role,
        }
    }
}

/// Admit only authenticated sessions of the gate's role
///
/// The account summary is added to the request extensions for downstream
/// handlers.
///
/// ```rust,ignore
/// Router::new()
///     .route("/home", get(handlers::role_home))
///     .layer(axum::middleware::from_fn_with_state(
///         state.role_gate(AccountRole::TeamLead),
///         require_role::<MemoryLoginSessionStore>,
///     ))
/// ```
pub async fn require_role<S>(
    State(gate): State<RoleGate<S>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError>
where
    S: LoginSessionRepository + Send + Sync + 'static,
{
    let session_id =
        session_id_from_headers(req.headers(), &gate.config).ok_or(AuthError::NotAuthenticated)?;

    let session = gate
        .sessions
        .load(&session_id)
        .await?
        .ok_or(AuthError::SessionInvalid)?;

    let account = session
        .account()
        .cloned()
        .ok_or(AuthError::NotAuthenticated)?;

    if account.role != gate.role {
        return Err(AuthError::Forbidden {
            required: gate.role,
        });
    }

    req.extensions_mut().insert(account);
    Ok(next.run(req).await)
}
