//! HTTP Handlers
//!
//! Login steps always answer `200` with a `LoginOutcome`; only
//! infrastructure failures and malformed requests become errors.

use axum::extract::{Extension, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::Json;
use kernel::id::LoginSessionId;
use platform::clock::Clock;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    CheckLockoutUseCase, IdentifyInput, IdentifyUseCase, RegisterInput, RegisterUseCase,
    SignOutUseCase, SubmitPasswordInput, SubmitPasswordUseCase,
};
use crate::domain::entity::account::AccountSummary;
use crate::domain::entity::login_session::{LoginSession, LoginState};
use crate::domain::repository::{AccountRepository, LoginSessionRepository, RosterRepository};
use crate::domain::value_object::account_role::AccountRole;
use crate::error::AuthResult;
use crate::presentation::dto::{IdentifyRequest, LoginRequest, RegisterRequest, RegisterResponse};
use crate::presentation::middleware::RoleGate;
use crate::presentation::session_cookie::{
    build_clear_cookie, build_session_cookie, session_id_from_headers,
};

/// Shared state for auth handlers
pub struct AuthAppState<R, S>
where
    R: AccountRepository + RosterRepository + Send + Sync + 'static,
    S: LoginSessionRepository + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub sessions: Arc<S>,
    pub clock: Arc<dyn Clock>,
    pub config: Arc<AuthConfig>,
}

impl<R, S> AuthAppState<R, S>
where
    R: AccountRepository + RosterRepository + Send + Sync + 'static,
    S: LoginSessionRepository + Send + Sync + 'static,
{
    pub fn new(repo: Arc<R>, sessions: Arc<S>, clock: Arc<dyn Clock>, config: Arc<AuthConfig>) -> Self {
        Self {
            repo,
            sessions,
            clock,
            config,
        }
    }

    /// Middleware state admitting only `role`
    pub fn role_gate(&self, role: AccountRole) -> RoleGate<S> {
        RoleGate {
            sessions: self.sessions.clone(),
            config: self.config.clone(),
            role,
        }
    }
}

// Manual impl: a derive would require `R: Clone` and `S: Clone`
impl<R, S> Clone for AuthAppState<R, S>
where
    R: AccountRepository + RosterRepository + Send + Sync + 'static,
    S: LoginSessionRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            sessions: self.sessions.clone(),
            clock: self.clock.clone(),
            config: self.config.clone(),
        }
    }
}

/// Session named by the cookie, or a fresh one
struct CurrentSession {
    id: LoginSessionId,
    session: LoginSession,
    stored: bool,
}

async fn current_session<S>(sessions: &S, headers: &HeaderMap, config: &AuthConfig) -> AuthResult<CurrentSession>
where
    S: LoginSessionRepository + Send + Sync + 'static,
{
    if let Some(id) = session_id_from_headers(headers, config) {
        if let Some(session) = sessions.load(&id).await? {
            return Ok(CurrentSession {
                id,
                session,
                stored: true,
            });
        }
    }

    Ok(CurrentSession {
        id: LoginSessionId::new(),
        session: LoginSession::new(),
        stored: false,
    })
}

// ============================================================================
// Identify
// ============================================================================

/// POST /api/auth/identify
pub async fn identify<R, S>(
    State(state): State<AuthAppState<R, S>>,
    headers: HeaderMap,
    Json(req): Json<IdentifyRequest>,
) -> AuthResult<Response>
where
    R: AccountRepository + RosterRepository + Send + Sync + 'static,
    S: LoginSessionRepository + Send + Sync + 'static,
{
    let mut current = current_session(state.sessions.as_ref(), &headers, &state.config).await?;

    let use_case = IdentifyUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.clock.clone(),
        state.config.clone(),
    );
    let outcome = use_case
        .execute(&mut current.session, IdentifyInput { rut: req.rut })
        .await?;

    state.sessions.save(&current.id, &current.session).await?;

    let cookie = build_session_cookie(&state.config, &current.id);
    Ok(([(header::SET_COOKIE, cookie)], Json(outcome)).into_response())
}

// ============================================================================
// Login (password step)
// ============================================================================

/// POST /api/auth/login
pub async fn login<R, S>(
    State(state): State<AuthAppState<R, S>>,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> AuthResult<Response>
where
    R: AccountRepository + RosterRepository + Send + Sync + 'static,
    S: LoginSessionRepository + Send + Sync + 'static,
{
    let mut current = current_session(state.sessions.as_ref(), &headers, &state.config).await?;
    let was_authenticated = current.session.state() == LoginState::Authenticated;

    let use_case =
        SubmitPasswordUseCase::new(state.repo.clone(), state.clock.clone(), state.config.clone());
    let outcome = use_case
        .execute(
            &mut current.session,
            SubmitPasswordInput {
                password: req.password,
            },
        )
        .await?;

    if !current.stored {
        // Nothing was identified in this browser; keep no state for it
        return Ok(Json(outcome).into_response());
    }

    // Fresh id once authenticated, so a pre-login id cannot be reused
    if !was_authenticated && outcome.state == LoginState::Authenticated {
        state.sessions.delete(&current.id).await?;
        current.id = LoginSessionId::new();
    }

    state.sessions.save(&current.id, &current.session).await?;

    let cookie = build_session_cookie(&state.config, &current.id);
    Ok(([(header::SET_COOKIE, cookie)], Json(outcome)).into_response())
}

// ============================================================================
// Status
// ============================================================================

/// GET /api/auth/status
pub async fn status<R, S>(
    State(state): State<AuthAppState<R, S>>,
    headers: HeaderMap,
) -> AuthResult<Response>
where
    R: AccountRepository + RosterRepository + Send + Sync + 'static,
    S: LoginSessionRepository + Send + Sync + 'static,
{
    let mut current = current_session(state.sessions.as_ref(), &headers, &state.config).await?;

    let use_case = CheckLockoutUseCase::new(state.clock.clone(), state.config.clone());
    let outcome = use_case.execute(&mut current.session);

    if current.stored {
        state.sessions.save(&current.id, &current.session).await?;
    }

    Ok(Json(outcome).into_response())
}

// ============================================================================
// Logout
// ============================================================================

/// POST /api/auth/logout
pub async fn logout<R, S>(
    State(state): State<AuthAppState<R, S>>,
    headers: HeaderMap,
) -> impl IntoResponse
where
    R: AccountRepository + RosterRepository + Send + Sync + 'static,
    S: LoginSessionRepository + Send + Sync + 'static,
{
    let use_case = SignOutUseCase::new(state.sessions.clone());

    match current_session(state.sessions.as_ref(), &headers, &state.config).await {
        Ok(mut current) if current.stored => {
            if let Err(e) = use_case.execute(&current.id, &mut current.session).await {
                // The cookie is cleared anyway; the entry expires on its own
                tracing::warn!(error = %e, "Failed to delete login session");
            }
        }
        Ok(_) => {}
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load login session on logout");
        }
    }

    (
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, build_clear_cookie(&state.config))],
    )
}

// ============================================================================
// Register
// ============================================================================

/// POST /api/auth/register
pub async fn register<R, S>(
    State(state): State<AuthAppState<R, S>>,
    Json(req): Json<RegisterRequest>,
) -> AuthResult<(StatusCode, Json<RegisterResponse>)>
where
    R: AccountRepository + RosterRepository + Send + Sync + 'static,
    S: LoginSessionRepository + Send + Sync + 'static,
{
    let use_case = RegisterUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    let output = use_case
        .execute(RegisterInput {
            rut: req.rut,
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            account: output.account,
        }),
    ))
}

// ============================================================================
// Role home (behind `require_role`)
// ============================================================================

/// GET /api/{qualifier,team-lead}/home
pub async fn role_home(Extension(account): Extension<AccountSummary>) -> Json<AccountSummary> {
    Json(account)
}
