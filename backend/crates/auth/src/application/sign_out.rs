//! Sign Out Use Case

use std::sync::Arc;

use kernel::id::LoginSessionId;

use crate::domain::entity::login_session::LoginSession;
use crate::domain::repository::LoginSessionRepository;
use crate::error::AuthResult;

pub struct SignOutUseCase<S>
where
    S: LoginSessionRepository,
{
    sessions: Arc<S>,
}

impl<S> SignOutUseCase<S>
where
    S: LoginSessionRepository,
{
    pub fn new(sessions: Arc<S>) -> Self {
        Self { sessions }
    }

    /// Reset `session` to `Idle` and drop its stored copy, whatever its state
    pub async fn execute(
        &self,
        session_id: &LoginSessionId,
        session: &mut LoginSession,
    ) -> AuthResult<()> {
        self.sessions.delete(session_id).await?;

        if let Some(account) = session.account() {
            tracing::info!(account_id = %account.account_id, "Account signed out");
        }
        session.logout();
        Ok(())
    }
}
