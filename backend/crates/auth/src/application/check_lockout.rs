//! Check Lockout Use Case
//!
//! Lifts an elapsed lockout and reports the session status.

use std::sync::Arc;

use platform::clock::Clock;

use crate::application::config::AuthConfig;
use crate::application::outcome::LoginOutcome;
use crate::domain::entity::login_session::LoginSession;

pub struct CheckLockoutUseCase {
    clock: Arc<dyn Clock>,
    config: Arc<AuthConfig>,
}

impl CheckLockoutUseCase {
    pub fn new(clock: Arc<dyn Clock>, config: Arc<AuthConfig>) -> Self {
        Self { clock, config }
    }

    pub fn execute(&self, session: &mut LoginSession) -> LoginOutcome {
        let now = self.clock.now();
        if session.expire_lockout(now) {
            tracing::info!("Login lockout expired");
        }
        LoginOutcome::describe(session, now, &self.config.lockout_policy())
    }
}
