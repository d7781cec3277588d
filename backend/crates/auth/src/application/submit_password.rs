//! Submit Password Use Case
//!
//! Second login step. Wrong passwords count towards the lockout; an empty
//! password does not.

use std::sync::Arc;

use platform::clock::Clock;
use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::application::outcome::LoginOutcome;
use crate::domain::entity::login_session::{FailedAttempt, LoginSession, LoginState};
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::login_issue::LoginIssue;
use crate::error::AuthResult;

pub struct SubmitPasswordInput {
    pub password: String,
}

pub struct SubmitPasswordUseCase<A>
where
    A: AccountRepository,
{
    accounts: Arc<A>,
    clock: Arc<dyn Clock>,
    config: Arc<AuthConfig>,
}

impl<A> SubmitPasswordUseCase<A>
where
    A: AccountRepository,
{
    pub fn new(accounts: Arc<A>, clock: Arc<dyn Clock>, config: Arc<AuthConfig>) -> Self {
        Self {
            accounts,
            clock,
            config,
        }
    }

    /// Check the password against the identified account
    ///
    /// Outside `AwaitingPassword`, or while the identification is flagged,
    /// the password is ignored and the current status is reported. `session`
    /// is only written back when the call succeeds.
    pub async fn execute(
        &self,
        session: &mut LoginSession,
        input: SubmitPasswordInput,
    ) -> AuthResult<LoginOutcome> {
        let now = self.clock.now();
        let policy = self.config.lockout_policy();

        let mut next = session.clone();
        if next.expire_lockout(now) {
            tracing::info!("Login lockout expired");
        }

        match next.state() {
            LoginState::Idle => {
                *session = next;
                return Ok(LoginOutcome::describe(session, now, &policy)
                    .with_issue(LoginIssue::IdentificationRequired));
            }
            LoginState::Locked | LoginState::Authenticated => {
                *session = next;
                return Ok(LoginOutcome::describe(session, now, &policy));
            }
            LoginState::AwaitingPassword => {}
        }

        let rut = match next.identification().and_then(|id| id.rut.clone()) {
            Some(rut) if next.identification_issue().is_none() => rut,
            _ => {
                *session = next;
                return Ok(LoginOutcome::describe(session, now, &policy));
            }
        };

        let Ok(password) = ClearTextPassword::for_verification(input.password) else {
            *session = next;
            return Ok(LoginOutcome::describe(session, now, &policy)
                .with_issue(LoginIssue::NoPasswordSupplied));
        };

        let Some(account) = self.accounts.find_by_rut(&rut).await? else {
            tracing::warn!("Identified account no longer exists");
            next.mark_unrecognized();
            *session = next;
            return Ok(LoginOutcome::describe(session, now, &policy));
        };

        if account.password_hash.verify(&password, self.config.pepper()) {
            if account.password_hash.needs_rehash() {
                tracing::warn!(account_id = %account.account_id, "Password hash uses a legacy algorithm");
            }
            next.authenticate(account.summary());
            *session = next;

            tracing::info!(
                account_id = %account.account_id,
                role = %account.role,
                "Account signed in"
            );
            return Ok(LoginOutcome::describe(session, now, &policy));
        }

        let failure = next.record_failure(now, &policy);
        *session = next;

        let outcome = LoginOutcome::describe(session, now, &policy);
        match failure {
            FailedAttempt::Retry { attempts_left } => {
                tracing::warn!(
                    account_id = %account.account_id,
                    attempts_left,
                    "Wrong password"
                );
                Ok(outcome.with_issue(LoginIssue::WrongPassword))
            }
            FailedAttempt::LockedOut { remaining_secs } => {
                tracing::warn!(
                    account_id = %account.account_id,
                    lockout_secs = remaining_secs,
                    "Login locked after repeated wrong passwords"
                );
                Ok(outcome)
            }
        }
    }
}
