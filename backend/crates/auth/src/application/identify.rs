//! Identify Use Case
//!
//! First login step: the person types a RUT.

use std::sync::Arc;

use platform::clock::Clock;

use crate::application::config::AuthConfig;
use crate::application::outcome::LoginOutcome;
use crate::domain::entity::login_session::{Identification, LoginSession};
use crate::domain::repository::{AccountRepository, RosterRepository};
use crate::domain::value_object::rut::Rut;
use crate::error::AuthResult;

pub struct IdentifyInput {
    pub rut: String,
}

pub struct IdentifyUseCase<A, R>
where
    A: AccountRepository,
    R: RosterRepository,
{
    accounts: Arc<A>,
    roster: Arc<R>,
    clock: Arc<dyn Clock>,
    config: Arc<AuthConfig>,
}

impl<A, R> IdentifyUseCase<A, R>
where
    A: AccountRepository,
    R: RosterRepository,
{
    pub fn new(
        accounts: Arc<A>,
        roster: Arc<R>,
        clock: Arc<dyn Clock>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            accounts,
            roster,
            clock,
            config,
        }
    }

    /// Resolve the RUT and restart the session around it
    ///
    /// An invalid or unknown RUT is still accepted: the session moves to
    /// `AwaitingPassword` with the problem flagged. Lookups happen before
    /// the session is touched, so a storage failure leaves it as it was.
    pub async fn execute(
        &self,
        session: &mut LoginSession,
        input: IdentifyInput,
    ) -> AuthResult<LoginOutcome> {
        let mut registration_available = false;

        let identification = match Rut::parse(&input.rut) {
            Err(error) => {
                tracing::debug!(error = %error, "RUT rejected");
                Identification::invalid(&input.rut, &error)
            }
            Ok(rut) => {
                let account = self.accounts.find_by_rut(&rut).await?;
                match account {
                    Some(account) => Identification::verified(rut, account.display_name()),
                    None => {
                        registration_available = self.roster.find_entry(&rut).await?.is_some();
                        Identification::unrecognized(rut)
                    }
                }
            }
        };

        tracing::info!(
            status = ?identification.status,
            registration_available,
            "Login identification"
        );

        session.identify(identification);

        Ok(
            LoginOutcome::describe(session, self.clock.now(), &self.config.lockout_policy())
                .with_registration_available(registration_available),
        )
    }
}
