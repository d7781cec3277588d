//! Register Use Case
//!
//! A rostered RUT without an account creates one. Role and team are copied
//! from the roster entry; the request cannot choose them.

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::domain::entity::account::{AccountSummary, NewAccount};
use crate::domain::repository::{AccountRepository, RosterRepository};
use crate::domain::value_object::{email::Email, person_name::PersonName, rut::Rut};
use crate::error::{AuthError, AuthResult};

pub struct RegisterInput {
    pub rut: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub password: String,
}

pub struct RegisterOutput {
    pub account: AccountSummary,
}

pub struct RegisterUseCase<A, R>
where
    A: AccountRepository,
    R: RosterRepository,
{
    accounts: Arc<A>,
    roster: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<A, R> RegisterUseCase<A, R>
where
    A: AccountRepository,
    R: RosterRepository,
{
    pub fn new(accounts: Arc<A>, roster: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self {
            accounts,
            roster,
            config,
        }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<RegisterOutput> {
        let rut = Rut::parse(&input.rut)?;
        let first_name = PersonName::new(&input.first_name, "First name")?;
        let last_name = PersonName::new(&input.last_name, "Last name")?;
        let email = input
            .email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
            .map(Email::new)
            .transpose()?;

        let password = ClearTextPassword::new(input.password)
            .map_err(|e| AuthError::PasswordValidation(e.to_string()))?;

        if self.accounts.find_by_rut(&rut).await?.is_some() {
            return Err(AuthError::AccountAlreadyExists);
        }

        let entry = self
            .roster
            .find_entry(&rut)
            .await?
            .ok_or(AuthError::RegistrationNotAuthorized)?;

        let password_hash = password
            .hash(self.config.pepper())
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        let account = self
            .accounts
            .create(NewAccount {
                rut,
                first_name,
                last_name,
                email,
                role: entry.role,
                team: entry.team,
                password_hash,
            })
            .await?;

        tracing::info!(
            account_id = %account.account_id,
            role = %account.role,
            "Account registered"
        );

        Ok(RegisterOutput {
            account: account.summary(),
        })
    }
}
