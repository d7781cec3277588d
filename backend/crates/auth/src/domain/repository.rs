//! Repository Traits
//!
//! Interfaces for data persistence. Implementations live in the
//! infrastructure layer.

use kernel::id::LoginSessionId;

use crate::domain::entity::{
    account::{Account, NewAccount},
    login_session::LoginSession,
    roster_entry::RosterEntry,
};
use crate::domain::value_object::rut::Rut;
use crate::error::AuthResult;

/// Registered accounts
#[trait_variant::make(AccountRepository: Send)]
pub trait LocalAccountRepository {
    /// Find an account by its RUT
    async fn find_by_rut(&self, rut: &Rut) -> AuthResult<Option<Account>>;

    /// Insert a new account
    ///
    /// Fails with `AccountAlreadyExists` when the RUT is taken.
    async fn create(&self, account: NewAccount) -> AuthResult<Account>;
}

/// RUTs admitted by an administrator
#[trait_variant::make(RosterRepository: Send)]
pub trait LocalRosterRepository {
    async fn find_entry(&self, rut: &Rut) -> AuthResult<Option<RosterEntry>>;
}

/// Login progress keyed by the id carried in the session cookie
///
/// `load` followed by `save` is not atomic; two concurrent requests on the
/// same session may overwrite each other.
#[trait_variant::make(LoginSessionRepository: Send)]
pub trait LocalLoginSessionRepository {
    /// `None` when unknown or expired
    async fn load(&self, id: &LoginSessionId) -> AuthResult<Option<LoginSession>>;

    /// Insert or replace, refreshing the idle timeout
    async fn save(&self, id: &LoginSessionId, session: &LoginSession) -> AuthResult<()>;

    async fn delete(&self, id: &LoginSessionId) -> AuthResult<()>;

    /// Drop expired sessions; returns how many were removed
    async fn cleanup_expired(&self) -> AuthResult<u64>;
}
