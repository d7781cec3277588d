//! In-Process Repository Implementations
//!
//! `MemoryLoginSessionStore` is the login session store used by the server.
//! `MemoryAccountRepository` backs tests and database-less local runs.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Duration, Utc};
use kernel::id::LoginSessionId;
use platform::clock::Clock;
use tokio::sync::RwLock;

use crate::domain::entity::{
    account::{Account, NewAccount},
    login_session::LoginSession,
    roster_entry::RosterEntry,
};
use crate::domain::repository::{AccountRepository, LoginSessionRepository, RosterRepository};
use crate::domain::value_object::{account_id::AccountId, rut::Rut};
use crate::error::{AuthError, AuthResult};

// ============================================================================
// Accounts and Roster
// ============================================================================

#[derive(Default)]
pub struct MemoryAccountRepository {
    accounts: RwLock<HashMap<Rut, Account>>,
    roster: RwLock<HashMap<Rut, RosterEntry>>,
    next_id: AtomicI64,
}

impl MemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_roster_entry(&self, entry: RosterEntry) {
        self.roster.write().await.insert(entry.rut.clone(), entry);
    }

    pub async fn account_count(&self) -> usize {
        self.accounts.read().await.len()
    }
}

impl AccountRepository for MemoryAccountRepository {
    async fn find_by_rut(&self, rut: &Rut) -> AuthResult<Option<Account>> {
        Ok(self.accounts.read().await.get(rut).cloned())
    }

    async fn create(&self, account: NewAccount) -> AuthResult<Account> {
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&account.rut) {
            return Err(AuthError::AccountAlreadyExists);
        }

        let account_id = AccountId::new(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let account = account.into_account(account_id);
        accounts.insert(account.rut.clone(), account.clone());
        Ok(account)
    }
}

impl RosterRepository for MemoryAccountRepository {
    async fn find_entry(&self, rut: &Rut) -> AuthResult<Option<RosterEntry>> {
        Ok(self.roster.read().await.get(rut).cloned())
    }
}

// ============================================================================
// Login Sessions
// ============================================================================

struct StoredSession {
    session: LoginSession,
    expires_at: DateTime<Utc>,
}

/// Login sessions with an idle timeout
///
/// Every `save` pushes the expiry `idle_ttl` into the future. Expired
/// entries are invisible to `load` and removed by `cleanup_expired`.
pub struct MemoryLoginSessionStore {
    sessions: RwLock<HashMap<LoginSessionId, StoredSession>>,
    clock: Arc<dyn Clock>,
    idle_ttl: Duration,
}

impl MemoryLoginSessionStore {
    pub fn new(clock: Arc<dyn Clock>, idle_ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            clock,
            idle_ttl,
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

impl LoginSessionRepository for MemoryLoginSessionStore {
    async fn load(&self, id: &LoginSessionId) -> AuthResult<Option<LoginSession>> {
        let now = self.clock.now();
        Ok(self
            .sessions
            .read()
            .await
            .get(id)
            .filter(|stored| stored.expires_at > now)
            .map(|stored| stored.session.clone()))
    }

    async fn save(&self, id: &LoginSessionId, session: &LoginSession) -> AuthResult<()> {
        let expires_at = self
            .clock
            .now()
            .checked_add_signed(self.idle_ttl)
            .ok_or_else(|| AuthError::Repository("login session expiry out of range".into()))?;
        self.sessions.write().await.insert(
            *id,
            StoredSession {
                session: session.clone(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn delete(&self, id: &LoginSessionId) -> AuthResult<()> {
        self.sessions.write().await.remove(id);
        Ok(())
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        let now = self.clock.now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, stored| stored.expires_at > now);
        let deleted = (before - sessions.len()) as u64;

        if deleted > 0 {
            tracing::info!(sessions_deleted = deleted, "Cleaned up expired login sessions");
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::clock::ManualClock;

    fn store(clock: Arc<ManualClock>) -> MemoryLoginSessionStore {
        MemoryLoginSessionStore::new(clock, Duration::minutes(30))
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let store = store(Arc::new(ManualClock::epoch()));
        let id = LoginSessionId::new();

        assert!(store.load(&id).await.unwrap().is_none());
        store.save(&id, &LoginSession::new()).await.unwrap();
        assert_eq!(store.load(&id).await.unwrap(), Some(LoginSession::new()));

        store.delete(&id).await.unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_idle_expiry_and_cleanup() {
        let clock = Arc::new(ManualClock::epoch());
        let store = store(clock.clone());
        let stale = LoginSessionId::new();
        let fresh = LoginSessionId::new();

        store.save(&stale, &LoginSession::new()).await.unwrap();
        clock.advance(Duration::minutes(20));
        store.save(&fresh, &LoginSession::new()).await.unwrap();
        clock.advance(Duration::minutes(15));

        assert!(store.load(&stale).await.unwrap().is_none());
        assert!(store.load(&fresh).await.unwrap().is_some());

        assert_eq!(store.cleanup_expired().await.unwrap(), 1);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_unrepresentable_expiry_is_a_store_error() {
        let store = MemoryLoginSessionStore::new(
            Arc::new(ManualClock::epoch()),
            Duration::days(365_000_000),
        );
        let err = store
            .save(&LoginSessionId::new(), &LoginSession::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Repository(_)));
        assert!(store.is_empty().await);
    }
}
