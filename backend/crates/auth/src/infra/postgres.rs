//! PostgreSQL Repository Implementations
//!
//! Tables: `accounts`, `teams`, `roster_entries` (see
//! `database/migrations`). RUTs are stored in canonical form.

use chrono::NaiveDate;
use platform::password::HashedPassword;
use sqlx::PgPool;

use crate::domain::entity::{
    account::{Account, NewAccount, TeamRef},
    roster_entry::RosterEntry,
};
use crate::domain::repository::{AccountRepository, RosterRepository};
use crate::domain::value_object::{
    account_id::AccountId, account_role::AccountRole, email::Email, person_name::PersonName,
    rut::Rut,
};
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed account and roster repository
#[derive(Clone)]
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Account Repository Implementation
// ============================================================================

impl AccountRepository for PgAccountRepository {
    async fn find_by_rut(&self, rut: &Rut) -> AuthResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT
                a.account_id,
                a.rut,
                a.first_name,
                a.last_name,
                a.email,
                a.role,
                a.team_id,
                t.team_name,
                a.password_hash
            FROM accounts a
            LEFT JOIN teams t ON t.team_id = a.team_id
            WHERE a.rut = $1
            "#,
        )
        .bind(rut.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(AccountRow::into_account).transpose()
    }

    async fn create(&self, account: NewAccount) -> AuthResult<Account> {
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO accounts (
                rut,
                first_name,
                last_name,
                email,
                role,
                team_id,
                password_hash
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING account_id
            "#,
        )
        .bind(account.rut.to_string())
        .bind(account.first_name.as_str())
        .bind(account.last_name.as_str())
        .bind(account.email.as_ref().map(Email::as_str))
        .bind(account.role.code())
        .bind(account.team.as_ref().map(|team| team.team_id))
        .bind(account.password_hash.as_phc_string())
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(account_id) => Ok(account.into_account(AccountId::new(account_id))),
            // Lost a race with a concurrent registration of the same RUT
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(AuthError::AccountAlreadyExists)
            }
            Err(e) => Err(e.into()),
        }
    }
}

// ============================================================================
// Roster Repository Implementation
// ============================================================================

impl RosterRepository for PgAccountRepository {
    async fn find_entry(&self, rut: &Rut) -> AuthResult<Option<RosterEntry>> {
        let row = sqlx::query_as::<_, RosterRow>(
            r#"
            SELECT
                r.rut,
                r.role,
                r.team_id,
                t.team_name,
                r.admitted_on
            FROM roster_entries r
            LEFT JOIN teams t ON t.team_id = r.team_id
            WHERE r.rut = $1
            "#,
        )
        .bind(rut.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(RosterRow::into_entry).transpose()
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct AccountRow {
    account_id: i64,
    rut: String,
    first_name: String,
    last_name: String,
    email: Option<String>,
    role: String,
    team_id: Option<i64>,
    team_name: Option<String>,
    password_hash: String,
}

impl AccountRow {
    fn into_account(self) -> AuthResult<Account> {
        let rut = parse_stored_rut(&self.rut)?;
        let password_hash = HashedPassword::from_phc_string(self.password_hash)
            .map_err(|e| AuthError::Internal(format!("Invalid password hash for {}: {}", rut, e)))?;

        Ok(Account {
            account_id: AccountId::new(self.account_id),
            rut,
            first_name: PersonName::from_db(self.first_name),
            last_name: PersonName::from_db(self.last_name),
            email: self.email.map(Email::from_db),
            role: parse_stored_role(&self.role)?,
            team: team_ref(self.team_id, self.team_name),
            password_hash,
        })
    }
}

#[derive(sqlx::FromRow)]
struct RosterRow {
    rut: String,
    role: String,
    team_id: Option<i64>,
    team_name: Option<String>,
    admitted_on: NaiveDate,
}

impl RosterRow {
    fn into_entry(self) -> AuthResult<RosterEntry> {
        Ok(RosterEntry {
            rut: parse_stored_rut(&self.rut)?,
            role: parse_stored_role(&self.role)?,
            team: team_ref(self.team_id, self.team_name),
            admitted_on: self.admitted_on,
        })
    }
}

fn parse_stored_rut(raw: &str) -> AuthResult<Rut> {
    Rut::parse(raw).map_err(|e| AuthError::Internal(format!("Invalid stored RUT {:?}: {}", raw, e)))
}

fn parse_stored_role(code: &str) -> AuthResult<AccountRole> {
    AccountRole::from_code(code)
        .ok_or_else(|| AuthError::Internal(format!("Invalid stored role: {}", code)))
}

fn team_ref(team_id: Option<i64>, team_name: Option<String>) -> Option<TeamRef> {
    Some(TeamRef {
        team_id: team_id?,
        team_name: team_name.unwrap_or_default(),
    })
}
