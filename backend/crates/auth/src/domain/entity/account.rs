//! Account Entity
//!
//! A person who completed registration. Role and team come from the roster
//! at registration time and are read-only afterwards.

use platform::password::HashedPassword;
use serde::{Deserialize, Serialize};

use crate::domain::value_object::{
    account_id::AccountId, account_role::AccountRole, email::Email, person_name::PersonName,
    rut::Rut,
};

/// Team an account belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRef {
    pub team_id: i64,
    pub team_name: String,
}

/// Stored account
#[derive(Debug, Clone)]
pub struct Account {
    pub account_id: AccountId,
    pub rut: Rut,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub email: Option<Email>,
    pub role: AccountRole,
    pub team: Option<TeamRef>,
    pub password_hash: HashedPassword,
}

impl Account {
    /// "First Last"
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name.as_str(), self.last_name.as_str())
    }

    pub fn summary(&self) -> AccountSummary {
        AccountSummary {
            account_id: self.account_id,
            rut: self.rut.clone(),
            display_name: self.display_name(),
            role: self.role,
            role_label: self.role.label().to_string(),
            home_path: self.role.home_path().to_string(),
            team: self.team.clone(),
        }
    }
}

/// Account about to be inserted
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub rut: Rut,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub email: Option<Email>,
    pub role: AccountRole,
    pub team: Option<TeamRef>,
    pub password_hash: HashedPassword,
}

impl NewAccount {
    pub fn into_account(self, account_id: AccountId) -> Account {
        Account {
            account_id,
            rut: self.rut,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            role: self.role,
            team: self.team,
            password_hash: self.password_hash,
        }
    }
}

/// What an authenticated session exposes about its account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub account_id: AccountId,
    pub rut: Rut,
    pub display_name: String,
    pub role: AccountRole,
    pub role_label: String,
    pub home_path: String,
    pub team: Option<TeamRef>,
}
