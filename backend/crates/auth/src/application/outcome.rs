//! Login Outcome
//!
//! What every login step reports back to the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entity::{
    account::AccountSummary,
    login_session::{LockoutPolicy, LoginSession, LoginState},
};
use crate::domain::value_object::login_issue::LoginIssue;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginOutcome {
    pub state: LoginState,
    pub issue: Option<LoginIssue>,
    pub message: Option<String>,
    /// RUT as identified (canonical when it parsed)
    pub rut: Option<String>,
    pub display_name: Option<String>,
    pub remaining_lockout_secs: Option<u64>,
    pub attempts_left: Option<u8>,
    pub account: Option<AccountSummary>,
    /// Unregistered RUT found on the roster
    pub registration_available: bool,
}

impl LoginOutcome {
    /// Snapshot of `session` at `now`
    ///
    /// A locked session reports `LockedOut`; an identification problem is
    /// reported while awaiting the password.
    pub fn describe(session: &LoginSession, now: DateTime<Utc>, policy: &LockoutPolicy) -> Self {
        let state = session.state();
        let identification = session.identification();

        let issue = match state {
            LoginState::Locked => Some(LoginIssue::LockedOut),
            LoginState::AwaitingPassword => session.identification_issue(),
            LoginState::Idle | LoginState::Authenticated => None,
        };

        let attempts_left = match state {
            LoginState::AwaitingPassword if issue.is_none() => Some(session.attempts_left(policy)),
            LoginState::Locked => Some(0),
            _ => None,
        };

        Self {
            state,
            issue,
            message: issue.map(|issue| issue.message().to_string()),
            rut: identification.map(|id| id.submitted.clone()),
            display_name: identification.and_then(|id| id.display_name.clone()),
            remaining_lockout_secs: session.remaining_lockout_secs(now),
            attempts_left,
            account: session.account().cloned(),
            registration_available: false,
        }
    }

    pub fn with_issue(mut self, issue: LoginIssue) -> Self {
        self.issue = Some(issue);
        self.message = Some(issue.message().to_string());
        self
    }

    pub fn with_registration_available(mut self, available: bool) -> Self {
        self.registration_available = available;
        self
    }
}
