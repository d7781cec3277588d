//! Login Session Entity
//!
//! Per-browser login progress: which RUT was entered, how many wrong
//! passwords followed, whether the session is locked out, and which account
//! it finally authenticated as.
//!
//! The entity is pure. Every time-dependent method takes `now`, so the whole
//! state machine can be driven by a test clock.
//!
//! ```text
//!  Idle --identify--> AwaitingPassword --correct password--> Authenticated
//!                       |   ^
//!       max wrong tries |   | lockout expired
//!                       v   |
//!                       Locked
//! ```
//!
//! `identify` is accepted from every state and restarts the flow; `logout`
//! returns to `Idle` from every state.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entity::account::AccountSummary;
use crate::domain::value_object::{
    login_issue::LoginIssue,
    rut::{Rut, RutError},
};

/// Observable state of a login session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoginState {
    Idle,
    AwaitingPassword,
    Authenticated,
    Locked,
}

/// How the submitted RUT resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentificationStatus {
    Verified,
    Malformed,
    BadChecksum,
    Unrecognized,
}

impl IdentificationStatus {
    /// Issue that blocks password entry, if any
    pub const fn issue(&self) -> Option<LoginIssue> {
        match self {
            IdentificationStatus::Verified => None,
            IdentificationStatus::Malformed => Some(LoginIssue::MalformedInput),
            IdentificationStatus::BadChecksum => Some(LoginIssue::InvalidChecksum),
            IdentificationStatus::Unrecognized => Some(LoginIssue::UnrecognizedId),
        }
    }
}

/// RUT as entered plus its resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identification {
    /// Canonical form when the RUT parsed, otherwise the trimmed raw input
    pub submitted: String,
    pub rut: Option<Rut>,
    pub status: IdentificationStatus,
    pub display_name: Option<String>,
}

impl Identification {
    pub fn verified(rut: Rut, display_name: String) -> Self {
        Self {
            submitted: rut.to_string(),
            rut: Some(rut),
            status: IdentificationStatus::Verified,
            display_name: Some(display_name),
        }
    }

    pub fn unrecognized(rut: Rut) -> Self {
        Self {
            submitted: rut.to_string(),
            rut: Some(rut),
            status: IdentificationStatus::Unrecognized,
            display_name: None,
        }
    }

    pub fn invalid(raw: &str, error: &RutError) -> Self {
        let status = match error {
            RutError::Malformed { .. } => IdentificationStatus::Malformed,
            RutError::InvalidChecksum { .. } => IdentificationStatus::BadChecksum,
        };
        Self {
            submitted: raw.trim().to_string(),
            rut: None,
            status,
            display_name: None,
        }
    }
}

/// Attempt limit and lockout length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockoutPolicy {
    pub max_attempts: u8,
    pub duration: Duration,
}

impl LockoutPolicy {
    pub const DEFAULT_MAX_ATTEMPTS: u8 = 3;
    pub const DEFAULT_LOCKOUT_MINUTES: i64 = 10;
    pub const MAX_LOCKOUT_DAYS: i64 = 7;

    /// `max_attempts` is raised to at least 1; `duration` is clamped to
    /// `0..=MAX_LOCKOUT_DAYS`
    pub fn new(max_attempts: u8, duration: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            duration: duration.clamp(Duration::zero(), Duration::days(Self::MAX_LOCKOUT_DAYS)),
        }
    }
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_MAX_ATTEMPTS,
            Duration::minutes(Self::DEFAULT_LOCKOUT_MINUTES),
        )
    }
}

/// Result of recording a wrong password
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailedAttempt {
    Retry { attempts_left: u8 },
    LockedOut { remaining_secs: u64 },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginSession {
    identification: Option<Identification>,
    failed_attempts: u8,
    locked_until: Option<DateTime<Utc>>,
    account: Option<AccountSummary>,
}

impl LoginSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LoginState {
        if self.identification.is_none() {
            LoginState::Idle
        } else if self.account.is_some() {
            LoginState::Authenticated
        } else if self.locked_until.is_some() {
            LoginState::Locked
        } else {
            LoginState::AwaitingPassword
        }
    }

    pub fn identification(&self) -> Option<&Identification> {
        self.identification.as_ref()
    }

    /// Issue attached to the current identification
    pub fn identification_issue(&self) -> Option<LoginIssue> {
        self.identification.as_ref().and_then(|id| id.status.issue())
    }

    pub fn failed_attempts(&self) -> u8 {
        self.failed_attempts
    }

    pub fn locked_until(&self) -> Option<DateTime<Utc>> {
        self.locked_until
    }

    pub fn account(&self) -> Option<&AccountSummary> {
        self.account.as_ref()
    }

    /// Start over with a new identification
    ///
    /// Attempts, lockout and any previous authentication are discarded.
    pub fn identify(&mut self, identification: Identification) {
        *self = Self {
            identification: Some(identification),
            ..Self::default()
        };
    }

    /// The identified account vanished between identification and password
    pub fn mark_unrecognized(&mut self) {
        if let Some(identification) = self.identification.as_mut() {
            identification.status = IdentificationStatus::Unrecognized;
            identification.display_name = None;
        }
    }

    /// Lift an elapsed lockout; returns `true` when one was lifted
    pub fn expire_lockout(&mut self, now: DateTime<Utc>) -> bool {
        match self.locked_until {
            Some(until) if now >= until => {
                self.locked_until = None;
                self.failed_attempts = 0;
                true
            }
            _ => false,
        }
    }

    /// Whole seconds until the lockout ends, rounded down
    pub fn remaining_lockout_secs(&self, now: DateTime<Utc>) -> Option<u64> {
        self.locked_until
            .filter(|until| now < *until)
            .map(|until| (until - now).num_seconds().max(0) as u64)
    }

    pub fn attempts_left(&self, policy: &LockoutPolicy) -> u8 {
        policy.max_attempts.saturating_sub(self.failed_attempts)
    }

    pub fn record_failure(&mut self, now: DateTime<Utc>, policy: &LockoutPolicy) -> FailedAttempt {
        self.failed_attempts = self.failed_attempts.saturating_add(1);

        if self.failed_attempts >= policy.max_attempts {
            self.locked_until = Some(
                now.checked_add_signed(policy.duration)
                    .unwrap_or(DateTime::<Utc>::MAX_UTC),
            );
            FailedAttempt::LockedOut {
                remaining_secs: policy.duration.num_seconds().max(0) as u64,
            }
        } else {
            FailedAttempt::Retry {
                attempts_left: self.attempts_left(policy),
            }
        }
    }

    pub fn authenticate(&mut self, account: AccountSummary) {
        self.failed_attempts = 0;
        self.locked_until = None;
        self.account = Some(account);
    }

    pub fn logout(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t0() -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn identified() -> LoginSession {
        let mut session = LoginSession::new();
        session.identify(Identification::verified(
            Rut::parse("12.345.678-5").unwrap(),
            "Ana Rojas".to_string(),
        ));
        session
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = LoginSession::new();
        assert_eq!(session.state(), LoginState::Idle);
        assert_eq!(session.failed_attempts(), 0);
        assert!(session.identification_issue().is_none());
    }

    #[test]
    fn test_invalid_identification_still_awaits_password() {
        let error = Rut::parse("12.345.678-4").unwrap_err();
        let mut session = LoginSession::new();
        session.identify(Identification::invalid(" 12.345.678-4 ", &error));

        assert_eq!(session.state(), LoginState::AwaitingPassword);
        assert_eq!(session.identification_issue(), Some(LoginIssue::InvalidChecksum));
        assert_eq!(session.identification().unwrap().submitted, "12.345.678-4");
    }

    #[test]
    fn test_lockout_after_max_attempts() {
        let policy = LockoutPolicy::default();
        let mut session = identified();

        assert_eq!(
            session.record_failure(t0(), &policy),
            FailedAttempt::Retry { attempts_left: 2 }
        );
        assert_eq!(
            session.record_failure(t0(), &policy),
            FailedAttempt::Retry { attempts_left: 1 }
        );
        assert_eq!(
            session.record_failure(t0(), &policy),
            FailedAttempt::LockedOut {
                remaining_secs: 600
            }
        );
        assert_eq!(session.state(), LoginState::Locked);
        assert_eq!(session.locked_until(), Some(t0() + Duration::minutes(10)));
    }

    #[test]
    fn test_remaining_seconds_round_down() {
        let policy = LockoutPolicy::default();
        let mut session = identified();
        for _ in 0..3 {
            session.record_failure(t0(), &policy);
        }

        let later = t0() + Duration::milliseconds(1_500);
        assert_eq!(session.remaining_lockout_secs(later), Some(598));
        assert_eq!(session.remaining_lockout_secs(t0() + Duration::minutes(10)), None);
    }

    #[test]
    fn test_expire_lockout_only_when_due() {
        let policy = LockoutPolicy::default();
        let mut session = identified();
        for _ in 0..3 {
            session.record_failure(t0(), &policy);
        }

        assert!(!session.expire_lockout(t0() + Duration::seconds(599)));
        assert_eq!(session.state(), LoginState::Locked);

        assert!(session.expire_lockout(t0() + Duration::seconds(600)));
        assert_eq!(session.state(), LoginState::AwaitingPassword);
        assert_eq!(session.failed_attempts(), 0);
    }

    #[test]
    fn test_identify_resets_everything() {
        let policy = LockoutPolicy::default();
        let mut session = identified();
        for _ in 0..3 {
            session.record_failure(t0(), &policy);
        }

        session.identify(Identification::unrecognized(Rut::parse("1-9").unwrap()));
        assert_eq!(session.state(), LoginState::AwaitingPassword);
        assert_eq!(session.failed_attempts(), 0);
        assert_eq!(session.locked_until(), None);
        assert_eq!(session.identification_issue(), Some(LoginIssue::UnrecognizedId));
    }

    #[test]
    fn test_policy_needs_at_least_one_attempt() {
        let policy = LockoutPolicy::new(0, Duration::seconds(30));
        assert_eq!(policy.max_attempts, 1);

        let mut session = identified();
        assert_eq!(
            session.record_failure(t0(), &policy),
            FailedAttempt::LockedOut { remaining_secs: 30 }
        );
    }

    #[test]
    fn test_lockout_duration_is_bounded() {
        let policy = LockoutPolicy::new(1, Duration::days(100_000));
        assert_eq!(policy.duration, Duration::days(LockoutPolicy::MAX_LOCKOUT_DAYS));
        assert_eq!(LockoutPolicy::new(1, Duration::seconds(-5)).duration, Duration::zero());
    }

    #[test]
    fn test_lockout_saturates_at_latest_time() {
        let policy = LockoutPolicy::new(1, Duration::days(LockoutPolicy::MAX_LOCKOUT_DAYS));
        let now = DateTime::<Utc>::MAX_UTC - Duration::days(1);

        let mut session = identified();
        session.record_failure(now, &policy);
        assert_eq!(session.state(), LoginState::Locked);
        assert_eq!(session.locked_until(), Some(DateTime::<Utc>::MAX_UTC));
        assert!(!session.expire_lockout(now));
    }

    #[test]
    fn test_mark_unrecognized_drops_display_name() {
        let mut session = identified();
        session.mark_unrecognized();
        let identification = session.identification().unwrap();
        assert_eq!(identification.status, IdentificationStatus::Unrecognized);
        assert_eq!(identification.display_name, None);
    }
}
