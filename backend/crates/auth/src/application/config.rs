//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

use platform::cookie::CookieConfig;
pub use platform::cookie::SameSite;

use crate::domain::entity::login_session::LockoutPolicy;

/// Longest accepted `lockout_duration`
pub const MAX_LOCKOUT_DURATION: Duration =
    Duration::from_secs(LockoutPolicy::MAX_LOCKOUT_DAYS as u64 * 24 * 60 * 60);

/// Longest accepted `session_idle_ttl` (30 days)
pub const MAX_SESSION_IDLE_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Login session cookie name
    pub session_cookie_name: String,
    /// HMAC key for the session cookie (32 bytes)
    pub session_secret: [u8; 32],
    /// Login sessions expire after this long without a request
    pub session_idle_ttl: Duration,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    pub cookie_same_site: SameSite,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    /// Wrong passwords allowed before lockout
    pub max_login_attempts: u8,
    pub lockout_duration: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_cookie_name: "login_session".to_string(),
            session_secret: [0u8; 32],
            session_idle_ttl: Duration::from_secs(12 * 3600),
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            password_pepper: None,
            max_login_attempts: LockoutPolicy::DEFAULT_MAX_ATTEMPTS,
            lockout_duration: Duration::from_secs(
                LockoutPolicy::DEFAULT_LOCKOUT_MINUTES as u64 * 60,
            ),
        }
    }
}

impl AuthConfig {
    /// Create config with a random session secret (for development)
    pub fn with_random_secret() -> Self {
        let mut secret = [0u8; 32];
        secret.copy_from_slice(&platform::crypto::random_bytes(32));
        Self {
            session_secret: secret,
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secret()
        }
    }

    pub fn lockout_policy(&self) -> LockoutPolicy {
        let duration = chrono::Duration::from_std(self.lockout_duration)
            .unwrap_or_else(|_| chrono::Duration::minutes(LockoutPolicy::DEFAULT_LOCKOUT_MINUTES));
        LockoutPolicy::new(self.max_login_attempts, duration)
    }

    /// Idle TTL, capped at [`MAX_SESSION_IDLE_TTL`]
    pub fn session_idle_ttl(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.session_idle_ttl.min(MAX_SESSION_IDLE_TTL))
            .unwrap_or(chrono::Duration::hours(12))
    }

    /// Attributes of the login session cookie
    pub fn cookie(&self) -> CookieConfig {
        CookieConfig {
            secure: self.cookie_secure,
            same_site: self.cookie_same_site,
            max_age_secs: Some(self.session_idle_ttl().num_seconds()),
            ..CookieConfig::new(self.session_cookie_name.clone())
        }
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lockout_policy() {
        let policy = AuthConfig::default().lockout_policy();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.duration, chrono::Duration::minutes(10));
    }

    #[test]
    fn test_development_config() {
        let config = AuthConfig::development();
        assert!(!config.cookie_secure);
        assert_ne!(config.session_secret, [0u8; 32]);
        assert!(!config.cookie().build_set_cookie("v").contains("Secure"));
    }

    #[test]
    fn test_cookie_max_age_follows_idle_ttl() {
        let config = AuthConfig {
            session_idle_ttl: Duration::from_secs(900),
            ..AuthConfig::default()
        };
        assert!(config.cookie().build_set_cookie("v").ends_with("Max-Age=900"));
    }

    #[test]
    fn test_oversized_durations_are_capped() {
        let config = AuthConfig {
            session_idle_ttl: Duration::from_secs(9_000_000_000_000),
            lockout_duration: Duration::from_secs(9_000_000_000_000),
            ..AuthConfig::default()
        };
        assert_eq!(
            config.lockout_policy().duration,
            chrono::Duration::days(LockoutPolicy::MAX_LOCKOUT_DAYS)
        );
        assert_eq!(config.session_idle_ttl(), chrono::Duration::days(30));
        assert!(
            config
                .cookie()
                .build_set_cookie("v")
                .ends_with(&format!("Max-Age={}", MAX_SESSION_IDLE_TTL.as_secs()))
        );
    }
}
