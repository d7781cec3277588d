//! Environment Settings
//!
//! Everything the server reads from the environment (or `.env`).

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, bail};
use auth::AuthConfig;
use auth::application::config::{MAX_LOCKOUT_DURATION, MAX_SESSION_IDLE_TTL};
use axum::http::HeaderValue;
use base64::Engine;
use base64::engine::general_purpose;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:31113";
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:40922,http://127.0.0.1:40922";
const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 300;
const MAX_CLEANUP_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

pub struct Settings {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub frontend_origins: Vec<HeaderValue>,
    pub session_cleanup_interval: Duration,
    pub auth: AuthConfig,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .context("BIND_ADDR must be a socket address")?;

        let frontend_origins = env::var("FRONTEND_ORIGINS")
            .unwrap_or_else(|_| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .filter_map(|origin| origin.trim().parse().ok())
            .collect();

        let session_cleanup_interval = bounded_secs(
            "SESSION_CLEANUP_INTERVAL_SECS",
            parse_var("SESSION_CLEANUP_INTERVAL_SECS")?,
            Duration::from_secs(1),
            MAX_CLEANUP_INTERVAL,
        )?
        .unwrap_or(Duration::from_secs(DEFAULT_CLEANUP_INTERVAL_SECS));

        Ok(Self {
            database_url,
            bind_addr,
            frontend_origins,
            session_cleanup_interval,
            auth: auth_config_from_env()?,
        })
    }
}

fn auth_config_from_env() -> anyhow::Result<AuthConfig> {
    let mut config = match env::var("AUTH_SESSION_SECRET") {
        Ok(secret_b64) => AuthConfig {
            session_secret: decode_secret(&secret_b64)?,
            ..AuthConfig::default()
        },
        Err(_) if cfg!(debug_assertions) => {
            tracing::warn!("AUTH_SESSION_SECRET not set; using a random secret and insecure cookies");
            AuthConfig::development()
        }
        Err(_) => bail!("AUTH_SESSION_SECRET must be set in production"),
    };

    if let Ok(pepper) = env::var("AUTH_PASSWORD_PEPPER") {
        config.password_pepper = Some(pepper.into_bytes());
    }
    if let Some(max_attempts) = parse_var::<u8>("AUTH_MAX_LOGIN_ATTEMPTS")? {
        config.max_login_attempts = max_attempts;
    }
    if let Some(lockout) = bounded_secs(
        "AUTH_LOCKOUT_SECS",
        parse_var("AUTH_LOCKOUT_SECS")?,
        Duration::ZERO,
        MAX_LOCKOUT_DURATION,
    )? {
        config.lockout_duration = lockout;
    }
    if let Some(idle) = bounded_secs(
        "AUTH_SESSION_IDLE_SECS",
        parse_var("AUTH_SESSION_IDLE_SECS")?,
        Duration::from_secs(1),
        MAX_SESSION_IDLE_TTL,
    )? {
        config.session_idle_ttl = idle;
    }

    Ok(config)
}

fn decode_secret(secret_b64: &str) -> anyhow::Result<[u8; 32]> {
    let bytes = general_purpose::STANDARD
        .decode(secret_b64.trim())
        .context("AUTH_SESSION_SECRET must be base64")?;
    bytes
        .try_into()
        .map_err(|bytes: Vec<u8>| anyhow::anyhow!("AUTH_SESSION_SECRET must decode to 32 bytes, got {}", bytes.len()))
}

/// Seconds from the environment, checked against `min..=max`
fn bounded_secs(
    name: &str,
    secs: Option<u64>,
    min: Duration,
    max: Duration,
) -> anyhow::Result<Option<Duration>> {
    let Some(secs) = secs else {
        return Ok(None);
    };
    let value = Duration::from_secs(secs);
    if value < min || value > max {
        bail!(
            "{name} must be between {} and {} seconds, got {secs}",
            min.as_secs(),
            max.as_secs()
        );
    }
    Ok(Some(value))
}

fn parse_var<T>(name: &str) -> anyhow::Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{name} has an invalid value")),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_secret_requires_32_bytes() {
        let ok = general_purpose::STANDARD.encode([5u8; 32]);
        assert_eq!(decode_secret(&ok).unwrap(), [5u8; 32]);

        let short = general_purpose::STANDARD.encode([5u8; 16]);
        assert!(decode_secret(&short).is_err());
        assert!(decode_secret("not base64!").is_err());
    }

    #[test]
    fn test_bounded_secs() {
        let one = Duration::from_secs(1);
        let day = Duration::from_secs(86_400);

        assert_eq!(bounded_secs("X", None, one, day).unwrap(), None);
        assert_eq!(bounded_secs("X", Some(60), one, day).unwrap(), Some(Duration::from_secs(60)));
        assert_eq!(bounded_secs("X", Some(86_400), one, day).unwrap(), Some(day));
        assert!(bounded_secs("X", Some(86_401), one, day).is_err());
    }

    #[test]
    fn test_zero_cleanup_interval_is_rejected() {
        let err = bounded_secs(
            "SESSION_CLEANUP_INTERVAL_SECS",
            Some(0),
            Duration::from_secs(1),
            MAX_CLEANUP_INTERVAL,
        )
        .unwrap_err();
        assert!(err.to_string().contains("SESSION_CLEANUP_INTERVAL_SECS"));
    }

    #[test]
    fn test_oversized_auth_durations_are_rejected() {
        let huge = Some(9_000_000_000_000);
        assert!(bounded_secs("AUTH_LOCKOUT_SECS", huge, Duration::ZERO, MAX_LOCKOUT_DURATION).is_err());
        assert!(
            bounded_secs("AUTH_SESSION_IDLE_SECS", huge, Duration::from_secs(1), MAX_SESSION_IDLE_TTL)
                .is_err()
        );
        assert!(bounded_secs("AUTH_LOCKOUT_SECS", Some(600), Duration::ZERO, MAX_LOCKOUT_DURATION).is_ok());
    }
}
