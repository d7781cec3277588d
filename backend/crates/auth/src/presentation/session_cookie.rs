//! Login Session Cookie
//!
//! The cookie value is the session UUID signed with HMAC-SHA256, so a
//! client can neither forge nor guess another session id.

use axum::http::HeaderMap;
use kernel::id::LoginSessionId;
use platform::cookie::extract_cookie;
use platform::crypto::{sign_token, verify_token};
use uuid::Uuid;

use crate::application::config::AuthConfig;

/// Signed cookie value for `id`
pub fn encode_session_token(config: &AuthConfig, id: &LoginSessionId) -> String {
    sign_token(&config.session_secret, id.as_uuid().as_bytes())
}

/// Session id from a signed cookie value
pub fn decode_session_token(config: &AuthConfig, token: &str) -> Option<LoginSessionId> {
    let payload = verify_token(&config.session_secret, token)?;
    Uuid::from_slice(&payload).ok().map(LoginSessionId::from_uuid)
}

/// Session id carried by the request, if the cookie is present and intact
pub fn session_id_from_headers(headers: &HeaderMap, config: &AuthConfig) -> Option<LoginSessionId> {
    let token = extract_cookie(headers, &config.session_cookie_name)?;
    let id = decode_session_token(config, &token);
    if id.is_none() {
        tracing::warn!("Rejected login session cookie with bad signature");
    }
    id
}

pub fn build_session_cookie(config: &AuthConfig, id: &LoginSessionId) -> String {
    config.cookie().build_set_cookie(&encode_session_token(config, id))
}

pub fn build_clear_cookie(config: &AuthConfig) -> String {
    config.cookie().build_delete_cookie()
}
