//! Cryptographic Utilities
//!
//! Session cookies carry `base64url(payload || HMAC-SHA256(secret, payload))`.
//! The payload is opaque here; the auth crate puts a session UUID in it.

use base64::{Engine, engine::general_purpose};
use hmac::{Hmac, Mac};
use rand::{RngCore, rngs::OsRng};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Length of an HMAC-SHA256 tag
pub const TAG_LEN: usize = 32;

/// Cryptographically secure random bytes
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// URL-safe Base64 without padding (cookie-safe)
pub fn to_base64url(bytes: &[u8]) -> String {
    general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

pub fn from_base64url(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    general_purpose::URL_SAFE_NO_PAD.decode(s)
}

/// HMAC-SHA256 tag over `data`
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> [u8; TAG_LEN] {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().into()
}

/// Sign a payload into a cookie-safe token
pub fn sign_token(key: &[u8], payload: &[u8]) -> String {
    let tag = hmac_sha256(key, payload);
    let mut token = Vec::with_capacity(payload.len() + TAG_LEN);
    token.extend_from_slice(payload);
    token.extend_from_slice(&tag);
    to_base64url(&token)
}

/// Verify a token produced by [`sign_token`] and return its payload
///
/// Returns `None` on bad encoding, truncation or tag mismatch.
pub fn verify_token(key: &[u8], token: &str) -> Option<Vec<u8>> {
    let raw = from_base64url(token).ok()?;
    if raw.len() <= TAG_LEN {
        return None;
    }
    let (payload, tag) = raw.split_at(raw.len() - TAG_LEN);
    let expected = hmac_sha256(key, payload);
    if !constant_time_eq(tag, &expected) {
        return None;
    }
    Some(payload.to_vec())
}

/// Constant-time comparison
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hmac_rfc4231_case_2() {
        // RFC 4231 test case 2
        let tag = hmac_sha256(b"Jefe", b"what do ya want for nothing?");
        let expected =
            hex::decode("5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843")
                .unwrap();
        assert_eq!(tag.to_vec(), expected);
    }

    #[test]
    fn test_sign_and_verify_token() {
        let key = [7u8; 32];
        let token = sign_token(&key, b"session-id");
        assert_eq!(verify_token(&key, &token), Some(b"session-id".to_vec()));
        assert!(!token.contains('='));
    }

    #[test]
    fn test_verify_rejects_wrong_key() {
        let token = sign_token(&[1u8; 32], b"payload");
        assert_eq!(verify_token(&[2u8; 32], &token), None);
    }

    #[test]
    fn test_verify_rejects_tampering() {
        let key = [9u8; 32];
        let mut raw = from_base64url(&sign_token(&key, b"payload")).unwrap();
        raw[0] ^= 0x01;
        assert_eq!(verify_token(&key, &to_base64url(&raw)), None);
        assert_eq!(verify_token(&key, "not base64 !!"), None);
        assert_eq!(verify_token(&key, &to_base64url(&[0u8; TAG_LEN])), None);
    }

    #[test]
    fn test_random_bytes() {
        let bytes = random_bytes(32);
        assert_eq!(bytes.len(), 32);
        assert!(bytes.iter().any(|&b| b != 0));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(&[1, 2, 3], &[1, 2, 3]));
        assert!(!constant_time_eq(&[1, 2, 3], &[1, 2, 4]));
        assert!(!constant_time_eq(&[1, 2], &[1, 2, 3]));
    }
}
