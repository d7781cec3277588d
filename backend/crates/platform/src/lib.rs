//! Platform Crate - Technical Infrastructure
//!
//! Shared technical foundations for the qualification backend:
//! - Injectable clock (`SystemClock` in production, `ManualClock` in tests)
//! - Cryptographic helpers (HMAC-signed tokens, Base64url)
//! - Password hashing (Argon2id, NIST SP 800-63B policy)
//! - Cookie building and parsing

pub mod clock;
pub mod cookie;
pub mod crypto;
pub mod password;
