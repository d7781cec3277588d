//! Auth (Authentication) Backend Module
//!
//! Two-step login for tax qualifiers and team leads: the person enters a
//! RUT, then a password. Repeated wrong passwords lock the login session
//! for a while.
//!
//! Clean Architecture structure:
//! - `domain/` - RUT validation, login state machine, repository traits
//! - `application/` - Use cases and configuration
//! - `infra/` - PostgreSQL and in-process implementations
//! - `presentation/` - HTTP handlers, DTOs, router, role gate
//!
//! ## Security Model
//! - Passwords hashed with Argon2id and compared in constant time
//! - Login progress kept server-side, referenced by an HMAC-signed cookie
//! - Session id rotated when the login completes
//! - Lockout after `max_login_attempts` wrong passwords (default 3 / 10 min)

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::outcome::LoginOutcome;
pub use domain::value_object::{account_role::AccountRole, rut::Rut};
pub use error::{AuthError, AuthResult};
pub use infra::{MemoryAccountRepository, MemoryLoginSessionStore, PgAccountRepository};
pub use presentation::{AuthAppState, api_router, auth_router, role_router};
