//! Shared Kernel
//!
//! Vocabulary shared by every crate of the qualification backend:
//! - Error classification ([`error::kind::ErrorKind`]) and the unified
//!   [`error::app_error::AppError`] rendered to HTTP clients
//! - Typed identifiers ([`id::Id`])
//!
//! Nothing here knows about RUTs, accounts or sessions. Domain crates
//! define their own error enums and convert into `AppError` at the edge.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
