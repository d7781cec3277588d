//! Domain Layer
//!
//! Contains entities, value objects, and repository traits.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{
    account::{Account, AccountSummary, NewAccount, TeamRef},
    login_session::{LockoutPolicy, LoginSession, LoginState},
    roster_entry::RosterEntry,
};
pub use repository::{AccountRepository, LoginSessionRepository, RosterRepository};
