//! Infrastructure Layer
//!
//! Database and in-process repository implementations.

pub mod memory;
pub mod postgres;

pub use memory::{MemoryAccountRepository, MemoryLoginSessionStore};
pub use postgres::PgAccountRepository;
