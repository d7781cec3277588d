//! Application Layer
//!
//! Use cases and application services.

pub mod check_lockout;
pub mod config;
pub mod identify;
pub mod outcome;
pub mod register;
pub mod sign_out;
pub mod submit_password;

// Re-exports
pub use check_lockout::CheckLockoutUseCase;
pub use config::AuthConfig;
pub use identify::{IdentifyInput, IdentifyUseCase};
pub use outcome::LoginOutcome;
pub use register::{RegisterInput, RegisterOutput, RegisterUseCase};
pub use sign_out::SignOutUseCase;
pub use submit_password::{SubmitPasswordInput, SubmitPasswordUseCase};
