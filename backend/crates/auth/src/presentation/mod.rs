//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and middleware.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod session_cookie;

pub use handlers::AuthAppState;
pub use middleware::{RoleGate, require_role};
pub use router::{api_router, auth_router, role_router};
