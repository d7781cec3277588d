//! Auth Error Types
//!
//! Failures that abort a request. Recoverable login problems (bad RUT,
//! wrong password, lockout) are not errors; they are reported through
//! `LoginOutcome`.

use axum::response::{IntoResponse, Response};
use http::StatusCode;
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::domain::value_object::{account_role::AccountRole, rut::RutError};

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Account store failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Session store failure (e.g. an expiry it cannot represent)
    #[error("Repository error: {0}")]
    Repository(String),

    /// Cookie missing, tampered with, or pointing at an expired session
    #[error("Session not found or expired")]
    SessionInvalid,

    #[error("Authentication required")]
    NotAuthenticated,

    #[error("This area is reserved for the {} role", .required.label())]
    Forbidden { required: AccountRole },

    #[error("{0}")]
    InvalidRut(#[from] RutError),

    #[error("An account already exists for this RUT")]
    AccountAlreadyExists,

    #[error("This RUT is not authorized to register")]
    RegistrationNotAuthorized,

    #[error("Password validation failed: {0}")]
    PasswordValidation(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Infrastructure failures; these never change login state
    pub fn is_infrastructure(&self) -> bool {
        matches!(self, AuthError::Database(_) | AuthError::Repository(_))
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Database(_) | AuthError::Repository(_) => ErrorKind::ServiceUnavailable,
            AuthError::SessionInvalid | AuthError::NotAuthenticated => ErrorKind::Unauthorized,
            AuthError::Forbidden { .. } | AuthError::RegistrationNotAuthorized => {
                ErrorKind::Forbidden
            }
            AuthError::AccountAlreadyExists => ErrorKind::Conflict,
            AuthError::InvalidRut(_) | AuthError::PasswordValidation(_) => {
                ErrorKind::UnprocessableEntity
            }
            AuthError::InvalidInput(_) => ErrorKind::BadRequest,
            AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to the unified error body
    pub fn to_app_error(&self) -> AppError {
        match self {
            // Storage details stay in the logs
            AuthError::Database(_) | AuthError::Repository(_) => AppError::service_unavailable(
                "The account service is temporarily unavailable",
            )
            .with_action("Try again in a few minutes"),
            AuthError::Internal(_) => AppError::internal("Internal server error"),
            AuthError::SessionInvalid | AuthError::NotAuthenticated => {
                AppError::unauthorized(self.to_string()).with_action("Log in with your RUT")
            }
            AuthError::Forbidden { .. } => AppError::forbidden(self.to_string()),
            AuthError::RegistrationNotAuthorized => AppError::forbidden(self.to_string())
                .with_action("Contact the administrator"),
            AuthError::AccountAlreadyExists => {
                AppError::conflict(self.to_string()).with_action("Log in instead")
            }
            AuthError::InvalidRut(_) | AuthError::PasswordValidation(_) => {
                AppError::unprocessable(self.to_string())
            }
            AuthError::InvalidInput(_) => AppError::bad_request(self.to_string()),
        }
    }

    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            _ if self.kind().is_server_error() => {
                tracing::error!(error = %self, "Auth service error");
            }
            AuthError::Forbidden { required } => {
                tracing::warn!(required_role = %required, "Role check failed");
            }
            AuthError::RegistrationNotAuthorized => {
                tracing::warn!("Registration attempt for RUT outside the roster");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AuthError::Repository("down".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(AuthError::NotAuthenticated.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AuthError::Forbidden {
                required: AccountRole::TeamLead
            }
            .status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(AuthError::AccountAlreadyExists.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AuthError::InvalidRut(RutError::Malformed { reason: "too short" }).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_infrastructure_details_are_hidden() {
        let err = AuthError::Repository("connection refused on 10.0.0.5".into());
        assert!(err.is_infrastructure());
        assert!(!err.to_app_error().message().contains("10.0.0.5"));
        assert!(!AuthError::SessionInvalid.is_infrastructure());
    }

    #[test]
    fn test_forbidden_message_names_role() {
        let err = AuthError::Forbidden {
            required: AccountRole::Qualifier,
        };
        assert_eq!(
            err.to_string(),
            "This area is reserved for the Calificador Tributario role"
        );
    }
}
