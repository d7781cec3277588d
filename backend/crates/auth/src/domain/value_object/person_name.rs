use serde::{Deserialize, Serialize};

use crate::error::{AuthError, AuthResult};

const PERSON_NAME_MAX_LENGTH: usize = 100;

/// First or last name of an account holder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonName(String);

impl PersonName {
    /// `field` names the input in the error message
    pub fn new(raw: &str, field: &str) -> AuthResult<Self> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(AuthError::InvalidInput(format!("{} is required", field)));
        }
        if name.chars().count() > PERSON_NAME_MAX_LENGTH {
            return Err(AuthError::InvalidInput(format!(
                "{} must be at most {} characters",
                field, PERSON_NAME_MAX_LENGTH
            )));
        }
        if name.chars().any(char::is_control) {
            return Err(AuthError::InvalidInput(format!(
                "{} contains invalid characters",
                field
            )));
        }
        Ok(Self(name.to_string()))
    }

    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
