use serde::{Deserialize, Serialize};
use std::fmt;

/// Recoverable problem reported back to the person logging in
///
/// These never surface as errors: they travel inside the login outcome and
/// the session stays usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoginIssue {
    MalformedInput,
    InvalidChecksum,
    UnrecognizedId,
    NoPasswordSupplied,
    WrongPassword,
    LockedOut,
    IdentificationRequired,
}

impl LoginIssue {
    pub const fn code(&self) -> &'static str {
        use LoginIssue::*;
        match self {
            MalformedInput => "MALFORMED_INPUT",
            InvalidChecksum => "INVALID_CHECKSUM",
            UnrecognizedId => "UNRECOGNIZED_ID",
            NoPasswordSupplied => "NO_PASSWORD_SUPPLIED",
            WrongPassword => "WRONG_PASSWORD",
            LockedOut => "LOCKED_OUT",
            IdentificationRequired => "IDENTIFICATION_REQUIRED",
        }
    }

    /// User-facing message
    pub const fn message(&self) -> &'static str {
        use LoginIssue::*;
        match self {
            MalformedInput => "The RUT could not be read. Use the format 12.345.678-5.",
            InvalidChecksum => "The RUT check digit is not valid.",
            UnrecognizedId => "This RUT is not authorized. Contact the administrator.",
            NoPasswordSupplied => "Enter your password.",
            WrongPassword => "Incorrect password.",
            LockedOut => "Too many failed attempts. Try again later.",
            IdentificationRequired => "Enter your RUT before the password.",
        }
    }
}

impl fmt::Display for LoginIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_code_matches_code() {
        for issue in [
            LoginIssue::MalformedInput,
            LoginIssue::InvalidChecksum,
            LoginIssue::UnrecognizedId,
            LoginIssue::NoPasswordSupplied,
            LoginIssue::WrongPassword,
            LoginIssue::LockedOut,
            LoginIssue::IdentificationRequired,
        ] {
            assert_eq!(
                serde_json::to_string(&issue).unwrap(),
                format!("\"{}\"", issue.code())
            );
        }
    }
}
