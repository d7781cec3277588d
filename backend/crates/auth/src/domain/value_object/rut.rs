//! RUT Value Object
//!
//! Chilean tax identifier: a numeric body followed by a modulo-11 check
//! character (`0`-`9` or `K`).
//!
//! Accepted input shapes: `12.345.678-5`, `12345678-5`, `123456785`, with
//! surrounding whitespace and a lowercase `k`. The canonical rendering is
//! `12.345.678-5`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Why a RUT string was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RutError {
    #[error("Malformed RUT: {reason}")]
    Malformed { reason: &'static str },

    #[error("RUT check digit does not match (expected {expected}, got {supplied})")]
    InvalidChecksum { expected: char, supplied: char },
}

/// Split raw input into `(body, check)`
///
/// Trims, uppercases and removes every `.` and `-`. The body must be
/// non-empty and made of ASCII digits; the check character is returned as
/// typed (uppercased) and is not validated here.
pub fn normalize(raw: &str) -> Result<(String, char), RutError> {
    let mut cleaned: Vec<char> = raw
        .trim()
        .chars()
        .filter(|c| *c != '.' && *c != '-')
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if cleaned.len() < 2 {
        return Err(RutError::Malformed {
            reason: "too short",
        });
    }

    let check = cleaned.pop().unwrap_or_default();
    if !cleaned.iter().all(char::is_ascii_digit) {
        return Err(RutError::Malformed {
            reason: "body must contain only digits",
        });
    }

    Ok((cleaned.into_iter().collect(), check))
}

/// Modulo-11 check character for a string of ASCII digits
///
/// Digits are weighted `2, 3, 4, 5, 6, 7, 2, 3, ...` from the least
/// significant one. Non-digit characters are ignored.
pub fn compute_check_digit(body: &str) -> char {
    let sum: u64 = body
        .bytes()
        .rev()
        .filter(u8::is_ascii_digit)
        .enumerate()
        .map(|(i, b)| u64::from(b - b'0') * (2 + (i as u64 % 6)))
        .sum();

    match sum % 11 {
        0 => '0',
        1 => 'K',
        r => char::from(b'0' + (11 - r) as u8),
    }
}

/// Check that the supplied check character matches the body
pub fn validate(raw: &str) -> Result<(), RutError> {
    Rut::parse(raw).map(|_| ())
}

/// Canonical `12.345.678-5` rendering of a valid RUT
pub fn format(raw: &str) -> Result<String, RutError> {
    Rut::parse(raw).map(|rut| rut.to_string())
}

/// A validated RUT
///
/// The body is stored without leading zeros (an all-zero body becomes
/// `"0"`), so `00012345678-5` and `12.345.678-5` are the same RUT.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rut {
    body: String,
    check: char,
}

impl Rut {
    pub fn parse(raw: &str) -> Result<Self, RutError> {
        let (body, check) = normalize(raw)?;

        let expected = compute_check_digit(&body);
        if check != expected {
            return Err(RutError::InvalidChecksum {
                expected,
                supplied: check,
            });
        }

        let trimmed = body.trim_start_matches('0');
        let body = if trimmed.is_empty() { "0" } else { trimmed };

        Ok(Self {
            body: body.to_string(),
            check,
        })
    }

    /// Digits without separators
    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn check_digit(&self) -> char {
        self.check
    }

    /// `12345678-5`
    pub fn compact(&self) -> String {
        format!("{}-{}", self.body, self.check)
    }
}

impl fmt::Display for Rut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = self.body.len();
        // Dot before every group of three, counted from the right
        for (i, digit) in self.body.chars().enumerate() {
            if i > 0 && (len - i) % 3 == 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", digit)?;
        }
        write!(f, "-{}", self.check)
    }
}

impl FromStr for Rut {
    type Err = RutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Rut {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rut {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_separators() {
        assert_eq!(normalize(" 12.345.678-5 ").unwrap(), ("12345678".into(), '5'));
        assert_eq!(normalize("1000005-k").unwrap(), ("1000005".into(), 'K'));
        assert_eq!(normalize("123456785").unwrap(), ("12345678".into(), '5'));
    }

    #[test]
    fn test_normalize_rejects_malformed() {
        for raw in ["", "5", " - ", "12a45678-5", "12 345 678-5", "K-K"] {
            assert!(
                matches!(normalize(raw), Err(RutError::Malformed { .. })),
                "{raw:?} should be malformed"
            );
        }
    }

    #[test]
    fn test_compute_check_digit() {
        assert_eq!(compute_check_digit("12345678"), '5');
        assert_eq!(compute_check_digit("7654321"), '6');
        assert_eq!(compute_check_digit("99999999"), '9');
        assert_eq!(compute_check_digit("11111111"), '1');
        assert_eq!(compute_check_digit("1"), '9');
        assert_eq!(compute_check_digit("0"), '0');
        assert_eq!(compute_check_digit("1000005"), 'K');
        assert_eq!(compute_check_digit("1000013"), '0');
    }

    #[test]
    fn test_validate() {
        assert!(validate("12.345.678-5").is_ok());
        assert!(validate("1000005-k").is_ok());
        assert_eq!(
            validate("12.345.678-4"),
            Err(RutError::InvalidChecksum {
                expected: '5',
                supplied: '4'
            })
        );
        assert!(matches!(validate("abc"), Err(RutError::Malformed { .. })));
    }

    #[test]
    fn test_format() {
        assert_eq!(format("123456785").unwrap(), "12.345.678-5");
        assert_eq!(format("1000005-k").unwrap(), "1.000.005-K");
        assert_eq!(format("7654321-6").unwrap(), "7.654.321-6");
        assert_eq!(format("12-4").unwrap(), "12-4");
        assert_eq!(format("1-9").unwrap(), "1-9");
        assert_eq!(format("99.999.999-9").unwrap(), "99.999.999-9");
    }

    #[test]
    fn test_leading_zeros_are_dropped() {
        assert_eq!(format("0012345678-5").unwrap(), "12.345.678-5");
        assert_eq!(format("000-0").unwrap(), "0-0");
        assert_eq!(Rut::parse("0012345678-5").unwrap(), Rut::parse("12345678-5").unwrap());
    }

    #[test]
    fn test_compact() {
        let rut: Rut = "12.345.678-5".parse().unwrap();
        assert_eq!(rut.compact(), "12345678-5");
        assert_eq!(rut.body(), "12345678");
        assert_eq!(rut.check_digit(), '5');
    }

    #[test]
    fn test_serde_uses_canonical_form() {
        let rut: Rut = serde_json::from_str("\"123456785\"").unwrap();
        assert_eq!(serde_json::to_string(&rut).unwrap(), "\"12.345.678-5\"");
        assert!(serde_json::from_str::<Rut>("\"12345678-4\"").is_err());
    }
}
