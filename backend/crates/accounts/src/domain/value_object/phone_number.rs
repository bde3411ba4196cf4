//! Phone Number Value Object
//!
//! Stored in E.164 form: `+` followed by 8 to 15 digits.
//! Spaces, dashes, dots and parentheses are accepted on input and stripped.

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

const MIN_DIGITS: usize = 8;
const MAX_DIGITS: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn new(raw: impl AsRef<str>) -> AppResult<Self> {
        let raw = raw.as_ref().trim();

        let Some(rest) = raw.strip_prefix('+') else {
            return Err(AppError::bad_request(
                "Phone number must be in international format (e.g. +15551234567)",
            ));
        };

        let mut digits = String::with_capacity(MAX_DIGITS);
        for c in rest.chars() {
            match c {
                '0'..='9' => digits.push(c),
                ' ' | '-' | '.' | '(' | ')' => {}
                _ => return Err(AppError::bad_request("Phone number contains invalid characters")),
            }
        }

        if !(MIN_DIGITS..=MAX_DIGITS).contains(&digits.len()) {
            return Err(AppError::bad_request(format!(
                "Phone number must have between {} and {} digits",
                MIN_DIGITS, MAX_DIGITS
            )));
        }

        Ok(Self(format!("+{}", digits)))
    }

    pub fn from_db(phone: impl Into<String>) -> Self {
        Self(phone.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_valid() {
        assert_eq!(PhoneNumber::new("+10000000000").unwrap().as_str(), "+10000000000");
        assert_eq!(
            PhoneNumber::new(" +1 (555) 123-4567 ").unwrap().as_str(),
            "+15551234567"
        );
    }

    #[test]
    fn test_phone_invalid() {
        assert!(PhoneNumber::new("").is_err());
        assert!(PhoneNumber::new("5551234567").is_err());
        assert!(PhoneNumber::new("+1234567").is_err());
        assert!(PhoneNumber::new("+1234567890123456").is_err());
        assert!(PhoneNumber::new("+1555abc4567").is_err());
    }
}
