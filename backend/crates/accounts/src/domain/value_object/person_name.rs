//! Person Name Value Object

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

const NAME_MAX_LENGTH: usize = 50;

/// First or last name, 1 to 50 characters after trimming
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonName(String);

impl PersonName {
    /// `field` names the input in the error message ("First name", "Last name")
    pub fn new(raw: impl AsRef<str>, field: &'static str) -> AppResult<Self> {
        let name = raw.as_ref().trim();

        if name.is_empty() {
            return Err(AppError::bad_request(format!("{} is required", field)));
        }

        if name.chars().count() > NAME_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "{} must be at most {} characters",
                field, NAME_MAX_LENGTH
            )));
        }

        if name.chars().any(char::is_control) {
            return Err(AppError::bad_request(format!(
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

impl std::fmt::Display for PersonName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_name() {
        assert_eq!(PersonName::new("  A ", "First name").unwrap().as_str(), "A");
        assert!(PersonName::new("", "First name").is_err());
        assert!(PersonName::new("x".repeat(51), "Last name").is_err());
        assert!(PersonName::new("x".repeat(50), "Last name").is_ok());

        let err = PersonName::new(" ", "Last name").unwrap_err();
        assert_eq!(err.message(), "Last name is required");
    }
}
