//! One-Time Code Value Object
//!
//! Six decimal digits in `100000..=999999`. Comparison is constant-time and
//! `Debug` never prints the digits.

use std::fmt;

use platform::crypto::constant_time_eq;
use rand::Rng;

pub const CODE_LENGTH: usize = 6;
const CODE_MIN: u32 = 100_000;
const CODE_MAX: u32 = 999_999;

#[derive(Clone, PartialEq, Eq)]
pub struct OneTimeCode(String);

impl OneTimeCode {
    /// Draw a fresh code from the thread-local CSPRNG
    pub fn generate() -> Self {
        let value = rand::rng().random_range(CODE_MIN..=CODE_MAX);
        Self(value.to_string())
    }

    /// Wrap a user submission as-is (trimmed)
    ///
    /// No format check; a malformed submission never matches.
    pub fn submitted(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_string())
    }

    pub fn from_db(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn matches(&self, submitted: &OneTimeCode) -> bool {
        constant_time_eq(self.0.as_bytes(), submitted.0.as_bytes())
    }
}

impl fmt::Debug for OneTimeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OneTimeCode([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_in_range() {
        for _ in 0..1_000 {
            let code = OneTimeCode::generate();
            let value: u32 = code.as_str().parse().unwrap();
            assert!((CODE_MIN..=CODE_MAX).contains(&value));
            assert_eq!(code.as_str().len(), CODE_LENGTH);
        }
    }

    #[test]
    fn test_matches() {
        let stored = OneTimeCode::from_db("482913");
        assert!(stored.matches(&OneTimeCode::submitted(" 482913 ")));
        assert!(!stored.matches(&OneTimeCode::submitted("482914")));
        assert!(!stored.matches(&OneTimeCode::submitted("48291")));
        assert!(!stored.matches(&OneTimeCode::submitted("")));
    }

    #[test]
    fn test_debug_is_redacted() {
        let code = OneTimeCode::from_db("482913");
        assert!(!format!("{:?}", code).contains("482913"));
    }
}
