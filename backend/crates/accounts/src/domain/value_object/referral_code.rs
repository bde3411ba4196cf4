//! Referral Code Value Object
//!
//! Eight characters drawn from an upper-case alphabet without the
//! look-alikes `0`, `O`, `1` and `I`, so codes survive being read aloud.

use rand::Rng;
use serde::{Deserialize, Serialize};

pub const REFERRAL_CODE_LENGTH: usize = 8;
const ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferralCode(String);

impl ReferralCode {
    pub fn generate() -> Self {
        let mut rng = rand::rng();
        let code = (0..REFERRAL_CODE_LENGTH)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect();
        Self(code)
    }

    /// Normalise user input for lookup
    ///
    /// Returns `None` for anything that cannot be a code; callers treat that
    /// the same as a code nobody owns.
    pub fn normalize(raw: &str) -> Option<Self> {
        let code = raw.trim().to_ascii_uppercase();
        let valid = code.len() == REFERRAL_CODE_LENGTH
            && code.bytes().all(|b| ALPHABET.contains(&b));
        valid.then_some(Self(code))
    }

    pub fn from_db(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ReferralCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
