//! Application Configuration
//!
//! Configuration for the Accounts application layer.

use std::time::Duration;

pub use platform::password::PasswordPolicy;

/// Accounts application configuration
#[derive(Clone)]
pub struct AccountsConfig {
    /// HMAC key for temporary registration tokens and access tokens (32 bytes)
    pub session_secret: [u8; 32],
    /// Lifetime of a registration session from step 1 (1 hour)
    pub registration_ttl: Duration,
    /// Lifetime of each one-time code from issuance (10 minutes)
    pub code_ttl: Duration,
    /// Minimum gap between delivered code issuances (60 seconds)
    pub resend_cooldown: Duration,
    /// Upper bound on one channel's send attempt (10 seconds)
    pub delivery_timeout: Duration,
    /// Access token lifetime (12 hours)
    pub access_token_ttl: Duration,
    pub password_policy: PasswordPolicy,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    /// Public frontend URL, used for links in emails
    pub client_url: String,
}

impl Default for AccountsConfig {
    fn default() -> Self {
        Self {
            session_secret: [0u8; 32],
            registration_ttl: Duration::from_secs(3600),
            code_ttl: Duration::from_secs(10 * 60),
            resend_cooldown: Duration::from_secs(60),
            delivery_timeout: Duration::from_secs(10),
            access_token_ttl: Duration::from_secs(12 * 3600),
            password_policy: PasswordPolicy::default(),
            password_pepper: None,
            client_url: "http://localhost:40922".to_string(),
        }
    }
}

impl AccountsConfig {
    /// Create config with a random session secret (for development)
    pub fn with_random_secret() -> Self {
        use rand::RngCore;
        let mut secret = [0u8; 32];
        rand::rng().fill_bytes(&mut secret);
        Self {
            session_secret: secret,
            ..Default::default()
        }
    }

    /// Create config for development
    pub fn development() -> Self {
        Self::with_random_secret()
    }

    pub fn registration_ttl_ms(&self) -> i64 {
        self.registration_ttl.as_millis() as i64
    }

    pub fn code_ttl_ms(&self) -> i64 {
        self.code_ttl.as_millis() as i64
    }

    pub fn resend_cooldown_ms(&self) -> i64 {
        self.resend_cooldown.as_millis() as i64
    }

    pub fn access_token_ttl_ms(&self) -> i64 {
        self.access_token_ttl.as_millis() as i64
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}

impl std::fmt::Debug for AccountsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountsConfig")
            .field("session_secret", &"[REDACTED]")
            .field("registration_ttl", &self.registration_ttl)
            .field("code_ttl", &self.code_ttl)
            .field("resend_cooldown", &self.resend_cooldown)
            .field("delivery_timeout", &self.delivery_timeout)
            .field("access_token_ttl", &self.access_token_ttl)
            .field("password_policy", &self.password_policy)
            .field("password_pepper", &self.password_pepper.as_ref().map(|_| "[REDACTED]"))
            .field("client_url", &self.client_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AccountsConfig::default();
        assert_eq!(config.registration_ttl_ms(), 3_600_000);
        assert_eq!(config.code_ttl_ms(), 600_000);
        assert_eq!(config.resend_cooldown_ms(), 60_000);
        assert_eq!(config.delivery_timeout, Duration::from_secs(10));
        assert_eq!(config.password_policy.min_length, 6);
        assert!(config.pepper().is_none());
    }

    #[test]
    fn test_random_secret() {
        let a = AccountsConfig::with_random_secret();
        let b = AccountsConfig::with_random_secret();
        assert_ne!(a.session_secret, [0u8; 32]);
        assert_ne!(a.session_secret, b.session_secret);
    }

    #[test]
    fn test_debug_hides_secrets() {
        let config = AccountsConfig {
            password_pepper: Some(b"pepper".to_vec()),
            ..AccountsConfig::development()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("112, 101, 112"));
        assert!(debug.contains("[REDACTED]"));
    }
}
