//! Signed Tokens
//!
//! Two token shapes share one HMAC-SHA256 key, kept apart by a purpose prefix
//! inside the MAC input so a registration token can never pass as an access
//! token or the other way round.
//!
//! - Registration (temp) token: `{session_uuid}.{base64url(mac)}`; the session
//!   row holds all state, the token only proves the id was issued by us.
//! - Access token: `{base64url(user_id:role:expires_ms)}.{base64url(mac)}`;
//!   stateless, the middleware still reloads the user on every request.

use kernel::id::{RegistrationSessionId, UserId};
use platform::crypto::{constant_time_eq, from_base64_url, hmac_sha256, to_base64_url};

use crate::domain::value_object::user_role::UserRole;

const REGISTRATION_PURPOSE: &[u8] = b"registration:";
const ACCESS_PURPOSE: &[u8] = b"access:";

fn mac(secret: &[u8; 32], purpose: &[u8], payload: &[u8]) -> [u8; 32] {
    let mut input = Vec::with_capacity(purpose.len() + payload.len());
    input.extend_from_slice(purpose);
    input.extend_from_slice(payload);
    hmac_sha256(secret, &input)
}

fn signature_matches(secret: &[u8; 32], purpose: &[u8], payload: &[u8], signature: &str) -> bool {
    let Ok(provided) = from_base64_url(signature) else {
        return false;
    };
    constant_time_eq(&mac(secret, purpose, payload), &provided)
}

// ============================================================================
// Registration token
// ============================================================================

pub fn sign_registration_token(secret: &[u8; 32], session_id: &RegistrationSessionId) -> String {
    let id = session_id.to_string();
    let signature = mac(secret, REGISTRATION_PURPOSE, id.as_bytes());
    format!("{}.{}", id, to_base64_url(&signature))
}

/// `None` for anything malformed or not signed with `secret`
pub fn verify_registration_token(secret: &[u8; 32], token: &str) -> Option<RegistrationSessionId> {
    let (id, signature) = token.trim().split_once('.')?;
    if !signature_matches(secret, REGISTRATION_PURPOSE, id.as_bytes(), signature) {
        return None;
    }
    RegistrationSessionId::parse_str(id).ok()
}

// ============================================================================
// Access token
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessClaims {
    pub user_id: UserId,
    pub role: UserRole,
    pub expires_at_ms: i64,
}

pub fn issue_access_token(secret: &[u8; 32], claims: &AccessClaims) -> String {
    let payload = format!(
        "{}:{}:{}",
        claims.user_id,
        claims.role.code(),
        claims.expires_at_ms
    );
    let signature = mac(secret, ACCESS_PURPOSE, payload.as_bytes());
    format!(
        "{}.{}",
        to_base64_url(payload.as_bytes()),
        to_base64_url(&signature)
    )
}

/// `None` when malformed, forged or expired at `now_ms`
pub fn verify_access_token(secret: &[u8; 32], token: &str, now_ms: i64) -> Option<AccessClaims> {
    let (encoded_payload, signature) = token.trim().split_once('.')?;
    let payload = from_base64_url(encoded_payload).ok()?;
    if !signature_matches(secret, ACCESS_PURPOSE, &payload, signature) {
        return None;
    }

    let payload = String::from_utf8(payload).ok()?;
    let mut parts = payload.splitn(3, ':');
    let user_id = UserId::parse_str(parts.next()?).ok()?;
    let role = UserRole::from_code(parts.next()?)?;
    let expires_at_ms: i64 = parts.next()?.parse().ok()?;

    if now_ms >= expires_at_ms {
        return None;
    }

    Some(AccessClaims {
        user_id,
        role,
        expires_at_ms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: [u8; 32] = [7u8; 32];

    #[test]
    fn test_registration_token_verifies() {
        let id = RegistrationSessionId::new();
        let token = sign_registration_token(&SECRET, &id);
        assert_eq!(verify_registration_token(&SECRET, &token), Some(id));
    }

    #[test]
    fn test_registration_token_rejects_tampering() {
        let id = RegistrationSessionId::new();
        let token = sign_registration_token(&SECRET, &id);

        assert_eq!(verify_registration_token(&[8u8; 32], &token), None);

        let other = RegistrationSessionId::new();
        let (_, sig) = token.split_once('.').unwrap();
        assert_eq!(
            verify_registration_token(&SECRET, &format!("{}.{}", other, sig)),
            None
        );

        assert_eq!(verify_registration_token(&SECRET, "garbage"), None);
        assert_eq!(verify_registration_token(&SECRET, ""), None);
        assert_eq!(verify_registration_token(&SECRET, "a.b.c"), None);
    }

    #[test]
    fn test_access_token_verifies_until_expiry() {
        let claims = AccessClaims {
            user_id: UserId::new(),
            role: UserRole::PlatformAdmin,
            expires_at_ms: 10_000,
        };
        let token = issue_access_token(&SECRET, &claims);

        assert_eq!(verify_access_token(&SECRET, &token, 9_999), Some(claims));
        assert_eq!(verify_access_token(&SECRET, &token, 10_000), None);
        assert_eq!(verify_access_token(&[9u8; 32], &token, 0), None);
    }

    #[test]
    fn test_tokens_are_not_interchangeable() {
        let session_id = RegistrationSessionId::new();
        let registration = sign_registration_token(&SECRET, &session_id);
        assert_eq!(verify_access_token(&SECRET, &registration, 0), None);

        let access = issue_access_token(
            &SECRET,
            &AccessClaims {
                user_id: UserId::new(),
                role: UserRole::Student,
                expires_at_ms: i64::MAX,
            },
        );
        assert_eq!(verify_registration_token(&SECRET, &access), None);
    }
}
