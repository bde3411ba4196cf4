//! Registration Session Entity
//!
//! In-flight sign-up state, addressed by a signed temporary token.
//! `expires_at_ms` is fixed at creation and never extended, so an unfinished
//! registration disappears one TTL after step 1 whatever step it reached.

use chrono::{DateTime, Utc};
use kernel::id::{CollegeId, RegistrationSessionId, UserId};

use crate::domain::value_object::{
    email::Email, graduation_year::GraduationYear, one_time_code::OneTimeCode,
    person_name::PersonName, phone_number::PhoneNumber, registration_step::RegistrationStep,
};

/// Why a step-3 submission was refused, in the order the checks run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeRejection {
    NotIssued,
    EmailExpired,
    PhoneExpired,
    EmailIncorrect,
    PhoneIncorrect,
}

/// Both codes produced by one issuance
#[derive(Debug, Clone)]
pub struct IssuedCodes {
    pub email_code: OneTimeCode,
    pub phone_code: OneTimeCode,
}

#[derive(Debug, Clone)]
pub struct RegistrationSession {
    pub session_id: RegistrationSessionId,
    pub step: RegistrationStep,
    pub email: Email,
    pub phone: PhoneNumber,
    pub first_name: PersonName,
    pub last_name: PersonName,
    /// Argon2id PHC string; copied into the user at promotion
    pub password_hash: String,
    pub college_id: Option<CollegeId>,
    pub graduation_year: Option<GraduationYear>,
    pub email_code: Option<OneTimeCode>,
    pub phone_code: Option<OneTimeCode>,
    pub codes_issued_at_ms: Option<i64>,
    pub email_code_expires_at_ms: Option<i64>,
    pub phone_code_expires_at_ms: Option<i64>,
    /// Whether the latest issuance may have reached someone: set when the
    /// codes are issued, cleared only when every channel failed
    pub codes_delivered: bool,
    pub email_verified: bool,
    pub phone_verified: bool,
    /// Set exactly once, by the transaction that creates the user
    pub promoted_user_id: Option<UserId>,
    pub expires_at_ms: i64,
    pub created_at: DateTime<Utc>,
}

impl RegistrationSession {
    pub fn new(
        email: Email,
        phone: PhoneNumber,
        first_name: PersonName,
        last_name: PersonName,
        password_hash: String,
        ttl_ms: i64,
    ) -> Self {
        let created_at = Utc::now();
        Self {
            session_id: RegistrationSessionId::new(),
            step: RegistrationStep::Initiated,
            email,
            phone,
            first_name,
            last_name,
            password_hash,
            college_id: None,
            graduation_year: None,
            email_code: None,
            phone_code: None,
            codes_issued_at_ms: None,
            email_code_expires_at_ms: None,
            phone_code_expires_at_ms: None,
            codes_delivered: false,
            email_verified: false,
            phone_verified: false,
            promoted_user_id: None,
            expires_at_ms: created_at.timestamp_millis() + ttl_ms,
            created_at,
        }
    }

    pub fn is_expired(&self, now_ms: i64) -> bool {
        now_ms >= self.expires_at_ms
    }

    pub fn is_promoted(&self) -> bool {
        self.promoted_user_id.is_some()
    }

    pub fn select_college(&mut self, college_id: CollegeId, graduation_year: GraduationYear) {
        self.college_id = Some(college_id);
        self.graduation_year = Some(graduation_year);
    }

    /// Seconds left before another issuance is allowed
    ///
    /// The cooldown runs from issuance, including while the send is still in
    /// flight; after a total delivery failure the caller may retry at once.
    pub fn resend_wait_secs(&self, cooldown_ms: i64, now_ms: i64) -> Option<u64> {
        if !self.codes_delivered {
            return None;
        }
        let issued_at = self.codes_issued_at_ms?;
        let remaining_ms = issued_at + cooldown_ms - now_ms;
        (remaining_ms > 0).then(|| (remaining_ms as u64).div_ceil(1000))
    }

    /// Replace both codes with fresh ones, each valid for `code_ttl_ms` from `now_ms`
    pub fn issue_codes(&mut self, code_ttl_ms: i64, now_ms: i64) -> IssuedCodes {
        let codes = IssuedCodes {
            email_code: OneTimeCode::generate(),
            phone_code: OneTimeCode::generate(),
        };

        self.email_code = Some(codes.email_code.clone());
        self.phone_code = Some(codes.phone_code.clone());
        self.codes_issued_at_ms = Some(now_ms);
        self.email_code_expires_at_ms = Some(now_ms + code_ttl_ms);
        self.phone_code_expires_at_ms = Some(now_ms + code_ttl_ms);
        self.codes_delivered = true;
        self.email_verified = false;
        self.phone_verified = false;
        self.step = RegistrationStep::CollegeSelected;

        codes
    }

    pub fn record_delivery(&mut self, delivered_anywhere: bool) {
        self.codes_delivered = delivered_anywhere;
    }

    /// Check submitted codes; expiry is reported before correctness
    pub fn check_codes(
        &self,
        email_code: &OneTimeCode,
        phone_code: &OneTimeCode,
        now_ms: i64,
    ) -> Result<(), CodeRejection> {
        let (
            Some(stored_email),
            Some(stored_phone),
            Some(email_expires),
            Some(phone_expires),
        ) = (
            &self.email_code,
            &self.phone_code,
            self.email_code_expires_at_ms,
            self.phone_code_expires_at_ms,
        )
        else {
            return Err(CodeRejection::NotIssued);
        };

        if now_ms >= email_expires {
            return Err(CodeRejection::EmailExpired);
        }
        if now_ms >= phone_expires {
            return Err(CodeRejection::PhoneExpired);
        }
        if !stored_email.matches(email_code) {
            return Err(CodeRejection::EmailIncorrect);
        }
        if !stored_phone.matches(phone_code) {
            return Err(CodeRejection::PhoneIncorrect);
        }
        Ok(())
    }

    /// Consume the session in favour of `user_id`
    pub fn mark_promoted(&mut self, user_id: UserId) {
        self.email_verified = true;
        self.phone_verified = true;
        self.step = RegistrationStep::Verified;
        self.promoted_user_id = Some(user_id);
    }
}
