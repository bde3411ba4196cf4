//! User Entity
//!
//! Permanent account, created from a fully verified registration session
//! (students) or provisioned out of band (admins).

use chrono::{DateTime, Utc};
use kernel::id::{CollegeId, UserId};

use crate::domain::entity::registration_session::RegistrationSession;
use crate::domain::value_object::{
    email::Email, graduation_year::GraduationYear, person_name::PersonName,
    phone_number::PhoneNumber, referral_code::ReferralCode, user_role::UserRole,
};

pub const DEFAULT_REJECTION_REASON: &str = "Verification rejected";

#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    pub email: Email,
    pub phone: PhoneNumber,
    pub first_name: PersonName,
    pub last_name: PersonName,
    /// Argon2id PHC string
    pub password_hash: String,
    pub role: UserRole,
    pub college_id: Option<CollegeId>,
    pub graduation_year: Option<GraduationYear>,
    pub email_verified: bool,
    pub phone_verified: bool,
    /// Admin approval (college admins); students are verified at creation
    pub is_verified: bool,
    /// Immutable once assigned
    pub referral_code: Option<ReferralCode>,
    pub referral_count: i32,
    /// Set at most once, during step 4
    pub referred_by: Option<UserId>,
    pub is_suspended: bool,
    pub suspension_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        email: Email,
        phone: PhoneNumber,
        first_name: PersonName,
        last_name: PersonName,
        password_hash: String,
        role: UserRole,
    ) -> Self {
        let now = Utc::now();
        Self {
            user_id: UserId::new(),
            email,
            phone,
            first_name,
            last_name,
            password_hash,
            role,
            college_id: None,
            graduation_year: None,
            email_verified: false,
            phone_verified: false,
            is_verified: false,
            referral_code: None,
            referral_count: 0,
            referred_by: None,
            is_suspended: false,
            suspension_reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Student created by step 3, both channels proven
    pub fn from_verified_session(session: &RegistrationSession) -> Self {
        let mut user = Self::new(
            session.email.clone(),
            session.phone.clone(),
            session.first_name.clone(),
            session.last_name.clone(),
            session.password_hash.clone(),
            UserRole::Student,
        );
        user.college_id = session.college_id;
        user.graduation_year = session.graduation_year;
        user.email_verified = true;
        user.phone_verified = true;
        user.is_verified = true;
        user.ensure_referral_code();
        user
    }

    /// Assign a referral code if the user has none; never replaces an existing one
    pub fn ensure_referral_code(&mut self) -> &ReferralCode {
        self.referral_code.get_or_insert_with(ReferralCode::generate)
    }

    /// Draw a different code after a uniqueness collision on insert
    ///
    /// Only valid before the user has been persisted.
    pub fn regenerate_referral_code(&mut self) {
        self.referral_code = Some(ReferralCode::generate());
    }

    /// "First L." as shown in the public feed
    pub fn public_name(&self) -> String {
        match self.last_name.as_str().chars().next() {
            Some(initial) => format!("{} {}.", self.first_name, initial),
            None => self.first_name.to_string(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_pending_college_admin(&self) -> bool {
        self.role == UserRole::CollegeAdmin && !self.is_verified && !self.is_suspended
    }

    pub fn approve(&mut self) {
        self.is_verified = true;
        self.is_suspended = false;
        self.suspension_reason = None;
        self.updated_at = Utc::now();
    }

    pub fn reject(&mut self, reason: Option<String>) {
        let reason = reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| DEFAULT_REJECTION_REASON.to_string());
        self.is_verified = false;
        self.is_suspended = true;
        self.suspension_reason = Some(reason);
        self.updated_at = Utc::now();
    }
}
