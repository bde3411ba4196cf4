//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.
//! Reads of registration sessions only ever return unexpired rows.

use chrono::{DateTime, Utc};
use kernel::id::{CollegeId, RegistrationSessionId, UserId};

use crate::domain::entity::{
    activity::Activity, college::College, registration_session::RegistrationSession, user::User,
};
use crate::domain::value_object::{
    email::Email, phone_number::PhoneNumber, referral_code::ReferralCode,
};
use crate::error::AccountsResult;

/// Result of trying to turn a verified session into a user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromotionOutcome {
    /// User inserted, counter incremented, activity appended
    Promoted,
    /// Another request promoted this session first
    AlreadyPromoted,
    /// The session passed its TTL before it could be claimed
    SessionExpired,
    /// Email was registered after step 1
    EmailTaken,
    /// Phone was registered after step 1
    PhoneTaken,
    /// Generated referral code collided; regenerate and retry
    ReferralCodeTaken,
}

/// Counts for the admin verification dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdminStats {
    pub pending: i64,
    pub verified: i64,
    pub rejected: i64,
    /// College admins created since the given instant
    pub this_week: i64,
    /// Colleges with a verified admin
    pub colleges_with_admins: i64,
    /// All college admins
    pub total: i64,
}

/// Temporary registration session repository
#[trait_variant::make(RegistrationSessionRepository: Send)]
pub trait LocalRegistrationSessionRepository {
    async fn create(&self, session: &RegistrationSession) -> AccountsResult<()>;

    /// Find a session that has not passed `expires_at_ms`
    async fn find_active(
        &self,
        session_id: &RegistrationSessionId,
    ) -> AccountsResult<Option<RegistrationSession>>;

    /// Persist mutable fields of an unpromoted session
    async fn update(&self, session: &RegistrationSession) -> AccountsResult<()>;

    /// Persist a fresh issuance only if the stored `codes_issued_at_ms` still
    /// equals `expected_issued_at_ms`. Returns `false` when another issuance
    /// got there first or the session was promoted or expired.
    async fn claim_issuance(
        &self,
        session: &RegistrationSession,
        expected_issued_at_ms: Option<i64>,
    ) -> AccountsResult<bool>;

    /// Delete expired sessions
    async fn purge_expired(&self) -> AccountsResult<u64>;
}

/// Permanent user repository
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    async fn find_by_id(&self, user_id: &UserId) -> AccountsResult<Option<User>>;

    async fn find_by_email(&self, email: &Email) -> AccountsResult<Option<User>>;

    async fn exists_by_email(&self, email: &Email) -> AccountsResult<bool>;

    async fn exists_by_phone(&self, phone: &PhoneNumber) -> AccountsResult<bool>;

    async fn find_by_referral_code(&self, code: &ReferralCode) -> AccountsResult<Option<User>>;

    /// Pending college admins, oldest first, with the total pending count
    async fn list_pending_admins(&self, offset: i64, limit: i64)
    -> AccountsResult<(Vec<User>, i64)>;

    async fn admin_stats(&self, since: DateTime<Utc>) -> AccountsResult<AdminStats>;
}

/// College repository (read side)
#[trait_variant::make(CollegeRepository: Send)]
pub trait LocalCollegeRepository {
    async fn find_by_id(&self, college_id: &CollegeId) -> AccountsResult<Option<College>>;
}

/// Activity feed repository (read side; writes go through the unit of work)
#[trait_variant::make(ActivityRepository: Send)]
pub trait LocalActivityRepository {
    /// Newest first
    async fn recent(&self, limit: i64) -> AccountsResult<Vec<Activity>>;

    /// Newest first, for one subject
    async fn recent_for_user(&self, user_id: &UserId, limit: i64)
    -> AccountsResult<Vec<Activity>>;
}

/// Multi-row writes that must commit or roll back together
#[trait_variant::make(AccountsUnitOfWork: Send)]
pub trait LocalAccountsUnitOfWork {
    /// Claim the session, insert the user, bump the college counter and
    /// append the activity in one transaction
    async fn promote_session(
        &self,
        session: &RegistrationSession,
        user: &User,
        activity: &Activity,
    ) -> AccountsResult<PromotionOutcome>;

    /// Set `referred_by` if still unset, bump the referrer's count and append
    /// the activity. Returns `false` when the user already had a referrer.
    async fn link_referral(
        &self,
        user_id: &UserId,
        referrer_id: &UserId,
        activity: &Activity,
    ) -> AccountsResult<bool>;

    /// Persist the reviewed admin's flags, optionally mark their college as
    /// having a verified admin, and append the activity
    async fn record_admin_decision(
        &self,
        user: &User,
        verified_college: Option<&CollegeId>,
        activity: &Activity,
    ) -> AccountsResult<()>;
}
