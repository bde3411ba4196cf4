//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::admin_verification::Pagination;
use crate::domain::entity::{activity::Activity, college::College, user::User};
use crate::domain::repository::AdminStats;

// ============================================================================
// Registration
// ============================================================================

/// Step 1 request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterStep1Request {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    #[serde(default)]
    pub terms_accepted: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterStep1Response {
    pub temp_token: String,
    pub step: i16,
}

/// Step 2 request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterStep2Request {
    pub temp_token: String,
    /// College id
    pub college: String,
    pub graduation_year: i32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterStep2Response {
    pub temp_token: String,
    pub step: i16,
    pub email_sent: bool,
    pub message_sent: bool,
}

/// Step 3 request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterStep3Request {
    pub temp_token: String,
    pub email_code: String,
    pub phone_code: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterStep3Response {
    pub temp_token: String,
    pub user_id: String,
    pub is_verified: bool,
}

/// Step 4 request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterStep4Request {
    pub temp_token: String,
    pub user_id: String,
    pub referral_code: Option<String>,
    #[serde(default)]
    pub skip_referral: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterStep4Response {
    pub user: UserProfile,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResendCodesRequest {
    pub temp_token: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResendCodesResponse {
    pub temp_token: String,
    pub email_sent: bool,
    pub message_sent: bool,
    /// Seconds until the next resend is accepted
    pub wait_time: u64,
}

// ============================================================================
// Sign In
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Bearer token for `Authorization` header
    pub token: String,
    pub expires_at_ms: i64,
    pub user: UserProfile,
}

// ============================================================================
// Shared views
// ============================================================================

/// User as returned to clients; never carries the password hash
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub phone: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub college_id: Option<String>,
    pub graduation_year: Option<i32>,
    pub email_verified: bool,
    pub phone_verified: bool,
    pub is_verified: bool,
    pub referral_code: Option<String>,
    pub referral_count: i32,
    pub referred_by: Option<String>,
    pub is_suspended: bool,
    pub suspension_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.user_id.to_string(),
            email: user.email.as_str().to_string(),
            phone: user.phone.as_str().to_string(),
            first_name: user.first_name.as_str().to_string(),
            last_name: user.last_name.as_str().to_string(),
            role: user.role.code().to_string(),
            college_id: user.college_id.map(|id| id.to_string()),
            graduation_year: user.graduation_year.map(|y| y.value()),
            email_verified: user.email_verified,
            phone_verified: user.phone_verified,
            is_verified: user.is_verified,
            referral_code: user.referral_code.as_ref().map(|c| c.as_str().to_string()),
            referral_count: user.referral_count,
            referred_by: user.referred_by.map(|id| id.to_string()),
            is_suspended: user.is_suspended,
            suspension_reason: user.suspension_reason.clone(),
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollegeView {
    pub id: String,
    pub name: String,
    pub student_count: i64,
    pub admin_verified: bool,
}

impl From<&College> for CollegeView {
    fn from(college: &College) -> Self {
        Self {
            id: college.college_id.to_string(),
            name: college.name.clone(),
            student_count: college.student_count,
            admin_verified: college.admin_verified,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityView {
    pub id: String,
    pub kind: String,
    pub message: String,
    pub college_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Activity> for ActivityView {
    fn from(activity: &Activity) -> Self {
        Self {
            id: activity.activity_id.to_string(),
            kind: activity.kind.code().to_string(),
            message: activity.message.clone(),
            college_id: activity.college_id.map(|id| id.to_string()),
            created_at: activity.created_at,
        }
    }
}

// ============================================================================
// Admin Verification
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PendingAdminsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationView {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl From<&Pagination> for PaginationView {
    fn from(p: &Pagination) -> Self {
        Self {
            page: p.page,
            limit: p.limit,
            total: p.total,
            total_pages: p.total_pages,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingAdminsResponse {
    pub admins: Vec<UserProfile>,
    pub pagination: PaginationView,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyAdminRequest {
    pub approved: bool,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyAdminResponse {
    pub user: UserProfile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub college: Option<CollegeView>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDetailResponse {
    pub user: UserProfile,
    pub college: Option<CollegeView>,
    pub recent_activity: Vec<ActivityView>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationStatsResponse {
    pub pending: i64,
    pub verified: i64,
    pub rejected: i64,
    pub this_week: i64,
    pub colleges_with_admins: i64,
    pub total: i64,
}

impl From<AdminStats> for VerificationStatsResponse {
    fn from(s: AdminStats) -> Self {
        Self {
            pending: s.pending,
            verified: s.verified,
            rejected: s.rejected,
            this_week: s.this_week,
            colleges_with_admins: s.colleges_with_admins,
            total: s.total,
        }
    }
}

// ============================================================================
// Activity Feed / Health
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityFeedQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityFeedResponse {
    pub activities: Vec<ActivityView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
