//! HTTP Handlers

use axum::extract::{Extension, Path, Query, State};
use axum::Json;
use std::sync::Arc;

use platform::notify::NotificationTransport;

use crate::application::config::AccountsConfig;
use crate::application::{
    AdminDetailUseCase, AdminStatsUseCase, ApplyReferralInput, ApplyReferralUseCase,
    AuthenticatedUser, DecideAdminInput, DecideAdminUseCase, ListPendingAdminsUseCase,
    NotificationDispatcher, RecentActivityUseCase, RegisterStartInput, RegisterStartUseCase,
    ResendCodesUseCase, SelectCollegeInput, SelectCollegeUseCase, SignInInput, SignInUseCase,
    VerifyCodesInput, VerifyCodesUseCase,
};
use crate::domain::repository::{
    AccountsUnitOfWork, ActivityRepository, CollegeRepository, RegistrationSessionRepository,
    UserRepository,
};
use crate::error::AccountsResult;
use crate::presentation::dto::{
    ActivityFeedQuery, ActivityFeedResponse, ActivityView, AdminDetailResponse, CollegeView,
    HealthResponse, LoginRequest, LoginResponse, PaginationView, PendingAdminsQuery,
    PendingAdminsResponse, RegisterStep1Request, RegisterStep1Response, RegisterStep2Request,
    RegisterStep2Response, RegisterStep3Request, RegisterStep3Response, RegisterStep4Request,
    RegisterStep4Response, ResendCodesRequest, ResendCodesResponse, UserProfile,
    VerificationStatsResponse, VerifyAdminRequest, VerifyAdminResponse,
};

/// Every storage capability the accounts routes need, in one bound
pub trait AccountsStore:
    RegistrationSessionRepository
    + UserRepository
    + CollegeRepository
    + ActivityRepository
    + AccountsUnitOfWork
    + Clone
    + Send
    + Sync
    + 'static
{
}

impl<R> AccountsStore for R where
    R: RegistrationSessionRepository
        + UserRepository
        + CollegeRepository
        + ActivityRepository
        + AccountsUnitOfWork
        + Clone
        + Send
        + Sync
        + 'static
{
}

/// Shared state for accounts handlers
pub struct AccountsAppState<R, T>
where
    R: AccountsStore,
    T: NotificationTransport + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub email_transport: Arc<T>,
    pub sms_transport: Arc<T>,
    pub config: Arc<AccountsConfig>,
}

impl<R, T> Clone for AccountsAppState<R, T>
where
    R: AccountsStore,
    T: NotificationTransport + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            email_transport: self.email_transport.clone(),
            sms_transport: self.sms_transport.clone(),
            config: self.config.clone(),
        }
    }
}

impl<R, T> AccountsAppState<R, T>
where
    R: AccountsStore,
    T: NotificationTransport + Send + Sync + 'static,
{
    fn dispatcher(&self) -> NotificationDispatcher<T> {
        NotificationDispatcher::new(
            self.email_transport.clone(),
            self.sms_transport.clone(),
            &self.config,
        )
    }
}

// ============================================================================
// Registration
// ============================================================================

/// POST /auth/student/register/step1
pub async fn register_step1<R, T>(
    State(state): State<AccountsAppState<R, T>>,
    Json(req): Json<RegisterStep1Request>,
) -> AccountsResult<Json<RegisterStep1Response>>
where
    R: AccountsStore,
    T: NotificationTransport + Send + Sync + 'static,
{
    let use_case =
        RegisterStartUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    let output = use_case
        .execute(RegisterStartInput {
            email: req.email,
            password: req.password,
            confirm_password: req.confirm_password,
            first_name: req.first_name,
            last_name: req.last_name,
            phone: req.phone,
            terms_accepted: req.terms_accepted,
        })
        .await?;

    Ok(Json(RegisterStep1Response {
        temp_token: output.temp_token,
        step: output.step,
    }))
}

/// POST /auth/student/register/step2
pub async fn register_step2<R, T>(
    State(state): State<AccountsAppState<R, T>>,
    Json(req): Json<RegisterStep2Request>,
) -> AccountsResult<Json<RegisterStep2Response>>
where
    R: AccountsStore,
    T: NotificationTransport + Send + Sync + 'static,
{
    let use_case = SelectCollegeUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.dispatcher(),
        state.config.clone(),
    );

    let output = use_case
        .execute(SelectCollegeInput {
            temp_token: req.temp_token,
            college_id: req.college,
            graduation_year: req.graduation_year,
        })
        .await?;

    Ok(Json(RegisterStep2Response {
        temp_token: output.temp_token,
        step: output.step,
        email_sent: output.email_sent,
        message_sent: output.message_sent,
    }))
}

/// POST /auth/student/register/step3
pub async fn register_step3<R, T>(
    State(state): State<AccountsAppState<R, T>>,
    Json(req): Json<RegisterStep3Request>,
) -> AccountsResult<Json<RegisterStep3Response>>
where
    R: AccountsStore,
    T: NotificationTransport + Send + Sync + 'static,
{
    let use_case = VerifyCodesUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.repo.clone(),
        state.config.clone(),
    );

    let output = use_case
        .execute(VerifyCodesInput {
            temp_token: req.temp_token,
            email_code: req.email_code,
            phone_code: req.phone_code,
        })
        .await?;

    Ok(Json(RegisterStep3Response {
        temp_token: output.temp_token,
        user_id: output.user_id.to_string(),
        is_verified: output.is_verified,
    }))
}

/// POST /auth/student/register/step4
pub async fn register_step4<R, T>(
    State(state): State<AccountsAppState<R, T>>,
    Json(req): Json<RegisterStep4Request>,
) -> AccountsResult<Json<RegisterStep4Response>>
where
    R: AccountsStore,
    T: NotificationTransport + Send + Sync + 'static,
{
    let use_case = ApplyReferralUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.repo.clone(),
        state.config.clone(),
    );

    let output = use_case
        .execute(ApplyReferralInput {
            temp_token: req.temp_token,
            user_id: req.user_id,
            referral_code: req.referral_code,
            skip_referral: req.skip_referral,
        })
        .await?;

    Ok(Json(RegisterStep4Response {
        user: UserProfile::from(&output.user),
    }))
}

/// POST /auth/student/resend-codes
pub async fn resend_codes<R, T>(
    State(state): State<AccountsAppState<R, T>>,
    Json(req): Json<ResendCodesRequest>,
) -> AccountsResult<Json<ResendCodesResponse>>
where
    R: AccountsStore,
    T: NotificationTransport + Send + Sync + 'static,
{
    let use_case =
        ResendCodesUseCase::new(state.repo.clone(), state.dispatcher(), state.config.clone());

    let output = use_case.execute(req.temp_token).await?;

    Ok(Json(ResendCodesResponse {
        temp_token: output.temp_token,
        email_sent: output.email_sent,
        message_sent: output.message_sent,
        wait_time: output.wait_time,
    }))
}

// ============================================================================
// Sign In
// ============================================================================

/// POST /auth/login
pub async fn login<R, T>(
    State(state): State<AccountsAppState<R, T>>,
    Json(req): Json<LoginRequest>,
) -> AccountsResult<Json<LoginResponse>>
where
    R: AccountsStore,
    T: NotificationTransport + Send + Sync + 'static,
{
    let use_case = SignInUseCase::new(state.repo.clone(), state.config.clone());

    let output = use_case
        .execute(SignInInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(Json(LoginResponse {
        token: output.token,
        expires_at_ms: output.expires_at_ms,
        user: UserProfile::from(&output.user),
    }))
}

// ============================================================================
// Admin Verification (platform admin only)
// ============================================================================

/// GET /admin/pending-verifications
pub async fn pending_verifications<R, T>(
    State(state): State<AccountsAppState<R, T>>,
    Query(query): Query<PendingAdminsQuery>,
) -> AccountsResult<Json<PendingAdminsResponse>>
where
    R: AccountsStore,
    T: NotificationTransport + Send + Sync + 'static,
{
    let use_case = ListPendingAdminsUseCase::new(state.repo.clone());

    let output = use_case.execute(query.page, query.limit).await?;

    Ok(Json(PendingAdminsResponse {
        admins: output.admins.iter().map(UserProfile::from).collect(),
        pagination: PaginationView::from(&output.pagination),
    }))
}

/// POST /admin/verify-admin/{user_id}
pub async fn verify_admin<R, T>(
    State(state): State<AccountsAppState<R, T>>,
    Extension(reviewer): Extension<AuthenticatedUser>,
    Path(user_id): Path<String>,
    Json(req): Json<VerifyAdminRequest>,
) -> AccountsResult<Json<VerifyAdminResponse>>
where
    R: AccountsStore,
    T: NotificationTransport + Send + Sync + 'static,
{
    let use_case = DecideAdminUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.repo.clone(),
        state.dispatcher(),
        state.config.clone(),
    );

    let output = use_case
        .execute(
            DecideAdminInput {
                user_id,
                approved: req.approved,
                reason: req.reason,
            },
            &reviewer.user_id,
        )
        .await?;

    Ok(Json(VerifyAdminResponse {
        user: UserProfile::from(&output.user),
        college: output.college.as_ref().map(CollegeView::from),
    }))
}

/// GET /admin/verification/{user_id}
pub async fn verification_detail<R, T>(
    State(state): State<AccountsAppState<R, T>>,
    Path(user_id): Path<String>,
) -> AccountsResult<Json<AdminDetailResponse>>
where
    R: AccountsStore,
    T: NotificationTransport + Send + Sync + 'static,
{
    let use_case =
        AdminDetailUseCase::new(state.repo.clone(), state.repo.clone(), state.repo.clone());

    let output = use_case.execute(&user_id).await?;

    Ok(Json(AdminDetailResponse {
        user: UserProfile::from(&output.user),
        college: output.college.as_ref().map(CollegeView::from),
        recent_activity: output.recent_activity.iter().map(ActivityView::from).collect(),
    }))
}

/// GET /admin/verification-stats
pub async fn verification_stats<R, T>(
    State(state): State<AccountsAppState<R, T>>,
) -> AccountsResult<Json<VerificationStatsResponse>>
where
    R: AccountsStore,
    T: NotificationTransport + Send + Sync + 'static,
{
    let use_case = AdminStatsUseCase::new(state.repo.clone());

    let stats = use_case.execute().await?;

    Ok(Json(VerificationStatsResponse::from(stats)))
}

// ============================================================================
// Public
// ============================================================================

/// GET /activities/recent
pub async fn recent_activities<R, T>(
    State(state): State<AccountsAppState<R, T>>,
    Query(query): Query<ActivityFeedQuery>,
) -> AccountsResult<Json<ActivityFeedResponse>>
where
    R: AccountsStore,
    T: NotificationTransport + Send + Sync + 'static,
{
    let use_case = RecentActivityUseCase::new(state.repo.clone());

    let activities = use_case.execute(query.limit).await?;

    Ok(Json(ActivityFeedResponse {
        activities: activities.iter().map(ActivityView::from).collect(),
    }))
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
