//! College Admin Verification
//!
//! Platform admins review college admins: list the pending ones, approve or
//! reject, look at one in detail, and see aggregate counts.

use std::sync::Arc;

use chrono::{Duration, Utc};
use kernel::id::UserId;
use platform::notify::{NotificationTransport, OutboundMessage};

use crate::application::config::AccountsConfig;
use crate::application::dispatch::NotificationDispatcher;
use crate::domain::entity::{activity::Activity, college::College, user::User};
use crate::domain::repository::{
    AccountsUnitOfWork, ActivityRepository, AdminStats, CollegeRepository, UserRepository,
};
use crate::domain::value_object::user_role::UserRole;
use crate::error::{AccountsError, AccountsResult};

pub const DEFAULT_PAGE_LIMIT: i64 = 10;
pub const MAX_PAGE_LIMIT: i64 = 100;
const DETAIL_ACTIVITY_LIMIT: i64 = 10;

fn parse_user_id(raw: &str) -> AccountsResult<UserId> {
    UserId::parse_str(raw).map_err(|_| AccountsError::Validation("Invalid user id".to_string()))
}

async fn load_college_admin<U>(user_repo: &U, user_id: &UserId) -> AccountsResult<User>
where
    U: UserRepository,
{
    let user = user_repo
        .find_by_id(user_id)
        .await?
        .ok_or(AccountsError::UserNotFound)?;
    if user.role != UserRole::CollegeAdmin {
        return Err(AccountsError::NotCollegeAdmin);
    }
    Ok(user)
}

// ============================================================================
// List pending
// ============================================================================

pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

pub struct PendingAdminsOutput {
    pub admins: Vec<User>,
    pub pagination: Pagination,
}

pub struct ListPendingAdminsUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> ListPendingAdminsUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(
        &self,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> AccountsResult<PendingAdminsOutput> {
        let page = page.unwrap_or(1);
        let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT);

        if page < 1 {
            return Err(AccountsError::Validation("page must be at least 1".to_string()));
        }
        if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
            return Err(AccountsError::Validation(format!(
                "limit must be between 1 and {}",
                MAX_PAGE_LIMIT
            )));
        }

        let offset = (page - 1).saturating_mul(limit);
        let (admins, total) = self.user_repo.list_pending_admins(offset, limit).await?;

        Ok(PendingAdminsOutput {
            admins,
            pagination: Pagination {
                page,
                limit,
                total,
                total_pages: (total + limit - 1) / limit,
            },
        })
    }
}

// ============================================================================
// Approve / reject
// ============================================================================

pub struct DecideAdminInput {
    pub user_id: String,
    pub approved: bool,
    pub reason: Option<String>,
}

pub struct DecideAdminOutput {
    pub user: User,
    /// Present on approval when the admin belongs to a college
    pub college: Option<College>,
}

pub struct DecideAdminUseCase<U, C, W, T>
where
    U: UserRepository,
    C: CollegeRepository,
    W: AccountsUnitOfWork,
    T: NotificationTransport + Send + Sync + 'static,
{
    user_repo: Arc<U>,
    college_repo: Arc<C>,
    uow: Arc<W>,
    dispatcher: NotificationDispatcher<T>,
    config: Arc<AccountsConfig>,
}

impl<U, C, W, T> DecideAdminUseCase<U, C, W, T>
where
    U: UserRepository,
    C: CollegeRepository,
    W: AccountsUnitOfWork,
    T: NotificationTransport + Send + Sync + 'static,
{
    pub fn new(
        user_repo: Arc<U>,
        college_repo: Arc<C>,
        uow: Arc<W>,
        dispatcher: NotificationDispatcher<T>,
        config: Arc<AccountsConfig>,
    ) -> Self {
        Self {
            user_repo,
            college_repo,
            uow,
            dispatcher,
            config,
        }
    }

    pub async fn execute(
        &self,
        input: DecideAdminInput,
        reviewer: &UserId,
    ) -> AccountsResult<DecideAdminOutput> {
        let user_id = parse_user_id(&input.user_id)?;
        let mut user = load_college_admin(self.user_repo.as_ref(), &user_id).await?;

        if input.approved {
            self.approve(&mut user, reviewer).await
        } else {
            self.reject(user, input.reason, reviewer).await
        }
    }

    async fn approve(
        &self,
        user: &mut User,
        reviewer: &UserId,
    ) -> AccountsResult<DecideAdminOutput> {
        user.approve();

        let mut college = match &user.college_id {
            Some(id) => self.college_repo.find_by_id(id).await?,
            None => None,
        };
        if let Some(c) = college.as_mut() {
            c.admin_verified = true;
        }

        let activity = Activity::admin_verified(user, college.as_ref());
        self.uow
            .record_admin_decision(user, college.as_ref().map(|c| &c.college_id), &activity)
            .await?;

        tracing::info!(user_id = %user.user_id, reviewer = %reviewer, "College admin approved");

        let message = OutboundMessage::email(
            user.email.as_str(),
            "Your college admin account is verified",
            format!(
                "Hi {}, your college admin account has been approved. Sign in at {}/login",
                user.first_name,
                self.config.client_url.trim_end_matches('/')
            ),
        );
        self.dispatcher.send_email_best_effort(message).await;

        Ok(DecideAdminOutput {
            user: user.clone(),
            college,
        })
    }

    async fn reject(
        &self,
        mut user: User,
        reason: Option<String>,
        reviewer: &UserId,
    ) -> AccountsResult<DecideAdminOutput> {
        user.reject(reason);

        let activity = Activity::admin_rejected(&user);
        self.uow.record_admin_decision(&user, None, &activity).await?;

        tracing::info!(user_id = %user.user_id, reviewer = %reviewer, "College admin rejected");

        let message = OutboundMessage::email(
            user.email.as_str(),
            "Your college admin application",
            format!(
                "Hi {}, your college admin application was not approved. Reason: {}",
                user.first_name,
                user.suspension_reason.as_deref().unwrap_or_default()
            ),
        );
        self.dispatcher.send_email_best_effort(message).await;

        Ok(DecideAdminOutput {
            user,
            college: None,
        })
    }
}

// ============================================================================
// Detail
// ============================================================================

pub struct AdminDetailOutput {
    pub user: User,
    pub college: Option<College>,
    pub recent_activity: Vec<Activity>,
}

pub struct AdminDetailUseCase<U, C, A>
where
    U: UserRepository,
    C: CollegeRepository,
    A: ActivityRepository,
{
    user_repo: Arc<U>,
    college_repo: Arc<C>,
    activity_repo: Arc<A>,
}

impl<U, C, A> AdminDetailUseCase<U, C, A>
where
    U: UserRepository,
    C: CollegeRepository,
    A: ActivityRepository,
{
    pub fn new(user_repo: Arc<U>, college_repo: Arc<C>, activity_repo: Arc<A>) -> Self {
        Self {
            user_repo,
            college_repo,
            activity_repo,
        }
    }

    pub async fn execute(&self, user_id: &str) -> AccountsResult<AdminDetailOutput> {
        let user_id = parse_user_id(user_id)?;
        let user = load_college_admin(self.user_repo.as_ref(), &user_id).await?;

        let college = match &user.college_id {
            Some(id) => self.college_repo.find_by_id(id).await?,
            None => None,
        };
        let recent_activity = self
            .activity_repo
            .recent_for_user(&user.user_id, DETAIL_ACTIVITY_LIMIT)
            .await?;

        Ok(AdminDetailOutput {
            user,
            college,
            recent_activity,
        })
    }
}

// ============================================================================
// Stats
// ============================================================================

pub struct AdminStatsUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> AdminStatsUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    /// "This week" is the trailing seven days
    pub async fn execute(&self) -> AccountsResult<AdminStats> {
        let since = Utc::now() - Duration::days(7);
        self.user_repo.admin_stats(since).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_user_id() {
        assert!(parse_user_id("not-a-uuid").is_err());
        let id = UserId::new();
        assert_eq!(parse_user_id(&id.to_string()).unwrap(), id);
    }
}
