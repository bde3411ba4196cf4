use std::sync::Arc;

use crate::application::{
    AdminDetailUseCase, AdminStatsUseCase, AuthorizeAdminUseCase, DecideAdminInput,
    DecideAdminUseCase, ListPendingAdminsUseCase, RecentActivityUseCase, SignInInput,
    SignInUseCase,
};
use crate::domain::entity::activity::ActivityKind;
use crate::domain::entity::user::{DEFAULT_REJECTION_REASON, User};
use crate::domain::value_object::user_role::UserRole;
use crate::error::AccountsError;

use super::memory::{FakeTransport, MemoryStore};
use super::{Harness, PASSWORD, make_user};

impl Harness {
    fn add_college_admin(&self, n: u32) -> User {
        let mut admin = make_user(
            &format!("dean{}@state.edu", n),
            &format!("+1555100{:04}", n),
            UserRole::CollegeAdmin,
            &self.config,
        );
        admin.college_id = Some(self.college.college_id);
        self.store.add_user(admin)
    }

    fn decide(&self) -> DecideAdminUseCase<MemoryStore, MemoryStore, MemoryStore, FakeTransport> {
        DecideAdminUseCase::new(
            self.repo(),
            self.repo(),
            self.repo(),
            self.dispatcher(),
            self.config.clone(),
        )
    }

    async fn sign_in(&self, email: &str, password: &str) -> crate::error::AccountsResult<String> {
        SignInUseCase::new(self.repo(), self.config.clone())
            .execute(SignInInput {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await
            .map(|o| o.token)
    }
}

#[tokio::test]
async fn test_sign_in_and_authorize() {
    let h = Harness::new();
    let admin = h.store.add_user(make_user(
        "root@campus.test",
        "+15550000001",
        UserRole::PlatformAdmin,
        &h.config,
    ));
    h.store.add_user(make_user(
        "student@campus.test",
        "+15550000002",
        UserRole::Student,
        &h.config,
    ));
    let authorize = AuthorizeAdminUseCase::new(h.repo(), h.config.clone());

    let token = h.sign_in("Root@Campus.test", PASSWORD).await.unwrap();
    let caller = authorize.execute(Some(&token)).await.unwrap();
    assert_eq!(caller.user_id, admin.user_id);
    assert_eq!(caller.role, UserRole::PlatformAdmin);

    let student_token = h.sign_in("student@campus.test", PASSWORD).await.unwrap();
    assert!(matches!(
        authorize.execute(Some(&student_token)).await,
        Err(AccountsError::Forbidden)
    ));

    assert!(matches!(
        authorize.execute(None).await,
        Err(AccountsError::Unauthorized)
    ));
    assert!(matches!(
        authorize.execute(Some("forged.token")).await,
        Err(AccountsError::Unauthorized)
    ));
}

#[tokio::test]
async fn test_sign_in_rejections() {
    let h = Harness::new();
    let mut suspended = make_user(
        "gone@campus.test",
        "+15550000003",
        UserRole::Student,
        &h.config,
    );
    suspended.is_suspended = true;
    h.store.add_user(suspended);

    assert!(matches!(
        h.sign_in("gone@campus.test", "wrong-password").await,
        Err(AccountsError::InvalidCredentials)
    ));
    assert!(matches!(
        h.sign_in("nobody@campus.test", PASSWORD).await,
        Err(AccountsError::InvalidCredentials)
    ));
    assert!(matches!(
        h.sign_in("gone@campus.test", PASSWORD).await,
        Err(AccountsError::AccountSuspended)
    ));
}

#[tokio::test]
async fn test_pending_admins_pagination() {
    let h = Harness::new();
    for n in 0..3 {
        h.add_college_admin(n);
    }
    let list = ListPendingAdminsUseCase::new(h.repo());

    let first = list.execute(None, None).await.unwrap();
    assert_eq!(first.admins.len(), 3);
    assert_eq!(first.pagination.limit, 10);
    assert_eq!(first.pagination.total_pages, 1);

    let second = list.execute(Some(2), Some(2)).await.unwrap();
    assert_eq!(second.admins.len(), 1);
    assert_eq!(second.pagination.total, 3);
    assert_eq!(second.pagination.total_pages, 2);

    assert!(matches!(
        list.execute(Some(0), None).await,
        Err(AccountsError::Validation(_))
    ));
    assert!(matches!(
        list.execute(None, Some(101)).await,
        Err(AccountsError::Validation(_))
    ));
}

#[tokio::test]
async fn test_approve_college_admin() {
    let h = Harness::new();
    let admin = h.add_college_admin(1);
    let reviewer = kernel::id::UserId::new();

    let output = h
        .decide()
        .execute(
            DecideAdminInput {
                user_id: admin.user_id.to_string(),
                approved: true,
                reason: None,
            },
            &reviewer,
        )
        .await
        .unwrap();

    assert!(output.user.is_verified);
    assert!(output.college.as_ref().unwrap().admin_verified);
    assert!(h.store.user(&admin.user_id).is_verified);
    assert!(h.store.college(&h.college.college_id).admin_verified);

    let notice = h.email.sent();
    assert_eq!(notice.len(), 1);
    assert_eq!(notice[0].recipient, "dean1@state.edu");
    assert!(notice[0].body.contains("/login"));

    let detail = AdminDetailUseCase::new(h.repo(), h.repo(), h.repo())
        .execute(&admin.user_id.to_string())
        .await
        .unwrap();
    assert_eq!(detail.recent_activity.len(), 1);
    assert_eq!(detail.recent_activity[0].kind, ActivityKind::AdminVerified);
    assert_eq!(detail.college.unwrap().college_id, h.college.college_id);
}

#[tokio::test]
async fn test_reject_college_admin_and_stats() {
    let h = Harness::new();
    let rejected = h.add_college_admin(1);
    h.add_college_admin(2);

    let output = h
        .decide()
        .execute(
            DecideAdminInput {
                user_id: rejected.user_id.to_string(),
                approved: false,
                reason: None,
            },
            &kernel::id::UserId::new(),
        )
        .await
        .unwrap();

    assert!(output.college.is_none());
    assert!(output.user.is_suspended);
    assert_eq!(
        output.user.suspension_reason.as_deref(),
        Some(DEFAULT_REJECTION_REASON)
    );
    assert!(h.email.sent()[0].body.contains(DEFAULT_REJECTION_REASON));
    assert!(!h.store.college(&h.college.college_id).admin_verified);

    let stats = AdminStatsUseCase::new(h.repo()).execute().await.unwrap();
    assert_eq!(stats.pending, 1);
    assert_eq!(stats.rejected, 1);
    assert_eq!(stats.verified, 0);
    assert_eq!(stats.this_week, 2);
    assert_eq!(stats.colleges_with_admins, 0);
    assert_eq!(stats.total, 2);
}

#[tokio::test]
async fn test_decide_requires_college_admin() {
    let h = Harness::new();
    let student = h.store.add_user(make_user(
        "student@campus.test",
        "+15550000002",
        UserRole::Student,
        &h.config,
    ));
    let reviewer = kernel::id::UserId::new();

    let decide = |user_id: String| DecideAdminInput {
        user_id,
        approved: true,
        reason: None,
    };

    assert!(matches!(
        h.decide().execute(decide(student.user_id.to_string()), &reviewer).await,
        Err(AccountsError::NotCollegeAdmin)
    ));
    assert!(matches!(
        h.decide()
            .execute(decide(kernel::id::UserId::new().to_string()), &reviewer)
            .await,
        Err(AccountsError::UserNotFound)
    ));
    assert!(matches!(
        h.decide().execute(decide("nope".to_string()), &reviewer).await,
        Err(AccountsError::Validation(_))
    ));
    assert!(h.email.sent().is_empty());
}

#[tokio::test]
async fn test_recent_activity_feed_is_newest_first_and_clamped() {
    let h = Harness::new();
    h.register("a@x.edu", "+10000000001").await;
    h.register("b@x.edu", "+10000000002").await;
    let feed = RecentActivityUseCase::new(Arc::new(h.store.clone()));

    let all = feed.execute(None).await.unwrap();
    assert_eq!(all.len(), 2);
    assert!(all[0].created_at >= all[1].created_at);
    assert!(all.iter().all(|a| a.message.ends_with("joined from State University")));

    assert_eq!(feed.execute(Some(0)).await.unwrap().len(), 1);
    assert_eq!(feed.execute(Some(500)).await.unwrap().len(), 2);
}
