use crate::domain::entity::activity::{Activity, ActivityKind};
use crate::domain::entity::user::User;
use crate::domain::repository::{AccountsUnitOfWork, PromotionOutcome};
use crate::domain::value_object::registration_step::RegistrationStep;
use crate::domain::value_object::user_role::UserRole;
use crate::error::AccountsError;

use super::memory::Behavior;
use super::{Harness, make_user};

#[tokio::test]
async fn test_full_registration_flow() {
    let h = Harness::new();

    let started = h
        .step1(Harness::step1_input("a@x.edu", "+10000000000"))
        .await
        .unwrap();
    assert_eq!(started.step, 1);

    let selected = h.step2(&started.temp_token).await.unwrap();
    assert_eq!(selected.step, 2);
    assert!(selected.email_sent);
    assert!(selected.message_sent);
    assert_eq!(h.email.sent()[0].recipient, "a@x.edu");
    assert_eq!(h.sms.sent()[0].recipient, "+10000000000");

    let verified = h.step3_captured(&started.temp_token).await.unwrap();
    assert!(verified.is_verified);
    assert_eq!(h.store.college(&h.college.college_id).student_count, 1);

    let user = h.store.user(&verified.user_id);
    assert_eq!(user.role, UserRole::Student);
    assert!(user.email_verified && user.phone_verified && user.is_verified);
    assert_eq!(user.college_id, Some(h.college.college_id));
    assert!(user.referral_code.is_some());
    assert!(user.password_hash.starts_with("$argon2id$"));

    let done = h
        .step4(&started.temp_token, &verified.user_id, None, true)
        .await
        .unwrap();
    assert_eq!(done.user.user_id, verified.user_id);
    assert!(done.user.referred_by.is_none());

    let kinds: Vec<ActivityKind> = h.store.activities().iter().map(|a| a.kind).collect();
    assert_eq!(kinds, vec![ActivityKind::UserRegistered]);
}

#[tokio::test]
async fn test_step1_rejections_store_nothing() {
    let h = Harness::new();

    let mut mismatch = Harness::step1_input("a@x.edu", "+10000000000");
    mismatch.confirm_password = "different".to_string();
    assert!(matches!(
        h.step1(mismatch).await,
        Err(AccountsError::PasswordMismatch)
    ));

    let mut no_terms = Harness::step1_input("a@x.edu", "+10000000000");
    no_terms.terms_accepted = false;
    assert!(matches!(
        h.step1(no_terms).await,
        Err(AccountsError::TermsNotAccepted)
    ));

    let mut short = Harness::step1_input("a@x.edu", "+10000000000");
    short.password = "abc".to_string();
    short.confirm_password = "abc".to_string();
    assert!(matches!(h.step1(short).await, Err(AccountsError::Validation(_))));

    assert!(matches!(
        h.step1(Harness::step1_input("not-an-email", "+10000000000"))
            .await,
        Err(AccountsError::Validation(_))
    ));

    assert_eq!(h.store.session_count(), 0);
}

#[tokio::test]
async fn test_step1_rejects_registered_email_and_phone() {
    let h = Harness::new();
    h.store.add_user(make_user(
        "taken@x.edu",
        "+15550001111",
        UserRole::Student,
        &h.config,
    ));

    assert!(matches!(
        h.step1(Harness::step1_input("TAKEN@x.edu", "+10000000000"))
            .await,
        Err(AccountsError::EmailTaken)
    ));
    assert!(matches!(
        h.step1(Harness::step1_input("new@x.edu", "+1 555 000 1111"))
            .await,
        Err(AccountsError::PhoneTaken)
    ));
    assert_eq!(h.store.session_count(), 0);
}

#[tokio::test]
async fn test_step2_rejects_unknown_college_and_bad_year() {
    let h = Harness::new();
    let started = h
        .step1(Harness::step1_input("a@x.edu", "+10000000000"))
        .await
        .unwrap();

    let unknown = kernel::id::CollegeId::new().to_string();
    assert!(matches!(
        h.step2_with(&started.temp_token, &unknown, 2026).await,
        Err(AccountsError::CollegeNotFound)
    ));
    assert!(matches!(
        h.step2_with(&started.temp_token, "garbage", 2026).await,
        Err(AccountsError::CollegeNotFound)
    ));
    assert!(matches!(
        h.step2_with(&started.temp_token, &h.college.college_id.to_string(), 1890)
            .await,
        Err(AccountsError::Validation(_))
    ));

    assert!(h.email.sent().is_empty());
    assert_eq!(h.store.only_session().step, RegistrationStep::Initiated);
}

#[tokio::test]
async fn test_forged_and_expired_tokens_are_rejected() {
    let h = Harness::new();
    let started = h
        .step1(Harness::step1_input("a@x.edu", "+10000000000"))
        .await
        .unwrap();

    let forged = format!("{}x", started.temp_token);
    assert!(matches!(
        h.step2(&forged).await,
        Err(AccountsError::SessionInvalid)
    ));

    h.store.expire_session(&h.session_id(&started.temp_token));
    assert!(matches!(
        h.step2(&started.temp_token).await,
        Err(AccountsError::SessionInvalid)
    ));
}

#[tokio::test]
async fn test_one_failed_channel_does_not_block() {
    let h = Harness::new();
    h.sms.set_behavior(Behavior::Fail);

    let started = h
        .step1(Harness::step1_input("a@x.edu", "+10000000000"))
        .await
        .unwrap();
    let selected = h.step2(&started.temp_token).await.unwrap();

    assert!(selected.email_sent);
    assert!(!selected.message_sent);
    assert!(h.store.only_session().codes_delivered);
}

#[tokio::test]
async fn test_hanging_channel_times_out() {
    let h = Harness::new();
    h.email.set_behavior(Behavior::Hang);

    let started = h
        .step1(Harness::step1_input("a@x.edu", "+10000000000"))
        .await
        .unwrap();
    let selected = h.step2(&started.temp_token).await.unwrap();

    assert!(!selected.email_sent);
    assert!(selected.message_sent);
}

#[tokio::test]
async fn test_total_delivery_failure_recovers_by_resend() {
    let h = Harness::new();
    h.email.set_behavior(Behavior::Fail);
    h.sms.set_behavior(Behavior::Fail);

    let started = h
        .step1(Harness::step1_input("a@x.edu", "+10000000000"))
        .await
        .unwrap();
    assert!(matches!(
        h.step2(&started.temp_token).await,
        Err(AccountsError::DeliveryFailed)
    ));

    // Codes were stored even though nobody received them
    let session = h.store.only_session();
    assert_eq!(session.step, RegistrationStep::CollegeSelected);
    assert!(session.email_code.is_some());
    assert!(!session.codes_delivered);

    // No cooldown after a total failure
    h.email.set_behavior(Behavior::Deliver);
    h.sms.set_behavior(Behavior::Deliver);
    let resent = h.resend(&started.temp_token).await.unwrap();
    assert!(resent.email_sent && resent.message_sent);
    assert_eq!(resent.wait_time, 60);

    let verified = h.step3_captured(&started.temp_token).await.unwrap();
    assert!(verified.is_verified);
}

#[tokio::test]
async fn test_resend_cooldown() {
    let h = Harness::new();
    let started = h
        .step1(Harness::step1_input("a@x.edu", "+10000000000"))
        .await
        .unwrap();

    assert!(matches!(
        h.resend(&started.temp_token).await,
        Err(AccountsError::CodesNotIssued)
    ));

    h.step2(&started.temp_token).await.unwrap();
    let first_code = h.email.last_code();

    match h.resend(&started.temp_token).await {
        Err(AccountsError::ResendTooSoon { retry_after_secs }) => {
            assert!(retry_after_secs > 0 && retry_after_secs <= 60);
        }
        other => panic!("expected cooldown, got {:?}", other.map(|o| o.wait_time)),
    }
    // Re-submitting step 2 is a resend too
    assert!(matches!(
        h.step2(&started.temp_token).await,
        Err(AccountsError::ResendTooSoon { .. })
    ));

    h.store
        .age_issuance(&h.session_id(&started.temp_token), 61_000);
    h.resend(&started.temp_token).await.unwrap();
    assert_eq!(h.email.sent().len(), 2);

    // Only the newest codes are accepted
    let stale = h
        .step3(&started.temp_token, &first_code, &h.sms.last_code())
        .await;
    if first_code != h.email.last_code() {
        assert!(matches!(stale, Err(AccountsError::EmailCodeIncorrect)));
    }
}

#[tokio::test]
async fn test_concurrent_resends_issue_once() {
    let h = Harness::new();
    let started = h
        .step1(Harness::step1_input("a@x.edu", "+10000000000"))
        .await
        .unwrap();
    h.step2(&started.temp_token).await.unwrap();
    h.store
        .age_issuance(&h.session_id(&started.temp_token), 61_000);

    let (a, b, c) = tokio::join!(
        h.resend(&started.temp_token),
        h.resend(&started.temp_token),
        h.resend(&started.temp_token)
    );
    let outcomes = [a, b, c];
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(
        outcomes
            .iter()
            .filter(|r| matches!(r, Err(AccountsError::ResendTooSoon { .. })))
            .count(),
        2
    );
    assert_eq!(h.sms.sent().len(), 2);
    assert_eq!(h.email.sent().len(), 2);
}

#[tokio::test]
async fn test_resend_is_refused_while_codes_are_in_flight() {
    let h = Harness::new();
    h.email.set_behavior(Behavior::Hang);
    h.sms.set_behavior(Behavior::Hang);
    let started = h
        .step1(Harness::step1_input("a@x.edu", "+10000000000"))
        .await
        .unwrap();

    // The first issuance hangs until the delivery timeout; the resend lands meanwhile
    let (selected, resent) = tokio::join!(h.step2(&started.temp_token), async {
        tokio::task::yield_now().await;
        h.resend(&started.temp_token).await
    });
    assert!(matches!(selected, Err(AccountsError::DeliveryFailed)));
    assert!(matches!(resent, Err(AccountsError::ResendTooSoon { .. })));
    assert_eq!(h.sms.sent().len(), 1);

    // Total failure lifts the cooldown
    h.email.set_behavior(Behavior::Deliver);
    h.sms.set_behavior(Behavior::Deliver);
    assert!(h.resend(&started.temp_token).await.is_ok());
}

#[tokio::test]
async fn test_expired_codes_are_reported_before_wrong_codes() {
    let h = Harness::new();
    let started = h
        .step1(Harness::step1_input("a@x.edu", "+10000000000"))
        .await
        .unwrap();
    h.step2(&started.temp_token).await.unwrap();

    h.store.expire_codes(&h.session_id(&started.temp_token));

    assert!(matches!(
        h.step3(&started.temp_token, "000000", "000000").await,
        Err(AccountsError::EmailCodeExpired)
    ));
    assert!(matches!(
        h.step3_captured(&started.temp_token).await,
        Err(AccountsError::EmailCodeExpired)
    ));
    assert_eq!(h.store.user_count(), 0);
}

#[tokio::test]
async fn test_wrong_code_leaves_session_usable() {
    let h = Harness::new();
    let started = h
        .step1(Harness::step1_input("a@x.edu", "+10000000000"))
        .await
        .unwrap();
    h.step2(&started.temp_token).await.unwrap();

    let email_code = h.email.last_code();
    let wrong_phone = if h.sms.last_code() == "111111" {
        "222222"
    } else {
        "111111"
    };
    assert!(matches!(
        h.step3(&started.temp_token, &email_code, wrong_phone).await,
        Err(AccountsError::PhoneCodeIncorrect)
    ));
    assert!(matches!(
        h.step3(&started.temp_token, "12ab56", &h.sms.last_code()).await,
        Err(AccountsError::EmailCodeIncorrect)
    ));
    assert_eq!(h.store.user_count(), 0);

    assert!(h.step3_captured(&started.temp_token).await.is_ok());
}

#[tokio::test]
async fn test_step3_promotes_once() {
    let h = Harness::new();
    let started = h
        .step1(Harness::step1_input("a@x.edu", "+10000000000"))
        .await
        .unwrap();
    h.step2(&started.temp_token).await.unwrap();

    let (first, second) = tokio::join!(
        h.step3_captured(&started.temp_token),
        h.step3_captured(&started.temp_token)
    );
    let outcomes = [first, second];
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(
        outcomes
            .iter()
            .any(|r| matches!(r, Err(AccountsError::AlreadyVerified)))
    );

    assert!(matches!(
        h.step3_captured(&started.temp_token).await,
        Err(AccountsError::AlreadyVerified)
    ));
    assert!(matches!(
        h.resend(&started.temp_token).await,
        Err(AccountsError::AlreadyVerified)
    ));

    assert_eq!(h.store.user_count(), 1);
    assert_eq!(h.store.college(&h.college.college_id).student_count, 1);
}

#[tokio::test]
async fn test_promotion_of_expired_session_is_not_reported_as_verified() {
    let h = Harness::new();
    let started = h
        .step1(Harness::step1_input("a@x.edu", "+10000000000"))
        .await
        .unwrap();
    h.step2(&started.temp_token).await.unwrap();

    let mut session = h.store.only_session();
    let user = User::from_verified_session(&session);
    session.mark_promoted(user.user_id);
    let activity = Activity::user_registered(&user, &h.college);

    // Session lapses after it was loaded but before the claim
    h.store.expire_session(&session.session_id);
    let outcome = h
        .store
        .promote_session(&session, &user, &activity)
        .await
        .unwrap();
    assert_eq!(outcome, PromotionOutcome::SessionExpired);
    assert_eq!(h.store.user_count(), 0);
    assert!(h.store.activities().is_empty());

    assert!(matches!(
        h.step3_captured(&started.temp_token).await,
        Err(AccountsError::SessionInvalid)
    ));
}

#[tokio::test]
async fn test_email_registered_during_flow_is_caught_at_promotion() {
    let h = Harness::new();
    let started = h
        .step1(Harness::step1_input("a@x.edu", "+10000000000"))
        .await
        .unwrap();
    h.step2(&started.temp_token).await.unwrap();

    h.store.add_user(make_user(
        "a@x.edu",
        "+15550009999",
        UserRole::Student,
        &h.config,
    ));

    assert!(matches!(
        h.step3_captured(&started.temp_token).await,
        Err(AccountsError::EmailTaken)
    ));
    assert_eq!(h.store.college(&h.college.college_id).student_count, 0);
}

#[tokio::test]
async fn test_referral_links_referrer() {
    let h = Harness::new();
    let (_, referrer) = h.register("ref@x.edu", "+10000000001").await;
    let referrer_code = referrer.referral_code.clone().unwrap();

    let (token, user) = h.register("new@x.edu", "+10000000002").await;
    let typed = format!("  {}  ", referrer_code.as_str().to_lowercase());
    let done = h
        .step4(&token, &user.user_id, Some(&typed), false)
        .await
        .unwrap();

    assert_eq!(done.user.referred_by, Some(referrer.user_id));
    assert_eq!(h.store.user(&user.user_id).referred_by, Some(referrer.user_id));
    assert_eq!(h.store.user(&referrer.user_id).referral_count, 1);

    let referral = h
        .store
        .activities()
        .into_iter()
        .find(|a| a.kind == ActivityKind::ReferralSuccess)
        .unwrap();
    assert_eq!(referral.user_id, referrer.user_id);

    // A second step 4 cannot add another referral
    h.step4(&token, &user.user_id, Some(referrer_code.as_str()), false)
        .await
        .unwrap();
    assert_eq!(h.store.user(&referrer.user_id).referral_count, 1);
}

#[tokio::test]
async fn test_unknown_referral_code_completes_silently() {
    let h = Harness::new();
    let (token, user) = h.register("a@x.edu", "+10000000000").await;

    for code in ["ZZZZZZZZ", "bad code!", ""] {
        let done = h
            .step4(&token, &user.user_id, Some(code), false)
            .await
            .unwrap();
        assert!(done.user.referred_by.is_none());
    }

    // Own code is ignored too
    let own = user.referral_code.clone().unwrap();
    let done = h
        .step4(&token, &user.user_id, Some(own.as_str()), false)
        .await
        .unwrap();
    assert!(done.user.referred_by.is_none());

    assert!(
        h.store
            .activities()
            .iter()
            .all(|a| a.kind != ActivityKind::ReferralSuccess)
    );
}

#[tokio::test]
async fn test_step4_requires_matching_verified_user() {
    let h = Harness::new();
    let started = h
        .step1(Harness::step1_input("a@x.edu", "+10000000000"))
        .await
        .unwrap();
    let stranger = kernel::id::UserId::new();

    assert!(matches!(
        h.step4(&started.temp_token, &stranger, None, true).await,
        Err(AccountsError::Validation(_))
    ));

    h.step2(&started.temp_token).await.unwrap();
    h.step3_captured(&started.temp_token).await.unwrap();

    assert!(matches!(
        h.step4(&started.temp_token, &stranger, None, true).await,
        Err(AccountsError::Validation(_))
    ));
}
