//! Registration Step 3
//!
//! Checks both codes and promotes the session into a permanent user.
//! The promotion is one transaction, so repeated or concurrent submissions
//! for the same session create exactly one user and one counter increment.

use std::sync::Arc;

use kernel::id::UserId;

use crate::application::config::AccountsConfig;
use crate::application::issue_codes::{load_open_session, now_ms};
use crate::domain::entity::{activity::Activity, user::User};
use crate::domain::repository::{
    AccountsUnitOfWork, CollegeRepository, PromotionOutcome, RegistrationSessionRepository,
};
use crate::domain::value_object::one_time_code::OneTimeCode;
use crate::error::{AccountsError, AccountsResult};

/// Attempts at drawing a referral code nobody else holds
const REFERRAL_CODE_ATTEMPTS: usize = 3;

pub struct VerifyCodesInput {
    pub temp_token: String,
    pub email_code: String,
    pub phone_code: String,
}

pub struct VerifyCodesOutput {
    pub temp_token: String,
    pub user_id: UserId,
    pub is_verified: bool,
}

pub struct VerifyCodesUseCase<S, C, W>
where
    S: RegistrationSessionRepository,
    C: CollegeRepository,
    W: AccountsUnitOfWork,
{
    session_repo: Arc<S>,
    college_repo: Arc<C>,
    uow: Arc<W>,
    config: Arc<AccountsConfig>,
}

impl<S, C, W> VerifyCodesUseCase<S, C, W>
where
    S: RegistrationSessionRepository,
    C: CollegeRepository,
    W: AccountsUnitOfWork,
{
    pub fn new(
        session_repo: Arc<S>,
        college_repo: Arc<C>,
        uow: Arc<W>,
        config: Arc<AccountsConfig>,
    ) -> Self {
        Self {
            session_repo,
            college_repo,
            uow,
            config,
        }
    }

    pub async fn execute(&self, input: VerifyCodesInput) -> AccountsResult<VerifyCodesOutput> {
        let mut session =
            load_open_session(self.session_repo.as_ref(), &self.config, &input.temp_token).await?;

        session.check_codes(
            &OneTimeCode::submitted(&input.email_code),
            &OneTimeCode::submitted(&input.phone_code),
            now_ms(),
        )?;

        let college_id = session.college_id.ok_or(AccountsError::CodesNotIssued)?;
        let college = self
            .college_repo
            .find_by_id(&college_id)
            .await?
            .ok_or(AccountsError::CollegeNotFound)?;

        let mut user = User::from_verified_session(&session);
        session.mark_promoted(user.user_id);
        let activity = Activity::user_registered(&user, &college);

        for attempt in 1..=REFERRAL_CODE_ATTEMPTS {
            match self.uow.promote_session(&session, &user, &activity).await? {
                PromotionOutcome::Promoted => {
                    tracing::info!(
                        session_id = %session.session_id,
                        user_id = %user.user_id,
                        college_id = %college.college_id,
                        "Registration verified, user created"
                    );
                    return Ok(VerifyCodesOutput {
                        temp_token: input.temp_token,
                        user_id: user.user_id,
                        is_verified: true,
                    });
                }
                PromotionOutcome::AlreadyPromoted => return Err(AccountsError::AlreadyVerified),
                PromotionOutcome::SessionExpired => return Err(AccountsError::SessionInvalid),
                PromotionOutcome::EmailTaken => return Err(AccountsError::EmailTaken),
                PromotionOutcome::PhoneTaken => return Err(AccountsError::PhoneTaken),
                PromotionOutcome::ReferralCodeTaken => {
                    tracing::debug!(attempt, "Referral code collision, drawing another");
                    user.regenerate_referral_code();
                }
            }
        }

        Err(AccountsError::Internal(
            "Could not allocate a unique referral code".to_string(),
        ))
    }
}
