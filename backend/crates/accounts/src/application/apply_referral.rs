//! Registration Step 4
//!
//! Optionally links the new user to a referrer. An unknown, malformed or
//! self-owned code is not an error; registration completes without a link.

use std::sync::Arc;

use kernel::id::UserId;

use crate::application::config::AccountsConfig;
use crate::application::issue_codes::load_session;
use crate::domain::entity::{activity::Activity, user::User};
use crate::domain::repository::{AccountsUnitOfWork, RegistrationSessionRepository, UserRepository};
use crate::domain::value_object::referral_code::ReferralCode;
use crate::error::{AccountsError, AccountsResult};

pub struct ApplyReferralInput {
    pub temp_token: String,
    pub user_id: String,
    pub referral_code: Option<String>,
    pub skip_referral: bool,
}

pub struct ApplyReferralOutput {
    pub user: User,
}

pub struct ApplyReferralUseCase<S, U, W>
where
    S: RegistrationSessionRepository,
    U: UserRepository,
    W: AccountsUnitOfWork,
{
    session_repo: Arc<S>,
    user_repo: Arc<U>,
    uow: Arc<W>,
    config: Arc<AccountsConfig>,
}

impl<S, U, W> ApplyReferralUseCase<S, U, W>
where
    S: RegistrationSessionRepository,
    U: UserRepository,
    W: AccountsUnitOfWork,
{
    pub fn new(
        session_repo: Arc<S>,
        user_repo: Arc<U>,
        uow: Arc<W>,
        config: Arc<AccountsConfig>,
    ) -> Self {
        Self {
            session_repo,
            user_repo,
            uow,
            config,
        }
    }

    pub async fn execute(&self, input: ApplyReferralInput) -> AccountsResult<ApplyReferralOutput> {
        // Read only; the session is never touched again
        let session =
            load_session(self.session_repo.as_ref(), &self.config, &input.temp_token).await?;

        let user_id = UserId::parse_str(&input.user_id)
            .map_err(|_| AccountsError::Validation("Invalid user id".to_string()))?;

        match session.promoted_user_id {
            None => {
                return Err(AccountsError::Validation(
                    "Registration has not been verified yet".to_string(),
                ));
            }
            Some(promoted) if promoted != user_id => {
                return Err(AccountsError::Validation(
                    "User does not belong to this registration".to_string(),
                ));
            }
            Some(_) => {}
        }

        let mut user = self
            .user_repo
            .find_by_id(&user_id)
            .await?
            .ok_or(AccountsError::UserNotFound)?;

        if input.skip_referral {
            return Ok(ApplyReferralOutput { user });
        }

        let Some(code) = input.referral_code.as_deref().and_then(ReferralCode::normalize) else {
            return Ok(ApplyReferralOutput { user });
        };

        let Some(referrer) = self.user_repo.find_by_referral_code(&code).await? else {
            tracing::debug!(user_id = %user.user_id, "Referral code not found, skipping");
            return Ok(ApplyReferralOutput { user });
        };

        if referrer.user_id == user.user_id {
            return Ok(ApplyReferralOutput { user });
        }

        let activity = Activity::referral_success(&referrer, &user);
        if self
            .uow
            .link_referral(&user.user_id, &referrer.user_id, &activity)
            .await?
        {
            user.referred_by = Some(referrer.user_id);
            tracing::info!(
                user_id = %user.user_id,
                referrer_id = %referrer.user_id,
                "Referral linked"
            );
        }

        Ok(ApplyReferralOutput { user })
    }
}
